//! Cron expression normalization
//!
//! Task schedules are written in the classic Unix dialect: five fields
//! (`minute hour day month weekday`) or six fields with a leading seconds
//! column, and weekdays numbered `0-7` with both `0` and `7` meaning Sunday.
//! The scheduling engine expects a seconds column and numbers weekdays
//! `1-7` starting on Sunday, so expressions are rewritten before they are
//! handed over. Weekday numbers are converted to names (`MON`, `TUE`, ...),
//! which both dialects agree on.

use thiserror::Error;

/// Error type for cron normalization
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CronParseError {
    #[error("Invalid cron expression: empty")]
    Empty,

    #[error("Invalid weekday field: {0}")]
    InvalidWeekday(String),

    #[error("Too many fields: expected 5 to 7, got {0}")]
    TooManyFields(usize),

    #[error("Too few fields: expected 5 to 7, got {0}")]
    TooFewFields(usize),
}

const WEEKDAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Normalize a Unix-style cron expression into the engine's dialect.
///
/// Nicknames such as `@hourly` pass through untouched.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "foundation")]
/// # {
/// use taskguard_common::time::cron::normalize;
///
/// assert_eq!(normalize("*/5 * * * *").unwrap(), "0 */5 * * * *");
/// assert_eq!(normalize("30 0 9 * * 1-5").unwrap(), "30 0 9 * * MON-FRI");
/// assert!(normalize("* * *").is_err());
/// # }
/// ```
pub fn normalize(expr: &str) -> Result<String, CronParseError> {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return Err(CronParseError::Empty);
    }
    if trimmed.starts_with('@') {
        return Ok(trimmed.to_string());
    }

    let mut fields: Vec<String> = trimmed.split_whitespace().map(str::to_string).collect();
    match fields.len() {
        n if n < 5 => return Err(CronParseError::TooFewFields(n)),
        5 => fields.insert(0, "0".to_string()),
        6 | 7 => {}
        n => return Err(CronParseError::TooManyFields(n)),
    }

    fields[5] = translate_weekdays(&fields[5])?;
    Ok(fields.join(" "))
}

fn translate_weekdays(field: &str) -> Result<String, CronParseError> {
    let parts: Result<Vec<String>, CronParseError> =
        field.split(',').map(|part| translate_weekday_part(part, field)).collect();
    Ok(parts?.join(","))
}

fn translate_weekday_part(part: &str, field: &str) -> Result<String, CronParseError> {
    let (range, step) = match part.split_once('/') {
        Some((range, step)) => (range, Some(parse_step(step, field)?)),
        None => (part, None),
    };

    if range == "*" || range == "?" {
        return Ok(match step {
            Some(step) => format!("{range}/{step}"),
            None => range.to_string(),
        });
    }

    // Stepped selections are spelled out day by day: the engine counts from
    // Sunday = 1 and rejects a bare `NAME/step`.
    if let Some(step) = step {
        let (start, end) = match range.split_once('-') {
            Some((start, end)) => (weekday_index(start, field)?, weekday_index(end, field)?),
            // `N/step` walks to the end of the week.
            None => (weekday_index(range, field)?, 6),
        };
        if start > end {
            return Err(CronParseError::InvalidWeekday(field.to_string()));
        }

        let mut days: Vec<&str> = Vec::new();
        for day in (start..=end).step_by(step) {
            let name = WEEKDAY_NAMES[day % 7];
            if !days.contains(&name) {
                days.push(name);
            }
        }
        return Ok(days.join(","));
    }

    match range.split_once('-') {
        // Sunday written as 7 closes the week, which the engine cannot express
        // as a range end.
        Some((start, "7")) => Ok(match weekday_index(start, field)? {
            0 => "*".to_string(),
            7 => "SUN".to_string(),
            day => format!("{}-SAT,SUN", WEEKDAY_NAMES[day]),
        }),
        Some((start, end)) => {
            Ok(format!("{}-{}", weekday_name(start, field)?, weekday_name(end, field)?))
        }
        None => weekday_name(range, field),
    }
}

fn parse_step(step: &str, field: &str) -> Result<usize, CronParseError> {
    match step.parse::<usize>() {
        Ok(step) if step > 0 => Ok(step),
        _ => Err(CronParseError::InvalidWeekday(field.to_string())),
    }
}

/// Unix weekday number (`0-7`) of a numeric or three-letter token.
fn weekday_index(token: &str, field: &str) -> Result<usize, CronParseError> {
    if let Ok(day) = token.parse::<usize>() {
        return if day <= 7 {
            Ok(day)
        } else {
            Err(CronParseError::InvalidWeekday(field.to_string()))
        };
    }

    let upper = token.to_ascii_uppercase();
    WEEKDAY_NAMES
        .iter()
        .position(|name| *name == upper)
        .ok_or_else(|| CronParseError::InvalidWeekday(field.to_string()))
}

fn weekday_name(token: &str, field: &str) -> Result<String, CronParseError> {
    match token.parse::<usize>() {
        Ok(day) if day <= 7 => Ok(WEEKDAY_NAMES[day % 7].to_string()),
        Ok(_) => Err(CronParseError::InvalidWeekday(field.to_string())),
        Err(_) if token.chars().all(|c| c.is_ascii_alphabetic()) && !token.is_empty() => {
            Ok(token.to_ascii_uppercase())
        }
        Err(_) => Err(CronParseError::InvalidWeekday(field.to_string())),
    }
}
