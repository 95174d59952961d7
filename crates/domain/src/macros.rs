//! Macro for implementing Display and FromStr for keyword enums
//!
//! Configuration values such as the log format are plain keywords in files
//! and environment variables. This macro gives such enums a single mapping
//! for both directions, with case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use taskguard_domain::impl_keyword_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Mode {
//!     Fast,
//!     Safe,
//! }
//!
//! impl_keyword_conversions!(Mode {
//!     Fast => "fast",
//!     Safe => "safe",
//! });
//!
//! assert_eq!("SAFE".parse::<Mode>().unwrap(), Mode::Safe);
//! assert_eq!(Mode::KEYWORDS, &["fast", "safe"]);
//! ```

/// Implements Display and FromStr for keyword enums
///
/// Generates:
/// - `Display`: writes the keyword
/// - `FromStr`: case-insensitive parse, failing with
///   [`TaskGuardError::InvalidInput`](crate::errors::TaskGuardError) that
///   lists the accepted keywords
/// - `KEYWORDS`: the accepted keywords in declaration order
#[macro_export]
macro_rules! impl_keyword_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Accepted keywords, in declaration order.
            pub const KEYWORDS: &'static [&'static str] = &[$($str),+];
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::errors::TaskGuardError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err($crate::errors::TaskGuardError::InvalidInput(format!(
                        "Invalid {}: {:?} (expected one of {})",
                        stringify!($enum_name),
                        s,
                        Self::KEYWORDS.join(", ")
                    ))),
                }
            }
        }
    };
}
