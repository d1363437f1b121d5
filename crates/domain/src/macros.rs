//! Macro for implementing Display and FromStr for status enums
//!
//! Provides a single implementation for both traits so that phase and status
//! enums log and parse consistently.
//!
//! # Example
//!
//! ```rust
//! use huddle_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ReadSource {
//!     Remote,
//!     Local,
//! }
//!
//! impl_domain_status_conversions!(ReadSource {
//!     Remote => "remote",
//!     Local => "local",
//! });
//! ```

/// Implements Display and FromStr traits for status enums
///
/// - Display writes the mapped string
/// - FromStr parses case-insensitively and names the enum in its error
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Outcome {
        Synced,
        LocalOnly,
    }

    impl_domain_status_conversions!(Outcome {
        Synced => "synced",
        LocalOnly => "local_only",
    });

    #[test]
    fn display_uses_mapped_string() {
        assert_eq!(Outcome::Synced.to_string(), "synced");
        assert_eq!(Outcome::LocalOnly.to_string(), "local_only");
    }

    #[test]
    fn parsing_ignores_case() {
        assert_eq!(Outcome::from_str("SYNCED").unwrap(), Outcome::Synced);
        assert_eq!(Outcome::from_str("Local_Only").unwrap(), Outcome::LocalOnly);
    }

    #[test]
    fn parsing_rejects_unknown_values() {
        let err = Outcome::from_str("merged").unwrap_err();
        assert!(err.contains("Invalid Outcome: merged"));
        assert!(Outcome::from_str("").is_err());
    }
}
