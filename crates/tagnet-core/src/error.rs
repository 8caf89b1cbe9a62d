//! Error types for Tagnet operations.
//!
//! Most of the pipeline degrades instead of failing (empty tag fields parse
//! to empty lists, skipped views are notices, not errors); these types cover
//! the cases that genuinely cannot proceed.

use std::error::Error;
use std::fmt;

/// Result type for Tagnet operations.
pub type Result<T> = std::result::Result<T, TagnetError>;

/// Errors that can occur during Tagnet operations.
#[derive(Debug, Clone)]
pub enum TagnetError {
    /// Configuration errors.
    Config(ConfigError),
}

impl fmt::Display for TagnetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagnetError::Config(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl Error for TagnetError {}

/// Configuration errors.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Out of range.
    OutOfRange {
        field: String,
        min: f64,
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::OutOfRange { field, min, value } => {
                write!(f, "{} out of range: {} (must be > {})", field, value, min)
            }
        }
    }
}

impl TagnetError {
    pub fn out_of_range(field: impl Into<String>, min: f64, value: f64) -> Self {
        TagnetError::Config(ConfigError::OutOfRange {
            field: field.into(),
            min,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_names_the_field_and_bound() {
        let err = TagnetError::out_of_range("resolution", 0.0, -1.0);
        let msg = err.to_string();
        assert!(msg.contains("resolution"));
        assert!(msg.contains("-1"));
        assert!(msg.contains("must be > 0"));
    }
}
