// Configuration validation

use crate::{ConfigError, Result};

/// Trait for configuration documents that can check themselves after loading
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Small checks shared by configuration documents
pub struct ConfigValidator;

impl ConfigValidator {
    /// Reject empty or whitespace-only values
    pub fn not_blank(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    /// Reject empty lists
    pub fn not_empty<T>(values: &[T], field: &str) -> Result<()> {
        if values.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} must contain at least one entry",
                field
            )));
        }
        Ok(())
    }

    /// Route paths must be absolute
    pub fn is_route_path(value: &str, field: &str) -> Result<()> {
        if !value.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "{} must start with '/', got '{}'",
                field, value
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(ConfigValidator::not_blank("casa", "housing").is_ok());
        assert!(ConfigValidator::not_blank("  ", "housing").is_err());
    }

    #[test]
    fn test_not_empty() {
        assert!(ConfigValidator::not_empty(&[1], "list").is_ok());
        assert!(ConfigValidator::not_empty::<u8>(&[], "list").is_err());
    }

    #[test]
    fn test_is_route_path() {
        assert!(ConfigValidator::is_route_path("/registro", "route").is_ok());
        let err = ConfigValidator::is_route_path("registro", "route").unwrap_err();
        assert!(err.to_string().contains("must start with '/'"));
    }
}
