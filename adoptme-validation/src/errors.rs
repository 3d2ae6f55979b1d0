// Validation errors

use adoptme_config::ConfigError;
use thiserror::Error;

/// A rule checker that could not evaluate its input.
///
/// Unlike a failed rule this never means "the value is wrong"; it means the
/// rule was misapplied. The validator records it against the field as
/// `Error de validación: {self}`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("la regla '{rule}' requiere un parámetro")]
    MissingParam { rule: String },

    #[error("la regla '{rule}' no admite parámetros")]
    UnexpectedParam { rule: String },

    #[error("la regla '{rule}' espera un número entero, se recibió '{param}'")]
    InvalidParam { rule: String, param: String },

    #[error("la regla '{rule}' no se puede aplicar a un valor de tipo {kind}")]
    UnsupportedValue { rule: String, kind: &'static str },

    #[error("{0}")]
    Custom(String),
}

impl CheckError {
    pub fn missing_param(rule: &str) -> Self {
        Self::MissingParam {
            rule: rule.to_string(),
        }
    }

    pub fn unexpected_param(rule: &str) -> Self {
        Self::UnexpectedParam {
            rule: rule.to_string(),
        }
    }

    pub fn unsupported(rule: &str, kind: &'static str) -> Self {
        Self::UnsupportedValue {
            rule: rule.to_string(),
            kind,
        }
    }
}

/// Errors raised while assembling a [`FormCatalog`](crate::FormCatalog).
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("route '{path}' points to unknown form '{form}'")]
    UnknownForm { path: String, form: String },

    #[error("form '{form}', field '{field}': {source}")]
    InvalidRule {
        form: String,
        field: String,
        #[source]
        source: CheckError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while reading a submitted request body.
#[derive(Error, Debug)]
pub enum PipeError {
    #[error("Failed to parse form data: {0}")]
    InvalidForm(#[from] serde_urlencoded::de::Error),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("JSON body must be an object, got {0}")]
    NotAnObject(&'static str),
}

pub type Result<T> = std::result::Result<T, PipeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_error_text() {
        let err = CheckError::missing_param("min_length");
        assert_eq!(err.to_string(), "la regla 'min_length' requiere un parámetro");

        let err = CheckError::unsupported("email", "number");
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn test_catalog_error_wraps_check_error() {
        let err = CatalogError::InvalidRule {
            form: "contacto".to_string(),
            field: "mensaje".to_string(),
            source: CheckError::unexpected_param("required"),
        };
        let text = err.to_string();
        assert!(text.starts_with("form 'contacto', field 'mensaje'"));
        assert!(text.contains("no admite parámetros"));
    }
}
