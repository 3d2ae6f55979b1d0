// Standard validation error body

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const VALIDATION_FAILED: &str = "Errores de validación encontrados";

/// JSON body returned when a submission fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub success: bool,
    pub message: String,
    pub errors: IndexMap<String, String>,
    pub status_code: u16,
}

impl ValidationErrorResponse {
    /// Convert to a JSON value
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Serialized body, ready for an `application/json` response
    pub fn body(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

pub fn validation_error_response(
    errors: IndexMap<String, String>,
    status_code: u16,
) -> ValidationErrorResponse {
    ValidationErrorResponse {
        success: false,
        message: VALIDATION_FAILED.to_string(),
        errors,
        status_code,
    }
}
