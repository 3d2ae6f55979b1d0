//! Form validation for Adopt Me Now
//!
//! Fields are checked against pipe-delimited rule-strings such as
//! `"required|email|max_length:100"`. Rules run left to right and the first
//! failure is the field's only error. Fields that pass end up in the cleaned
//! map with surrounding whitespace trimmed.
//!
//! # Examples
//!
//! ## Validating a form
//!
//! ```
//! use adoptme_validation::{FormRules, FormValidator};
//! use serde_json::json;
//!
//! let rules = FormRules::new()
//!     .field("nombre", "required|name")
//!     .field("email", "required|email");
//!
//! let mut validator = FormValidator::new();
//! let (valid, cleaned) = validator.validate_form(&rules, &json!({
//!     "nombre": "  Ana  ",
//!     "email": "ana@b",
//! }));
//!
//! assert!(!valid);
//! assert_eq!(cleaned["nombre"], "Ana");
//! assert_eq!(validator.errors()["email"], "Ingresa un email válido");
//! ```
//!
//! ## Business rules
//!
//! ```
//! use adoptme_validation::{validate_registration_data, UserRecord};
//! use serde_json::json;
//!
//! let users = vec![UserRecord::new("ana@correo.com")];
//! let input = json!({
//!     "nombre": "Ana",
//!     "email": "ana@correo.com",
//!     "telefono": "3001234567",
//!     "password": "secreto1",
//! });
//!
//! let (valid, errors, _cleaned) = validate_registration_data(&input, &users).into_parts();
//! assert!(!valid);
//! assert_eq!(errors["email"], "Este email ya está registrado");
//! ```
//!
//! ## Custom rules
//!
//! ```
//! use adoptme_validation::{FormValidator, RuleRegistry};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let mut registry = RuleRegistry::builtin();
//! registry.add_rule("si", |v| v == "si", Some("Debes aceptar los términos"));
//!
//! let mut validator = FormValidator::with_registry(Arc::new(registry));
//! assert!(!validator.validate_field("acepta_terminos", &json!("no"), "required|si"));
//! assert_eq!(validator.errors()["acepta_terminos"], "Debes aceptar los términos");
//! ```

mod catalog;
mod errors;
pub mod forms;
mod hooks;
mod pipe;
mod response;
mod rules;
mod traits;
mod validator;
pub mod validators;

pub use catalog::*;
pub use errors::*;
pub use hooks::*;
pub use pipe::*;
pub use response::*;
pub use rules::*;
pub use traits::*;
pub use validator::*;
