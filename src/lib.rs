// Adopt Me Now - form validation for the pet adoption site
//
// This library bundles the rule-string validator with the configuration and
// logging setup the site's request handlers share.

// Re-export the validation engine
pub use adoptme_validation::*;

// Re-export optional crates
#[cfg(feature = "config")]
pub use adoptme_config;

#[cfg(feature = "log")]
pub use adoptme_log;

/// Build the form catalog from a settings file, falling back to the
/// built-in forms when `path` is `None`.
#[cfg(feature = "config")]
pub fn load_catalog(
    path: Option<&std::path::Path>,
) -> std::result::Result<FormCatalog, CatalogError> {
    match path {
        Some(path) => {
            let settings = adoptme_config::ValidationSettings::load(path)?;
            FormCatalog::from_settings(&settings)
        }
        None => Ok(FormCatalog::builtin()),
    }
}

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        FormCatalog,
        FormGuard,
        FormRequest,
        FormRules,
        FormSource,
        FormValidator,
        GuardOutcome,
        RouteValidator,
        RuleRegistry,
        UserDirectory,
        UserRecord,
        ValidationResult,
        // Business-rule passes
        validate_adoption_data,
        validate_admin_registration_data,
        validate_login_data,
        validate_registration_data,
        validation_error_response,
    };
}
