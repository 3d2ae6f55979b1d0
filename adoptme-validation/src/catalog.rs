// Named forms, request routes and the adoption policy

use crate::hooks::{self, AdoptionPolicy};
use crate::rules::{LintIssue, RuleRegistry};
use crate::{
    CatalogError, FormRules, FormSource, FormValidator, UserDirectory, ValidationResult, forms,
};
use adoptme_config::{Validate, ValidationSettings};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a request handler needs to validate a submission.
///
/// Immutable once built; share it behind an `Arc`.
///
/// ```
/// use adoptme_validation::FormCatalog;
///
/// let catalog = FormCatalog::builtin();
/// let (name, form) = catalog.form_for_route("/formulario").unwrap();
/// assert_eq!(name, "adoption");
/// assert_eq!(form.len(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct FormCatalog {
    forms: IndexMap<String, FormRules>,
    routes: IndexMap<String, String>,
    policy: AdoptionPolicy,
    registry: Arc<RuleRegistry>,
}

impl FormCatalog {
    /// The four predefined forms and the default routes
    pub fn builtin() -> Self {
        Self {
            forms: forms::builtin_forms(),
            routes: forms::builtin_routes(),
            policy: AdoptionPolicy::default(),
            registry: RuleRegistry::shared(),
        }
    }

    /// Built-in catalog overlaid with `settings`
    pub fn from_settings(settings: &ValidationSettings) -> Result<Self, CatalogError> {
        Self::builtin().apply_settings(settings)
    }

    /// Use a registry with extra rules. Set it before applying settings so
    /// configured forms are linted against it.
    pub fn with_registry(mut self, registry: Arc<RuleRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Overlay configured forms, routes and housing types.
    ///
    /// Configured forms replace built-in ones of the same name. Fails when a
    /// route names a form that does not exist or a rule gets the wrong kind
    /// of parameter; unknown rule names are only logged.
    pub fn apply_settings(mut self, settings: &ValidationSettings) -> Result<Self, CatalogError> {
        settings.validate()?;
        self.policy = AdoptionPolicy::from_settings(settings);

        for (name, fields) in &settings.forms {
            self.forms
                .insert(name.clone(), FormRules::from(fields.clone()));
        }
        for (path, form) in &settings.routes {
            self.routes.insert(path.clone(), form.clone());
        }

        for (path, form) in &self.routes {
            if !self.forms.contains_key(form) {
                return Err(CatalogError::UnknownForm {
                    path: path.clone(),
                    form: form.clone(),
                });
            }
        }

        self.lint()?;

        info!(
            forms = self.forms.len(),
            routes = self.routes.len(),
            housing_types = self.policy.housing_types().len(),
            "form catalog configured"
        );
        Ok(self)
    }

    /// Check every rule-string against the registry.
    ///
    /// Returns the unknown rule names as warnings; parameter mismatches are
    /// errors.
    pub fn lint(&self) -> Result<Vec<(String, String, LintIssue)>, CatalogError> {
        let mut warnings = Vec::new();

        for (form, rules) in &self.forms {
            for (field, field_rules) in rules.iter() {
                for issue in self.registry.lint(field_rules) {
                    match issue {
                        LintIssue::Param(source) => {
                            return Err(CatalogError::InvalidRule {
                                form: form.clone(),
                                field: field.to_string(),
                                source,
                            });
                        }
                        LintIssue::UnknownRule(ref rule) => {
                            warn!(form = %form, field, rule = %rule, "unknown rule will be skipped");
                            warnings.push((form.clone(), field.to_string(), issue));
                        }
                    }
                }
            }
        }

        Ok(warnings)
    }

    pub fn form(&self, name: &str) -> Option<&FormRules> {
        self.forms.get(name)
    }

    pub fn forms(&self) -> impl Iterator<Item = (&str, &FormRules)> {
        self.forms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Form mapped to a request path (query string ignored)
    pub fn form_for_route(&self, path: &str) -> Option<(&str, &FormRules)> {
        let path = path.split('?').next().unwrap_or(path);
        let name = self.routes.get(path)?;
        self.forms.get(name).map(|rules| (name.as_str(), rules))
    }

    pub fn routes(&self) -> &IndexMap<String, String> {
        &self.routes
    }

    pub fn policy(&self) -> &AdoptionPolicy {
        &self.policy
    }

    pub fn registry(&self) -> Arc<RuleRegistry> {
        Arc::clone(&self.registry)
    }

    /// Fresh validator over this catalog's registry
    pub fn validator(&self) -> FormValidator {
        FormValidator::with_registry(self.registry())
    }

    /// Generic pass over a named form, without business rules
    pub fn validate_form<S>(&self, name: &str, input: &S) -> Option<ValidationResult>
    where
        S: FormSource + ?Sized,
    {
        let rules = self.form(name)?;
        let mut validator = self.validator();
        validator.validate_form(rules, input);
        Some(validator.into_result())
    }

    pub fn validate_registration<S, D>(&self, input: &S, users: &D) -> ValidationResult
    where
        S: FormSource + ?Sized,
        D: UserDirectory + ?Sized,
    {
        hooks::registration_pass(
            self.validator(),
            &self.rules_or(forms::REGISTRATION, forms::registration),
            input,
            users,
        )
    }

    pub fn validate_login<S>(&self, input: &S) -> ValidationResult
    where
        S: FormSource + ?Sized,
    {
        let mut validator = self.validator();
        validator.validate_form(&self.rules_or(forms::LOGIN, forms::login), input);
        validator.into_result()
    }

    pub fn validate_adoption<S>(&self, input: &S) -> ValidationResult
    where
        S: FormSource + ?Sized,
    {
        hooks::adoption_pass(
            self.validator(),
            &self.rules_or(forms::ADOPTION, forms::adoption),
            input,
            &self.policy,
        )
    }

    pub fn validate_admin_registration<S, D>(&self, input: &S, admins: &D) -> ValidationResult
    where
        S: FormSource + ?Sized,
        D: UserDirectory + ?Sized,
    {
        hooks::admin_registration_pass(
            self.validator(),
            &self.rules_or(forms::ADMIN_REGISTRATION, forms::admin_registration),
            input,
            admins,
        )
    }

    fn rules_or(&self, name: &str, default: fn() -> FormRules) -> FormRules {
        self.forms.get(name).cloned().unwrap_or_else(default)
    }
}

impl Default for FormCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
