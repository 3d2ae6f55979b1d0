// Rule-string form validator

use crate::rules::{parse_rule_string, RuleRegistry};
use crate::FormSource;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Prefix of the message recorded when a checker cannot run.
pub const CHECK_ERROR_PREFIX: &str = "Error de validación";

/// Field name → rule-string, validated in definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormRules {
    fields: IndexMap<String, String>,
}

impl FormRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field (builder style)
    pub fn field(mut self, name: impl Into<String>, rules: impl Into<String>) -> Self {
        self.insert(name, rules);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, rules: impl Into<String>) {
        self.fields.insert(name.into(), rules.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormRules {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<IndexMap<String, String>> for FormRules {
    fn from(fields: IndexMap<String, String>) -> Self {
        Self { fields }
    }
}

/// Outcome of validating one form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// First failing rule's message per field
    pub errors: IndexMap<String, String>,
    /// Trimmed values of the fields that passed
    pub cleaned: IndexMap<String, Value>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// `(valid, errors, cleaned)`
    pub fn into_parts(self) -> (bool, IndexMap<String, String>, IndexMap<String, Value>) {
        (self.valid, self.errors, self.cleaned)
    }
}

/// Per-call validator holding the errors and cleaned values of one pass.
///
/// Build one per request; the maps are not meant to be shared.
///
/// ```
/// use adoptme_validation::FormValidator;
/// use serde_json::json;
///
/// let mut validator = FormValidator::new();
/// assert!(validator.validate_field("n", &json!("  Ana  "), "required|name"));
/// assert_eq!(validator.cleaned()["n"], "Ana");
///
/// assert!(!validator.validate_field("x", &json!(""), "required"));
/// assert_eq!(validator.errors()["x"], "Este campo es obligatorio");
/// ```
#[derive(Debug, Clone)]
pub struct FormValidator {
    registry: Arc<RuleRegistry>,
    errors: IndexMap<String, String>,
    cleaned: IndexMap<String, Value>,
}

impl FormValidator {
    /// Validator over the built-in rules
    pub fn new() -> Self {
        Self::with_registry(RuleRegistry::shared())
    }

    pub fn with_registry(registry: Arc<RuleRegistry>) -> Self {
        Self {
            registry,
            errors: IndexMap::new(),
            cleaned: IndexMap::new(),
        }
    }

    /// Run a rule-string against one value.
    ///
    /// Stops at the first failing rule. Unknown rule names are skipped. An
    /// empty rule-string leaves the field out of both maps.
    pub fn validate_field(&mut self, field: &str, value: &Value, rules: &str) -> bool {
        if rules.is_empty() {
            return true;
        }

        for token in parse_rule_string(rules) {
            let Some(entry) = self.registry.get(&token.name) else {
                debug!(field, rule = %token.name, "skipping unknown rule");
                continue;
            };

            match entry.check(&token.name, value, token.param.as_ref()) {
                Ok(true) => {}
                Ok(false) => {
                    let message = entry.message(token.param.as_ref());
                    self.reject(field, message);
                    return false;
                }
                Err(e) => {
                    warn!(field, rule = %token.name, error = %e, "rule checker failed");
                    self.reject(field, format!("{}: {}", CHECK_ERROR_PREFIX, e));
                    return false;
                }
            }
        }

        self.errors.shift_remove(field);
        self.cleaned.insert(field.to_string(), clean_value(value));
        true
    }

    /// Validate every field of `rules`, reading values from `data`.
    ///
    /// Both maps are reset first. Missing keys read as `""`.
    pub fn validate_form<S>(&mut self, rules: &FormRules, data: &S) -> (bool, IndexMap<String, Value>)
    where
        S: FormSource + ?Sized,
    {
        self.errors.clear();
        self.cleaned.clear();

        for (field, field_rules) in rules.iter() {
            let value = data
                .field(field)
                .unwrap_or_else(|| Value::String(String::new()));
            self.validate_field(field, &value, field_rules);
        }

        debug!(
            fields = rules.len(),
            errors = self.errors.len(),
            "form validated"
        );

        (self.is_valid(), self.cleaned.clone())
    }

    pub fn errors(&self) -> &IndexMap<String, String> {
        &self.errors
    }

    pub fn cleaned(&self) -> &IndexMap<String, Value> {
        &self.cleaned
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record a business-rule failure. The field leaves `cleaned`.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        self.cleaned.shift_remove(&field);
        self.errors.insert(field, message.into());
    }

    pub fn into_result(self) -> ValidationResult {
        ValidationResult {
            valid: self.errors.is_empty(),
            errors: self.errors,
            cleaned: self.cleaned,
        }
    }

    fn reject(&mut self, field: &str, message: String) {
        self.cleaned.shift_remove(field);
        self.errors.insert(field.to_string(), message);
    }
}

impl Default for FormValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn clean_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_string()),
        other => other.clone(),
    }
}
