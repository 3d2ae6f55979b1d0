// Request-side validation: body parsing, route mapping and form guards

use crate::response::{ValidationErrorResponse, validation_error_response};
use crate::{FormCatalog, FormRules, FormValidator, PipeError, Result, RuleRegistry};
use crate::validators::kind_name;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// The parts of an HTTP request the validation pipe reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FormRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// URL-encoded POST
    pub fn form(path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::new("POST", path)
            .with_content_type("application/x-www-form-urlencoded")
            .with_body(body)
    }

    /// JSON POST
    pub fn json(path: impl Into<String>, body: &Value) -> Self {
        Self::new("POST", path)
            .with_content_type("application/json")
            .with_body(body.to_string())
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn is_post(&self) -> bool {
        self.method.eq_ignore_ascii_case("POST")
    }

    /// `application/json` or any `application/*+json` type
    pub fn is_json(&self) -> bool {
        let Some(content_type) = &self.content_type else {
            return false;
        };
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
    }

    /// Path without the query string
    pub fn route(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }
}

/// Parse a submitted body into field values.
///
/// JSON bodies must be objects. Anything else is read as URL-encoded, where
/// the first value of a repeated key wins. An empty body has no fields.
pub fn parse_form_body(req: &FormRequest) -> Result<IndexMap<String, Value>> {
    if req.body.is_empty() {
        return Ok(IndexMap::new());
    }

    if req.is_json() {
        return match serde_json::from_slice::<Value>(&req.body)? {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(PipeError::NotAnObject(kind_name(&other))),
        };
    }

    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&req.body)?;
    let mut fields = IndexMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        fields.entry(key).or_insert(Value::String(value));
    }
    Ok(fields)
}

/// A user-facing message for the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: String,
    pub message: String,
}

/// One `error` flash per field: `"{Field}: {message}"`.
pub fn flash_errors(errors: &IndexMap<String, String>) -> Vec<Flash> {
    errors
        .iter()
        .map(|(field, message)| Flash {
            category: "error".to_string(),
            message: format!("{}: {}", title_case(field), message),
        })
        .collect()
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// What the pipe learned about a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestValidation {
    pub form: String,
    pub is_form_valid: bool,
    pub validated_data: IndexMap<String, Value>,
    pub validation_errors: IndexMap<String, String>,
}

impl RequestValidation {
    pub fn flashes(&self) -> Vec<Flash> {
        flash_errors(&self.validation_errors)
    }

    pub fn error_response(&self) -> ValidationErrorResponse {
        validation_error_response(self.validation_errors.clone(), 400)
    }
}

fn run_form(
    form: &str,
    rules: &FormRules,
    validator: &mut FormValidator,
    fields: &IndexMap<String, Value>,
) -> RequestValidation {
    let (is_form_valid, validated_data) = validator.validate_form(rules, fields);
    RequestValidation {
        form: form.to_string(),
        is_form_valid,
        validated_data,
        validation_errors: validator.errors().clone(),
    }
}

/// Validates POST submissions on the catalog's mapped routes.
///
/// Only the generic pass runs here; business rules stay with the handler.
#[derive(Debug, Clone)]
pub struct RouteValidator {
    catalog: Arc<FormCatalog>,
}

impl RouteValidator {
    pub fn new(catalog: Arc<FormCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FormCatalog {
        &self.catalog
    }

    /// `Ok(None)` for non-POST requests and unmapped paths.
    pub fn validate_request(&self, req: &FormRequest) -> Result<Option<RequestValidation>> {
        if !req.is_post() {
            return Ok(None);
        }
        let Some((form, rules)) = self.catalog.form_for_route(req.route()) else {
            return Ok(None);
        };

        let fields = parse_form_body(req)?;
        let validation = run_form(form, rules, &mut self.catalog.validator(), &fields);
        debug!(
            path = %req.route(),
            form,
            valid = validation.is_form_valid,
            "request validated"
        );
        Ok(Some(validation))
    }
}

impl Default for RouteValidator {
    fn default() -> Self {
        Self::new(Arc::new(FormCatalog::builtin()))
    }
}

/// Result of running a [`FormGuard`].
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    /// Hand the request on. Invalid non-JSON submissions without a redirect
    /// land here too; check `is_form_valid`.
    Continue(RequestValidation),
    /// Send the browser back with error flashes
    Redirect { location: String, flashes: Vec<Flash> },
    /// Answer a JSON submission with a 400
    Reject(ValidationErrorResponse),
}

/// Validates one form ahead of a handler.
///
/// ```
/// use adoptme_validation::{FormGuard, FormRequest, FormRules, GuardOutcome};
///
/// let guard = FormGuard::new(FormRules::new().field("email", "required|email"))
///     .redirect_on_error("/iniciar-sesion");
///
/// let req = FormRequest::form("/iniciar-sesion", "email=nope");
/// match guard.check(&req).unwrap() {
///     GuardOutcome::Redirect { location, flashes } => {
///         assert_eq!(location, "/iniciar-sesion");
///         assert_eq!(flashes[0].message, "Email: Ingresa un email válido");
///     }
///     other => panic!("unexpected outcome: {other:?}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FormGuard {
    form: String,
    rules: FormRules,
    registry: Arc<RuleRegistry>,
    redirect_on_error: Option<String>,
}

impl FormGuard {
    pub fn new(rules: FormRules) -> Self {
        Self {
            form: String::new(),
            rules,
            registry: RuleRegistry::shared(),
            redirect_on_error: None,
        }
    }

    /// Guard for a named catalog form, `None` if the catalog lacks it
    pub fn for_form(catalog: &FormCatalog, name: &str) -> Option<Self> {
        let rules = catalog.form(name)?.clone();
        Some(Self {
            form: name.to_string(),
            rules,
            registry: catalog.registry(),
            redirect_on_error: None,
        })
    }

    pub fn with_registry(mut self, registry: Arc<RuleRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn redirect_on_error(mut self, location: impl Into<String>) -> Self {
        self.redirect_on_error = Some(location.into());
        self
    }

    pub fn check(&self, req: &FormRequest) -> Result<GuardOutcome> {
        let fields = parse_form_body(req)?;
        let mut validator = FormValidator::with_registry(Arc::clone(&self.registry));
        let validation = run_form(&self.form, &self.rules, &mut validator, &fields);

        if validation.is_form_valid {
            return Ok(GuardOutcome::Continue(validation));
        }

        if let Some(location) = &self.redirect_on_error {
            return Ok(GuardOutcome::Redirect {
                location: location.clone(),
                flashes: validation.flashes(),
            });
        }

        if req.is_json() {
            return Ok(GuardOutcome::Reject(validation.error_response()));
        }

        Ok(GuardOutcome::Continue(validation))
    }
}
