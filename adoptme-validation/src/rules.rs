// Rule grammar and the checker registry

use crate::validators::{self, CheckResult};
use crate::CheckError;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Message used by rules registered without one.
pub const DEFAULT_MESSAGE: &str = "Campo inválido";

/// Parameter of a rule token, `5` in `min_length:5`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleParam {
    Int(i64),
    Text(String),
}

impl RuleParam {
    /// ASCII digits that fit an `i64` become `Int`, anything else stays `Text`.
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse() {
                return RuleParam::Int(n);
            }
        }
        RuleParam::Text(raw.to_string())
    }

    pub fn as_int(&self, rule: &str) -> Result<i64, CheckError> {
        match self {
            RuleParam::Int(n) => Ok(*n),
            RuleParam::Text(text) => Err(CheckError::InvalidParam {
                rule: rule.to_string(),
                param: text.clone(),
            }),
        }
    }

    /// Zero and the empty string are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            RuleParam::Int(n) => *n != 0,
            RuleParam::Text(text) => !text.is_empty(),
        }
    }
}

impl fmt::Display for RuleParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleParam::Int(n) => write!(f, "{}", n),
            RuleParam::Text(text) => f.write_str(text),
        }
    }
}

/// One `name[:param]` token of a rule-string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleToken {
    pub name: String,
    pub param: Option<RuleParam>,
}

impl RuleToken {
    /// Split on the first `:`. Nothing is trimmed.
    pub fn parse(token: &str) -> Self {
        match token.split_once(':') {
            Some((name, param)) => Self {
                name: name.to_string(),
                param: Some(RuleParam::parse(param)),
            },
            None => Self {
                name: token.to_string(),
                param: None,
            },
        }
    }
}

/// Parse a pipe-delimited rule-string such as `required|min_length:5`.
///
/// An empty rule-string has no tokens.
pub fn parse_rule_string(rules: &str) -> Vec<RuleToken> {
    if rules.is_empty() {
        return Vec::new();
    }
    rules.split('|').map(RuleToken::parse).collect()
}

/// What parameter a rule takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    None,
    Integer,
    /// Any parameter, handed to the checker as parsed
    Any,
}

impl ParamKind {
    /// Presence check, run before the checker sees the value.
    pub fn check_presence(&self, rule: &str, param: Option<&RuleParam>) -> Result<(), CheckError> {
        match (self, param) {
            (ParamKind::None, Some(_)) => Err(CheckError::unexpected_param(rule)),
            (ParamKind::Integer | ParamKind::Any, None) => Err(CheckError::missing_param(rule)),
            _ => Ok(()),
        }
    }

    /// Presence plus type, used when linting rule-strings ahead of time.
    pub fn check(&self, rule: &str, param: Option<&RuleParam>) -> Result<(), CheckError> {
        self.check_presence(rule, param)?;
        if let (ParamKind::Integer, Some(param)) = (self, param) {
            param.as_int(rule)?;
        }
        Ok(())
    }
}

pub type CheckFn = dyn Fn(&Value, Option<&RuleParam>) -> CheckResult + Send + Sync;

/// A registered rule: checker, parameter kind and failure message.
#[derive(Clone)]
pub struct RuleEntry {
    checker: Arc<CheckFn>,
    param: ParamKind,
    message: String,
    fallback: Option<String>,
}

impl RuleEntry {
    pub fn new<F>(param: ParamKind, checker: F) -> Self
    where
        F: Fn(&Value, Option<&RuleParam>) -> CheckResult + Send + Sync + 'static,
    {
        Self {
            checker: Arc::new(checker),
            param,
            message: DEFAULT_MESSAGE.to_string(),
            fallback: None,
        }
    }

    /// Rule without a parameter.
    pub fn plain(checker: fn(&Value) -> CheckResult) -> Self {
        Self::new(ParamKind::None, move |value, _| checker(value))
    }

    /// Rule with an integer parameter.
    pub fn bounded(rule: &'static str, checker: fn(&Value, &RuleParam) -> CheckResult) -> Self {
        Self::new(ParamKind::Integer, move |value, param| match param {
            Some(param) => checker(value, param),
            None => Err(CheckError::missing_param(rule)),
        })
    }

    /// Failure message; `{param}` is replaced by the token's parameter.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Message used instead when the parameter is missing or falsy.
    pub fn with_fallback(mut self, message: impl Into<String>) -> Self {
        self.fallback = Some(message.into());
        self
    }

    pub fn param_kind(&self) -> ParamKind {
        self.param
    }

    pub fn check(&self, rule: &str, value: &Value, param: Option<&RuleParam>) -> CheckResult {
        self.param.check_presence(rule, param)?;
        (self.checker)(value, param)
    }

    pub fn message(&self, param: Option<&RuleParam>) -> String {
        match (param.filter(|p| p.is_truthy()), &self.fallback) {
            (Some(param), _) => self.message.replace("{param}", &param.to_string()),
            (None, Some(fallback)) => fallback.clone(),
            (None, None) => self.message.clone(),
        }
    }
}

impl fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEntry")
            .field("param", &self.param)
            .field("message", &self.message)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

/// Something a rule-string contains that will not behave as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintIssue {
    /// Skipped at validation time
    UnknownRule(String),
    /// Turns into a checker exception at validation time
    Param(CheckError),
}

impl LintIssue {
    pub fn is_fatal(&self) -> bool {
        matches!(self, LintIssue::Param(_))
    }
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintIssue::UnknownRule(name) => write!(f, "unknown rule '{}'", name),
            LintIssue::Param(err) => write!(f, "{}", err),
        }
    }
}

static BUILTIN: Lazy<Arc<RuleRegistry>> = Lazy::new(|| Arc::new(RuleRegistry::builtin()));

/// Rule name → checker.
///
/// Names are matched lowercased. A name with no entry is skipped by the
/// validator, so a misspelled rule silently passes; [`RuleRegistry::lint`]
/// is the way to catch those ahead of time.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, RuleEntry>,
}

impl RuleRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in rule
    pub fn builtin() -> Self {
        Self::new()
            .with_rule(
                "required",
                RuleEntry::plain(validators::required).with_message("Este campo es obligatorio"),
            )
            .with_rule(
                "email",
                RuleEntry::plain(validators::email).with_message("Ingresa un email válido"),
            )
            .with_rule(
                "min_length",
                RuleEntry::bounded("min_length", validators::min_length)
                    .with_message("Mínimo {param} caracteres")
                    .with_fallback("Muy corto"),
            )
            .with_rule(
                "max_length",
                RuleEntry::bounded("max_length", validators::max_length)
                    .with_message("Máximo {param} caracteres")
                    .with_fallback("Muy largo"),
            )
            .with_rule(
                "password",
                RuleEntry::plain(validators::password)
                    .with_message("La contraseña debe tener al menos 6 caracteres"),
            )
            .with_rule(
                "password_strong",
                RuleEntry::plain(validators::password_strong)
                    .with_message("Contraseña débil. Incluye mayúsculas, minúsculas y números"),
            )
            .with_rule(
                "phone",
                RuleEntry::plain(validators::phone).with_message("Ingresa un teléfono válido"),
            )
            .with_rule(
                "name",
                RuleEntry::plain(validators::name)
                    .with_message("Solo letras y espacios, entre 2 y 50 caracteres"),
            )
            .with_rule(
                "alphanumeric",
                RuleEntry::plain(validators::alphanumeric)
                    .with_message("Solo letras, números y guiones bajos (3-20 caracteres)"),
            )
    }

    /// The built-in registry, built once and shared.
    pub fn shared() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    pub fn register(&mut self, name: impl Into<String>, entry: RuleEntry) {
        self.rules.insert(name.into().to_lowercase(), entry);
    }

    pub fn with_rule(mut self, name: impl Into<String>, entry: RuleEntry) -> Self {
        self.register(name, entry);
        self
    }

    /// Register a parameterless predicate, like the browser-side `addRule`.
    pub fn add_rule<F>(&mut self, name: impl Into<String>, test: F, message: Option<&str>)
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let entry = RuleEntry::new(ParamKind::None, move |value, _| Ok(test(value)))
            .with_message(message.unwrap_or(DEFAULT_MESSAGE));
        self.register(name, entry);
    }

    pub fn get(&self, name: &str) -> Option<&RuleEntry> {
        self.rules.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Report unknown rules and parameter mismatches without validating a value.
    pub fn lint(&self, rules: &str) -> Vec<LintIssue> {
        parse_rule_string(rules)
            .into_iter()
            .filter_map(|token| match self.get(&token.name) {
                None => Some(LintIssue::UnknownRule(token.name)),
                Some(entry) => entry
                    .param_kind()
                    .check(&token.name, token.param.as_ref())
                    .err()
                    .map(LintIssue::Param),
            })
            .collect()
    }
}
