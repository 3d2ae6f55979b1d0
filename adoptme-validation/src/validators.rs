// Built-in rule checkers

use crate::{CheckError, RuleParam};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// `Ok(false)` is a failed rule, `Err` a checker that could not run.
pub type CheckResult = Result<bool, CheckError>;

// Common regex patterns. Full-value patterns accept one trailing newline.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+\n?\z").unwrap());

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+]?[0-9\s\-()]{7,15}\n?\z").unwrap());

static NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑ\s]{2,50}$").unwrap());

static ALPHANUMERIC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,20}\n?\z").unwrap());

static UPPER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());

static LOWER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").unwrap());

static DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());

// Value helpers

/// `null`, `false`, zero, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Characters for strings, elements for arrays and objects.
pub fn length(value: &Value, rule: &str) -> Result<usize, CheckError> {
    match value {
        Value::String(s) => Ok(s.chars().count()),
        Value::Array(items) => Ok(items.len()),
        Value::Object(map) => Ok(map.len()),
        other => Err(CheckError::unsupported(rule, kind_name(other))),
    }
}

fn text<'a>(value: &'a Value, rule: &str) -> Result<&'a str, CheckError> {
    value
        .as_str()
        .ok_or_else(|| CheckError::unsupported(rule, kind_name(value)))
}

// Checkers

pub fn required(value: &Value) -> CheckResult {
    Ok(match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        other => is_truthy(other),
    })
}

pub fn email(value: &Value) -> CheckResult {
    if !is_truthy(value) {
        return Ok(false);
    }
    Ok(EMAIL_REGEX.is_match(text(value, "email")?))
}

/// Falsy values never reach the minimum.
pub fn min_length(value: &Value, min: &RuleParam) -> CheckResult {
    if !is_truthy(value) {
        return Ok(false);
    }
    let len = length(value, "min_length")?;
    let min = min.as_int("min_length")?;
    Ok(len as i64 >= min)
}

/// Falsy values never exceed the maximum.
pub fn max_length(value: &Value, max: &RuleParam) -> CheckResult {
    if !is_truthy(value) {
        return Ok(true);
    }
    let len = length(value, "max_length")?;
    let max = max.as_int("max_length")?;
    Ok(len as i64 <= max)
}

pub fn password(value: &Value) -> CheckResult {
    if !is_truthy(value) {
        return Ok(false);
    }
    Ok(length(value, "password")? >= 6)
}

/// At least 8 characters with an uppercase letter, a lowercase letter and a digit.
pub fn password_strong(value: &Value) -> CheckResult {
    if !is_truthy(value) || length(value, "password_strong")? < 8 {
        return Ok(false);
    }
    let value = text(value, "password_strong")?;
    Ok(UPPER_REGEX.is_match(value) && LOWER_REGEX.is_match(value) && DIGIT_REGEX.is_match(value))
}

pub fn phone(value: &Value) -> CheckResult {
    if !is_truthy(value) {
        return Ok(false);
    }
    Ok(PHONE_REGEX.is_match(text(value, "phone")?))
}

/// Letters (accented vowels and ñ included) and spaces, 2 to 50 characters
/// once trimmed.
pub fn name(value: &Value) -> CheckResult {
    if !is_truthy(value) {
        return Ok(false);
    }
    Ok(NAME_REGEX.is_match(text(value, "name")?.trim()))
}

pub fn alphanumeric(value: &Value) -> CheckResult {
    if !is_truthy(value) {
        return Ok(false);
    }
    Ok(ALPHANUMERIC_REGEX.is_match(text(value, "alphanumeric")?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!("0"), json!(" "), json!([0]), json!({"a": 1})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn test_required() {
        assert!(required(&json!("Ana")).unwrap());
        assert!(!required(&json!("")).unwrap());
        assert!(!required(&json!("   \t")).unwrap());
        assert!(!required(&json!(null)).unwrap());
        assert!(required(&json!(7)).unwrap());
        assert!(!required(&json!(0)).unwrap());
        assert!(!required(&json!([])).unwrap());
    }

    #[test]
    fn test_email() {
        assert!(email(&json!("a@b.com")).unwrap());
        assert!(email(&json!("ana.perez+adopta@refugio.org.co")).unwrap());
        assert!(!email(&json!("a@b")).unwrap());
        assert!(!email(&json!("a b@c.com")).unwrap());
        assert!(!email(&json!("")).unwrap());
        assert!(email(&json!(12)).is_err());
    }

    #[test]
    fn test_single_trailing_newline_is_tolerated() {
        assert!(email(&json!("a@b.com\n")).unwrap());
        assert!(!email(&json!("a@b.com\n\n")).unwrap());
        assert!(alphanumeric(&json!("admin_01\n")).unwrap());
        assert!(!alphanumeric(&json!("admin_01\nx")).unwrap());
    }

    #[test]
    fn test_length_bounds_asymmetry() {
        let five = RuleParam::Int(5);
        assert!(!min_length(&json!(""), &five).unwrap());
        assert!(max_length(&json!(""), &five).unwrap());

        assert!(min_length(&json!("Calle"), &five).unwrap());
        assert!(!min_length(&json!("Cll"), &five).unwrap());
        assert!(max_length(&json!("Calle"), &five).unwrap());
        assert!(!max_length(&json!("Calle 1"), &five).unwrap());
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(min_length(&json!("ñandú"), &RuleParam::Int(5)).unwrap());
        assert!(max_length(&json!("ñandú"), &RuleParam::Int(5)).unwrap());
        assert!(min_length(&json!(["a", "b"]), &RuleParam::Int(2)).unwrap());
    }

    #[test]
    fn test_length_errors() {
        let text_param = RuleParam::Text("abc".to_string());
        assert!(!min_length(&json!(""), &text_param).unwrap());
        assert!(matches!(
            min_length(&json!("hola"), &text_param),
            Err(CheckError::InvalidParam { .. })
        ));
        assert!(matches!(
            min_length(&json!(42), &RuleParam::Int(1)),
            Err(CheckError::UnsupportedValue { kind: "number", .. })
        ));
    }

    #[test]
    fn test_passwords() {
        assert!(password(&json!("abc123")).unwrap());
        assert!(!password(&json!("abc")).unwrap());
        assert!(password_strong(&json!("Abcdefg1")).unwrap());
        assert!(!password_strong(&json!("abcdefgh")).unwrap());
        assert!(!password_strong(&json!("ABCDEFG1")).unwrap());
        assert!(!password_strong(&json!("Abc1")).unwrap());
    }

    #[test]
    fn test_phone() {
        assert!(phone(&json!("(300) 123-4567")).unwrap());
        assert!(phone(&json!("3001234")).unwrap());
        assert!(!phone(&json!("123")).unwrap());
        assert!(!phone(&json!("300-ABC-4567")).unwrap());
    }

    #[test]
    fn test_name() {
        assert!(name(&json!("María José Núñez")).unwrap());
        assert!(name(&json!("  Ana  ")).unwrap());
        assert!(!name(&json!("A")).unwrap());
        assert!(!name(&json!("R2D2")).unwrap());
        assert!(!name(&json!("x".repeat(51))).unwrap());
    }

    #[test]
    fn test_alphanumeric() {
        assert!(alphanumeric(&json!("admin_01")).unwrap());
        assert!(!alphanumeric(&json!("ad")).unwrap());
        assert!(!alphanumeric(&json!("admin-01")).unwrap());
    }
}
