// Business-rule passes layered on the generic validator

use crate::{FormRules, FormSource, FormValidator, UserDirectory, ValidationResult, forms};
use adoptme_config::{DEFAULT_HOUSING_TYPES, ValidationSettings};
use serde_json::Value;
use tracing::debug;

pub const EMAIL_TAKEN: &str = "Este email ya está registrado";
pub const USERNAME_TAKEN: &str = "Este nombre de usuario ya está en uso";
pub const INVALID_HOUSING: &str = "Tipo de vivienda no válido";

/// Which `vivienda` values an adoption request may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdoptionPolicy {
    housing_types: Vec<String>,
}

impl AdoptionPolicy {
    pub fn new<I, S>(housing_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            housing_types: housing_types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_settings(settings: &ValidationSettings) -> Self {
        Self::new(settings.housing_types.iter().cloned())
    }

    pub fn housing_types(&self) -> &[String] {
        &self.housing_types
    }

    /// Exact, case-sensitive membership. Non-string values are never accepted.
    pub fn accepts(&self, housing: &Value) -> bool {
        housing
            .as_str()
            .is_some_and(|h| self.housing_types.iter().any(|t| t == h))
    }
}

impl Default for AdoptionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_HOUSING_TYPES)
    }
}

/// Registration pass: generic rules, then email uniqueness once they all pass.
pub fn validate_registration_data<S, D>(input: &S, users: &D) -> ValidationResult
where
    S: FormSource + ?Sized,
    D: UserDirectory + ?Sized,
{
    registration_pass(FormValidator::new(), &forms::registration(), input, users)
}

pub fn validate_login_data<S>(input: &S) -> ValidationResult
where
    S: FormSource + ?Sized,
{
    let mut validator = FormValidator::new();
    validator.validate_form(&forms::login(), input);
    validator.into_result()
}

/// Adoption pass with the default housing types.
pub fn validate_adoption_data<S>(input: &S) -> ValidationResult
where
    S: FormSource + ?Sized,
{
    validate_adoption_data_with(input, &AdoptionPolicy::default())
}

pub fn validate_adoption_data_with<S>(input: &S, policy: &AdoptionPolicy) -> ValidationResult
where
    S: FormSource + ?Sized,
{
    adoption_pass(FormValidator::new(), &forms::adoption(), input, policy)
}

/// Admin sign-up: generic rules, then email and username uniqueness once
/// they all pass.
pub fn validate_admin_registration_data<S, D>(input: &S, admins: &D) -> ValidationResult
where
    S: FormSource + ?Sized,
    D: UserDirectory + ?Sized,
{
    admin_registration_pass(
        FormValidator::new(),
        &forms::admin_registration(),
        input,
        admins,
    )
}

pub(crate) fn registration_pass<S, D>(
    mut validator: FormValidator,
    rules: &FormRules,
    input: &S,
    users: &D,
) -> ValidationResult
where
    S: FormSource + ?Sized,
    D: UserDirectory + ?Sized,
{
    let (valid, _) = validator.validate_form(rules, input);
    if valid {
        check_email_unique(&mut validator, users);
    }
    validator.into_result()
}

pub(crate) fn admin_registration_pass<S, D>(
    mut validator: FormValidator,
    rules: &FormRules,
    input: &S,
    admins: &D,
) -> ValidationResult
where
    S: FormSource + ?Sized,
    D: UserDirectory + ?Sized,
{
    let (valid, _) = validator.validate_form(rules, input);
    if !valid {
        return validator.into_result();
    }

    check_email_unique(&mut validator, admins);
    let taken = cleaned_str(&validator, "usuario").is_some_and(|u| admins.username_registered(u));
    if taken {
        debug!("username already registered");
        validator.add_error("usuario", USERNAME_TAKEN);
    }

    validator.into_result()
}

pub(crate) fn adoption_pass<S>(
    mut validator: FormValidator,
    rules: &FormRules,
    input: &S,
    policy: &AdoptionPolicy,
) -> ValidationResult
where
    S: FormSource + ?Sized,
{
    let (valid, cleaned) = validator.validate_form(rules, input);

    let rejected = valid
        && cleaned
            .get("vivienda")
            .is_some_and(|housing| !policy.accepts(housing));
    if rejected {
        validator.add_error("vivienda", INVALID_HOUSING);
    }

    validator.into_result()
}

fn check_email_unique<D>(validator: &mut FormValidator, users: &D)
where
    D: UserDirectory + ?Sized,
{
    let taken = cleaned_str(validator, "email").is_some_and(|e| users.email_registered(e));
    if taken {
        debug!("email already registered");
        validator.add_error("email", EMAIL_TAKEN);
    }
}

fn cleaned_str<'a>(validator: &'a FormValidator, field: &str) -> Option<&'a str> {
    validator
        .cleaned()
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
