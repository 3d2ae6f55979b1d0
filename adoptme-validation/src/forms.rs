// Predefined Adopt Me Now forms

use crate::FormRules;
use indexmap::IndexMap;

pub const REGISTRATION: &str = "registration";
pub const LOGIN: &str = "login";
pub const ADOPTION: &str = "adoption";
pub const ADMIN_REGISTRATION: &str = "admin_registration";

/// User sign-up. `telefono` has no `required`, but `phone` still rejects an empty value.
pub fn registration() -> FormRules {
    FormRules::new()
        .field("nombre", "required|name")
        .field("email", "required|email")
        .field("telefono", "phone")
        .field("password", "required|password")
}

pub fn login() -> FormRules {
    FormRules::new()
        .field("email", "required|email")
        .field("password", "required")
}

/// Adoption request for a listed pet.
pub fn adoption() -> FormRules {
    FormRules::new()
        .field("nombre", "required|name")
        .field("email", "required|email")
        .field("telefono", "required|phone")
        .field("direccion", "required|min_length:5")
        .field("ocupacion", "required|min_length:2")
        .field("vivienda", "required")
        .field("mascotas", "required")
        .field("motivo", "required|min_length:10|max_length:500")
}

pub fn admin_registration() -> FormRules {
    FormRules::new()
        .field("usuario", "required|alphanumeric")
        .field("email", "required|email")
        .field("password", "required|password_strong")
        .field("nombre", "required|name")
        .field("cargo", "required|min_length:2")
}

/// Every predefined form keyed by name.
pub fn builtin_forms() -> IndexMap<String, FormRules> {
    IndexMap::from([
        (REGISTRATION.to_string(), registration()),
        (LOGIN.to_string(), login()),
        (ADOPTION.to_string(), adoption()),
        (ADMIN_REGISTRATION.to_string(), admin_registration()),
    ])
}

/// Request paths validated automatically on POST.
pub fn builtin_routes() -> IndexMap<String, String> {
    IndexMap::from([
        ("/registro".to_string(), REGISTRATION.to_string()),
        ("/iniciar-sesion".to_string(), LOGIN.to_string()),
        ("/formulario".to_string(), ADOPTION.to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleRegistry;

    #[test]
    fn test_builtin_forms_lint_clean() {
        let registry = RuleRegistry::builtin();
        for (name, form) in builtin_forms() {
            for (field, rules) in form.iter() {
                assert!(
                    registry.lint(rules).is_empty(),
                    "{name}.{field} has lint issues"
                );
            }
        }
    }

    #[test]
    fn test_routes_point_at_builtin_forms() {
        let forms = builtin_forms();
        for form in builtin_routes().values() {
            assert!(forms.contains_key(form));
        }
    }

    #[test]
    fn test_adoption_field_order() {
        let fields: Vec<_> = adoption().iter().map(|(name, _)| name.to_string()).collect();
        assert_eq!(
            fields,
            vec![
                "nombre", "email", "telefono", "direccion", "ocupacion", "vivienda", "mascotas",
                "motivo"
            ]
        );
    }
}
