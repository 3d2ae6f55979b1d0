//! Integration tests for adoptme-validation

use adoptme_validation::*;
use serde_json::{Value, json};
use std::collections::HashMap;

fn strings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_field_examples() {
    let mut validator = FormValidator::new();

    assert!(!validator.validate_field("x", &json!(""), "required"));
    assert_eq!(validator.errors()["x"], "Este campo es obligatorio");

    assert!(!validator.validate_field("email", &json!("a@b"), "email"));
    assert!(validator.validate_field("email", &json!("a@b.com"), "email"));
    assert_eq!(validator.cleaned()["email"], "a@b.com");

    assert!(validator.validate_field("pw", &json!("abc123"), "password"));
    assert!(!validator.validate_field("pw", &json!("abc"), "password"));

    assert!(validator.validate_field("pw2", &json!("Abcdefg1"), "password_strong"));
    assert!(!validator.validate_field("pw2", &json!("abcdefgh"), "password_strong"));

    assert!(!validator.validate_field("n", &json!(""), "required|name"));
    assert_eq!(validator.errors()["n"], "Este campo es obligatorio");

    assert!(validator.validate_field("x", &json!("anything"), "required|bogus_rule"));

    assert!(validator.validate_field("n", &json!("  Ana  "), "required|name"));
    assert_eq!(validator.cleaned()["n"], "Ana");
}

#[test]
fn test_every_visited_field_lands_in_exactly_one_map() {
    let rules = forms::adoption().field("comentarios", "");
    let inputs = [
        json!({}),
        json!({"nombre": "Ana", "email": "x", "vivienda": "casa"}),
        json!({
            "nombre": "Laura Gómez",
            "email": "laura@correo.com",
            "telefono": "300 123 4567",
            "direccion": "Calle 10 # 5-20",
            "ocupacion": "Docente",
            "vivienda": "finca",
            "mascotas": "no",
            "motivo": "Quiero darle un hogar a un perro adulto.",
            "comentarios": "ninguno",
        }),
    ];

    for input in &inputs {
        let mut validator = FormValidator::new();
        validator.validate_form(&rules, input);

        for (field, field_rules) in rules.iter() {
            let in_errors = validator.errors().contains_key(field);
            let in_cleaned = validator.cleaned().contains_key(field);
            if field_rules.is_empty() {
                assert!(!in_errors && !in_cleaned, "{field} should be untouched");
            } else {
                assert!(in_errors ^ in_cleaned, "{field} must be in exactly one map");
            }
        }
    }
}

#[test]
fn test_form_input_from_string_map() {
    let input = strings(&[
        ("email", " ana@correo.com "),
        ("password", "x"),
    ]);

    let (valid, errors, cleaned) = validate_login_data(&input).into_parts();
    assert!(!valid);
    assert_eq!(errors["email"], "Ingresa un email válido");
    assert_eq!(cleaned["password"], "x");
}

#[test]
fn test_adoption_from_url_encoded_body() {
    let body = "nombre=Laura+G%C3%B3mez&email=laura%40correo.com&telefono=3001234567\
                &direccion=Calle+10&ocupacion=Docente&vivienda=caba%C3%B1a&mascotas=no\
                &motivo=Tengo+un+patio+grande";
    let fields = parse_form_body(&FormRequest::form("/formulario", body)).unwrap();

    let result = validate_adoption_data(&fields);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.error("vivienda"), Some(INVALID_HOUSING));
    assert_eq!(result.cleaned["nombre"], "Laura Gómez");
}

#[test]
fn test_adoption_motivo_bounds() {
    let mut input = json!({
        "nombre": "Laura",
        "email": "laura@correo.com",
        "telefono": "3001234567",
        "direccion": "Calle 10",
        "ocupacion": "Docente",
        "vivienda": "casa",
        "mascotas": "no",
        "motivo": "corto",
    });
    assert_eq!(
        validate_adoption_data(&input).error("motivo"),
        Some("Mínimo 10 caracteres")
    );

    input["motivo"] = Value::String("a".repeat(501));
    assert_eq!(
        validate_adoption_data(&input).error("motivo"),
        Some("Máximo 500 caracteres")
    );

    input["motivo"] = Value::String("a".repeat(500));
    assert!(validate_adoption_data(&input).valid);
}

#[test]
fn test_registration_against_map_directory() {
    let mut users = HashMap::new();
    users.insert(1, UserRecord::new("ana@correo.com"));

    let input = strings(&[
        ("nombre", "Ana Núñez"),
        ("email", "ana@correo.com"),
        ("telefono", "+57 3001234567"),
        ("password", "secreto"),
    ]);

    let first = validate_registration_data(&input, &users);
    let second = validate_registration_data(&input, &users);
    assert_eq!(first, second);
    assert_eq!(first.errors.len(), 1);
    assert_eq!(first.error("email"), Some(EMAIL_TAKEN));
    assert_eq!(users.len(), 1);
}

#[test]
fn test_pipeline_with_configured_catalog() {
    let settings = adoptme_config::ValidationSettings::new()
        .with_form(
            "contacto",
            [("email", "required|email"), ("mensaje", "required|min_length:10")],
        )
        .with_route("/contacto", "contacto");
    let catalog = std::sync::Arc::new(FormCatalog::from_settings(&settings).unwrap());
    let router = RouteValidator::new(catalog);

    let req = FormRequest::json("/contacto", &json!({"email": "a@b.com", "mensaje": "hola"}));
    let validation = router.validate_request(&req).unwrap().unwrap();
    assert!(!validation.is_form_valid);

    let response = validation.error_response();
    assert_eq!(response.message, VALIDATION_FAILED);
    assert_eq!(response.errors["mensaje"], "Mínimo 10 caracteres");
    assert_eq!(response.status_code, 400);
}

#[test]
fn test_error_response_serializes() {
    let result = validate_login_data(&json!({"email": "a@b.com"}));
    let response = validation_error_response(result.errors, 422);

    let body: Value = serde_json::from_slice(&response.body().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Errores de validación encontrados",
            "errors": {"password": "Este campo es obligatorio"},
            "status_code": 422,
        })
    );
}

#[test]
fn test_business_rules_wait_for_generic_pass() {
    let users = vec![UserRecord::new("ana@correo.com")];
    let input = strings(&[
        ("nombre", ""),
        ("email", "ana@correo.com"),
        ("telefono", "3001234567"),
        ("password", "secreto"),
    ]);

    let (valid, errors, _) = validate_registration_data(&input, &users).into_parts();
    assert!(!valid);
    assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["nombre"]);
}
