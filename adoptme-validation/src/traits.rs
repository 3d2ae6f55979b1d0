// Validation traits

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Submitted input a form is validated against.
pub trait FormSource {
    /// Raw value of a field, `None` when the key is absent
    fn field(&self, name: &str) -> Option<Value>;
}

impl<T: FormSource + ?Sized> FormSource for &T {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

impl FormSource for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).map(|v| Value::String(v.clone()))
    }
}

impl FormSource for HashMap<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl FormSource for IndexMap<String, String> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).map(|v| Value::String(v.clone()))
    }
}

impl FormSource for IndexMap<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl FormSource for Map<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Objects are read by key; any other JSON value has no fields.
impl FormSource for Value {
    fn field(&self, name: &str) -> Option<Value> {
        self.as_object().and_then(|map| map.get(name).cloned())
    }
}

impl FormSource for [(&str, &str)] {
    fn field(&self, name: &str) -> Option<Value> {
        self.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| Value::String(value.to_string()))
    }
}

/// Read-only view of existing accounts, used for uniqueness checks.
///
/// Whoever supplies it owns any locking; the validator only looks.
pub trait UserDirectory {
    fn email_registered(&self, email: &str) -> bool;

    fn username_registered(&self, _username: &str) -> bool {
        false
    }
}

impl<T: UserDirectory + ?Sized> UserDirectory for &T {
    fn email_registered(&self, email: &str) -> bool {
        (**self).email_registered(email)
    }

    fn username_registered(&self, username: &str) -> bool {
        (**self).username_registered(username)
    }
}

/// The parts of an account the uniqueness checks look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl UserRecord {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            username: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

fn any_email<'a>(mut users: impl Iterator<Item = &'a UserRecord>, email: &str) -> bool {
    users.any(|user| user.email == email)
}

fn any_username<'a>(mut users: impl Iterator<Item = &'a UserRecord>, username: &str) -> bool {
    users.any(|user| user.username.as_deref() == Some(username))
}

impl UserDirectory for [UserRecord] {
    fn email_registered(&self, email: &str) -> bool {
        any_email(self.iter(), email)
    }

    fn username_registered(&self, username: &str) -> bool {
        any_username(self.iter(), username)
    }
}

impl UserDirectory for Vec<UserRecord> {
    fn email_registered(&self, email: &str) -> bool {
        self.as_slice().email_registered(email)
    }

    fn username_registered(&self, username: &str) -> bool {
        self.as_slice().username_registered(username)
    }
}

impl<K> UserDirectory for HashMap<K, UserRecord> {
    fn email_registered(&self, email: &str) -> bool {
        any_email(self.values(), email)
    }

    fn username_registered(&self, username: &str) -> bool {
        any_username(self.values(), username)
    }
}

impl<K> UserDirectory for BTreeMap<K, UserRecord> {
    fn email_registered(&self, email: &str) -> bool {
        any_email(self.values(), email)
    }

    fn username_registered(&self, username: &str) -> bool {
        any_username(self.values(), username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_sources() {
        let mut strings = HashMap::new();
        strings.insert("email".to_string(), "a@b.com".to_string());
        assert_eq!(strings.field("email"), Some(json!("a@b.com")));
        assert_eq!(strings.field("nombre"), None);

        let body = json!({"edad": 3, "email": "a@b.com"});
        assert_eq!(body.field("edad"), Some(json!(3)));
        assert_eq!(json!([1, 2]).field("edad"), None);

        let pairs: &[(&str, &str)] = &[("vivienda", "casa"), ("vivienda", "finca")];
        assert_eq!(pairs.field("vivienda"), Some(json!("casa")));
    }

    #[test]
    fn test_user_directory_matches_exactly() {
        let users = vec![
            UserRecord::new("ana@refugio.org"),
            UserRecord::new("admin@refugio.org").with_username("admin_01"),
        ];

        assert!(users.email_registered("ana@refugio.org"));
        assert!(!users.email_registered("ANA@refugio.org"));
        assert!(users.username_registered("admin_01"));
        assert!(!users.username_registered("ana"));
    }

    #[test]
    fn test_user_directory_maps() {
        let mut users = HashMap::new();
        users.insert(1u32, UserRecord::new("ana@refugio.org"));
        assert!(users.email_registered("ana@refugio.org"));

        let by_name: BTreeMap<String, UserRecord> = BTreeMap::new();
        assert!(!by_name.email_registered("ana@refugio.org"));
    }
}
