// Validation settings document

use crate::validation::{ConfigValidator, Validate};
use crate::{ConfigError, ConfigLoader, EnvLoader, FileFormat, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Housing types the adoption form accepts out of the box.
pub const DEFAULT_HOUSING_TYPES: [&str; 4] = ["casa", "apartamento", "finca", "otro"];

/// Tunable parts of form validation.
///
/// Every field defaults to the built-in behavior, so an empty document is a
/// valid configuration. `forms` and `routes` are overlays: entries replace
/// built-in forms or routes with the same name and add new ones.
///
/// ```toml
/// housing_types = ["casa", "apartamento", "finca", "otro", "granja"]
///
/// [forms.contacto]
/// email = "required|email"
/// mensaje = "required|min_length:10|max_length:1000"
///
/// [routes]
/// "/contacto" = "contacto"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Accepted values of the adoption form's `vivienda` field
    pub housing_types: Vec<String>,

    /// Form name → (field name → rule-string)
    pub forms: IndexMap<String, IndexMap<String, String>>,

    /// Request path → form name
    pub routes: IndexMap<String, String>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            housing_types: DEFAULT_HOUSING_TYPES.iter().map(|s| s.to_string()).collect(),
            forms: IndexMap::new(),
            routes: IndexMap::new(),
        }
    }
}

impl ValidationSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate settings from a JSON, TOML or `.env` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let loader = ConfigLoader::auto(path)?;
        let value = loader.load_file(path)?;
        debug!(path = %path.display(), format = ?loader.format(), "loaded validation settings");

        let settings = Self::from_loaded(value, loader.format())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse and validate settings from in-memory content
    pub fn parse(content: &str, format: FileFormat) -> Result<Self> {
        let value = ConfigLoader::new(format).parse(content)?;
        let settings = Self::from_loaded(value, format)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read `ADOPTME_*` variables from the process environment
    pub fn from_env() -> Result<Self> {
        let settings = Self::from_env_vars(&EnvLoader::adoptme().load());
        settings.validate()?;
        Ok(settings)
    }

    /// Build settings from prefix-stripped, lowercased variables.
    ///
    /// Only `housing_types` (a comma separated list) is read; forms and
    /// routes need a structured file.
    pub fn from_env_vars(vars: &HashMap<String, String>) -> Self {
        let mut settings = Self::default();

        if let Some(list) = vars.get("housing_types") {
            settings.housing_types = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        settings
    }

    fn from_loaded(value: Value, format: FileFormat) -> Result<Self> {
        match format {
            FileFormat::Env => {
                let pairs = value
                    .as_object()
                    .into_iter()
                    .flatten()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())));
                Ok(Self::from_env_vars(&EnvLoader::adoptme().collect(pairs)))
            }
            FileFormat::Json | FileFormat::Toml => serde_json::from_value(value)
                .map_err(|e| ConfigError::DeserializationError(e.to_string())),
        }
    }

    pub fn with_housing_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.housing_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_form<I, K, V>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.forms.insert(name.into(), fields);
        self
    }

    pub fn with_route(mut self, path: impl Into<String>, form: impl Into<String>) -> Self {
        self.routes.insert(path.into(), form.into());
        self
    }
}

impl Validate for ValidationSettings {
    fn validate(&self) -> Result<()> {
        ConfigValidator::not_empty(&self.housing_types, "housing_types")?;
        for housing in &self.housing_types {
            ConfigValidator::not_blank(housing, "housing_types entry")?;
        }

        for (form, fields) in &self.forms {
            ConfigValidator::not_blank(form, "form name")?;
            for field in fields.keys() {
                ConfigValidator::not_blank(field, &format!("field name in form '{}'", form))?;
            }
        }

        for (path, form) in &self.routes {
            ConfigValidator::is_route_path(path, "route")?;
            ConfigValidator::not_blank(form, &format!("form for route '{}'", path))?;
        }

        Ok(())
    }
}
