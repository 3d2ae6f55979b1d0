// Environment variable loading

use crate::{ConfigError, Result};
use std::collections::HashMap;
use std::env;
use std::path::Path;

/// Prefix shared by every Adopt Me Now environment variable.
pub const ENV_PREFIX: &str = "ADOPTME";

/// Environment variable loader
///
/// Keys are returned lowercased with the prefix (and the following `_`)
/// stripped, so `ADOPTME_HOUSING_TYPES` becomes `housing_types`.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Loader for the `ADOPTME_` namespace
    pub fn adoptme() -> Self {
        Self::new(Some(ENV_PREFIX.to_string()))
    }

    /// Load all matching variables from the process environment
    pub fn load(&self) -> HashMap<String, String> {
        self.collect(env::vars())
    }

    /// Load `.env` into the process environment, then read it.
    ///
    /// A missing default `.env` is not an error; an explicit path that
    /// cannot be read is.
    pub fn load_dotenv(&self, path: Option<&Path>) -> Result<HashMap<String, String>> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Ok(self.load())
    }

    /// Filter and normalize an arbitrary set of key/value pairs
    pub fn collect<I, K, V>(&self, vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = HashMap::new();

        for (key, value) in vars {
            let key = key.as_ref();
            match self.prefix {
                Some(ref prefix) => {
                    let rest = key
                        .strip_prefix(prefix.as_str())
                        .and_then(|rest| rest.strip_prefix('_'));
                    if let Some(rest) = rest.filter(|rest| !rest.is_empty()) {
                        config.insert(rest.to_lowercase(), value.into());
                    }
                }
                None => {
                    config.insert(key.to_lowercase(), value.into());
                }
            }
        }

        config
    }

    /// Load a specific variable, applying the prefix
    pub fn load_var(&self, key: &str) -> Result<String> {
        env::var(self.full_key(key)).map_err(ConfigError::EnvError)
    }

    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }

    fn full_key(&self, key: &str) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::adoptme()
    }
}
