//! Configuration management for Adopt Me Now
//!
//! Loads [`ValidationSettings`] from JSON, TOML or `.env` files and from
//! `ADOPTME_*` environment variables.
//!
//! ```
//! use adoptme_config::{FileFormat, ValidationSettings};
//!
//! let settings = ValidationSettings::parse(
//!     r#"housing_types = ["casa", "finca"]"#,
//!     FileFormat::Toml,
//! )
//! .unwrap();
//!
//! assert_eq!(settings.housing_types, vec!["casa", "finca"]);
//! ```

pub mod env;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use env::{EnvLoader, ENV_PREFIX};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use settings::{ValidationSettings, DEFAULT_HOUSING_TYPES};
pub use validation::{ConfigValidator, Validate};
