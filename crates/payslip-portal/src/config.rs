//! RON configuration for the payslip portal
//!
//! Every field has a default, so an empty `()` file is a valid config.
//!
//! ```ron
//! (
//!     database_path: "data/payslips.db",
//!     schema_version: 2,
//!     admin_secret: "agropalma2024",
//!     export_dir: "exports",
//!     download_dir: "downloads",
//!     log_filter: "info",
//!     employees: Some({
//!         "1234567890": (name: "Juan Pérez", email: Some("juan.perez@agropalm.com")),
//!     }),
//! )
//! ```

use payslip_core::EmployeeDirectory;
use payslip_db::SchemaVersion;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "PAYSLIP_CONFIG";

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Schema version to open the store at
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Plaintext admin password (cosmetic, see `AdminGate`)
    #[serde(default = "default_admin_secret")]
    pub admin_secret: String,
    /// Where exports are written
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    /// Where downloads are written
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Employee directory override; the built-in roster when absent
    #[serde(default)]
    pub employees: Option<EmployeeDirectory>,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("payslips.db")
}

fn default_schema_version() -> u32 {
    SchemaVersion::CURRENT.number()
}

fn default_admin_secret() -> String {
    "agropalma2024".to_string()
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            schema_version: default_schema_version(),
            admin_secret: default_admin_secret(),
            export_dir: default_export_dir(),
            download_dir: default_download_dir(),
            log_filter: default_log_filter(),
            employees: None,
        }
    }
}

impl Config {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    /// Parse configuration from RON text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, else from `$PAYSLIP_CONFIG`, else defaults
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    /// Schema version as a typed value
    pub fn schema_version(&self) -> Result<SchemaVersion, ConfigError> {
        SchemaVersion::from_number(self.schema_version).ok_or_else(|| {
            ConfigError::Validation(format!(
                "unsupported schema_version {}",
                self.schema_version
            ))
        })
    }

    /// The configured directory, or the built-in roster
    pub fn directory(&self) -> EmployeeDirectory {
        self.employees.clone().unwrap_or_default()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.schema_version()?;
        if self.admin_secret.is_empty() {
            return Err(ConfigError::Validation(
                "admin_secret must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("()").unwrap();
        assert_eq!(config.database_path, PathBuf::from("payslips.db"));
        assert_eq!(config.schema_version().unwrap(), SchemaVersion::CURRENT);
        assert_eq!(config.directory(), EmployeeDirectory::default());
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"(
                database_path: "data/p.db",
                schema_version: 1,
                admin_secret: "s3cret",
                log_filter: "debug",
                employees: Some({ "42": (name: "Ana Ruiz") }),
            )"#,
        )
        .unwrap();

        assert_eq!(config.schema_version().unwrap(), SchemaVersion::V1);
        assert_eq!(config.admin_secret, "s3cret");
        assert_eq!(config.directory().display_name("42"), "Ana Ruiz");
        assert_eq!(config.directory().display_name("1234567890"), "Empleado");
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            Config::parse("(schema_version: 7)"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            Config::parse(r#"(admin_secret: "")"#),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(Config::parse("(nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("portal.ron");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, r#"(export_dir: "out")"#).unwrap();

        let config = Config::resolve(Some(&path)).unwrap();
        assert_eq!(config.export_dir, PathBuf::from("out"));
        assert!(matches!(
            Config::load(dir.path().join("missing.ron")),
            Err(ConfigError::Io(_))
        ));
    }
}
