//! Configuration file support for catalog-mapper.
//!
//! Provides YAML-based configuration through `catalog-mapper.config.yml`
//! files, and the merge of file values, command-line overrides and
//! defaults into the effective [`Settings`].

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::catalog::policies::{DEFAULT_PARTIAL_MATCH_THRESHOLD, TEMPLATE_COMPONENT_COUNT};
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "catalog-mapper.config.yml";

/// Environment variable holding the Admin API access token.
pub const ACCESS_TOKEN_ENV: &str = "SHOPIFY_ACCESS_TOKEN";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_API_VERSION: &str = "2024-10";
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 500;
pub const DEFAULT_GID_PREFIX: &str = "gid://shopify/Metaobject/";

/// Top-level configuration file schema.
///
/// The access token is deliberately not a field: it is read from the
/// environment only.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub data_dir: Option<PathBuf>,
    pub shop_domain: Option<String>,
    pub api_version: Option<String>,
    pub request_delay_ms: Option<u64>,
    pub gid_prefix: Option<String>,
    pub partial_match_threshold: Option<usize>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = if content.trim().is_empty() {
        ConfigFile::default()
    } else {
        serde_yaml_ng::from_str(&content).with_context(|| {
            format!(
                "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
                path.display()
            )
        })?
    };

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(threshold) = config.partial_match_threshold {
        if !(1..=TEMPLATE_COMPONENT_COUNT).contains(&threshold) {
            bail!(
                "Invalid config: partial_match_threshold must be between 1 and {}, got {}.\n\n\
                 💡 Hint: The default of {} accepts a configuration when 4 of its 6 components agree.",
                TEMPLATE_COMPONENT_COUNT,
                threshold,
                DEFAULT_PARTIAL_MATCH_THRESHOLD
            );
        }
    }
    if let Some(ref prefix) = config.gid_prefix {
        if prefix.trim().is_empty() {
            bail!(
                "Invalid config: gid_prefix must not be empty.\n\n\
                 💡 Hint: Use the identifier prefix of your platform, e.g. \"{}\".",
                DEFAULT_GID_PREFIX
            );
        }
    }
    if let Some(ref domain) = config.shop_domain {
        if domain.trim().is_empty() {
            bail!(
                "Invalid config: shop_domain must not be empty.\n\n\
                 💡 Hint: Remove the key or set it to your store domain (e.g., \"my-store.myshopify.com\")."
            );
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        tracing::warn!(field = %key, "unknown config field will be ignored");
    }
}

/// Values given on the command line; each one beats the config file.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub data_dir: Option<PathBuf>,
    pub shop_domain: Option<String>,
    pub api_version: Option<String>,
    pub request_delay_ms: Option<u64>,
    pub partial_match_threshold: Option<usize>,
}

/// Effective settings after merging overrides, config file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub shop_domain: Option<String>,
    pub api_version: String,
    pub request_delay_ms: u64,
    pub gid_prefix: String,
    pub partial_match_threshold: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(None, SettingsOverrides::default())
    }
}

impl Settings {
    pub fn resolve(file: Option<ConfigFile>, overrides: SettingsOverrides) -> Self {
        let file = file.unwrap_or_default();
        Self {
            data_dir: overrides
                .data_dir
                .or(file.data_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            shop_domain: overrides.shop_domain.or(file.shop_domain),
            api_version: overrides
                .api_version
                .or(file.api_version)
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            request_delay_ms: overrides
                .request_delay_ms
                .or(file.request_delay_ms)
                .unwrap_or(DEFAULT_REQUEST_DELAY_MS),
            gid_prefix: file
                .gid_prefix
                .unwrap_or_else(|| DEFAULT_GID_PREFIX.to_string()),
            partial_match_threshold: overrides
                .partial_match_threshold
                .or(file.partial_match_threshold)
                .unwrap_or(DEFAULT_PARTIAL_MATCH_THRESHOLD),
        }
    }
}

/// Reads the access token from the environment. Blank counts as unset.
pub fn access_token() -> Option<String> {
    std::env::var(ACCESS_TOKEN_ENV)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
data_dir: /srv/catalog
shop_domain: my-store.myshopify.com
api_version: "2025-01"
request_delay_ms: 250
gid_prefix: "gid://shopify/Metaobject/"
partial_match_threshold: 5
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/catalog")));
        assert_eq!(config.shop_domain.as_deref(), Some("my-store.myshopify.com"));
        assert_eq!(config.api_version.as_deref(), Some("2025-01"));
        assert_eq!(config.request_delay_ms, Some(250));
        assert_eq!(config.partial_match_threshold, Some(5));
        assert!(config.unknown_fields.is_empty());
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "request_delay_ms: 0\n").unwrap();

        let config = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.request_delay_ms, Some(0));
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.yml"));
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad.yml");
        fs::write(&config_path, "invalid: yaml: [[[broken").unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "partial_match_threshold: 7\n").unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("partial_match_threshold must be between 1 and 6"));
    }

    #[test]
    fn test_blank_gid_prefix_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "gid_prefix: \"  \"\n").unwrap();
        assert!(load_config_from_path(&config_path).is_err());
    }

    #[test]
    fn test_unknown_fields_are_kept_for_warning() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "access_token: secret\nshop: x\n").unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.unknown_fields.len(), 2);
        assert!(config.unknown_fields.contains_key("access_token"));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert_eq!(settings.api_version, "2024-10");
        assert_eq!(settings.request_delay_ms, 500);
        assert_eq!(settings.gid_prefix, "gid://shopify/Metaobject/");
        assert_eq!(settings.partial_match_threshold, 4);
        assert!(settings.shop_domain.is_none());
    }

    #[test]
    fn test_overrides_beat_file_values() {
        let file = ConfigFile {
            data_dir: Some(PathBuf::from("from-file")),
            request_delay_ms: Some(100),
            partial_match_threshold: Some(5),
            ..Default::default()
        };
        let overrides = SettingsOverrides {
            data_dir: Some(PathBuf::from("from-cli")),
            ..Default::default()
        };

        let settings = Settings::resolve(Some(file), overrides);
        assert_eq!(settings.data_dir, PathBuf::from("from-cli"));
        assert_eq!(settings.request_delay_ms, 100);
        assert_eq!(settings.partial_match_threshold, 5);
    }
}
