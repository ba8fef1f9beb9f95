//! Configuration management for gateaccess

use crate::contact::ColumnMap;
use crate::grant::NameQuoting;
use crate::location::{CollisionPolicy, DEFAULT_LOCATIONS_KEY};
use crate::resolve::Strategy;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration values that cannot work
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("locations_key must not be empty")]
    EmptyLocationsKey,

    #[error("column list '{0}' must name at least one column")]
    EmptyColumnList(&'static str),
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How contacts are matched to locations
    pub strategy: Strategy,
    /// Which location owns a key registered twice (text strategy)
    pub collision_policy: CollisionPolicy,
    /// Quoting of the client name in statements
    pub client_name_quoting: NameQuoting,
    /// Key of the location list in the JSON document
    pub locations_key: String,
    /// Locations file used when none is given on the command line
    pub default_locations_path: String,
    /// Output file used when none is given on the command line
    pub default_output_path: String,
    /// Contact source column names
    pub columns: ColumnMap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            collision_policy: CollisionPolicy::default(),
            client_name_quoting: NameQuoting::default(),
            locations_key: DEFAULT_LOCATIONS_KEY.to_string(),
            default_locations_path: "locations.json".to_string(),
            default_output_path: "restore_access_final.sql".to_string(),
            columns: ColumnMap::default(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            let config: Self = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))?;
            config
                .validate()
                .with_context(|| format!("Invalid config in {:?}", config_path))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<&str>) -> Result<PathBuf> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;
        Ok(config_path)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "gateaccess", "gateaccess")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Reject settings that would silently resolve nothing
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.locations_key.trim().is_empty() {
            return Err(ConfigError::EmptyLocationsKey);
        }

        let chains = [
            ("columns.client_phone", &self.columns.client_phone),
            ("columns.storage_location", &self.columns.storage_location),
            ("columns.storage_number", &self.columns.storage_number),
            ("columns.gate_phone", &self.columns.gate_phone),
        ];
        for (name, chain) in chains {
            if chain.is_empty() {
                return Err(ConfigError::EmptyColumnList(name));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::FieldChain;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.strategy, Strategy::Text);
        assert_eq!(config.collision_policy, CollisionPolicy::LastWriteWins);
        assert_eq!(config.client_name_quoting, NameQuoting::Verbatim);
        assert_eq!(config.locations_key, "locations");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            strategy = "positional"
            client_name_quoting = "escaped"

            [columns]
            gate_phone = ["Vārtu tālrunis"]
            "#,
        )
        .unwrap();
        assert_eq!(config.strategy, Strategy::Positional);
        assert_eq!(config.client_name_quoting, NameQuoting::Escaped);
        assert_eq!(config.columns.gate_phone, FieldChain::new(["Vārtu tālrunis"]));
        assert_eq!(config.columns.first_name, "First Name");
        assert_eq!(config.default_output_path, "restore_access_final.sql");
    }

    #[test]
    fn test_collision_policy_spelling() {
        let config: Config = toml::from_str(r#"collision_policy = "first-write-wins""#).unwrap();
        assert_eq!(config.collision_policy, CollisionPolicy::FirstWriteWins);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let path_str = path.to_str().unwrap();

        let mut config = Config::default();
        config.strategy = Strategy::Positional;
        config.locations_key = "sites".to_string();
        config.save(Some(path_str)).unwrap();

        let loaded = Config::load(Some(path_str)).unwrap();
        assert_eq!(loaded.strategy, Strategy::Positional);
        assert_eq!(loaded.locations_key, "sites");
        assert_eq!(loaded.columns, ColumnMap::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = Config::load(path.to_str()).unwrap();
        assert_eq!(config.strategy, Strategy::Text);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "strategy = \"fuzzy\"").unwrap();
        assert!(Config::load(path.to_str()).is_err());

        std::fs::write(&path, "locations_key = \"\"").unwrap();
        assert!(Config::load(path.to_str()).is_err());
    }

    #[test]
    fn test_empty_chain_rejected() {
        let mut config = Config::default();
        config.columns.client_phone = FieldChain::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyColumnList("columns.client_phone"))
        ));
    }
}
