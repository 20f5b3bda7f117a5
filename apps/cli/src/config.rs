//! CLI configuration management.
//!
//! Configuration is stored as TOML at `~/.config/sunray/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Persistent sunray configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SteamGridDB API key for cover art lookup. Empty disables artwork.
    #[serde(default)]
    pub steamgriddb_api_key: String,

    /// Path to Sunshine's apps.json.
    #[serde(default = "default_apps_json")]
    pub apps_json: PathBuf,

    /// Directory where downloaded covers are kept.
    #[serde(default = "default_covers_dir")]
    pub covers_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steamgriddb_api_key: String::new(),
            apps_json: default_apps_json(),
            covers_dir: default_covers_dir(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        // Restrict permissions on Unix (may contain the API key).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

/// Returns the configuration file path.
fn config_path() -> PathBuf {
    home_dir().join(".config").join("sunray").join("config.toml")
}

fn default_apps_json() -> PathBuf {
    home_dir().join(".config").join("sunshine").join("apps.json")
}

fn default_covers_dir() -> PathBuf {
    home_dir().join(".config").join("sunshine").join("covers")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.steamgriddb_api_key.is_empty());
        assert!(config.apps_json.ends_with(".config/sunshine/apps.json"));
        assert!(config.covers_dir.ends_with(".config/sunshine/covers"));
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = Config {
            steamgriddb_api_key: "abc123".into(),
            apps_json: "/srv/sunshine/apps.json".into(),
            covers_dir: "/srv/sunshine/covers".into(),
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.steamgriddb_api_key, "abc123");
        assert_eq!(parsed.apps_json, PathBuf::from("/srv/sunshine/apps.json"));
    }

    #[test]
    fn config_partial_toml() {
        let toml_str = r#"steamgriddb_api_key = "key""#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.steamgriddb_api_key, "key");
        assert!(config.apps_json.ends_with("apps.json"));
    }

    #[test]
    fn config_path_under_sunray() {
        assert!(config_path().ends_with(".config/sunray/config.toml"));
    }

    #[test]
    fn config_save_and_load_manual() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let config = Config {
            steamgriddb_api_key: "save-test".into(),
            ..Config::default()
        };

        let content = toml::to_string_pretty(&config).unwrap();
        std::fs::write(&path, &content).unwrap();

        let loaded: Config = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.steamgriddb_api_key, "save-test");
        assert_eq!(loaded.apps_json, config.apps_json);
    }
}
