use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "PHOTO_GALLERY_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen: String,
    pub database_path: String,
    pub uploads_dir: String,
    pub max_upload_size: usize,
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:5000".to_string(),
            database_path: "./database.json".to_string(),
            uploads_dir: "./uploads".to_string(),
            max_upload_size: 50 * 1024 * 1024,
            allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Reads `path`, or writes the defaults there when it doesn't exist yet.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
        } else {
            let default_config = Config::default();
            let toml_string = toml::to_string_pretty(&default_config)
                .context("failed to serialize default config")?;
            std::fs::write(path, toml_string)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(default_config)
        }
    }

    pub fn from_env_config() -> anyhow::Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.listen, "0.0.0.0:5000");
        assert!(path.exists());

        let reread = Config::load(&path).unwrap();
        assert_eq!(reread.database_path, cfg.database_path);
        assert_eq!(reread.max_upload_size, cfg.max_upload_size);
    }

    #[test]
    fn partial_file_falls_back_to_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "listen = \"127.0.0.1:8080\"\nallowed_origins = [\"http://localhost:3000\"]\n").unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.listen, "127.0.0.1:8080");
        assert_eq!(cfg.allowed_origins, vec!["http://localhost:3000".to_string()]);
        assert_eq!(cfg.uploads_dir, "./uploads");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "listen = [").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
