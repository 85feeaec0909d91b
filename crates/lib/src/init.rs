//! Initialize the configuration directory: create `~/.wcschat` and a default `config.json`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Create the config directory and default config file if they do not exist.
/// An existing config file is left untouched. Returns the config directory.
pub fn init_config_dir(config_path: &Path) -> Result<PathBuf> {
    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("creating config directory {}", config_dir.display()))?;

    if config_path.exists() {
        log::info!("config already present at {}", config_path.display());
    } else {
        let default_config = serde_json::to_string_pretty(&Config::default())
            .context("serializing default config")?;
        std::fs::write(config_path, default_config)
            .with_context(|| format!("writing default config to {}", config_path.display()))?;
        log::info!("created default config at {}", config_path.display());
    }

    Ok(config_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;

    fn temp_config_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("wcschat-init-{}", uuid::Uuid::new_v4()))
            .join("config.json")
    }

    #[test]
    fn writes_a_loadable_default_config() {
        let path = temp_config_path();
        let dir = init_config_dir(&path).unwrap();
        assert_eq!(Some(dir.as_path()), path.parent());

        let (config, _) = load_config(Some(path)).unwrap();
        assert_eq!(config.window.width, 640.0);
    }

    #[test]
    fn keeps_an_existing_config() {
        let path = temp_config_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"session":{"clientId":"kept"}}"#).unwrap();

        init_config_dir(&path).unwrap();
        let (config, _) = load_config(Some(path)).unwrap();
        assert_eq!(config.session.client_id.as_deref(), Some("kept"));
    }
}
