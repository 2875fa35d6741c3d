use std::path::{Path, PathBuf};

use super::{Config, ConfigError, parse_config};

/// Trait for loading and merging configuration files.
pub trait ConfigLoader {
    fn load(&self, cwd: &Path) -> Result<Config, ConfigError>;
}

/// Default implementation that reads from the filesystem.
pub struct DefaultConfigLoader {
    global_config_path: Option<PathBuf>,
    /// Replaces the `viewmap.yml` lookup in the working directory.
    local_config_path: Option<PathBuf>,
}

impl Default for DefaultConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultConfigLoader {
    pub fn new() -> Self {
        let global_config_path = std::env::var("HOME")
            .ok()
            .filter(|h| !h.is_empty())
            .map(|h| {
                PathBuf::from(h)
                    .join(".config")
                    .join("viewmap")
                    .join("viewmap.yml")
            });
        Self {
            global_config_path,
            local_config_path: None,
        }
    }

    /// Create a loader with an explicit global config path (for testing).
    pub fn with_global_path(path: PathBuf) -> Self {
        Self {
            global_config_path: Some(path),
            local_config_path: None,
        }
    }

    /// Use `path` as the local config instead of looking in the working
    /// directory. Unlike the implicit lookup, the file must exist.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.local_config_path = Some(path);
        self
    }

    /// Determine which local config file to use.
    /// `viewmap.yml` is preferred; `viewmap.yaml` is a fallback.
    fn local_config_path(cwd: &Path) -> Option<PathBuf> {
        let yml = cwd.join("viewmap.yml");
        if yml.exists() {
            return Some(yml);
        }
        let yaml = cwd.join("viewmap.yaml");
        if yaml.exists() {
            return Some(yaml);
        }
        None
    }

    fn read_and_parse(path: &Path) -> Result<Config, ConfigError> {
        tracing::debug!(path = %path.display(), "reading config");
        let yaml = std::fs::read_to_string(path)?;
        parse_config(&yaml)
    }
}

impl ConfigLoader for DefaultConfigLoader {
    fn load(&self, cwd: &Path) -> Result<Config, ConfigError> {
        let global = self
            .global_config_path
            .as_ref()
            .filter(|p| p.exists())
            .map(|p| Self::read_and_parse(p))
            .transpose()?;

        let local = self
            .local_config_path
            .clone()
            .or_else(|| Self::local_config_path(cwd))
            .map(|p| Self::read_and_parse(&p))
            .transpose()?;

        let config = global.unwrap_or_default().merge(local.unwrap_or_default());

        config.validate()?;
        Ok(config)
    }
}
