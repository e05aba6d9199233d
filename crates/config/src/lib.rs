//! Configuration management for sketchpad.
//!
//! Loads and saves the TOML config file in the XDG config directory.

mod settings;
mod xdg;

pub use settings::{Config, EditorSettings, LoggingSettings, SessionSettings, StorageSettings};
pub use xdg::{get_cache_dir, get_config_dir};

use anyhow::Result;
use std::path::{Component, Path, PathBuf};

/// Default values as constants
pub mod defaults {
    pub const TAB_SIZE: usize = 4;
    pub const SOFT_TABS: bool = true;
    pub const WORD_WRAP: bool = true;
    pub const LIGHT_THEME: &str = "light-theme";
    pub const DARK_THEME: &str = "dark-theme";
    pub const RESTORE_LATEST_CODE: bool = true;
    pub const SAVE_DEBOUNCE_MS: u64 = 0;
    pub const MIN_LOG_LEVEL: &str = "info";
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// On first run, creates config file with default values.
    /// Auto-completes missing keys with default values.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let original_content = std::fs::read_to_string(config_path)?;
            let config: Self = toml::from_str(&original_content)?;

            // Serialize back to get normalized content
            let normalized_content = toml::to_string_pretty(&config)?;

            // If content changed, save the updated config
            if original_content != normalized_content {
                config.save_to(config_path)?;
            }

            Ok(config)
        } else {
            // First run - create config file with default values
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Get path to config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(get_config_dir()?.join("config.toml"))
    }

    /// Resolve the local storage directory.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.storage.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => get_cache_dir(),
        }
    }

    /// Local storage directory of one project.
    ///
    /// Mirrors the canonical project path under `<cache_dir>/projects`, so
    /// each project keeps its own cached code and snapshot.
    /// Example: /home/user/sketch -> <cache_dir>/projects/home/user/sketch/
    pub fn project_storage_dir(&self, project_dir: &Path) -> Result<PathBuf> {
        let canonical = project_dir
            .canonicalize()
            .unwrap_or_else(|_| project_dir.to_path_buf());

        // Drop the root, drive prefix and any ".." so the result stays inside
        let relative: PathBuf = canonical
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect();

        Ok(self.cache_dir()?.join("projects").join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_load_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_completes_missing_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[editor]\nword_wrap = false\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.editor.word_wrap);

        let rewritten = std::fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains("tab_size"));
        assert!(rewritten.contains("[session]"));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "editor = 5").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_cache_dir_override() {
        let mut config = Config::default();
        config.storage.cache_dir = Some(PathBuf::from("/tmp/sketchpad-cache"));
        assert_eq!(
            config.cache_dir().unwrap(),
            PathBuf::from("/tmp/sketchpad-cache")
        );
    }

    #[test]
    fn test_project_storage_dir_per_project() {
        let cache = TempDir::new().unwrap();
        let projects = TempDir::new().unwrap();
        let a = projects.path().join("a");
        let b = projects.path().join("b");
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();

        let mut config = Config::default();
        config.storage.cache_dir = Some(cache.path().to_path_buf());

        let dir_a = config.project_storage_dir(&a).unwrap();
        let dir_b = config.project_storage_dir(&b).unwrap();
        assert_ne!(dir_a, dir_b);
        assert!(dir_a.starts_with(cache.path().join("projects")));
        assert!(dir_a.ends_with("a"));

        // Same project through a different spelling
        assert_eq!(config.project_storage_dir(&a.join("..").join("a")).unwrap(), dir_a);
    }

    #[test]
    fn test_project_storage_dir_stays_inside_cache() {
        let mut config = Config::default();
        config.storage.cache_dir = Some(PathBuf::from("/tmp/sketchpad-cache"));
        let dir = config
            .project_storage_dir(Path::new("/missing/../../sketch"))
            .unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/sketchpad-cache/projects/missing/sketch"));
    }
}
