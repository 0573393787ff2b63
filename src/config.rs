//! Highlighter configuration persistence
//!
//! Stores user preferences in `~/.config/sevenmark-highlight/config.yaml`

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::syntax::{MarkerPair, StyleTable, DEFAULT_NAMESPACE};
use crate::worker::DEFAULT_INIT_TIMEOUT;

/// Error loading or saving configuration
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    NoConfigDir,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::NoConfigDir => write!(f, "No config directory available"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Highlighter configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Class prefix (e.g., "sevenmark" → "sevenmark-bold")
    pub namespace: String,
    /// Parser program passed to the backend on init
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,
    pub init_timeout_ms: u64,
    /// Kind name → class template overrides, e.g. `Header: "h h{level}"`
    pub classes: HashMap<String, String>,
    /// Kind name → marker pair overrides
    pub markers: HashMap<String, MarkerPair>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            parser: None,
            init_timeout_ms: DEFAULT_INIT_TIMEOUT.as_millis() as u64,
            classes: HashMap::new(),
            markers: HashMap::new(),
        }
    }
}

impl HighlightConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to the default location
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = crate::config_paths::config_file().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Built-in style table with this config's overrides applied
    pub fn style_table(&self) -> StyleTable {
        let mut styles = StyleTable::default().with_namespace(self.namespace.clone());
        for (kind, template) in &self.classes {
            styles.set_class(kind.clone(), template.clone());
        }
        for (kind, markers) in &self.markers {
            styles.set_markers(kind.clone(), markers.clone());
        }
        styles
    }

    pub fn init_timeout(&self) -> Duration {
        Duration::from_millis(self.init_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ElementKind;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = HighlightConfig::from_yaml("{}").unwrap();
        assert_eq!(config, HighlightConfig::default());
        assert_eq!(config.init_timeout(), Duration::from_millis(3000));
    }

    #[test]
    fn test_partial_yaml() {
        let config = HighlightConfig::from_yaml("namespace: sm\ninit_timeout_ms: 50\n").unwrap();
        assert_eq!(config.namespace, "sm");
        assert_eq!(config.init_timeout(), Duration::from_millis(50));
        assert!(config.parser.is_none());
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = HighlightConfig::from_yaml("init_timeout_ms: [1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_style_table_applies_overrides() {
        let config = HighlightConfig::from_yaml(
            "namespace: sm\nmarkers:\n  FoldElement:\n    start: \"{{{+\"\n",
        )
        .unwrap();
        let styles = config.style_table();
        assert_eq!(styles.namespace(), "sm");
        assert_eq!(
            styles.markers(&ElementKind::FoldElement),
            Some(&MarkerPair::new("{{{+", ""))
        );
    }
}
