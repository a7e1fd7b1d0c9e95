//! Engine configuration via `relocate.toml`
//!
//! A missing file means defaults. `write_default_if_missing` drops a
//! commented template next to the caller's data so settings can be edited
//! without recompiling.

use relocate_core::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "relocate.toml";

/// Default tolerance (pixels) added around container rectangles
pub const DEFAULT_CONTAINER_TOLERANCE: f64 = 20.0;

/// Default lifetime of the post-commit highlight
pub const DEFAULT_HIGHLIGHT_MS: u64 = 2000;

/// Spatial locator settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Margin added on all four sides of container rectangles.
    /// Subsections are always hit-tested without a margin.
    #[serde(default = "default_container_tolerance")]
    pub container_tolerance: f64,
}

fn default_container_tolerance() -> f64 {
    DEFAULT_CONTAINER_TOLERANCE
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            container_tolerance: DEFAULT_CONTAINER_TOLERANCE,
        }
    }
}

/// Engine configuration loaded from `relocate.toml`.
///
/// # Example
///
/// ```toml
/// highlight_ms = 2000
///
/// [locator]
/// container_tolerance = 20.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelocationConfig {
    /// Spatial locator settings
    #[serde(default)]
    pub locator: LocatorConfig,
    /// How long items moved by a commit stay highlighted, in milliseconds
    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,
}

fn default_highlight_ms() -> u64 {
    DEFAULT_HIGHLIGHT_MS
}

impl Default for RelocationConfig {
    fn default() -> Self {
        Self {
            locator: LocatorConfig::default(),
            highlight_ms: DEFAULT_HIGHLIGHT_MS,
        }
    }
}

impl RelocationConfig {
    /// Highlight lifetime as a `Duration`
    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns an error if the container tolerance is negative or not finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerance = self.locator.container_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "locator.container_tolerance",
                reason: format!("must be a finite, non-negative number (got {})", tolerance),
            });
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Relocation engine configuration

# How long items moved by the last commit stay highlighted (milliseconds)
highlight_ms = 2000

[locator]
# Extra margin (pixels) around container rectangles. A pointer this close to
# a zone's border still drops into the zone. Subsections never get a margin.
container_tolerance = 20.0
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a value is out of range.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RelocationConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Read config from `path` if it exists, otherwise use defaults.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
