//! Configuration loader
//!
//! Loading pipeline:
//! 1. File size check against [`ConfigLimits::max_config_size`]
//! 2. YAML parsing
//! 3. Deserialization to typed config
//! 4. Validation (errors abort, warnings are returned)

use std::path::Path;

use crate::config::schema::RecorderConfig;
use crate::config::validation::Validator;
use crate::error::ConfigError;

// ============================================================================
// Public API
// ============================================================================

/// Options for the configuration loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Limits for configuration size.
    pub config_limits: ConfigLimits,
}

/// Limits for configuration size to prevent resource exhaustion.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum number of triggers.
    pub max_triggers: usize,

    /// Maximum configuration file size in bytes.
    pub max_config_size: u64,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_triggers: env_or("SEQREC_MAX_TRIGGERS", 1000),
            max_config_size: env_or("SEQREC_MAX_CONFIG_SIZE", 1024 * 1024),
        }
    }
}

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated configuration.
    pub config: RecorderConfig,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) if !location.is_empty() => {
                write!(f, "{} at {location}", self.message)
            }
            _ => f.write_str(&self.message),
        }
    }
}

/// Configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new configuration loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let limit = self.options.config_limits.max_config_size;
        if metadata.len() > limit {
            return Err(ConfigError::TooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit,
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        self.load_str(&raw, path)
    }

    /// Parses and validates configuration text. `path` is used in errors only.
    ///
    /// # Errors
    ///
    /// Returns an error if YAML parsing or validation fails.
    pub fn load_str(&self, raw: &str, path: &Path) -> Result<LoadResult, ConfigError> {
        // Handle UTF-8 BOM
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        if raw.trim().is_empty() {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "Configuration file is empty".to_string(),
            });
        }

        let config: RecorderConfig =
            serde_yaml::from_str(raw).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        let result = Validator::new().validate(&config, &self.options.config_limits);
        if result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors: result.errors,
            });
        }

        let warnings = result
            .warnings
            .into_iter()
            .map(|issue| LoadWarning {
                message: issue.message,
                location: Some(issue.path),
            })
            .collect();

        Ok(LoadResult { config, warnings })
    }
}

/// Reads a limit from the environment, falling back to `default`.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = write_config(
            "recorder:\n  record_modifier: Start\ntriggers:\n  - sequence: [A, B]\n    callback: { kind: log, name: Combo }\n",
        );
        let result = ConfigLoader::with_defaults().load(file.path()).unwrap();
        assert_eq!(result.config.triggers.len(), 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::with_defaults()
            .load(Path::new("/nonexistent/seqrec.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn test_empty_file() {
        let file = write_config("  \n");
        let err = ConfigLoader::with_defaults().load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { line: None, .. }));
    }

    #[test]
    fn test_parse_error_has_line() {
        let file = write_config("triggers:\n  - hotkey: a\n    callback: [\n");
        let err = ConfigLoader::with_defaults().load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { line: Some(_), .. }));
    }

    #[test]
    fn test_size_limit() {
        let file = write_config("triggers: []\n# padding padding padding\n");
        let loader = ConfigLoader::new(LoaderOptions {
            config_limits: ConfigLimits {
                max_triggers: 10,
                max_config_size: 8,
            },
        });
        let err = loader.load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge { limit: 8, .. }));
    }

    #[test]
    fn test_validation_error_collects_issues() {
        let file = write_config(
            "triggers:\n  - callback: { kind: log, name: x }\n  - hotkey: ab\n    callback: { kind: log, name: '' }\n",
        );
        let err = ConfigLoader::with_defaults().load(file.path()).unwrap_err();
        let ConfigError::ValidationError { errors, .. } = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_warnings_returned() {
        let file = write_config("triggers:\n  - sequence: [A]\n    callback: { kind: log, name: x }\n");
        let result = ConfigLoader::with_defaults().load(file.path()).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(
            result.warnings[0].location.as_deref(),
            Some("triggers[0].sequence")
        );
    }

    #[test]
    fn test_bom_is_stripped() {
        let loader = ConfigLoader::with_defaults();
        let result = loader.load_str("\u{feff}triggers: []\n", Path::new("inline.yaml"));
        assert!(result.is_ok());
    }
}
