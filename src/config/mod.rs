mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::path::Path;
use std::time::Duration;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            report_dir: default_report_dir(),
            deadline_ms: default_deadline_ms(),
            narrative: NarrativeConfig::default(),
            snapshots: SnapshotConfig::default(),
            calibration: Calibration::default(),
            catalogs: Catalogs::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config if the file exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deadline_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "deadline_ms",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.narrative.timeout_sec == 0 {
            return Err(ConfigError::Invalid {
                field: "narrative.timeout_sec",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.narrative.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "narrative.retry.max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }

        let bands = &self.catalogs.skill_bands;
        if bands.windows(2).any(|w| w[0].min_age >= w[1].min_age) {
            return Err(ConfigError::Invalid {
                field: "catalogs.skill_bands",
                reason: "bands must be sorted by strictly increasing min_age".to_string(),
            });
        }

        if self.catalogs.systemic_changes.is_empty() {
            return Err(ConfigError::Invalid {
                field: "catalogs.systemic_changes",
                reason: "at least one systemic change is required".to_string(),
            });
        }

        for (field, value) in [
            ("calibration.parent_emotional", self.calibration.parent_emotional),
            ("calibration.parent_cognitive", self.calibration.parent_cognitive),
            (
                "calibration.parent_anticipatory",
                self.calibration.parent_anticipatory,
            ),
            ("calibration.child_emotional", self.calibration.child_emotional),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a non-negative number, got {}", value),
                });
            }
        }

        Ok(())
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.deadline_ms, 10_000);
        assert_eq!(config.narrative.provider, NarrativeKind::Template);
        assert_eq!(config.calibration.parent_emotional, 10.0);
        assert_eq!(config.catalogs.skill_bands.len(), 4);
        assert_eq!(config.catalogs.systemic_changes.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let yaml = r#"
deadline_ms: 2500
narrative:
  provider: claude_cli
  timeout_sec: 5
calibration:
  parent_emotional: 12
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.deadline(), Duration::from_millis(2500));
        assert_eq!(config.narrative.provider, NarrativeKind::ClaudeCli);
        assert_eq!(config.calibration.parent_emotional, 12.0);
        assert_eq!(config.calibration.parent_cognitive, 8.0);
    }

    #[test]
    fn test_validate_rejects_unsorted_skill_bands() {
        let mut config = Config::default();
        config.catalogs.skill_bands.swap(0, 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "catalogs.skill_bands",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_deadline() {
        let config = Config {
            deadline_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("missing.yaml")).unwrap();
        assert_eq!(config.report_dir, std::path::PathBuf::from("reports"));
    }
}
