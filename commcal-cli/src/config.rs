use std::path::PathBuf;

use anyhow::{Context, Result};
use commcal_core::DEFAULT_MAX_OCCURRENCES;
use serde::Deserialize;

/// Global configuration at ~/.config/commcal/config.toml
///
/// Every field is optional in the file; a missing file means defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Days ahead covered by the default query window
    pub window_days: i64,

    /// Safety cap on generated occurrences per event
    pub max_occurrences: usize,

    /// Calendar name stamped on exports
    pub calendar_name: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        GlobalConfig {
            window_days: 30,
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
            calendar_name: "Community Calendar".to_string(),
        }
    }
}

impl GlobalConfig {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("commcal");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(GlobalConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Could not parse {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config: GlobalConfig = toml::from_str("window_days = 7").unwrap();
        assert_eq!(config.window_days, 7);
        assert_eq!(config.max_occurrences, DEFAULT_MAX_OCCURRENCES);
        assert_eq!(config.calendar_name, "Community Calendar");
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.window_days, 30);
    }
}
