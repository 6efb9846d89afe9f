use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable pointing at a settings file.
pub const CONFIG_ENV: &str = "GAGE_RR_CONFIG";

/// Settings file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gage_rr.json";

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// User-tunable settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initial window size in points.
    pub window_size: [f32; 2],
    /// Trial rows in a fresh table.
    pub initial_trials: usize,
    /// Decimals in the textual summary.
    pub decimals: usize,
    /// Height of each bar chart in points.
    pub chart_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_size: [1100.0, 760.0],
            initial_trials: 3,
            decimals: 4,
            chart_height: 260.0,
        }
    }
}

impl AppConfig {
    /// Parse a settings file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Load from `$GAGE_RR_CONFIG` or `./gage_rr.json`, falling back to the
    /// defaults when neither exists or the file is invalid.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("Ignoring settings file: {e:#}");
                Self::default()
            }
        }
    }

    /// At least one trial row.
    fn sanitized(mut self) -> Self {
        self.initial_trials = self.initial_trials.max(1);
        self
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(p));
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.exists().then_some(local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let path = std::env::temp_dir().join(format!("gage_rr_cfg_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "decimals": 2, "initial_trials": 0 }"#).unwrap();
        let config = AppConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.decimals, 2);
        assert_eq!(config.initial_trials, 1);
        assert_eq!(config.window_size, AppConfig::default().window_size);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("gage_rr_badcfg_{}.json", std::process::id()));
        std::fs::write(&path, "{ decimals: ").unwrap();
        let err = AppConfig::from_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(format!("{err:#}").contains("parsing config"));
    }
}
