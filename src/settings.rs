use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

/// Deployment-level configuration. Missing fields fall back to defaults so a
/// partial settings file still loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub chart_endpoint: String,
    pub device_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chart_endpoint: "https://charts.goodsleep.app/render".into(),
            device_timeout_secs: 8,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }

    pub fn device_timeout(&self) -> Duration {
        Duration::from_secs(self.device_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(settings.device_timeout(), Duration::from_secs(8));
        assert!(settings.chart_endpoint.starts_with("https://"));
    }

    #[test]
    fn partial_settings_keep_defaults_for_the_rest() {
        let settings: Settings =
            serde_json::from_str(r#"{"chartEndpoint":"https://example.test/c"}"#).unwrap();
        assert_eq!(settings.chart_endpoint, "https://example.test/c");
        assert_eq!(settings.device_timeout_secs, 8);
    }
}
