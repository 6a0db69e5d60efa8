//! Layered farm endpoint configuration: defaults, then `corn.toml`, then
//! environment variables. An absent endpoint is a valid state; it surfaces as
//! a configuration outcome on the first purchase attempt rather than a crash.

use std::{collections::HashMap, fs};

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Default)]
pub struct FarmSettings {
    pub farm_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid farm endpoint url '{value}': {source}")]
    InvalidFarmUrl {
        value: String,
        source: url::ParseError,
    },
}

pub fn load_settings() -> FarmSettings {
    let mut settings = FarmSettings::default();

    if let Ok(raw) = fs::read_to_string("corn.toml") {
        apply_file_config(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("CORN_FARM_URL") {
        settings.farm_url = Some(v);
    }
    if let Ok(v) = std::env::var("APP__FARM_URL") {
        settings.farm_url = Some(v);
    }

    settings
}

fn apply_file_config(settings: &mut FarmSettings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("farm_url") {
            settings.farm_url = Some(v.clone());
        }
    }
}

impl FarmSettings {
    /// Applies a command-line override on top of file/env configuration.
    pub fn with_override(mut self, farm_url: Option<String>) -> Self {
        if farm_url.is_some() {
            self.farm_url = farm_url;
        }
        self
    }

    /// Parses the configured endpoint. Absence (or a blank value) is valid
    /// and yields `None`; a present-but-unparseable value is an error.
    pub fn endpoint_url(&self) -> Result<Option<Url>, SettingsError> {
        let Some(raw) = &self.farm_url else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Url::parse(trimmed)
            .map(Some)
            .map_err(|source| SettingsError::InvalidFarmUrl {
                value: trimmed.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_config_sets_farm_url() {
        let mut settings = FarmSettings::default();
        apply_file_config(&mut settings, "farm_url = \"http://127.0.0.1:8000/buy\"\n");
        assert_eq!(
            settings.farm_url.as_deref(),
            Some("http://127.0.0.1:8000/buy")
        );
    }

    #[test]
    fn malformed_file_config_keeps_defaults() {
        let mut settings = FarmSettings::default();
        apply_file_config(&mut settings, "farm_url = [not toml");
        assert!(settings.farm_url.is_none());
    }

    #[test]
    fn cli_override_wins_over_loaded_value() {
        let settings = FarmSettings {
            farm_url: Some("http://file.example/buy".to_string()),
        }
        .with_override(Some("http://cli.example/buy".to_string()));
        assert_eq!(settings.farm_url.as_deref(), Some("http://cli.example/buy"));
    }

    #[test]
    fn absent_cli_override_keeps_loaded_value() {
        let settings = FarmSettings {
            farm_url: Some("http://file.example/buy".to_string()),
        }
        .with_override(None);
        assert_eq!(
            settings.farm_url.as_deref(),
            Some("http://file.example/buy")
        );
    }

    #[test]
    fn missing_and_blank_endpoints_are_valid_states() {
        assert!(FarmSettings::default().endpoint_url().expect("ok").is_none());
        let blank = FarmSettings {
            farm_url: Some("   ".to_string()),
        };
        assert!(blank.endpoint_url().expect("ok").is_none());
    }

    #[test]
    fn unparseable_endpoint_is_an_error() {
        let settings = FarmSettings {
            farm_url: Some("not a url".to_string()),
        };
        let err = settings.endpoint_url().expect_err("must fail");
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn valid_endpoint_parses() {
        let settings = FarmSettings {
            farm_url: Some("http://127.0.0.1:8000/buy".to_string()),
        };
        let url = settings.endpoint_url().expect("ok").expect("some");
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/buy");
    }
}
