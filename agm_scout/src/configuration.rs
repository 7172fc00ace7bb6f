use std::{path::PathBuf, time::Duration};

use config::{Config, ConfigError, Environment, File};
use serde_aux::field_attributes::{
    deserialize_bool_from_anything, deserialize_number_from_string,
};
use url::Url;

pub const DEFAULT_QUERY_URL: &str = "https://mopsov.twse.com.tw/mops/web/t108sb31_q1";

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub browser: BrowserSettings,
    pub portal: PortalSettings,
    pub export: ExportSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub headless: bool,
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub window_maximized: bool,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct PortalSettings {
    pub query_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub results_timeout_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub poll_interval_millis: u64,
}

impl PortalSettings {
    pub fn results_timeout(&self) -> Duration {
        Duration::from_secs(self.results_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_millis)
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
}

/// Loads settings from the built-in defaults, an optional `configuration.yaml`
/// in the working directory and `APP__`-prefixed environment variables,
/// e.g. `APP__PORTAL__RESULTS_TIMEOUT_SECS=20`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = Config::builder()
        .set_default("browser.webdriver_url", "http://localhost:9515")?
        .set_default("browser.headless", false)?
        .set_default("browser.window_maximized", true)?
        .set_default("portal.query_url", DEFAULT_QUERY_URL)?
        .set_default("portal.results_timeout_secs", 10)?
        .set_default("portal.poll_interval_millis", 500)?
        .set_default("export.output_dir", ".")?
        .add_source(File::with_name("configuration").required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?
        .try_deserialize::<Settings>()?;

    settings.validate()?;
    Ok(settings)
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("browser.webdriver_url", &self.browser.webdriver_url),
            ("portal.query_url", &self.portal.query_url),
        ] {
            if let Err(e) = Url::parse(value) {
                return Err(ConfigError::Message(format!(
                    "{} is not a valid url ({}): {}",
                    key, value, e
                )));
            }
        }

        if self.portal.poll_interval_millis == 0 {
            return Err(ConfigError::Message(
                "portal.poll_interval_millis must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BrowserSettings, ExportSettings, PortalSettings, Settings, DEFAULT_QUERY_URL};

    fn settings() -> Settings {
        Settings {
            browser: BrowserSettings {
                webdriver_url: "http://localhost:9515".to_string(),
                headless: true,
                window_maximized: false,
            },
            portal: PortalSettings {
                query_url: DEFAULT_QUERY_URL.to_string(),
                results_timeout_secs: 10,
                poll_interval_millis: 500,
            },
            export: ExportSettings {
                output_dir: ".".into(),
            },
        }
    }

    #[test]
    fn default_urls_are_valid() {
        assert!(settings().validate().is_ok());
    }

    #[test]
    fn invalid_url_is_rejected() {
        let mut settings = settings();
        settings.browser.webdriver_url = "localhost 9515".to_string();

        assert!(settings.validate().is_err());
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let mut settings = settings();
        settings.portal.poll_interval_millis = 0;

        assert!(settings.validate().is_err());
    }

    #[test]
    fn durations_follow_settings() {
        let portal = settings().portal;

        assert_eq!(portal.results_timeout().as_secs(), 10);
        assert_eq!(portal.poll_interval().as_millis(), 500);
    }
}
