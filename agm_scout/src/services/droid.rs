use anyhow::Context;
use thirtyfour::{prelude::*, ChromeCapabilities, ChromiumLikeCapabilities};

use crate::configuration::BrowserSettings;

/// One browser session for the whole run. Call [`Droid::quit`] when done.
pub struct Droid {
    pub driver: WebDriver,
}

impl Droid {
    pub async fn new(settings: &BrowserSettings) -> anyhow::Result<Self> {
        let caps = chrome_capabilities(settings)?;

        let driver = WebDriver::new(settings.webdriver_url.as_str(), caps)
            .await
            .with_context(|| {
                format!(
                    "Failed to start a browser session on {}",
                    settings.webdriver_url
                )
            })?;

        if settings.window_maximized {
            if let Err(e) = driver.maximize_window().await {
                log::warn!("Could not maximize browser window: {:?}", e);
            }
        }

        Ok(Droid { driver })
    }

    pub async fn quit(self) -> anyhow::Result<()> {
        self.driver
            .quit()
            .await
            .context("Failed to close the browser session")
    }
}

/// Chrome options that keep the console free of browser log noise.
pub fn chrome_capabilities(settings: &BrowserSettings) -> WebDriverResult<ChromeCapabilities> {
    let mut caps = DesiredCapabilities::chrome();
    caps.add_experimental_option("excludeSwitches", vec!["enable-logging"])?;
    caps.add_arg("--log-level=3")?;
    if settings.headless {
        caps.set_headless()?;
    }

    Ok(caps)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use thirtyfour::Capabilities;

    use super::chrome_capabilities;
    use crate::configuration::BrowserSettings;

    fn chrome_options(headless: bool) -> serde_json::Value {
        let settings = BrowserSettings {
            webdriver_url: "http://localhost:9515".to_string(),
            headless,
            window_maximized: true,
        };
        let caps: Capabilities = chrome_capabilities(&settings).unwrap().into();

        caps.get("goog:chromeOptions").cloned().unwrap()
    }

    fn is_headless_flag(arg: &serde_json::Value) -> bool {
        arg.as_str().is_some_and(|a| a.starts_with("--headless"))
    }

    #[test]
    fn chrome_logging_is_silenced() {
        let options = chrome_options(false);

        assert_eq!(options["excludeSwitches"], json!(["enable-logging"]));
        let args = options["args"].as_array().unwrap();
        assert!(args.contains(&json!("--log-level=3")));
        assert!(!args.iter().any(is_headless_flag));
    }

    #[test]
    fn headless_adds_flag() {
        let options = chrome_options(true);
        let args = options["args"].as_array().unwrap();

        assert!(args.iter().any(is_headless_flag));
    }
}
