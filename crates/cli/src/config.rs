//! Process configuration read from the environment.
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `GITHUB_USER` | yes | |
//! | `GITHUB_TOKEN` (or `GITHUB_PASSWORD`) | yes | |
//! | `POSTS_LOCATION` | no | `content/post/` |
//! | `GITHUB_API_URL` | no | `https://api.github.com` |
//! | `PORT` | no | `5000` |
//! | `LOG_FORMAT` | no | `json` |

use anyhow::{anyhow, bail, Context, Result};

/// Default article location inside the blog repository.
pub const DEFAULT_POSTS_LOCATION: &str = "content/post/";

const DEFAULT_PORT: u16 = 5000;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => bail!("LOG_FORMAT must be 'json' or 'pretty', got '{other}'"),
        }
    }
}

/// Everything the binary needs to start.
#[derive(Clone)]
pub struct Config {
    /// Bot account login (`GITHUB_USER`).
    pub github_user: String,
    /// Bot account token (`GITHUB_TOKEN` or `GITHUB_PASSWORD`).
    pub github_token: String,
    /// REST API base URL (`GITHUB_API_URL`).
    pub github_api_url: String,
    /// Article directory inside the blog repository (`POSTS_LOCATION`).
    pub posts_location: String,
    /// Listener port (`PORT`).
    pub port: u16,
    /// Log output format (`LOG_FORMAT`).
    pub log_format: LogFormat,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("github_user", &self.github_user)
            .field("github_api_url", &self.github_api_url)
            .field("posts_location", &self.posts_location)
            .field("port", &self.port)
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let github_user =
            get("GITHUB_USER").context("GITHUB_USER environment variable is required")?;

        let github_token = get("GITHUB_TOKEN")
            .or_else(|| get("GITHUB_PASSWORD"))
            .ok_or_else(|| {
                anyhow!("GITHUB_TOKEN (or GITHUB_PASSWORD) environment variable is required")
            })?;

        let github_api_url =
            get("GITHUB_API_URL").unwrap_or_else(|| github::DEFAULT_API_URL.to_string());

        let posts_location =
            get("POSTS_LOCATION").unwrap_or_else(|| DEFAULT_POSTS_LOCATION.to_string());

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{raw}'"))?,
            None => DEFAULT_PORT,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::Json,
        };

        Ok(Self {
            github_user,
            github_token,
            github_api_url,
            posts_location,
            port,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn applies_defaults() {
        let config = load(&[("GITHUB_USER", "steward-bot"), ("GITHUB_TOKEN", "t")]).unwrap();

        assert_eq!(config.github_user, "steward-bot");
        assert_eq!(config.posts_location, DEFAULT_POSTS_LOCATION);
        assert_eq!(config.github_api_url, "https://api.github.com");
        assert_eq!(config.port, 5000);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn password_is_accepted_as_token() {
        let config = load(&[("GITHUB_USER", "bot"), ("GITHUB_PASSWORD", "p")]).unwrap();
        assert_eq!(config.github_token, "p");
    }

    #[test]
    fn token_wins_over_password() {
        let config = load(&[
            ("GITHUB_USER", "bot"),
            ("GITHUB_TOKEN", "t"),
            ("GITHUB_PASSWORD", "p"),
        ])
        .unwrap();
        assert_eq!(config.github_token, "t");
    }

    #[rstest]
    #[case::no_user(&[("GITHUB_TOKEN", "t")], "GITHUB_USER")]
    #[case::blank_user(&[("GITHUB_USER", "  "), ("GITHUB_TOKEN", "t")], "GITHUB_USER")]
    #[case::no_token(&[("GITHUB_USER", "bot")], "GITHUB_TOKEN")]
    #[case::bad_port(&[("GITHUB_USER", "bot"), ("GITHUB_TOKEN", "t"), ("PORT", "http")], "PORT")]
    #[case::bad_format(&[("GITHUB_USER", "bot"), ("GITHUB_TOKEN", "t"), ("LOG_FORMAT", "xml")], "LOG_FORMAT")]
    fn rejects_invalid_settings(#[case] vars: &[(&str, &str)], #[case] mentioned: &str) {
        let error = load(vars).unwrap_err();
        assert!(format!("{error:#}").contains(mentioned));
    }

    #[test]
    fn debug_output_hides_token() {
        let config = load(&[("GITHUB_USER", "bot"), ("GITHUB_TOKEN", "hunter2")]).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
