use std::{env, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid PORT value: {0}")]
    InvalidPort(String),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub source: FeedSource,
}

#[derive(Debug, Clone)]
pub enum FeedSource {
    Local { path: PathBuf },
    Cloud { account: String, container: String },
}

impl ServerConfig {
    /// Resolved from the environment. Cloud mode is forced by the hosting
    /// sentinel (`WEBSITE_SITE_NAME`) or `HEADWAY_SOURCE=cloud`; local
    /// mode reads a feed folder (or `.zip` archive) under the data root.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            Err(_) => 8080,
        };

        let cloud = env::var("WEBSITE_SITE_NAME").is_ok()
            || env::var("HEADWAY_SOURCE").is_ok_and(|value| value == "cloud");
        let source = if cloud {
            FeedSource::Cloud {
                account: env::var("HEADWAY_STORAGE_ACCOUNT")
                    .map_err(|_| ConfigError::Missing("HEADWAY_STORAGE_ACCOUNT"))?,
                container: env::var("HEADWAY_STORAGE_CONTAINER")
                    .map_err(|_| ConfigError::Missing("HEADWAY_STORAGE_CONTAINER"))?,
            }
        } else {
            let root = env::var("HEADWAY_DATA_ROOT").unwrap_or_else(|_| "data".into());
            let feed = env::var("HEADWAY_FEED").unwrap_or_else(|_| "feed".into());
            FeedSource::Local {
                path: PathBuf::from(root).join(feed),
            }
        };

        Ok(Self { port, source })
    }
}
