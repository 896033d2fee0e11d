use std::env;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the move server, without a trailing slash.
    pub server_url: String,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_url = get("SERVER_URL")
            .ok_or(ConfigError::Missing("SERVER_URL"))?
            .trim()
            .trim_end_matches('/')
            .to_string();

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    name: "REQUEST_TIMEOUT_SECS",
                    value,
                })?,
            None => Duration::from_secs(30),
        };

        Ok(Self {
            server_url,
            request_timeout,
        })
    }
}
