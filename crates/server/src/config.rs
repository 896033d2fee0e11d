use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Which move selector the server plays with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectorKind {
    Random,
    Llm,
}

impl FromStr for SelectorKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(SelectorKind::Random),
            "llm" | "gpt" | "openai" => Ok(SelectorKind::Llm),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub selector: SelectorKind,
    /// Without a key the language-model selector is never constructed.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub llm_max_attempts: u32,
    pub llm_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            selector: SelectorKind::Llm,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            llm_max_attempts: 2,
            llm_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key/value source. Unset keys take defaults,
    /// values that fail to parse are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_var(&get, "PORT", defaults.port)?,
            selector: parse_var(&get, "MOVE_SELECTOR", defaults.selector)?,
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            llm_max_attempts: parse_var(&get, "LLM_MAX_ATTEMPTS", defaults.llm_max_attempts)?
                .max(1),
            llm_timeout: Duration::from_secs(parse_var(
                &get,
                "LLM_TIMEOUT_SECS",
                defaults.llm_timeout.as_secs(),
            )?),
        })
    }
}

fn parse_var<T, F>(get: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
