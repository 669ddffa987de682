use crate::error::{to_env_var, ConfigError};
use config::{Config, Environment};
use newsbrief::news::NewsApiConfig;
use newsbrief::platform::configs::PlatformConfig;
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Failed to parse socket address")
    }
}

#[derive(Debug, Deserialize)]
pub struct PlatformSettings {
    #[serde(default = "default_platform_host")]
    pub host: String,
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub assistant_id: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
    #[serde(default)]
    pub reuse_thread: bool,
}

impl PlatformSettings {
    pub fn client_config(&self) -> PlatformConfig {
        PlatformConfig::new(self.host.clone(), self.api_key.clone())
    }
}

#[derive(Debug, Deserialize)]
pub struct NewsSettings {
    #[serde(default = "default_news_host")]
    pub host: String,
    /// A missing key degrades to the "No news found." path at request time
    /// rather than blocking startup.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            host: default_news_host(),
            api_key: String::new(),
            page_size: default_page_size(),
        }
    }
}

impl NewsSettings {
    pub fn client_config(&self) -> NewsApiConfig {
        NewsApiConfig {
            host: self.host.clone(),
            api_key: self.api_key.clone(),
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub platform: PlatformSettings,
    #[serde(default)]
    pub news: NewsSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("NEWSBRIEF")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let result: Result<Self, config::ConfigError> = config.try_deserialize();

        // Handle missing field errors specially so the operator is pointed at
        // the env var, not at a serde path
        match result {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                let error_str = err.to_string();
                if error_str.starts_with("missing field") {
                    let field = error_str
                        .trim_start_matches("missing field `")
                        .trim_end_matches('`');
                    // The platform api key is the only setting without a
                    // default; when nothing under `platform` is set the
                    // deserializer reports the whole section as missing.
                    let env_var = match field {
                        "platform" | "api_key" => to_env_var("platform.api_key"),
                        other => to_env_var(other),
                    };
                    Err(ConfigError::MissingEnvVar { env_var })
                } else if let config::ConfigError::NotFound(field) = &err {
                    let env_var = to_env_var(field);
                    Err(ConfigError::MissingEnvVar { env_var })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_platform_host() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_poll_interval_secs() -> u64 {
    3
}

fn default_max_polls() -> u32 {
    100
}

fn default_news_host() -> String {
    "https://newsapi.org".to_string()
}

fn default_page_size() -> u32 {
    5
}
