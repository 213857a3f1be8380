use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub services: ServicesConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub flights_url: String,
    pub tickets_url: String,
    pub privilege_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_request_timeout() -> u64 {
    avia_clients::DEFAULT_REQUEST_TIMEOUT.as_secs()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub token_endpoint: String,
    pub jwks_endpoint: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_jwks_ttl")]
    pub jwks_ttl_seconds: u64,
    #[serde(default)]
    pub validate_audience: bool,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub validate_issuer: bool,
    #[serde(default)]
    pub issuer: Option<String>,
}

fn default_jwks_ttl() -> u64 {
    avia_auth::DEFAULT_JWKS_TTL.as_secs()
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of AVIA)
            // Eg.. `AVIA__SERVER__PORT=8080` would set the server port
            .add_source(config::Environment::with_prefix("AVIA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
