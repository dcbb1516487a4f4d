use crate::error::{AppError, Result};
use std::env;

pub const DEFAULT_API_URL: &str = "https://api.emporiaenergy.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub emporia: EmporiaConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct EmporiaConfig {
    pub api_url: String,
    pub username: String,
    pub password: String,
    /// Display name of the device every energy endpoint targets.
    pub device_name: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables. Emporia credentials
    /// and the target device have no defaults and must be set.
    pub fn from_env() -> Result<Self> {
        let username = required("EMPORIA_USERNAME")?;
        let password = required("EMPORIA_PASSWORD")?;
        let device_name = required("EMPORIA_DEVICE")?;

        let api_url = env::var("EMPORIA_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::Config(format!("PORT must be a number, got '{}'", raw)))?,
            Err(_) => 5000,
        };

        Ok(Config {
            emporia: EmporiaConfig {
                api_url,
                username,
                password,
                device_name,
            },
            server: ServerConfig { host, port },
        })
    }
}

fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Config(format!("{} must be set", name))),
    }
}
