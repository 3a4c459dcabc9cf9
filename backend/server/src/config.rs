use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::error::StartupError;

pub struct Config {
    pub port: u16,
    pub catalog_path: String,
    pub catalog_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, StartupError> {
        Ok(Self {
            port: try_load("RUST_PORT", "1111")?,
            catalog_path: try_load("CATALOG_PATH", "data/restaurants.json")?,
            catalog_url: var("CATALOG_URL").ok().filter(|url| !url.trim().is_empty()),
        })
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, StartupError>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, StartupError>
where
    T::Err: Display,
{
    raw.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        StartupError::Config(format!("{key}={raw}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_value::<u16>("RUST_PORT", "8080").unwrap(), 8080);
        assert!(matches!(
            parse_value::<u16>("RUST_PORT", "eighty"),
            Err(StartupError::Config(_))
        ));
        assert!(parse_value::<u16>("RUST_PORT", "70000").is_err());
    }
}
