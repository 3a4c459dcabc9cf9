use bowl::{Catalog, load_catalog};
use reqwest::get;
use tracing::info;

use crate::{config::Config, error::StartupError};

pub async fn get_remote_catalog(url: &str) -> Result<Catalog, StartupError> {
    let response = get(url).await?.error_for_status()?;
    let bytes = response.bytes().await?;

    let catalog = Catalog::from_slice(&bytes)?;
    info!("Fetched {} menus from {url}", catalog.menus.len());

    Ok(catalog)
}

/// Remote catalog when `CATALOG_URL` is set, the local file otherwise.
pub async fn get_catalog(config: &Config) -> Result<Catalog, StartupError> {
    match &config.catalog_url {
        Some(url) => get_remote_catalog(url).await,
        None => Ok(load_catalog(&config.catalog_path)?),
    }
}
