use std::sync::Arc;

use bowl::Catalog;
use tracing::warn;

use super::{config::Config, error::StartupError, remote::get_catalog};

pub struct State {
    pub catalog: Catalog,
    pub config: Config,
}

impl State {
    pub async fn new() -> Result<Arc<Self>, StartupError> {
        let config = Config::load()?;
        let catalog = get_catalog(&config).await?;

        Ok(Self::from_parts(catalog, config))
    }

    pub fn from_parts(catalog: Catalog, config: Config) -> Arc<Self> {
        for issue in catalog.lint() {
            warn!("Catalog: {issue}");
        }

        Arc::new(Self { catalog, config })
    }
}
