use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::db;
use crate::ledger::{LedgerStore, PgLedger};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub ledger: Arc<dyn LedgerStore>,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = db::connect(
            &config.database_url,
            config.max_connections,
            config.ledger_tx_timeout(),
        )
        .await?;
        db::migrate(&pool).await?;

        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_json_file(path)?,
            None => Catalog::standard(),
        };
        tracing::info!(items = catalog.len(), "catalog loaded");

        let ledger = Arc::new(PgLedger::new(pool, config.ledger_tx_timeout())) as Arc<dyn LedgerStore>;

        Ok(Self::from_parts(config, ledger, Arc::new(catalog)))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        ledger: Arc<dyn LedgerStore>,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            config,
            ledger,
            catalog,
        }
    }
}
