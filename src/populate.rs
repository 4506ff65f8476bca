//! Bulk cache population: walk every year × family × subtype and refresh
//! the store. Each key is fetched and replaced independently; a failing
//! key is logged and skipped so one bad year never stops the walk.

use tracing::{info, warn};

use crate::catalog::{ExportProduct, Family, ImportProduct, ProcessingGroup};
use crate::config::Config;
use crate::pipeline;
use crate::scrape::UpstreamClient;
use crate::store::Store;

/// Refresh the cache for the inclusive year range `[from, to]`.
pub async fn run(config: &Config, from: i32, to: i32) -> anyhow::Result<()> {
    let client = UpstreamClient::new(config.index_url(), config.timeout_secs)?;
    let db_path = config
        .db_path
        .clone()
        .unwrap_or_else(Config::default_db_path);
    let mut store = Store::open(&db_path)?;

    for ano in from..=to {
        info!(ano, "populating year");
        refresh_year(&client, &mut store, ano).await;
    }

    info!(from, to, "population finished");
    Ok(())
}

async fn refresh_year(client: &UpstreamClient, store: &mut Store, ano: i32) {
    match pipeline::producao(client, ano).await {
        Ok(report) => {
            if let Err(e) = store.replace_volume(Family::Producao, ano, &report.dados) {
                warn!(ano, error = %e, "failed to persist production rows");
            }
        }
        Err(e) => warn!(ano, error = %e, "production refresh failed"),
    }

    match pipeline::comercializacao(client, ano).await {
        Ok(report) => {
            if let Err(e) = store.replace_volume(Family::Comercializacao, ano, &report.dados) {
                warn!(ano, error = %e, "failed to persist commercialization rows");
            }
        }
        Err(e) => warn!(ano, error = %e, "commercialization refresh failed"),
    }

    for group in ProcessingGroup::ALL {
        match pipeline::processamento(client, ano, group).await {
            Ok(report) => {
                if let Err(e) = store.replace_processing(ano, group.key(), &report.dados) {
                    warn!(ano, tipo = group.key(), error = %e, "failed to persist processing rows");
                }
            }
            Err(e) => warn!(ano, tipo = group.key(), error = %e, "processing refresh failed"),
        }
    }

    for product in ImportProduct::ALL {
        match pipeline::importacao(client, ano, product).await {
            Ok(report) => {
                if let Err(e) =
                    store.replace_trade(Family::Importacao, ano, product.key(), &report.dados)
                {
                    warn!(ano, tipo = product.key(), error = %e, "failed to persist import rows");
                }
            }
            Err(e) => warn!(ano, tipo = product.key(), error = %e, "import refresh failed"),
        }
    }

    for product in ExportProduct::ALL {
        match pipeline::exportacao(client, ano, product).await {
            Ok(report) => {
                if let Err(e) =
                    store.replace_trade(Family::Exportacao, ano, product.key(), &report.dados)
                {
                    warn!(ano, tipo = product.key(), error = %e, "failed to persist export rows");
                }
            }
            Err(e) => warn!(ano, tipo = product.key(), error = %e, "export refresh failed"),
        }
    }
}
