//! Per-family extraction pipelines.
//!
//! Each function performs one upstream fetch, walks the table, normalizes
//! the rows, and assembles a report with totals. Families with subtypes
//! take the subtype explicitly; callers wanting every subtype dispatch
//! once per variant, each call independently fallible.

use tracing::info;

use crate::catalog::{ExportProduct, Family, ImportProduct, ProcessingGroup};
use crate::error::Result;
use crate::model::{
    CultivarItem, ProcessingReport, ProductItem, TradeItem, TradeReport, VolumeReport,
};
use crate::scrape::{table, UpstreamClient};

/// Production report for one year.
pub async fn producao(client: &UpstreamClient, ano: i32) -> Result<VolumeReport> {
    let html = client
        .fetch_report(Family::Producao.opcao(), ano, None)
        .await?;
    let dados: Vec<ProductItem> = table::parse_hierarchical(&html)
        .into_iter()
        .map(|row| ProductItem::from_row(row, ano))
        .collect();
    info!(ano, items = dados.len(), "production scrape finished");
    Ok(VolumeReport::assemble(ano, dados))
}

/// Commercialization report for one year.
pub async fn comercializacao(client: &UpstreamClient, ano: i32) -> Result<VolumeReport> {
    let html = client
        .fetch_report(Family::Comercializacao.opcao(), ano, None)
        .await?;
    let dados: Vec<ProductItem> = table::parse_hierarchical(&html)
        .into_iter()
        .map(|row| ProductItem::from_row(row, ano))
        .collect();
    info!(ano, items = dados.len(), "commercialization scrape finished");
    Ok(VolumeReport::assemble(ano, dados))
}

/// Processing report for one year and grape group.
pub async fn processamento(
    client: &UpstreamClient,
    ano: i32,
    group: ProcessingGroup,
) -> Result<ProcessingReport> {
    let html = client
        .fetch_report(Family::Processamento.opcao(), ano, Some(group.subopcao()))
        .await?;
    let dados: Vec<CultivarItem> = table::parse_cultivar(&html)
        .into_iter()
        .map(|row| CultivarItem::from_row(row, ano, group.key()))
        .collect();
    info!(ano, tipo = group.key(), items = dados.len(), "processing scrape finished");
    Ok(ProcessingReport::assemble(ano, group.key(), dados))
}

/// Import report for one year and product.
pub async fn importacao(
    client: &UpstreamClient,
    ano: i32,
    product: ImportProduct,
) -> Result<TradeReport> {
    let html = client
        .fetch_report(Family::Importacao.opcao(), ano, product.subopcao())
        .await?;
    let dados: Vec<TradeItem> = table::parse_trade(&html)
        .into_iter()
        .map(|row| TradeItem::from_row(row, ano, product.key()))
        .collect();
    info!(ano, tipo = product.key(), items = dados.len(), "import scrape finished");
    Ok(TradeReport::assemble(ano, product.key(), dados))
}

/// Export report for one year and product.
pub async fn exportacao(
    client: &UpstreamClient,
    ano: i32,
    product: ExportProduct,
) -> Result<TradeReport> {
    let html = client
        .fetch_report(Family::Exportacao.opcao(), ano, product.subopcao())
        .await?;
    let dados: Vec<TradeItem> = table::parse_trade(&html)
        .into_iter()
        .map(|row| TradeItem::from_row(row, ano, product.key()))
        .collect();
    info!(ano, tipo = product.key(), items = dados.len(), "export scrape finished");
    Ok(TradeReport::assemble(ano, product.key(), dados))
}
