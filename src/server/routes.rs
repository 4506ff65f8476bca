//! Request handlers.
//!
//! Every dataset endpoint follows the same cycle: validate the year, try
//! the cache, fetch and parse upstream on a miss, write through, respond.
//! Cell- and row-level scrape problems are invisible here beyond omitted
//! rows; only transport failures become error responses.

use axum::extract::{Path, Query, State};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{CurrentUser, SharedState};
use crate::catalog::{validate_year, ExportProduct, Family, ImportProduct, ProcessingGroup};
use crate::error::{Error, Result};
use crate::model::{ProcessingReport, TradeReport, VolumeReport};
use crate::pipeline;

/// Health/welcome endpoint, the only unauthenticated route besides login.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Bem-vindo à API de Dados de Vitivinicultura da Embrapa!" }))
}

#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// `POST /api/v1/auth/token` — exchange credentials for a bearer token.
pub async fn token(
    State(state): State<SharedState>,
    Form(form): Form<TokenForm>,
) -> Result<Json<TokenResponse>> {
    {
        let store = state.store.lock().await;
        state.authn.authenticate(&store, &form.username, &form.password)?;
    }
    info!(username = %form.username, "access token issued");
    Ok(Json(TokenResponse {
        access_token: state.authn.issue(&form.username),
        token_type: "bearer",
    }))
}

#[derive(Debug, Deserialize)]
pub struct AnoQuery {
    pub ano: i32,
}

/// `GET /api/v1/producao/?ano=`
pub async fn producao(
    State(state): State<SharedState>,
    _user: CurrentUser,
    Query(q): Query<AnoQuery>,
) -> Result<Json<VolumeReport>> {
    validate_year(q.ano)?;
    volume_report(&state, Family::Producao, q.ano).await.map(Json)
}

/// `GET /api/v1/comercializacao/?ano=`
pub async fn comercializacao(
    State(state): State<SharedState>,
    _user: CurrentUser,
    Query(q): Query<AnoQuery>,
) -> Result<Json<VolumeReport>> {
    validate_year(q.ano)?;
    volume_report(&state, Family::Comercializacao, q.ano)
        .await
        .map(Json)
}

/// `GET /api/v1/processamento/{tipo}/?ano=`
pub async fn processamento(
    State(state): State<SharedState>,
    _user: CurrentUser,
    Path(tipo): Path<String>,
    Query(q): Query<AnoQuery>,
) -> Result<Json<ProcessingReport>> {
    let group = ProcessingGroup::from_path(&tipo)?;
    validate_year(q.ano)?;

    if state.cache_enabled {
        let cached = state.store.lock().await.read_processing(q.ano, group.key())?;
        if !cached.is_empty() {
            debug!(ano = q.ano, tipo = group.key(), "processing cache hit");
            return Ok(Json(ProcessingReport::assemble(q.ano, group.key(), cached)));
        }
    }

    let report = pipeline::processamento(&state.client, q.ano, group).await?;
    if state.cache_enabled {
        state
            .store
            .lock()
            .await
            .replace_processing(q.ano, group.key(), &report.dados)?;
    }
    Ok(Json(report))
}

/// `GET /api/v1/importacao/{tipo}/?ano=`
pub async fn importacao(
    State(state): State<SharedState>,
    _user: CurrentUser,
    Path(tipo): Path<String>,
    Query(q): Query<AnoQuery>,
) -> Result<Json<TradeReport>> {
    let product = ImportProduct::from_path(&tipo)?;
    validate_year(q.ano)?;
    trade_report(&state, Family::Importacao, q.ano, product.key(), || {
        pipeline::importacao(&state.client, q.ano, product)
    })
    .await
    .map(Json)
}

/// `GET /api/v1/exportacao/{tipo}/?ano=`
pub async fn exportacao(
    State(state): State<SharedState>,
    _user: CurrentUser,
    Path(tipo): Path<String>,
    Query(q): Query<AnoQuery>,
) -> Result<Json<TradeReport>> {
    let product = ExportProduct::from_path(&tipo)?;
    validate_year(q.ano)?;
    trade_report(&state, Family::Exportacao, q.ano, product.key(), || {
        pipeline::exportacao(&state.client, q.ano, product)
    })
    .await
    .map(Json)
}

/// Cache-aware fetch for the hierarchical (volume) families.
async fn volume_report(state: &SharedState, family: Family, ano: i32) -> Result<VolumeReport> {
    if state.cache_enabled {
        let cached = state.store.lock().await.read_volume(family, ano)?;
        if !cached.is_empty() {
            debug!(ano, family = family.table(), "volume cache hit");
            return Ok(VolumeReport::assemble(ano, cached));
        }
    }

    let report = match family {
        Family::Producao => pipeline::producao(&state.client, ano).await?,
        Family::Comercializacao => pipeline::comercializacao(&state.client, ano).await?,
        other => return Err(Error::UnknownCategory(other.table().to_string())),
    };

    if state.cache_enabled {
        state
            .store
            .lock()
            .await
            .replace_volume(family, ano, &report.dados)?;
    }
    Ok(report)
}

/// Cache-aware fetch for the trade (import/export) families.
async fn trade_report<F, Fut>(
    state: &SharedState,
    family: Family,
    ano: i32,
    tipo: &str,
    fetch: F,
) -> Result<TradeReport>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<TradeReport>>,
{
    if state.cache_enabled {
        let cached = state.store.lock().await.read_trade(family, ano, tipo)?;
        if !cached.is_empty() {
            debug!(ano, tipo, family = family.table(), "trade cache hit");
            return Ok(TradeReport::assemble(ano, tipo, cached));
        }
    }

    let report = fetch().await?;

    if state.cache_enabled {
        state
            .store
            .lock()
            .await
            .replace_trade(family, ano, tipo, &report.dados)?;
    }
    Ok(report)
}
