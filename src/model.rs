//! Normalized items and the report shapes the API serves.
//!
//! Field names follow the upstream vocabulary (`produto`, `pais`, `ano`) so
//! the JSON surface reads the same as the site it mirrors. An absent
//! quantity serializes as `null` and means "not disclosed or unparseable",
//! which is not the same thing as zero.

use serde::{Deserialize, Serialize};

use crate::aggregate::{round2, sum_present};
use crate::scrape::cell;
use crate::scrape::table::{CultivarRow, ProductRow, TradeRow};

/// One production/commercialization line, normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductItem {
    pub produto: String,
    pub sub_produto: Option<String>,
    pub quantidade_litros: Option<f64>,
    pub ano: i32,
}

/// One processing line, normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultivarItem {
    pub cultivar: String,
    pub quantidade_kg: Option<f64>,
    pub ano: i32,
    pub tipo: String,
}

/// One import/export line, normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeItem {
    pub pais: String,
    pub quantidade_kg: Option<f64>,
    pub valor_usd: Option<f64>,
    pub ano: i32,
    pub tipo: String,
}

impl ProductItem {
    pub fn from_row(row: ProductRow, ano: i32) -> Self {
        Self {
            produto: row.produto,
            sub_produto: row.sub_produto,
            quantidade_litros: cell::normalize(&row.quantidade_raw),
            ano,
        }
    }
}

impl CultivarItem {
    pub fn from_row(row: CultivarRow, ano: i32, tipo: &str) -> Self {
        Self {
            cultivar: row.cultivar,
            quantidade_kg: cell::normalize(&row.quantidade_raw),
            ano,
            tipo: tipo.to_string(),
        }
    }
}

impl TradeItem {
    pub fn from_row(row: TradeRow, ano: i32, tipo: &str) -> Self {
        Self {
            pais: row.pais,
            quantidade_kg: cell::normalize(&row.quantidade_raw),
            valor_usd: cell::normalize(&row.valor_raw),
            ano,
            tipo: tipo.to_string(),
        }
    }
}

/// Response for production and commercialization queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeReport {
    pub ano_referencia: i32,
    pub dados: Vec<ProductItem>,
    pub total_geral_litros: f64,
}

impl VolumeReport {
    /// Assemble a report, computing the liters total from the items.
    pub fn assemble(ano: i32, dados: Vec<ProductItem>) -> Self {
        let total = sum_present(dados.iter().map(|d| d.quantidade_litros));
        Self {
            ano_referencia: ano,
            dados,
            total_geral_litros: round2(total),
        }
    }
}

/// Response for processing queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub ano_referencia: i32,
    pub tipo: String,
    pub dados: Vec<CultivarItem>,
    pub total_geral_kg: f64,
}

impl ProcessingReport {
    pub fn assemble(ano: i32, tipo: &str, dados: Vec<CultivarItem>) -> Self {
        let total = sum_present(dados.iter().map(|d| d.quantidade_kg));
        Self {
            ano_referencia: ano,
            tipo: tipo.to_string(),
            dados,
            total_geral_kg: round2(total),
        }
    }
}

/// Response for import and export queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeReport {
    pub ano_referencia: i32,
    pub tipo: String,
    pub dados: Vec<TradeItem>,
    pub total_geral_kg: f64,
    pub total_geral_usd: f64,
}

impl TradeReport {
    pub fn assemble(ano: i32, tipo: &str, dados: Vec<TradeItem>) -> Self {
        let total_kg = sum_present(dados.iter().map(|d| d.quantidade_kg));
        let total_usd = sum_present(dados.iter().map(|d| d.valor_usd));
        Self {
            ano_referencia: ano,
            tipo: tipo.to_string(),
            dados,
            total_geral_kg: round2(total_kg),
            total_geral_usd: round2(total_usd),
        }
    }
}
