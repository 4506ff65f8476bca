//! SQLite persistence: scraped-report cache and the user store.
//!
//! Cache keys are `(ano, family[, tipo])`. A refresh replaces the whole key
//! inside one transaction (delete then insert), so a concurrent reader sees
//! either the old rows or the new rows, never a mix. Rows are read back in
//! insertion order, which preserves the upstream document order.

use std::path::Path;

use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::catalog::Family;
use crate::error::{Error, Result};
use crate::model::{CultivarItem, ProductItem, TradeItem};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        username TEXT PRIMARY KEY,
        password_sha256 TEXT NOT NULL,
        disabled INTEGER NOT NULL DEFAULT 0
    );
    CREATE TABLE IF NOT EXISTS producao (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ano INTEGER NOT NULL,
        produto TEXT NOT NULL,
        sub_produto TEXT,
        quantidade_litros REAL
    );
    CREATE INDEX IF NOT EXISTS idx_producao_ano ON producao(ano);
    CREATE TABLE IF NOT EXISTS comercializacao (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ano INTEGER NOT NULL,
        produto TEXT NOT NULL,
        sub_produto TEXT,
        quantidade_litros REAL
    );
    CREATE INDEX IF NOT EXISTS idx_comercializacao_ano ON comercializacao(ano);
    CREATE TABLE IF NOT EXISTS processamento (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ano INTEGER NOT NULL,
        tipo TEXT NOT NULL,
        cultivar TEXT NOT NULL,
        quantidade_kg REAL
    );
    CREATE INDEX IF NOT EXISTS idx_processamento_ano_tipo ON processamento(ano, tipo);
    CREATE TABLE IF NOT EXISTS importacao (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ano INTEGER NOT NULL,
        tipo TEXT NOT NULL,
        pais TEXT NOT NULL,
        quantidade_kg REAL,
        valor_usd REAL
    );
    CREATE INDEX IF NOT EXISTS idx_importacao_ano_tipo ON importacao(ano, tipo);
    CREATE TABLE IF NOT EXISTS exportacao (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ano INTEGER NOT NULL,
        tipo TEXT NOT NULL,
        pais TEXT NOT NULL,
        quantidade_kg REAL,
        valor_usd REAL
    );
    CREATE INDEX IF NOT EXISTS idx_exportacao_ano_tipo ON exportacao(ano, tipo);
";

/// SQLite-backed store. All methods serialize through the connection.
pub struct Store {
    db: Connection,
}

impl Store {
    /// Open or create the store at `path`, creating parent directories and
    /// the schema as needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Connection::open(path)?;
        db.execute_batch(SCHEMA)?;
        info!(path = %path.display(), "store opened");
        Ok(Self { db })
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory()?;
        db.execute_batch(SCHEMA)?;
        Ok(Self { db })
    }

    // ─── users ──────────────────────────────────────────────────────────

    /// Create or overwrite a user with an already-hashed password.
    pub fn upsert_user(&self, username: &str, password_sha256: &str) -> Result<()> {
        self.db.execute(
            "INSERT OR REPLACE INTO users (username, password_sha256, disabled)
             VALUES (?1, ?2, 0)",
            params![username, password_sha256],
        )?;
        Ok(())
    }

    /// Look up a user's password hash and disabled flag.
    pub fn user_credentials(&self, username: &str) -> Result<Option<(String, bool)>> {
        let mut stmt = self
            .db
            .prepare("SELECT password_sha256, disabled FROM users WHERE username = ?1")?;
        let row = stmt.query_row(params![username], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? != 0))
        });
        match row {
            Ok(creds) => Ok(Some(creds)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Error::Cache(e)),
        }
    }

    // ─── hierarchical reports (producao, comercializacao) ───────────────

    /// Replace all cached rows for `(family, ano)` with `items`, atomically.
    pub fn replace_volume(
        &mut self,
        family: Family,
        ano: i32,
        items: &[ProductItem],
    ) -> Result<()> {
        let table = family.table();
        let tx = self.db.transaction()?;
        let deleted = tx.execute(&format!("DELETE FROM {table} WHERE ano = ?1"), params![ano])?;
        for item in items {
            tx.execute(
                &format!(
                    "INSERT INTO {table} (ano, produto, sub_produto, quantidade_litros)
                     VALUES (?1, ?2, ?3, ?4)"
                ),
                params![ano, item.produto, item.sub_produto, item.quantidade_litros],
            )?;
        }
        tx.commit()?;
        debug!(table, ano, deleted, inserted = items.len(), "volume cache refreshed");
        Ok(())
    }

    /// Cached rows for `(family, ano)`, in insertion order.
    pub fn read_volume(&self, family: Family, ano: i32) -> Result<Vec<ProductItem>> {
        let mut stmt = self.db.prepare(&format!(
            "SELECT produto, sub_produto, quantidade_litros FROM {} WHERE ano = ?1 ORDER BY id",
            family.table()
        ))?;
        let items = stmt
            .query_map(params![ano], |row| {
                Ok(ProductItem {
                    produto: row.get(0)?,
                    sub_produto: row.get(1)?,
                    quantidade_litros: row.get(2)?,
                    ano,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    // ─── processing reports ─────────────────────────────────────────────

    pub fn replace_processing(
        &mut self,
        ano: i32,
        tipo: &str,
        items: &[CultivarItem],
    ) -> Result<()> {
        let tx = self.db.transaction()?;
        tx.execute(
            "DELETE FROM processamento WHERE ano = ?1 AND tipo = ?2",
            params![ano, tipo],
        )?;
        for item in items {
            tx.execute(
                "INSERT INTO processamento (ano, tipo, cultivar, quantidade_kg)
                 VALUES (?1, ?2, ?3, ?4)",
                params![ano, tipo, item.cultivar, item.quantidade_kg],
            )?;
        }
        tx.commit()?;
        debug!(ano, tipo, inserted = items.len(), "processing cache refreshed");
        Ok(())
    }

    pub fn read_processing(&self, ano: i32, tipo: &str) -> Result<Vec<CultivarItem>> {
        let mut stmt = self.db.prepare(
            "SELECT cultivar, quantidade_kg FROM processamento
             WHERE ano = ?1 AND tipo = ?2 ORDER BY id",
        )?;
        let items = stmt
            .query_map(params![ano, tipo], |row| {
                Ok(CultivarItem {
                    cultivar: row.get(0)?,
                    quantidade_kg: row.get(1)?,
                    ano,
                    tipo: tipo.to_string(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    // ─── trade reports (importacao, exportacao) ─────────────────────────

    pub fn replace_trade(
        &mut self,
        family: Family,
        ano: i32,
        tipo: &str,
        items: &[TradeItem],
    ) -> Result<()> {
        let table = family.table();
        let tx = self.db.transaction()?;
        tx.execute(
            &format!("DELETE FROM {table} WHERE ano = ?1 AND tipo = ?2"),
            params![ano, tipo],
        )?;
        for item in items {
            tx.execute(
                &format!(
                    "INSERT INTO {table} (ano, tipo, pais, quantidade_kg, valor_usd)
                     VALUES (?1, ?2, ?3, ?4, ?5)"
                ),
                params![ano, tipo, item.pais, item.quantidade_kg, item.valor_usd],
            )?;
        }
        tx.commit()?;
        debug!(table, ano, tipo, inserted = items.len(), "trade cache refreshed");
        Ok(())
    }

    pub fn read_trade(&self, family: Family, ano: i32, tipo: &str) -> Result<Vec<TradeItem>> {
        let mut stmt = self.db.prepare(&format!(
            "SELECT pais, quantidade_kg, valor_usd FROM {}
             WHERE ano = ?1 AND tipo = ?2 ORDER BY id",
            family.table()
        ))?;
        let items = stmt
            .query_map(params![ano, tipo], |row| {
                Ok(TradeItem {
                    pais: row.get(0)?,
                    quantidade_kg: row.get(1)?,
                    valor_usd: row.get(2)?,
                    ano,
                    tipo: tipo.to_string(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }
}
