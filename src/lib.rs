//! Vitibrasil statistics API.
//!
//! Scrapes Brazilian viticulture statistics (production, processing,
//! commercialization, import, export) from Embrapa's Vitibrasil HTML
//! report site and serves them through an authenticated HTTP API, with an
//! optional SQLite write-through cache.
//!
//! The interesting part lives in [`scrape`]: the upstream publishes an
//! irregular table where row meaning is encoded in cell CSS classes and
//! numbers use Brazilian locale separators with `-` as a "not disclosed"
//! sentinel. [`pipeline`] composes fetch → walk → normalize → aggregate
//! into the report shapes [`server`] exposes.

pub mod aggregate;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod populate;
pub mod scrape;
pub mod server;
pub mod store;

pub use error::{Error, Result};
