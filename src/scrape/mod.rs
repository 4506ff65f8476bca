//! Scraping pipeline: HTTP fetch, table walk, row classification, and
//! numeric cell normalization.

pub mod cell;
pub mod client;
pub mod rows;
pub mod table;

pub use client::UpstreamClient;
