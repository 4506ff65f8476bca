//! HTTP client for the upstream report site.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::Result;

/// The site rejects default HTTP-library identifiers, so requests carry a
/// browser-like user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Client for `GET <base>/index.php?opcao=..&ano=..[&subopcao=..]`.
///
/// One synchronous fetch per report, bounded by a fixed timeout. Timeouts,
/// connection failures, and non-success statuses all surface as
/// `UpstreamUnavailable`; they are never retried here.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    index_url: String,
}

impl UpstreamClient {
    pub fn new(index_url: String, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        info!(url = %index_url, timeout_secs, "upstream client ready");
        Ok(Self { http, index_url })
    }

    /// Fetch one report page and return its HTML body.
    pub async fn fetch_report(
        &self,
        opcao: &str,
        ano: i32,
        subopcao: Option<&str>,
    ) -> Result<String> {
        let mut query: Vec<(&str, String)> =
            vec![("opcao", opcao.to_string()), ("ano", ano.to_string())];
        if let Some(sub) = subopcao {
            query.push(("subopcao", sub.to_string()));
        }

        debug!(opcao, ano, ?subopcao, "fetching upstream report");
        let response = self
            .http
            .get(&self.index_url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}
