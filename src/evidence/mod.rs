//! External evidence lookups
//!
//! Optional enrichment of the analysis with evidence bullets fetched from
//! operator-configured sources. Disabled by default; enable via the
//! `features.external_evidence` flag or `VERA_EVIDENCE_ENABLED=true`.
//!
//! Each allowlisted source is queried with `?q=<topic>` and must answer a
//! JSON array of strings. Lookups are best-effort: failures are logged and
//! skipped, never surfaced to the caller.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::EvidenceConfig;

/// Upper bound on evidence bullets returned per analysis.
const MAX_EVIDENCE_ITEMS: usize = 10;

/// Client for the external evidence sources.
#[derive(Clone)]
pub struct EvidenceClient {
    client: reqwest::Client,
    sources: Vec<String>,
    enabled: bool,
}

impl EvidenceClient {
    /// Build from config. `enabled` reflects the feature flag at startup.
    pub fn new(config: &EvidenceConfig, enabled: bool) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            sources: config.sources.clone(),
            enabled,
        }
    }

    /// Whether lookups will actually run.
    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.sources.is_empty()
    }

    /// Query every allowlisted source for every topic. Returns an empty
    /// list when disabled.
    pub async fn gather(&self, topics: &[String]) -> Vec<String> {
        if !self.is_enabled() {
            return Vec::new();
        }

        let mut evidence = Vec::new();
        'outer: for source in &self.sources {
            for topic in topics {
                match self.query(source, topic).await {
                    Ok(items) => {
                        debug!(source = %source, topic = %topic, count = items.len(), "Evidence lookup");
                        evidence.extend(items);
                        if evidence.len() >= MAX_EVIDENCE_ITEMS {
                            break 'outer;
                        }
                    }
                    Err(e) => {
                        warn!(source = %source, topic = %topic, error = %e, "Evidence lookup failed, skipping");
                    }
                }
            }
        }
        evidence.truncate(MAX_EVIDENCE_ITEMS);
        evidence
    }

    async fn query(&self, source: &str, topic: &str) -> Result<Vec<String>, reqwest::Error> {
        self.client
            .get(source)
            .query(&[("q", topic)])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<String>>()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_client_returns_empty() {
        let client = EvidenceClient::new(&EvidenceConfig::default(), false);
        assert!(!client.is_enabled());
        let evidence = client.gather(&["supplier delay".to_string()]).await;
        assert!(evidence.is_empty());
    }

    #[tokio::test]
    async fn test_enabled_without_sources_is_inert() {
        // Flag on but no allowlist configured, still no lookups.
        let client = EvidenceClient::new(&EvidenceConfig::default(), true);
        assert!(!client.is_enabled());
        assert!(client.gather(&["anything".to_string()]).await.is_empty());
    }
}
