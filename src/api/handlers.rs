//! API route handlers
//!
//! Request handling for the analyze endpoints, analysis history, and the
//! health check.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::Analyzer;
use crate::evidence::EvidenceClient;
use crate::ingest::parse_status_text;
use crate::storage::{HistoryEntry, HistoryStorage};
use crate::types::{AnalysisReport, ProjectSnapshot};

use super::error::ApiError;

/// Default and maximum page sizes for the history endpoint.
const DEFAULT_HISTORY_LIMIT: usize = 20;
const MAX_HISTORY_LIMIT: usize = 200;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    /// Analysis history; `None` when the database failed to open.
    pub history: Option<HistoryStorage>,
    /// External evidence client (inert unless enabled and allowlisted).
    pub evidence: EvidenceClient,
}

impl ApiState {
    /// State with no history persistence and evidence lookups off.
    pub fn detached() -> Self {
        Self {
            history: None,
            evidence: EvidenceClient::new(&crate::config::EvidenceConfig::default(), false),
        }
    }
}

// ============================================================================
// Health Endpoint
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /health - service liveness and version.
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Analyze Endpoints
// ============================================================================

/// Request body for the free-text analyze endpoint.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Run the analyzer over a snapshot, enrich with evidence, persist.
async fn analyze_snapshot(state: &ApiState, snapshot: ProjectSnapshot) -> AnalysisReport {
    let mut report = Analyzer::from_config().analyze(snapshot);

    if state.evidence.is_enabled() {
        let topics: Vec<String> = report.key_risks.iter().take(3).cloned().collect();
        report.external_evidence = state.evidence.gather(&topics).await;
    }

    if let Some(history) = &state.history {
        if let Err(e) = history.store(&report) {
            warn!(error = %e, "Failed to persist analysis to history");
        }
    }

    report
}

/// POST /api/v1/analyze - analyze a structured project snapshot.
pub async fn analyze(
    State(state): State<ApiState>,
    Json(snapshot): Json<ProjectSnapshot>,
) -> Json<AnalysisReport> {
    Json(analyze_snapshot(&state, snapshot).await)
}

/// POST /api/v1/analyze/text - analyze pasted status text.
///
/// Returns 400 when the text is blank; anything else parses (missing
/// fields default to "not reported").
pub async fn analyze_text(
    State(state): State<ApiState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<AnalysisReport>, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::bad_request("text must not be blank"));
    }
    let snapshot = parse_status_text(&request.text);
    Ok(Json(analyze_snapshot(&state, snapshot).await))
}

// ============================================================================
// History Endpoint
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// Response for the history endpoint.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Total analyses stored
    pub total: usize,
    pub entries: Vec<HistoryEntry>,
}

/// GET /api/v1/history - recent analyses, newest first.
pub async fn get_history(
    State(state): State<ApiState>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);

    let Some(history) = &state.history else {
        return Json(HistoryResponse {
            total: 0,
            entries: Vec::new(),
        });
    };

    Json(HistoryResponse {
        total: history.count(),
        entries: history.recent(limit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{self, AppConfig};
    use crate::types::RiskClass;

    fn ensure_config() {
        if !config::is_initialized() {
            config::init(AppConfig::default());
        }
    }

    #[tokio::test]
    async fn test_health_reports_version() {
        let resp = get_health().await;
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_analyze_structured_snapshot() {
        ensure_config();
        let snapshot = ProjectSnapshot {
            name: Some("Alpha".to_string()),
            cpi: Some("0,80".to_string()),
            ..ProjectSnapshot::default()
        };
        let Json(report) = analyze(State(ApiState::detached()), Json(snapshot)).await;
        assert_eq!(report.project.name.as_deref(), Some("Alpha"));
        assert_eq!(report.risk_score, 5.0);
        assert!(report.external_evidence.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_text_blank_is_rejected() {
        ensure_config();
        let result = analyze_text(
            State(ApiState::detached()),
            Json(TextRequest {
                text: "   \n ".to_string(),
            }),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_analyze_text_parses_and_scores() {
        ensure_config();
        let result = analyze_text(
            State(ApiState::detached()),
            Json(TextRequest {
                text: "Project Name: Beta\nCPI: 1.05\nSPI: 1.02".to_string(),
            }),
        )
        .await;
        let Json(report) = result.unwrap();
        assert_eq!(report.project.name.as_deref(), Some("Beta"));
        assert_eq!(report.risk_class, RiskClass::Low);
    }

    #[tokio::test]
    async fn test_history_without_storage_is_empty() {
        ensure_config();
        let Json(resp) = get_history(
            State(ApiState::detached()),
            Query(HistoryQuery { limit: None }),
        )
        .await;
        assert_eq!(resp.total, 0);
        assert!(resp.entries.is_empty());
    }

    #[tokio::test]
    async fn test_history_returns_persisted_analyses() {
        ensure_config();
        let dir = tempfile::tempdir().unwrap();
        let state = ApiState {
            history: Some(HistoryStorage::open(dir.path().join("history.db")).unwrap()),
            ..ApiState::detached()
        };

        let snapshot = ProjectSnapshot {
            name: Some("Gamma".to_string()),
            ..ProjectSnapshot::default()
        };
        let _ = analyze(State(state.clone()), Json(snapshot)).await;

        let Json(resp) = get_history(
            State(state),
            Query(HistoryQuery { limit: Some(10) }),
        )
        .await;
        assert_eq!(resp.total, 1);
        assert_eq!(resp.entries[0].report.project.name.as_deref(), Some("Gamma"));
    }
}
