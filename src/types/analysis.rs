//! Analysis outcome types
//!
//! [`AnalysisReport`] is the full payload returned by the analyze endpoints
//! and persisted to history. The `rendered.text` field is the stable
//! contract consumed by downstream automations; the structured fields exist
//! for dashboards and programmatic consumers.

use serde::{Deserialize, Serialize};

use super::project::{PerformanceIndices, ProjectSnapshot};

/// Risk classification. There is no Critical tier by policy; High absorbs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskClass {
    Low,
    Medium,
    High,
}

impl RiskClass {
    /// Indicator emoji used in the rendered report.
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::High => "🔴",
            Self::Medium => "🟠",
            Self::Low => "🟢",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for RiskClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The three strategic pillars projects are assessed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pillar {
    OrganizationalExcellence,
    CustomerFocus,
    CapitalAllocation,
}

impl Pillar {
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::OrganizationalExcellence => "Organizational Excellence",
            Self::CustomerFocus => "Customer Focus",
            Self::CapitalAllocation => "Strategic Capital Allocation",
        }
    }

    /// One-line rationale shown in the pillar section of the report.
    pub const fn rationale(self) -> &'static str {
        match self {
            Self::OrganizationalExcellence => {
                "Organizational Excellence: align people, processes, structure and \
                 incentives to the strategy; cascade targets for cross-area coherence \
                 and coordinated execution."
            }
            Self::CustomerFocus => {
                "Customer Focus: put the customer at the center, understand needs, \
                 anticipate solutions and continuously improve journeys with \
                 reliability and SLAs."
            }
            Self::CapitalAllocation => {
                "Strategic Capital Allocation: prioritize investments that maximize \
                 long-term value, with capital discipline and risk-adjusted selection \
                 (NPV/IRR)."
            }
        }
    }
}

impl std::fmt::Display for Pillar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Primary metrics after tolerant numeric normalization.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NormalizedMetrics {
    pub cpi: Option<f64>,
    pub spi: Option<f64>,
    /// Physical progress, percentage points.
    pub physical_progress: Option<f64>,
    /// Financial progress, percentage points.
    pub financial_progress: Option<f64>,
}

/// Derived KPI gaps against targets.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Kpis {
    /// |physical − financial| progress gap in percentage points.
    pub progress_gap: Option<f64>,
    /// Target CPI minus observed CPI (positive means below target).
    pub cpi_gap: Option<f64>,
    /// Target SPI minus observed SPI.
    pub spi_gap: Option<f64>,
}

/// Strategy-fit assessment: how strongly the snapshot signals one pillar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyFit {
    /// 0-100 dominant-pillar share; `None` when the feature is disabled.
    pub score: Option<u8>,
    pub suggested_pillar: Option<Pillar>,
    pub rationale: Option<String>,
}

/// Auto-suggested lesson learned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub problem: String,
    pub root_cause: String,
    pub countermeasure: String,
    pub owner: String,
    /// D+n due tag, e.g. "D+14".
    pub due: String,
    pub category: String,
}

/// The executive report rendered in three formats. `text` is the stable
/// downstream contract; `markdown` mirrors it; `html` is an escaped variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderedReport {
    pub text: String,
    pub markdown: String,
    pub html: String,
}

/// Full analysis outcome returned by the analyze endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub engine_version: String,
    /// The snapshot as interpreted (defaults filled, text parsed).
    pub project: ProjectSnapshot,
    pub metrics: NormalizedMetrics,
    pub indices: PerformanceIndices,
    pub kpis: Kpis,

    pub risk_score: f64,
    pub risk_class: RiskClass,
    pub key_risks: Vec<String>,

    pub declared_pillar: Option<String>,
    pub suggested_pillar: Option<Pillar>,
    pub pillar_divergent: bool,
    pub strategy_fit: StrategyFit,

    pub recommended_next_steps: Vec<String>,
    pub current_next_steps: Vec<String>,
    pub lessons_learned: Vec<Lesson>,
    pub external_evidence: Vec<String>,

    /// Human-readable accounting of every scoring contribution.
    pub trace: Vec<String>,
    pub rendered: RenderedReport,
}
