//! Inbound project snapshot
//!
//! Every field is optional with a default; snapshots arrive half-filled
//! from the field and the engine degrades gracefully rather than rejecting
//! them. Raw metric values (CPI, SPI, progress) stay as strings here; the
//! analyzer normalizes them so the report can echo back exactly what was
//! supplied.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single schedule entry from the `Tasks:` block or structured payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleTask {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    /// Percent complete, 0-100.
    #[serde(default)]
    pub pct_complete: Option<f64>,
    /// Whether the task sits on the critical path.
    #[serde(default)]
    pub critical: bool,
}

/// Secondary performance indices, all with target 1.00 (below is worse).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PerformanceIndices {
    #[serde(default)]
    pub isp: Option<f64>,
    #[serde(default)]
    pub idp: Option<f64>,
    #[serde(default)]
    pub idco: Option<f64>,
    #[serde(default)]
    pub idb: Option<f64>,
}

impl PerformanceIndices {
    /// Iterate `(code, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<f64>)> {
        [
            ("ISP", self.isp),
            ("IDP", self.idp),
            ("IDCo", self.idco),
            ("IDB", self.idb),
        ]
        .into_iter()
    }

    /// Whether any index was reported.
    pub fn any(&self) -> bool {
        self.iter().any(|(_, v)| v.is_some())
    }
}

/// Approved baseline: schedule date, cost, and scope statement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Baseline {
    /// Baseline planned finish date (raw string; parsed on demand).
    #[serde(default)]
    pub schedule_date: Option<String>,
    /// Approved CAPEX (raw string; tolerant-parsed).
    #[serde(default)]
    pub approved_cost: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Financial pack: CAPEX positions and EVM figures, all raw strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialPack {
    #[serde(default)]
    pub approved_capex: Option<String>,
    #[serde(default)]
    pub committed_capex: Option<String>,
    #[serde(default)]
    pub executed_capex: Option<String>,
    #[serde(default)]
    pub ev: Option<String>,
    #[serde(default)]
    pub pv: Option<String>,
    #[serde(default)]
    pub ac: Option<String>,
    #[serde(default)]
    pub eac: Option<String>,
    #[serde(default)]
    pub vac: Option<String>,
}

impl FinancialPack {
    /// Whether any figure was reported.
    pub fn any(&self) -> bool {
        self.approved_capex.is_some()
            || self.committed_capex.is_some()
            || self.executed_capex.is_some()
            || self.ev.is_some()
            || self.pv.is_some()
            || self.ac.is_some()
            || self.eac.is_some()
            || self.vac.is_some()
    }
}

/// Full project status snapshot accepted by the analyze endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub contract_type: Option<String>,
    /// Free-form stakeholder list (`;`, `,`, `|`, or newline separated).
    #[serde(default)]
    pub stakeholders: Option<String>,
    /// Free-form observations; mined for risk keywords.
    #[serde(default)]
    pub notes: Option<String>,
    /// Strategic pillar declared by the project team.
    #[serde(default)]
    pub declared_pillar: Option<String>,

    /// Cost performance index, raw (e.g. "0,87").
    #[serde(default)]
    pub cpi: Option<String>,
    /// Schedule performance index, raw.
    #[serde(default)]
    pub spi: Option<String>,
    /// Physical progress percentage, raw (e.g. "65%").
    #[serde(default)]
    pub physical_progress: Option<String>,
    /// Financial progress percentage, raw.
    #[serde(default)]
    pub financial_progress: Option<String>,

    #[serde(default)]
    pub indices: PerformanceIndices,
    /// Planned finish date, raw string.
    #[serde(default)]
    pub planned_finish: Option<String>,
    #[serde(default)]
    pub baseline: Baseline,
    #[serde(default)]
    pub tasks: Vec<ScheduleTask>,
    #[serde(default)]
    pub financials: FinancialPack,

    #[serde(default)]
    pub status_summary: Vec<String>,
    #[serde(default)]
    pub next_period_plans: Vec<String>,
    #[serde(default)]
    pub attention_points: Vec<String>,
}

impl ProjectSnapshot {
    /// Display name, falling back when the field was not reported.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unidentified project")
    }

    /// Approved CAPEX: financial pack first, baseline cost as fallback.
    pub fn approved_capex_raw(&self) -> Option<&str> {
        self.financials
            .approved_capex
            .as_deref()
            .or(self.baseline.approved_cost.as_deref())
    }
}
