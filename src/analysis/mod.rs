//! Analysis engine
//!
//! [`Analyzer`] orchestrates the component scorers over a
//! [`ProjectSnapshot`]: numeric normalization, risk scoring, pillar
//! inference and divergence, strategy fit, next-step tracks, lessons
//! learned, key risks, and the rendered executive report.

pub mod actions;
pub mod key_risks;
pub mod lessons;
pub mod pillar;
pub mod risk;
pub mod strategy_fit;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{FeatureConfig, TargetConfig};
use crate::ingest::numeric::{opt_number, opt_percent};
use crate::report;
use crate::types::{
    AnalysisReport, Kpis, NormalizedMetrics, ProjectSnapshot, RenderedReport, StrategyFit,
};

/// Financial pack after tolerant numeric parsing, scoped to the figures
/// the scorers consult.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FinanceFigures {
    pub approved: Option<f64>,
    pub committed: Option<f64>,
    pub eac: Option<f64>,
    pub vac: Option<f64>,
}

impl FinanceFigures {
    /// Parse the scoring-relevant figures from a snapshot.
    pub fn from_snapshot(snapshot: &ProjectSnapshot) -> Self {
        Self {
            approved: opt_number(snapshot.approved_capex_raw()),
            committed: opt_number(snapshot.financials.committed_capex.as_deref()),
            eac: opt_number(snapshot.financials.eac.as_deref()),
            vac: opt_number(snapshot.financials.vac.as_deref()),
        }
    }
}

/// The analysis orchestrator.
///
/// Holds the calibration it runs with, so tests and replay tools can pin
/// targets, feature flags, and the reference date.
pub struct Analyzer {
    targets: TargetConfig,
    features: FeatureConfig,
    today: NaiveDate,
}

impl Analyzer {
    /// Analyzer pinned to explicit calibration (tests, replay).
    pub const fn new(targets: TargetConfig, features: FeatureConfig, today: NaiveDate) -> Self {
        Self {
            targets,
            features,
            today,
        }
    }

    /// Analyzer using the global configuration and the current date.
    pub fn from_config() -> Self {
        let config = crate::config::get();
        Self::new(config.targets, config.features, Utc::now().date_naive())
    }

    /// Run the full analysis over a snapshot.
    pub fn analyze(&self, snapshot: ProjectSnapshot) -> AnalysisReport {
        let mut trace: Vec<String> = Vec::new();

        let metrics = NormalizedMetrics {
            cpi: opt_number(snapshot.cpi.as_deref()),
            spi: opt_number(snapshot.spi.as_deref()),
            physical_progress: opt_percent(snapshot.physical_progress.as_deref()),
            financial_progress: opt_percent(snapshot.financial_progress.as_deref()),
        };
        let indices = snapshot.indices;
        let fin = FinanceFigures::from_snapshot(&snapshot);

        let progress_gap = match (metrics.physical_progress, metrics.financial_progress) {
            (Some(p), Some(f)) => Some((p - f).abs()),
            _ => None,
        };
        let kpis = Kpis {
            progress_gap,
            cpi_gap: metrics.cpi.map(|v| self.targets.cpi - v),
            spi_gap: metrics.spi.map(|v| self.targets.spi - v),
        };

        let notes = snapshot.notes.clone().unwrap_or_default();
        let stakeholders = snapshot.stakeholders.clone().unwrap_or_default();

        // Pillar: declared always prevails; inference surfaces divergence.
        let suggested_pillar =
            pillar::infer_pillar(&snapshot, &metrics, &indices, &self.targets, &mut trace);
        let declared_pillar = snapshot
            .declared_pillar
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string);
        let divergent = pillar::is_divergent(declared_pillar.as_deref(), suggested_pillar);
        if divergent {
            if let (Some(declared), Some(suggested)) = (&declared_pillar, suggested_pillar) {
                trace.push(format!(
                    "Pillar divergence: declared '{declared}' vs suggested '{suggested}'"
                ));
            }
        }

        let mut score = risk::base_score(&metrics, &notes, &mut trace);
        score += risk::index_score(&indices, &self.targets, &mut trace);
        if self.features.schedule_pack {
            score += risk::schedule_score(&snapshot.tasks, self.today, &mut trace);
        }
        if self.features.finance_pack {
            score += risk::finance_score(&fin, &mut trace);
        }
        let risk_class = risk::classify(score);

        // Two next-step tracks: recommended follows the suggestion, current
        // follows whatever the team declared.
        let recommended_pillar_text = suggested_pillar
            .map(|p| p.display_name().to_string())
            .or_else(|| declared_pillar.clone())
            .unwrap_or_default();
        let recommended_next_steps = actions::next_steps(
            &metrics,
            progress_gap,
            &notes,
            &recommended_pillar_text,
            &stakeholders,
            &self.targets,
        );
        let current_next_steps = actions::next_steps(
            &metrics,
            progress_gap,
            &notes,
            declared_pillar.as_deref().unwrap_or_default(),
            &stakeholders,
            &self.targets,
        );

        let key_risks = key_risks::list_key_risks(
            &metrics,
            &indices,
            &snapshot.tasks,
            &fin,
            &notes,
            &self.targets,
            self.today,
        );

        let fit = if self.features.strategy_fit {
            strategy_fit::strategy_fit(&snapshot, &metrics, &indices, &self.targets)
        } else {
            StrategyFit::default()
        };

        let lessons_learned = if self.features.lessons_learned {
            lessons::suggest_lessons(
                &metrics,
                &kpis,
                &snapshot.tasks,
                &stakeholders,
                &self.targets,
                self.today,
            )
        } else {
            Vec::new()
        };

        let mut outcome = AnalysisReport {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            project: snapshot,
            metrics,
            indices,
            kpis,
            risk_score: score,
            risk_class,
            key_risks,
            declared_pillar,
            suggested_pillar,
            pillar_divergent: divergent,
            strategy_fit: fit,
            recommended_next_steps,
            current_next_steps,
            lessons_learned,
            external_evidence: Vec::new(),
            trace,
            rendered: RenderedReport::default(),
        };
        outcome.rendered = report::render(&outcome, self.features);
        outcome
    }
}
