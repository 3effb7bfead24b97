//! Key risk listing
//!
//! Human-readable risk bullets mirroring the scoring rules, for the risks
//! section of the executive report. Deduplicated, order-preserving.

use chrono::NaiveDate;

use crate::config::TargetConfig;
use crate::ingest::numeric::normalize;
use crate::types::{NormalizedMetrics, PerformanceIndices, ScheduleTask};

use super::actions::dedup_preserving_order;
use super::risk::is_overdue;
use super::FinanceFigures;

/// Note keyword stems mapped to their risk bullet.
const NOTE_RISK_MAP: &[(&str, &str)] = &[
    ("licens", "Regulatory: permit/authorization risk."),
    ("permit", "Regulatory: permit/authorization risk."),
    ("embargo", "Regulatory: embargo/interdiction risk."),
    ("stoppag", "Operations: work-front stoppage risk."),
    ("supplier", "Supply: dependency on a critical supplier."),
    ("pressure", "Financial: cost pressure on packages."),
    ("equip", "Technical: sensitive equipment supply."),
    ("critic", "Critical risk cited in notes."),
    ("risk", "Additional risk cited in notes."),
];

/// Build the key-risk bullet list for the report.
pub fn list_key_risks(
    metrics: &NormalizedMetrics,
    indices: &PerformanceIndices,
    tasks: &[ScheduleTask],
    fin: &FinanceFigures,
    notes: &str,
    targets: &TargetConfig,
    today: NaiveDate,
) -> Vec<String> {
    let mut risks: Vec<String> = Vec::new();

    if let Some(cpi) = metrics.cpi {
        if cpi < 0.85 {
            risks.push("Cost: CPI < 0.85 — strong budget risk.".to_string());
        } else if cpi < targets.cpi {
            risks.push("Cost: CPI between 0.85 and 0.90 — cost pressure.".to_string());
        }
    }
    if let Some(spi) = metrics.spi {
        if spi < 0.90 {
            risks.push("Schedule: SPI < 0.90 — high delay risk.".to_string());
        } else if spi < targets.spi {
            risks.push("Schedule: SPI between 0.90 and 0.95 — slippage risk.".to_string());
        }
    }
    if let (Some(phys), Some(finp)) = (metrics.physical_progress, metrics.financial_progress) {
        let gap = (phys - finp).abs();
        if gap >= 15.0 {
            risks.push(
                "Execution: physical vs financial gap >= 15pp — measurement inconsistency risk."
                    .to_string(),
            );
        } else if gap >= 8.0 {
            risks.push(
                "Execution: physical vs financial gap >= 8pp — watch measurement coherence."
                    .to_string(),
            );
        }
    }

    for (code, value) in indices.iter() {
        if let Some(v) = value {
            if v < targets.index {
                risks.push(format!(
                    "Index {code} below {:.2} ({v:.2}).",
                    targets.index
                ));
            }
        }
    }

    for task in tasks {
        if is_overdue(task, today) {
            if task.critical {
                risks.push(format!("Schedule: critical task overdue — {}.", task.name));
            } else {
                risks.push(format!("Schedule: task overdue — {}.", task.name));
            }
        }
    }

    if fin.vac.is_some_and(|vac| vac < 0.0) {
        risks.push("Financial: negative VAC — forecast above approved.".to_string());
    }
    if let (Some(approved), Some(eac)) = (fin.approved, fin.eac) {
        if eac > approved {
            risks.push("Financial: EAC above approved CAPEX.".to_string());
        }
    }
    if let (Some(approved), Some(committed)) = (fin.approved, fin.committed) {
        if committed > approved {
            risks.push("Financial: committed above approved.".to_string());
        }
    }

    let notes_norm = normalize(notes);
    for (stem, message) in NOTE_RISK_MAP {
        if notes_norm.contains(stem) {
            risks.push((*message).to_string());
        }
    }

    dedup_preserving_order(risks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    #[test]
    fn test_empty_inputs_list_no_risks() {
        let risks = list_key_risks(
            &NormalizedMetrics::default(),
            &PerformanceIndices::default(),
            &[],
            &FinanceFigures::default(),
            "",
            &TargetConfig::default(),
            today(),
        );
        assert!(risks.is_empty());
    }

    #[test]
    fn test_metric_bands_produce_messages() {
        let metrics = NormalizedMetrics {
            cpi: Some(0.80),
            spi: Some(0.92),
            physical_progress: Some(65.0),
            financial_progress: Some(48.0),
        };
        let risks = list_key_risks(
            &metrics,
            &PerformanceIndices::default(),
            &[],
            &FinanceFigures::default(),
            "",
            &TargetConfig::default(),
            today(),
        );
        assert!(risks.iter().any(|r| r.contains("strong budget risk")));
        assert!(risks.iter().any(|r| r.contains("slippage risk")));
        assert!(risks.iter().any(|r| r.contains(">= 15pp")));
    }

    #[test]
    fn test_index_below_target_is_listed() {
        let indices = PerformanceIndices {
            idco: Some(0.93),
            ..PerformanceIndices::default()
        };
        let risks = list_key_risks(
            &NormalizedMetrics::default(),
            &indices,
            &[],
            &FinanceFigures::default(),
            "",
            &TargetConfig::default(),
            today(),
        );
        assert_eq!(risks, vec!["Index IDCo below 1.00 (0.93)."]);
    }

    #[test]
    fn test_note_keywords_map_and_dedup() {
        // "licens" and "permit" both map to the same message, listed once.
        let risks = list_key_risks(
            &NormalizedMetrics::default(),
            &PerformanceIndices::default(),
            &[],
            &FinanceFigures::default(),
            "license pending, permit under review, supplier exposure",
            &TargetConfig::default(),
            today(),
        );
        assert_eq!(
            risks
                .iter()
                .filter(|r| r.contains("permit/authorization"))
                .count(),
            1
        );
        assert!(risks.iter().any(|r| r.contains("critical supplier")));
    }

    #[test]
    fn test_financial_risks_listed() {
        let fin = FinanceFigures {
            approved: Some(100.0),
            committed: Some(110.0),
            eac: Some(120.0),
            vac: Some(-20.0),
        };
        let risks = list_key_risks(
            &NormalizedMetrics::default(),
            &PerformanceIndices::default(),
            &[],
            &fin,
            "",
            &TargetConfig::default(),
            today(),
        );
        assert_eq!(risks.len(), 3);
    }
}
