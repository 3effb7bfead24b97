//! Risk scoring
//!
//! Additive score built from four component scorers (base metrics, secondary
//! indices, schedule, financials), classified into Low / Medium / High.
//! Every point contributed appends a line to the scoring trace so the final
//! number can always be accounted for.

use chrono::NaiveDate;

use crate::config::TargetConfig;
use crate::ingest::numeric::normalize;
use crate::types::{NormalizedMetrics, PerformanceIndices, RiskClass, ScheduleTask};

use super::FinanceFigures;

/// Keyword stems mined from the notes field. Each hit adds a point to the
/// base score, capped at 4.
pub(crate) const NOTE_KEYWORDS: &[&str] = &[
    "delay", "licens", "permit", "embargo", "stoppag", "supplier", "pressure", "cost", "penalt",
    "sanction", "risk", "equip", "critic",
];

/// Count note keyword hits (accent/case-insensitive), uncapped.
pub(crate) fn note_keyword_hits(notes: &str) -> usize {
    let norm = normalize(notes);
    NOTE_KEYWORDS.iter().filter(|k| norm.contains(*k)).count()
}

/// Base score from CPI, SPI, the physical-vs-financial progress gap, and
/// note keywords.
///
/// Bands are fixed calibration, not targets: CPI below 0.85 is a strong
/// budget signal regardless of where the target sits.
pub fn base_score(metrics: &NormalizedMetrics, notes: &str, trace: &mut Vec<String>) -> f64 {
    let mut score = 0.0;

    if let Some(cpi) = metrics.cpi {
        if cpi < 0.85 {
            score += 5.0;
            trace.push("CPI < 0.85: +5".to_string());
        } else if cpi < 0.90 {
            score += 3.0;
            trace.push("0.85 <= CPI < 0.90: +3".to_string());
        }
    }

    if let Some(spi) = metrics.spi {
        if spi < 0.90 {
            score += 5.0;
            trace.push("SPI < 0.90: +5".to_string());
        } else if spi < 0.95 {
            score += 3.0;
            trace.push("0.90 <= SPI < 0.95: +3".to_string());
        }
    }

    if let (Some(phys), Some(fin)) = (metrics.physical_progress, metrics.financial_progress) {
        let gap = (phys - fin).abs();
        if gap >= 15.0 {
            score += 2.0;
            trace.push("Physical vs financial progress gap >= 15pp: +2".to_string());
        } else if gap >= 8.0 {
            score += 1.0;
            trace.push("Physical vs financial progress gap >= 8pp: +1".to_string());
        }
    }

    let hits = note_keyword_hits(notes);
    if hits > 0 {
        let add = hits.min(4) as f64;
        score += add;
        trace.push(format!("Note keywords (+{add})"));
    }

    score
}

/// Score from the secondary performance indices (target 1.00).
pub fn index_score(
    indices: &PerformanceIndices,
    targets: &TargetConfig,
    trace: &mut Vec<String>,
) -> f64 {
    let mut score = 0.0;
    for (code, value) in indices.iter() {
        let Some(v) = value else { continue };
        if v < 0.90 {
            score += 3.0;
            trace.push(format!("{code} < 0.90: +3"));
        } else if v < targets.index {
            score += 1.0;
            trace.push(format!("0.90 <= {code} < {:.2}: +1", targets.index));
        } else {
            trace.push(format!("{code} >= {:.2}: +0", targets.index));
        }
    }
    score
}

/// Whether a task is overdue: past its end date and not complete.
pub(crate) fn is_overdue(task: &ScheduleTask, today: NaiveDate) -> bool {
    task.end
        .is_some_and(|end| end < today && task.pct_complete.map_or(true, |p| p < 100.0))
}

/// Score from the schedule: overdue tasks and stalled critical tasks.
pub fn schedule_score(tasks: &[ScheduleTask], today: NaiveDate, trace: &mut Vec<String>) -> f64 {
    let mut score = 0.0;
    for task in tasks {
        let overdue = is_overdue(task, today);
        if overdue && task.critical {
            score += 3.0;
            trace.push(format!("Critical task overdue: {} (+3)", task.name));
        } else if overdue {
            score += 1.0;
            trace.push(format!("Task overdue: {} (+1)", task.name));
        }
        if task.critical && task.pct_complete.is_some_and(|p| p < 30.0) {
            score += 1.0;
            trace.push(format!("Critical task under 30%: {} (+1)", task.name));
        }
    }
    score
}

/// Score from the financial pack: VAC, EAC vs approved, committed vs approved.
pub fn finance_score(fin: &FinanceFigures, trace: &mut Vec<String>) -> f64 {
    let mut score = 0.0;
    if fin.vac.is_some_and(|vac| vac < 0.0) {
        score += 3.0;
        trace.push("VAC < 0 (forecast above approved): +3".to_string());
    }
    if let (Some(approved), Some(eac)) = (fin.approved, fin.eac) {
        if eac > approved {
            score += 2.0;
            trace.push("EAC > approved CAPEX: +2".to_string());
        }
    }
    if let (Some(approved), Some(committed)) = (fin.approved, fin.committed) {
        if committed > approved {
            score += 2.0;
            trace.push("Committed > approved CAPEX: +2".to_string());
        }
    }
    score
}

/// Classify the total score. High absorbs what other models call Critical.
pub const fn classify(score: f64) -> RiskClass {
    if score >= 7.0 {
        RiskClass::High
    } else if score >= 4.0 {
        RiskClass::Medium
    } else {
        RiskClass::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(cpi: Option<f64>, spi: Option<f64>, phys: Option<f64>, fin: Option<f64>) -> NormalizedMetrics {
        NormalizedMetrics {
            cpi,
            spi,
            physical_progress: phys,
            financial_progress: fin,
        }
    }

    #[test]
    fn test_base_score_cpi_bands() {
        let mut trace = Vec::new();
        assert_eq!(base_score(&metrics(Some(0.80), None, None, None), "", &mut trace), 5.0);
        assert_eq!(base_score(&metrics(Some(0.87), None, None, None), "", &mut trace), 3.0);
        assert_eq!(base_score(&metrics(Some(0.95), None, None, None), "", &mut trace), 0.0);
    }

    #[test]
    fn test_base_score_spi_bands() {
        let mut trace = Vec::new();
        assert_eq!(base_score(&metrics(None, Some(0.85), None, None), "", &mut trace), 5.0);
        assert_eq!(base_score(&metrics(None, Some(0.92), None, None), "", &mut trace), 3.0);
        assert_eq!(base_score(&metrics(None, Some(0.99), None, None), "", &mut trace), 0.0);
    }

    #[test]
    fn test_base_score_progress_gap() {
        let mut trace = Vec::new();
        assert_eq!(base_score(&metrics(None, None, Some(65.0), Some(48.0)), "", &mut trace), 2.0);
        assert_eq!(base_score(&metrics(None, None, Some(65.0), Some(56.0)), "", &mut trace), 1.0);
        assert_eq!(base_score(&metrics(None, None, Some(65.0), Some(62.0)), "", &mut trace), 0.0);
    }

    #[test]
    fn test_base_score_note_keywords_capped() {
        let mut trace = Vec::new();
        let notes = "supplier delay, cost pressure, permit risk, critical equipment";
        // 7 stems hit, capped at 4
        let score = base_score(&metrics(None, None, None, None), notes, &mut trace);
        assert_eq!(score, 4.0);
        assert!(trace.iter().any(|t| t.contains("+4")));
    }

    #[test]
    fn test_base_score_missing_metrics_contribute_nothing() {
        let mut trace = Vec::new();
        assert_eq!(base_score(&metrics(None, None, None, None), "", &mut trace), 0.0);
        assert!(trace.is_empty());
    }

    #[test]
    fn test_index_score_bands() {
        let targets = TargetConfig::default();
        let mut trace = Vec::new();
        let indices = PerformanceIndices {
            isp: Some(0.85),  // +3
            idp: Some(0.95),  // +1
            idco: Some(1.05), // +0
            idb: None,
        };
        assert_eq!(index_score(&indices, &targets, &mut trace), 4.0);
        // traces written for the three reported indices only
        assert_eq!(trace.len(), 3);
    }

    #[test]
    fn test_schedule_score_overdue_and_stalled() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let mut trace = Vec::new();
        let tasks = vec![
            ScheduleTask {
                name: "Foundation".to_string(),
                end: NaiveDate::from_ymd_opt(2025, 9, 15),
                pct_complete: Some(60.0),
                critical: true,
                ..ScheduleTask::default()
            },
            ScheduleTask {
                name: "Piping".to_string(),
                end: NaiveDate::from_ymd_opt(2025, 9, 20),
                pct_complete: Some(90.0),
                critical: false,
                ..ScheduleTask::default()
            },
            ScheduleTask {
                name: "Commissioning".to_string(),
                end: NaiveDate::from_ymd_opt(2025, 12, 10),
                pct_complete: Some(0.0),
                critical: true,
                ..ScheduleTask::default()
            },
        ];
        // Foundation: overdue critical +3; Piping: overdue +1;
        // Commissioning: not overdue but critical under 30% +1
        assert_eq!(schedule_score(&tasks, today, &mut trace), 5.0);
    }

    #[test]
    fn test_schedule_score_completed_task_not_overdue() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let mut trace = Vec::new();
        let tasks = vec![ScheduleTask {
            name: "Done".to_string(),
            end: NaiveDate::from_ymd_opt(2025, 9, 1),
            pct_complete: Some(100.0),
            critical: true,
            ..ScheduleTask::default()
        }];
        assert_eq!(schedule_score(&tasks, today, &mut trace), 0.0);
    }

    #[test]
    fn test_finance_score_components() {
        let mut trace = Vec::new();
        let fin = FinanceFigures {
            approved: Some(120_000_000.0),
            committed: Some(125_000_000.0),
            eac: Some(131_000_000.0),
            vac: Some(-11_000_000.0),
        };
        // VAC<0 +3, EAC>approved +2, committed>approved +2
        assert_eq!(finance_score(&fin, &mut trace), 7.0);
    }

    #[test]
    fn test_finance_score_healthy() {
        let mut trace = Vec::new();
        let fin = FinanceFigures {
            approved: Some(120.0),
            committed: Some(100.0),
            eac: Some(115.0),
            vac: Some(5.0),
        };
        assert_eq!(finance_score(&fin, &mut trace), 0.0);
        assert!(trace.is_empty());
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(classify(7.0), RiskClass::High);
        assert_eq!(classify(6.9), RiskClass::Medium);
        assert_eq!(classify(4.0), RiskClass::Medium);
        assert_eq!(classify(3.9), RiskClass::Low);
        assert_eq!(classify(0.0), RiskClass::Low);
    }
}
