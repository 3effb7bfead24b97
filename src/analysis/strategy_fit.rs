//! Strategy-fit scoring
//!
//! Quantifies how strongly the snapshot signals one pillar: the same
//! keyword families as pillar inference, with heavier weights, normalized
//! so the score is the dominant pillar's share of all signal (0-100).

use crate::config::TargetConfig;
use crate::types::{NormalizedMetrics, PerformanceIndices, Pillar, ProjectSnapshot, StrategyFit};

use super::pillar::{
    contains_any, narrative_corpus, CAPITAL_KEYWORDS, CUSTOMER_KEYWORDS, EXCELLENCE_KEYWORDS,
};

/// Compute the strategy-fit assessment.
pub fn strategy_fit(
    snapshot: &ProjectSnapshot,
    metrics: &NormalizedMetrics,
    indices: &PerformanceIndices,
    targets: &TargetConfig,
) -> StrategyFit {
    let corpus = narrative_corpus(snapshot);

    let mut excellence = 0_u32;
    let mut customer = 0_u32;
    let mut capital = 0_u32;

    if contains_any(&corpus, EXCELLENCE_KEYWORDS) {
        excellence += 20;
    }
    if contains_any(&corpus, CUSTOMER_KEYWORDS) {
        customer += 20;
    }
    if contains_any(&corpus, CAPITAL_KEYWORDS) {
        capital += 20;
    }

    for (value, target) in [(metrics.cpi, targets.cpi), (metrics.spi, targets.spi)] {
        if value.is_some_and(|v| v < target) {
            excellence += 10;
        }
    }
    for (_, value) in indices.iter() {
        if value.is_some_and(|v| v < targets.index) {
            excellence += 5;
        }
    }

    let total = excellence + customer + capital;
    if total == 0 {
        return StrategyFit {
            score: Some(0),
            suggested_pillar: None,
            rationale: Some("Insufficient signal.".to_string()),
        };
    }

    let mut ranked = [
        (Pillar::OrganizationalExcellence, excellence),
        (Pillar::CustomerFocus, customer),
        (Pillar::CapitalAllocation, capital),
    ];
    ranked.sort_by_key(|(_, score)| std::cmp::Reverse(*score));
    let (winner, top) = ranked[0];

    let score = ((f64::from(top) / f64::from(total)) * 100.0).clamp(0.0, 100.0) as u8;

    StrategyFit {
        score: Some(score),
        suggested_pillar: Some(winner),
        rationale: Some(winner.rationale().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> TargetConfig {
        TargetConfig::default()
    }

    #[test]
    fn test_no_signal_scores_zero() {
        let fit = strategy_fit(
            &ProjectSnapshot::default(),
            &NormalizedMetrics::default(),
            &PerformanceIndices::default(),
            &targets(),
        );
        assert_eq!(fit.score, Some(0));
        assert!(fit.suggested_pillar.is_none());
    }

    #[test]
    fn test_single_family_scores_full_share() {
        let snapshot = ProjectSnapshot {
            objective: Some("customer journey and satisfaction".to_string()),
            ..ProjectSnapshot::default()
        };
        let fit = strategy_fit(
            &snapshot,
            &NormalizedMetrics::default(),
            &PerformanceIndices::default(),
            &targets(),
        );
        assert_eq!(fit.score, Some(100));
        assert_eq!(fit.suggested_pillar, Some(Pillar::CustomerFocus));
        assert!(fit.rationale.unwrap().contains("Customer Focus"));
    }

    #[test]
    fn test_metrics_shift_share_toward_excellence() {
        // Customer keywords (20) vs excellence pulled by CPI+SPI below
        // target (20) plus two indices below 1.00 (10): excellence 30/50.
        let snapshot = ProjectSnapshot {
            objective: Some("customer experience program".to_string()),
            ..ProjectSnapshot::default()
        };
        let metrics = NormalizedMetrics {
            cpi: Some(0.80),
            spi: Some(0.90),
            ..NormalizedMetrics::default()
        };
        let indices = PerformanceIndices {
            isp: Some(0.95),
            idp: Some(0.97),
            ..PerformanceIndices::default()
        };
        let fit = strategy_fit(&snapshot, &metrics, &indices, &targets());
        assert_eq!(fit.suggested_pillar, Some(Pillar::OrganizationalExcellence));
        assert_eq!(fit.score, Some(60));
    }
}
