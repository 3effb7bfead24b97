//! Strategic pillar inference
//!
//! Scores the snapshot's narrative fields against keyword families for the
//! three pillars, nudged by hard metrics (CPI/SPI and the secondary indices
//! below target pull toward Organizational Excellence). The declared pillar
//! always prevails as the effective pillar; inference exists to surface
//! divergence, never to override.

use crate::config::TargetConfig;
use crate::ingest::numeric::normalize;
use crate::types::{NormalizedMetrics, PerformanceIndices, Pillar, ProjectSnapshot};

/// Keyword stems signalling Organizational Excellence.
pub(crate) const EXCELLENCE_KEYWORDS: &[&str] = &[
    "process", "structure", "governance", "ritual", "target", "cascad", "coherence", "execution",
];

/// Keyword stems signalling Customer Focus.
pub(crate) const CUSTOMER_KEYWORDS: &[&str] = &[
    "customer", "client", "experience", "sla", "journey", "reliability", "satisfaction", "service",
];

/// Keyword stems signalling Strategic Capital Allocation.
pub(crate) const CAPITAL_KEYWORDS: &[&str] = &[
    "capex", "investment", "prioritization", "return", "npv", "irr", "payback",
    "capital discipline",
];

/// Stems that specifically emphasize investment return.
pub(crate) const RETURN_KEYWORDS: &[&str] = &["return", "npv", "irr", "payback"];

/// Join and normalize the narrative fields mined for pillar signals.
pub fn narrative_corpus(snapshot: &ProjectSnapshot) -> String {
    let mut parts: Vec<String> = Vec::new();
    for field in [&snapshot.notes, &snapshot.objective, &snapshot.scope] {
        if let Some(text) = field {
            parts.push(normalize(text));
        }
    }
    for bullets in [&snapshot.status_summary, &snapshot.next_period_plans] {
        for bullet in bullets {
            parts.push(normalize(bullet));
        }
    }
    parts.join(" ")
}

pub(crate) fn contains_any(corpus: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| corpus.contains(k))
}

/// Infer the best-fitting pillar, or `None` when the snapshot carries no
/// signal at all.
pub fn infer_pillar(
    snapshot: &ProjectSnapshot,
    metrics: &NormalizedMetrics,
    indices: &PerformanceIndices,
    targets: &TargetConfig,
    trace: &mut Vec<String>,
) -> Option<Pillar> {
    let corpus = narrative_corpus(snapshot);

    let mut excellence = 0_i32;
    let mut customer = 0_i32;
    let mut capital = 0_i32;

    if contains_any(&corpus, EXCELLENCE_KEYWORDS) {
        excellence += 2;
    }
    if contains_any(&corpus, CUSTOMER_KEYWORDS) {
        customer += 2;
    }
    if contains_any(&corpus, CAPITAL_KEYWORDS) {
        capital += 2;
    }

    let cpi_below = metrics.cpi.is_some_and(|v| v < targets.cpi);
    let spi_below = metrics.spi.is_some_and(|v| v < targets.spi);
    if cpi_below || spi_below {
        excellence += 2;
        trace.push("Pillar hint: Organizational Excellence (CPI/SPI below target)".to_string());
    }
    for (_, value) in indices.iter() {
        if value.is_some_and(|v| v < targets.index) {
            excellence += 1;
        }
    }

    let capex_present = snapshot
        .approved_capex_raw()
        .and_then(crate::ingest::numeric::parse_number)
        .is_some();
    if contains_any(&corpus, RETURN_KEYWORDS) || capex_present {
        capital += 1;
    }

    let mut ranked = [
        (Pillar::OrganizationalExcellence, excellence),
        (Pillar::CustomerFocus, customer),
        (Pillar::CapitalAllocation, capital),
    ];
    ranked.sort_by_key(|(_, score)| std::cmp::Reverse(*score));

    let (winner, top) = ranked[0];
    if top == 0 {
        return None;
    }
    trace.push(format!(
        "Suggested pillar: {winner} (scores: E={excellence}, C={customer}, K={capital})"
    ));
    Some(winner)
}

/// Whether declared and suggested pillars diverge (normalized comparison).
pub fn is_divergent(declared: Option<&str>, suggested: Option<Pillar>) -> bool {
    match (declared, suggested) {
        (Some(declared), Some(suggested)) => {
            !declared.trim().is_empty()
                && normalize(declared) != normalize(suggested.display_name())
        }
        _ => false,
    }
}

/// Rationale line for a pillar named by free text (declared pillars).
///
/// Falls back to echoing the declared text when it matches no known pillar.
pub fn rationale_for_text(pillar_text: &str) -> String {
    let norm = normalize(pillar_text);
    if norm.contains("excellence") {
        Pillar::OrganizationalExcellence.rationale().to_string()
    } else if norm.contains("customer") || norm.contains("client") {
        Pillar::CustomerFocus.rationale().to_string()
    } else if norm.contains("capital") || norm.contains("allocation") {
        Pillar::CapitalAllocation.rationale().to_string()
    } else {
        format!("Declared pillar: {pillar_text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> TargetConfig {
        TargetConfig::default()
    }

    #[test]
    fn test_empty_snapshot_has_no_suggestion() {
        let snapshot = ProjectSnapshot::default();
        let mut trace = Vec::new();
        let pillar = infer_pillar(
            &snapshot,
            &NormalizedMetrics::default(),
            &PerformanceIndices::default(),
            &targets(),
            &mut trace,
        );
        assert!(pillar.is_none());
        assert!(trace.is_empty());
    }

    #[test]
    fn test_customer_keywords_win() {
        let snapshot = ProjectSnapshot {
            objective: Some("Improve customer experience and SLA reliability".to_string()),
            ..ProjectSnapshot::default()
        };
        let mut trace = Vec::new();
        let pillar = infer_pillar(
            &snapshot,
            &NormalizedMetrics::default(),
            &PerformanceIndices::default(),
            &targets(),
            &mut trace,
        );
        assert_eq!(pillar, Some(Pillar::CustomerFocus));
    }

    #[test]
    fn test_metrics_below_target_pull_excellence() {
        // Customer keywords score 2, but CPI below target adds 2 to
        // excellence and IDP below 1.00 adds 1 more.
        let snapshot = ProjectSnapshot {
            objective: Some("customer journey improvements".to_string()),
            ..ProjectSnapshot::default()
        };
        let metrics = NormalizedMetrics {
            cpi: Some(0.85),
            ..NormalizedMetrics::default()
        };
        let indices = PerformanceIndices {
            idp: Some(0.92),
            ..PerformanceIndices::default()
        };
        let mut trace = Vec::new();
        let pillar = infer_pillar(&snapshot, &metrics, &indices, &targets(), &mut trace);
        assert_eq!(pillar, Some(Pillar::OrganizationalExcellence));
        assert!(trace.iter().any(|t| t.contains("CPI/SPI below target")));
    }

    #[test]
    fn test_capex_presence_nudges_capital() {
        let snapshot = ProjectSnapshot {
            objective: Some("payback driven investment program".to_string()),
            financials: crate::types::FinancialPack {
                approved_capex: Some("120000000".to_string()),
                ..crate::types::FinancialPack::default()
            },
            ..ProjectSnapshot::default()
        };
        let mut trace = Vec::new();
        let pillar = infer_pillar(
            &snapshot,
            &NormalizedMetrics::default(),
            &PerformanceIndices::default(),
            &targets(),
            &mut trace,
        );
        assert_eq!(pillar, Some(Pillar::CapitalAllocation));
    }

    #[test]
    fn test_divergence_detection() {
        assert!(is_divergent(
            Some("Customer Focus"),
            Some(Pillar::OrganizationalExcellence)
        ));
        assert!(!is_divergent(
            Some("organizational excellence"),
            Some(Pillar::OrganizationalExcellence)
        ));
        assert!(!is_divergent(None, Some(Pillar::CustomerFocus)));
        assert!(!is_divergent(Some("Customer Focus"), None));
    }

    #[test]
    fn test_rationale_for_unknown_text_echoes() {
        assert!(rationale_for_text("Moonshot").contains("Moonshot"));
        assert!(rationale_for_text("customer focus").contains("Customer Focus:"));
    }
}
