//! Next-step generation
//!
//! Deterministic playbook items with D+n due tags, keyed off metric gaps,
//! note keywords, and the pillar in focus. Two tracks are generated by the
//! orchestrator: one aligned to the suggested pillar (recommended) and one
//! to the declared pillar (current).

use crate::config::TargetConfig;
use crate::ingest::numeric::normalize;
use crate::types::NormalizedMetrics;

/// Split a free-form stakeholder string on `;`, `,`, newline, or `|`.
pub fn split_stakeholders(stakeholders: &str) -> Vec<String> {
    let trimmed = stakeholders.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    for sep in [';', ',', '\n', '|'] {
        if trimmed.contains(sep) {
            return trimmed
                .split(sep)
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(ToString::to_string)
                .collect();
        }
    }
    vec![trimmed.to_string()]
}

/// Deduplicate preserving first-occurrence order.
pub fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Generate the next-step list for one pillar track.
///
/// `pillar_text` is free text: the display name of a suggested pillar or
/// whatever the project team declared. Matching is substring-based so both
/// forms work.
pub fn next_steps(
    metrics: &NormalizedMetrics,
    progress_gap: Option<f64>,
    notes: &str,
    pillar_text: &str,
    stakeholders: &str,
    targets: &TargetConfig,
) -> Vec<String> {
    let mut steps: Vec<String> = Vec::new();

    if metrics.cpi.is_some_and(|v| v < targets.cpi) {
        steps.push("Establish a cost containment and scope variation plan (D+7).".to_string());
        steps.push("Review measurement curves and the financial baseline (D+10).".to_string());
    }
    if metrics.spi.is_some_and(|v| v < targets.spi) {
        steps.push("Replan the critical path and renegotiate critical milestones (D+5).".to_string());
        steps.push("Evaluate schedule compression / fast-tracking where applicable (D+10).".to_string());
    }
    if let Some(gap) = progress_gap {
        if gap >= 15.0 {
            steps.push(
                "Investigate the physical vs financial asymmetry (>=15pp): measurement audit (D+7)."
                    .to_string(),
            );
        } else if gap >= 8.0 {
            steps.push(
                "Align physical vs financial measurement criteria (>=8pp) (D+10).".to_string(),
            );
        }
    }

    let notes_norm = normalize(notes);
    if notes_norm.contains("supplier") {
        steps.push(
            "Hold an executive session with the critical supplier and a 5W2H plan (D+3)."
                .to_string(),
        );
    }
    if notes_norm.contains("equip") || notes_norm.contains("critic") {
        steps.push(
            "Activate contingency for critical equipment and logistics alternatives (D+7)."
                .to_string(),
        );
    }
    if notes_norm.contains("licens")
        || notes_norm.contains("permit")
        || notes_norm.contains("embargo")
        || notes_norm.contains("stoppag")
    {
        steps.push(
            "Engage the regulatory/legal front to unblock permits and embargoes (D+3)."
                .to_string(),
        );
    }

    let pillar_norm = normalize(pillar_text);
    if pillar_norm.contains("excellence") {
        steps.push("Cascade operational targets and a weekly governance RACI (D+7).".to_string());
        steps.push(
            "Install performance rituals with leading/lagging indicators (D+14).".to_string(),
        );
    }
    if pillar_norm.contains("customer") || pillar_norm.contains("client") {
        steps.push("Map the customer journey and adjust communication SLAs (D+15).".to_string());
        steps.push("Run a satisfaction/NPS pulse until the next milestone (D+30).".to_string());
    }
    if pillar_norm.contains("capital") || pillar_norm.contains("allocation") {
        steps.push("Reprioritize CAPEX by risk-adjusted return (D+20).".to_string());
        steps.push("Review the business case and scope/financing options (D+30).".to_string());
    }

    let owners = split_stakeholders(stakeholders);
    if !owners.is_empty() {
        let named: Vec<&str> = owners.iter().take(3).map(String::as_str).collect();
        steps.push(format!("Suggested owners: {}.", named.join(", ")));
    }

    dedup_preserving_order(steps)
}
