//! Executive report formatter
//!
//! Renders the analysis outcome into the approved section layout. The plain
//! text body is the stable contract downstream automations ingest verbatim;
//! markdown mirrors it and HTML is the same body escaped with `<br/>`
//! line breaks. Optional sections are omitted when their inputs are absent.

use crate::config::FeatureConfig;
use crate::types::{AnalysisReport, RenderedReport};

const NOT_REPORTED: &str = "Not reported";

fn raw_or_not_reported(value: Option<&str>) -> &str {
    value.filter(|s| !s.trim().is_empty()).unwrap_or(NOT_REPORTED)
}

fn push_bullets(lines: &mut Vec<String>, header: &str, bullets: &[String]) {
    if bullets.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(header.to_string());
    lines.extend(bullets.iter().map(|b| format!("- {b}")));
}

/// Render the three report formats from an analysis outcome.
pub fn render(outcome: &AnalysisReport, features: FeatureConfig) -> RenderedReport {
    let project = &outcome.project;
    let name = project.display_name();
    let cpi = raw_or_not_reported(project.cpi.as_deref());
    let spi = raw_or_not_reported(project.spi.as_deref());
    let physical = raw_or_not_reported(project.physical_progress.as_deref());
    let financial = raw_or_not_reported(project.financial_progress.as_deref());
    let contract = raw_or_not_reported(project.contract_type.as_deref());
    let stakeholders = raw_or_not_reported(project.stakeholders.as_deref());
    let notes = raw_or_not_reported(project.notes.as_deref());
    let risk = outcome.risk_class;

    let mut lines: Vec<String> = vec![
        format!("📊 Predictive Executive Report – Project \"{name}\""),
        String::new(),
        "✅ General Status".to_string(),
        format!("CPI: {cpi}"),
        format!("SPI: {spi}"),
        format!("Physical Progress: {physical}"),
        format!("Financial Progress: {financial}"),
        format!("Contract Type: {contract}"),
        format!("Stakeholders: {stakeholders}"),
        format!(
            "Risk (classification): {risk} {} (internal score: {:.1})",
            risk.emoji(),
            outcome.risk_score
        ),
        format!("Notes: {notes}"),
    ];
    if let Some(scope) = project.scope.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push(format!("Scope: {scope}"));
    }
    if let Some(finish) = project
        .planned_finish
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        lines.push(format!("Planned Finish Date: {finish}"));
    }

    lines.push(String::new());
    lines.push("🎯 Project Objective".to_string());
    lines.push(
        project
            .objective
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("—")
            .to_string(),
    );

    push_bullets(
        &mut lines,
        "📝 CURRENT STATUS SUMMARY (PROGRESS) AND CORRECTIVE ACTIONS TAKEN",
        &project.status_summary,
    );
    push_bullets(&mut lines, "📅 PLANS FOR THE NEXT PERIOD", &project.next_period_plans);
    push_bullets(&mut lines, "🔎 ATTENTION POINTS", &project.attention_points);

    lines.push(String::new());
    lines.push("📈 Performance Diagnosis".to_string());
    lines.push(format!("- Cost: CPI at {cpi} → budget discipline."));
    lines.push(format!("- Schedule: SPI at {spi} → critical path management."));
    lines.push(format!(
        "- Execution: physical ({physical}) vs financial ({financial})."
    ));
    lines.push(format!(
        "- Contract: \"{contract}\" → reinforce scope/cost governance."
    ));
    if let Some(gap) = outcome.kpis.progress_gap {
        lines.push(format!("- Physical vs financial gap: {gap:.1}pp."));
    }
    if outcome.indices.any() {
        lines.push("- Performance indices (target = 1.00):".to_string());
        for (code, value) in outcome.indices.iter() {
            if let Some(v) = value {
                lines.push(format!("  • {code}: {v:.2}"));
            }
        }
    }

    if features.finance_pack && project.financials.any() {
        lines.push(String::new());
        lines.push("💰 Financial Summary".to_string());
        let fin = &project.financials;
        if let Some(v) = project.approved_capex_raw() {
            lines.push(format!("- Approved CAPEX: {v}"));
        }
        if let Some(v) = &fin.committed_capex {
            lines.push(format!("- Committed CAPEX: {v}"));
        }
        if let Some(v) = &fin.executed_capex {
            lines.push(format!("- Executed CAPEX: {v}"));
        }
        let evm: Vec<String> = [
            ("EV", &fin.ev),
            ("PV", &fin.pv),
            ("AC", &fin.ac),
            ("EAC", &fin.eac),
            ("VAC", &fin.vac),
        ]
        .iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}={v}")))
        .collect();
        if !evm.is_empty() {
            lines.push(format!("- {}", evm.join(", ")));
        }
    }

    push_bullets(&mut lines, "⚠️ Key Risks Identified", &outcome.key_risks);

    lines.extend(
        [
            "",
            "📅 Impact Projection",
            "- Short term: risk of further delays and cost pressure.",
            "- Medium term: impact on contractual milestones and strategic targets.",
            "- Stakeholders: intensify monitoring and executive communication.",
            "",
            "🧭 Strategic Recommendations (general targets)",
            "- Review the critical path and renegotiate critical deliveries.",
            "- Targets: CPI >= 0.90 and SPI >= 0.95.",
            "- Integrate areas and reinforce productivity control.",
            "",
            "🏛 Strategic Pillar (focus)",
        ]
        .map(ToString::to_string),
    );

    let declared = outcome.declared_pillar.as_deref();
    if let Some(declared) = declared {
        lines.push(format!("- Declared pillar: {declared}"));
    }
    if outcome.pillar_divergent {
        if let Some(suggested) = outcome.suggested_pillar {
            lines.push(format!(
                "- Suggested pillar (analysis): {suggested} ⚠️ (realignment recommended)"
            ));
            lines.push(format!("- Rationale (suggested): {}", suggested.rationale()));
        }
        if let Some(declared) = declared {
            lines.push(format!(
                "- Rationale (current): {}",
                crate::analysis::pillar::rationale_for_text(declared)
            ));
        }
    } else {
        let (shown, rationale) = match (declared, outcome.suggested_pillar) {
            (Some(d), _) => (
                d.to_string(),
                crate::analysis::pillar::rationale_for_text(d),
            ),
            (None, Some(s)) => (s.to_string(), s.rationale().to_string()),
            (None, None) => (NOT_REPORTED.to_string(), String::new()),
        };
        lines.push(format!("- Pillar: {shown}"));
        if !rationale.is_empty() {
            lines.push(format!("- Rationale: {rationale}"));
        }
    }

    if features.strategy_fit {
        if let Some(score) = outcome.strategy_fit.score {
            lines.push(String::new());
            lines.push("📐 Strategy Fit".to_string());
            lines.push(format!("- Score (0-100): {score}"));
            if let Some(pillar) = outcome.strategy_fit.suggested_pillar {
                lines.push(format!("- Dominant pillar suggested: {pillar}"));
            }
        }
    }

    push_bullets(
        &mut lines,
        "▶ Next Steps — (Recommended, aligned to the suggested pillar)",
        &outcome.recommended_next_steps,
    );
    push_bullets(
        &mut lines,
        "▶ Next Steps — (Current, aligned to the declared pillar)",
        &outcome.current_next_steps,
    );

    if !outcome.lessons_learned.is_empty() {
        lines.push(String::new());
        lines.push("📚 Lessons Learned (suggested)".to_string());
        for lesson in &outcome.lessons_learned {
            lines.push(format!("- Problem: {}", lesson.problem));
            lines.push(format!("  • Root cause: {}", lesson.root_cause));
            lines.push(format!("  • Countermeasure: {}", lesson.countermeasure));
            lines.push(format!(
                "  • Owner: {}   • Due: {}   • Category: {}",
                lesson.owner, lesson.due, lesson.category
            ));
        }
    }

    lines.push(String::new());
    lines.push("✅ Executive Summary".to_string());
    let summary_pillar = if outcome.pillar_divergent {
        outcome
            .suggested_pillar
            .map(|p| p.display_name().to_string())
            .unwrap_or_else(|| NOT_REPORTED.to_string())
    } else {
        declared
            .map(ToString::to_string)
            .or_else(|| outcome.suggested_pillar.map(|p| p.display_name().to_string()))
            .unwrap_or_else(|| NOT_REPORTED.to_string())
    };
    lines.push(format!(
        "Project \"{name}\" requires {} attention {}. Consider focusing on the {summary_pillar} \
         pillar and execution discipline to secure value and delivery.",
        risk.label().to_lowercase(),
        risk.emoji()
    ));

    let text = lines.join("\n").trim().to_string();
    let markdown = text.clone();
    let html = html_escape::encode_text(&text).replace('\n', "<br/>");

    RenderedReport {
        text,
        markdown,
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetConfig;
    use crate::types::{FinancialPack, ProjectSnapshot};
    use chrono::NaiveDate;

    fn analyze(snapshot: ProjectSnapshot) -> AnalysisReport {
        let analyzer = crate::analysis::Analyzer::new(
            TargetConfig::default(),
            FeatureConfig::default(),
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
        );
        analyzer.analyze(snapshot)
    }

    #[test]
    fn test_minimal_report_has_core_sections() {
        let outcome = analyze(ProjectSnapshot::default());
        let text = &outcome.rendered.text;
        assert!(text.contains("Predictive Executive Report"));
        assert!(text.contains("✅ General Status"));
        assert!(text.contains("CPI: Not reported"));
        assert!(text.contains("📈 Performance Diagnosis"));
        assert!(text.contains("✅ Executive Summary"));
        // Optional sections absent
        assert!(!text.contains("💰 Financial Summary"));
        assert!(!text.contains("📚 Lessons Learned"));
        assert!(!text.contains("ATTENTION POINTS"));
    }

    #[test]
    fn test_financial_section_rendered_when_present() {
        let snapshot = ProjectSnapshot {
            financials: FinancialPack {
                approved_capex: Some("120M".to_string()),
                eac: Some("131M".to_string()),
                vac: Some("-11M".to_string()),
                ..FinancialPack::default()
            },
            ..ProjectSnapshot::default()
        };
        let outcome = analyze(snapshot);
        let text = &outcome.rendered.text;
        assert!(text.contains("💰 Financial Summary"));
        assert!(text.contains("- Approved CAPEX: 120M"));
        assert!(text.contains("EAC=131M, VAC=-11M"));
    }

    #[test]
    fn test_divergent_pillar_renders_both_rationales() {
        let snapshot = ProjectSnapshot {
            declared_pillar: Some("Customer Focus".to_string()),
            objective: Some("governance process cascade".to_string()),
            cpi: Some("0.80".to_string()),
            ..ProjectSnapshot::default()
        };
        let outcome = analyze(snapshot);
        let text = &outcome.rendered.text;
        assert!(outcome.pillar_divergent);
        assert!(text.contains("- Declared pillar: Customer Focus"));
        assert!(text.contains("realignment recommended"));
        assert!(text.contains("Rationale (suggested): Organizational Excellence:"));
        assert!(text.contains("Rationale (current): Customer Focus:"));
    }

    #[test]
    fn test_markdown_mirrors_text_and_html_is_escaped() {
        let snapshot = ProjectSnapshot {
            name: Some("A<B>".to_string()),
            ..ProjectSnapshot::default()
        };
        let outcome = analyze(snapshot);
        assert_eq!(outcome.rendered.text, outcome.rendered.markdown);
        assert!(outcome.rendered.html.contains("A&lt;B&gt;"));
        assert!(outcome.rendered.html.contains("<br/>"));
        assert!(!outcome.rendered.html.contains('\n'));
    }

    #[test]
    fn test_indices_section_lists_reported_only() {
        let snapshot = ProjectSnapshot {
            indices: crate::types::PerformanceIndices {
                isp: Some(0.95),
                idb: Some(1.02),
                ..crate::types::PerformanceIndices::default()
            },
            ..ProjectSnapshot::default()
        };
        let outcome = analyze(snapshot);
        let text = &outcome.rendered.text;
        assert!(text.contains("• ISP: 0.95"));
        assert!(text.contains("• IDB: 1.02"));
        assert!(!text.contains("• IDP:"));
    }
}
