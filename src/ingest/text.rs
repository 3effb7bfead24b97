//! Free-text status parser
//!
//! Parses the `Label: value` text operators paste straight from a status
//! deck into a [`ProjectSnapshot`]. The grammar is line-oriented:
//!
//! - single-line labels (`CPI: 0,87`)
//! - block labels followed by `- ` bullets until a blank line or the next
//!   label (`Status Summary:`, `Next Period Plans:`, `Attention Points:`)
//! - a `Tasks:` block of pipe-delimited records
//!   (`- Name: Foundation | Start: 2025-08-01 | End: 2025-09-15 | Pct: 60 | Critical: yes`)
//! - a `Financials:` block of `key: value` lines
//!
//! Parsing is total: unknown lines are skipped, unreadable values are left
//! unset, and the worst possible input yields an empty snapshot.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::{ProjectSnapshot, ScheduleTask};

use super::numeric::{normalize, parse_date, parse_number};

/// Labels recognized on a `Label: value` line, in normalized form.
const LABELS: &[&str] = &[
    "project name",
    "objective",
    "scope",
    "contract type",
    "stakeholders",
    "notes",
    "observations",
    "pillar",
    "cpi",
    "spi",
    "isp",
    "idp",
    "idco",
    "idb",
    "physical progress",
    "financial progress",
    "planned finish date",
    "baseline schedule",
    "baseline cost",
    "status summary",
    "next period plans",
    "attention points",
    "tasks",
    "financials",
];

/// Split a line into `(normalized_label, value)` if it starts with a known label.
fn match_label(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once(':')?;
    let nk = normalize(key);
    LABELS
        .contains(&nk.as_str())
        .then(|| (nk, value.trim().to_string()))
}

/// Collect `- ` bullets starting at `start`, returning the bullets and the
/// index of the first unconsumed line. Non-bullet lines inside the block are
/// treated as continuations of the previous bullet.
fn collect_bullets(lines: &[&str], start: usize) -> (Vec<String>, usize) {
    let mut bullets = Vec::new();
    let mut i = start;
    while i < lines.len() {
        let raw = lines[i].trim();
        if raw.is_empty() || match_label(raw).is_some() {
            break;
        }
        if let Some(rest) = raw.strip_prefix("- ") {
            bullets.push(rest.trim().to_string());
        } else if let Some(last) = bullets.last_mut() {
            last.push(' ');
            last.push_str(raw);
        } else {
            bullets.push(raw.to_string());
        }
        i += 1;
    }
    (bullets, i)
}

// Pattern is a compile-time constant.
#[allow(clippy::unwrap_used)]
fn task_field_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(name|start|end|pct|%|critical)\s*:\s*([^|]+)").unwrap())
}

/// Parse one task record. Returns `None` when the line has no `key: value`
/// structure at all (continuation noise inside the block).
fn parse_task_line(raw: &str) -> Option<ScheduleTask> {
    let mut name = None;
    let mut start = None;
    let mut end = None;
    let mut pct = None;
    let mut critical = false;
    let mut matched = false;

    for cap in task_field_regex().captures_iter(raw) {
        matched = true;
        let value = cap[2].trim();
        match normalize(&cap[1]).as_str() {
            "name" => name = Some(value.to_string()),
            "start" => start = parse_date(value),
            "end" => end = parse_date(value),
            "pct" | "%" => pct = parse_number(value),
            "critical" => {
                critical = matches!(normalize(value).as_str(), "yes" | "y" | "true" | "critical");
            }
            _ => {}
        }
    }

    if !matched {
        return None;
    }

    Some(ScheduleTask {
        name: name.unwrap_or_else(|| raw.trim().to_string()),
        start,
        end,
        pct_complete: pct,
        critical,
    })
}

/// Consume the `Tasks:` block, one record per bullet.
fn collect_tasks(lines: &[&str], start: usize) -> (Vec<ScheduleTask>, usize) {
    let mut tasks = Vec::new();
    let mut i = start;
    while i < lines.len() {
        let raw = lines[i].trim();
        if raw.is_empty() || match_label(raw).is_some() {
            break;
        }
        if let Some(rest) = raw.strip_prefix('-') {
            if let Some(task) = parse_task_line(rest.trim()) {
                tasks.push(task);
            }
        }
        i += 1;
    }
    (tasks, i)
}

/// Consume the `Financials:` block of `key: value` lines.
fn collect_financials(snapshot: &mut ProjectSnapshot, lines: &[&str], start: usize) -> usize {
    let mut i = start;
    while i < lines.len() {
        let raw = lines[i].trim();
        if raw.is_empty() || match_label(raw).is_some() {
            break;
        }
        if let Some((key, value)) = raw.split_once(':') {
            let value = Some(value.trim().to_string());
            let fin = &mut snapshot.financials;
            match normalize(key).as_str() {
                "approved capex" => fin.approved_capex = value,
                "committed capex" => fin.committed_capex = value,
                "executed capex" => fin.executed_capex = value,
                "ev" => fin.ev = value,
                "pv" => fin.pv = value,
                "ac" => fin.ac = value,
                "eac" => fin.eac = value,
                "vac" => fin.vac = value,
                _ => {}
            }
        }
        i += 1;
    }
    i
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Parse pasted status text into a [`ProjectSnapshot`]. Never fails.
pub fn parse_status_text(text: &str) -> ProjectSnapshot {
    let lines: Vec<&str> = text.lines().collect();
    let mut snapshot = ProjectSnapshot::default();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();
        let Some((label, value)) = match_label(line) else {
            i += 1;
            continue;
        };

        match label.as_str() {
            "status summary" => {
                let (bullets, next) = collect_bullets(&lines, i + 1);
                snapshot.status_summary = bullets;
                i = next;
                continue;
            }
            "next period plans" => {
                let (bullets, next) = collect_bullets(&lines, i + 1);
                snapshot.next_period_plans = bullets;
                i = next;
                continue;
            }
            "attention points" => {
                let (bullets, next) = collect_bullets(&lines, i + 1);
                snapshot.attention_points = bullets;
                i = next;
                continue;
            }
            "tasks" => {
                let (tasks, next) = collect_tasks(&lines, i + 1);
                snapshot.tasks = tasks;
                i = next;
                continue;
            }
            "financials" => {
                i = collect_financials(&mut snapshot, &lines, i + 1);
                continue;
            }
            "project name" => snapshot.name = non_empty(value),
            "objective" => snapshot.objective = non_empty(value),
            "scope" => snapshot.scope = non_empty(value),
            "contract type" => snapshot.contract_type = non_empty(value),
            "stakeholders" => snapshot.stakeholders = non_empty(value),
            "notes" | "observations" => snapshot.notes = non_empty(value),
            "pillar" => snapshot.declared_pillar = non_empty(value),
            "cpi" => snapshot.cpi = non_empty(value),
            "spi" => snapshot.spi = non_empty(value),
            "isp" => snapshot.indices.isp = parse_number(&value),
            "idp" => snapshot.indices.idp = parse_number(&value),
            "idco" => snapshot.indices.idco = parse_number(&value),
            "idb" => snapshot.indices.idb = parse_number(&value),
            "physical progress" => snapshot.physical_progress = non_empty(value),
            "financial progress" => snapshot.financial_progress = non_empty(value),
            "planned finish date" => snapshot.planned_finish = non_empty(value),
            "baseline schedule" => snapshot.baseline.schedule_date = non_empty(value),
            "baseline cost" => snapshot.baseline.approved_cost = non_empty(value),
            _ => {}
        }

        i += 1;
    }

    snapshot
}
