//! Auto-suggested lessons learned
//!
//! Pattern-matches the snapshot against recurring delivery failure modes
//! and proposes structured lessons (problem, root cause, countermeasure,
//! owner, due tag, category). At most five are suggested per analysis.

use chrono::NaiveDate;

use crate::config::TargetConfig;
use crate::types::{Kpis, Lesson, NormalizedMetrics, ScheduleTask};

use super::actions::split_stakeholders;
use super::risk::is_overdue;

/// Maximum lessons suggested per analysis.
const MAX_LESSONS: usize = 5;

/// Suggest lessons learned from the snapshot's metric and schedule patterns.
pub fn suggest_lessons(
    metrics: &NormalizedMetrics,
    kpis: &Kpis,
    tasks: &[ScheduleTask],
    stakeholders: &str,
    targets: &TargetConfig,
    today: NaiveDate,
) -> Vec<Lesson> {
    let owners = split_stakeholders(stakeholders);
    let owner = owners
        .first()
        .map_or_else(|| "PMO".to_string(), Clone::clone);

    let mut lessons = Vec::new();

    if metrics.cpi.is_some_and(|v| v < targets.cpi) {
        lessons.push(Lesson {
            problem: "Cost deviation (CPI below target).".to_string(),
            root_cause: "Underestimated packages and change control without a clear gate."
                .to_string(),
            countermeasure:
                "Install a Change Control Board and reinforce the baseline; audit financial \
                 measurement."
                    .to_string(),
            owner: owner.clone(),
            due: "D+14".to_string(),
            category: "Financial/Control".to_string(),
        });
    }

    if metrics.spi.is_some_and(|v| v < targets.spi) {
        lessons.push(Lesson {
            problem: "Delay risk (SPI below target).".to_string(),
            root_cause: "Critical path not replanned in time.".to_string(),
            countermeasure: "Replan the critical path and institute a weekly EVM ritual."
                .to_string(),
            owner: owner.clone(),
            due: "D+7".to_string(),
            category: "Schedule/Planning".to_string(),
        });
    }

    if kpis.progress_gap.is_some_and(|gap| gap >= 15.0) {
        lessons.push(Lesson {
            problem: "Physical vs financial asymmetry >= 15pp.".to_string(),
            root_cause: "Divergent measurement criteria across teams.".to_string(),
            countermeasure: "Unify criteria and audit the three most critical packages."
                .to_string(),
            owner: owner.clone(),
            due: "D+10".to_string(),
            category: "Execution/Measurement".to_string(),
        });
    }

    // One lesson for the first overdue critical task; repeats add no signal.
    if let Some(task) = tasks.iter().find(|t| t.critical && is_overdue(t, today)) {
        lessons.push(Lesson {
            problem: format!("Critical task overdue: {}.", task.name),
            root_cause: "Front sequencing and unmodeled constraints.".to_string(),
            countermeasure: "Apply constraint-removal planning and prerequisite gates."
                .to_string(),
            owner,
            due: "D+5".to_string(),
            category: "Planning/Execution".to_string(),
        });
    }

    lessons.truncate(MAX_LESSONS);
    lessons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> TargetConfig {
        TargetConfig::default()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    #[test]
    fn test_healthy_snapshot_yields_no_lessons() {
        let metrics = NormalizedMetrics {
            cpi: Some(1.0),
            spi: Some(1.0),
            ..NormalizedMetrics::default()
        };
        let lessons = suggest_lessons(&metrics, &Kpis::default(), &[], "", &targets(), today());
        assert!(lessons.is_empty());
    }

    #[test]
    fn test_cpi_below_target_suggests_cost_lesson() {
        let metrics = NormalizedMetrics {
            cpi: Some(0.85),
            ..NormalizedMetrics::default()
        };
        let lessons = suggest_lessons(
            &metrics,
            &Kpis::default(),
            &[],
            "Ana; Carlos",
            &targets(),
            today(),
        );
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].owner, "Ana");
        assert_eq!(lessons[0].due, "D+14");
        assert!(lessons[0].problem.contains("CPI"));
    }

    #[test]
    fn test_owner_defaults_to_pmo() {
        let metrics = NormalizedMetrics {
            spi: Some(0.80),
            ..NormalizedMetrics::default()
        };
        let lessons = suggest_lessons(&metrics, &Kpis::default(), &[], "", &targets(), today());
        assert_eq!(lessons[0].owner, "PMO");
    }

    #[test]
    fn test_overdue_critical_task_adds_single_lesson() {
        let tasks = vec![
            ScheduleTask {
                name: "Foundation".to_string(),
                end: NaiveDate::from_ymd_opt(2025, 9, 1),
                pct_complete: Some(50.0),
                critical: true,
                ..ScheduleTask::default()
            },
            ScheduleTask {
                name: "Steel".to_string(),
                end: NaiveDate::from_ymd_opt(2025, 9, 15),
                pct_complete: Some(10.0),
                critical: true,
                ..ScheduleTask::default()
            },
        ];
        let lessons = suggest_lessons(
            &NormalizedMetrics::default(),
            &Kpis::default(),
            &tasks,
            "",
            &targets(),
            today(),
        );
        assert_eq!(lessons.len(), 1);
        assert!(lessons[0].problem.contains("Foundation"));
    }

    #[test]
    fn test_lessons_capped_at_five() {
        let metrics = NormalizedMetrics {
            cpi: Some(0.5),
            spi: Some(0.5),
            ..NormalizedMetrics::default()
        };
        let kpis = Kpis {
            progress_gap: Some(20.0),
            ..Kpis::default()
        };
        let tasks = vec![ScheduleTask {
            name: "Late".to_string(),
            end: NaiveDate::from_ymd_opt(2025, 1, 1),
            pct_complete: Some(0.0),
            critical: true,
            ..ScheduleTask::default()
        }];
        let lessons = suggest_lessons(&metrics, &kpis, &tasks, "", &targets(), today());
        assert!(lessons.len() <= 5);
        assert_eq!(lessons.len(), 4);
    }
}
