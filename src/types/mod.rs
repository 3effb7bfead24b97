//! Core data types
//!
//! - [`project`]: the inbound project snapshot (structured or parsed from text)
//! - [`analysis`]: the outbound analysis report and its building blocks

pub mod analysis;
pub mod project;

pub use analysis::{
    AnalysisReport, Kpis, Lesson, NormalizedMetrics, Pillar, RenderedReport, RiskClass,
    StrategyFit,
};
pub use project::{Baseline, FinancialPack, PerformanceIndices, ProjectSnapshot, ScheduleTask};
