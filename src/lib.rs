//! Vera: Predictive Executive Reporting
//!
//! Analysis engine behind the Vera REST API. A project status snapshot,
//! structured JSON or pasted status text, is scored for delivery risk,
//! matched against the strategic pillars, and rendered into an executive
//! report.
//!
//! ## Architecture
//!
//! - **Ingest**: tolerant parsing of numbers, dates, and pasted status text
//! - **Analysis**: risk scoring, pillar inference, strategy fit, next
//!   steps, lessons learned
//! - **Report**: executive report rendering (text / markdown / HTML)
//! - **API**: Axum HTTP surface with analysis history

pub mod analysis;
pub mod api;
pub mod config;
pub mod evidence;
pub mod ingest;
pub mod report;
pub mod storage;
pub mod types;

// Re-export configuration
pub use config::AppConfig;

// Re-export commonly used types
pub use types::{
    AnalysisReport, Kpis, Lesson, NormalizedMetrics, Pillar, ProjectSnapshot, RenderedReport,
    RiskClass, ScheduleTask, StrategyFit,
};

// Re-export the engine and storage
pub use analysis::Analyzer;
pub use storage::{HistoryStorage, StorageError};
