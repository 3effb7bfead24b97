//! Snapshot ingestion
//!
//! Two entry paths produce a [`crate::types::ProjectSnapshot`]:
//! - structured JSON (deserialized directly by the API layer)
//! - pasted free text from a status deck, parsed by [`text`]
//!
//! [`numeric`] holds the tolerant number/percent/date parsers shared by
//! both paths and by the analysis engine.

pub mod numeric;
pub mod text;

pub use text::parse_status_text;
