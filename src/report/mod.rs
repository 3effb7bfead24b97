//! Executive report rendering

mod formatter;

pub use formatter::render;
