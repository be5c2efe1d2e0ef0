//! Output formatting for case records

pub mod console;
pub mod formatter;
