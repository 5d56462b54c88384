//! Output formatting for sessions and results reports

pub mod console;
pub mod formatter;
pub mod html;
pub mod structured;
