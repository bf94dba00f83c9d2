//! Report structures and formatters for screening results

pub mod formatter;
pub mod report;
