//! CLI command implementations

pub mod catalog;
pub mod compare;
pub mod completions;
pub mod eval;
pub mod graph;
pub mod init;
pub mod params;
pub mod report;
pub mod study;
