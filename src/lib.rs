//! bptea: bioprocess techno-economic analysis
//!
//! Evaluates CAPEX, OPEX, annual production and minimum selling price of a
//! downstream-processing line whose steps offer interchangeable equipment
//! options, and keeps named studies as plain YAML files.

pub mod cli;
pub mod core;
pub mod entities;
pub mod report;
pub mod yaml;
