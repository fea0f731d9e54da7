//! Core module - the evaluation engine and its collaborators
//!
//! The engine (`parameters`, `catalog`, `configuration`, `graph`, `cost`,
//! `compare`, `error`) is pure and performs no IO. `config`, `identity`,
//! `project` and `store` deal with the workspace on disk.

pub mod catalog;
pub mod compare;
pub mod config;
pub mod configuration;
pub mod cost;
pub mod error;
pub mod graph;
pub mod identity;
pub mod parameters;
pub mod project;
pub mod store;

pub use catalog::{AlternativeStep, Catalog, FixedStep, StepOption};
pub use compare::{compare_all, compare_options, observations, OptionComparison, StepComparison};
pub use config::Config;
pub use configuration::ConfigurationState;
pub use cost::{evaluate, CostBreakdown, CostResult, MarketPosition};
pub use error::{ConfigurationError, DomainError, EngineError, ValidationError};
pub use graph::{NodeView, ProcessGraph};
pub use identity::{IdParseError, StudyId};
pub use parameters::{ParameterField, ParameterSet};
pub use project::{Project, ProjectError};
pub use store::{FileStore, StoreError, StudyStore};
