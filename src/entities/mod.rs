//! Entity type definitions
//!
//! - [`Study`] - a named parameter snapshot and configuration, persisted by
//!   [`crate::core::store::StudyStore`]

pub mod study;

pub use study::{Study, StudyStatus};
