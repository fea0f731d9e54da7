//! YAML handling helpers

pub mod diagnostics;

pub use diagnostics::YamlSyntaxError;
