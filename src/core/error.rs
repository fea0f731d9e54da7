//! Error taxonomy for the evaluation engine
//!
//! Three failure classes are surfaced to callers, each as its own type:
//!
//! - [`ValidationError`] - a parameter value is outside its domain, or a
//!   parameter name is unknown. Raised when the value is set.
//! - [`ConfigurationError`] - a step or option key is not in the catalog.
//! - [`DomainError`] - an evaluation would divide by a non-positive quantity.
//!
//! [`EngineError`] is the union returned by [`crate::core::cost::evaluate`].

use miette::Diagnostic;
use thiserror::Error;

/// A parameter value or name was rejected
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ValidationError {
    #[error("{field} must be {domain}, got {value}")]
    #[diagnostic(code(bptea::validation::out_of_domain))]
    OutOfDomain {
        field: &'static str,
        domain: &'static str,
        value: f64,
    },

    #[error("{field} must be a finite number")]
    #[diagnostic(code(bptea::validation::not_finite))]
    NotFinite { field: &'static str },

    #[error("invalid value '{value}' for {field}, expected {expected}")]
    #[diagnostic(code(bptea::validation::invalid_value))]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("{field} is not a numeric parameter")]
    #[diagnostic(code(bptea::validation::not_numeric))]
    NotNumeric { field: &'static str },

    #[error("unknown parameter '{0}'")]
    #[diagnostic(
        code(bptea::validation::unknown_field),
        help("run `bptea params` to list parameter names")
    )]
    UnknownField(String),
}

/// A configuration referenced a step or option that the catalog does not define
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ConfigurationError {
    #[error("unknown process step '{0}'")]
    #[diagnostic(
        code(bptea::configuration::unknown_step),
        help("run `bptea catalog` to list the selectable steps")
    )]
    UnknownStep(String),

    #[error("unknown option '{option}' for step '{step}' (valid: {valid})")]
    #[diagnostic(code(bptea::configuration::unknown_option))]
    UnknownOption {
        step: String,
        option: String,
        valid: String,
    },

    #[error("no option selected for step '{0}'")]
    #[diagnostic(code(bptea::configuration::missing_selection))]
    MissingSelection(String),
}

/// An evaluation input makes annual production undefined
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
#[error("{field} must be greater than zero to compute annual production, got {value}")]
#[diagnostic(code(bptea::domain::non_positive))]
pub struct DomainError {
    pub field: &'static str,
    pub value: f64,
}

/// Any failure of a cost evaluation
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum EngineError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_input() {
        let err = ValidationError::OutOfDomain {
            field: "titer",
            domain: "greater than 0",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "titer must be greater than 0, got -1");

        let err = ConfigurationError::UnknownOption {
            step: "captureStep".to_string(),
            option: "Huge Resin".to_string(),
            valid: "Standard Resin, Large Resin".to_string(),
        };
        assert!(err.to_string().contains("Huge Resin"));
        assert!(err.to_string().contains("Standard Resin, Large Resin"));
    }

    #[test]
    fn test_engine_error_is_transparent() {
        let err: EngineError = DomainError {
            field: "flowRateFromFermentation",
            value: 0.0,
        }
        .into();
        assert!(matches!(err, EngineError::Domain(_)));
        assert!(err.to_string().starts_with("flowRateFromFermentation"));
    }
}
