//! Study identity using prefixed ULIDs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// A unique study identifier, rendered as `STDY-<ULID>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StudyId {
    ulid: Ulid,
}

impl StudyId {
    pub const PREFIX: &'static str = "STDY";

    /// Create a new, time-ordered id
    pub fn new() -> Self {
        Self { ulid: Ulid::new() }
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self { ulid }
    }

    pub fn ulid(&self) -> Ulid {
        self.ulid
    }

    /// Parse a StudyId from a string
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }

    /// Whether `partial` is a case-insensitive prefix of this id, with or
    /// without the `STDY-` part
    pub fn matches_prefix(&self, partial: &str) -> bool {
        let full = self.to_string();
        let partial = partial.trim().to_uppercase();
        if partial.is_empty() {
            return false;
        }
        full.starts_with(&partial) || self.ulid.to_string().starts_with(&partial)
    }
}

impl Default for StudyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StudyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", Self::PREFIX, self.ulid)
    }
}

impl FromStr for StudyId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, ulid_str) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;

        if !prefix.eq_ignore_ascii_case(Self::PREFIX) {
            return Err(IdParseError::InvalidPrefix(prefix.to_string()));
        }

        let ulid = Ulid::from_string(ulid_str)
            .map_err(|e| IdParseError::InvalidUlid(ulid_str.to_string(), e.to_string()))?;

        Ok(Self { ulid })
    }
}

impl Serialize for StudyId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for StudyId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing study IDs
#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("invalid study id prefix: '{0}' (expected STDY)")]
    InvalidPrefix(String),

    #[error("missing '-' delimiter in study ID: '{0}'")]
    MissingDelimiter(String),

    #[error("invalid ULID '{0}': {1}")]
    InvalidUlid(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_study_id_generation() {
        let id = StudyId::new();
        assert!(id.to_string().starts_with("STDY-"));
        assert_eq!(id.to_string().len(), 31); // STDY- (5) + ULID (26)
    }

    #[test]
    fn test_study_id_parsing() {
        let original = StudyId::new();
        let parsed = StudyId::parse(&original.to_string()).unwrap();
        assert_eq!(original, parsed);

        let lower = StudyId::parse(&original.to_string().to_lowercase()).unwrap();
        assert_eq!(original, lower);
    }

    #[test]
    fn test_study_id_invalid_prefix() {
        let err = StudyId::parse("REQ-01HQ3K4N5M6P7R8S9T0VWXYZAB").unwrap_err();
        assert!(matches!(err, IdParseError::InvalidPrefix(_)));
    }

    #[test]
    fn test_study_id_missing_delimiter() {
        let err = StudyId::parse("STDY01HQ3K4N5M6P7R8S9T0VWXYZ").unwrap_err();
        assert!(matches!(err, IdParseError::MissingDelimiter(_)));
    }

    #[test]
    fn test_study_id_invalid_ulid() {
        let err = StudyId::parse("STDY-notaulid").unwrap_err();
        assert!(matches!(err, IdParseError::InvalidUlid(_, _)));
    }

    #[test]
    fn test_prefix_matching() {
        let id = StudyId::new();
        let full = id.to_string();
        assert!(id.matches_prefix(&full));
        assert!(id.matches_prefix(&full[..10]));
        assert!(id.matches_prefix(&full[5..12].to_lowercase()));
        assert!(!id.matches_prefix(""));
        assert!(!id.matches_prefix("STDY-ZZZZZZZZ"));
    }

    #[test]
    fn test_serde_as_string() {
        let id = StudyId::new();
        let yaml = serde_yml::to_string(&id).unwrap();
        assert!(yaml.contains(&id.to_string()));
        let back: StudyId = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(back, id);
    }
}
