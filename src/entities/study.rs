//! Study entity - a persisted parameter snapshot plus configuration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::configuration::ConfigurationState;
use crate::core::cost::{evaluate, CostResult};
use crate::core::error::EngineError;
use crate::core::identity::StudyId;
use crate::core::parameters::ParameterSet;

/// Lifecycle of a study
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StudyStatus {
    #[default]
    Draft,
    InProgress,
    Completed,
}

impl StudyStatus {
    pub const ALL: [StudyStatus; 3] = [
        StudyStatus::Draft,
        StudyStatus::InProgress,
        StudyStatus::Completed,
    ];
}

impl std::fmt::Display for StudyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudyStatus::Draft => write!(f, "draft"),
            StudyStatus::InProgress => write!(f, "in_progress"),
            StudyStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for StudyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "draft" => Ok(StudyStatus::Draft),
            "in_progress" | "inprogress" => Ok(StudyStatus::InProgress),
            "completed" | "complete" => Ok(StudyStatus::Completed),
            _ => Err(format!(
                "Unknown status: {}. Use draft, in_progress or completed",
                s
            )),
        }
    }
}

/// A named techno-economic study
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Study {
    /// Unique identifier
    pub id: StudyId,

    /// Short name
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Who owns this study
    pub owner: String,

    #[serde(default)]
    pub status: StudyStatus,

    /// Product and process inputs
    #[serde(default)]
    pub parameters: ParameterSet,

    /// Selected option per alternative step
    #[serde(default)]
    pub configuration: ConfigurationState,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Last modification timestamp
    pub last_modified: DateTime<Utc>,

    /// Revision number, bumped on every save of a change
    #[serde(default = "default_revision")]
    pub revision: u32,
}

fn default_revision() -> u32 {
    1
}

impl Study {
    /// A new draft study with default parameters and baseline selections
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: StudyId::new(),
            name: name.into(),
            description: None,
            owner: owner.into(),
            status: StudyStatus::default(),
            parameters: ParameterSet::default(),
            configuration: ConfigurationState::default(),
            created: now,
            last_modified: now,
            revision: 1,
        }
    }

    /// Record a modification
    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
        self.revision += 1;
    }

    /// Evaluate this study's snapshot
    pub fn evaluate(&self) -> Result<CostResult, EngineError> {
        evaluate(&self.parameters, &self.configuration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_study_defaults() {
        let study = Study::new("Plant A", "alice");
        assert_eq!(study.status, StudyStatus::Draft);
        assert_eq!(study.revision, 1);
        assert_eq!(study.parameters, ParameterSet::default());
        assert_eq!(study.created, study.last_modified);
        assert!(study.evaluate().is_ok());
    }

    #[test]
    fn test_touch_bumps_revision() {
        let mut study = Study::new("Plant A", "alice");
        study.touch();
        assert_eq!(study.revision, 2);
        assert!(study.last_modified >= study.created);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("in-progress".parse::<StudyStatus>().unwrap(), StudyStatus::InProgress);
        assert_eq!("COMPLETED".parse::<StudyStatus>().unwrap(), StudyStatus::Completed);
        assert!("archived".parse::<StudyStatus>().is_err());
        assert_eq!(StudyStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut study = Study::new("Plant A", "alice");
        study.description = Some("Large column trial".to_string());
        study
            .configuration
            .select("captureStep", "Large Resin")
            .unwrap();

        let yaml = serde_yml::to_string(&study).unwrap();
        assert!(yaml.contains("status: draft"));
        assert!(yaml.contains("flow_rate_from_fermentation"));
        let back: Study = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(back, study);
    }

    #[test]
    fn test_missing_sections_take_defaults() {
        let yaml = format!(
            "id: {}\nname: Minimal\nowner: bob\ncreated: 2025-01-01T00:00:00Z\nlast_modified: 2025-01-01T00:00:00Z\n",
            StudyId::new()
        );
        let study: Study = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(study.revision, 1);
        assert_eq!(study.configuration, ConfigurationState::default());
    }
}
