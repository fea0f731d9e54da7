//! Configuration State - the chosen option of every alternative step
//!
//! Each step is a small state machine whose states are its option keys.
//! [`ConfigurationState::select`] is the only transition; it either moves to
//! a known option or fails and leaves the state as it was. Selecting does not
//! trigger an evaluation, callers re-run the cost model themselves.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::catalog::{AlternativeStep, Catalog, StepOption};
use crate::core::error::ConfigurationError;

/// Mapping from step key to selected option key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigurationState {
    selections: BTreeMap<String, String>,
}

impl Default for ConfigurationState {
    fn default() -> Self {
        Self::new(&Catalog::standard())
    }
}

impl ConfigurationState {
    /// Every step of `catalog` at its baseline option
    pub fn new(catalog: &Catalog) -> Self {
        let selections = catalog
            .alternatives()
            .iter()
            .map(|step| (step.key.to_string(), step.baseline().key.to_string()))
            .collect();
        Self { selections }
    }

    /// Build a state from raw pairs without checking them against a catalog.
    ///
    /// Unknown keys are reported by [`ConfigurationState::resolve`] and thus
    /// by the cost model.
    pub fn from_selections<I, S, O>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, O)>,
        S: Into<String>,
        O: Into<String>,
    {
        Self {
            selections: pairs
                .into_iter()
                .map(|(step, option)| (step.into(), option.into()))
                .collect(),
        }
    }

    /// Select an option of the standard catalog
    pub fn select(&mut self, step: &str, option: &str) -> Result<(), ConfigurationError> {
        self.select_in(&Catalog::standard(), step, option)
    }

    /// Select an option, validating against `catalog`
    pub fn select_in(
        &mut self,
        catalog: &Catalog,
        step: &str,
        option: &str,
    ) -> Result<(), ConfigurationError> {
        let step_def = catalog.step(step)?;
        let option_def = step_def.option(option)?;
        self.selections
            .insert(step_def.key.to_string(), option_def.key.to_string());
        Ok(())
    }

    /// Selected option key for a step
    pub fn selected(&self, step: &str) -> Option<&str> {
        self.selections.get(step).map(String::as_str)
    }

    pub fn is_selected(&self, step: &str, option: &str) -> bool {
        self.selected(step) == Some(option)
    }

    /// All (step, option) pairs, sorted by step key
    pub fn selections(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selections
            .iter()
            .map(|(step, option)| (step.as_str(), option.as_str()))
    }

    /// Resolve every catalog step to its selected option, in catalog order.
    ///
    /// Fails if the state names a step the catalog does not know, lacks a
    /// selection for a catalog step, or selects an unknown option.
    pub fn resolve(
        &self,
        catalog: &Catalog,
    ) -> Result<Vec<(&'static AlternativeStep, &'static StepOption)>, ConfigurationError> {
        if let Some(unknown) = self
            .selections
            .keys()
            .find(|step| catalog.step(step).is_err())
        {
            return Err(ConfigurationError::UnknownStep(unknown.clone()));
        }

        catalog
            .alternatives()
            .iter()
            .map(|step| {
                let key = self
                    .selected(step.key)
                    .ok_or_else(|| ConfigurationError::MissingSelection(step.key.to_string()))?;
                Ok((step, step.option(key)?))
            })
            .collect()
    }

    /// Resolve a single step to its selected option
    pub fn selected_option(
        &self,
        step: &AlternativeStep,
    ) -> Result<&'static StepOption, ConfigurationError> {
        let key = self
            .selected(step.key)
            .ok_or_else(|| ConfigurationError::MissingSelection(step.key.to_string()))?;
        step.option(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{BUFFER_PREP, CAPTURE_STEP, HARVEST_CLARIFICATION};

    #[test]
    fn test_default_selects_baselines() {
        let config = ConfigurationState::default();
        assert_eq!(config.selected(HARVEST_CLARIFICATION), Some("Centrifuge"));
        assert_eq!(config.selected(CAPTURE_STEP), Some("Standard Resin"));
        assert_eq!(config.selected(BUFFER_PREP), Some("Stainless Steel Tanks"));
        assert_eq!(config.selections().count(), 3);
    }

    #[test]
    fn test_select_known_option() {
        let mut config = ConfigurationState::default();
        config.select(CAPTURE_STEP, "Large Resin").unwrap();
        assert!(config.is_selected(CAPTURE_STEP, "Large Resin"));
        assert!(!config.is_selected(CAPTURE_STEP, "Standard Resin"));
    }

    #[test]
    fn test_failed_select_leaves_state_unchanged() {
        let mut config = ConfigurationState::default();
        config.select(BUFFER_PREP, "Single-Use Bags").unwrap();
        let before = config.clone();

        let err = config.select(CAPTURE_STEP, "Huge Resin").unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownOption { .. }));
        assert_eq!(config, before);

        let err = config.select("sterileFiltration", "0.2um").unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownStep(_)));
        assert_eq!(config, before);
    }

    #[test]
    fn test_option_keys_are_case_sensitive() {
        let mut config = ConfigurationState::default();
        assert!(config.select(CAPTURE_STEP, "large resin").is_err());
    }

    #[test]
    fn test_resolve_reports_each_inconsistency() {
        let catalog = Catalog::standard();

        let missing = ConfigurationState::from_selections([
            (HARVEST_CLARIFICATION, "Centrifuge"),
            (CAPTURE_STEP, "Standard Resin"),
        ]);
        assert_eq!(
            missing.resolve(&catalog).unwrap_err(),
            ConfigurationError::MissingSelection(BUFFER_PREP.to_string())
        );

        let mut unknown_step = ConfigurationState::default();
        unknown_step
            .selections
            .insert("viralInactivation".to_string(), "Low pH".to_string());
        assert_eq!(
            unknown_step.resolve(&catalog).unwrap_err(),
            ConfigurationError::UnknownStep("viralInactivation".to_string())
        );

        let bad_option = ConfigurationState::from_selections([
            (HARVEST_CLARIFICATION, "Centrifuge"),
            (CAPTURE_STEP, "Huge Resin"),
            (BUFFER_PREP, "Single-Use Bags"),
        ]);
        assert!(matches!(
            bad_option.resolve(&catalog),
            Err(ConfigurationError::UnknownOption { .. })
        ));
    }

    #[test]
    fn test_resolve_is_in_catalog_order() {
        let resolved = ConfigurationState::default()
            .resolve(&Catalog::standard())
            .unwrap();
        let steps: Vec<_> = resolved.iter().map(|(step, _)| step.key).collect();
        assert_eq!(steps, vec![HARVEST_CLARIFICATION, CAPTURE_STEP, BUFFER_PREP]);
    }

    #[test]
    fn test_serializes_as_plain_mapping() {
        let mut config = ConfigurationState::default();
        config.select(CAPTURE_STEP, "Large Resin").unwrap();
        let yaml = serde_yml::to_string(&config).unwrap();
        assert!(yaml.contains("captureStep: Large Resin"));
        let parsed: ConfigurationState = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
