//! Comparative Analyzer - option deltas against each step's baseline
//!
//! Deltas are raw coefficient differences, not re-evaluations of the full
//! model. Since option contributions enter CAPEX and OPEX additively after
//! every multiplier, swapping one option moves the evaluated totals by
//! exactly these amounts.

use serde::Serialize;

use crate::core::catalog::{AlternativeStep, Catalog, StepOption};
use crate::core::configuration::ConfigurationState;
use crate::core::error::ConfigurationError;

/// How one option of a step compares to the step's baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptionComparison {
    pub option: &'static StepOption,
    pub is_baseline: bool,
    pub is_selected: bool,
    /// `None` for the baseline itself
    pub capex_delta: Option<f64>,
    /// `None` for the baseline itself
    pub opex_delta: Option<f64>,
}

impl OptionComparison {
    /// The option the analyzer recommends for its step
    pub fn is_recommended(&self) -> bool {
        self.is_baseline
    }
}

/// Compare every option of `step`, in catalog order
pub fn compare_options(
    step: &AlternativeStep,
    configuration: &ConfigurationState,
) -> Vec<OptionComparison> {
    let options: &'static [StepOption] = step.options;
    let baseline = step.baseline();

    options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            let is_baseline = index == 0;
            let (capex_delta, opex_delta) = if is_baseline {
                (None, None)
            } else {
                (
                    Some(option.capex_contribution - baseline.capex_contribution),
                    Some(option.opex_contribution - baseline.opex_contribution),
                )
            };
            OptionComparison {
                option,
                is_baseline,
                is_selected: configuration.is_selected(step.key, option.key),
                capex_delta,
                opex_delta,
            }
        })
        .collect()
}

/// The recommended option of a step: always the first listed
pub fn recommended(step: &AlternativeStep) -> &'static StepOption {
    step.baseline()
}

/// Comparison of a whole step
#[derive(Debug, Clone, Serialize)]
pub struct StepComparison {
    pub step: &'static str,
    pub label: &'static str,
    pub options: Vec<OptionComparison>,
}

/// Compare every step of the standard catalog
pub fn compare_all(configuration: &ConfigurationState) -> Vec<StepComparison> {
    compare_all_in(&Catalog::standard(), configuration)
}

pub fn compare_all_in(catalog: &Catalog, configuration: &ConfigurationState) -> Vec<StepComparison> {
    catalog
        .alternatives()
        .iter()
        .map(|step| StepComparison {
            step: step.key,
            label: step.label,
            options: compare_options(step, configuration),
        })
        .collect()
}

/// One guidance sentence per step, taken from its selected option
pub fn observations(configuration: &ConfigurationState) -> Result<Vec<&'static str>, ConfigurationError> {
    Catalog::standard()
        .alternatives()
        .iter()
        .map(|step| configuration.selected_option(step).map(|option| option.observation))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{BUFFER_PREP, CAPTURE_STEP, HARVEST_CLARIFICATION};
    use crate::core::cost::evaluate;
    use crate::core::parameters::ParameterSet;

    #[test]
    fn test_baseline_has_no_deltas() {
        let step = Catalog::standard().step(CAPTURE_STEP).unwrap();
        let rows = compare_options(step, &ConfigurationState::default());

        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_baseline);
        assert!(rows[0].is_recommended());
        assert!(rows[0].is_selected);
        assert_eq!(rows[0].capex_delta, None);
        assert_eq!(rows[0].opex_delta, None);
    }

    #[test]
    fn test_exact_deltas() {
        let step = Catalog::standard().step(CAPTURE_STEP).unwrap();
        let rows = compare_options(step, &ConfigurationState::default());
        assert_eq!(rows[1].option.key, "Large Resin");
        assert_eq!(rows[1].capex_delta, Some(300_000.0));
        assert_eq!(rows[1].opex_delta, Some(100_000.0));
        assert!(!rows[1].is_selected);

        let step = Catalog::standard().step(HARVEST_CLARIFICATION).unwrap();
        let rows = compare_options(step, &ConfigurationState::default());
        assert_eq!(rows[1].capex_delta, Some(-200_000.0));
        assert_eq!(rows[1].opex_delta, Some(50_000.0));
    }

    #[test]
    fn test_recommendation_ignores_cost() {
        // Single-use bags are cheaper in CAPEX yet never recommended
        let step = Catalog::standard().step(BUFFER_PREP).unwrap();
        assert_eq!(recommended(step).key, "Stainless Steel Tanks");

        let mut config = ConfigurationState::default();
        config.select(BUFFER_PREP, "Single-Use Bags").unwrap();
        let rows = compare_options(step, &config);
        assert!(rows[0].is_recommended() && !rows[0].is_selected);
        assert!(!rows[1].is_recommended() && rows[1].is_selected);
    }

    #[test]
    fn test_deltas_match_evaluated_difference() {
        let params = ParameterSet::default();
        let base_config = ConfigurationState::default();
        let base = evaluate(&params, &base_config).unwrap();

        for comparison in compare_all(&base_config) {
            for row in comparison.options.iter().filter(|r| !r.is_baseline) {
                let mut config = base_config.clone();
                config.select(comparison.step, row.option.key).unwrap();
                let swapped = evaluate(&params, &config).unwrap();

                let capex = row.capex_delta.unwrap();
                let opex = row.opex_delta.unwrap();
                assert!((swapped.capex - base.capex - capex).abs() < 1e-6);
                assert!((swapped.opex - base.opex - opex).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_compare_all_in_catalog_order() {
        let steps: Vec<_> = compare_all(&ConfigurationState::default())
            .into_iter()
            .map(|c| c.step)
            .collect();
        assert_eq!(steps, vec![HARVEST_CLARIFICATION, CAPTURE_STEP, BUFFER_PREP]);
    }

    #[test]
    fn test_observations_follow_selection() {
        let mut config = ConfigurationState::default();
        config.select(HARVEST_CLARIFICATION, "Depth Filtration").unwrap();
        let notes = observations(&config).unwrap();
        assert_eq!(notes.len(), 3);
        assert!(notes[0].contains("depth filtration"));
        assert!(notes[1].contains("standard resin"));
    }
}
