//! Alternative Catalog - static definitions of process steps and their options
//!
//! The coefficients here feed the cost model directly and must stay exactly
//! as listed. The first option of every step is its baseline: comparison
//! deltas and the "recommended" marker are taken against index 0, whatever
//! its cost.

use serde::Serialize;

use crate::core::error::ConfigurationError;

pub const BIOREACTOR: &str = "bioreactor";
pub const HARVEST_CLARIFICATION: &str = "harvestClarification";
pub const CAPTURE_STEP: &str = "captureStep";
pub const POLISHING: &str = "polishing";
pub const BUFFER_PREP: &str = "bufferPrep";
pub const FINAL_FORMULATION: &str = "finalFormulation";

/// One selectable equipment alternative of a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepOption {
    /// Key, unique within the step (e.g. "Large Resin")
    pub key: &'static str,
    /// Display label (e.g. "Larger Column Size")
    pub label: &'static str,
    /// Absolute add-on to base CAPEX
    pub capex_contribution: f64,
    /// Absolute add-on to base annual OPEX
    pub opex_contribution: f64,
    pub description: &'static str,
    /// Fraction of CAPEX attributed to this equipment in the equipment chart
    pub equipment_share: f64,
    /// Guidance sentence shown when this option is selected
    pub observation: &'static str,
}

/// A process step offering interchangeable options
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlternativeStep {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Ordered, non-empty; index 0 is the baseline
    pub options: &'static [StepOption],
}

impl AlternativeStep {
    /// The baseline (first-listed) option
    pub fn baseline(&self) -> &'static StepOption {
        let options: &'static [StepOption] = self.options;
        &options[0]
    }

    /// Look up an option by key
    pub fn option(&self, key: &str) -> Result<&'static StepOption, ConfigurationError> {
        let options: &'static [StepOption] = self.options;
        options
            .iter()
            .find(|option| option.key == key)
            .ok_or_else(|| ConfigurationError::UnknownOption {
                step: self.key.to_string(),
                option: key.to_string(),
                valid: self.option_keys().join(", "),
            })
    }

    /// Position of an option in the list
    pub fn position(&self, key: &str) -> Option<usize> {
        self.options.iter().position(|option| option.key == key)
    }

    pub fn option_keys(&self) -> Vec<&'static str> {
        self.options.iter().map(|option| option.key).collect()
    }
}

/// A process step with no alternatives
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FixedStep {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Fraction of CAPEX attributed to this equipment in the equipment chart
    pub equipment_share: f64,
}

const ALTERNATIVE_STEPS: &[AlternativeStep] = &[
    AlternativeStep {
        key: HARVEST_CLARIFICATION,
        label: "Harvest Clarification",
        description: "Removal of cells and debris",
        options: &[
            StepOption {
                key: "Centrifuge",
                label: "Centrifuge",
                capex_contribution: 500_000.0,
                opex_contribution: 100_000.0,
                description: "High-speed centrifugation for cell separation",
                equipment_share: 0.08,
                observation: "Using centrifugation for harvest clarification increases CAPEX but reduces OPEX compared to depth filtration.",
            },
            StepOption {
                key: "Depth Filtration",
                label: "Depth Filtration",
                capex_contribution: 300_000.0,
                opex_contribution: 150_000.0,
                description: "Multi-layer filtration for cell removal",
                equipment_share: 0.05,
                observation: "Using depth filtration for harvest clarification reduces CAPEX but increases OPEX due to consumables cost.",
            },
        ],
    },
    AlternativeStep {
        key: CAPTURE_STEP,
        label: "Capture Step",
        description: "Initial product purification",
        options: &[
            StepOption {
                key: "Standard Resin",
                label: "Standard Resin Column",
                capex_contribution: 500_000.0,
                opex_contribution: 150_000.0,
                description: "Standard size chromatography column",
                equipment_share: 0.08,
                observation: "The standard resin column size provides a good balance between cost and performance.",
            },
            StepOption {
                key: "Large Resin",
                label: "Larger Column Size",
                capex_contribution: 800_000.0,
                opex_contribution: 250_000.0,
                description: "Larger diameter chromatography column with higher throughput",
                equipment_share: 0.12,
                observation: "The larger resin column size increases initial investment but may provide better throughput.",
            },
        ],
    },
    AlternativeStep {
        key: BUFFER_PREP,
        label: "Buffer Preparation",
        description: "Buffer storage system",
        options: &[
            StepOption {
                key: "Stainless Steel Tanks",
                label: "Stainless Steel Tanks",
                capex_contribution: 400_000.0,
                opex_contribution: 50_000.0,
                description: "Traditional stainless steel buffer preparation tanks",
                equipment_share: 0.06,
                observation: "Stainless steel tanks for buffer preparation have higher CAPEX but lower OPEX over time.",
            },
            StepOption {
                key: "Single-Use Bags",
                label: "Single-Use Bags",
                capex_contribution: 200_000.0,
                opex_contribution: 100_000.0,
                description: "Disposable buffer preparation bags with lower capital cost",
                equipment_share: 0.03,
                observation: "Single-use bags for buffer preparation reduce CAPEX but increase ongoing consumables cost.",
            },
        ],
    },
];

const FIXED_STEPS: &[FixedStep] = &[
    FixedStep {
        key: BIOREACTOR,
        label: "Bioreactor",
        description: "Cell culture",
        equipment_share: 0.15,
    },
    FixedStep {
        key: POLISHING,
        label: "Polishing",
        description: "Final purification",
        equipment_share: 0.07,
    },
    FixedStep {
        key: FINAL_FORMULATION,
        label: "Final Formulation",
        description: "Product finishing",
        equipment_share: 0.04,
    },
];

/// The set of alternative and fixed steps an evaluation draws from
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    alternatives: &'static [AlternativeStep],
    fixed: &'static [FixedStep],
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// The downstream-processing catalog
    pub const fn standard() -> Self {
        Self {
            alternatives: ALTERNATIVE_STEPS,
            fixed: FIXED_STEPS,
        }
    }

    /// Alternative steps in catalog order
    pub fn alternatives(&self) -> &'static [AlternativeStep] {
        self.alternatives
    }

    pub fn fixed_steps(&self) -> &'static [FixedStep] {
        self.fixed
    }

    /// Look up an alternative step by key
    pub fn step(&self, key: &str) -> Result<&'static AlternativeStep, ConfigurationError> {
        let alternatives: &'static [AlternativeStep] = self.alternatives;
        alternatives
            .iter()
            .find(|step| step.key == key)
            .ok_or_else(|| ConfigurationError::UnknownStep(key.to_string()))
    }

    pub fn fixed_step(&self, key: &str) -> Option<&'static FixedStep> {
        let fixed: &'static [FixedStep] = self.fixed;
        fixed.iter().find(|step| step.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients_match_reference_table() {
        let catalog = Catalog::standard();
        let rows: Vec<(&str, &str, f64, f64)> = catalog
            .alternatives()
            .iter()
            .flat_map(|step| {
                step.options.iter().map(move |o| {
                    (step.key, o.key, o.capex_contribution, o.opex_contribution)
                })
            })
            .collect();

        assert_eq!(
            rows,
            vec![
                ("harvestClarification", "Centrifuge", 500_000.0, 100_000.0),
                ("harvestClarification", "Depth Filtration", 300_000.0, 150_000.0),
                ("captureStep", "Standard Resin", 500_000.0, 150_000.0),
                ("captureStep", "Large Resin", 800_000.0, 250_000.0),
                ("bufferPrep", "Stainless Steel Tanks", 400_000.0, 50_000.0),
                ("bufferPrep", "Single-Use Bags", 200_000.0, 100_000.0),
            ]
        );
    }

    #[test]
    fn test_baseline_is_first_option_not_cheapest() {
        let step = Catalog::standard().step(HARVEST_CLARIFICATION).unwrap();
        assert_eq!(step.baseline().key, "Centrifuge");
        // Depth filtration is cheaper in CAPEX, yet the baseline is positional
        assert!(step.options[1].capex_contribution < step.baseline().capex_contribution);
    }

    #[test]
    fn test_options_are_non_empty_with_unique_keys() {
        for step in Catalog::standard().alternatives() {
            assert!(!step.options.is_empty());
            let mut keys = step.option_keys();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), step.options.len());
        }
    }

    #[test]
    fn test_unknown_lookups_are_configuration_errors() {
        let catalog = Catalog::standard();
        assert_eq!(
            catalog.step("sterileFiltration").unwrap_err(),
            ConfigurationError::UnknownStep("sterileFiltration".to_string())
        );

        let err = catalog
            .step(CAPTURE_STEP)
            .unwrap()
            .option("Huge Resin")
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownOption { ref step, .. } if step == "captureStep"));
    }

    #[test]
    fn test_fixed_steps() {
        let catalog = Catalog::standard();
        let keys: Vec<_> = catalog.fixed_steps().iter().map(|s| s.key).collect();
        assert_eq!(keys, vec![BIOREACTOR, POLISHING, FINAL_FORMULATION]);
        assert_eq!(catalog.fixed_step(POLISHING).unwrap().equipment_share, 0.07);
        assert!(catalog.fixed_step(CAPTURE_STEP).is_none());
    }
}
