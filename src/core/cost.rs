//! Cost Model - CAPEX, OPEX, annual production and minimum selling price
//!
//! [`evaluate`] is a pure function of a parameter snapshot and a
//! configuration. The formula order matters: the product-type and
//! throughput multipliers scale the base CAPEX *before* the option
//! contributions are added, and the utilization multiplier scales the base
//! OPEX *before* electricity and option contributions are added.
//!
//! Nothing is rounded here; callers format at display time.

use serde::Serialize;

use crate::core::catalog::Catalog;
use crate::core::configuration::ConfigurationState;
use crate::core::error::{DomainError, EngineError};
use crate::core::graph::{NodeKind, ProcessGraph};
use crate::core::parameters::{ParameterField, ParameterSet, ProductType};

pub const BASE_CAPEX: f64 = 10_000_000.0;
pub const BASE_OPEX: f64 = 2_000_000.0;
pub const MAB_CAPEX_FACTOR: f64 = 1.2;
pub const VACCINE_CAPEX_FACTOR: f64 = 1.5;
pub const REFERENCE_FLOW_RATE: f64 = 1000.0;
pub const THROUGHPUT_FACTOR: f64 = 0.8;
pub const REFERENCE_WORKING_HOURS: f64 = 8000.0;
pub const UTILIZATION_FACTOR: f64 = 0.9;
/// Annual electricity cost per $/kWh of electricity price
pub const ELECTRICITY_SCALE: f64 = 1_000_000.0;
/// Straight-line amortization period of CAPEX, in years
pub const AMORTIZATION_YEARS: f64 = 10.0;

/// Outcome of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostResult {
    /// Total capital expenditure ($)
    pub capex: f64,
    /// Annual operating expenditure ($/yr)
    pub opex: f64,
    /// Annual production (kg/yr)
    pub annual_production_kg: f64,
    /// Minimum selling price ($/kg)
    pub msp: f64,
}

/// MSP relative to the product's market value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPosition {
    Below,
    Above,
}

impl MarketPosition {
    pub fn describe(self) -> &'static str {
        match self {
            MarketPosition::Below => "below market value",
            MarketPosition::Above => "at or above market value",
        }
    }
}

impl CostResult {
    /// CAPEX spread over the amortization period ($/yr)
    pub fn annual_capex_cost(&self) -> f64 {
        self.capex / AMORTIZATION_YEARS
    }

    /// Total annualized cost ($/yr)
    pub fn annual_cost(&self) -> f64 {
        self.annual_capex_cost() + self.opex
    }

    pub fn msp_per_gram(&self) -> f64 {
        self.msp / 1000.0
    }

    /// Compare MSP against a market value quoted in $/g.
    ///
    /// MSP is converted from $/kg to $/g before the comparison. The web
    /// calculator this model comes from compared the raw $/kg figure with
    /// the $/g market value.
    pub fn market_position(&self, market_value_per_gram: f64) -> MarketPosition {
        if self.msp_per_gram() < market_value_per_gram {
            MarketPosition::Below
        } else {
            MarketPosition::Above
        }
    }
}

/// Evaluate against the standard catalog
pub fn evaluate(
    parameters: &ParameterSet,
    configuration: &ConfigurationState,
) -> Result<CostResult, EngineError> {
    evaluate_with(&Catalog::standard(), parameters, configuration)
}

/// Evaluate against an explicit catalog
pub fn evaluate_with(
    catalog: &Catalog,
    parameters: &ParameterSet,
    configuration: &ConfigurationState,
) -> Result<CostResult, EngineError> {
    let flow = parameters.flow_rate_from_fermentation;
    let titer = parameters.titer;
    let hours = parameters.facility_working_time;

    require_positive(ParameterField::FlowRateFromFermentation, flow)?;
    require_positive(ParameterField::Titer, titer)?;
    require_positive(ParameterField::FacilityWorkingTime, hours)?;
    // Fields are public, so a hand-built snapshot may bypass `set`
    parameters.validate()?;

    let selected = configuration.resolve(catalog)?;

    let mut capex = BASE_CAPEX;
    match parameters.product_type {
        ProductType::MonoclonalAntibody => capex *= MAB_CAPEX_FACTOR,
        ProductType::Vaccine => capex *= VACCINE_CAPEX_FACTOR,
        _ => {}
    }
    capex *= (flow / REFERENCE_FLOW_RATE) * THROUGHPUT_FACTOR;

    let mut opex = BASE_OPEX;
    opex *= (hours / REFERENCE_WORKING_HOURS) * UTILIZATION_FACTOR;
    opex += parameters.electricity_price * ELECTRICITY_SCALE;

    for (_, option) in &selected {
        capex += option.capex_contribution;
        opex += option.opex_contribution;
    }

    let annual_production_kg = (titer * flow * hours) / 1000.0;
    let msp = (capex / AMORTIZATION_YEARS + opex) / annual_production_kg;

    Ok(CostResult {
        capex,
        opex,
        annual_production_kg,
        msp,
    })
}

// `!(x > 0)` also rejects NaN
fn require_positive(field: ParameterField, value: f64) -> Result<(), DomainError> {
    if !(value > 0.0) {
        return Err(DomainError {
            field: field.key(),
            value,
        });
    }
    Ok(())
}

/// One category of a display-only cost decomposition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostShare {
    pub category: &'static str,
    pub share: f64,
    pub amount: f64,
}

const CAPEX_SHARES: &[(&str, f64)] = &[
    ("Equipment", 0.35),
    ("Installation", 0.20),
    ("Piping", 0.10),
    ("Instrumentation", 0.07),
    ("Electrical", 0.05),
    ("Buildings", 0.15),
    ("Engineering", 0.08),
];

const OPEX_SHARES: &[(&str, f64)] = &[
    ("Raw Materials", 0.30),
    ("Labor", 0.25),
    ("Utilities", 0.15),
    ("Maintenance", 0.10),
    ("Quality Control", 0.08),
    ("Waste Treatment", 0.05),
    ("Overhead", 0.07),
];

/// Fixed-percentage decompositions of CAPEX and OPEX for presentation.
/// They do not feed back into the cost model.
pub struct CostBreakdown;

impl CostBreakdown {
    pub fn capex(result: &CostResult) -> Vec<CostShare> {
        split(result.capex, CAPEX_SHARES)
    }

    pub fn opex(result: &CostResult) -> Vec<CostShare> {
        split(result.opex, OPEX_SHARES)
    }
}

fn split(total: f64, shares: &[(&'static str, f64)]) -> Vec<CostShare> {
    shares
        .iter()
        .map(|&(category, share)| CostShare {
            category,
            share,
            amount: total * share,
        })
        .collect()
}

/// CAPEX attributed to one piece of equipment
#[derive(Debug, Clone, Serialize)]
pub struct EquipmentCost {
    pub step: &'static str,
    pub equipment: &'static str,
    pub share: f64,
    pub amount: f64,
}

/// Equipment cost per process node, in graph order. Alternative nodes are
/// costed by their selected option.
pub fn equipment_costs(
    result: &CostResult,
    configuration: &ConfigurationState,
) -> Result<Vec<EquipmentCost>, EngineError> {
    let graph = ProcessGraph::standard();
    let catalog = graph.catalog();

    graph
        .nodes()
        .iter()
        .filter_map(|node| match node.kind {
            NodeKind::Fixed => catalog.fixed_step(node.key).map(|step| {
                Ok(EquipmentCost {
                    step: step.key,
                    equipment: step.label,
                    share: step.equipment_share,
                    amount: result.capex * step.equipment_share,
                })
            }),
            NodeKind::Alternative => Some(
                catalog
                    .step(node.key)
                    .and_then(|step| configuration.selected_option(step))
                    .map(|option| EquipmentCost {
                        step: node.key,
                        equipment: option.label,
                        share: option.equipment_share,
                        amount: result.capex * option.equipment_share,
                    })
                    .map_err(EngineError::from),
            ),
        })
        .collect()
}
