//! Study reports
//!
//! [`ReportData`] gathers everything a report shows from one study. It
//! serializes to JSON as-is, and renders to Markdown through the embedded
//! `report.md.tera` template. Currency is rounded only by the template
//! filters.

use chrono::{DateTime, Utc};
use rust_embed::Embed;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Tera, Value};
use thiserror::Error;

use crate::core::catalog::Catalog;
use crate::core::compare::{compare_all, observations};
use crate::core::cost::{equipment_costs, CostBreakdown, CostResult, CostShare, EquipmentCost, MarketPosition};
use crate::core::error::EngineError;
use crate::core::parameters::{FieldGroup, ParameterField};
use crate::entities::{Study, StudyStatus};

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const REPORT_TEMPLATE: &str = "report.md.tera";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterRow {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterGroup {
    pub title: &'static str,
    pub fields: Vec<ParameterRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionRow {
    pub step: &'static str,
    pub step_label: &'static str,
    pub option: &'static str,
    pub option_label: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub option: &'static str,
    pub label: &'static str,
    pub baseline: bool,
    pub selected: bool,
    pub capex_delta: Option<f64>,
    pub opex_delta: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSection {
    pub step: &'static str,
    pub label: &'static str,
    pub options: Vec<ComparisonRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostSummary {
    #[serde(flatten)]
    pub result: CostResult,
    pub annual_capex_cost: f64,
    pub msp_per_gram: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketSummary {
    pub position: MarketPosition,
    pub description: &'static str,
    pub market_value_per_gram: f64,
    pub msp_per_gram: f64,
}

/// Everything shown in a study report
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner: String,
    pub status: StudyStatus,
    pub revision: u32,
    pub generated: DateTime<Utc>,
    pub parameters: Vec<ParameterGroup>,
    pub selections: Vec<SelectionRow>,
    pub cost: CostSummary,
    pub capex_breakdown: Vec<CostShare>,
    pub opex_breakdown: Vec<CostShare>,
    pub equipment: Vec<EquipmentCost>,
    pub comparisons: Vec<ComparisonSection>,
    pub observations: Vec<&'static str>,
    pub market: MarketSummary,
}

impl ReportData {
    /// Evaluate a study and collect its report contents
    pub fn build(study: &Study) -> Result<Self, EngineError> {
        let result = study.evaluate()?;
        let catalog = Catalog::standard();

        let parameters = FieldGroup::ALL
            .iter()
            .map(|&group| ParameterGroup {
                title: group.title(),
                fields: ParameterField::in_group(group)
                    .map(|field| {
                        let spec = field.spec();
                        ParameterRow {
                            key: field.key(),
                            label: spec.label,
                            value: study.parameters.get(field).to_string(),
                            unit: spec.unit,
                        }
                    })
                    .collect(),
            })
            .collect();

        let selections = study
            .configuration
            .resolve(&catalog)?
            .into_iter()
            .map(|(step, option)| SelectionRow {
                step: step.key,
                step_label: step.label,
                option: option.key,
                option_label: option.label,
                description: option.description,
            })
            .collect();

        let comparisons = compare_all(&study.configuration)
            .into_iter()
            .map(|section| ComparisonSection {
                step: section.step,
                label: section.label,
                options: section
                    .options
                    .into_iter()
                    .map(|row| ComparisonRow {
                        option: row.option.key,
                        label: row.option.label,
                        baseline: row.is_baseline,
                        selected: row.is_selected,
                        capex_delta: row.capex_delta,
                        opex_delta: row.opex_delta,
                    })
                    .collect(),
            })
            .collect();

        let market_value = study.parameters.market_value;
        let position = result.market_position(market_value);

        Ok(Self {
            id: study.id.to_string(),
            title: study.name.clone(),
            description: study.description.clone(),
            owner: study.owner.clone(),
            status: study.status,
            revision: study.revision,
            generated: Utc::now(),
            parameters,
            selections,
            cost: CostSummary {
                result,
                annual_capex_cost: result.annual_capex_cost(),
                msp_per_gram: result.msp_per_gram(),
            },
            capex_breakdown: CostBreakdown::capex(&result),
            opex_breakdown: CostBreakdown::opex(&result),
            equipment: equipment_costs(&result, &study.configuration)?,
            comparisons,
            observations: observations(&study.configuration)?,
            market: MarketSummary {
                position,
                description: position.describe(),
                market_value_per_gram: market_value,
                msp_per_gram: result.msp_per_gram(),
            },
        })
    }
}

/// Renders reports from the embedded templates
pub struct ReportRenderer {
    tera: Tera,
}

impl ReportRenderer {
    pub fn new() -> Result<Self, ReportError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                let template = std::str::from_utf8(&content.data)
                    .map_err(|e| ReportError::RenderError(format!("{}: {}", filename, e)))?;
                tera.add_raw_template(filename, template)
                    .map_err(|e| ReportError::RenderError(e.to_string()))?;
            }
        }

        tera.register_filter("currency", currency_filter);
        tera.register_filter("delta", delta_filter);
        tera.register_filter("percent", percent_filter);

        Ok(Self { tera })
    }

    /// Render the Markdown report
    pub fn markdown(&self, data: &ReportData) -> Result<String, ReportError> {
        if !self.tera.get_template_names().any(|n| n == REPORT_TEMPLATE) {
            return Err(ReportError::NotFound(REPORT_TEMPLATE.to_string()));
        }
        let context = tera::Context::from_serialize(data)
            .map_err(|e| ReportError::RenderError(e.to_string()))?;
        self.tera
            .render(REPORT_TEMPLATE, &context)
            .map_err(|e| ReportError::RenderError(render_chain(&e)))
    }
}

// Tera hides the useful part of a failure in the source chain
fn render_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

/// Format an amount as whole dollars with thousands separators, or with
/// `decimals` places when given
pub fn format_currency(amount: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, amount.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = amount < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("{}${}.{}", sign, grouped, fraction),
        None => format!("{}${}", sign, grouped),
    }
}

/// Signed whole-dollar difference, or "baseline" for a missing delta
pub fn format_delta(delta: Option<f64>) -> String {
    match delta {
        None => "baseline".to_string(),
        Some(d) if d > 0.0 => format!("+{}", format_currency(d, 0)),
        Some(d) => format_currency(d, 0),
    }
}

fn currency_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let amount = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg("currency filter expects a number"))?;
    let decimals = args.get("decimals").and_then(Value::as_u64).unwrap_or(0) as usize;
    Ok(Value::String(format_currency(amount, decimals)))
}

fn delta_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(format_delta(value.as_f64())))
}

fn percent_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let share = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg("percent filter expects a number"))?;
    Ok(Value::String(format!("{:.0}%", share * 100.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn large_resin_study() -> Study {
        let mut study = Study::new("Plant A", "alice");
        study.description = Some("Larger capture column".to_string());
        study
            .configuration
            .select("captureStep", "Large Resin")
            .unwrap();
        study
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(11_300_000.0, 0), "$11,300,000");
        assert_eq!(format_currency(999.4, 0), "$999");
        assert_eq!(format_currency(86.666_666, 2), "$86.67");
        assert_eq!(format_currency(-200_000.0, 0), "-$200,000");
        assert_eq!(format_currency(-0.2, 0), "$0");
        assert_eq!(format_currency(0.0, 0), "$0");
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(None), "baseline");
        assert_eq!(format_delta(Some(300_000.0)), "+$300,000");
        assert_eq!(format_delta(Some(-200_000.0)), "-$200,000");
    }

    #[test]
    fn test_build_collects_every_section() {
        let data = ReportData::build(&large_resin_study()).unwrap();
        assert_eq!(data.parameters.len(), 3);
        assert_eq!(data.parameters[0].title, "Product Specifications");
        assert_eq!(data.selections.len(), 3);
        assert_eq!(data.comparisons.len(), 3);
        assert_eq!(data.observations.len(), 3);
        assert_eq!(data.equipment.len(), 6);
        assert_eq!(data.capex_breakdown.len(), 7);
        assert_eq!(data.market.position, MarketPosition::Below);
        assert!((data.cost.result.capex - 11_300_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_markdown_contains_headline_figures() {
        let data = ReportData::build(&large_resin_study()).unwrap();
        let markdown = ReportRenderer::new().unwrap().markdown(&data).unwrap();

        assert!(markdown.contains("# Plant A"));
        assert!(markdown.contains("Larger capture column"));
        assert!(markdown.contains("$11,300,000"));
        assert!(markdown.contains("$2,302,000"));
        assert!(markdown.contains("$86.67"));
        assert!(markdown.contains("Larger Column Size"));
        assert!(markdown.contains("+$300,000"));
        assert!(markdown.contains("below market value"));
    }

    #[test]
    fn test_markdown_lists_selected_option_keys() {
        let data = ReportData::build(&large_resin_study()).unwrap();
        let markdown = ReportRenderer::new().unwrap().markdown(&data).unwrap();

        assert!(markdown.contains("| Capture Step | Large Resin | Larger Column Size |"));
        assert!(markdown.contains("| Centrifuge |"));
    }

    #[test]
    fn test_json_shape() {
        let data = ReportData::build(&large_resin_study()).unwrap();
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["cost"]["capex"], serde_json::json!(11_300_000.0));
        assert_eq!(json["market"]["position"], "below");
        assert!(json["comparisons"][1]["options"][0]["capex_delta"].is_null());
    }
}
