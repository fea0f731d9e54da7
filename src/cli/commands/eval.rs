//! `bptea eval` command - Evaluate a snapshot

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{
    apply_assignments, apply_selections, effective_format, load_snapshot, print_json, print_yaml,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::Catalog;
use crate::core::configuration::ConfigurationState;
use crate::core::cost::{evaluate, CostResult, MarketPosition};
use crate::report::format_currency;

#[derive(clap::Args, Debug)]
pub struct EvalArgs {
    /// Study ID (full or unique prefix); evaluates the defaults when omitted
    pub id: Option<String>,

    /// Override a parameter for this run only (FIELD=VALUE, repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Override a selection for this run only (STEP=OPTION, repeatable)
    #[arg(long = "select", value_name = "STEP=OPTION")]
    pub select: Vec<String>,
}

/// Machine-readable evaluation output
#[derive(Debug, Serialize)]
struct Evaluation<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    study: Option<String>,
    #[serde(flatten)]
    result: CostResult,
    annual_capex_cost: f64,
    msp_per_gram: f64,
    market_value: f64,
    market_position: MarketPosition,
    configuration: &'a ConfigurationState,
}

pub fn run(args: EvalArgs, global: &GlobalOpts) -> Result<()> {
    let (study, mut parameters, mut configuration) = load_snapshot(global, args.id.as_deref())?;

    apply_assignments(&mut parameters, &args.set)?;
    apply_selections(&mut configuration, &args.select)?;

    let result = evaluate(&parameters, &configuration)?;
    let position = result.market_position(parameters.market_value);
    tracing::debug!(
        capex = result.capex,
        opex = result.opex,
        msp = result.msp,
        "evaluated snapshot"
    );

    let format = effective_format(global, OutputFormat::Auto);
    let evaluation = Evaluation {
        study: study.as_ref().map(|s| s.id.to_string()),
        result,
        annual_capex_cost: result.annual_capex_cost(),
        msp_per_gram: result.msp_per_gram(),
        market_value: parameters.market_value,
        market_position: position,
        configuration: &configuration,
    };

    match format {
        OutputFormat::Json => return print_json(&evaluation),
        OutputFormat::Yaml => return print_yaml(&evaluation),
        OutputFormat::Tsv => {
            println!("capex\topex\tannual_production_kg\tmsp");
            println!(
                "{}\t{}\t{}\t{}",
                result.capex, result.opex, result.annual_production_kg, result.msp
            );
            return Ok(());
        }
        OutputFormat::Csv => {
            println!("capex,opex,annual_production_kg,msp");
            println!(
                "{},{},{},{}",
                result.capex, result.opex, result.annual_production_kg, result.msp
            );
            return Ok(());
        }
        OutputFormat::Id => {
            if let Some(study) = &study {
                println!("{}", study.id);
            }
            return Ok(());
        }
        OutputFormat::Md | OutputFormat::Auto => {}
    }

    if global.quiet {
        println!("{}", format_currency(result.msp, 2));
        return Ok(());
    }

    let title = match &study {
        Some(study) => format!("{} ({})", study.name, study.id),
        None => "Default process".to_string(),
    };

    println!("{}", style(title).bold());
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "  {:<24} {}",
        "CAPEX",
        style(format_currency(result.capex, 0)).cyan()
    );
    println!(
        "  {:<24} {} /yr",
        "OPEX",
        style(format_currency(result.opex, 0)).cyan()
    );
    println!(
        "  {:<24} {:.1} kg/yr",
        "Annual production", result.annual_production_kg
    );
    println!(
        "  {:<24} {} /kg",
        "Minimum selling price",
        style(format_currency(result.msp, 2)).yellow().bold()
    );
    println!("{}", style("─".repeat(60)).dim());

    let catalog = Catalog::standard();
    for step in catalog.alternatives() {
        let selected = configuration.selected(step.key).unwrap_or("-");
        let marker = if selected == step.baseline().key {
            style("").dim()
        } else {
            style(" (changed)").yellow()
        };
        println!("  {:<24} {}{}", step.label, selected, marker);
    }
    println!("{}", style("─".repeat(60)).dim());

    let verdict = match position {
        MarketPosition::Below => style(position.describe()).green(),
        MarketPosition::Above => style(position.describe()).red(),
    };
    println!(
        "MSP of {}/g is {} ({}/g)",
        format_currency(result.msp_per_gram(), 2),
        verdict,
        format_currency(parameters.market_value, 2)
    );

    Ok(())
}
