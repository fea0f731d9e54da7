//! `bptea catalog` command - Alternative steps and their options

use console::style;
use miette::Result;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{effective_format, escape_csv, print_json, print_yaml};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::{AlternativeStep, Catalog, FixedStep};
use crate::report::format_currency;

#[derive(clap::Args, Debug)]
pub struct CatalogArgs {
    /// Only show this step (e.g. bufferPrep)
    #[arg(long, short = 's')]
    pub step: Option<String>,

    /// Include the fixed steps
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Serialize)]
struct CatalogListing {
    alternatives: Vec<&'static AlternativeStep>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fixed: Vec<&'static FixedStep>,
}

pub fn run(args: CatalogArgs, global: &GlobalOpts) -> Result<()> {
    let catalog = Catalog::standard();

    let alternatives = match &args.step {
        Some(key) => vec![catalog.step(key)?],
        None => catalog.alternatives().iter().collect(),
    };
    let fixed = if args.all && args.step.is_none() {
        catalog.fixed_steps().iter().collect()
    } else {
        Vec::new()
    };
    let listing = CatalogListing {
        alternatives,
        fixed,
    };

    match effective_format(global, OutputFormat::Auto) {
        OutputFormat::Json => print_json(&listing),
        OutputFormat::Yaml => print_yaml(&listing),
        OutputFormat::Id => {
            for step in &listing.alternatives {
                for option in step.options {
                    println!("{}={}", step.key, option.key);
                }
            }
            Ok(())
        }
        OutputFormat::Csv | OutputFormat::Tsv => {
            let csv = global.format == OutputFormat::Csv;
            let sep = if csv { "," } else { "\t" };
            println!(
                "{}",
                ["step", "option", "label", "capex", "opex", "equipment_share"].join(sep)
            );
            for step in &listing.alternatives {
                for option in step.options {
                    let (key, label) = if csv {
                        (escape_csv(option.key), escape_csv(option.label))
                    } else {
                        (option.key.to_string(), option.label.to_string())
                    };
                    println!(
                        "{}",
                        [
                            step.key.to_string(),
                            key,
                            label,
                            option.capex_contribution.to_string(),
                            option.opex_contribution.to_string(),
                            option.equipment_share.to_string(),
                        ]
                        .join(sep)
                    );
                }
            }
            Ok(())
        }
        OutputFormat::Md | OutputFormat::Auto => {
            for step in &listing.alternatives {
                print_step(step, global.quiet);
            }
            if !listing.fixed.is_empty() {
                println!("{}", style("Fixed steps").bold());
                for step in &listing.fixed {
                    println!(
                        "  {:<24} {}",
                        step.label,
                        style(step.description).dim()
                    );
                }
            }
            Ok(())
        }
    }
}

fn print_step(step: &AlternativeStep, quiet: bool) {
    println!(
        "{} {}",
        style(step.label).bold(),
        style(format!("({})", step.key)).dim()
    );
    if !quiet {
        println!("{}", style(step.description).dim());
    }

    let mut builder = Builder::default();
    builder.push_record(["Option", "Label", "CAPEX", "OPEX", "Description"]);
    for option in step.options {
        builder.push_record([
            option.key.to_string(),
            option.label.to_string(),
            format_currency(option.capex_contribution, 0),
            format_currency(option.opex_contribution, 0),
            option.description.to_string(),
        ]);
    }
    println!("{}", builder.build().with(Style::markdown()));
    println!();
}
