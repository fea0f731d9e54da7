//! `bptea compare` command - Option deltas against each step's baseline

use console::style;
use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{effective_format, escape_csv, load_snapshot, print_json, print_yaml};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::Catalog;
use crate::core::compare::{compare_all, compare_options, StepComparison};
use crate::report::{format_currency, format_delta};

#[derive(clap::Args, Debug)]
pub struct CompareArgs {
    /// Study ID (full or unique prefix); compares against the defaults when omitted
    pub id: Option<String>,

    /// Only compare this step (e.g. captureStep)
    #[arg(long, short = 's')]
    pub step: Option<String>,
}

pub fn run(args: CompareArgs, global: &GlobalOpts) -> Result<()> {
    let (_, _, configuration) = load_snapshot(global, args.id.as_deref())?;

    let sections = match &args.step {
        Some(key) => {
            let step = Catalog::standard().step(key)?;
            vec![StepComparison {
                step: step.key,
                label: step.label,
                options: compare_options(step, &configuration),
            }]
        }
        None => compare_all(&configuration),
    };

    match effective_format(global, OutputFormat::Auto) {
        OutputFormat::Json => print_json(&sections),
        OutputFormat::Yaml => print_yaml(&sections),
        OutputFormat::Csv => {
            println!("step,option,baseline,selected,capex_delta,opex_delta");
            for section in &sections {
                for row in &section.options {
                    println!(
                        "{},{},{},{},{},{}",
                        section.step,
                        escape_csv(row.option.key),
                        row.is_baseline,
                        row.is_selected,
                        row.capex_delta.unwrap_or(0.0),
                        row.opex_delta.unwrap_or(0.0)
                    );
                }
            }
            Ok(())
        }
        OutputFormat::Tsv => {
            println!("step\toption\tbaseline\tselected\tcapex_delta\topex_delta");
            for section in &sections {
                for row in &section.options {
                    println!(
                        "{}\t{}\t{}\t{}\t{}\t{}",
                        section.step,
                        row.option.key,
                        row.is_baseline,
                        row.is_selected,
                        row.capex_delta.unwrap_or(0.0),
                        row.opex_delta.unwrap_or(0.0)
                    );
                }
            }
            Ok(())
        }
        OutputFormat::Id => {
            for section in &sections {
                for row in section.options.iter().filter(|r| r.is_selected) {
                    println!("{}={}", section.step, row.option.key);
                }
            }
            Ok(())
        }
        OutputFormat::Md | OutputFormat::Auto => {
            for section in &sections {
                println!("## {}", section.label);
                println!();
                println!("{}", comparison_table(section));
                println!();
            }
            if !global.quiet {
                println!(
                    "{} recommended (baseline)  {} selected",
                    style("★").yellow(),
                    style("●").green()
                );
            }
            Ok(())
        }
    }
}

fn comparison_table(section: &StepComparison) -> String {
    let mut builder = Builder::default();
    builder.push_record(["", "Option", "CAPEX", "OPEX", "Δ CAPEX", "Δ OPEX"]);

    for row in &section.options {
        let mut marks = String::new();
        if row.is_recommended() {
            marks.push('★');
        }
        if row.is_selected {
            marks.push('●');
        }
        builder.push_record([
            marks,
            row.option.label.to_string(),
            format_currency(row.option.capex_contribution, 0),
            format_currency(row.option.opex_contribution, 0),
            format_delta(row.capex_delta),
            format_delta(row.opex_delta),
        ]);
    }

    builder.build().with(Style::markdown()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CAPTURE_STEP;
    use crate::core::configuration::ConfigurationState;

    #[test]
    fn test_comparison_table_marks_baseline_and_deltas() {
        let step = Catalog::standard().step(CAPTURE_STEP).unwrap();
        let section = StepComparison {
            step: step.key,
            label: step.label,
            options: compare_options(step, &ConfigurationState::default()),
        };
        let table = comparison_table(&section);
        assert!(table.contains("★●"));
        assert!(table.contains("baseline"));
        assert!(table.contains("+$300,000"));
    }
}
