//! `bptea params` command - Parameter fields, units, domains and defaults

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{effective_format, print_json, print_yaml};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::parameters::{
    FieldGroup, FieldKind, ParameterField, ParameterSet, ParameterValue,
};

#[derive(clap::Args, Debug)]
pub struct ParamsArgs {
    /// Show the help text of every field
    #[arg(long, short = 'l')]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct FieldRow {
    key: &'static str,
    label: &'static str,
    group: FieldGroup,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<&'static str>,
    domain: String,
    default: ParameterValue,
    help: &'static str,
}

fn domain_text(kind: FieldKind) -> String {
    match kind {
        FieldKind::Number(domain) => domain.describe().to_string(),
        FieldKind::Choice(labels) => labels.join(" | "),
        FieldKind::Flag => "true | false".to_string(),
    }
}

fn rows() -> Vec<FieldRow> {
    let defaults = ParameterSet::default();
    ParameterField::ALL
        .into_iter()
        .map(|field| {
            let spec = field.spec();
            FieldRow {
                key: field.key(),
                label: spec.label,
                group: spec.group,
                unit: spec.unit,
                domain: domain_text(spec.kind),
                default: defaults.get(field),
                help: spec.help,
            }
        })
        .collect()
}

pub fn run(args: ParamsArgs, global: &GlobalOpts) -> Result<()> {
    let rows = rows();

    match effective_format(global, OutputFormat::Auto) {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Yaml => print_yaml(&rows),
        OutputFormat::Id => {
            for row in &rows {
                println!("{}", row.key);
            }
            Ok(())
        }
        OutputFormat::Tsv | OutputFormat::Csv => {
            let sep = if global.format == OutputFormat::Csv { "," } else { "\t" };
            println!("{}", ["key", "unit", "default"].join(sep));
            for row in &rows {
                println!(
                    "{}{sep}{}{sep}{}",
                    row.key,
                    row.unit.unwrap_or(""),
                    row.default
                );
            }
            Ok(())
        }
        OutputFormat::Md | OutputFormat::Auto => {
            for group in FieldGroup::ALL {
                println!("{}", style(group.title()).bold());
                println!("{}", style("─".repeat(60)).dim());
                for row in rows.iter().filter(|r| r.group == group) {
                    let unit = row.unit.map(|u| format!(" {}", u)).unwrap_or_default();
                    println!(
                        "  {:<28} {:<16} {}",
                        style(row.key).cyan(),
                        format!("{}{}", row.default, unit),
                        style(&row.domain).dim()
                    );
                    if args.long {
                        println!("  {:<28} {}", "", row.help);
                    }
                }
                println!();
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_cover_every_field() {
        let rows = rows();
        assert_eq!(rows.len(), ParameterField::ALL.len());
        let titer = rows.iter().find(|r| r.key == "titer").unwrap();
        assert_eq!(titer.unit, Some("g/L"));
        assert_eq!(titer.default, ParameterValue::Number(5.0));
        assert_eq!(titer.domain, "greater than 0");
    }
}
