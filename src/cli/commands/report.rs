//! `bptea report` command - Export a study report

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::cli::helpers::{effective_format, Workspace};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::report::{ReportData, ReportRenderer};

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Study ID (full or unique prefix)
    pub id: String,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: ReportArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let study = workspace.load_study(&args.id)?;
    let data = ReportData::build(&study)?;

    let content = match effective_format(global, OutputFormat::Md) {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&data).into_diagnostic()?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_yml::to_string(&data).into_diagnostic()?,
        _ => ReportRenderer::new()
            .and_then(|renderer| renderer.markdown(&data))
            .map_err(|e| miette::miette!("{}", e))?,
    };

    tracing::info!(id = %study.id, bytes = content.len(), "rendered report");
    write_output(&content, args.output, global.quiet)
}

fn write_output(content: &str, output_path: Option<PathBuf>, quiet: bool) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(&path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            if !quiet {
                println!(
                    "{} Report written to {}",
                    style("✓").green(),
                    style(path.display()).cyan()
                );
            }
        }
        None => print!("{}", content),
    }
    Ok(())
}
