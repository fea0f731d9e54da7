//! `bptea study` command - Study management

use clap::{Subcommand, ValueEnum};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{
    apply_assignments, effective_format, escape_csv, format_short_id, print_json, print_yaml,
    truncate_str, Workspace,
};
use crate::cli::wizard::SetupWizard;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::Catalog;
use crate::core::store::{FileStore, StudyStore};
use crate::entities::{Study, StudyStatus};
use crate::report::format_currency;

#[derive(Subcommand, Debug)]
pub enum StudyCommands {
    /// Create a new study with default parameters
    New(NewArgs),

    /// List studies with filtering
    List(ListArgs),

    /// Show a study's details
    Show(IdArgs),

    /// Edit a study file in your editor
    Edit(IdArgs),

    /// Delete a study
    Delete(DeleteArgs),

    /// Set one or more parameters (FIELD=VALUE ...)
    Set(SetArgs),

    /// Select the option of an alternative step
    Select(SelectArgs),

    /// Change a study's status
    Status(StatusArgs),
}

/// Sort order for list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SortField {
    Name,
    Created,
    Modified,
    Status,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Study name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Free-text description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Use the interactive setup wizard to fill in parameters
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's')]
    pub status: Option<StudyStatus>,

    /// Search in name and description (case-insensitive substring)
    #[arg(long)]
    pub search: Option<String>,

    /// Sort by field
    #[arg(long, default_value = "created")]
    pub sort: SortField,

    /// Reverse sort order
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Limit output to N items
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show count only, not the items
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct IdArgs {
    /// Study ID (full or unique prefix)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Study ID (full or unique prefix)
    pub id: String,

    /// Do not ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Study ID (full or unique prefix)
    pub id: String,

    /// Assignments such as titer=7.5 or microbialHost="E. coli"
    #[arg(required = true, value_name = "FIELD=VALUE")]
    pub assignments: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct SelectArgs {
    /// Study ID (full or unique prefix)
    pub id: String,

    /// Alternative step key (e.g. captureStep)
    pub step: String,

    /// Option key (e.g. "Large Resin")
    pub option: String,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Study ID (full or unique prefix)
    pub id: String,

    /// New status (draft, in_progress, completed)
    pub status: StudyStatus,
}

pub fn run(cmd: StudyCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        StudyCommands::New(args) => run_new(args, global),
        StudyCommands::List(args) => run_list(args, global),
        StudyCommands::Show(args) => run_show(args, global),
        StudyCommands::Edit(args) => run_edit(args, global),
        StudyCommands::Delete(args) => run_delete(args, global),
        StudyCommands::Set(args) => run_set(args, global),
        StudyCommands::Select(args) => run_select(args, global),
        StudyCommands::Status(args) => run_status(args, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;

    let mut study = if args.interactive {
        let wizard = SetupWizard::new();
        let details = wizard.details(args.name, args.description)?;
        let mut study = Study::new(details.name, workspace.owner());
        study.description = details.description;
        wizard.parameters(&mut study.parameters)?;
        study
    } else {
        let name = args
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| miette::miette!("a study name is required (--name, or use --interactive)"))?;
        let mut study = Study::new(name.trim(), workspace.owner());
        study.description = args.description;
        study
    };
    study.status = StudyStatus::Draft;

    workspace.store.save(&study)?;
    tracing::info!(id = %study.id, owner = %study.owner, "created study");

    if global.format == OutputFormat::Id || global.quiet {
        println!("{}", study.id);
        return Ok(());
    }

    println!(
        "{} Created study {} {}",
        style("✓").green(),
        style(&study.id).cyan(),
        style(format!("\"{}\"", study.name)).yellow()
    );
    println!(
        "   {}",
        style(workspace.store.study_path(&study.owner, &study.id).display()).dim()
    );
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let mut studies = workspace.store.list(&workspace.owner())?;

    if let Some(status) = args.status {
        studies.retain(|s| s.status == status);
    }
    if let Some(ref term) = args.search {
        let term = term.to_lowercase();
        studies.retain(|s| {
            s.name.to_lowercase().contains(&term)
                || s
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&term))
        });
    }

    match args.sort {
        SortField::Name => studies.sort_by_key(|s| s.name.to_lowercase()),
        SortField::Created => studies.sort_by(|a, b| a.created.cmp(&b.created)),
        SortField::Modified => studies.sort_by(|a, b| a.last_modified.cmp(&b.last_modified)),
        SortField::Status => studies.sort_by_key(|s| s.status),
    }
    if args.reverse {
        studies.reverse();
    }
    if let Some(limit) = args.limit {
        studies.truncate(limit);
    }

    if args.count {
        println!("{}", studies.len());
        return Ok(());
    }

    let format = effective_format(global, OutputFormat::Tsv);

    if studies.is_empty() {
        match format {
            OutputFormat::Json | OutputFormat::Yaml => println!("[]"),
            OutputFormat::Id => {}
            _ => {
                println!("No studies found.");
                println!();
                println!(
                    "Create one with: {}",
                    style("bptea study new --name <NAME>").yellow()
                );
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_json(&studies)?,
        OutputFormat::Yaml => print_yaml(&studies)?,
        OutputFormat::Id => {
            for study in &studies {
                println!("{}", study.id);
            }
        }
        OutputFormat::Csv => {
            println!("id,name,status,msp,revision,last_modified");
            for study in &studies {
                println!(
                    "{},{},{},{},{},{}",
                    study.id,
                    escape_csv(&study.name),
                    study.status,
                    study.evaluate().map(|r| r.msp.to_string()).unwrap_or_default(),
                    study.revision,
                    study.last_modified.format("%Y-%m-%dT%H:%M:%SZ")
                );
            }
        }
        OutputFormat::Md => {
            println!("| ID | Name | Status | MSP ($/kg) | Modified |");
            println!("|---|---|---|---|---|");
            for study in &studies {
                println!(
                    "| {} | {} | {} | {} | {} |",
                    format_short_id(&study.id),
                    study.name,
                    study.status,
                    msp_display(study),
                    study.last_modified.format("%Y-%m-%d")
                );
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            println!(
                "{:<16} {:<32} {:<12} {:>12} {:<10}",
                style("ID").bold(),
                style("NAME").bold(),
                style("STATUS").bold(),
                style("MSP ($/kg)").bold(),
                style("MODIFIED").bold()
            );
            println!("{}", "-".repeat(86));
            for study in &studies {
                println!(
                    "{:<16} {:<32} {:<12} {:>12} {:<10}",
                    format_short_id(&study.id),
                    truncate_str(&study.name, 30),
                    study.status,
                    msp_display(study),
                    study.last_modified.format("%Y-%m-%d")
                );
            }
            if !global.quiet {
                println!();
                println!("{} study(ies) found", style(studies.len()).cyan());
            }
        }
    }

    Ok(())
}

fn msp_display(study: &Study) -> String {
    study
        .evaluate()
        .map(|r| format_currency(r.msp, 2))
        .unwrap_or_else(|_| "-".to_string())
}

fn run_show(args: IdArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let study = workspace.load_study(&args.id)?;

    match effective_format(global, OutputFormat::Yaml) {
        OutputFormat::Json => print_json(&study)?,
        OutputFormat::Yaml => print_yaml(&study)?,
        OutputFormat::Id => println!("{}", study.id),
        _ => print_study(&study),
    }
    Ok(())
}

fn print_study(study: &Study) {
    let catalog = Catalog::standard();

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&study.id).cyan());
    println!("{}: {}", style("Name").bold(), style(&study.name).yellow());
    println!("{}: {}", style("Status").bold(), study.status);
    if let Some(ref description) = study.description {
        println!("{}: {}", style("Description").bold(), description);
    }
    println!("{}", style("─".repeat(60)).dim());

    println!("{}", style("Selections:").bold());
    for step in catalog.alternatives() {
        let selected = study.configuration.selected(step.key).unwrap_or("-");
        println!("  {:<24} {}", step.label, selected);
    }
    println!();

    match study.evaluate() {
        Ok(result) => {
            println!("{}", style("Evaluation:").bold());
            println!("  {:<24} {}", "CAPEX", format_currency(result.capex, 0));
            println!("  {:<24} {}", "OPEX", format_currency(result.opex, 0));
            println!(
                "  {:<24} {:.1} kg/yr",
                "Annual production", result.annual_production_kg
            );
            println!("  {:<24} {}/kg", "MSP", format_currency(result.msp, 2));
        }
        Err(e) => println!("{} {}", style("!").yellow(), e),
    }

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {} | {}: {} | {}: {}",
        style("Owner").dim(),
        study.owner,
        style("Modified").dim(),
        study.last_modified.format("%Y-%m-%d %H:%M"),
        style("Revision").dim(),
        study.revision
    );
}

fn run_edit(args: IdArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let study = workspace.load_study(&args.id)?;
    let path = workspace.store.study_path(&study.owner, &study.id);

    println!(
        "Opening {} in {}...",
        style(format_short_id(&study.id)).cyan(),
        style(workspace.config.editor()).yellow()
    );
    let status = workspace.config.run_editor(&path).into_diagnostic()?;
    if !status.success() {
        tracing::warn!(%status, "editor exited with an error");
    }

    // Re-read so a broken edit is reported right away
    FileStore::read_file(&path)?;
    println!("{} {} is valid", style("✓").green(), study.id);
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let owner = workspace.owner();
    let id = workspace.store.resolve(&owner, &args.id)?;

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete study {}?", id))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    workspace.store.delete(&owner, &id)?;
    if !global.quiet {
        println!("{} Deleted study {}", style("✓").green(), style(id).cyan());
    }
    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let mut study = workspace.load_study(&args.id)?;

    apply_assignments(&mut study.parameters, &args.assignments)?;
    workspace.save_changed(&mut study)?;

    if !global.quiet {
        println!(
            "{} Updated {} (revision {})",
            style("✓").green(),
            style(format_short_id(&study.id)).cyan(),
            study.revision
        );
        for assignment in &args.assignments {
            println!("   {}", style(assignment).dim());
        }
    }
    Ok(())
}

fn run_select(args: SelectArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let mut study = workspace.load_study(&args.id)?;

    study.configuration.select(&args.step, &args.option)?;
    workspace.save_changed(&mut study)?;

    if !global.quiet {
        println!(
            "{} {} set to {}",
            style("✓").green(),
            style(&args.step).bold(),
            style(&args.option).yellow()
        );
        if let Ok(result) = study.evaluate() {
            println!(
                "   MSP is now {}/kg",
                style(format_currency(result.msp, 2)).cyan()
            );
        }
    }
    Ok(())
}

fn run_status(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let mut study = workspace.load_study(&args.id)?;

    let previous = study.status;
    study.status = args.status;
    workspace.save_changed(&mut study)?;

    if !global.quiet {
        println!(
            "{} {} {} → {}",
            style("✓").green(),
            style(format_short_id(&study.id)).cyan(),
            previous,
            args.status
        );
    }
    Ok(())
}
