//! `bptea init` command - Initialize a new workspace

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::Path;

use crate::cli::GlobalOpts;
use crate::core::project::{Project, ProjectError, STUDIES_DIR, WORKSPACE_DIR};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Rewrite the default config even if .bptea/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    match project {
        Ok(project) => {
            if global.quiet {
                return Ok(());
            }
            println!(
                "{} Initialized bptea workspace at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            println!("Created workspace structure:");
            print_structure(project.root());
            println!();
            println!("Next steps:");
            println!(
                "  {} Create your first study",
                style("bptea study new --name \"Plant A\"").yellow()
            );
            println!(
                "  {} Evaluate the default process",
                style("bptea eval").yellow()
            );
            println!(
                "  {} Browse the equipment alternatives",
                style("bptea catalog").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} bptea workspace already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("bptea init --force").yellow()
            );
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn print_structure(root: &Path) {
    let entries = [
        format!("{}/", WORKSPACE_DIR),
        format!("{}/config.yaml", WORKSPACE_DIR),
        format!("{}/", STUDIES_DIR),
    ];

    for entry in entries {
        if root.join(&entry).exists() {
            let marker = if entry.ends_with('/') { "📁" } else { "📄" };
            println!("  {} {}", marker, style(entry).dim());
        }
    }
}
