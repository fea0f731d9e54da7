use bptea::cli::{Cli, Commands, GlobalOpts};
use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(&global);

    match cli.command {
        Commands::Init(args) => bptea::cli::commands::init::run(args, &global),
        Commands::Study(cmd) => bptea::cli::commands::study::run(cmd, &global),
        Commands::Eval(args) => bptea::cli::commands::eval::run(args, &global),
        Commands::Compare(args) => bptea::cli::commands::compare::run(args, &global),
        Commands::Graph(args) => bptea::cli::commands::graph::run(args, &global),
        Commands::Report(args) => bptea::cli::commands::report::run(args, &global),
        Commands::Catalog(args) => bptea::cli::commands::catalog::run(args, &global),
        Commands::Params(args) => bptea::cli::commands::params::run(args, &global),
        Commands::Completions(args) => bptea::cli::commands::completions::run(args),
    }
}

/// Log to stderr; `BPTEA_LOG` takes precedence over `--verbose`
fn init_logging(global: &GlobalOpts) {
    let default_level = if global.verbose { "bptea=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("BPTEA_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when embedded; keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
