//! CLI entry point - the composition root.
//!
//! This is the ONLY place where infrastructure is wired together via bootstrap.
//! Command dispatch routes to handlers which delegate to the session.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use drvsweep_core::Startup;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use drvsweep_cli::handlers::list::ListArgs;
use drvsweep_cli::handlers::remove::RemoveArgs;
use drvsweep_cli::{Cli, CliConfig, CliContext, CliError, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Command failed");
            eprintln!("Error: {err:#}");
            ExitCode::from(CliError::exit_code_for(&err))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = CliConfig::from_settings(cli.settings())?;
    let ctx = bootstrap(config);

    // The interactive session needs administrator rights too
    let needs_elevation = cli
        .command
        .as_ref()
        .is_none_or(Commands::requires_elevation);
    if needs_elevation && !start_session(&ctx)? {
        return Ok(());
    }

    match cli.command {
        Some(Commands::List {
            unused,
            sort,
            reverse,
            json,
        }) => {
            let args = ListArgs {
                unused,
                sort,
                reverse,
                json,
            };
            handlers::list::execute(&ctx, args).await?;
        }
        Some(Commands::Remove {
            packages,
            all_unused,
            yes,
        }) => {
            let args = RemoveArgs {
                packages,
                all_unused,
                yes,
            };
            handlers::remove::execute(&ctx, args).await?;
        }
        Some(Commands::Status) => handlers::status::execute(&ctx)?,
        None => handlers::interactive::execute(&ctx).await?,
    }

    Ok(())
}

/// Check elevation once. `false` means an elevated copy took over.
fn start_session(ctx: &CliContext) -> Result<bool, CliError> {
    match ctx.session().start()? {
        Startup::Elevated => {
            debug!("Running elevated");
            Ok(true)
        }
        Startup::Relaunched => {
            println!("Administrator rights are required; continuing in an elevated window.");
            Ok(false)
        }
    }
}
