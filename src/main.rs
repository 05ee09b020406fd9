use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use punch::api::ApiClient;
use punch::cli::args::{Cli, Commands};
use punch::cli::commands;
use punch::config::{Config, Paths};
use punch::error::PunchError;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), PunchError> {
    let cli = Cli::parse();
    let paths = Paths::new()?;
    init_logging(&paths);

    let config = Config::load_from_path(&paths.config_file)?.with_overrides(cli.api_url, cli.token);
    config.general.color.apply();
    let format = cli.output.unwrap_or(config.general.default_output);

    // Commands that never touch the network
    let output = match cli.command {
        Commands::Config(args) => commands::config(&paths, &config, args.command, format)?,
        Commands::Completions { shell } => commands::completions(shell)?,
        command => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let client = ApiClient::new(&config.api)?;
            runtime.block_on(async {
                match command {
                    Commands::Track(args) => commands::track(client, args, &config.timer, format).await,
                    Commands::Entries(args) => commands::entries(&client, args.command, format).await,
                    Commands::Projects(args) => commands::projects(&client, args.command, format).await,
                    Commands::Tasks(args) => commands::tasks(&client, args.project, args.command, format).await,
                    Commands::Report { period } => commands::report(&client, period, format).await,
                    Commands::Invoice(args) => commands::invoice(&client, &args, format).await,
                    Commands::Config(_) | Commands::Completions { .. } => Ok(String::new()),
                }
            })?
        }
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// Log to `~/.punch/punch.log`, filtered by `PUNCH_LOG` (default `info`).
///
/// Logging is skipped if the file cannot be opened.
fn init_logging(paths: &Paths) {
    if paths.ensure_dirs().is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.log_file)
    else {
        return;
    };

    let filter = EnvFilter::try_from_env("PUNCH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .ok();
}
