use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pomoface", version, about = "Headless Pomoface host")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run session/break cycles against the real clock
    Run(commands::run::RunArgs),
    /// Replay a cycle on a simulated clock and print the event log
    Simulate(commands::simulate::SimulateArgs),
    /// Show the effective transition allow-list
    Table,
    /// Format milliseconds as an H:MM:SS readout
    Format {
        /// Duration in milliseconds
        ms: f64,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    // Logs go to stderr; stdout carries JSON only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pomoface=info,pomoface_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Table => commands::table::run(),
        Commands::Format { ms } => {
            println!("{}", pomoface_core::format_time(ms));
            Ok(())
        }
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
