use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod config;
mod store;

use commands::{ConfigCommand, PlanCommand, RecipeCommand, ShoppingCommand};
use config::Config;
use store::JsonStore;

#[derive(Parser)]
#[command(name = "plateplan")]
#[command(version)]
#[command(about = "Plan meals on a calendar and build shopping lists", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage recipes and their components
    Recipe(RecipeCommand),

    /// Plan servings on the calendar
    Plan(PlanCommand),

    /// Build shopping lists from the plan
    Shopping(ShoppingCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plateplan=warn,plateplan_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cli_config_path = cli.config.clone();
    let config = Config::load(cli.config)?;
    tracing::debug!(data_dir = %config.data_dir.value.display(), "configuration loaded");

    let store = JsonStore::new(config.data_dir.value.clone());

    match cli.command {
        Some(Commands::Recipe(cmd)) => cmd.run(&store, &config.created_by.value)?,
        Some(Commands::Plan(cmd)) => cmd.run(&store, &config)?,
        Some(Commands::Shopping(cmd)) => cmd.run(&store)?,
        Some(Commands::Config(cmd)) => cmd.run(&config, cli_config_path)?,
        None => println!("Use --help to see available commands"),
    }

    Ok(())
}
