use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# plateplan configuration

# Directory for recipes.json and mealplan.json
# (default: ~/.local/share/plateplan on Linux)
# data_dir: ~/.local/share/plateplan

# Days shown before and after today in the meal plan
window_days: 14

# Name recorded on recipes you create
created_by: default
"#;

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        cli_config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                cli_config_path
                                    .unwrap_or_else(Config::default_config_path)
                                    .display()
                            );
                        }
                        println!();

                        println!("data_dir: {}", config.data_dir.value.display());
                        println!("  source: {}", config.data_dir.source);
                        println!();

                        println!("window_days: {}", config.window_days.value);
                        println!("  source: {}", config.window_days.source);
                        println!();

                        println!("created_by: {}", config.created_by.value);
                        println!("  source: {}", config.created_by.source);
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = cli_config_path.unwrap_or_else(Config::default_config_path);

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'plateplan config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigSource;
    use tempfile::tempdir;

    #[test]
    fn test_init_writes_loadable_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.yaml");
        let config = Config::load(Some(config_path.clone())).unwrap();

        ConfigCommand {
            command: ConfigSubcommand::Init,
        }
        .run(&config, Some(config_path.clone()))
        .unwrap();

        let reloaded = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(reloaded.config_file, Some(config_path));
        assert_eq!(reloaded.window_days.value, 14);
        assert_eq!(reloaded.window_days.source, ConfigSource::File);
        assert_eq!(reloaded.created_by.value, "default");
        assert_eq!(reloaded.created_by.source, ConfigSource::File);
    }
}
