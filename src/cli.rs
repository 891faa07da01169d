//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Ekranu CRM - DOOH advertising record management
#[derive(Parser)]
#[command(name = "ekranu-crm")]
#[command(version)]
#[command(about = "Record management for a DOOH advertising operation", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Connect to the database and apply pending migrations
    Migrate,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["ekranu-crm"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_config_generate() {
        let cli =
            Cli::try_parse_from(["ekranu-crm", "-c", "prod.toml", "config", "generate", "out.toml", "--force"])
                .unwrap();
        assert_eq!(cli.config.as_deref(), Some("prod.toml"));
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Generate {
                    output_path: Some("out.toml".to_string()),
                    force: true,
                }
            })
        );
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["ekranu-crm", "tui"]).is_err());
    }
}
