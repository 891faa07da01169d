//! CLI mode
//!
//! Maintenance commands that run without starting the HTTP server.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::storage::StorageFactory;

const DEFAULT_SAMPLE_PATH: &str = "config.example.toml";

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    CommandError(String),
}

impl CliError {
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    pub fn format_colored(&self) -> String {
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::CrmError> for CliError {
    fn from(err: crate::errors::CrmError) -> Self {
        CliError::StorageError(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::CommandError(err.to_string())
    }
}

/// Run a maintenance command
///
/// `Serve` is handled by the caller and never reaches here.
pub async fn run_cli(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Serve => Err(CliError::CommandError(
            "serve is not a maintenance command".to_string(),
        )),
        Commands::Migrate => migrate().await,
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force),
    }
}

/// 连接数据库（连接时自动执行迁移）
async fn migrate() -> Result<(), CliError> {
    println!("{}", "Applying database migrations...".yellow());
    let storage = StorageFactory::create().await?;
    println!(
        "  {} {}",
        "Database is up to date:".green(),
        storage.backend_name().blue()
    );
    Ok(())
}

fn config_generate(output_path: Option<String>, force: bool) -> Result<(), CliError> {
    let path = output_path.unwrap_or_else(|| DEFAULT_SAMPLE_PATH.to_string());

    // 文件已存在且未加 --force 时交互确认
    if !force && Path::new(&path).exists() {
        print!(
            "{} {} {}",
            "File already exists:".yellow(),
            path.blue(),
            "Overwrite? [y/N] ".yellow()
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", "Aborted.".red());
            return Ok(());
        }
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    StaticConfig::default().save_to_file(&path).map_err(|e| {
        CliError::CommandError(format!("Unable to write configuration file: {}", e))
    })?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    println!(
        "  {}",
        "Set api.api_key before exposing the import endpoints".dimmed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_generate_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sample.toml");
        let path_str = path.to_string_lossy().to_string();

        config_generate(Some(path_str), true).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: StaticConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed.server.port, StaticConfig::default().server.port);
        assert_eq!(parsed.uploads.dir, StaticConfig::default().uploads.dir);
    }

    #[tokio::test]
    async fn test_serve_is_not_a_cli_command() {
        let err = run_cli(Commands::Serve).await.unwrap_err();
        assert!(matches!(err, CliError::CommandError(_)));
    }
}
