//! The `iris config` command for configuration management.

use clap::{Args, Subcommand};
use console::Style;
use iris_core::{Config, Provider};
use std::path::Path;

use super::types::ModelChoice;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration (literal API keys are masked)
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Store an API key in the config file
    SetKey {
        /// Provider the key belongs to
        #[arg(value_enum)]
        provider: ModelChoice,

        /// The API key
        key: String,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            println!("{}", masked(config).to_toml()?);
        }

        ConfigCommand::Path => {
            let path = Config::default_path();
            println!("{}", path.display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            init_config(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }

        ConfigCommand::SetKey { provider, key } => {
            let provider = Provider::from(provider);
            let path = Config::default_path();
            save_key(&path, provider, &key)?;

            let dim = Style::new().for_stderr().dim();
            eprintln!(
                "{}",
                dim.apply_to(format!("{provider} key saved to {}", path.display()))
            );
        }
    }

    Ok(())
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}

/// Replace literal keys with a mask. `${VAR}` references are kept as-is.
fn masked(mut config: Config) -> Config {
    let mask = |key: &mut String| {
        if !key.is_empty() && !key.starts_with("${") {
            *key = "********".to_string();
        }
    };
    mask(&mut config.providers.openai.api_key);
    mask(&mut config.providers.anthropic.api_key);
    mask(&mut config.providers.gemini.api_key);
    config
}

/// Section under `[providers]` holding a provider's settings.
fn section_name(provider: Provider) -> &'static str {
    match provider {
        Provider::OpenAi => "openai",
        Provider::Anthropic => "anthropic",
        Provider::Gemini => "gemini",
    }
}

/// Write `api_key` into `[providers.<name>]`, keeping the rest of the file
/// (including comments) untouched.
fn save_key(config_path: &Path, provider: Provider, key: &str) -> anyhow::Result<()> {
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    let content = std::fs::read_to_string(config_path).unwrap_or_default();
    let mut doc: toml_edit::DocumentMut = content
        .parse()
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {e}", config_path.display()))?;

    let section = section_name(provider);

    // Ensure [providers] table exists
    if !doc.contains_key("providers") {
        let mut providers = toml_edit::Table::new();
        providers.set_implicit(true);
        doc["providers"] = toml_edit::Item::Table(providers);
    }

    // Ensure [providers.<section>] table exists
    if !doc["providers"]
        .as_table()
        .is_some_and(|t| t.contains_key(section))
    {
        doc["providers"][section] = toml_edit::Item::Table(toml_edit::Table::new());
    }

    doc["providers"][section]["api_key"] = toml_edit::value(key);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(config_path, doc.to_string())?;
    Ok(())
}
