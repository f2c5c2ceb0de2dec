//! Iris CLI - Send an image to hosted vision models and get the analysis back.
//!
//! Iris forwards an image plus an instruction to OpenAI, Anthropic or Google
//! Gemini, or to all three at once for a side-by-side comparison. It also
//! serves a small web upload form.
//!
//! # Usage
//!
//! ```bash
//! # Describe an image with GPT-4o
//! iris analyze kite.png
//!
//! # A story from Claude, saved as JSON
//! iris analyze kite.png --model claude --type story --output story.json
//!
//! # Ask every provider that has a key
//! iris compare kite.png --prompt "How many kites are there?"
//!
//! # Run the upload form
//! iris serve --port 5000
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Iris - Send an image to hosted vision models and get the analysis back.
#[derive(Parser, Debug)]
#[command(name = "iris")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze an image with one provider
    Analyze(cli::analyze::AnalyzeArgs),

    /// Analyze an image with every configured provider and compare the answers
    Compare(cli::compare::CompareArgs),

    /// Run the web upload form
    Serve(cli::serve::ServeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match iris_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `iris config path`."
            );
            iris_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Iris v{}", iris_core::VERSION);

    match cli.command {
        Commands::Analyze(args) => cli::analyze::execute(args, &config).await,
        Commands::Compare(args) => cli::compare::execute(args, &config).await,
        Commands::Serve(args) => cli::serve::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_type_and_prompt_conflict() {
        let parsed = Cli::try_parse_from(["iris", "analyze", "a.png", "--type", "story", "--prompt", "hi"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_compare_accepts_custom_prompt() {
        let cli = Cli::try_parse_from(["iris", "compare", "a.png", "-p", "Count the kites"]).unwrap();
        match cli.command {
            Commands::Compare(args) => {
                assert_eq!(args.instruction.prompt.as_deref(), Some("Count the kites"));
            }
            other => panic!("Expected compare, got {other:?}"),
        }
    }
}
