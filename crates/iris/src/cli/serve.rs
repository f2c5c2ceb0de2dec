//! The `iris serve` command: run the web upload front.

use clap::Args;
use console::Style;
use iris_core::{Analyzer, Config};
use std::sync::Arc;

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, config: &Config) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let analyzer = Arc::new(Analyzer::from_env(&config));
    let configured = analyzer.configured_providers();

    let bold = Style::new().for_stderr().bold();
    eprintln!(
        "{} http://{}:{}",
        bold.apply_to("Iris upload form at"),
        config.server.host,
        config.server.port
    );
    if configured.is_empty() {
        let warn = Style::new().for_stderr().yellow();
        eprintln!(
            "{}",
            warn.apply_to("No API keys found; every analysis will fail until one is set.")
        );
    } else {
        let names: Vec<_> = configured.iter().map(|p| p.id()).collect();
        tracing::info!("Providers with keys: {}", names.join(", "));
    }

    iris_web::run_server(&config, analyzer).await
}
