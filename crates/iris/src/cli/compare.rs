//! The `iris compare` command: one image, every configured provider.

use clap::Args;
use console::Style;
use iris_core::{Analyzer, Config, Report, Validator};
use std::path::PathBuf;

use super::types::FormatChoice;
use super::InstructionArgs;

/// Arguments for the `compare` command.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Image file (png, jpg, jpeg, gif, webp)
    pub image: PathBuf,

    #[command(flatten)]
    pub instruction: InstructionArgs,

    /// Output format on stdout
    #[arg(short, long, value_enum, default_value_t = FormatChoice::Text)]
    pub format: FormatChoice,

    /// Also write the comparison as a JSON report
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the compare command.
pub async fn execute(args: CompareArgs, config: &Config) -> anyhow::Result<()> {
    let image = Validator::new(&config.limits).load(&args.image).await?;
    let instruction = args.instruction.instruction();
    let analyzer = Analyzer::from_env(config);

    let configured = analyzer.configured_providers();
    if configured.is_empty() {
        let warn = Style::new().for_stderr().yellow();
        eprintln!(
            "{}",
            warn.apply_to(
                "No API keys found. Set OPENAI_API_KEY, ANTHROPIC_API_KEY or GOOGLE_API_KEY, \
                 or run `iris config set-key`."
            )
        );
        anyhow::bail!("No configured providers to compare");
    }

    let names: Vec<_> = configured.iter().map(|p| p.id()).collect();
    let pb = super::spinner(format!(
        "Asking {} ({})...",
        names.join(", "),
        instruction.label()
    ));
    let outcome = analyzer.compare_all(&image, &instruction).await;
    pb.finish_and_clear();
    let comparison = outcome?;

    super::emit(
        &analyzer,
        &Report::from(comparison),
        args.format.into(),
        args.output.as_deref(),
    )
}
