//! The `iris analyze` command: one image, one provider.

use clap::Args;
use iris_core::{Analyzer, Config, Provider, Report, Validator};
use std::path::PathBuf;

use super::types::{FormatChoice, ModelChoice};
use super::InstructionArgs;

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Image file (png, jpg, jpeg, gif, webp)
    pub image: PathBuf,

    /// Provider to ask
    #[arg(short, long, value_enum, default_value_t = ModelChoice::Gpt4o)]
    pub model: ModelChoice,

    #[command(flatten)]
    pub instruction: InstructionArgs,

    /// Output format on stdout
    #[arg(short, long, value_enum, default_value_t = FormatChoice::Text)]
    pub format: FormatChoice,

    /// Also write the result as a JSON report
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the analyze command.
pub async fn execute(args: AnalyzeArgs, config: &Config) -> anyhow::Result<()> {
    let image = Validator::new(&config.limits).load(&args.image).await?;
    let instruction = args.instruction.instruction();
    let provider = Provider::from(args.model);
    let analyzer = Analyzer::from_env(config);

    let pb = super::spinner(format!(
        "Asking {provider} ({})...",
        instruction.label()
    ));
    let outcome = analyzer.analyze_with(provider, &image, &instruction).await;
    pb.finish_and_clear();
    let result = outcome?;

    super::emit(
        &analyzer,
        &Report::from(result),
        args.format.into(),
        args.output.as_deref(),
    )
}
