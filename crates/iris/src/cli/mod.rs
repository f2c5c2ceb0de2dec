//! Command implementations and the helpers they share.

pub mod analyze;
pub mod compare;
pub mod config;
pub mod serve;
pub mod types;

use clap::Args;
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use iris_core::{AnalysisType, Instruction, OutputFormat, Report};
use std::path::Path;
use std::time::Duration;

use types::AnalysisChoice;

/// Instruction selection shared by `analyze` and `compare`.
#[derive(Args, Debug)]
pub struct InstructionArgs {
    /// Canned analysis type
    #[arg(short = 't', long = "type", value_enum, conflicts_with = "prompt")]
    pub analysis_type: Option<AnalysisChoice>,

    /// Custom instruction sent verbatim instead of a canned type
    #[arg(short, long)]
    pub prompt: Option<String>,
}

impl InstructionArgs {
    pub fn instruction(&self) -> Instruction {
        match (&self.prompt, self.analysis_type) {
            (Some(prompt), _) => Instruction::Custom(prompt.clone()),
            (None, Some(choice)) => Instruction::Template(AnalysisType::from(choice)),
            (None, None) => Instruction::default(),
        }
    }
}

/// Spinner on stderr while providers are working.
pub fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print a report to stdout and optionally persist it.
pub fn emit(
    analyzer: &iris_core::Analyzer,
    report: &Report,
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", iris_core::render_text(report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }

    if let Some(path) = output {
        analyzer.persist(report, path)?;
        let dim = Style::new().for_stderr().dim();
        eprintln!("{}", dim.apply_to(format!("Saved to {}", path.display())));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_wins_over_default() {
        let args = InstructionArgs {
            analysis_type: None,
            prompt: Some("Count the birds".into()),
        };
        assert_eq!(
            args.instruction(),
            Instruction::Custom("Count the birds".into())
        );
    }

    #[test]
    fn test_default_instruction_is_detailed() {
        let args = InstructionArgs {
            analysis_type: None,
            prompt: None,
        };
        assert_eq!(
            args.instruction(),
            Instruction::Template(AnalysisType::Detailed)
        );
    }

    #[test]
    fn test_type_selects_template() {
        let args = InstructionArgs {
            analysis_type: Some(AnalysisChoice::Story),
            prompt: None,
        };
        assert_eq!(args.instruction(), Instruction::Template(AnalysisType::Story));
    }
}
