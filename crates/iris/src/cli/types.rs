//! CLI enum types: provider choice, analysis type, output format.

use clap::ValueEnum;
use iris_core::{AnalysisType, OutputFormat, Provider};

/// Supported vision providers.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum ModelChoice {
    /// OpenAI GPT-4o
    #[default]
    #[value(name = "gpt4o", alias = "openai")]
    Gpt4o,
    /// Anthropic Claude
    #[value(name = "claude", alias = "anthropic")]
    Claude,
    /// Google Gemini
    #[value(name = "gemini", alias = "google")]
    Gemini,
}

impl From<ModelChoice> for Provider {
    fn from(choice: ModelChoice) -> Self {
        match choice {
            ModelChoice::Gpt4o => Provider::OpenAi,
            ModelChoice::Claude => Provider::Anthropic,
            ModelChoice::Gemini => Provider::Gemini,
        }
    }
}

/// Canned analysis instructions.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AnalysisChoice {
    /// Comprehensive description of subjects, setting and style
    Detailed,
    /// A short story inspired by the image
    Story,
    /// Photography technique and composition
    Technical,
    /// Artistic style, symbolism and interpretation
    Creative,
}

impl From<AnalysisChoice> for AnalysisType {
    fn from(choice: AnalysisChoice) -> Self {
        match choice {
            AnalysisChoice::Detailed => AnalysisType::Detailed,
            AnalysisChoice::Story => AnalysisType::Story,
            AnalysisChoice::Technical => AnalysisType::Technical,
            AnalysisChoice::Creative => AnalysisType::Creative,
        }
    }
}

/// How results are printed to stdout.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum FormatChoice {
    /// Headed plain text
    #[default]
    Text,
    /// Pretty-printed JSON report
    Json,
}

impl From<FormatChoice> for OutputFormat {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Text => OutputFormat::Text,
            FormatChoice::Json => OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_choice_maps_every_provider() {
        let providers: Vec<Provider> = ModelChoice::value_variants()
            .iter()
            .map(|c| (*c).into())
            .collect();
        assert_eq!(providers, Provider::ALL.to_vec());
    }

    #[test]
    fn test_model_choice_aliases() {
        let choice = ModelChoice::from_str("anthropic", true).unwrap();
        assert!(matches!(choice, ModelChoice::Claude));
        let choice = ModelChoice::from_str("gpt4o", true).unwrap();
        assert!(matches!(choice, ModelChoice::Gpt4o));
    }

    #[test]
    fn test_analysis_choice_names_match_registry() {
        for choice in AnalysisChoice::value_variants() {
            let name = choice.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(AnalysisType::from(*choice).name(), name);
        }
    }
}
