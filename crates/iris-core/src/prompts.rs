//! Canned analysis prompts and the instruction sent with each image.

use crate::error::{VisionError, VisionResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named canned instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Detailed,
    Story,
    Technical,
    Creative,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 4] = [
        AnalysisType::Detailed,
        AnalysisType::Story,
        AnalysisType::Technical,
        AnalysisType::Creative,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Detailed => "detailed",
            Self::Story => "story",
            Self::Technical => "technical",
            Self::Creative => "creative",
        }
    }

    /// Label shown in the upload form and CLI help.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Detailed => "Detailed Analysis",
            Self::Story => "Generate Story",
            Self::Technical => "Technical Analysis",
            Self::Creative => "Creative Analysis",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnalysisType {
    type Err = VisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| VisionError::UnknownAnalysisType(s.to_string()))
    }
}

const DETAILED: &str = "Analyze this image in comprehensive detail:
1. Main subjects, objects, and people
2. Scene setting and environment
3. Colors, lighting, shadows, and composition
4. Mood, atmosphere, and emotions conveyed
5. Any visible text or signs
6. Quality, style, and artistic elements
7. Context and possible purpose
8. Notable or unique details";

const STORY: &str = "Create a rich, engaging story based on this image:
- Describe what's happening right now
- Imagine the backstory and context
- Develop the characters or subjects
- Explore emotions and relationships
- Predict what might happen next
- Make it vivid and compelling!";

const TECHNICAL: &str = "Provide expert technical analysis:
- Composition techniques (rule of thirds, leading lines, etc.)
- Lighting setup and quality (natural/artificial, direction, softness)
- Color grading and palette
- Depth of field and focus points
- Camera settings estimation (aperture, shutter, ISO if applicable)
- Post-processing techniques visible
- Image quality and resolution
- Professional photography principles applied";

const CREATIVE: &str = "Deep creative analysis:
- Artistic style and influences
- Symbolism and metaphors
- Cultural or historical context
- Emotional and psychological impact
- Narrative and storytelling elements
- Potential interpretations
- How it relates to art movements or genres";

/// Fixed lookup table from analysis type to instruction text.
pub struct PromptRegistry;

impl PromptRegistry {
    /// Instruction text for a known analysis type.
    pub fn template(analysis: AnalysisType) -> &'static str {
        match analysis {
            AnalysisType::Detailed => DETAILED,
            AnalysisType::Story => STORY,
            AnalysisType::Technical => TECHNICAL,
            AnalysisType::Creative => CREATIVE,
        }
    }

    /// Resolve an analysis-type name to its instruction text.
    pub fn resolve(name: &str) -> VisionResult<&'static str> {
        name.parse::<AnalysisType>().map(Self::template)
    }

    /// All analysis types with their labels, in display order.
    pub fn list() -> impl Iterator<Item = (AnalysisType, &'static str)> {
        AnalysisType::ALL.into_iter().map(|t| (t, t.label()))
    }
}

/// What to ask the model: a canned template or a caller-supplied prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Template(AnalysisType),
    Custom(String),
}

impl Instruction {
    /// Build from form or CLI selections.
    ///
    /// A non-blank custom prompt takes precedence; otherwise the analysis
    /// type is looked up, defaulting to `detailed` when none was given.
    pub fn from_selection(
        analysis_type: Option<&str>,
        custom_prompt: Option<&str>,
    ) -> VisionResult<Self> {
        if let Some(prompt) = custom_prompt.filter(|p| !p.trim().is_empty()) {
            return Ok(Self::Custom(prompt.to_string()));
        }
        match analysis_type.map(str::trim).filter(|t| !t.is_empty()) {
            Some(name) => Ok(Self::Template(name.parse()?)),
            None => Ok(Self::Template(AnalysisType::Detailed)),
        }
    }

    /// The text sent to the provider.
    pub fn resolve(&self) -> VisionResult<&str> {
        match self {
            Self::Template(analysis) => Ok(PromptRegistry::template(*analysis)),
            Self::Custom(prompt) if prompt.trim().is_empty() => Err(VisionError::EmptyPrompt),
            Self::Custom(prompt) => Ok(prompt),
        }
    }

    /// Short label for reports: the analysis type name or `custom`.
    pub fn label(&self) -> &str {
        match self {
            Self::Template(analysis) => analysis.name(),
            Self::Custom(_) => "custom",
        }
    }
}

impl Default for Instruction {
    fn default() -> Self {
        Self::Template(AnalysisType::Detailed)
    }
}

impl From<AnalysisType> for Instruction {
    fn from(analysis: AnalysisType) -> Self {
        Self::Template(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_resolve_known_types() {
        for analysis in AnalysisType::ALL {
            let prompt = PromptRegistry::resolve(analysis.name()).unwrap();
            assert!(!prompt.is_empty());
        }
        assert!(PromptRegistry::resolve("story").unwrap().contains("story"));
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(
            PromptRegistry::resolve("Technical").unwrap(),
            PromptRegistry::template(AnalysisType::Technical)
        );
    }

    #[test]
    fn test_resolve_unknown_type() {
        let err = PromptRegistry::resolve("bogus").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownAnalysisType);
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_list_has_every_type() {
        let names: Vec<_> = PromptRegistry::list().map(|(t, _)| t.name()).collect();
        assert_eq!(names, vec!["detailed", "story", "technical", "creative"]);
    }

    #[test]
    fn test_custom_prompt_wins_and_is_verbatim() {
        let instruction =
            Instruction::from_selection(Some("story"), Some("  Count the cats.  ")).unwrap();
        assert_eq!(instruction.resolve().unwrap(), "  Count the cats.  ");
        assert_eq!(instruction.label(), "custom");
    }

    #[test]
    fn test_blank_custom_prompt_falls_back_to_type() {
        let instruction = Instruction::from_selection(Some("creative"), Some("   ")).unwrap();
        assert_eq!(instruction, Instruction::Template(AnalysisType::Creative));
    }

    #[test]
    fn test_default_selection_is_detailed() {
        let instruction = Instruction::from_selection(None, None).unwrap();
        assert_eq!(instruction, Instruction::Template(AnalysisType::Detailed));
    }

    #[test]
    fn test_unknown_selection_fails() {
        let err = Instruction::from_selection(Some("bogus"), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownAnalysisType);
    }

    #[test]
    fn test_empty_custom_instruction_rejected() {
        let err = Instruction::Custom(String::new()).resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyPrompt);
    }
}
