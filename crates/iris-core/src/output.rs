//! Persisted reports and human-readable rendering.
//!
//! A report is either a single analysis or a comparison, written as pretty
//! JSON with a `kind` tag so it can be read back without guessing.

use crate::error::{VisionError, VisionResult};
use crate::types::{AnalysisResult, ComparisonResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

/// The unit written by [`persist`] and read by [`load_report`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Analysis(AnalysisResult),
    Comparison(ComparisonResult),
}

impl From<AnalysisResult> for Report {
    fn from(result: AnalysisResult) -> Self {
        Self::Analysis(result)
    }
}

impl From<ComparisonResult> for Report {
    fn from(result: ComparisonResult) -> Self {
        Self::Comparison(result)
    }
}

/// Output format options for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Headed plain text
    #[default]
    Text,
    /// Pretty-printed JSON report
    Json,
}

/// Write a report as pretty JSON, creating parent directories as needed.
pub fn persist(report: &Report, path: &Path) -> VisionResult<()> {
    let write_failure = |source: std::io::Error| VisionError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_failure)?;
    }

    let json = serde_json::to_string_pretty(report).map_err(|e| write_failure(e.into()))?;
    std::fs::write(path, json + "\n").map_err(write_failure)?;

    tracing::debug!("Wrote report to {}", path.display());
    Ok(())
}

/// Read a report written by [`persist`].
pub fn load_report(path: &Path) -> VisionResult<Report> {
    let read_failure = |message: String| VisionError::ReadFailure {
        path: path.to_path_buf(),
        message,
    };
    let content = std::fs::read_to_string(path).map_err(|e| read_failure(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| read_failure(e.to_string()))
}

/// Render a report for a terminal.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    match report {
        Report::Analysis(result) => render_result(&mut out, result),
        Report::Comparison(comparison) => {
            let _ = writeln!(
                out,
                "Comparison ({}): {} succeeded, {} failed\n",
                comparison.instruction,
                comparison.succeeded(),
                comparison.failed()
            );
            for result in &comparison.results {
                render_result(&mut out, result);
                out.push('\n');
            }
        }
    }
    out
}

fn render_result(out: &mut String, result: &AnalysisResult) {
    let model = result.model.as_deref().unwrap_or("-");
    let _ = writeln!(
        out,
        "== {} ({}) [{}ms] ==",
        result.provider, model, result.latency_ms
    );
    match (&result.text, &result.error) {
        (Some(text), _) => {
            let _ = writeln!(out, "{text}");
        }
        (None, Some(error)) => {
            let _ = writeln!(out, "error: {}", error.message);
        }
        (None, None) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::Provider;

    fn comparison() -> ComparisonResult {
        let err = VisionError::MissingCredential {
            provider: Provider::Gemini,
            env_var: "GOOGLE_API_KEY",
        };
        ComparisonResult {
            instruction: "story".into(),
            results: vec![
                AnalysisResult::success(
                    Provider::OpenAi,
                    "gpt-4o".into(),
                    "A kite.\n".into(),
                    120,
                    Some(900),
                ),
                AnalysisResult::success(
                    Provider::Anthropic,
                    "claude-sonnet-4-5-20250929".into(),
                    "Once upon a time.".into(),
                    340,
                    None,
                ),
                AnalysisResult::failure(Provider::Gemini, &err, 0),
            ],
        }
    }

    #[test]
    fn test_persist_and_load_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("compare.json");
        let report = Report::from(comparison());

        persist(&report, &path).unwrap();
        let loaded = load_report(&path).unwrap();
        assert_eq!(loaded, report);

        let Report::Comparison(loaded) = loaded else {
            panic!("Expected a comparison report");
        };
        assert_eq!(loaded.results[0].text(), "A kite.\n");
        assert_eq!(
            loaded.results[2].error.as_ref().unwrap().kind,
            ErrorKind::MissingCredential
        );
    }

    #[test]
    fn test_persisted_json_is_field_labeled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.json");
        let result = AnalysisResult::success(
            Provider::Anthropic,
            "claude-sonnet-4-5-20250929".into(),
            "text".into(),
            5,
            None,
        );
        persist(&Report::from(result), &path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["kind"], "analysis");
        assert_eq!(raw["provider"], "claude");
        assert_eq!(raw["text"], "text");
        assert!(raw.get("error").is_none());
    }

    #[test]
    fn test_persist_to_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file cannot act as a parent directory
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let path = blocker.join("report.json");

        let err = persist(&Report::from(comparison()), &path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteFailure);
    }

    #[test]
    fn test_load_missing_report() {
        let err = load_report(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReadFailure);
    }

    #[test]
    fn test_render_text_shows_text_and_errors() {
        let rendered = render_text(&Report::from(comparison()));
        assert!(rendered.contains("2 succeeded, 1 failed"));
        assert!(rendered.contains("== OpenAI (gpt-4o) [120ms] =="));
        assert!(rendered.contains("Once upon a time."));
        assert!(rendered.contains("error: Gemini API key not set"));
    }
}
