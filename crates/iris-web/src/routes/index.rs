//! Upload page route handler.
//!
//! Serves the embedded upload form, filled in with the live limits and
//! choices.

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use iris_core::{ImageFormat, PromptRegistry};

use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

const MIB: u64 = 1024 * 1024;

/// GET / - Serve the upload form.
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    Html(render(&state))
}

fn render(state: &AppState) -> String {
    let accept = ImageFormat::EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");
    let formats = ImageFormat::ALL
        .iter()
        .map(|f| f.to_string().to_uppercase())
        .collect::<Vec<_>>()
        .join(", ");
    let model_options: String = state
        .analyzer
        .providers()
        .map(|p| {
            format!(
                "            <option value=\"{id}\">{} ({id})</option>\n",
                p.label(),
                id = p.id()
            )
        })
        .collect();
    let analysis_options: String = PromptRegistry::list()
        .map(|(analysis, label)| {
            format!(
                "            <option value=\"{}\">{label}</option>\n",
                analysis.name()
            )
        })
        .collect();

    INDEX_HTML
        .replace("{{accept}}", &accept)
        .replace("{{formats}}", &formats)
        .replace("{{max_size}}", &format_size(state.validator.max_bytes()))
        .replace("{{model_options}}\n", &model_options)
        .replace("{{analysis_options}}\n", &analysis_options)
}

/// Whole megabytes when the limit is at least one, otherwise kilobytes.
fn format_size(bytes: u64) -> String {
    if bytes >= MIB {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{}KB", bytes.div_ceil(1024))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(16 * MIB), "16MB");
        assert_eq!(format_size(1024), "1KB");
        assert_eq!(format_size(1500), "2KB");
    }
}
