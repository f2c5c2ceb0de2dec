//! Iris Core - vision model orchestration library.
//!
//! Iris sends one image plus an instruction to hosted vision-language
//! models (OpenAI, Anthropic, Google Gemini) and returns the generated text.
//! It can also ask every configured provider at once and collect the
//! answers side by side.
//!
//! # Architecture
//!
//! ```text
//! Image → Validate → Instruction → Provider adapter(s) → AnalysisResult / ComparisonResult → JSON
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use iris_core::{AnalysisType, Analyzer, Config, Provider, Validator};
//!
//! #[tokio::main]
//! async fn main() -> iris_core::Result<()> {
//!     let config = Config::load()?;
//!     let analyzer = Analyzer::from_env(&config);
//!
//!     let image = Validator::new(&config.limits).load("./kite.png".as_ref()).await?;
//!     let result = analyzer
//!         .analyze_with(Provider::Anthropic, &image, &AnalysisType::Story.into())
//!         .await?;
//!     println!("{}", result.text());
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod config;
pub mod credentials;
pub mod error;
pub mod image;
pub mod llm;
pub mod output;
pub mod prompts;
pub mod types;
pub mod validate;

pub use analyzer::{Analyzer, AnalyzerOptions};
pub use config::Config;
pub use credentials::Credentials;
pub use error::{ConfigError, ErrorKind, IrisError, Result, VisionError, VisionResult};
pub use image::{ImageFormat, ImagePayload};
pub use llm::{ProviderFactory, VisionProvider};
pub use output::{load_report, persist, render_text, OutputFormat, Report};
pub use prompts::{AnalysisType, Instruction, PromptRegistry};
pub use types::{AnalysisFailure, AnalysisResult, ComparisonResult, Provider};
pub use validate::Validator;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
