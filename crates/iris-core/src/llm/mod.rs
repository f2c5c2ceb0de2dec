//! Vision provider adapters.
//!
//! One adapter per hosted API (OpenAI, Anthropic, Gemini) behind the
//! [`VisionProvider`] trait, plus the factory that wires them from config.

pub(crate) mod anthropic;
pub(crate) mod gemini;
pub(crate) mod openai;
pub(crate) mod provider;

pub use provider::{ImageInput, ProviderFactory, ProviderReply, VisionProvider, VisionRequest};
