//! Application state.

use iris_core::{Analyzer, Validator};
use std::path::PathBuf;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub validator: Validator,
    pub upload_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(analyzer: Arc<Analyzer>, validator: Validator, upload_dir: PathBuf) -> Self {
        Self {
            analyzer,
            validator,
            upload_dir: Arc::new(upload_dir),
        }
    }
}
