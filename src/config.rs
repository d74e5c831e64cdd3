use std::path::PathBuf;

use crate::error::StartupError;

/// Everything the server needs to start, resolved from the CLI.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path to the serialized classification model artifact.
    pub model_path: PathBuf,
    /// Directory whose immediate subdirectory names define the class
    /// taxonomy, in lexicographic order.
    pub class_dir: PathBuf,
    /// In-memory cap for a single uploaded file.
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Reject unusable paths before any socket is bound.
    pub fn validate(&self) -> Result<(), StartupError> {
        if !self.model_path.is_file() {
            return Err(StartupError::ModelMissing(self.model_path.clone()));
        }
        if !self.class_dir.is_dir() {
            return Err(StartupError::ClassDirMissing(self.class_dir.clone()));
        }
        Ok(())
    }
}
