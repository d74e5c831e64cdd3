use std::sync::Arc;

use tracing::info;

use crate::config::ServerConfig;
use crate::error::StartupError;
use crate::labels::LabelRegistry;
use crate::model::{OnnxClassifier, ProbabilityModel};

/// Process-wide, read-only state shared by every request.
///
/// Built once during startup and injected into handlers through
/// `web::Data`; nothing in here is mutated after construction.
pub struct AppState {
    pub labels: LabelRegistry,
    pub model: Arc<dyn ProbabilityModel>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Result<Self, StartupError> {
        let labels = LabelRegistry::from_dir(&config.class_dir)?;
        let model = OnnxClassifier::load(&config.model_path)?;
        info!(
            classes = labels.len(),
            labels = ?labels.labels(),
            "label registry built"
        );
        Ok(Self {
            labels,
            model: Arc::new(model),
            max_upload_bytes: config.max_upload_bytes,
        })
    }

    /// Assemble state around an injected model implementation.
    pub fn with_model(
        labels: LabelRegistry,
        model: Arc<dyn ProbabilityModel>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            labels,
            model,
            max_upload_bytes,
        }
    }
}
