//! Inference invoker over the serialized classification model.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::{Session, SessionInputs};
use ort::value::TensorRef;
use tracing::info;

use crate::error::{InferError, StartupError};

/// The opaque model capability: a fixed-shape batch in, one probability
/// vector out. The trait is the seam that lets the request handler run
/// against an injected fake in tests.
pub trait ProbabilityModel: Send + Sync {
    fn infer(&self, batch: &Array4<f32>) -> Result<Vec<f32>, InferError>;
}

/// ONNX Runtime backed classifier, loaded once at startup.
///
/// `Session::run` needs exclusive access, so the session sits behind a
/// `Mutex` and concurrent requests are serialized at this point
/// (single-flight per process).
pub struct OnnxClassifier {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, StartupError> {
        if !path.is_file() {
            return Err(StartupError::ModelMissing(path.to_path_buf()));
        }
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(path)?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .ok_or(StartupError::ModelInterface("model declares no inputs"))?;
        let output_name = session
            .outputs()
            .first()
            .map(|o| o.name().to_string())
            .ok_or(StartupError::ModelInterface("model declares no outputs"))?;

        info!(
            model = %path.display(),
            input = %input_name,
            output = %output_name,
            "model loaded"
        );
        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }
}

impl ProbabilityModel for OnnxClassifier {
    fn infer(&self, batch: &Array4<f32>) -> Result<Vec<f32>, InferError> {
        let dims: Vec<i64> = batch.shape().iter().map(|&d| d as i64).collect();
        let data = batch.as_slice().ok_or(InferError::NonContiguous)?;
        let input = TensorRef::from_array_view((dims, data))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferError::SessionPoisoned)?;
        let outputs = session.run(SessionInputs::ValueMap(
            ort::inputs![self.input_name.as_str() => input],
        ))?;

        let (_, probs) = outputs[self.output_name.as_str()].try_extract_tensor::<f32>()?;
        // Batch size is fixed at 1, so the flattened output is the one row.
        Ok(probs.to_vec())
    }
}
