use serde::Serialize;

use crate::error::ResolveError;
use crate::labels::LabelRegistry;

/// The response body for a successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub prediction: String,
    pub confidence: f32,
}

/// Map a probability vector to its arg-max label and confidence.
///
/// Ties are broken by first occurrence: for equal maxima at indices
/// `i < j`, index `i` wins. The confidence is the maximum value itself,
/// reported untouched.
pub fn resolve(probs: &[f32], registry: &LabelRegistry) -> Result<Prediction, ResolveError> {
    if probs.is_empty() {
        return Err(ResolveError::EmptyVector);
    }
    let mut best_idx = 0;
    let mut best = probs[0];
    for (i, &p) in probs.iter().enumerate().skip(1) {
        if p > best {
            best_idx = i;
            best = p;
        }
    }
    let label = registry.label_at(best_idx)?;
    Ok(Prediction {
        prediction: label.to_string(),
        confidence: best,
    })
}
