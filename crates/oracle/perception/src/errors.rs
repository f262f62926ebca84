use thiserror::Error;

use crate::classifier::FEATURE_COUNT;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PerceptionError {
    /// Image bytes could not be decoded.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Sensor reading does not have exactly [`FEATURE_COUNT`] features.
    #[error("invalid feature vector: expected {FEATURE_COUNT} features, got {0}")]
    InvalidFeatureVector(usize),

    /// The model is not loaded or the model server cannot be reached.
    #[error("inference backend unavailable: {0}")]
    InferenceUnavailable(String),

    /// The backend was reachable but inference failed.
    #[error("inference failed: {0}")]
    Inference(String),

    /// Tensor data length disagrees with its shape.
    #[error("tensor of shape {shape:?} needs {expected} values, got {got}")]
    TensorShape {
        shape: Vec<usize>,
        expected: usize,
        got: usize,
    },

    /// Model output is not laid out as `[1, 4 + classes, anchors]`.
    #[error("unexpected model output shape {0:?}")]
    UnexpectedOutputShape(Vec<usize>),

    /// Real-world data is not the expected JSON document.
    #[error("malformed evidence: {0}")]
    MalformedEvidence(String),

    /// Classifier parameters are missing or not usable.
    #[error("invalid model parameters: {0}")]
    InvalidModelParams(String),
}

pub type PerceptionResult<T> = Result<T, PerceptionError>;
