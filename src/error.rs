//! Error taxonomy of the classification pipeline.
//!
//! Every error here is `Clone` so a failed run can be kept inside session state
//! and rendered later.

use thiserror::Error;

/// The input bytes could not be turned into a picture. The user should pick a different image.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("unsupported image format: {0}")]
    Unsupported(String),

    #[error("corrupt or truncated image: {0}")]
    Corrupt(String),

    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

impl From<image::ImageError> for DecodeError {
    fn from(error: image::ImageError) -> Self {
        match error {
            image::ImageError::Unsupported(e) => DecodeError::Unsupported(e.to_string()),
            other => DecodeError::Corrupt(other.to_string()),
        }
    }
}

/// Raised once at startup when the model, the labels and the configuration disagree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelConfigError {
    #[error("failed to load model: {0}")]
    Model(String),

    #[error("failed to load labels: {0}")]
    Labels(String),

    #[error("failed to load recipes: {0}")]
    Recipes(String),

    #[error("label list is empty")]
    NoLabels,

    #[error("model input type {declared} does not match expected {expected}")]
    InputType { declared: String, expected: String },

    #[error("model input shape {declared:?} does not match expected {expected:?}")]
    InputShape {
        declared: Vec<usize>,
        expected: Vec<usize>,
    },

    #[error("model output shape {declared:?} does not match {labels} labels")]
    OutputShape { declared: Vec<usize>, labels: usize },
}

/// The classifier failed for this run. Retrying the same image is safe.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("classifier rejected input shape: {0}")]
    Shape(String),

    #[error("classifier failed: {0}")]
    Engine(String),

    #[error("classifier did not answer within {0:?}")]
    Timeout(std::time::Duration),
}

/// The classifier output disagrees with the label list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeMismatchError {
    #[error("score vector has {scores} entries but there are {labels} labels")]
    Length { scores: usize, labels: usize },

    #[error("score vector is empty")]
    Empty,

    #[error("selected index {index} is out of range for {labels} labels")]
    Index { index: usize, labels: usize },

    #[error("score at index {index} is not a finite number")]
    NonFinite { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Decode,
    Inference,
    ShapeMismatch,
}

/// Anything that can abort a single classification run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    ShapeMismatch(#[from] ShapeMismatchError),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Decode(_) => ErrorKind::Decode,
            PipelineError::Inference(_) => ErrorKind::Inference,
            PipelineError::ShapeMismatch(_) => ErrorKind::ShapeMismatch,
        }
    }
}
