use crate::error::InferenceError;
use crate::tensor_encoder::PreparedTensor;

/// Raw classifier output, one score per label index.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreVector {
    Quantized {
        values: Vec<u8>,
        /// `(zero_point, scale)` when the model declares them.
        params: Option<(i32, f32)>,
    },
    Float(Vec<f32>),
}

impl ScoreVector {
    pub fn quantized(values: Vec<u8>) -> Self {
        ScoreVector::Quantized {
            values,
            params: None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ScoreVector::Quantized { values, .. } => values.len(),
            ScoreVector::Float(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tensor shapes as the loaded model declares them.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelShape {
    pub input: Vec<usize>,
    pub output: Vec<usize>,
}

pub trait ImageClassifier {
    fn declared_shape(&self) -> ModelShape;
    fn run(&self, tensor: &PreparedTensor) -> Result<ScoreVector, InferenceError>;
}
