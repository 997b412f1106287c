use crate::error::{InferenceError, ModelConfigError};
use crate::image_classifier::interface::{ImageClassifier, ModelShape, ScoreVector};
use crate::library::logger::interface::Logger;
use crate::tensor_encoder::PreparedTensor;
use std::sync::Arc;
use tract_onnx::prelude::*;

use super::model_config::ModelConfig;

pub struct ImageClassifierTractOnnx {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    shape: ModelShape,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierTractOnnx {
    /// Loads and optimizes the model with its input pinned to `u8 [1, S, S, 3]`.
    pub fn new(
        config: ModelConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, ModelConfigError> {
        let logger = logger
            .with_namespace("image_classifier")
            .with_namespace("tract_onnx");
        let side = config.input_size as usize;

        let _ = logger.info(&format!(
            "Loading model {}",
            config.onnx_model_path.display()
        ));

        let model = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)
            .map_err(|e| ModelConfigError::Model(e.to_string()))?;

        let model = if check_declared_input(declared_input(&model), side)? {
            let _ = logger.info(&format!("Pinning open input to u8 [1, {side}, {side}, 3]"));
            model
                .with_input_fact(0, u8::fact([1, side, side, 3]).into())
                .map_err(|e| ModelConfigError::Model(e.to_string()))?
        } else {
            model
        };

        let optimized = model
            .into_optimized()
            .map_err(|e| ModelConfigError::Model(e.to_string()))?;

        let shape = declared_shape(&optimized)?;

        let model = optimized
            .into_runnable()
            .map_err(|e| ModelConfigError::Model(e.to_string()))?;

        let _ = logger.info(&format!(
            "Model ready: input {:?}, output {:?}",
            shape.input, shape.output
        ));

        Ok(Self {
            model,
            shape,
            logger,
        })
    }
}

/// Input datum type and dims as written in the model file, when fully known.
fn declared_input(model: &InferenceModel) -> Option<(DatumType, Option<Vec<usize>>)> {
    let fact = model.input_fact(0).ok()?.to_typed_fact().ok()?;
    Some((
        fact.datum_type,
        fact.shape.as_concrete().map(|dims| dims.to_vec()),
    ))
}

/// Rejects a declared input that is not `u8 [1,S,S,3]`. Returns whether the
/// input is still open and has to be pinned.
fn check_declared_input(
    declared: Option<(DatumType, Option<Vec<usize>>)>,
    side: usize,
) -> Result<bool, ModelConfigError> {
    let Some((datum_type, dims)) = declared else {
        return Ok(true);
    };

    if datum_type.unquantized() != DatumType::U8 {
        return Err(ModelConfigError::InputType {
            declared: format!("{:?}", datum_type),
            expected: format!("{:?}", DatumType::U8),
        });
    }

    let expected = vec![1, side, side, 3];
    match dims {
        None => Ok(true),
        Some(dims) if dims == expected => Ok(false),
        Some(dims) => Err(ModelConfigError::InputShape {
            declared: dims,
            expected,
        }),
    }
}

fn declared_shape(model: &TypedModel) -> Result<ModelShape, ModelConfigError> {
    Ok(ModelShape {
        input: concrete_dims(model.input_fact(0), "input")?,
        output: concrete_dims(model.output_fact(0), "output")?,
    })
}

fn concrete_dims(
    fact: TractResult<&TypedFact>,
    which: &str,
) -> Result<Vec<usize>, ModelConfigError> {
    fact.map_err(|e| ModelConfigError::Model(e.to_string()))?
        .shape
        .as_concrete()
        .map(|dims| dims.to_vec())
        .ok_or_else(|| ModelConfigError::Model(format!("{} shape is not concrete", which)))
}

fn to_score_vector(output: &Tensor) -> Result<ScoreVector, InferenceError> {
    let datum_type = output.datum_type();

    if datum_type.unquantized() == DatumType::U8 {
        let values = output
            .as_slice::<u8>()
            .map_err(|e| InferenceError::Engine(e.to_string()))?
            .to_vec();
        let params = datum_type.qparams().map(|q| q.zp_scale());
        return Ok(ScoreVector::Quantized { values, params });
    }

    let values = output
        .cast_to::<f32>()
        .map_err(|e| InferenceError::Engine(e.to_string()))?
        .as_slice::<f32>()
        .map_err(|e| InferenceError::Engine(e.to_string()))?
        .to_vec();

    Ok(ScoreVector::Float(values))
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn declared_shape(&self) -> ModelShape {
        self.shape.clone()
    }

    fn run(&self, tensor: &PreparedTensor) -> Result<ScoreVector, InferenceError> {
        let [batch, height, width, channels] = tensor.shape();

        let input = tract_ndarray::Array4::from_shape_vec(
            (batch, height, width, channels),
            tensor.as_bytes().to_vec(),
        )
        .map_err(|e| InferenceError::Shape(e.to_string()))?
        .into_tensor();

        let outputs = self
            .model
            .run(tvec!(input.into_tvalue()))
            .map_err(|e| InferenceError::Engine(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::Engine("model produced no outputs".to_string()))?;

        let scores = to_score_vector(output)?;

        let _ = self
            .logger
            .info(&format!("Inference produced {} scores", scores.len()));

        Ok(scores)
    }
}
