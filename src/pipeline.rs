use crate::confidence_gate::gate;
use crate::config::Config;
use crate::error::{
    DecodeError, InferenceError, ModelConfigError, PipelineError, ShapeMismatchError,
};
use crate::image_classifier::interface::{ImageClassifier, ScoreVector};
use crate::image_codec;
use crate::label::{canonicalize, Labels};
use crate::library::logger::interface::Logger;
use crate::output_decoder;
use crate::recipe_lookup::interface::RecipeLookup;
use crate::tensor_encoder::{encode, PreparedTensor};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;


#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub name: String,
    pub confidence: f32,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Matched {
        result: ClassificationResult,
        recipes: Vec<String>,
    },
    /// Not an error: the classifier ran but its best guess is under the threshold.
    LowConfidence { best_label: String, confidence: f32 },
    Failed(PipelineError),
}

/// Image bytes in, ingredient and recipes out.
///
/// Labels, classifier and recipes are shared read-only, so one pipeline can
/// serve concurrent runs without locking.
pub struct Pipeline {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    classifier: Arc<dyn ImageClassifier + Send + Sync>,
    labels: Arc<Labels>,
    recipes: Arc<dyn RecipeLookup + Send + Sync>,
}

impl Pipeline {
    /// Checks once that the model fits the encoder and the label list.
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        classifier: Arc<dyn ImageClassifier + Send + Sync>,
        labels: Arc<Labels>,
        recipes: Arc<dyn RecipeLookup + Send + Sync>,
    ) -> Result<Self, ModelConfigError> {
        let logger = logger.with_namespace("pipeline");

        if labels.is_empty() {
            return Err(ModelConfigError::NoLabels);
        }

        let shape = classifier.declared_shape();
        let side = config.input_size as usize;
        let expected_input = vec![1, side, side, 3];

        if shape.input != expected_input {
            return Err(ModelConfigError::InputShape {
                declared: shape.input,
                expected: expected_input,
            });
        }

        let output_matches = match shape.output.as_slice() {
            [1, len] | [len] => *len == labels.len(),
            _ => false,
        };

        if !output_matches {
            return Err(ModelConfigError::OutputShape {
                declared: shape.output,
                labels: labels.len(),
            });
        }

        let _ = logger.info(&format!(
            "Ready: {}x{} input, {} labels, threshold {}",
            side,
            side,
            labels.len(),
            config.min_confidence
        ));

        Ok(Self {
            config,
            logger,
            classifier,
            labels,
            recipes,
        })
    }

    pub fn preprocess(&self, bytes: &[u8]) -> Result<PreparedTensor, DecodeError> {
        let resized = image_codec::prepare(bytes, self.config.input_size)?;
        Ok(encode(&resized, self.config.input_size))
    }

    /// Runs the classifier, bounded by `Config::classify_timeout` when set.
    pub fn infer(&self, tensor: PreparedTensor) -> Result<ScoreVector, InferenceError> {
        let Some(timeout) = self.config.classify_timeout else {
            return self.classifier.run(&tensor);
        };

        let classifier = Arc::clone(&self.classifier);
        let (result_sender, result_receiver) = channel();

        std::thread::spawn(move || {
            let _ = result_sender.send(classifier.run(&tensor));
        });

        match result_receiver.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(InferenceError::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(InferenceError::Engine(
                "classifier worker exited without a result".to_string(),
            )),
        }
    }

    pub fn decide(&self, scores: &ScoreVector) -> Result<PipelineOutcome, ShapeMismatchError> {
        let decoded = output_decoder::decode(scores, self.labels.len(), self.config.dequantization)
            .inspect_err(|e| {
                let _ = self.logger.error(&format!("Classifier output rejected: {}", e));
            })?;

        let label = self.labels.get(decoded.index).ok_or_else(|| {
            let error = ShapeMismatchError::Index {
                index: decoded.index,
                labels: self.labels.len(),
            };
            let _ = self.logger.error(&format!("Classifier output rejected: {}", error));
            error
        })?;

        if !gate(decoded.probability, self.config.min_confidence) {
            return Ok(PipelineOutcome::LowConfidence {
                best_label: canonicalize(&label.raw),
                confidence: decoded.probability,
            });
        }

        let name = canonicalize(&label.raw);
        let recipes = self.recipes.lookup(&name);

        Ok(PipelineOutcome::Matched {
            result: ClassificationResult {
                name,
                confidence: decoded.probability,
                matched: true,
            },
            recipes,
        })
    }

    /// One-shot run of every stage. The session runs the stages separately.
    #[allow(dead_code)]
    pub fn classify(&self, bytes: &[u8]) -> PipelineOutcome {
        let outcome = self
            .try_classify(bytes)
            .unwrap_or_else(PipelineOutcome::Failed);

        let _ = self.logger.info(&format!("Outcome: {}", describe(&outcome)));

        outcome
    }

    fn try_classify(&self, bytes: &[u8]) -> Result<PipelineOutcome, PipelineError> {
        let tensor = self.preprocess(bytes)?;
        let scores = self.infer(tensor)?;
        Ok(self.decide(&scores)?)
    }
}

pub fn describe(outcome: &PipelineOutcome) -> String {
    match outcome {
        PipelineOutcome::Matched { result, recipes } => format!(
            "{} ({:.1}%), {} recipes",
            result.name,
            result.confidence * 100.0,
            recipes.len()
        ),
        PipelineOutcome::LowConfidence {
            best_label,
            confidence,
        } => format!(
            "no confident match (best guess {} at {:.1}%)",
            best_label,
            confidence * 100.0
        ),
        PipelineOutcome::Failed(error) => format!("failed ({:?}): {}", error.kind(), error),
    }
}
