use crate::error::InferenceError;
use crate::image_classifier::interface::{ImageClassifier, ModelShape, ScoreVector};
use crate::library::logger::interface::Logger;
use crate::tensor_encoder::PreparedTensor;
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum FakeScores {
    Fixed(ScoreVector),
    Random,
    Fail(InferenceError),
}

#[derive(Debug, Clone)]
struct FakeResponse {
    first_byte: u8,
    delay: Duration,
    scores: FakeScores,
}

/// Stand-in classifier. Responses are picked by the first byte of the input
/// tensor so tests can tell images apart.
pub struct ImageClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    shape: ModelShape,
    responses: Vec<FakeResponse>,
    fallback: FakeScores,
    calls: AtomicUsize,
}

impl ImageClassifierFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, input_size: u32, label_count: usize) -> Self {
        let side = input_size as usize;
        Self {
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
            shape: ModelShape {
                input: vec![1, side, side, 3],
                output: vec![1, label_count],
            },
            responses: vec![],
            fallback: FakeScores::Random,
            calls: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn with_scores(mut self, scores: FakeScores) -> Self {
        self.fallback = scores;
        self
    }

    #[allow(dead_code)]
    pub fn with_response(mut self, first_byte: u8, delay: Duration, scores: FakeScores) -> Self {
        self.responses.push(FakeResponse {
            first_byte,
            delay,
            scores,
        });
        self
    }

    #[allow(dead_code)]
    pub fn with_shape(mut self, shape: ModelShape) -> Self {
        self.shape = shape;
        self
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn random_scores(&self) -> Result<ScoreVector, InferenceError> {
        let label_count = self.shape.output.last().copied().unwrap_or(0);
        let mut rng = rand::rng();
        let score_dist = Uniform::new_inclusive(0u8, 255u8)
            .map_err(|e| InferenceError::Engine(e.to_string()))?;

        let values = (0..label_count)
            .map(|_| score_dist.sample(&mut rng))
            .collect();

        Ok(ScoreVector::quantized(values))
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn declared_shape(&self) -> ModelShape {
        self.shape.clone()
    }

    fn run(&self, tensor: &PreparedTensor) -> Result<ScoreVector, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let first_byte = tensor.as_bytes().first().copied();
        let response = self
            .responses
            .iter()
            .find(|r| Some(r.first_byte) == first_byte);

        let scores = match response {
            Some(response) => {
                let _ = self.logger.info(&format!(
                    "Scripted response for first byte {} after {:?}",
                    response.first_byte, response.delay
                ));
                std::thread::sleep(response.delay);
                &response.scores
            }
            None => &self.fallback,
        };

        match scores {
            FakeScores::Fixed(scores) => Ok(scores.clone()),
            FakeScores::Random => self.random_scores(),
            FakeScores::Fail(error) => Err(error.clone()),
        }
    }
}
