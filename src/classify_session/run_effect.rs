use crate::classify_session::core::{Effect, Event};
use crate::error::PipelineError;
use crate::library::logger::interface::Logger;
use crate::pipeline::Pipeline;
use std::sync::mpsc::Sender;
use std::sync::Arc;

#[derive(Clone)]
pub struct RunEffect {
    pipeline: Arc<Pipeline>,
    logger: Arc<dyn Logger + Send + Sync>,
    event_sender: Sender<Event>,
}

impl RunEffect {
    pub fn new(
        pipeline: Arc<Pipeline>,
        logger: Arc<dyn Logger + Send + Sync>,
        event_sender: Sender<Event>,
    ) -> Self {
        Self {
            pipeline,
            logger,
            event_sender,
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self
            .logger
            .info(&format!("Running effect: {}", effect.to_display_string()));

        match effect {
            Effect::Preprocess { seq, image } => {
                let result = self.pipeline.preprocess(&image);
                let _ = self
                    .event_sender
                    .send(Event::PreprocessDone { seq, result });
            }
            Effect::Infer { seq, tensor } => {
                let result = self
                    .pipeline
                    .infer(tensor)
                    .map_err(PipelineError::from)
                    .and_then(|scores| {
                        self.pipeline
                            .decide(&scores)
                            .map_err(PipelineError::from)
                    });
                let _ = self.event_sender.send(Event::InferDone { seq, result });
            }
        }
    }
}
