use crate::classify_session::core::{Model, State};
use crate::error::{ErrorKind, PipelineError};
use crate::outcome_display::interface::OutcomeDisplay;
use crate::pipeline::PipelineOutcome;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct Render {
    outcome_display: Arc<Mutex<dyn OutcomeDisplay + Send + Sync>>,
}

impl Render {
    pub fn new(outcome_display: Arc<Mutex<dyn OutcomeDisplay + Send + Sync>>) -> Self {
        Self { outcome_display }
    }

    pub fn render(&self, model: &Model) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut outcome_display = self.outcome_display.lock().map_err(|e| e.to_string())?;

        outcome_display.clear()?;

        let lines = to_lines(&model.state);
        for (index, line) in lines.iter().take(outcome_display.num_lines()).enumerate() {
            outcome_display.write_line(index, line)?;
        }

        outcome_display.flush()?;

        Ok(())
    }
}

pub fn to_lines(state: &State) -> Vec<String> {
    match state {
        State::Idle => vec!["Pick a photo of an ingredient".to_string()],
        State::Preprocessing { .. } => vec!["Preparing image...".to_string()],
        State::Inferring { .. } => vec!["Identifying ingredient...".to_string()],
        State::Decided { outcome, .. } => match outcome {
            PipelineOutcome::Matched { result, recipes } => {
                let mut lines = vec![format!(
                    "{} ({:.0}%)",
                    result.name,
                    result.confidence * 100.0
                )];
                if recipes.is_empty() {
                    lines.push("No recipes known for this ingredient".to_string());
                } else {
                    lines.extend(recipes.iter().map(|recipe| format!("- {}", recipe)));
                }
                lines
            }
            PipelineOutcome::LowConfidence {
                best_label,
                confidence,
            } => vec![
                "No confident match".to_string(),
                format!("Best guess: {} ({:.0}%)", best_label, confidence * 100.0),
            ],
            PipelineOutcome::Failed(error) => failure_lines(error),
        },
        State::Failed { error, .. } => failure_lines(error),
    }
}

fn failure_lines(error: &PipelineError) -> Vec<String> {
    let headline = match error.kind() {
        ErrorKind::Decode => "Could not read image, pick a different one",
        ErrorKind::Inference => "Classifier failed, try again",
        ErrorKind::ShapeMismatch => "Internal error",
    };
    vec![headline.to_string(), error.to_string()]
}
