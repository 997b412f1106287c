use crate::error::{DecodeError, PipelineError};
use crate::pipeline::PipelineOutcome;
use crate::tensor_encoder::PreparedTensor;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum State {
    #[default]
    Idle,
    Preprocessing {
        seq: u64,
    },
    Inferring {
        seq: u64,
    },
    Decided {
        seq: u64,
        outcome: PipelineOutcome,
    },
    Failed {
        seq: u64,
        error: PipelineError,
    },
}

impl State {
    pub fn is_settled(&self) -> bool {
        matches!(self, State::Decided { .. } | State::Failed { .. })
    }
}

/// Session state plus the newest sequence number handed out. Results tagged
/// with anything older are stale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub latest_seq: u64,
    pub state: State,
}

impl Model {
    pub fn outcome(&self) -> Option<PipelineOutcome> {
        match &self.state {
            State::Decided { outcome, .. } => Some(outcome.clone()),
            State::Failed { error, .. } => Some(PipelineOutcome::Failed(error.clone())),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Event {
    ImageSubmitted {
        seq: u64,
        image: Vec<u8>,
    },
    PreprocessDone {
        seq: u64,
        result: Result<PreparedTensor, DecodeError>,
    },
    InferDone {
        seq: u64,
        result: Result<PipelineOutcome, PipelineError>,
    },
}

impl Event {
    pub fn to_display_string(&self) -> String {
        match self {
            Event::ImageSubmitted { seq, image } => {
                format!("ImageSubmitted {{ seq: {}, bytes: {} }}", seq, image.len())
            }
            Event::PreprocessDone { seq, result: Ok(_) } => {
                format!("PreprocessDone {{ seq: {}, result: Ok(..) }}", seq)
            }
            event => format!("{:?}", event),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Preprocess { seq: u64, image: Vec<u8> },
    Infer { seq: u64, tensor: PreparedTensor },
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::Preprocess { seq, image } => {
                format!("Preprocess {{ seq: {}, bytes: {} }}", seq, image.len())
            }
            Effect::Infer { seq, tensor } => {
                format!("Infer {{ seq: {}, shape: {:?} }}", seq, tensor.shape())
            }
        }
    }
}

pub fn init() -> (Model, Vec<Effect>) {
    (Model::default(), vec![])
}

pub fn transition(model: Model, event: Event) -> (Model, Vec<Effect>) {
    let latest_seq = model.latest_seq;

    match (model.state.clone(), event) {
        (_, Event::ImageSubmitted { seq, image }) if seq > latest_seq => (
            Model {
                latest_seq: seq,
                state: State::Preprocessing { seq },
            },
            vec![Effect::Preprocess { seq, image }],
        ),

        (State::Preprocessing { seq }, Event::PreprocessDone { seq: done, result })
            if done == seq && seq == latest_seq =>
        {
            match result {
                Ok(tensor) => (
                    Model {
                        latest_seq,
                        state: State::Inferring { seq },
                    },
                    vec![Effect::Infer { seq, tensor }],
                ),
                Err(error) => (
                    Model {
                        latest_seq,
                        state: State::Failed {
                            seq,
                            error: error.into(),
                        },
                    },
                    vec![],
                ),
            }
        }

        (State::Inferring { seq }, Event::InferDone { seq: done, result })
            if done == seq && seq == latest_seq =>
        {
            let state = match result {
                Ok(PipelineOutcome::Failed(error)) | Err(error) => State::Failed { seq, error },
                Ok(outcome) => State::Decided { seq, outcome },
            };
            (Model { latest_seq, state }, vec![])
        }

        // Stale results and out-of-order submissions
        _ => (model, vec![]),
    }
}
