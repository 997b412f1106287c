use chrono::Offset;
use std::path::PathBuf;
use std::time::Duration;

/// How quantized classifier scores are turned into real-valued scores before softmax.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dequantization {
    /// `q / 255.0`, regardless of what the model declares.
    Linear255,
    /// `(q - zero_point) * scale` when the model declares them, otherwise `q / 255.0`.
    ModelParams,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayKind {
    Console,
    Gui,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input_size: u32,
    pub min_confidence: f32,
    pub classify_timeout: Option<Duration>,
    pub dequantization: Dequantization,
    pub fake_classifier: bool,
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    pub recipes_path: Option<PathBuf>,
    pub display: DisplayKind,
    pub settle_timeout: Duration,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_size: 224,
            min_confidence: 0.10,
            classify_timeout: Some(Duration::from_secs(30)),
            dequantization: Dequantization::Linear255,
            fake_classifier: false,
            model_path: PathBuf::from("model.onnx"),
            labels_path: PathBuf::from("labels.txt"),
            recipes_path: None,
            display: DisplayKind::Console,
            settle_timeout: Duration::from_secs(60),
            logger_timezone: utc(),
        }
    }
}

fn utc() -> chrono::FixedOffset {
    chrono::Utc.fix()
}
