use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: PathBuf,
    pub input_size: u32,
}
