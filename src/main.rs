use classify_session::main::ClassifySession;
use config::{Config, Dequantization, DisplayKind};
use image_classifier::impl_fake::ImageClassifierFake;
use image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;
use image_classifier::interface::ImageClassifier;
use image_classifier::model_config::ModelConfig;
use label::Labels;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use outcome_display::impl_console::OutcomeDisplayConsole;
use outcome_display::impl_gui::OutcomeDisplayGui;
use outcome_display::interface::OutcomeDisplay;
use pipeline::{describe, Pipeline};
use recipe_lookup::impl_static::RecipeLookupStatic;
use recipe_lookup::interface::RecipeLookup;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

mod classify_session;
mod confidence_gate;
mod config;
mod error;
mod image_classifier;
mod image_codec;
mod label;
mod library;
mod outcome_display;
mod output_decoder;
mod pipeline;
mod recipe_lookup;
mod tensor_encoder;

const USAGE: &str = "usage: ingredient-lens [--gui] [--threshold P] [--timeout-secs N] \
[--model-quantization] [--recipes FILE] (<model.onnx> | --fake-classifier) <labels.txt> <image>...";

fn parse_args(
    mut config: Config,
    mut args: impl Iterator<Item = String>,
) -> Result<(Config, Vec<PathBuf>), Box<dyn std::error::Error + Send + Sync>> {
    let mut positional = vec![];

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--gui" => config.display = DisplayKind::Gui,
            "--fake-classifier" => config.fake_classifier = true,
            "--model-quantization" => config.dequantization = Dequantization::ModelParams,
            "--threshold" => {
                config.min_confidence = args.next().ok_or(USAGE)?.parse()?;
            }
            "--timeout-secs" => {
                let secs: u64 = args.next().ok_or(USAGE)?.parse()?;
                config.classify_timeout = (secs > 0).then(|| Duration::from_secs(secs));
            }
            "--recipes" => config.recipes_path = Some(PathBuf::from(args.next().ok_or(USAGE)?)),
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let leading = if config.fake_classifier { 1 } else { 2 };
    if positional.len() <= leading {
        return Err(USAGE.into());
    }

    let images = positional.split_off(leading);
    config.labels_path = positional.pop().ok_or(USAGE)?;
    if !config.fake_classifier {
        config.model_path = positional.pop().ok_or(USAGE)?;
    }

    Ok((config, images))
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (config, images) = parse_args(Config::default(), std::env::args().skip(1))?;

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    let labels = Arc::new(Labels::load(&config.labels_path)?);

    let recipes: Arc<dyn RecipeLookup + Send + Sync> = match &config.recipes_path {
        Some(path) => Arc::new(RecipeLookupStatic::load(path)?),
        None => Arc::new(RecipeLookupStatic::built_in()),
    };

    let image_classifier: Arc<dyn ImageClassifier + Send + Sync> = if config.fake_classifier {
        Arc::new(ImageClassifierFake::new(
            logger.clone(),
            config.input_size,
            labels.len(),
        ))
    } else {
        Arc::new(ImageClassifierTractOnnx::new(
            ModelConfig {
                onnx_model_path: config.model_path.clone(),
                input_size: config.input_size,
            },
            logger.clone(),
        )?)
    };

    let pipeline = Arc::new(Pipeline::new(
        config.clone(),
        logger.clone(),
        image_classifier,
        labels,
        recipes,
    )?);

    let gui = (config.display == DisplayKind::Gui).then(OutcomeDisplayGui::new);
    let window = gui.as_ref().map(OutcomeDisplayGui::window);
    let outcome_display: Arc<Mutex<dyn OutcomeDisplay + Send + Sync>> = match gui {
        Some(gui) => Arc::new(Mutex::new(gui)),
        None => Arc::new(Mutex::new(OutcomeDisplayConsole::new())),
    };
    outcome_display
        .lock()
        .map_err(|e| e.to_string())?
        .init()?;

    let session = ClassifySession::new(pipeline, logger.clone(), outcome_display);
    session.start();

    let Some(window) = window else {
        return classify_images(&session, &images, logger.as_ref(), config.settle_timeout);
    };

    // The window owns the main thread; the images are fed from a worker.
    let worker_logger = logger.clone();
    std::thread::spawn(move || {
        if let Err(e) = classify_images(
            &session,
            &images,
            worker_logger.as_ref(),
            config.settle_timeout,
        ) {
            let _ = worker_logger.error(&format!("Classification stopped: {}", e));
        }
    });

    logger.info("Close the window to exit")?;
    window.run()
}

fn classify_images(
    session: &ClassifySession,
    images: &[PathBuf],
    logger: &dyn Logger,
    settle_timeout: Duration,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    for path in images {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = logger.error(&format!("Cannot read {}: {}", path.display(), e));
                continue;
            }
        };

        let seq = session.submit(bytes)?;
        match session.wait_settled(seq, settle_timeout) {
            Some(model) => {
                if let Some(outcome) = model.outcome() {
                    logger.info(&format!("{}: {}", path.display(), describe(&outcome)))?;
                }
            }
            None => {
                let _ = logger.error(&format!("{}: no result in time", path.display()));
            }
        }
    }

    Ok(())
}
