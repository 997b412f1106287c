use crate::classify_session::main::ClassifySession;
use crate::config::Config;
use crate::image_classifier::impl_fake::ImageClassifierFake;
use crate::label::Labels;
use crate::library::logger::{impl_console::LoggerConsole, interface::Logger};
use crate::outcome_display::impl_fake::OutcomeDisplayFake;
use crate::pipeline::Pipeline;
use crate::recipe_lookup::impl_static::RecipeLookupStatic;
use std::sync::{Arc, Mutex};

#[allow(dead_code)]
pub struct Fixture {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub image_classifier: Arc<ImageClassifierFake>,
    pub outcome_display: OutcomeDisplayFake,
    pub session: ClassifySession,
}

impl Fixture {
    pub fn new(customize: impl FnOnce(ImageClassifierFake) -> ImageClassifierFake) -> Self {
        let config = Config::default();
        let logger: Arc<dyn Logger + Send + Sync> =
            Arc::new(LoggerConsole::new(config.logger_timezone));
        let labels = Arc::new(Labels::parse("0 apple\n1 banana"));
        let recipes = Arc::new(RecipeLookupStatic::from_text(
            "apple: Apple Pie\nbanana: Banana Bread | Banana Split",
        ));
        let image_classifier = Arc::new(customize(ImageClassifierFake::new(
            logger.clone(),
            config.input_size,
            labels.len(),
        )));

        let pipeline = Pipeline::new(
            config.clone(),
            logger.clone(),
            image_classifier.clone(),
            labels,
            recipes,
        )
        .unwrap();

        let outcome_display = OutcomeDisplayFake::new();
        let session = ClassifySession::new(
            Arc::new(pipeline),
            logger.clone(),
            Arc::new(Mutex::new(outcome_display.clone())),
        );
        session.start();

        Self {
            config,
            logger,
            image_classifier,
            outcome_display,
            session,
        }
    }
}
