use crate::classify_session::core::{init, transition, Effect, Event, Model};
use crate::classify_session::render::Render;
use crate::classify_session::run_effect::RunEffect;
use crate::library::logger::interface::Logger;
use crate::outcome_display::interface::OutcomeDisplay;
use crate::pipeline::Pipeline;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Runs classifications in the background, one image at a time.
///
/// Submitting a new image supersedes whatever is in flight: the older run
/// keeps going on its worker thread but its result is dropped by `transition`.
#[derive(Clone)]
pub struct ClassifySession {
    model: Arc<(Mutex<Model>, Condvar)>,
    next_seq: Arc<AtomicU64>,
    event_sender: Sender<Event>,
    event_receiver: Arc<Mutex<Receiver<Event>>>,
    logger: Arc<dyn Logger + Send + Sync>,
    run_effect: RunEffect,
    render: Render,
}

impl ClassifySession {
    pub fn new(
        pipeline: Arc<Pipeline>,
        logger: Arc<dyn Logger + Send + Sync>,
        outcome_display: Arc<Mutex<dyn OutcomeDisplay + Send + Sync>>,
    ) -> Self {
        let logger = logger.with_namespace("classify_session");
        let (event_sender, event_receiver) = channel();
        let (initial, _) = init();

        Self {
            model: Arc::new((Mutex::new(initial), Condvar::new())),
            next_seq: Arc::new(AtomicU64::new(0)),
            run_effect: RunEffect::new(pipeline, logger.clone(), event_sender.clone()),
            render: Render::new(outcome_display),
            event_sender,
            event_receiver: Arc::new(Mutex::new(event_receiver)),
            logger,
        }
    }

    /// Queues an image and returns the sequence number its result will carry.
    pub fn submit(&self, image: Vec<u8>) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.event_sender
            .send(Event::ImageSubmitted { seq, image })
            .map_err(|e| e.to_string())?;
        Ok(seq)
    }

    pub fn current(&self) -> Model {
        let (model, _) = &*self.model;
        model.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Blocks until the run tagged `seq` (or a newer one) has settled.
    pub fn wait_settled(&self, seq: u64, timeout: Duration) -> Option<Model> {
        let (model, settled) = &*self.model;
        let guard = model.lock().ok()?;
        let (guard, wait) = settled
            .wait_timeout_while(guard, timeout, |m| {
                m.latest_seq < seq || !m.state.is_settled()
            })
            .ok()?;

        if wait.timed_out() {
            return None;
        }

        Some(guard.clone())
    }

    pub fn start(&self) -> std::thread::JoinHandle<()> {
        let session = self.clone();
        std::thread::spawn(move || {
            if let Err(e) = session.run() {
                let _ = session.logger.error(&format!("Session stopped: {}", e));
            }
        })
    }

    pub fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut current_model = self.current();
        self.render.render(&current_model)?;

        loop {
            let event = self
                .event_receiver
                .lock()
                .map_err(|e| e.to_string())?
                .recv()?;

            let _ = self
                .logger
                .info(&format!("Event: {}", event.to_display_string()));

            let (new_model, effects) = transition(current_model.clone(), event);

            if new_model == current_model {
                let _ = self.logger.info("Ignored stale or out-of-order event");
                continue;
            }

            let _ = self.logger.info(&format!("New state: {:?}", new_model.state));

            current_model = new_model.clone();

            if let Err(e) = self.render.render(&current_model) {
                let _ = self.logger.error(&format!("Render failed: {}", e));
            }

            self.publish(new_model)?;

            self.execute_effects(effects);
        }
    }

    fn publish(&self, new_model: Model) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (model, settled) = &*self.model;
        *model.lock().map_err(|e| e.to_string())? = new_model;
        settled.notify_all();
        Ok(())
    }

    fn execute_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let run_effect = self.run_effect.clone();
            std::thread::spawn(move || run_effect.run_effect(effect));
        }
    }
}
