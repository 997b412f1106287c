use crate::outcome_display::interface::OutcomeDisplay;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Keeps every flushed frame so tests can look at what was shown.
#[derive(Clone, Default)]
pub struct OutcomeDisplayFake {
    lines: Vec<String>,
    frames: Arc<Mutex<Vec<Vec<String>>>>,
}

impl OutcomeDisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Vec<String>> {
        self.frames
            .lock()
            .map(|frames| frames.clone())
            .unwrap_or_default()
    }
}

impl OutcomeDisplay for OutcomeDisplayFake {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.lines = vec![String::new(); self.num_lines()];
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.lines = vec![String::new(); self.num_lines()];
        Ok(())
    }

    fn write_line(&mut self, line: usize, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        if line >= self.num_lines() {
            return Err("Invalid line number".into());
        }
        if self.lines.len() < self.num_lines() {
            self.lines.resize(self.num_lines(), String::new());
        }
        self.lines[line] = text.to_string();
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let frame: Vec<String> = self
            .lines
            .iter()
            .filter(|line| !line.is_empty())
            .cloned()
            .collect();
        self.frames
            .lock()
            .map_err(|e| e.to_string())?
            .push(frame);
        Ok(())
    }
}
