use crate::outcome_display::interface::OutcomeDisplay;
use eframe::egui;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// The window itself. `run` must be called from the main thread: winit
/// refuses to create its event loop anywhere else.
#[derive(Clone)]
pub struct OutcomeWindow {
    display_buffer: Arc<Mutex<Vec<String>>>,
}

impl OutcomeWindow {
    /// Blocks until the window is closed.
    pub fn run(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([480.0, 260.0])
                .with_resizable(false),
            ..Default::default()
        };

        eframe::run_native("Ingredient Lens", options, Box::new(|_cc| Box::new(self)))
            .map_err(|e| e.to_string().into())
    }

    #[allow(dead_code)]
    pub fn lines(&self) -> Vec<String> {
        self.display_buffer
            .lock()
            .map(|buffer| buffer.clone())
            .unwrap_or_default()
    }
}

impl eframe::App for OutcomeWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let lines = match self.display_buffer.lock() {
            Ok(buffer) => buffer.clone(),
            Err(_) => return,
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                let border_color = egui::Color32::from_rgb(100, 100, 100);
                let bg_color = egui::Color32::from_rgb(250, 245, 230);

                let rect = ui.available_rect_before_wrap();
                ui.painter().rect_filled(rect, 0.0, bg_color);
                ui.painter()
                    .rect_stroke(rect, 0.0, egui::Stroke::new(2.0, border_color));

                for (index, line) in lines.iter().enumerate() {
                    let text = egui::RichText::new(line)
                        .monospace()
                        .color(egui::Color32::BLACK);
                    // Headline (ingredient or status) is larger than the recipe list
                    let text = if index == 0 {
                        text.size(24.0).strong()
                    } else {
                        text.size(16.0)
                    };
                    ui.label(text);
                }
            });
        });

        // The session thread writes into the buffer, not through egui
        ctx.request_repaint_after(std::time::Duration::from_millis(200));
    }
}

pub struct OutcomeDisplayGui {
    display_buffer: Arc<Mutex<Vec<String>>>,
    pending: Vec<String>,
}

impl OutcomeDisplayGui {
    pub fn new() -> Self {
        Self {
            display_buffer: Arc::new(Mutex::new(vec![])),
            pending: vec![],
        }
    }

    /// Handle that shows whatever this display flushes.
    pub fn window(&self) -> OutcomeWindow {
        OutcomeWindow {
            display_buffer: self.display_buffer.clone(),
        }
    }
}

impl OutcomeDisplay for OutcomeDisplayGui {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.pending = vec![String::new(); self.num_lines()];
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.pending = vec![String::new(); self.num_lines()];
        Ok(())
    }

    fn write_line(&mut self, line: usize, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        if line >= self.num_lines() {
            return Err("Invalid line number".into());
        }
        if self.pending.len() < self.num_lines() {
            self.pending.resize(self.num_lines(), String::new());
        }
        self.pending[line] = text.chars().take(self.chars_per_line()).collect();
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut buffer = self.display_buffer.lock().map_err(|e| e.to_string())?;
        *buffer = self.pending.clone();
        Ok(())
    }
}
