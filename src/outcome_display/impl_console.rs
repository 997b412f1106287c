use crate::outcome_display::interface::OutcomeDisplay;
use std::error::Error;

pub struct OutcomeDisplayConsole {
    display_buffer: Vec<String>,
}

impl OutcomeDisplayConsole {
    pub fn new() -> Self {
        let mut display = Self {
            display_buffer: vec![],
        };
        display.display_buffer = vec![String::new(); display.num_lines()];
        display
    }

    fn render_display(&self) {
        let width = self.chars_per_line();
        println!("┌{}┐", "─".repeat(width));
        for row in &self.display_buffer {
            println!("│{:<width$}│", row, width = width);
        }
        println!("└{}┘", "─".repeat(width));
    }
}

impl OutcomeDisplay for OutcomeDisplayConsole {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.render_display();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        for row in self.display_buffer.iter_mut() {
            row.clear();
        }
        Ok(())
    }

    fn write_line(&mut self, line: usize, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let chars_per_line = self.chars_per_line();
        let row = self
            .display_buffer
            .get_mut(line)
            .ok_or("Invalid line number")?;

        *row = text.chars().take(chars_per_line).collect();
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.render_display();
        Ok(())
    }
}
