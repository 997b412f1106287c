use std::error::Error;

/// Line-oriented surface the session renders its state onto.
pub trait OutcomeDisplay: Send + Sync {
    /// Prepare the display before the first frame
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Blank every line
    fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Write text to a line (0-based). Text longer than `chars_per_line` is cut.
    /// Returns error if the line number is out of range
    fn write_line(&mut self, line: usize, text: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Show what has been written since the last `clear`
    fn flush(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn num_lines(&self) -> usize {
        6
    }

    fn chars_per_line(&self) -> usize {
        40
    }
}
