use crate::error::ModelConfigError;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct LabelEntry {
    pub index: usize,
    pub raw: String,
}

/// Label list in classifier output order. The line position is the binding
/// key, not any ordinal written in the file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Labels {
    entries: Vec<LabelEntry>,
}

impl Labels {
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(index, line)| LabelEntry {
                index,
                raw: line.to_string(),
            })
            .collect();

        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self, ModelConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ModelConfigError::Labels(format!("{}: {}", path.display(), e)))?;
        Ok(Self::parse(&text))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LabelEntry> {
        self.entries.get(index)
    }
}

/// Strips a leading ordinal, trims and lowercases a raw label.
pub fn canonicalize(raw: &str) -> String {
    raw.trim_start_matches(|c: char| c.is_ascii_digit())
        .trim()
        .to_lowercase()
}
