//! Position resolution: mapping a line number to the column span a
//! diagnostic should highlight, and producing the whole-source range used
//! to anchor file-level findings.

use std::path::Path;

use crate::error::Result;
use crate::model::Range;

/// Resolves line numbers to column spans for a single source file.
/// Lines and columns are 0-indexed.
pub trait PositionResolver {
    /// Column span `(start, end)` of a line: from its first
    /// non-whitespace character to its end. `None` when the line does not
    /// exist in the source.
    fn line_span(&self, line: u32) -> Option<(u32, u32)>;

    /// Range covering the entire source.
    fn full_range(&self) -> Range;
}

/// `PositionResolver` backed by the source text itself.
#[derive(Debug, Clone)]
pub struct TextSource {
    // Per line: (first non-whitespace column, line length in chars).
    spans: Vec<(u32, u32)>,
}

impl TextSource {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let spans = text
            .lines()
            .map(|line| {
                let len = line.chars().count() as u32;
                let indent = line
                    .char_indices()
                    .position(|(_, c)| !c.is_whitespace())
                    .map_or(len, |i| i as u32);
                (indent, len)
            })
            .collect();
        Self { spans }
    }

    /// Read the source from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(&text))
    }
}

impl PositionResolver for TextSource {
    fn line_span(&self, line: u32) -> Option<(u32, u32)> {
        self.spans.get(line as usize).copied()
    }

    fn full_range(&self) -> Range {
        match self.spans.last() {
            Some(&(_, last_len)) => {
                Range::new(0, 0, (self.spans.len() - 1) as u32, last_len)
            }
            None => Range::new(0, 0, 0, 0),
        }
    }
}
