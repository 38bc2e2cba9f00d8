//! Renderer for one-shot CLI output
//!
//! Prints the final view of a model.

use std::io::{self, BufWriter, Write};

/// Writes rendered views to a buffered writer
pub struct Renderer<W: Write = BufWriter<io::Stdout>> {
    writer: W,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer<BufWriter<io::Stdout>> {
    /// Create a new renderer writing to stdout
    #[must_use]
    pub fn new() -> Self {
        Self::with_writer(BufWriter::new(io::stdout()))
    }
}

impl<W: Write> Renderer<W> {
    /// Create a renderer with a custom writer
    #[must_use]
    pub const fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Render a view (full output string)
    pub fn render(&mut self, view: &str) -> io::Result<()> {
        writeln!(self.writer, "{view}")?;
        self.writer.flush()
    }
}
