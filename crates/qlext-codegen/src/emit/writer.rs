//! Line-oriented source buffer.

/// Accumulates generated source text with a fixed indentation unit.
#[derive(Debug, Default)]
pub(crate) struct SourceWriter {
    buf: String,
    level: usize,
}

const INDENT: &str = "   ";

impl SourceWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current indentation.
    pub(crate) fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.buf.push_str(INDENT);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    pub(crate) fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub(crate) fn indent(&mut self) {
        self.level += 1;
    }

    pub(crate) fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub(crate) fn finish(self) -> String {
        self.buf
    }
}
