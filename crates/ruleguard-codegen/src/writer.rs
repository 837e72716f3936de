//! Indented line buffer for generated source.

#[derive(Debug, Clone)]
pub struct CodeWriter {
    out: String,
    depth: usize,
    unit: &'static str,
}

impl CodeWriter {
    /// `unit` is one level of indentation, e.g. four spaces or a tab.
    pub fn new(unit: &'static str) -> Self {
        Self {
            out: String::new(),
            depth: 0,
            unit,
        }
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(self.unit);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Write `text` and indent what follows.
    pub fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    /// Dedent and write `text` (if any).
    pub fn close(&mut self, text: Option<&str>) {
        self.depth = self.depth.saturating_sub(1);
        if let Some(text) = text {
            self.line(text);
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Current length of the buffer, for detecting empty blocks.
    pub fn mark(&self) -> usize {
        self.out.len()
    }

    pub fn written_since(&self, mark: usize) -> bool {
        self.out.len() > mark
    }

    pub fn finish(self) -> String {
        self.out
    }
}
