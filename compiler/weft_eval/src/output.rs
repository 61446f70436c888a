//! Output sink for rendered text, slot content and `<log>` lines.
//!
//! Enum dispatch over a fixed set of destinations: stdout for the CLI, a
//! buffer for tests and embedding, or nothing.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// Writes straight to stdout.
#[derive(Default)]
pub struct StdoutOutput;

impl StdoutOutput {
    pub fn write(&self, text: &str) {
        let mut out = io::stdout().lock();
        // A closed stdout is not an evaluation error.
        let _ = out.write_all(text.as_bytes());
    }
}

/// Captures everything written.
#[derive(Default)]
pub struct BufferOutput {
    buffer: Mutex<String>,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&self, text: &str) {
        self.buffer.lock().push_str(text);
    }

    pub fn contents(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

pub enum OutputSink {
    Stdout(StdoutOutput),
    Buffer(BufferOutput),
    Silent,
}

impl OutputSink {
    pub fn write(&self, text: &str) {
        match self {
            Self::Stdout(out) => out.write(text),
            Self::Buffer(out) => out.write(text),
            Self::Silent => {}
        }
    }

    pub fn writeln(&self, text: &str) {
        self.write(text);
        self.write("\n");
    }

    /// Captured output; empty for sinks that do not capture.
    pub fn contents(&self) -> String {
        match self {
            Self::Buffer(out) => out.contents(),
            Self::Stdout(_) | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(out) = self {
            out.clear();
        }
    }

    pub fn flush(&self) {
        if let Self::Stdout(_) = self {
            let _ = io::stdout().flush();
        }
    }
}

pub type SharedOutput = Arc<OutputSink>;

pub fn stdout_output() -> SharedOutput {
    Arc::new(OutputSink::Stdout(StdoutOutput))
}

pub fn buffer_output() -> SharedOutput {
    Arc::new(OutputSink::Buffer(BufferOutput::new()))
}

pub fn silent_output() -> SharedOutput {
    Arc::new(OutputSink::Silent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_captures_in_order() {
        let out = buffer_output();
        out.write("a");
        out.writeln("b");
        out.write("c");
        assert_eq!(out.contents(), "ab\nc");
        out.clear();
        assert_eq!(out.contents(), "");
    }

    #[test]
    fn stdout_and_silent_capture_nothing() {
        stdout_output().write("");
        silent_output().writeln("dropped");
        assert_eq!(silent_output().contents(), "");
    }
}
