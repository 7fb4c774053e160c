use std::io::Write;

use crate::interpreter::value::ValueType;

/// The output sink the interpreter writes to.
///
/// The runner never assumes a specific transport: a terminal, a GUI text
/// view and a test buffer are all valid implementations. `print`/`println`
/// builtins, and the diagnostics emitted when a formula fails at run time,
/// all go through this trait.
pub trait Console {
    /// Writes text without a trailing newline.
    fn print(&mut self, text: &str);

    /// Writes text followed by a newline.
    fn println(&mut self, text: &str) {
        self.print(text);
        self.print("\n");
    }

    /// Writes a value, rendered with [`ValueType::to_text`].
    fn print_value(&mut self, value: &ValueType) {
        self.print(&value.to_text());
    }

    /// Discards everything written so far, where the transport supports it.
    fn clear(&mut self);
}

/// A console that writes to standard output, used by the command line
/// runner.
#[derive(Debug, Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn print(&mut self, text: &str) {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }

    fn clear(&mut self) {
        // ANSI clear-screen plus cursor-home.
        print!("\x1B[2J\x1B[H");
        let _ = std::io::stdout().flush();
    }
}

/// A console that accumulates output in memory. Used by tests and by hosts
/// that render the output themselves.
#[derive(Debug, Default)]
pub struct BufferConsole {
    buffer: String,
}

impl BufferConsole {
    /// Creates an empty buffer console.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything printed so far.
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.buffer
    }
}

impl Console for BufferConsole {
    fn print(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// A console that drops all output.
#[derive(Debug, Default)]
pub struct NullConsole;

impl Console for NullConsole {
    fn print(&mut self, _text: &str) {}

    fn clear(&mut self) {}
}
