#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `supplant_logging` provides [`MessageSink`], a small adapter that streams
//! [`Message`](supplant_core::message::Message) diagnostics onto an
//! arbitrary writer. Callers choose whether each rendered message ends with
//! a newline via [`LineMode`]; the default mirrors the convention of one
//! diagnostic per line.
//!
//! # Errors
//!
//! All operations surface [`std::io::Error`] values from the underlying
//! writer unchanged.

use std::io::{self, Write};

use supplant_core::message::Message;

/// Controls whether rendered messages end with a newline.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LineMode {
    /// Append a newline after each message (the default).
    #[default]
    WithNewline,
    /// Render the message bytes only.
    WithoutNewline,
}

/// Streams [`Message`] values onto a writer.
#[derive(Debug)]
pub struct MessageSink<W> {
    writer: W,
    line_mode: LineMode,
}

impl<W> MessageSink<W> {
    /// Creates a sink that appends a newline after each rendered message.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_line_mode(writer, LineMode::WithNewline)
    }

    /// Creates a sink with the provided [`LineMode`].
    #[must_use]
    pub fn with_line_mode(writer: W, line_mode: LineMode) -> Self {
        Self { writer, line_mode }
    }

    /// Consumes the sink and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Returns a mutable reference to the wrapped writer.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }
}

impl<W: Write> MessageSink<W> {
    /// Renders `message` onto the writer.
    pub fn write(&mut self, message: &Message) -> io::Result<()> {
        match self.line_mode {
            LineMode::WithNewline => writeln!(self.writer, "{message}"),
            LineMode::WithoutNewline => write!(self.writer, "{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplant_core::{supplant_error, supplant_warning};

    #[test]
    fn writes_one_line_per_message() {
        let mut sink = MessageSink::new(Vec::new());
        sink.write(&supplant_warning!("first")).expect("write");
        sink.write(&supplant_error!(2, "second")).expect("write");

        let output = String::from_utf8(sink.into_inner()).expect("utf8");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            ["supplant warning: first", "supplant error: second (code 2)"]
        );
    }

    #[test]
    fn without_newline_renders_bytes_only() {
        let mut sink = MessageSink::with_line_mode(Vec::new(), LineMode::WithoutNewline);
        sink.write(&supplant_warning!("tail")).expect("write");
        assert_eq!(sink.into_inner(), b"supplant warning: tail");
    }
}
