//! Line position tracking writer
//!
//! Several Markdown metacharacters are only significant at particular cursor positions (`-` at
//! the start of a line, `.` right after a digit). [`LinePositionWriter`] decorates any
//! [`io::Write`] and remembers the last completed line and the line in progress so the
//! serializer can ask where the cursor is. It knows nothing about Markdown.

use std::io::{self, Write};

/// Default line terminator
pub const DEFAULT_LINE_SEPARATOR: &str = "\n";

pub struct LinePositionWriter<W> {
    inner: W,
    line_separator: String,
    previous_line: String,
    current_line: String,
}

impl<W: Write> LinePositionWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_line_separator(inner, DEFAULT_LINE_SEPARATOR)
    }

    /// An empty separator falls back to `"\n"`.
    pub fn with_line_separator(inner: W, line_separator: impl Into<String>) -> Self {
        let mut line_separator = line_separator.into();
        if line_separator.is_empty() {
            line_separator = DEFAULT_LINE_SEPARATOR.to_string();
        }
        Self {
            inner,
            line_separator,
            previous_line: String::new(),
            current_line: String::new(),
        }
    }

    /// Forwards `text` unchanged and updates the line state.
    pub fn write(&mut self, text: &str) -> io::Result<()> {
        self.inner.write_all(text.as_bytes())?;
        for c in text.chars() {
            self.current_line.push(c);
            if self.current_line.ends_with(self.line_separator.as_str()) {
                let completed = self.current_line.len() - self.line_separator.len();
                self.current_line.truncate(completed);
                self.previous_line = std::mem::take(&mut self.current_line);
            }
        }
        Ok(())
    }

    pub fn line_separator(&self) -> &str {
        &self.line_separator
    }

    /// Nothing has been written on the current line.
    pub fn is_at_start_of_new_line(&self) -> bool {
        self.current_line.is_empty()
    }

    /// Both the current and the previous line hold only whitespace.
    ///
    /// True at the very beginning of the output.
    pub fn is_after_blank_line(&self) -> bool {
        is_blank(&self.current_line) && is_blank(&self.previous_line)
    }

    /// The current line is non-empty and ends with an ASCII digit.
    pub fn is_after_digit(&self) -> bool {
        self.current_line
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_digit())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Forgets the line state without touching the destination.
    pub fn reset_position(&mut self) {
        self.previous_line.clear();
        self.current_line.clear();
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

fn is_blank(line: &str) -> bool {
    line.chars().all(char::is_whitespace)
}
