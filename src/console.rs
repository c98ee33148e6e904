//! Input and output collaborators consumed by the interpreter.
//!
//! The engine never touches stdio directly: `input` statements pull a line
//! from an [`InputProvider`] and `print` statements push rendered values into
//! an [`OutputSink`].

use std::{
    collections::VecDeque,
    fmt::Write as _,
    io::{self, BufRead, Write},
};

use crate::value::Value;

pub trait InputProvider {
    /// Blocks until one line of raw text is available. `Ok(None)` signals
    /// that the input is exhausted.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

pub trait OutputSink {
    fn write_value(&mut self, value: &Value) -> io::Result<()>;

    /// Appends literal text such as the separating space or the newline.
    fn write_text(&mut self, text: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reads lines from the process's standard input.
#[derive(Debug)]
pub struct StdinInput {
    stdin: io::Stdin,
}

impl StdinInput {
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputProvider for StdinInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}

/// A fixed queue of input lines, handed out in order.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl InputProvider for ScriptedInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Writes to the process's standard output.
#[derive(Debug)]
pub struct StdoutSink {
    stdout: io::Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for StdoutSink {
    fn write_value(&mut self, value: &Value) -> io::Result<()> {
        write!(self.stdout.lock(), "{value}")
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.stdout.lock().write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.lock().flush()
    }
}

/// Collects output in memory.
impl OutputSink for String {
    fn write_value(&mut self, value: &Value) -> io::Result<()> {
        write!(self, "{value}").map_err(io::Error::other)
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.push_str(text);
        Ok(())
    }
}
