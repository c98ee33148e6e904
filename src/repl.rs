use std::io;

use rustyline::{DefaultEditor, error::ReadlineError};

use crate::{
    console::{InputProvider, OutputSink, StdinInput, StdoutSink},
    diagnostics::{Result, RuntimeError, TinyLangError},
    program::LoadMode,
    runtime::Interpreter,
};

/// How an interactive session ended.
#[derive(Debug)]
pub enum SessionEnd {
    Finished,
    Terminated(RuntimeError),
}

/// Line-at-a-time session over one long-lived interpreter.
///
/// Compile errors are reported and the session goes on; a runtime error ends
/// it.
pub struct Repl<I = StdinInput, O = StdoutSink> {
    interpreter: Interpreter<I, O>,
}

impl Repl {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: InputProvider, O: OutputSink> Repl<I, O> {
    pub fn with_interpreter(interpreter: Interpreter<I, O>) -> Self {
        Self { interpreter }
    }

    pub fn interpreter(&self) -> &Interpreter<I, O> {
        &self.interpreter
    }

    pub fn prompt(&self) -> String {
        format!("Line[{}] > ", self.interpreter.cursor())
    }

    /// Feeds one line of input to the interpreter. Returns `Some` once the
    /// session is over.
    pub fn handle_line(&mut self, line: &str) -> Option<SessionEnd> {
        let trimmed = line.trim();
        if trimmed == ":quit" || trimmed == ":exit" {
            return Some(SessionEnd::Finished);
        }
        match self.interpreter.execute_source(line, LoadMode::Interactive) {
            Ok(_) => None,
            Err(TinyLangError::Compile(err)) => {
                tracing::debug!(line = %err.line, "compile error in interactive input");
                println!("{err}");
                None
            }
            Err(TinyLangError::Runtime(err)) => Some(SessionEnd::Terminated(err)),
            Err(TinyLangError::Io(err)) => {
                eprintln!("error: {err}");
                None
            }
        }
    }

    pub fn run(&mut self) -> Result<SessionEnd> {
        let mut editor =
            DefaultEditor::new().map_err(|err| TinyLangError::from(io::Error::other(err)))?;
        let end = loop {
            match editor.readline(&self.prompt()) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        editor.add_history_entry(line.as_str()).ok();
                    }
                    if let Some(end) = self.handle_line(&line) {
                        break end;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    break SessionEnd::Finished;
                }
                Err(err) => {
                    return Err(TinyLangError::from(io::Error::other(err)));
                }
            }
        };

        println!();
        match &end {
            SessionEnd::Finished => println!("finished"),
            SessionEnd::Terminated(err) => {
                println!("terminated with error");
                println!("{err}");
            }
        }
        Ok(end)
    }
}
