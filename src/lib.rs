//! Core library for the tiny-lang scripting language.
//! Implements quote-aware splitting, line parsing, program loading and the
//! resumable interpreter engine, plus the console collaborators and REPL
//! used by the `tinylang` binary.

pub mod ast;
pub mod console;
pub mod context;
pub mod diagnostics;
pub mod lexer;
pub mod names;
pub mod parser;
pub mod program;
pub mod repl;
pub mod runtime;
pub mod value;

pub use console::{InputProvider, OutputSink, ScriptedInput, StdinInput, StdoutSink};
pub use context::Context;
pub use diagnostics::{CompileError, Fault, RuntimeError, SyntaxError, TinyLangError};
pub use program::{Labels, LineIndex, LoadMode, Program};
pub use repl::{Repl, SessionEnd};
pub use runtime::{Interpreter, Step};
pub use value::Value;
