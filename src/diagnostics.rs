use std::{fmt, io};

use thiserror::Error;

use crate::program::LineIndex;

/// Which naming rule a rejected variable or label name broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    Empty,
    LeadingDigit,
    Whitespace,
    Punctuation,
    Operator,
}

impl fmt::Display for NameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NameRule::Empty => "must not be blank or empty",
            NameRule::LeadingDigit => "must not start with a digit",
            NameRule::Whitespace => "must not contain spaces or tabs",
            NameRule::Punctuation => "must not contain punctuation besides the underscore",
            NameRule::Operator => "must not contain operators",
        };
        f.write_str(text)
    }
}

/// A problem found while parsing a single line. Carries no line number; the
/// loader attaches one when it wraps this into a [`CompileError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("`{0}` is not a legal keyword")]
    UnknownKeyword(String),
    #[error("an assignment operator `=` is expected")]
    MissingAssignmentOperator,
    #[error("a variable name is expected")]
    MissingVariableName,
    #[error("an expression or value is expected for assignment")]
    MissingExpression,
    #[error("the word `goto` is expected")]
    MissingGoto,
    #[error("a target label name is expected")]
    MissingGotoTarget,
    #[error("quote not closed")]
    UnclosedQuote,
    #[error("an expression or value is expected in the print list")]
    EmptyPrintItem,
    #[error("`{name}` is not a legal name of a variable or label: it {rule}")]
    IllegalName { name: String, rule: NameRule },
    #[error("cannot parse `{0}` as an expression")]
    UnparsableExpression(String),
    #[error("compile failed due to an unexpected fault: {0}")]
    Internal(String),
}

/// Compile-time error: a [`SyntaxError`] tagged with its source line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Syntax error: {error} (at line {line})")]
pub struct CompileError {
    pub line: LineIndex,
    pub error: SyntaxError,
}

impl CompileError {
    pub fn new(line: LineIndex, error: SyntaxError) -> Self {
        Self { line, error }
    }
}

/// Unexpected faults wrapped by [`RuntimeError::Unknown`].
#[derive(Debug, Error)]
pub enum Fault {
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("operator `{op}` cannot be applied to {left} and {right}")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
}

/// Errors raised while executing statements. Always aborts the run loop.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Undefined variable {name}! (at line {line})")]
    UndefinedVariable { line: LineIndex, name: String },
    #[error("Illegal goto label {label}! (at line {line})")]
    IllegalGotoLabel { line: LineIndex, label: String },
    #[error("Illegal or missing input! (at line {line})")]
    IllegalInput { line: LineIndex },
    #[error("Runtime failed due to an unexpected fault (at line {line}): {fault}")]
    Unknown { line: LineIndex, fault: Fault },
}

impl RuntimeError {
    pub fn line(&self) -> LineIndex {
        match self {
            RuntimeError::UndefinedVariable { line, .. }
            | RuntimeError::IllegalGotoLabel { line, .. }
            | RuntimeError::IllegalInput { line }
            | RuntimeError::Unknown { line, .. } => *line,
        }
    }
}

/// Unified error type for the tiny-lang toolchain.
#[derive(Debug, Error)]
pub enum TinyLangError {
    #[error("{0}")]
    Compile(#[from] CompileError),
    #[error("{0}")]
    Runtime(#[from] RuntimeError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, TinyLangError>;
