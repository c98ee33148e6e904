use std::{any::Any, fmt, panic};

use indexmap::IndexMap;

use crate::{
    ast::Stmt,
    diagnostics::{CompileError, SyntaxError},
    parser::{self, ParsedLine},
};

/// A 0-based source line number; also the index of that line's slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineIndex(usize);

impl LineIndex {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn get(self) -> usize {
        self.0
    }

    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<usize> for LineIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for LineIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The statement table. Slot `n` holds whatever line `n` declared, or `None`
/// for a line with only a label or nothing at all.
///
/// Append-only: a slot keeps its index forever, so `LineIndex` values handed
/// out by [`Program::push`] stay valid for the life of the program.
#[derive(Debug, Default, Clone)]
pub struct Program {
    slots: Vec<Option<Stmt>>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The index the next pushed slot will receive.
    pub fn next_line(&self) -> LineIndex {
        LineIndex(self.slots.len())
    }

    pub fn contains(&self, line: LineIndex) -> bool {
        line.0 < self.slots.len()
    }

    pub fn push(&mut self, slot: Option<Stmt>) -> LineIndex {
        let line = self.next_line();
        self.slots.push(slot);
        debug_assert_eq!(self.slots.len(), line.0 + 1, "program slots must only grow");
        line
    }

    /// `None` when `line` is past the end; `Some(None)` for an empty slot.
    pub fn slot(&self, line: LineIndex) -> Option<Option<&Stmt>> {
        self.slots.get(line.0).map(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LineIndex, Option<&Stmt>)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| (LineIndex(index), slot.as_ref()))
    }
}

/// Goto targets. Redefining a label silently moves it to the newer line.
#[derive(Debug, Default, Clone)]
pub struct Labels {
    targets: IndexMap<String, LineIndex>,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` at `line`, returning the line it pointed to before.
    pub fn define(&mut self, name: impl Into<String>, line: LineIndex) -> Option<LineIndex> {
        let name = name.into();
        let previous = self.targets.insert(name.clone(), line);
        match previous {
            Some(previous) => {
                tracing::debug!(label = %name, %previous, %line, "label redefined");
            }
            None => tracing::debug!(label = %name, %line, "label registered"),
        }
        previous
    }

    pub fn resolve(&self, name: &str) -> Option<LineIndex> {
        self.targets.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, LineIndex)> {
        self.targets.iter().map(|(name, line)| (name.as_str(), *line))
    }
}

/// How the loader treats lines that carry neither a label nor a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Blank lines still take a slot so line numbers match the file.
    Script,
    /// Blank lines are dropped so the counter only moves on real input.
    Interactive,
}

impl LoadMode {
    pub fn keep_empty(self) -> bool {
        matches!(self, LoadMode::Script)
    }
}

/// Parses `source` line by line, appending slots to `program` and labels to
/// `labels`. Returns the number of slots appended.
///
/// Stops at the first line that fails to parse. Lines appended before it are
/// kept.
#[tracing::instrument(level = "debug", skip(program, labels, source))]
pub fn load(
    program: &mut Program,
    labels: &mut Labels,
    source: &str,
    mode: LoadMode,
) -> Result<usize, CompileError> {
    let mut appended = 0;
    for text in source.lines() {
        let line = program.next_line();
        let parsed = parse_line_guarded(text).map_err(|error| CompileError::new(line, error))?;
        if parsed.is_empty() && !mode.keep_empty() {
            continue;
        }
        let ParsedLine { label, statement } = parsed;
        program.push(statement);
        if let Some(label) = label {
            labels.define(label, line);
        }
        appended += 1;
    }
    tracing::debug!(appended, total = program.len(), "source loaded");
    Ok(appended)
}

fn parse_line_guarded(text: &str) -> Result<ParsedLine, SyntaxError> {
    panic::catch_unwind(|| parser::parse_line(text))
        .unwrap_or_else(|payload| Err(SyntaxError::Internal(panic_message(&*payload))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "parser panicked".to_string()
    }
}
