use std::{cmp::Ordering, io};

use crate::{
    ast::{BinaryOp, Expr, Stmt},
    console::{InputProvider, OutputSink, StdinInput, StdoutSink},
    context::Context,
    diagnostics::{self, CompileError, Fault, RuntimeError},
    program::{self, Labels, LineIndex, LoadMode, Program},
    value::Value,
};

/// Result of a single [`Interpreter::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The slot at this line was consumed (it may have been empty).
    Executed(LineIndex),
    /// The cursor lies outside the program; nothing to run until more source
    /// is loaded or the cursor is moved.
    Paused,
}

enum FlowControl {
    Next,
    Jump(LineIndex),
}

/// Owns a program, its labels, the variable context and the execution
/// cursor. Runs until the cursor leaves the program, then waits to be fed
/// more source.
pub struct Interpreter<I = StdinInput, O = StdoutSink> {
    program: Program,
    labels: Labels,
    context: Context,
    cursor: LineIndex,
    input: I,
    output: O,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_io(StdinInput::new(), StdoutSink::new())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: InputProvider, O: OutputSink> Interpreter<I, O> {
    pub fn with_io(input: I, output: O) -> Self {
        Self {
            program: Program::new(),
            labels: Labels::new(),
            context: Context::new(),
            cursor: LineIndex::default(),
            input,
            output,
        }
    }

    /// Appends `source` to the program without executing anything.
    pub fn load_source(&mut self, source: &str, mode: LoadMode) -> Result<usize, CompileError> {
        program::load(&mut self.program, &mut self.labels, source, mode)
    }

    /// Loads `source`, then runs from the current cursor. Returns the line
    /// where execution paused.
    pub fn execute_source(&mut self, source: &str, mode: LoadMode) -> diagnostics::Result<LineIndex> {
        self.load_source(source, mode)?;
        Ok(self.run()?)
    }

    /// Steps until paused. On error the cursor stays on the line after the
    /// failing statement.
    pub fn run(&mut self) -> Result<LineIndex, RuntimeError> {
        while let Step::Executed(_) = self.step()? {}
        Ok(self.cursor)
    }

    pub fn resume_from(&mut self, line: LineIndex) -> Result<LineIndex, RuntimeError> {
        self.cursor = line;
        self.run()
    }

    /// Runs the statement under the cursor.
    ///
    /// The cursor advances before the statement executes; a taken goto then
    /// overwrites it. That ordering lets a line jump to itself.
    pub fn step(&mut self) -> Result<Step, RuntimeError> {
        let line = self.cursor;
        let Some(slot) = self.program.slot(line) else {
            return Ok(Step::Paused);
        };
        self.cursor = line.next();
        let Some(stmt) = slot else {
            return Ok(Step::Executed(line));
        };

        tracing::trace!(%line, "executing statement");
        let mut executor = Executor {
            labels: &self.labels,
            context: &mut self.context,
            input: &mut self.input,
            output: &mut self.output,
        };
        if let FlowControl::Jump(target) = executor.execute(stmt, line)? {
            self.cursor = target;
        }
        Ok(Step::Executed(line))
    }

    pub fn cursor(&self) -> LineIndex {
        self.cursor
    }

    pub fn is_paused(&self) -> bool {
        !self.program.contains(self.cursor)
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }
}

struct Executor<'a, I, O> {
    labels: &'a Labels,
    context: &'a mut Context,
    input: &'a mut I,
    output: &'a mut O,
}

impl<I: InputProvider, O: OutputSink> Executor<'_, I, O> {
    fn execute(&mut self, stmt: &Stmt, line: LineIndex) -> Result<FlowControl, RuntimeError> {
        match stmt {
            Stmt::Assign { name, value } => {
                let value = evaluate(value, self.context, line)?;
                self.context.set(name.clone(), value);
                Ok(FlowControl::Next)
            }
            Stmt::CondGoto { condition, target } => {
                if !evaluate(condition, self.context, line)?.is_nonzero() {
                    return Ok(FlowControl::Next);
                }
                let destination =
                    self.labels
                        .resolve(target)
                        .ok_or_else(|| RuntimeError::IllegalGotoLabel {
                            line,
                            label: target.clone(),
                        })?;
                tracing::debug!(%line, label = %target, %destination, "goto taken");
                Ok(FlowControl::Jump(destination))
            }
            Stmt::Input { name } => {
                let raw = self
                    .input
                    .read_line()
                    .map_err(|err| io_fault(line, err))?
                    .ok_or(RuntimeError::IllegalInput { line })?;
                let number = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| RuntimeError::IllegalInput { line })?;
                self.context.set(name.clone(), Value::number(number));
                Ok(FlowControl::Next)
            }
            Stmt::Output(items) => {
                self.print(items, line)?;
                Ok(FlowControl::Next)
            }
        }
    }

    fn print(&mut self, items: &[Expr], line: LineIndex) -> Result<(), RuntimeError> {
        for (idx, expr) in items.iter().enumerate() {
            if idx > 0 {
                self.output
                    .write_text(" ")
                    .map_err(|err| io_fault(line, err))?;
            }
            let value = evaluate(expr, self.context, line)?;
            self.output
                .write_value(&value)
                .map_err(|err| io_fault(line, err))?;
        }
        self.output
            .write_text("\n")
            .and_then(|()| self.output.flush())
            .map_err(|err| io_fault(line, err))
    }
}

fn io_fault(line: LineIndex, err: io::Error) -> RuntimeError {
    RuntimeError::Unknown {
        line,
        fault: Fault::Io(err),
    }
}

/// Evaluates `expr` eagerly, left operand before right. `line` tags any
/// error raised on the way.
pub fn evaluate(expr: &Expr, context: &Context, line: LineIndex) -> Result<Value, RuntimeError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Reference(name) => {
            context
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::UndefinedVariable {
                    line,
                    name: name.clone(),
                })
        }
        Expr::Binary { op, left, right } => {
            let left_value = evaluate(left, context, line)?;
            let right_value = evaluate(right, context, line)?;
            binary(*op, &left_value, &right_value).map_err(|fault| RuntimeError::Unknown { line, fault })
        }
    }
}

pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, Fault> {
    use BinaryOp::*;
    match op {
        Add => numeric(op, left, right, |a, b| a + b),
        Sub => numeric(op, left, right, |a, b| a - b),
        Mul => numeric(op, left, right, |a, b| a * b),
        Div => numeric(op, left, right, |a, b| a / b),
        Equal => Ok(Value::bool(left == right)),
        NotEqual => Ok(Value::bool(left != right)),
        Less => comparison(op, left, right, |ord| ord == Ordering::Less),
        LessEqual => comparison(op, left, right, |ord| ord != Ordering::Greater),
        Greater => comparison(op, left, right, |ord| ord == Ordering::Greater),
        GreaterEqual => comparison(op, left, right, |ord| ord != Ordering::Less),
    }
}

fn numeric(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    apply: impl Fn(f64, f64) -> f64,
) -> Result<Value, Fault> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::number(apply(*a, *b))),
        _ => Err(type_mismatch(op, left, right)),
    }
}

// NaN is unordered, so every ordering comparison involving it is false.
fn comparison(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    test: impl Fn(Ordering) -> bool,
) -> Result<Value, Fault> {
    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        _ => return Err(type_mismatch(op, left, right)),
    };
    Ok(Value::bool(ordering.is_some_and(test)))
}

fn type_mismatch(op: BinaryOp, left: &Value, right: &Value) -> Fault {
    Fault::TypeMismatch {
        op: op.symbol(),
        left: left.type_name(),
        right: right.type_name(),
    }
}
