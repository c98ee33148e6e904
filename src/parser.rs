use crate::{
    ast::{BinaryOp, Expr, Stmt},
    diagnostics::SyntaxError,
    lexer::{split_all, split_first, QUOTE},
    names::validate_name,
    value::Value,
};

/// The two optional halves of one source line: `[label ':'] [statement]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedLine {
    pub label: Option<String>,
    pub statement: Option<Stmt>,
}

impl ParsedLine {
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.statement.is_none()
    }
}

pub fn parse_line(text: &str) -> Result<ParsedLine, SyntaxError> {
    let (label, rest) = split_first(text, ":", QUOTE);
    let label = match label.map(str::trim) {
        Some(label) if !label.is_empty() => Some(validate_name(label)?),
        _ => None,
    };
    let rest = rest.trim();
    let statement = if rest.is_empty() {
        None
    } else {
        Some(parse_statement(rest)?)
    };
    Ok(ParsedLine { label, statement })
}

pub fn parse_statement(text: &str) -> Result<Stmt, SyntaxError> {
    let text = text.trim();
    let (keyword, content) = match split_first(text, " ", QUOTE) {
        (Some(keyword), content) => (keyword, content),
        (None, _) => (text, ""),
    };
    match keyword {
        "let" => parse_assign(content),
        "if" => parse_cond_goto(content),
        "input" => parse_input(content),
        "print" => parse_output(content),
        other => Err(SyntaxError::UnknownKeyword(other.to_string())),
    }
}

fn parse_assign(content: &str) -> Result<Stmt, SyntaxError> {
    let (name, expression) = split_first(content, "=", QUOTE);
    let name = name
        .ok_or(SyntaxError::MissingAssignmentOperator)?
        .trim();
    if name.is_empty() {
        return Err(SyntaxError::MissingVariableName);
    }
    let name = validate_name(name)?;

    let expression = expression.trim();
    if expression.is_empty() {
        return Err(SyntaxError::MissingExpression);
    }
    Ok(Stmt::Assign {
        name,
        value: parse_expression(expression)?,
    })
}

fn parse_cond_goto(content: &str) -> Result<Stmt, SyntaxError> {
    let (condition, target) = split_first(content, "goto", QUOTE);
    let condition = condition.ok_or(SyntaxError::MissingGoto)?;
    let condition = parse_expression(condition.trim())?;

    let target = target.trim();
    if target.is_empty() {
        return Err(SyntaxError::MissingGotoTarget);
    }
    Ok(Stmt::CondGoto {
        condition,
        target: target.to_string(),
    })
}

fn parse_input(content: &str) -> Result<Stmt, SyntaxError> {
    let name = content.trim();
    if name.is_empty() {
        return Err(SyntaxError::MissingVariableName);
    }
    Ok(Stmt::Input {
        name: validate_name(name)?,
    })
}

fn parse_output(content: &str) -> Result<Stmt, SyntaxError> {
    let content = content.trim();
    if content.is_empty() {
        return Ok(Stmt::Output(Vec::new()));
    }

    let (segments, closed) = split_all(content, ',', QUOTE);
    if !closed {
        return Err(SyntaxError::UnclosedQuote);
    }
    let mut items = Vec::with_capacity(segments.len());
    for segment in &segments {
        let segment = segment.trim();
        if segment.is_empty() {
            return Err(SyntaxError::EmptyPrintItem);
        }
        items.push(parse_expression(segment)?);
    }
    Ok(Stmt::Output(items))
}

/// Deepest operator nesting accepted in one expression. Parsing and
/// evaluation both recurse once per level.
pub const MAX_EXPRESSION_DEPTH: usize = 256;

/// Parses an expression by trying, in order, a literal, a binary operation
/// and a variable reference. The first form that parses wins.
pub fn parse_expression(text: &str) -> Result<Expr, SyntaxError> {
    parse_nested(text, 0)
}

fn parse_nested(text: &str, depth: usize) -> Result<Expr, SyntaxError> {
    if depth > MAX_EXPRESSION_DEPTH {
        return Err(SyntaxError::Internal(
            "expression nested too deeply".to_string(),
        ));
    }
    parse_literal(text)
        .or_else(|_| parse_binary(text, depth))
        .or_else(|err| match err {
            SyntaxError::Internal(_) => Err(err),
            _ => parse_reference(text),
        })
        .map_err(|err| match err {
            SyntaxError::Internal(_) => err,
            _ => SyntaxError::UnparsableExpression(text.trim().to_string()),
        })
}

fn parse_literal(text: &str) -> Result<Expr, SyntaxError> {
    let text = text.trim();
    if text.starts_with(QUOTE) && text.ends_with(QUOTE) {
        return Ok(Expr::Literal(Value::text(text.trim_matches(QUOTE))));
    }
    if is_decimal(text) {
        if let Ok(number) = text.parse::<f64>() {
            return Ok(Expr::Literal(Value::number(number)));
        }
    }
    Err(SyntaxError::UnparsableExpression(text.to_string()))
}

/// Digits with at most one decimal point: `1`, `2.5`, `.5`, `5.`.
fn is_decimal(text: &str) -> bool {
    let digits = text.replacen('.', "", 1);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

// Operators are chosen by scan order, then earliest occurrence of that one
// operator. `a < b + c` splits on `+` even though `<` comes first.
fn parse_binary(text: &str, depth: usize) -> Result<Expr, SyntaxError> {
    let (op, pos) = BinaryOp::SCAN_ORDER
        .iter()
        .find_map(|op| text.find(op.symbol()).map(|pos| (*op, pos)))
        .ok_or_else(|| SyntaxError::UnparsableExpression(text.trim().to_string()))?;
    let left = parse_nested(&text[..pos], depth + 1)?;
    let right = parse_nested(&text[pos + op.symbol().len()..], depth + 1)?;
    Ok(Expr::binary(op, left, right))
}

fn parse_reference(text: &str) -> Result<Expr, SyntaxError> {
    validate_name(text).map(Expr::Reference)
}
