use tinylang::{
    ast::{BinaryOp, Expr, Stmt},
    diagnostics::{NameRule, SyntaxError},
    lexer::{split_all, split_first},
    names::validate_name,
    parser::{parse_expression, parse_line, parse_statement, ParsedLine, MAX_EXPRESSION_DEPTH},
    program::{load, Labels, LineIndex, LoadMode, Program},
    Value,
};

fn reference(name: &str) -> Expr {
    Expr::Reference(name.to_string())
}

fn number(value: f64) -> Expr {
    Expr::Literal(Value::number(value))
}

fn text(value: &str) -> Expr {
    Expr::Literal(Value::text(value))
}

fn illegal_name_rule(result: Result<String, SyntaxError>) -> NameRule {
    match result {
        Err(SyntaxError::IllegalName { rule, .. }) => rule,
        other => panic!("expected an illegal name error, got {other:?}"),
    }
}

#[test]
fn split_all_keeps_quoted_separators() {
    let (segments, closed) = split_all(r#"abc, acd, a"aa"bb, a"a,a,a"cc"#, ',', '"');
    assert_eq!(segments, vec!["abc", " acd", r#" a"aa"bb"#, r#" a"a,a,a"cc"#]);
    assert!(closed);
}

#[test]
fn split_all_reports_unclosed_quote() {
    let (segments, closed) = split_all(r#"abc, acd, a"aa"bb, a"a,a,a, cc"#, ',', '"');
    assert_eq!(segments, vec!["abc", " acd", r#" a"aa"bb"#, r#" a"a,a,a, cc"#]);
    assert!(!closed);
}

#[test]
fn split_all_of_empty_text_is_one_empty_segment() {
    let (segments, closed) = split_all("", ',', '"');
    assert_eq!(segments, vec![""]);
    assert!(closed);
}

#[test]
fn split_first_skips_quoted_separators() {
    let (head, tail) = split_first(r#"abcbc"ac,cd,",ab,acb,"b""#, ",", '"');
    assert_eq!(head, Some(r#"abcbc"ac,cd,""#));
    assert_eq!(tail, r#"ab,acb,"b""#);
}

#[test]
fn split_first_unterminated_quote_swallows_rest() {
    let (head, tail) = split_first(r#"abcbc"ac,cdb"#, ",", '"');
    assert_eq!(head, None);
    assert_eq!(tail, r#"abcbc"ac,cdb"#);
}

#[test]
fn split_first_accepts_word_separators() {
    let (head, tail) = split_first("n > 0 goto loop", "goto", '"');
    assert_eq!(head, Some("n > 0 "));
    assert_eq!(tail, " loop");
}

#[test]
fn split_first_without_separator_returns_text() {
    assert_eq!(split_first("print", " ", '"'), (None, "print"));
}

#[test]
fn validate_name_trims_legal_names() {
    assert_eq!(validate_name("  count\t").unwrap(), "count");
    assert_eq!(validate_name("_x9").unwrap(), "_x9");
}

#[test]
fn validate_name_rejects_each_rule() {
    assert_eq!(illegal_name_rule(validate_name("   ")), NameRule::Empty);
    assert_eq!(illegal_name_rule(validate_name("1abc")), NameRule::LeadingDigit);
    assert_eq!(illegal_name_rule(validate_name("a b")), NameRule::Whitespace);
    assert_eq!(illegal_name_rule(validate_name("a,b")), NameRule::Punctuation);
    assert_eq!(illegal_name_rule(validate_name("a:b")), NameRule::Punctuation);
    assert_eq!(illegal_name_rule(validate_name("a\"b")), NameRule::Punctuation);
    assert_eq!(illegal_name_rule(validate_name("a!b")), NameRule::Punctuation);
    assert_eq!(illegal_name_rule(validate_name("a+b")), NameRule::Operator);
    assert_eq!(illegal_name_rule(validate_name("a<b")), NameRule::Operator);
    assert_eq!(illegal_name_rule(validate_name("a=b")), NameRule::Operator);
}

#[test]
fn parses_literals() {
    assert_eq!(parse_expression(r#" "hello" "#).unwrap(), text("hello"));
    assert_eq!(parse_expression("42").unwrap(), number(42.0));
    assert_eq!(parse_expression("3.5").unwrap(), number(3.5));
    assert_eq!(parse_expression(".5").unwrap(), number(0.5));
}

#[test]
fn rejects_malformed_numbers() {
    assert_eq!(
        parse_expression("1.2.3"),
        Err(SyntaxError::UnparsableExpression("1.2.3".to_string()))
    );
}

#[test]
fn longer_operators_are_not_shadowed() {
    assert_eq!(
        parse_expression("x <= 3").unwrap(),
        Expr::binary(BinaryOp::LessEqual, reference("x"), number(3.0))
    );
    assert_eq!(
        parse_expression("x != y").unwrap(),
        Expr::binary(BinaryOp::NotEqual, reference("x"), reference("y"))
    );
}

#[test]
fn operator_selection_follows_scan_order_not_position() {
    // `<` occurs first in the text, but `+` is scanned before `<`.
    assert_eq!(
        parse_expression("a < b + c").unwrap(),
        Expr::binary(
            BinaryOp::Add,
            Expr::binary(BinaryOp::Less, reference("a"), reference("b")),
            reference("c"),
        )
    );
}

#[test]
fn repeated_operator_splits_at_first_occurrence() {
    assert_eq!(
        parse_expression("10 - 4 - 3").unwrap(),
        Expr::binary(
            BinaryOp::Sub,
            number(10.0),
            Expr::binary(BinaryOp::Sub, number(4.0), number(3.0)),
        )
    );
}

#[test]
fn quoted_ends_win_over_operators() {
    assert_eq!(
        parse_expression(r#""a" + "b""#).unwrap(),
        text(r#"a" + "b"#)
    );
}

#[test]
fn parses_each_statement_kind() {
    assert_eq!(
        parse_statement("let x = 1").unwrap(),
        Stmt::Assign {
            name: "x".into(),
            value: number(1.0)
        }
    );
    assert_eq!(
        parse_statement("if x > 0 goto loop").unwrap(),
        Stmt::CondGoto {
            condition: Expr::binary(BinaryOp::Greater, reference("x"), number(0.0)),
            target: "loop".into(),
        }
    );
    assert_eq!(
        parse_statement("input  answer ").unwrap(),
        Stmt::Input {
            name: "answer".into()
        }
    );
    assert_eq!(
        parse_statement(r#"print "a,b", x"#).unwrap(),
        Stmt::Output(vec![text("a,b"), reference("x")])
    );
    assert_eq!(parse_statement("print").unwrap(), Stmt::Output(Vec::new()));
}

#[test]
fn reports_malformed_statements() {
    let cases = [
        ("jump x", SyntaxError::UnknownKeyword("jump".into())),
        ("let x", SyntaxError::MissingAssignmentOperator),
        ("let = 1", SyntaxError::MissingVariableName),
        ("let x =", SyntaxError::MissingExpression),
        ("if x", SyntaxError::MissingGoto),
        ("if x goto", SyntaxError::MissingGotoTarget),
        ("input", SyntaxError::MissingVariableName),
        (r#"print "abc"#, SyntaxError::UnclosedQuote),
        ("print a,,b", SyntaxError::EmptyPrintItem),
        ("let x = 1 +", SyntaxError::UnparsableExpression("1 +".into())),
    ];
    for (source, expected) in cases {
        assert_eq!(parse_statement(source), Err(expected), "source: {source}");
    }
    assert_eq!(
        parse_statement("let 1x = 2"),
        Err(SyntaxError::IllegalName {
            name: "1x".into(),
            rule: NameRule::LeadingDigit
        })
    );
}

#[test]
fn parses_labels_and_statements() {
    assert_eq!(
        parse_line("loop: let n = n - 1").unwrap(),
        ParsedLine {
            label: Some("loop".into()),
            statement: Some(Stmt::Assign {
                name: "n".into(),
                value: Expr::binary(BinaryOp::Sub, reference("n"), number(1.0)),
            }),
        }
    );
    assert_eq!(
        parse_line("end:").unwrap(),
        ParsedLine {
            label: Some("end".into()),
            statement: None
        }
    );
    assert!(parse_line("   ").unwrap().is_empty());
}

#[test]
fn empty_label_is_ignored() {
    let parsed = parse_line(": print 1").unwrap();
    assert_eq!(parsed.label, None);
    assert_eq!(parsed.statement, Some(Stmt::Output(vec![number(1.0)])));
}

#[test]
fn colon_inside_quotes_is_not_a_label() {
    let parsed = parse_line(r#"print "a:b""#).unwrap();
    assert_eq!(parsed.label, None);
    assert_eq!(parsed.statement, Some(Stmt::Output(vec![text("a:b")])));
}

#[test]
fn script_mode_keeps_blank_lines() {
    let mut program = Program::new();
    let mut labels = Labels::new();
    let appended = load(&mut program, &mut labels, "let x = 1\n\nprint x", LoadMode::Script).unwrap();
    assert_eq!(appended, 3);
    assert_eq!(program.slot(LineIndex::new(1)), Some(None));
    assert!(program.slot(LineIndex::new(2)).unwrap().is_some());
    let empty: Vec<LineIndex> = program
        .iter()
        .filter(|(_, slot)| slot.is_none())
        .map(|(line, _)| line)
        .collect();
    assert_eq!(empty, vec![LineIndex::new(1)]);
}

#[test]
fn interactive_mode_drops_blank_lines_but_keeps_labels() {
    let mut program = Program::new();
    let mut labels = Labels::new();
    let appended = load(&mut program, &mut labels, "\n   \ntop:\n", LoadMode::Interactive).unwrap();
    assert_eq!(appended, 1);
    assert_eq!(labels.resolve("top"), Some(LineIndex::new(0)));
}

#[test]
fn line_numbers_continue_across_loads() {
    let mut program = Program::new();
    let mut labels = Labels::new();
    load(&mut program, &mut labels, "let x = 1", LoadMode::Interactive).unwrap();
    load(&mut program, &mut labels, "again: print x", LoadMode::Interactive).unwrap();
    assert_eq!(program.len(), 2);
    assert_eq!(labels.resolve("again"), Some(LineIndex::new(1)));
}

#[test]
fn later_label_definition_wins() {
    let mut program = Program::new();
    let mut labels = Labels::new();
    load(&mut program, &mut labels, "a: print 1\na: print 2", LoadMode::Script).unwrap();
    assert_eq!(labels.resolve("a"), Some(LineIndex::new(1)));
    assert_eq!(labels.iter().collect::<Vec<_>>(), vec![("a", LineIndex::new(1))]);
    assert_eq!(labels.len(), 1);
}

#[test]
fn compile_error_stops_load_without_rollback() {
    let mut program = Program::new();
    let mut labels = Labels::new();
    let err = load(
        &mut program,
        &mut labels,
        "let x = 1\nbogus\nprint x",
        LoadMode::Script,
    )
    .unwrap_err();
    assert_eq!(err.line, LineIndex::new(1));
    assert_eq!(err.error, SyntaxError::UnknownKeyword("bogus".into()));
    assert_eq!(program.len(), 1);
    assert_eq!(
        err.to_string(),
        "Syntax error: `bogus` is not a legal keyword (at line 1)"
    );
}

#[test]
fn illegal_label_is_a_compile_error() {
    let mut program = Program::new();
    let mut labels = Labels::new();
    let err = load(&mut program, &mut labels, "9lives: print 1", LoadMode::Script).unwrap_err();
    assert_eq!(err.line, LineIndex::new(0));
    assert!(matches!(
        err.error,
        SyntaxError::IllegalName {
            rule: NameRule::LeadingDigit,
            ..
        }
    ));
    assert!(program.is_empty());
}

#[test]
fn long_operator_chain_is_a_compile_error() {
    let mut program = Program::new();
    let mut labels = Labels::new();
    let source = format!("print 0\nlet x = 1{}", "+1".repeat(10_000));
    let err = load(&mut program, &mut labels, &source, LoadMode::Script).unwrap_err();
    assert_eq!(err.line, LineIndex::new(1));
    assert!(matches!(err.error, SyntaxError::Internal(_)));
    assert_eq!(program.len(), 1);
}

#[test]
fn operator_chain_at_depth_limit_parses() {
    let source = format!("1{}", "+1".repeat(MAX_EXPRESSION_DEPTH));
    assert!(parse_expression(&source).is_ok());

    let source = format!("1{}", "+1".repeat(MAX_EXPRESSION_DEPTH + 1));
    assert_eq!(
        parse_expression(&source),
        Err(SyntaxError::Internal("expression nested too deeply".into()))
    );
}
