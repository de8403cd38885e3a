use indoc::indoc;
use tessera_lib::{DiagnosticKind, FuelLimits};

use super::*;

fn parse_program(text: &str) -> Program {
    let parser = parser(FuelLimits::default()).unwrap();
    let parse = parser.parse(text).unwrap();
    assert!(parse.is_ok(), "{:?}", parse.diagnostics());
    parse
        .into_value()
        .and_then(|value| value.into_node())
        .and_then(Node::into_program)
        .unwrap()
}

fn run(text: &str) -> Result<Vec<String>, EvalError> {
    evaluate(&parse_program(text))
}

#[test]
fn grammar_compiles() {
    let parser = parser(FuelLimits::default()).unwrap();

    assert!(parser.compile().is_ok());
}

#[test]
fn multiplication_binds_tighter() {
    let program = parse_program("let x = 1 + 2 * 3;");

    insta::assert_snapshot!(
        serde_json::to_string(&program).unwrap(),
        @r#"{"statements":[{"kind":"let","name":"x","value":{"kind":"binary","op":"add","lhs":{"kind":"number","digits":"1"},"rhs":{"kind":"binary","op":"mul","lhs":{"kind":"number","digits":"2"},"rhs":{"kind":"number","digits":"3"}}}}]}"#
    );
}

#[test]
fn operators_associate_left() {
    let program = parse_program("print 10 - 3 - 2;");

    let expected = Expr::binary(
        BinaryOp::Sub,
        Expr::binary(BinaryOp::Sub, Expr::number("10"), Expr::number("3")),
        Expr::number("2"),
    );
    assert_eq!(program.statements, [Stmt::Print { args: vec![expected] }]);
    assert_eq!(run("print 10 - 3 - 2, 24 / 4 / 2;").unwrap(), ["5 3"]);
}

#[test]
fn groups_and_negation() {
    assert_eq!(run("print -(1 + 2) * 3, 2 - -2;").unwrap(), ["-9 4"]);
}

#[test]
fn nested_groups() {
    assert_eq!(run("print ((((7))));").unwrap(), ["7"]);
}

#[test]
fn bindings_and_comments() {
    let source = indoc! {"
        // squares
        let x = 4;
        let y = x * x; // sixteen
        print x, y;
        print y - x;
    "};

    assert_eq!(run(source).unwrap(), ["4 16", "12"]);
}

#[test]
fn keyword_prefix_is_identifier() {
    let program = parse_program("let letter = 1; print letter;");

    assert_eq!(
        program.statements[0],
        Stmt::Let {
            name: "letter".to_owned(),
            value: Expr::number("1"),
        }
    );
}

#[test]
fn empty_program() {
    assert_eq!(parse_program("  // nothing\n"), Program::default());
}

#[test]
fn evaluation_errors() {
    assert_eq!(run("print y;"), Err(EvalError::UndefinedVariable("y".to_owned())));
    assert_eq!(run("print 1 / (2 - 2);"), Err(EvalError::DivisionByZero));
    assert_eq!(
        run("print 99999999999999999999;"),
        Err(EvalError::NumberOutOfRange("99999999999999999999".to_owned()))
    );
    assert_eq!(run("print 9223372036854775807 + 1;"), Err(EvalError::Overflow));
}

#[test]
fn missing_operand_is_reported() {
    let parser = parser(FuelLimits::default()).unwrap();
    let parse = parser.parse("let x = ;").unwrap();

    assert_eq!(parse.diagnostics().len(), 1);
    let diag = parse.diagnostics().get(0).unwrap();
    assert_eq!(diag.kind(), DiagnosticKind::UnexpectedSymbol);
    assert_eq!(usize::from(diag.range().start()), 8);
    assert!(diag.to_string().starts_with("error at 8..9: unexpected `;`"));
}

#[test]
fn recovers_after_stray_symbol() {
    let parser = parser(FuelLimits::default()).unwrap();
    let parse = parser.parse("print 1; oops print 2;").unwrap();

    let (value, recovered, diagnostics) = parse.into_parts();
    let program = value.and_then(|v| v.into_node()).and_then(Node::into_program).unwrap();
    assert_eq!(program.statements.len(), 1);
    assert_eq!(recovered.len(), 1);
    assert_eq!(diagnostics.len(), 1);
    let diag = diagnostics.get(0).unwrap();
    assert_eq!(diag.text(), "oops");
    assert_eq!(usize::from(diag.range().start()), 9);
}

#[test]
fn unrecognized_text_stops_evaluation() {
    let parser = parser(FuelLimits::default()).unwrap();
    let parse = parser.parse("print 1 # 2;").unwrap();

    assert!(parse.value().is_none());
    insta::assert_snapshot!(
        parse.diagnostics().get(0).unwrap().to_string(),
        @"error at 8..9: unrecognized text `#`"
    );
}
