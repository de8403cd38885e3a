use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use indoc::indoc;

use super::*;
use crate::engine::{PrintTracer, Verbosity};
use crate::grammar::Step;
use crate::test_utils::{identifier, number, summing, whitespace};

fn nodes<T>(value: Value<'_, T>) -> impl Iterator<Item = T> {
    value.into_list().unwrap_or_default().into_iter().filter_map(Value::into_node)
}

/// `pair = number "," number`, summed.
fn pairs() -> Parser<i64> {
    let mut g = Grammar::<i64>::new();
    g.terminal(whitespace());
    let num = g.terminal(number());
    g.transform(num, |token| token.text().parse().unwrap_or_default());
    let comma = g.terminal(',');
    let pair = g.rule("pair");
    g.define(pair)
        .then(num)
        .then(comma)
        .then(num)
        .on_match(|mut c| c.node(0).unwrap_or_default() + c.node(2).unwrap_or_default());
    Parser::new(g, pair)
}

fn calculator() -> Parser<i64> {
    calculator_with(FuelLimits::new())
}

fn calculator_with(limits: FuelLimits) -> Parser<i64> {
    let mut g = Grammar::<i64>::new();
    g.terminal(whitespace());
    let num = g.terminal(number());
    g.transform(num, |token| token.text().parse().unwrap_or_default());
    let [plus, minus, star, open, close] = ['+', '-', '*', '(', ')'].map(|ch| g.terminal(ch));

    let expr = g.rule("expr");
    let sum_tail = g.rule("sum_tail");
    let signed = g.rule("signed");
    let term = g.rule("term");
    let product_tail = g.rule("product_tail");
    let scaled = g.rule("scaled");
    let factor = g.rule("factor");
    let group = g.rule("group");

    g.define(expr).then(term).then(sum_tail).on_match(|mut c| {
        let first = c.node(0).unwrap_or_default();
        first + nodes(c.take(1)).sum::<i64>()
    });
    g.define(sum_tail).cyclic_or([signed]);
    g.define(signed).or([plus, minus]).then(term).on_match(|mut c| {
        let value = c.node(1).unwrap_or_default();
        match c.token(0).map(|token| token.text()) {
            Some("-") => -value,
            _ => value,
        }
    });
    g.define(term).then(factor).then(product_tail).on_match(|mut c| {
        let first = c.node(0).unwrap_or_default();
        first * nodes(c.take(1)).product::<i64>()
    });
    g.define(product_tail).cyclic_or([scaled]);
    g.define(scaled)
        .then(star)
        .then(factor)
        .on_match(|mut c| c.node(1).unwrap_or_default());
    g.define(factor).or([Step::from(num), Step::from(group)]);
    g.define(group)
        .then(open)
        .then(expr)
        .then(close)
        .on_match(|mut c| c.node(1).unwrap_or_default());
    Parser::builder(g, expr).limits(limits).build()
}

fn messages(diagnostics: &Diagnostics) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn separated_list() {
    let parser = summing();

    let parse = parser.parse("1, 2, 3").unwrap();

    assert!(parse.is_ok());
    assert_eq!(parse.into_value().and_then(Value::into_node), Some(6));
}

#[test]
fn separated_list_needs_an_item() {
    let parser = summing();

    let parse = parser.parse("").unwrap();

    assert!(parse.value().is_none());
    insta::assert_snapshot!(messages(parse.diagnostics()), @"error at 0..0: unexpected end of input; expected number");
}

#[test]
fn optional_list_accepts_empty_input() {
    let mut g = Grammar::<()>::new();
    let a = g.terminal('a');
    let comma = g.terminal(',');
    let list = g.rule("list");
    g.define(list).optional_separator(a, comma);
    let parser = Parser::new(g, list);

    let parse = parser.parse("").unwrap();

    assert!(parse.is_ok());
    assert_eq!(parse.value().and_then(Value::as_list).map(<[_]>::len), Some(0));
}

#[test]
fn list_without_action_keeps_tokens() {
    let mut g = Grammar::<()>::new();
    let a = g.terminal(identifier());
    let comma = g.terminal(',');
    let list = g.rule("list");
    g.define(list).repeat_separator(a, comma);
    let parser = Parser::new(g, list);

    let parse = parser.parse("x,y").unwrap();

    let texts: Vec<_> = parse
        .into_value()
        .and_then(Value::into_list)
        .unwrap_or_default()
        .into_iter()
        .filter_map(Value::into_token)
        .map(|token| token.text())
        .collect();
    assert_eq!(texts, ["x", "y"]);
}

#[test]
fn single_step_rule_passes_value_through() {
    let mut g = Grammar::<()>::new();
    let ident = g.terminal(identifier());
    let outer = g.rule("outer");
    let inner = g.rule("inner");
    g.define(outer).then(inner);
    g.define(inner).then(ident);
    let parser = Parser::new(g, outer);

    let parse = parser.parse("name").unwrap();

    let token = parse.value().and_then(Value::as_token).copied().unwrap();
    assert_eq!(token.text(), "name");
    assert_eq!(token.captured(), Some("name"));
}

#[test]
fn nested_expressions() {
    let parser = calculator();

    let parse = parser.parse("2 * (3 + 4) - 1").unwrap();

    assert!(parse.is_ok());
    assert_eq!(parse.into_value().and_then(Value::into_node), Some(13));
}

#[test]
fn deep_nesting() {
    let parser = calculator();
    let text = format!("{}1{}", "(".repeat(40), ")".repeat(40));

    let parse = parser.parse(&text).unwrap();

    assert_eq!(parse.into_value().and_then(Value::into_node), Some(1));
}

#[test]
fn nesting_is_unbounded_by_default() {
    let parser = calculator();
    assert_eq!(parser.limits().get_recursion_limit(), None);
    let text = format!("{}1{}", "(".repeat(300), ")".repeat(300));

    let value = std::thread::Builder::new()
        .stack_size(64 << 20)
        .spawn(move || parser.parse(&text).unwrap().into_value().and_then(Value::into_node))
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(value, Some(1));
}

#[test]
fn recursion_limit_caps_nesting() {
    let parser = calculator_with(FuelLimits::new().recursion_limit(64));
    let shallow = format!("{}1{}", "(".repeat(10), ")".repeat(10));
    let deep = format!("{}1{}", "(".repeat(20), ")".repeat(20));

    assert_eq!(parser.parse(&shallow).unwrap().into_value().and_then(Value::into_node), Some(1));
    let err = parser.parse(&deep).unwrap_err();
    assert!(matches!(err, Error::RecursionLimitExceeded));
}

#[test]
fn long_list_parses_without_a_fuel_cap() {
    let parser = summing();
    let text = format!("{}1", "1,".repeat(600_000));

    let parse = parser.parse(&text).unwrap();

    assert_eq!(parse.into_value().and_then(Value::into_node), Some(600_001));
}

#[test]
fn exec_fuel_is_configurable() {
    let mut g = Grammar::<()>::new();
    let a = g.terminal('a');
    let comma = g.terminal(',');
    let list = g.rule("list");
    g.define(list).repeat_separator(a, comma);
    let parser = Parser::builder(g, list).exec_fuel(4).build();

    assert_eq!(parser.limits().get_exec_fuel(), Some(4));
    assert!(parser.parse("a").is_ok());
    let err = parser.parse("a,a,a").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"execution limit exceeded");
}

#[test]
fn actions_run_only_on_the_winning_branch() {
    let losing = Arc::new(AtomicUsize::new(0));
    let winning = Arc::new(AtomicUsize::new(0));

    let mut g = Grammar::<()>::new();
    g.terminal(whitespace());
    let [a, b, c] = ['a', 'b', 'c'].map(|ch| g.terminal(ch));
    let ab = g.rule("ab");
    let ac = g.rule("ac");
    let r = g.rule("r");
    let counter = Arc::clone(&losing);
    g.define(ab).then(a).then(b).on_match(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let counter = Arc::clone(&winning);
    g.define(ac).then(a).then(c).on_match(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    g.define(r).or([ab, ac]);
    let parser = Parser::new(g, r);

    let parse = parser.parse("a c").unwrap();

    assert!(parse.is_ok());
    assert_eq!(losing.load(Ordering::SeqCst), 0);
    assert_eq!(winning.load(Ordering::SeqCst), 1);
}

#[test]
fn lexical_errors_skip_evaluation() {
    let calls = Arc::new(AtomicUsize::new(0));

    let mut g = Grammar::<()>::new();
    let num = g.terminal(number());
    let counter = Arc::clone(&calls);
    g.transform(num, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let r = g.rule("r");
    g.define(r).then(num);
    let parser = Parser::new(g, r);

    let parse = parser.parse("1?").unwrap();

    assert!(parse.value().is_none());
    assert!(parse.diagnostics().has_lexical_errors());
    assert_eq!(parse.diagnostics().len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn error_at_furthest_failure() {
    let parser = pairs();

    let parse = parser.parse("1,,").unwrap();

    assert!(parse.value().is_none());
    insta::assert_snapshot!(messages(parse.diagnostics()), @"error at 2..3: unexpected `,`, expected number");
    let diag = parse.diagnostics().get(0).unwrap();
    assert_eq!(diag.kind(), DiagnosticKind::UnexpectedSymbol);
    assert_eq!(diag.text(), ",");
    assert_eq!(diag.expected().len(), 1);
}

#[test]
fn unexpected_end() {
    let parser = pairs();

    let parse = parser.parse("1,").unwrap();

    insta::assert_snapshot!(messages(parse.diagnostics()), @"error at 2..2: unexpected end of input; expected number");
    assert_eq!(parse.diagnostics().get(0).unwrap().kind(), DiagnosticKind::UnexpectedEnd);
}

#[test]
fn trailing_symbols_are_reported_and_recovered() {
    let parser = pairs();

    let parse = parser.parse("1,2 , 3,4").unwrap();

    assert_eq!(parse.value().and_then(Value::as_node), Some(&3));
    let recovered: Vec<_> = parse.recovered().iter().filter_map(Value::as_node).collect();
    assert_eq!(recovered, [&7]);
    insta::assert_snapshot!(messages(parse.diagnostics()), @"error at 4..5: unexpected `,`");
}

#[test]
fn one_error_per_rejected_run() {
    let parser = pairs();

    let parse = parser.parse("1,2 , , 3,4 5 6,7").unwrap();

    let recovered: Vec<_> = parse.recovered().iter().filter_map(Value::as_node).collect();
    assert_eq!(recovered, [&7, &13]);
    insta::assert_snapshot!(messages(parse.diagnostics()), @r"
    error at 4..5: unexpected `,`
    error at 12..13: unexpected `5`
    ");
}

#[test]
fn recovery_at_start() {
    let parser = pairs();

    let parse = parser.parse(", 1,2").unwrap();

    assert!(parse.value().is_none());
    let recovered: Vec<_> = parse.recovered().iter().filter_map(Value::as_node).collect();
    assert_eq!(recovered, [&3]);
    insta::assert_snapshot!(messages(parse.diagnostics()), @"error at 0..1: unexpected `,`, expected number");
}

#[test]
fn compiles_once() {
    let parser = summing();
    assert!(!parser.is_compiled());

    let first = parser.compile().unwrap();
    let second = parser.compile().unwrap();

    assert!(std::ptr::eq(first, second));
    assert!(parser.is_compiled());
}

#[test]
fn grammar_error_is_returned_by_every_call() {
    let mut g = Grammar::<()>::new();
    let r = g.rule("r");
    let parser = Parser::new(g, r);

    assert!(matches!(parser.compile(), Err(Error::Grammar(GrammarError::EmptyRule { .. }))));
    let err = parser.parse("").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"rule `r` has no steps");
    assert!(parser.symbolize("").is_err());
}

#[test]
fn parse_traced_records_rules() {
    let mut g = Grammar::<()>::new();
    let num = g.terminal(number());
    let comma = g.terminal(',');
    let list = g.rule("list");
    let item = g.rule("item");
    g.define(list).repeat_separator(item, comma);
    g.define(item).then(num);
    let parser = Parser::new(g, list);
    let text = "1,2";

    let compiled = parser.compile().unwrap();
    let mut tracer = PrintTracer::new(text, compiled, Verbosity::Default);
    parser.parse_traced(text, &mut tracer).unwrap();

    assert_eq!(
        tracer.lines().join("\n"),
        indoc! {"
            > list @0
              > item @0
              < item @1
              > item @2
              < item @3
            < list @3"}
    );
}

#[test]
fn shared_across_threads() {
    let parser = &summing();

    let sums: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = ["1,2", "3,4,5"]
            .into_iter()
            .map(|text| s.spawn(move || parser.parse(text).unwrap().into_value().and_then(Value::into_node)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sums, [Some(3), Some(12)]);
}

#[test]
fn debug_shows_compile_state() {
    let parser = summing();

    insta::assert_snapshot!(format!("{parser:?}"), @r#"Parser { grammar: Grammar { terminals: 3, rules: ["list"], errors: [] }, root: R0, limits: FuelLimits { exec_fuel: None, recursion_limit: None }, compiled: false }"#);
}
