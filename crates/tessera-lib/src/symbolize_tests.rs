use super::*;
use crate::grammar::{Grammar, Step};
use crate::parser::Parser;
use crate::terminal::Terminal;
use crate::test_utils::{identifier, whitespace};

/// Symbolizes `text` with a grammar whose root accepts any of `terminals`.
fn scan<'s>(mut g: Grammar<()>, terminals: &[TerminalId], text: &'s str) -> SymbolStream<'s> {
    let root = g.rule("root");
    g.define(root).or(terminals.iter().copied().map(Step::from));
    Parser::new(g, root).symbolize(text).unwrap()
}

fn texts<'s>(stream: &SymbolStream<'s>) -> Vec<&'s str> {
    stream.tokens().map(|token| token.text()).collect()
}

#[test]
fn keyword_needs_word_boundary() {
    let mut g = Grammar::<()>::new();
    g.terminal(whitespace());
    let kw = g.terminal("if");
    let ident = g.terminal(identifier());

    let stream = scan(g, &[kw, ident], "ifdef if x");

    assert!(stream.is_ok());
    assert_eq!(texts(&stream), ["ifdef", "if", "x"]);
    let terminals: Vec<_> = stream.symbols().iter().map(Symbol::terminal).collect();
    assert_eq!(terminals, [ident, kw, ident]);
}

#[test]
fn literal_wins_over_scanner() {
    let mut g = Grammar::<()>::new();
    let ident = g.terminal(identifier());
    let kw = g.terminal("end");

    let stream = scan(g, &[ident, kw], "end");

    assert_eq!(stream.symbols()[0].terminal(), kw);
}

#[test]
fn identifier_with_keyword_prefix() {
    let mut g = Grammar::<()>::new();
    let kw = g.terminal("end");
    let ident = g.terminal(identifier());

    let stream = scan(g, &[kw, ident], "endpoint");

    assert_eq!(stream.len(), 1);
    assert_eq!(stream.symbols()[0].terminal(), ident);
    assert_eq!(stream.symbols()[0].len(), 8);
}

#[test]
fn longest_literal_first() {
    let mut g = Grammar::<()>::new();
    let eq = g.terminal("=");
    let eqeq = g.terminal("==");

    let stream = scan(g, &[eq, eqeq], "===");

    let terminals: Vec<_> = stream.symbols().iter().map(Symbol::terminal).collect();
    assert_eq!(terminals, [eqeq, eq]);
}

#[test]
fn ignored_text_is_skipped() {
    let mut g = Grammar::<()>::new();
    g.terminal(whitespace());
    let ident = g.terminal(identifier());

    let stream = scan(g, &[ident], "  a   b \n");

    let offsets: Vec<_> = stream.symbols().iter().map(Symbol::offset).collect();
    assert_eq!(offsets, [2, 6]);
}

#[test]
fn unrecognized_run_is_one_error() {
    let mut g = Grammar::<()>::new();
    let ident = g.terminal(identifier());

    let stream = scan(g, &[ident], "a!!!b");

    assert_eq!(texts(&stream), ["a", "b"]);
    assert_eq!(stream.diagnostics().len(), 1);
    let diag = stream.diagnostics().get(0).unwrap();
    assert_eq!(diag.kind(), DiagnosticKind::UnrecognizedText);
    assert_eq!(diag.text(), "!!!");
    insta::assert_snapshot!(diag.to_string(), @"error at 1..4: unrecognized text `!!!`");
}

#[test]
fn unrecognized_multibyte_text() {
    let mut g = Grammar::<()>::new();
    let ident = g.terminal(identifier());

    let stream = scan(g, &[ident], "a→b");

    assert_eq!(texts(&stream), ["a", "b"]);
    insta::assert_snapshot!(stream.diagnostics().get(0).unwrap().to_string(), @"error at 1..4: unrecognized text `→`");
}

#[test]
fn ignored_text_splits_error_runs() {
    let mut g = Grammar::<()>::new();
    g.terminal(whitespace());
    let ident = g.terminal(identifier());

    let stream = scan(g, &[ident], "!! ?");

    assert!(stream.is_empty());
    let ranges: Vec<_> = stream
        .diagnostics()
        .iter()
        .map(|d| (usize::from(d.range().start()), usize::from(d.range().end())))
        .collect();
    assert_eq!(ranges, [(0, 2), (3, 4)]);
}

#[test]
fn unreferenced_terminals_are_not_scanned() {
    let mut g = Grammar::<()>::new();
    let a = g.terminal('a');
    g.terminal('b');

    let stream = scan(g, &[a], "ab");

    assert_eq!(stream.len(), 1);
    insta::assert_snapshot!(stream.diagnostics().get(0).unwrap().to_string(), @"error at 1..2: unrecognized text `b`");
}

#[test]
fn extension_is_skipped() {
    let mut g = Grammar::<()>::new();
    g.terminal(whitespace());
    let hash = g.terminal(Terminal::char('#').extend(|rest| rest.find('\n').unwrap_or(rest.len())));
    let ident = g.terminal(identifier());

    let stream = scan(g, &[hash, ident], "# note\nx");

    assert!(stream.is_ok());
    assert_eq!(texts(&stream), ["#", "x"]);
    assert_eq!(stream.symbols()[1].offset(), 7);
}

#[test]
fn literal_symbols_are_not_captured() {
    let source = "let x";
    let mut g = Grammar::<()>::new();
    g.terminal(whitespace());
    let kw = g.terminal("let");
    let ident = g.terminal(identifier());

    let stream = scan(g, &[kw, ident], source);

    let [kw_symbol, ident_symbol] = stream.symbols() else {
        panic!("expected two symbols");
    };
    assert!(!kw_symbol.is_captured());
    assert_eq!(kw_symbol.text(source), None);
    assert_eq!(kw_symbol.raw_text(source), "let");
    assert!(ident_symbol.is_captured());
    assert_eq!(ident_symbol.text(source), Some("x"));
}

#[test]
fn empty_input() {
    let mut g = Grammar::<()>::new();
    g.terminal(whitespace());
    let ident = g.terminal(identifier());

    let stream = scan(g, &[ident], "");

    assert!(stream.is_empty());
    assert!(stream.is_ok());
    assert_eq!(stream.source(), "");
}
