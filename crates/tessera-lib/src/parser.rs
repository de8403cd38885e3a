//! The phase driver: compile once, then symbolize and evaluate per call.

use std::sync::OnceLock;

use rowan::{TextRange, TextSize};

use crate::compile::{self, CompiledGrammar};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::engine::{Evaluator, FuelLimits, NoopTracer, SymbolCursor, Tracer};
use crate::engine::{Furthest, Resolver};
use crate::grammar::{Grammar, GrammarError, RuleId, Value};
use crate::symbolize::{self, Symbol, SymbolStream};
use crate::terminal::TerminalId;
use crate::{Error, Result};

/// A grammar bound to its root rule.
///
/// Compilation happens on first use and is kept for the parser's lifetime.
/// Every parse call owns its cursor, diagnostics and guard state, so a
/// compiled parser can be shared across threads.
pub struct Parser<T> {
    grammar: Grammar<T>,
    root: RuleId,
    limits: FuelLimits,
    compiled: OnceLock<std::result::Result<CompiledGrammar, GrammarError>>,
}

/// Builder for [`Parser`] instances.
pub struct ParserBuilder<T> {
    grammar: Grammar<T>,
    root: RuleId,
    limits: FuelLimits,
}

impl<T> ParserBuilder<T> {
    pub fn new(grammar: Grammar<T>, root: RuleId) -> Self {
        Self {
            grammar,
            root,
            limits: FuelLimits::default(),
        }
    }

    /// Set the fuel limits.
    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Cap rule and terminal attempts per parse.
    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.limits = self.limits.exec_fuel(fuel);
        self
    }

    /// Cap rule nesting depth.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.limits = self.limits.recursion_limit(limit);
        self
    }

    pub fn build(self) -> Parser<T> {
        Parser {
            grammar: self.grammar,
            root: self.root,
            limits: self.limits,
            compiled: OnceLock::new(),
        }
    }
}

/// Result of a parse: the primary value, values matched after error
/// recovery, and every input error found on the way.
#[derive(Debug)]
pub struct Parse<'s, T> {
    value: Option<Value<'s, T>>,
    recovered: Vec<Value<'s, T>>,
    diagnostics: Diagnostics,
}

impl<'s, T> Parse<'s, T> {
    /// Value of the root match at the start of the input. `None` if the root
    /// did not match there, or symbolization failed.
    pub fn value(&self) -> Option<&Value<'s, T>> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<Value<'s, T>> {
        self.value
    }

    /// Root matches found after skipping rejected symbols.
    pub fn recovered(&self) -> &[Value<'s, T>] {
        &self.recovered
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn is_ok(&self) -> bool {
        self.value.is_some() && self.diagnostics.is_empty()
    }

    pub fn into_parts(self) -> (Option<Value<'s, T>>, Vec<Value<'s, T>>, Diagnostics) {
        (self.value, self.recovered, self.diagnostics)
    }
}

impl<T> Parser<T> {
    pub fn new(grammar: Grammar<T>, root: RuleId) -> Self {
        ParserBuilder::new(grammar, root).build()
    }

    pub fn builder(grammar: Grammar<T>, root: RuleId) -> ParserBuilder<T> {
        ParserBuilder::new(grammar, root)
    }

    pub fn grammar(&self) -> &Grammar<T> {
        &self.grammar
    }

    pub fn root(&self) -> RuleId {
        self.root
    }

    pub fn limits(&self) -> FuelLimits {
        self.limits
    }

    /// Compiles the grammar, or returns the artifact (or error) of the first
    /// compile.
    pub fn compile(&self) -> Result<&CompiledGrammar> {
        self.compiled
            .get_or_init(|| compile::compile(&self.grammar, self.root))
            .as_ref()
            .map_err(|err| Error::Grammar(err.clone()))
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    pub fn symbolize<'s>(&self, text: &'s str) -> Result<SymbolStream<'s>> {
        let compiled = self.compile()?;
        Ok(self.symbolize_with(compiled, text))
    }

    pub fn parse<'s>(&self, text: &'s str) -> Result<Parse<'s, T>> {
        self.parse_traced(text, &mut NoopTracer)
    }

    pub fn parse_traced<'s, TR: Tracer>(&self, text: &'s str, tracer: &mut TR) -> Result<Parse<'s, T>> {
        let compiled = self.compile()?;
        let stream = self.symbolize_with(compiled, text);
        self.evaluate_with(compiled, stream, tracer)
    }

    /// Renders the compiled grammar.
    pub fn dump(&self) -> Result<String> {
        Ok(self.compile()?.dump())
    }

    pub(crate) fn symbolize_with<'s>(&self, compiled: &CompiledGrammar, text: &'s str) -> SymbolStream<'s> {
        symbolize::symbolize(&self.grammar.terminals, compiled.terminal_order(), text)
    }

    /// Evaluates the root over `stream`, recovering from rejected symbols by
    /// skipping them one at a time.
    pub(crate) fn evaluate_with<'s, TR: Tracer>(
        &self,
        compiled: &CompiledGrammar,
        stream: SymbolStream<'s>,
        tracer: &mut TR,
    ) -> Result<Parse<'s, T>> {
        let source = stream.source();
        let (symbols, mut diagnostics) = stream.into_parts();
        if diagnostics.has_lexical_errors() {
            return Ok(Parse {
                value: None,
                recovered: Vec::new(),
                diagnostics,
            });
        }

        let resolver = Resolver {
            grammar: &self.grammar,
            compiled,
            symbols: &symbols,
            source,
        };
        let mut evaluator = Evaluator::new(compiled, self.limits, tracer);
        let mut cursor = SymbolCursor::new(&symbols);
        let mut value = None;
        let mut recovered = Vec::new();
        let mut first = true;
        // false while inside a run of rejected symbols
        let mut reporting = true;

        loop {
            let start = cursor.position();
            let matched = evaluator.evaluate(self.root, &mut cursor)?;
            let furthest = evaluator.take_furthest();

            let accepted = match matched {
                // after recovery, an empty match would repeat at every symbol
                Some(matched) if first || cursor.position() > start => {
                    cursor.commit();
                    let resolved = resolver.resolve(matched);
                    if first {
                        value = Some(resolved);
                    } else {
                        recovered.push(resolved);
                    }
                    true
                }
                _ => false,
            };
            first = false;

            if accepted {
                if cursor.is_at_end() {
                    break;
                }
                reporting = true;
            }
            if reporting {
                report(&mut diagnostics, compiled, &symbols, source, cursor.position(), furthest);
                reporting = false;
            }
            if cursor.advance().is_none() {
                break;
            }
            cursor.commit();
        }

        Ok(Parse {
            value,
            recovered,
            diagnostics,
        })
    }
}

impl<T> std::fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("grammar", &self.grammar)
            .field("root", &self.root)
            .field("limits", &self.limits)
            .field("compiled", &self.is_compiled())
            .finish()
    }
}

/// Reports the symbol at the furthest failure (or at `position` if nothing
/// failed further on) with the terminals that would have been accepted.
fn report(
    diagnostics: &mut Diagnostics,
    compiled: &CompiledGrammar,
    symbols: &[Symbol],
    source: &str,
    position: usize,
    furthest: Option<Furthest>,
) {
    let (position, expected) = match furthest {
        Some(f) if f.position >= position => (f.position, f.expected),
        _ => (position, Default::default()),
    };
    let expected: Vec<TerminalId> = expected
        .into_iter()
        .filter(|&id| compiled.is_scanned(id))
        .collect();
    let expected_text = describe_expected(compiled, &expected);

    match symbols.get(position) {
        Some(symbol) => {
            let text = symbol.raw_text(source);
            let detail = match &expected_text {
                Some(list) => format!("`{text}`, {list}"),
                None => format!("`{text}`"),
            };
            diagnostics
                .report(DiagnosticKind::UnexpectedSymbol, symbol.range())
                .message(detail)
                .text(text)
                .found(symbol.terminal())
                .expected(expected)
                .emit();
        }
        None => {
            let end = TextRange::empty(TextSize::from(source.len() as u32));
            let builder = diagnostics.report(DiagnosticKind::UnexpectedEnd, end);
            let builder = match expected_text {
                Some(list) => builder.message(list),
                None => builder,
            };
            builder.expected(expected).emit();
        }
    }
}

fn describe_expected(compiled: &CompiledGrammar, expected: &[TerminalId]) -> Option<String> {
    let names: Vec<&str> = expected.iter().map(|&id| compiled.terminal_name(id)).collect();
    match names.as_slice() {
        [] => None,
        [only] => Some(format!("expected {only}")),
        [init @ .., last] => Some(format!("expected {} or {last}", init.join(", "))),
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod parser_tests;
