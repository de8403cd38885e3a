//! Tracing infrastructure for debugging rule evaluation.
//!
//! The evaluator is generic over [`Tracer`]. With [`NoopTracer`] every hook is
//! an empty `#[inline(always)]` function and compiles away. [`PrintTracer`]
//! resolves names through the compiled grammar and collects one line per
//! event.

use crate::compile::CompiledGrammar;
use crate::grammar::RuleId;
use crate::symbolize::Symbol;
use crate::terminal::TerminalId;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Rule entry and exit, guard trips.
    #[default]
    Default,
    /// Also terminal matches with their text, and backtracks.
    Verbose,
    /// Also terminal misses.
    VeryVerbose,
}

/// Evaluator instrumentation.
///
/// Positions are symbol indices. Methods receive raw data; formatting and name
/// resolution happen in the implementation.
pub trait Tracer {
    /// Called when a rule is entered.
    fn trace_enter_rule(&mut self, rule: RuleId, position: usize);

    /// Called when a rule returns; `position` is where it left the cursor.
    fn trace_exit_rule(&mut self, rule: RuleId, matched: bool, position: usize);

    /// Called when a terminal reference consumes `symbol`.
    fn trace_terminal_match(&mut self, terminal: TerminalId, symbol: &Symbol);

    /// Called when a terminal reference does not accept the lookahead.
    fn trace_terminal_miss(&mut self, terminal: TerminalId, found: Option<&Symbol>);

    /// Called when the recursion guard rejects a re-entry.
    fn trace_guard_trip(&mut self, rule: RuleId, position: usize);

    /// Called when a partial match is abandoned and the cursor moves back.
    fn trace_backtrack(&mut self, rule: RuleId, from: usize, to: usize);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_enter_rule(&mut self, _rule: RuleId, _position: usize) {}

    #[inline(always)]
    fn trace_exit_rule(&mut self, _rule: RuleId, _matched: bool, _position: usize) {}

    #[inline(always)]
    fn trace_terminal_match(&mut self, _terminal: TerminalId, _symbol: &Symbol) {}

    #[inline(always)]
    fn trace_terminal_miss(&mut self, _terminal: TerminalId, _found: Option<&Symbol>) {}

    #[inline(always)]
    fn trace_guard_trip(&mut self, _rule: RuleId, _position: usize) {}

    #[inline(always)]
    fn trace_backtrack(&mut self, _rule: RuleId, _from: usize, _to: usize) {}
}

/// Tracer that collects a readable evaluation trace.
pub struct PrintTracer<'a> {
    /// Source text, for symbol text.
    source: &'a str,
    /// Name lookup.
    grammar: &'a CompiledGrammar,
    verbosity: Verbosity,
    lines: Vec<String>,
    depth: usize,
}

impl<'a> PrintTracer<'a> {
    pub fn new(source: &'a str, grammar: &'a CompiledGrammar, verbosity: Verbosity) -> Self {
        Self {
            source,
            grammar,
            verbosity,
            lines: Vec::new(),
            depth: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Print all trace lines.
    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
    }

    fn rule_name(&self, rule: RuleId) -> &str {
        self.grammar.rule_name(rule).unwrap_or("?")
    }

    fn push(&mut self, line: String) {
        self.lines.push(format!("{:indent$}{line}", "", indent = self.depth * 2));
    }
}

impl Tracer for PrintTracer<'_> {
    fn trace_enter_rule(&mut self, rule: RuleId, position: usize) {
        let line = format!("> {} @{position}", self.rule_name(rule));
        self.push(line);
        self.depth += 1;
    }

    fn trace_exit_rule(&mut self, rule: RuleId, matched: bool, position: usize) {
        self.depth = self.depth.saturating_sub(1);
        let line = if matched {
            format!("< {} @{position}", self.rule_name(rule))
        } else {
            format!("x {}", self.rule_name(rule))
        };
        self.push(line);
    }

    fn trace_terminal_match(&mut self, terminal: TerminalId, symbol: &Symbol) {
        if self.verbosity < Verbosity::Verbose {
            return;
        }
        let text = symbol.raw_text(self.source);
        let line = format!("= {} {text:?}", self.grammar.terminal_name(terminal));
        self.push(line);
    }

    fn trace_terminal_miss(&mut self, terminal: TerminalId, found: Option<&Symbol>) {
        if self.verbosity < Verbosity::VeryVerbose {
            return;
        }
        let found = match found {
            Some(symbol) => self.grammar.terminal_name(symbol.terminal()),
            None => "end of input",
        };
        let line = format!("~ {} (found {found})", self.grammar.terminal_name(terminal));
        self.push(line);
    }

    fn trace_guard_trip(&mut self, rule: RuleId, position: usize) {
        let line = format!("! {} @{position} re-entered too often", self.rule_name(rule));
        self.push(line);
    }

    fn trace_backtrack(&mut self, rule: RuleId, from: usize, to: usize) {
        if self.verbosity < Verbosity::Verbose {
            return;
        }
        let line = format!("<< {} {from} -> {to}", self.rule_name(rule));
        self.push(line);
    }
}
