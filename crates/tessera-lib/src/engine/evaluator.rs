//! Backtracking rule evaluation over a symbol cursor.
//!
//! Evaluation only builds a [`Matched`] tree of symbol indices and rule nodes.
//! Values are resolved from it once the driver has settled on a match, so the
//! callbacks of abandoned branches never run.

use indexmap::IndexSet;

use crate::compile::{Branch, CompiledBody, CompiledGrammar, CompiledStep};
use crate::grammar::{Children, Grammar, RuleId, Value};
use crate::symbolize::Symbol;
use crate::terminal::TerminalId;
use crate::{Error, Result};

use super::cursor::SymbolCursor;
use super::trace::Tracer;

/// Re-entries of one rule at an unchanged position before the guard fails
/// the attempt.
///
/// A backstop for grammars that bypass compilation. The compiler rejects left
/// recursion, so a compiled rule never re-enters itself without consuming
/// input and never trips the guard.
pub const MAX_REENTRIES: u32 = 2;

/// Optional caps on evaluation. Both are unbounded unless set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FuelLimits {
    /// Maximum rule and terminal attempts per parse.
    pub(crate) exec_fuel: Option<u32>,
    /// Maximum rule nesting depth.
    pub(crate) recursion_limit: Option<u32>,
}

impl FuelLimits {
    /// Limits with no caps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = Some(fuel);
        self
    }

    /// Set the recursion limit.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = Some(limit);
        self
    }

    pub fn get_exec_fuel(&self) -> Option<u32> {
        self.exec_fuel
    }

    pub fn get_recursion_limit(&self) -> Option<u32> {
        self.recursion_limit
    }
}

/// Unresolved match tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Matched {
    /// Absent optional step.
    Empty,
    /// Index into the symbol sequence.
    Symbol(usize),
    Rule { rule: RuleId, children: Vec<Matched> },
}

/// The furthest position a mandatory step failed at, and what it would have
/// accepted there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Furthest {
    pub position: usize,
    pub expected: IndexSet<TerminalId>,
}

#[derive(Clone, Copy, Debug, Default)]
struct GuardEntry {
    position: Option<usize>,
    reentries: u32,
}

pub(crate) struct Evaluator<'a, 't, TR: Tracer> {
    grammar: &'a CompiledGrammar,
    tracer: &'t mut TR,
    /// Recursion guard, indexed by rule.
    guard: Vec<GuardEntry>,
    depth: u32,
    exec_fuel: Option<u32>,
    limits: FuelLimits,
    furthest: Option<Furthest>,
}

impl<'a, 't, TR: Tracer> Evaluator<'a, 't, TR> {
    pub fn new(grammar: &'a CompiledGrammar, limits: FuelLimits, tracer: &'t mut TR) -> Self {
        Self {
            grammar,
            tracer,
            guard: vec![GuardEntry::default(); grammar.rules.len()],
            depth: 0,
            exec_fuel: limits.exec_fuel,
            limits,
            furthest: None,
        }
    }

    /// Evaluates `rule` at the cursor. On success the cursor is past the match;
    /// on failure it is back where it started.
    pub fn evaluate(&mut self, rule: RuleId, cursor: &mut SymbolCursor<'_>) -> Result<Option<Matched>> {
        self.rule(rule, cursor)
    }

    pub fn take_furthest(&mut self) -> Option<Furthest> {
        self.furthest.take()
    }

    fn burn(&mut self) -> Result<()> {
        match &mut self.exec_fuel {
            Some(0) => Err(Error::ExecFuelExhausted),
            Some(fuel) => {
                *fuel -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn rule(&mut self, id: RuleId, cursor: &mut SymbolCursor<'_>) -> Result<Option<Matched>> {
        self.burn()?;
        let grammar = self.grammar;
        let Some(rule) = grammar.rule(id) else {
            return Ok(None);
        };

        let start = cursor.position();
        let slot = id.index();
        let saved = self.guard[slot];
        let reentries = if saved.position == Some(start) {
            saved.reentries + 1
        } else {
            0
        };
        if reentries > MAX_REENTRIES {
            self.tracer.trace_guard_trip(id, start);
            return Ok(None);
        }
        if self.limits.recursion_limit.is_some_and(|limit| self.depth >= limit) {
            return Err(Error::RecursionLimitExceeded);
        }

        self.depth += 1;
        self.guard[slot] = GuardEntry {
            position: Some(start),
            reentries,
        };
        self.tracer.trace_enter_rule(id, start);

        let children = match &rule.body {
            CompiledBody::Sequence(steps) => self.sequence(id, steps, cursor),
            CompiledBody::Separated {
                item,
                separator,
                allow_empty,
            } => self.separated(id, item, separator, *allow_empty, cursor),
            CompiledBody::Cyclic(step) => self.cyclic(step, cursor).map(Some),
        };

        self.guard[slot] = saved;
        self.depth -= 1;

        let children = children?;
        self.tracer
            .trace_exit_rule(id, children.is_some(), cursor.position());
        Ok(children.map(|children| Matched::Rule { rule: id, children }))
    }

    fn sequence(
        &mut self,
        rule: RuleId,
        steps: &[CompiledStep],
        cursor: &mut SymbolCursor<'_>,
    ) -> Result<Option<Vec<Matched>>> {
        let start = cursor.position();
        let mut children = Vec::with_capacity(steps.len());
        for step in steps {
            match self.step(step, cursor)? {
                Some(matched) => children.push(matched),
                None if step.optional => children.push(Matched::Empty),
                None => {
                    self.expect(step, cursor.position());
                    if cursor.position() > start {
                        self.tracer
                            .trace_backtrack(rule, cursor.position(), start);
                    }
                    cursor.rollback_to(start);
                    return Ok(None);
                }
            }
        }
        Ok(Some(children))
    }

    fn separated(
        &mut self,
        rule: RuleId,
        item: &CompiledStep,
        separator: &CompiledStep,
        allow_empty: bool,
        cursor: &mut SymbolCursor<'_>,
    ) -> Result<Option<Vec<Matched>>> {
        let start = cursor.position();
        let mut items = Vec::new();
        match self.step(item, cursor)? {
            Some(matched) => items.push(matched),
            None if allow_empty => return Ok(Some(items)),
            None => {
                self.expect(item, start);
                return Ok(None);
            }
        }

        loop {
            let before = cursor.position();
            if self.step(separator, cursor)?.is_none() {
                break;
            }
            let after_separator = cursor.position();
            match self.step(item, cursor)? {
                Some(matched) if cursor.position() > before => items.push(matched),
                // neither separator nor item consumed anything
                Some(_) => break,
                None => {
                    self.expect(item, after_separator);
                    if after_separator > before {
                        self.tracer.trace_backtrack(rule, after_separator, before);
                    }
                    cursor.rollback(after_separator - before);
                    break;
                }
            }
        }
        Ok(Some(items))
    }

    fn cyclic(&mut self, step: &CompiledStep, cursor: &mut SymbolCursor<'_>) -> Result<Vec<Matched>> {
        let mut items = Vec::new();
        loop {
            let before = cursor.position();
            match self.step(step, cursor)? {
                Some(matched) if cursor.position() > before => items.push(matched),
                _ => break,
            }
        }
        Ok(items)
    }

    /// Ordered choice over the branches the lookahead can start.
    fn step(&mut self, step: &CompiledStep, cursor: &mut SymbolCursor<'_>) -> Result<Option<Matched>> {
        for &branch in step.candidates(cursor.peek_id()) {
            let matched = match step.branches[branch as usize] {
                Branch::Terminal(id) => self.terminal(id, cursor)?,
                Branch::Rule(rule) => self.rule(rule, cursor)?,
            };
            if matched.is_some() {
                return Ok(matched);
            }
        }
        Ok(None)
    }

    fn terminal(&mut self, id: TerminalId, cursor: &mut SymbolCursor<'_>) -> Result<Option<Matched>> {
        self.burn()?;
        let position = cursor.position();
        match cursor.peek() {
            Some(symbol) if self.grammar.accepts(id, symbol.terminal()) => {
                cursor.advance();
                self.tracer.trace_terminal_match(id, symbol);
                Ok(Some(Matched::Symbol(position)))
            }
            found => {
                self.tracer.trace_terminal_miss(id, found);
                Ok(None)
            }
        }
    }

    fn expect(&mut self, step: &CompiledStep, position: usize) {
        let expected = step.first.iter().copied();
        match &mut self.furthest {
            Some(furthest) if furthest.position > position => {}
            Some(furthest) if furthest.position == position => furthest.expected.extend(expected),
            slot => {
                *slot = Some(Furthest {
                    position,
                    expected: expected.collect(),
                })
            }
        }
    }
}

/// Turns a settled match tree into values, running transforms and match
/// actions bottom-up.
pub(crate) struct Resolver<'a, 's, T> {
    pub grammar: &'a Grammar<T>,
    pub compiled: &'a CompiledGrammar,
    pub symbols: &'a [Symbol],
    pub source: &'s str,
}

impl<'s, T> Resolver<'_, 's, T> {
    pub fn resolve(&self, matched: Matched) -> Value<'s, T> {
        match matched {
            Matched::Empty => Value::Empty,
            Matched::Symbol(index) => {
                let Some(symbol) = self.symbols.get(index) else {
                    return Value::Empty;
                };
                let token = symbol.token(self.source);
                match self.grammar.transform_for(symbol.terminal()) {
                    Some(transform) => Value::Node(transform(token)),
                    None => Value::Token(token),
                }
            }
            Matched::Rule { rule, children } => {
                let mut values: Vec<Value<'s, T>> =
                    children.into_iter().map(|child| self.resolve(child)).collect();
                if let Some(action) = self.grammar.rule_def(rule).and_then(|def| def.action.as_ref()) {
                    return Value::Node(action(Children::new(values)));
                }
                let single_step = matches!(
                    self.compiled.rule(rule).map(|r| &r.body),
                    Some(CompiledBody::Sequence(steps)) if steps.len() == 1
                );
                if single_step {
                    values.pop().unwrap_or(Value::Empty)
                } else {
                    Value::List(values)
                }
            }
        }
    }
}
