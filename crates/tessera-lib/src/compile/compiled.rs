//! The compiled, read-only form of a grammar rooted at one rule.

use indexmap::IndexMap;

use crate::grammar::RuleId;
use crate::terminal::TerminalId;

/// Dispatch tables, nullability and first sets for every rule reachable from
/// the root, plus the partitioned terminal list the symbolizer scans with.
#[derive(Debug)]
pub struct CompiledGrammar {
    pub(crate) root: RuleId,
    pub(crate) order: Vec<RuleId>,
    /// Indexed by rule id; `None` for rules not reachable from the root.
    pub(crate) rules: Vec<Option<CompiledRule>>,
    pub(crate) terminals: TerminalOrder,
    /// Identities a reference to each terminal accepts, indexed by terminal.
    pub(crate) accepts: Vec<Vec<TerminalId>>,
    pub(crate) terminal_names: Vec<String>,
}

impl CompiledGrammar {
    pub fn root(&self) -> RuleId {
        self.root
    }

    /// Reachable rules in compile order (depth-first from the root).
    pub fn rule_order(&self) -> &[RuleId] {
        &self.order
    }

    pub fn terminal_order(&self) -> &TerminalOrder {
        &self.terminals
    }

    /// Terminals a match of `rule` can start with, in identity order.
    /// `None` if the rule is not reachable from the root.
    pub fn first_set(&self, rule: RuleId) -> Option<&[TerminalId]> {
        self.rule(rule).map(|r| r.first.as_slice())
    }

    pub fn is_nullable(&self, rule: RuleId) -> Option<bool> {
        self.rule(rule).map(|r| r.nullable)
    }

    pub fn rule_name(&self, rule: RuleId) -> Option<&str> {
        self.rule(rule).map(|r| r.name.as_str())
    }

    pub fn terminal_name(&self, terminal: TerminalId) -> &str {
        self.terminal_names
            .get(terminal.index())
            .map_or("?", String::as_str)
    }

    pub(crate) fn rule(&self, rule: RuleId) -> Option<&CompiledRule> {
        self.rules.get(rule.index()).and_then(Option::as_ref)
    }

    /// Whether the symbolizer can produce symbols of `terminal`.
    pub(crate) fn is_scanned(&self, terminal: TerminalId) -> bool {
        self.terminals.literal.contains(&terminal) || self.terminals.functional.contains(&terminal)
    }

    /// Whether a reference to `expected` accepts a symbol of `found`.
    #[inline]
    pub(crate) fn accepts(&self, expected: TerminalId, found: TerminalId) -> bool {
        expected == found
            || self
                .accepts
                .get(expected.index())
                .is_some_and(|ids| ids.contains(&found))
    }
}

/// Terminals the symbolizer tries, in the order it tries them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalOrder {
    pub(crate) ignored: Vec<TerminalId>,
    pub(crate) literal: Vec<TerminalId>,
    pub(crate) functional: Vec<TerminalId>,
}

impl TerminalOrder {
    /// Every ignored terminal of the grammar, in creation order.
    pub fn ignored(&self) -> &[TerminalId] {
        &self.ignored
    }

    /// Referenced literal terminals, longest first, ties in creation order.
    pub fn literal(&self) -> &[TerminalId] {
        &self.literal
    }

    /// Referenced scanning and pattern terminals, in creation order.
    pub fn functional(&self) -> &[TerminalId] {
        &self.functional
    }
}

#[derive(Debug)]
pub(crate) struct CompiledRule {
    pub name: String,
    pub nullable: bool,
    pub first: Vec<TerminalId>,
    pub body: CompiledBody,
    pub has_action: bool,
}

#[derive(Debug)]
pub(crate) enum CompiledBody {
    Sequence(Vec<CompiledStep>),
    Separated {
        item: CompiledStep,
        separator: CompiledStep,
        allow_empty: bool,
    },
    Cyclic(CompiledStep),
}

/// One step with its alternatives flattened into `branches`.
#[derive(Debug)]
pub(crate) struct CompiledStep {
    pub optional: bool,
    pub first: Vec<TerminalId>,
    pub branches: Vec<Branch>,
    /// Lookahead terminal to the branches worth trying, in declared order.
    /// Nullable branches appear under every key.
    pub dispatch: IndexMap<TerminalId, Vec<u16>>,
    /// Branches to try when the lookahead has no entry: the nullable ones.
    pub fallback: Vec<u16>,
}

impl CompiledStep {
    pub fn candidates(&self, lookahead: Option<TerminalId>) -> &[u16] {
        lookahead
            .and_then(|id| self.dispatch.get(&id))
            .unwrap_or(&self.fallback)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Branch {
    Terminal(TerminalId),
    Rule(RuleId),
}
