//! Grammar construction.
//!
//! A [`Grammar`] is an arena of terminals and rules. Rules are declared by
//! name first, so they can reference each other (and themselves) before they
//! are defined, then filled in with a [`RuleBuilder`]. Builder misuse never
//! panics: it is recorded and reported by the first compile.

mod error;
mod value;


use std::fmt;

pub use error::GrammarError;
pub use value::{Children, Token, Value};

use crate::terminal::{Matcher, Terminal, TerminalId, TerminalTable};

pub(crate) type ActionFn<T> = Box<dyn for<'s> Fn(Children<'s, T>) -> T + Send + Sync>;
pub(crate) type TransformFn<T> = Box<dyn for<'s> Fn(Token<'s>) -> T + Send + Sync>;

/// Identity of a declared rule (its arena index).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u32);

impl RuleId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// One element of a rule body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Terminal(TerminalId),
    Rule(RuleId),
    /// Ordered choice: the first alternative that matches wins.
    Alternation(Vec<Step>),
}

impl From<TerminalId> for Step {
    fn from(id: TerminalId) -> Self {
        Step::Terminal(id)
    }
}

impl From<RuleId> for Step {
    fn from(id: RuleId) -> Self {
        Step::Rule(id)
    }
}

impl From<Vec<Step>> for Step {
    fn from(alternatives: Vec<Step>) -> Self {
        Step::Alternation(alternatives)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub step: Step,
    pub optional: bool,
}

#[derive(Debug, Clone)]
pub(crate) enum Body {
    Undefined,
    Sequence(Vec<Slot>),
    Separated {
        item: Step,
        separator: Step,
        allow_empty: bool,
    },
    Cyclic(Vec<Step>),
}

impl Body {
    fn kind(&self) -> &'static str {
        match self {
            Body::Undefined => "undefined",
            Body::Sequence(_) => "sequence",
            Body::Separated { .. } => "separated",
            Body::Cyclic(_) => "cyclic",
        }
    }
}

pub(crate) struct RuleDef<T> {
    pub name: String,
    pub body: Body,
    pub action: Option<ActionFn<T>>,
}

/// Terminals, rules and their callbacks, producing values of type `T`.
pub struct Grammar<T> {
    pub(crate) terminals: TerminalTable,
    pub(crate) transforms: Vec<Option<TransformFn<T>>>,
    pub(crate) rules: Vec<RuleDef<T>>,
    pub(crate) errors: Vec<GrammarError>,
}

impl<T> Default for Grammar<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Grammar<T> {
    pub fn new() -> Self {
        Self {
            terminals: TerminalTable::default(),
            transforms: Vec::new(),
            rules: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Registers a terminal, assigning the next identity.
    pub fn terminal(&mut self, def: impl Into<Terminal>) -> TerminalId {
        let def = def.into();
        let empty_literal = matches!(&def.matcher, Matcher::Literal { text, .. } if text.is_empty());
        let (id, unknown) = self.terminals.push(def);
        self.transforms.push(None);
        if empty_literal {
            self.errors.push(GrammarError::EmptyLiteral { id: id.as_u32() });
        }
        if let Some(member) = unknown {
            self.errors.push(GrammarError::UnknownTerminal {
                context: format!("terminal {id}"),
                id: member.as_u32(),
            });
        }
        id
    }

    /// Attaches a semantic transform: symbols of `terminal` resolve to
    /// `Value::Node(transform(token))` instead of `Value::Token`.
    pub fn transform<F>(&mut self, terminal: TerminalId, transform: F)
    where
        F: for<'s> Fn(Token<'s>) -> T + Send + Sync + 'static,
    {
        match self.transforms.get_mut(terminal.index()) {
            Some(slot) => *slot = Some(Box::new(transform)),
            None => self.errors.push(GrammarError::UnknownTerminal {
                context: "transform".to_owned(),
                id: terminal.as_u32(),
            }),
        }
    }

    /// Declares a rule. Define its body with [`Grammar::define`].
    pub fn rule(&mut self, name: impl Into<String>) -> RuleId {
        let id = RuleId(self.rules.len() as u32);
        self.rules.push(RuleDef {
            name: name.into(),
            body: Body::Undefined,
            action: None,
        });
        id
    }

    pub fn define(&mut self, rule: RuleId) -> RuleBuilder<'_, T> {
        if rule.index() >= self.rules.len() {
            self.errors.push(GrammarError::UnknownRule {
                rule: "<define>".to_owned(),
                id: rule.as_u32(),
            });
        }
        RuleBuilder { grammar: self, rule }
    }

    pub fn rule_name(&self, rule: RuleId) -> Option<&str> {
        self.rules.get(rule.index()).map(|r| r.name.as_str())
    }

    pub fn terminal_name(&self, terminal: TerminalId) -> String {
        self.terminals.display_name(terminal)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn terminal_count(&self) -> usize {
        self.terminals.len()
    }

    pub(crate) fn rule_def(&self, rule: RuleId) -> Option<&RuleDef<T>> {
        self.rules.get(rule.index())
    }

    pub(crate) fn transform_for(&self, terminal: TerminalId) -> Option<&TransformFn<T>> {
        self.transforms.get(terminal.index()).and_then(Option::as_ref)
    }
}

impl<T> fmt::Debug for Grammar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("terminals", &self.terminals.len())
            .field("rules", &self.rules.iter().map(|r| &r.name).collect::<Vec<_>>())
            .field("errors", &self.errors)
            .finish()
    }
}

/// Fills in one rule's body. Every method consumes and returns the builder so
/// calls chain.
pub struct RuleBuilder<'g, T> {
    grammar: &'g mut Grammar<T>,
    rule: RuleId,
}

impl<T> RuleBuilder<'_, T> {
    /// Appends a mandatory step.
    pub fn then(self, step: impl Into<Step>) -> Self {
        self.push_slot(step.into(), false)
    }

    /// Appends an ordered choice between `alternatives`.
    pub fn or<I, S>(self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Step>,
    {
        let step = Step::Alternation(alternatives.into_iter().map(Into::into).collect());
        self.push_slot(step, false)
    }

    /// Appends a step that may be absent; an absent step resolves to
    /// [`Value::Empty`].
    pub fn optional(self, step: impl Into<Step>) -> Self {
        self.push_slot(step.into(), true)
    }

    /// One or more `item`s separated by `separator`.
    pub fn repeat_separator(self, item: impl Into<Step>, separator: impl Into<Step>) -> Self {
        self.separated(item.into(), separator.into(), false)
    }

    /// Zero or more `item`s separated by `separator`.
    pub fn optional_separator(self, item: impl Into<Step>, separator: impl Into<Step>) -> Self {
        self.separated(item.into(), separator.into(), true)
    }

    /// Repeats the ordered choice between `alternatives` until none matches.
    /// Never fails; zero iterations is an empty list.
    pub fn cyclic_or<I, S>(self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Step>,
    {
        let alternatives = alternatives.into_iter().map(Into::into);
        let Some(def) = self.grammar.rules.get_mut(self.rule.index()) else {
            return self;
        };
        match &mut def.body {
            Body::Undefined => def.body = Body::Cyclic(alternatives.collect()),
            Body::Cyclic(existing) => existing.extend(alternatives),
            body => self.grammar.errors.push(mixed(&def.name, body, "cyclic")),
        }
        self
    }

    /// Sets the match action. It receives the resolved children positionally
    /// and runs only once the enclosing parse has settled on this match.
    pub fn on_match<F>(self, action: F) -> Self
    where
        F: for<'s> Fn(Children<'s, T>) -> T + Send + Sync + 'static,
    {
        let Some(def) = self.grammar.rules.get_mut(self.rule.index()) else {
            return self;
        };
        if def.action.is_some() {
            let rule = def.name.clone();
            self.grammar.errors.push(GrammarError::DuplicateAction { rule });
        } else {
            def.action = Some(Box::new(action));
        }
        self
    }

    pub fn id(&self) -> RuleId {
        self.rule
    }

    fn push_slot(self, step: Step, optional: bool) -> Self {
        let Some(def) = self.grammar.rules.get_mut(self.rule.index()) else {
            return self;
        };
        match &mut def.body {
            Body::Undefined => def.body = Body::Sequence(vec![Slot { step, optional }]),
            Body::Sequence(slots) => slots.push(Slot { step, optional }),
            body => self.grammar.errors.push(mixed(&def.name, body, "sequence")),
        }
        self
    }

    fn separated(self, item: Step, separator: Step, allow_empty: bool) -> Self {
        let Some(def) = self.grammar.rules.get_mut(self.rule.index()) else {
            return self;
        };
        match &def.body {
            Body::Undefined => {
                def.body = Body::Separated {
                    item,
                    separator,
                    allow_empty,
                }
            }
            body => self.grammar.errors.push(mixed(&def.name, body, "separated")),
        }
        self
    }
}

fn mixed(rule: &str, existing: &Body, attempted: &'static str) -> GrammarError {
    GrammarError::MixedRuleKinds {
        rule: rule.to_owned(),
        existing: existing.kind(),
        attempted,
    }
}
