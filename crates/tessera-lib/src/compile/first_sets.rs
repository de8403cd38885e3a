//! Nullability and first sets, computed as a fixpoint over the reached rules.

use indexmap::IndexSet;

use crate::grammar::{Body, Grammar, RuleId, Step};
use crate::terminal::TerminalId;

pub(crate) struct Analysis {
    /// Indexed by rule.
    pub nullable: Vec<bool>,
    /// Indexed by rule; sorted by identity once the fixpoint settles.
    pub first: Vec<Vec<TerminalId>>,
    /// Identities a reference to each terminal accepts, indexed by terminal.
    pub accepts: Vec<Vec<TerminalId>>,
}

impl Analysis {
    pub fn step_nullable(&self, step: &Step) -> bool {
        match step {
            Step::Terminal(_) => false,
            Step::Rule(rule) => self.nullable.get(rule.index()).copied().unwrap_or(false),
            Step::Alternation(alternatives) => alternatives.iter().any(|s| self.step_nullable(s)),
        }
    }

    pub fn step_first(&self, step: &Step, out: &mut IndexSet<TerminalId>) {
        match step {
            Step::Terminal(id) => match self.accepts.get(id.index()) {
                Some(ids) => out.extend(ids.iter().copied()),
                None => {
                    out.insert(*id);
                }
            },
            Step::Rule(rule) => {
                if let Some(first) = self.first.get(rule.index()) {
                    out.extend(first.iter().copied());
                }
            }
            Step::Alternation(alternatives) => {
                for alt in alternatives {
                    self.step_first(alt, out);
                }
            }
        }
    }

    fn body_nullable(&self, body: &Body) -> bool {
        match body {
            Body::Undefined => false,
            Body::Sequence(slots) => slots
                .iter()
                .all(|slot| slot.optional || self.step_nullable(&slot.step)),
            Body::Separated {
                item, allow_empty, ..
            } => *allow_empty || self.step_nullable(item),
            Body::Cyclic(_) => true,
        }
    }

    fn body_first(&self, body: &Body, out: &mut IndexSet<TerminalId>) {
        match body {
            Body::Undefined => {}
            Body::Sequence(slots) => {
                for slot in slots {
                    self.step_first(&slot.step, out);
                    if !slot.optional && !self.step_nullable(&slot.step) {
                        break;
                    }
                }
            }
            Body::Separated {
                item, separator, ..
            } => {
                self.step_first(item, out);
                if self.step_nullable(item) {
                    self.step_first(separator, out);
                }
            }
            Body::Cyclic(alternatives) => {
                for alt in alternatives {
                    self.step_first(alt, out);
                }
            }
        }
    }
}

pub(crate) fn analyze<T>(grammar: &Grammar<T>, order: &[RuleId]) -> Analysis {
    let rule_count = grammar.rule_count();
    let mut analysis = Analysis {
        nullable: vec![false; rule_count],
        first: vec![Vec::new(); rule_count],
        accepts: grammar
            .terminals
            .ids()
            .map(|id| grammar.terminals.accepted(id))
            .collect(),
    };

    // Both facts only grow, so this terminates.
    loop {
        let mut changed = false;
        for &rule in order {
            let Some(def) = grammar.rule_def(rule) else {
                continue;
            };
            let i = rule.index();

            if !analysis.nullable[i] && analysis.body_nullable(&def.body) {
                analysis.nullable[i] = true;
                changed = true;
            }

            let mut first = IndexSet::new();
            analysis.body_first(&def.body, &mut first);
            for id in first {
                if !analysis.first[i].contains(&id) {
                    analysis.first[i].push(id);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    for first in &mut analysis.first {
        first.sort();
    }
    analysis
}
