//! Left-recursion detection.
//!
//! A rule's left edges are the rules it can enter before consuming anything:
//! the leading step of a sequence, and the steps after it while everything
//! before them is nullable. A cycle of left edges would re-enter a rule at the
//! same position forever.

use indexmap::{IndexMap, IndexSet};

use crate::grammar::{Body, Grammar, GrammarError, RuleId, Step};

use super::first_sets::Analysis;

pub(crate) fn check<T>(
    grammar: &Grammar<T>,
    order: &[RuleId],
    analysis: &Analysis,
) -> Result<(), GrammarError> {
    let mut adj: IndexMap<RuleId, Vec<RuleId>> = IndexMap::new();
    for &rule in order {
        let Some(def) = grammar.rule_def(rule) else {
            continue;
        };
        let mut edges = Vec::new();
        left_edges(&def.body, analysis, &mut edges);
        adj.insert(rule, edges);
    }

    let Some(cycle) = CycleFinder::find(order, &adj) else {
        return Ok(());
    };
    let cycle = cycle
        .into_iter()
        .map(|rule| grammar.rule_name(rule).unwrap_or("?").to_owned())
        .collect();
    Err(GrammarError::LeftRecursion { cycle })
}

fn left_edges(body: &Body, analysis: &Analysis, out: &mut Vec<RuleId>) {
    match body {
        Body::Undefined => {}
        Body::Sequence(slots) => {
            for slot in slots {
                step_rules(&slot.step, out);
                if !slot.optional && !analysis.step_nullable(&slot.step) {
                    break;
                }
            }
        }
        Body::Separated {
            item, separator, ..
        } => {
            step_rules(item, out);
            if analysis.step_nullable(item) {
                step_rules(separator, out);
            }
        }
        Body::Cyclic(alternatives) => {
            for alt in alternatives {
                step_rules(alt, out);
            }
        }
    }
}

fn step_rules(step: &Step, out: &mut Vec<RuleId>) {
    match step {
        Step::Terminal(_) => {}
        Step::Rule(rule) => {
            if !out.contains(rule) {
                out.push(*rule);
            }
        }
        Step::Alternation(alternatives) => {
            for alt in alternatives {
                step_rules(alt, out);
            }
        }
    }
}

struct CycleFinder<'a> {
    adj: &'a IndexMap<RuleId, Vec<RuleId>>,
    visited: IndexSet<RuleId>,
    on_path: IndexMap<RuleId, usize>,
    path: Vec<RuleId>,
}

impl<'a> CycleFinder<'a> {
    /// Returns the first cycle found, closed: `[a, b, a]`.
    fn find(nodes: &[RuleId], adj: &'a IndexMap<RuleId, Vec<RuleId>>) -> Option<Vec<RuleId>> {
        let mut finder = Self {
            adj,
            visited: IndexSet::new(),
            on_path: IndexMap::new(),
            path: Vec::new(),
        };

        for &start in nodes {
            if let Some(cycle) = finder.dfs(start) {
                return Some(cycle);
            }
        }
        None
    }

    fn dfs(&mut self, current: RuleId) -> Option<Vec<RuleId>> {
        if self.on_path.contains_key(&current) || self.visited.contains(&current) {
            return None;
        }

        self.visited.insert(current);
        self.on_path.insert(current, self.path.len());
        self.path.push(current);

        if let Some(neighbors) = self.adj.get(&current) {
            for &target in neighbors {
                if let Some(&start_index) = self.on_path.get(&target) {
                    let mut cycle = self.path[start_index..].to_vec();
                    cycle.push(target);
                    return Some(cycle);
                }
                if let Some(cycle) = self.dfs(target) {
                    return Some(cycle);
                }
            }
        }

        self.path.pop();
        self.on_path.swap_remove(&current);
        None
    }
}
