//! Grammar compilation.
//!
//! Compiling walks every rule reachable from the root, validates it, computes
//! nullability and first sets, rejects left recursion and builds one dispatch
//! table per step. The result lets the evaluator skip branches that cannot
//! start with the lookahead symbol.

mod compiled;
mod dump;
mod first_sets;
mod recursion;


use indexmap::{IndexMap, IndexSet};

pub use compiled::{CompiledGrammar, TerminalOrder};
pub(crate) use compiled::{Branch, CompiledBody, CompiledRule, CompiledStep};

use crate::grammar::{Body, Grammar, GrammarError, RuleDef, RuleId, Step};
use crate::terminal::TerminalId;

use first_sets::Analysis;

pub(crate) fn compile<T>(grammar: &Grammar<T>, root: RuleId) -> Result<CompiledGrammar, GrammarError> {
    if let Some(err) = grammar.errors.first() {
        return Err(err.clone());
    }

    let order = walk(grammar, root)?;
    let analysis = first_sets::analyze(grammar, &order);
    recursion::check(grammar, &order, &analysis)?;

    let mut rules: Vec<Option<CompiledRule>> = (0..grammar.rule_count()).map(|_| None).collect();
    let mut referenced = IndexSet::new();
    for &rule in &order {
        let Some(def) = grammar.rule_def(rule) else {
            continue;
        };
        for_each_step(&def.body, |step| collect_terminals(step, &mut referenced));
        rules[rule.index()] = Some(compile_rule(rule, def, &analysis));
    }

    Ok(CompiledGrammar {
        root,
        order,
        rules,
        terminals: partition(grammar, &referenced),
        terminal_names: grammar
            .terminals
            .ids()
            .map(|id| grammar.terminals.display_name(id))
            .collect(),
        accepts: analysis.accepts,
    })
}

/// Depth-first walk from the root. A rule is marked visited before its
/// children are pushed, so recursive references are followed once.
fn walk<T>(grammar: &Grammar<T>, root: RuleId) -> Result<Vec<RuleId>, GrammarError> {
    if grammar.rule_def(root).is_none() {
        return Err(GrammarError::UnknownRule {
            rule: "<root>".to_owned(),
            id: root.as_u32(),
        });
    }

    let mut visited = vec![false; grammar.rule_count()];
    let mut order = Vec::new();
    let mut stack = vec![root];
    visited[root.index()] = true;

    while let Some(rule) = stack.pop() {
        let Some(def) = grammar.rule_def(rule) else {
            continue;
        };
        validate(grammar, def)?;
        order.push(rule);

        let mut children = Vec::new();
        for_each_step(&def.body, |step| collect_rules(step, &mut children));
        // reversed, so the first reference is compiled next
        for child in children.into_iter().rev() {
            let Some(seen) = visited.get_mut(child.index()) else {
                return Err(GrammarError::UnknownRule {
                    rule: def.name.clone(),
                    id: child.as_u32(),
                });
            };
            if !*seen {
                *seen = true;
                stack.push(child);
            }
        }
    }
    Ok(order)
}

fn validate<T>(grammar: &Grammar<T>, def: &RuleDef<T>) -> Result<(), GrammarError> {
    let rule = || def.name.clone();
    match &def.body {
        Body::Undefined => return Err(GrammarError::EmptyRule { rule: rule() }),
        Body::Sequence(slots) => {
            let groups = slots
                .iter()
                .filter(|slot| matches!(slot.step, Step::Alternation(_)))
                .count();
            if groups > 1 && def.action.is_none() {
                return Err(GrammarError::MissingAction { rule: rule(), groups });
            }
        }
        Body::Cyclic(alternatives) if alternatives.is_empty() => {
            return Err(GrammarError::EmptyAlternation { rule: rule() });
        }
        Body::Separated { .. } | Body::Cyclic(_) => {}
    }

    let mut result = Ok(());
    for_each_step(&def.body, |step| {
        if result.is_ok() {
            result = validate_step(grammar, def, step);
        }
    });
    result
}

fn validate_step<T>(grammar: &Grammar<T>, def: &RuleDef<T>, step: &Step) -> Result<(), GrammarError> {
    match step {
        Step::Terminal(id) if !grammar.terminals.contains(*id) => Err(GrammarError::UnknownTerminal {
            context: format!("rule `{}`", def.name),
            id: id.as_u32(),
        }),
        Step::Terminal(_) | Step::Rule(_) => Ok(()),
        Step::Alternation(alternatives) if alternatives.is_empty() => Err(GrammarError::EmptyAlternation {
            rule: def.name.clone(),
        }),
        Step::Alternation(alternatives) => alternatives
            .iter()
            .try_for_each(|alt| validate_step(grammar, def, alt)),
    }
}

fn for_each_step(body: &Body, mut f: impl FnMut(&Step)) {
    match body {
        Body::Undefined => {}
        Body::Sequence(slots) => slots.iter().for_each(|slot| f(&slot.step)),
        Body::Separated {
            item, separator, ..
        } => {
            f(item);
            f(separator);
        }
        Body::Cyclic(alternatives) => alternatives.iter().for_each(f),
    }
}

fn collect_rules(step: &Step, out: &mut Vec<RuleId>) {
    match step {
        Step::Terminal(_) => {}
        Step::Rule(rule) => out.push(*rule),
        Step::Alternation(alternatives) => alternatives.iter().for_each(|alt| collect_rules(alt, out)),
    }
}

fn collect_terminals(step: &Step, out: &mut IndexSet<TerminalId>) {
    match step {
        Step::Terminal(id) => {
            out.insert(*id);
        }
        Step::Rule(_) => {}
        Step::Alternation(alternatives) => alternatives.iter().for_each(|alt| collect_terminals(alt, out)),
    }
}

fn compile_rule<T>(rule: RuleId, def: &RuleDef<T>, analysis: &Analysis) -> CompiledRule {
    let body = match &def.body {
        Body::Sequence(slots) => CompiledBody::Sequence(
            slots
                .iter()
                .map(|slot| compile_step(&slot.step, slot.optional, analysis))
                .collect(),
        ),
        Body::Separated {
            item,
            separator,
            allow_empty,
        } => CompiledBody::Separated {
            item: compile_step(item, false, analysis),
            separator: compile_step(separator, false, analysis),
            allow_empty: *allow_empty,
        },
        Body::Cyclic(alternatives) => {
            CompiledBody::Cyclic(compile_step(&Step::Alternation(alternatives.clone()), false, analysis))
        }
        // rejected by `validate`
        Body::Undefined => CompiledBody::Sequence(Vec::new()),
    };

    CompiledRule {
        name: def.name.clone(),
        nullable: analysis.nullable[rule.index()],
        first: analysis.first[rule.index()].clone(),
        body,
        has_action: def.action.is_some(),
    }
}

fn compile_step(step: &Step, optional: bool, analysis: &Analysis) -> CompiledStep {
    let mut branches = Vec::new();
    flatten(step, &mut branches);

    let mut per_branch = Vec::with_capacity(branches.len());
    let mut union = IndexSet::new();
    for branch in &branches {
        let step = match *branch {
            Branch::Terminal(id) => Step::Terminal(id),
            Branch::Rule(rule) => Step::Rule(rule),
        };
        let mut first = IndexSet::new();
        analysis.step_first(&step, &mut first);
        union.extend(first.iter().copied());
        per_branch.push((first, analysis.step_nullable(&step)));
    }
    union.sort();

    let mut dispatch = IndexMap::new();
    for &id in &union {
        let entry: Vec<u16> = per_branch
            .iter()
            .enumerate()
            .filter(|(_, (first, nullable))| *nullable || first.contains(&id))
            .map(|(i, _)| i as u16)
            .collect();
        dispatch.insert(id, entry);
    }
    let fallback = per_branch
        .iter()
        .enumerate()
        .filter(|(_, (_, nullable))| *nullable)
        .map(|(i, _)| i as u16)
        .collect();

    CompiledStep {
        optional,
        first: union.into_iter().collect(),
        branches,
        dispatch,
        fallback,
    }
}

/// Nested alternations flatten into one ordered choice.
fn flatten(step: &Step, out: &mut Vec<Branch>) {
    match step {
        Step::Terminal(id) => out.push(Branch::Terminal(*id)),
        Step::Rule(rule) => out.push(Branch::Rule(*rule)),
        Step::Alternation(alternatives) => alternatives.iter().for_each(|alt| flatten(alt, out)),
    }
}

fn partition<T>(grammar: &Grammar<T>, referenced: &IndexSet<TerminalId>) -> TerminalOrder {
    let table = &grammar.terminals;
    let mut order = TerminalOrder::default();
    for id in table.ids() {
        if table.is_ignored(id) {
            order.ignored.push(id);
        } else if !referenced.contains(&id) {
            continue;
        } else if table.is_literal(id) {
            order.literal.push(id);
        } else {
            order.functional.push(id);
        }
    }
    // stable, so equal lengths keep creation order
    order
        .literal
        .sort_by_key(|&id| std::cmp::Reverse(table.literal_len(id).unwrap_or(0)));
    order
}
