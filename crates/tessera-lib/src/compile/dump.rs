//! Human-readable rendering of a compiled grammar.

use std::fmt;

use super::compiled::{Branch, CompiledBody, CompiledGrammar, CompiledStep};
use crate::terminal::TerminalId;

impl CompiledGrammar {
    /// Renders reachable rules, their first sets and dispatch tables, and the
    /// symbolizer's terminal order.
    pub fn dump(&self) -> String {
        Dump(self).to_string()
    }
}

struct Dump<'a>(&'a CompiledGrammar);

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.0;
        writeln!(f, "root {}", g.rule_name(g.root).unwrap_or("?"))?;
        writeln!(f)?;
        writeln!(f, "terminals")?;
        writeln!(f, "  ignored: {}", self.names(&g.terminals.ignored))?;
        writeln!(f, "  literal: {}", self.names(&g.terminals.literal))?;
        writeln!(f, "  functional: {}", self.names(&g.terminals.functional))?;

        for &id in &g.order {
            let Some(rule) = g.rule(id) else {
                continue;
            };
            writeln!(f)?;
            let kind = match &rule.body {
                CompiledBody::Sequence(_) => "sequence",
                CompiledBody::Separated {
                    allow_empty: false, ..
                } => "separated(1+)",
                CompiledBody::Separated {
                    allow_empty: true, ..
                } => "separated(0+)",
                CompiledBody::Cyclic(_) => "cyclic",
            };
            let action = if rule.has_action { " with action" } else { "" };
            writeln!(f, "rule {} = {kind}{action}", rule.name)?;
            writeln!(f, "  nullable: {}", if rule.nullable { "yes" } else { "no" })?;
            writeln!(f, "  first: {}", self.names(&rule.first))?;

            match &rule.body {
                CompiledBody::Sequence(steps) => {
                    for (i, step) in steps.iter().enumerate() {
                        self.step(f, &format!("step {i}"), step)?;
                    }
                }
                CompiledBody::Separated {
                    item, separator, ..
                } => {
                    self.step(f, "item", item)?;
                    self.step(f, "separator", separator)?;
                }
                CompiledBody::Cyclic(step) => self.step(f, "alternatives", step)?,
            }
        }
        Ok(())
    }
}

impl Dump<'_> {
    fn names(&self, ids: &[TerminalId]) -> String {
        if ids.is_empty() {
            return "-".to_owned();
        }
        ids.iter()
            .map(|&id| self.0.terminal_name(id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn branch(&self, branch: Branch) -> &str {
        match branch {
            Branch::Terminal(id) => self.0.terminal_name(id),
            Branch::Rule(rule) => self.0.rule_name(rule).unwrap_or("?"),
        }
    }

    fn step(&self, f: &mut fmt::Formatter<'_>, label: &str, step: &CompiledStep) -> fmt::Result {
        let mut line = String::new();
        for (i, &branch) in step.branches.iter().enumerate() {
            if i > 0 {
                line.push_str(" | ");
            }
            line.push_str(self.branch(branch));
        }
        if step.optional {
            line.push_str(" ?");
        }
        writeln!(f, "  {label}: {line}")?;

        for (&id, entry) in &step.dispatch {
            writeln!(f, "    {} => {entry:?}", self.0.terminal_name(id))?;
        }
        if !step.fallback.is_empty() {
            writeln!(f, "    else => {:?}", step.fallback)?;
        }
        Ok(())
    }
}
