//! Tessera: a backtracking parser-combinator runtime.
//!
//! A [`Grammar`] registers terminals (lexical matchers) and rules (composable
//! grammar nodes). A [`Parser`] owns the grammar and a root rule, compiles it
//! lazily into dispatch tables, turns text into symbols and evaluates the rules
//! over them, producing whatever the registered match actions build.
//!
//! # Example
//!
//! ```
//! use tessera_lib::{Grammar, Parser, Terminal};
//!
//! let mut g = Grammar::<i64>::new();
//! g.terminal(Terminal::scan(|rest| Some(rest.len() - rest.trim_start().len())).ignored());
//! let number = g.terminal(
//!     Terminal::scan(|rest| Some(rest.bytes().take_while(u8::is_ascii_digit).count()))
//!         .named("number"),
//! );
//! g.transform(number, |token| token.text().parse().unwrap_or_default());
//! let comma = g.terminal(',');
//!
//! let list = g.rule("list");
//! g.define(list)
//!     .repeat_separator(number, comma)
//!     .on_match(|children| children.into_iter().filter_map(|v| v.into_node()).sum());
//!
//! let parser = Parser::new(g, list);
//! let parse = parser.parse("1, 2, 3").expect("grammar is valid");
//! assert_eq!(parse.into_value().and_then(|v| v.into_node()), Some(6));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod compile;
pub mod diagnostics;
pub mod engine;
pub mod grammar;
pub mod parser;
pub mod symbolize;
pub mod task;
pub mod terminal;

#[cfg(test)]
mod test_utils;

pub use compile::{CompiledGrammar, TerminalOrder};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, DiagnosticsPrinter};
pub use engine::{FuelLimits, NoopTracer, PrintTracer, SymbolCursor, Tracer, Verbosity};
pub use grammar::{Children, Grammar, GrammarError, RuleBuilder, RuleId, Step, Token, Value};
pub use parser::{Parse, Parser, ParserBuilder};
pub use symbolize::{Symbol, SymbolStream};
pub use task::{ParseTask, Phase, Scheduler, SymbolizeTask, TaskId, Turn};
pub use terminal::{Terminal, TerminalId};

/// Fatal errors: a broken grammar or an exhausted evaluation budget.
///
/// Malformed input never produces an `Error`; it is reported through
/// [`Diagnostics`] next to whatever result could be built.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Execution fuel exhausted (too many evaluation steps).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("invalid terminal pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Result type for grammar and parse operations.
pub type Result<T> = std::result::Result<T, Error>;
