//! Symbolization: text to a flat stream of classified symbols.
//!
//! The scan is single-pass and never fails. At each offset ignored terminals
//! are skipped until none matches, then literal terminals are tried longest
//! first, then scanning terminals; the first match wins. Characters nothing
//! matches are folded into one lexical error per run.

use rowan::{TextRange, TextSize};

use crate::compile::TerminalOrder;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::grammar::Token;
use crate::terminal::{TerminalId, TerminalTable};

/// One terminal match in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub(crate) terminal: TerminalId,
    pub(crate) range: TextRange,
    pub(crate) captured: bool,
}

impl Symbol {
    pub fn terminal(&self) -> TerminalId {
        self.terminal
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn offset(&self) -> usize {
        self.range.start().into()
    }

    pub fn len(&self) -> usize {
        self.range.len().into()
    }

    /// Always false: zero-length matches never produce symbols.
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// False for literal terminals, whose text is implied by the definition.
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    pub fn raw_text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.range]
    }

    /// Captured text, `None` for literal terminals.
    pub fn text<'s>(&self, source: &'s str) -> Option<&'s str> {
        self.captured.then(|| self.raw_text(source))
    }

    pub(crate) fn token<'s>(&self, source: &'s str) -> Token<'s> {
        Token {
            terminal: self.terminal,
            range: self.range,
            text: self.raw_text(source),
            literal: !self.captured,
        }
    }
}

/// Symbols of one source text together with its lexical errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolStream<'s> {
    source: &'s str,
    symbols: Vec<Symbol>,
    diagnostics: Diagnostics,
}

impl<'s> SymbolStream<'s> {
    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = Token<'s>> + '_ {
        self.symbols.iter().map(|symbol| symbol.token(self.source))
    }

    pub fn into_parts(self) -> (Vec<Symbol>, Diagnostics) {
        (self.symbols, self.diagnostics)
    }
}

pub(crate) fn text_range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}

pub(crate) fn symbolize<'s>(table: &TerminalTable, order: &TerminalOrder, source: &'s str) -> SymbolStream<'s> {
    let mut symbolizer = Symbolizer {
        table,
        order,
        source,
        pos: 0,
        error_start: None,
        symbols: Vec::new(),
        diagnostics: Diagnostics::new(),
    };
    symbolizer.run();
    SymbolStream {
        source,
        symbols: symbolizer.symbols,
        diagnostics: symbolizer.diagnostics,
    }
}

struct Symbolizer<'a, 's> {
    table: &'a TerminalTable,
    order: &'a TerminalOrder,
    source: &'s str,
    pos: usize,
    error_start: Option<usize>,
    symbols: Vec<Symbol>,
    diagnostics: Diagnostics,
}

impl Symbolizer<'_, '_> {
    fn run(&mut self) {
        while self.pos < self.source.len() {
            self.skip_ignored();
            if self.pos >= self.source.len() {
                break;
            }

            let found = self
                .order
                .literal
                .iter()
                .chain(&self.order.functional)
                .find_map(|&id| Some((id, self.table.match_at(id, self.source, self.pos)?)));

            match found {
                Some((terminal, m)) => {
                    self.close_error();
                    self.symbols.push(Symbol {
                        terminal,
                        range: text_range(self.pos, self.pos + m.len),
                        captured: !self.table.is_literal(terminal),
                    });
                    self.pos += m.consumed();
                }
                None => {
                    self.error_start.get_or_insert(self.pos);
                    self.pos += self.source[self.pos..].chars().next().map_or(1, char::len_utf8);
                }
            }
        }
        self.close_error();
    }

    fn skip_ignored(&mut self) {
        while self.pos < self.source.len() {
            let consumed = self
                .order
                .ignored
                .iter()
                .find_map(|&id| self.table.match_at(id, self.source, self.pos))
                .map(|m| m.consumed());
            let Some(consumed) = consumed else {
                return;
            };
            self.close_error();
            self.pos += consumed;
        }
    }

    fn close_error(&mut self) {
        let Some(start) = self.error_start.take() else {
            return;
        };
        let text = &self.source[start..self.pos];
        self.diagnostics
            .report(DiagnosticKind::UnrecognizedText, text_range(start, self.pos))
            .message(text)
            .text(text)
            .emit();
    }
}

#[cfg(test)]
#[path = "symbolize_tests.rs"]
mod symbolize_tests;
