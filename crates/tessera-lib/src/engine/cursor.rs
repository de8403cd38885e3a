use crate::symbolize::Symbol;
use crate::terminal::TerminalId;

/// Position over a symbol sequence: a speculative index that moves forward
/// and back during evaluation, and a committed index it may never go below.
#[derive(Debug, Clone)]
pub struct SymbolCursor<'a> {
    symbols: &'a [Symbol],
    pub(super) committed: usize,
    pub(super) position: usize,
}

impl<'a> SymbolCursor<'a> {
    pub fn new(symbols: &'a [Symbol]) -> Self {
        Self {
            symbols,
            committed: 0,
            position: 0,
        }
    }

    pub fn symbols(&self) -> &'a [Symbol] {
        self.symbols
    }

    pub fn peek(&self) -> Option<&'a Symbol> {
        self.symbols.get(self.position)
    }

    /// Terminal of the symbol at the speculative position, `None` past the end.
    #[inline]
    pub fn peek_id(&self) -> Option<TerminalId> {
        self.peek().map(Symbol::terminal)
    }

    /// Returns the current symbol and moves past it. At the end, returns
    /// `None` and stays put.
    pub fn advance(&mut self) -> Option<&'a Symbol> {
        let symbol = self.symbols.get(self.position)?;
        self.position += 1;
        Some(symbol)
    }

    /// Moves back exactly `n` symbols.
    ///
    /// # Panics
    ///
    /// If that would move before the committed position.
    pub fn rollback(&mut self, n: usize) {
        self.assert_rollback(n);
        self.position -= n;
    }

    /// Moves back to `position`, which must lie between the committed and
    /// the current position.
    pub fn rollback_to(&mut self, position: usize) {
        self.assert_rollback_target(position);
        self.position = position;
    }

    pub fn commit(&mut self) {
        self.committed = self.position;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn committed(&self) -> usize {
        self.committed
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.symbols.len()
    }
}
