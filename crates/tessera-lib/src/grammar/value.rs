//! Resolved match results handed to match actions and returned from a parse.

use rowan::TextRange;

use crate::terminal::TerminalId;

/// A matched terminal, borrowing its text from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'s> {
    pub(crate) terminal: TerminalId,
    pub(crate) range: TextRange,
    pub(crate) text: &'s str,
    pub(crate) literal: bool,
}

impl<'s> Token<'s> {
    pub fn terminal(&self) -> TerminalId {
        self.terminal
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn offset(&self) -> usize {
        self.range.start().into()
    }

    /// Matched source text.
    pub fn text(&self) -> &'s str {
        self.text
    }

    /// Matched text for capturing terminals, `None` for literal ones whose
    /// text is implied by the definition.
    pub fn captured(&self) -> Option<&'s str> {
        (!self.literal).then_some(self.text)
    }
}

/// One resolved grammar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'s, T> {
    /// An optional step that did not match.
    Empty,
    /// A terminal without a transform.
    Token(Token<'s>),
    /// Output of a match action or a terminal transform.
    Node(T),
    /// Repetitions, and multi-step rules without a match action.
    List(Vec<Value<'s, T>>),
}

impl<'s, T> Value<'s, T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub fn as_token(&self) -> Option<&Token<'s>> {
        match self {
            Value::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn into_token(self) -> Option<Token<'s>> {
        match self {
            Value::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&T> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn into_node(self) -> Option<T> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value<'s, T>]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<Value<'s, T>>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Positional values of a rule's match, one per step (sequences) or per item
/// (repetitions).
#[derive(Debug, Clone, PartialEq)]
pub struct Children<'s, T> {
    values: Vec<Value<'s, T>>,
}

impl<'s, T> Children<'s, T> {
    pub(crate) fn new(values: Vec<Value<'s, T>>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value<'s, T>> {
        self.values.get(index)
    }

    /// Moves the value at `index` out, leaving [`Value::Empty`] behind.
    pub fn take(&mut self, index: usize) -> Value<'s, T> {
        self.values
            .get_mut(index)
            .map_or(Value::Empty, |slot| std::mem::replace(slot, Value::Empty))
    }

    pub fn node(&mut self, index: usize) -> Option<T> {
        self.take(index).into_node()
    }

    pub fn token(&self, index: usize) -> Option<Token<'s>> {
        self.get(index).and_then(Value::as_token).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value<'s, T>> {
        self.values.iter()
    }

    pub fn into_vec(self) -> Vec<Value<'s, T>> {
        self.values
    }
}

impl<'s, T> IntoIterator for Children<'s, T> {
    type Item = Value<'s, T>;
    type IntoIter = std::vec::IntoIter<Value<'s, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
