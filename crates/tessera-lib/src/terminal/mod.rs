//! Terminals: atomic lexical matchers.
//!
//! A [`Terminal`] is a definition; registering it on a
//! [`Grammar`](crate::Grammar) assigns a [`TerminalId`]. Registered terminals
//! live in a [`TerminalTable`] and never change afterwards.

mod matcher;

#[cfg(test)]
mod terminal_tests;

use std::fmt;
use std::num::NonZeroU32;

use regex_automata::meta;

use crate::{Error, Result};

pub(crate) use matcher::Matcher;

pub(crate) type ScanFn = Box<dyn Fn(&str) -> Option<usize> + Send + Sync>;
pub(crate) type ExtendFn = Box<dyn Fn(&str) -> usize + Send + Sync>;

/// Identity of a registered terminal.
///
/// Identities are assigned in creation order starting at 1. Zero is reserved
/// and never assigned, so `Option<TerminalId>` is the size of a `u32`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerminalId(NonZeroU32);

impl TerminalId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index as u32))
    }

    /// Position in the terminal table.
    #[inline]
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Debug for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

impl fmt::Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A terminal definition.
///
/// Build one from a `char`, a string literal, a set of already registered
/// terminals, a scanning function or a regular expression, then register it
/// with [`Grammar::terminal`](crate::Grammar::terminal).
pub struct Terminal {
    pub(crate) matcher: Matcher,
    pub(crate) name: Option<String>,
    pub(crate) ignored: bool,
    pub(crate) extend: Option<ExtendFn>,
}

impl Terminal {
    /// Matches exactly `c`, with no word-boundary check.
    pub fn char(c: char) -> Self {
        Self::with(Matcher::Char(c))
    }

    /// Matches `text` verbatim.
    ///
    /// If the literal ends in a word character (`[A-Za-z0-9_]`) the match is
    /// rejected when another word character follows it, so `"if"` does not
    /// match the start of `"ifOnly"`.
    pub fn literal(text: impl Into<String>) -> Self {
        let text = text.into();
        let bounded = text.bytes().last().is_some_and(is_word_byte);
        Self::with(Matcher::Literal { text, bounded })
    }

    /// Matches however many bytes `scan` reports for the remaining text.
    ///
    /// `None` or `Some(0)` means no match. Lengths past the end of the text or
    /// inside a multi-byte character are rejected as well.
    pub fn scan<F>(scan: F) -> Self
    where
        F: Fn(&str) -> Option<usize> + Send + Sync + 'static,
    {
        Self::with(Matcher::Scan(Box::new(scan)))
    }

    /// Matches a regular expression anchored at the current offset.
    ///
    /// The search sees the whole text, so look-around assertions such as
    /// `\b` observe the characters before the match.
    pub fn pattern(pattern: &str) -> Result<Self> {
        let regex = meta::Regex::new(pattern).map_err(|err| Error::InvalidPattern {
            pattern: pattern.to_owned(),
            message: err.to_string(),
        })?;
        Ok(Self::with(Matcher::Pattern {
            source: pattern.to_owned(),
            regex: Box::new(regex),
        }))
    }

    /// Matches the first of `members` that matches, in the given order.
    ///
    /// The set is literal only if all members are literal.
    pub fn one_of(members: impl IntoIterator<Item = TerminalId>) -> Self {
        Self::with(Matcher::OneOf(members.into_iter().collect()))
    }

    /// Matched text is skipped and never produces a symbol.
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Name used in diagnostics, dumps and traces.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Post-match hook: receives the text after the match and returns how
    /// many more bytes to consume. The extension is skipped and is not part
    /// of the symbol's range.
    pub fn extend<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) -> usize + Send + Sync + 'static,
    {
        self.extend = Some(Box::new(hook));
        self
    }

    fn with(matcher: Matcher) -> Self {
        Self {
            matcher,
            name: None,
            ignored: false,
            extend: None,
        }
    }
}

impl fmt::Debug for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Terminal")
            .field("matcher", &self.matcher)
            .field("name", &self.name)
            .field("ignored", &self.ignored)
            .field("extend", &self.extend.is_some())
            .finish()
    }
}

impl From<char> for Terminal {
    fn from(c: char) -> Self {
        Self::char(c)
    }
}

impl From<&str> for Terminal {
    fn from(text: &str) -> Self {
        Self::literal(text)
    }
}

impl From<String> for Terminal {
    fn from(text: String) -> Self {
        Self::literal(text)
    }
}

impl<const N: usize> From<[TerminalId; N]> for Terminal {
    fn from(members: [TerminalId; N]) -> Self {
        Self::one_of(members)
    }
}

impl From<Vec<TerminalId>> for Terminal {
    fn from(members: Vec<TerminalId>) -> Self {
        Self::one_of(members)
    }
}

impl From<&[TerminalId]> for Terminal {
    fn from(members: &[TerminalId]) -> Self {
        Self::one_of(members.iter().copied())
    }
}

/// A successful match: `len` bytes form the symbol, `extra` more are skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TerminalMatch {
    pub len: usize,
    pub extra: usize,
}

impl TerminalMatch {
    pub fn consumed(self) -> usize {
        self.len + self.extra
    }
}

/// Registered terminals, indexed by [`TerminalId::index`].
#[derive(Debug, Default)]
pub(crate) struct TerminalTable {
    terminals: Vec<Terminal>,
    /// Literal length per terminal (`None` for non-literal terminals).
    literal_len: Vec<Option<usize>>,
}

impl TerminalTable {
    pub fn len(&self) -> usize {
        self.terminals.len()
    }

    pub fn contains(&self, id: TerminalId) -> bool {
        id.index() < self.terminals.len()
    }

    pub fn get(&self, id: TerminalId) -> Option<&Terminal> {
        self.terminals.get(id.index())
    }

    /// Registers `terminal`. Set members must already be registered; an
    /// unknown member is returned as the error value.
    pub fn push(&mut self, terminal: Terminal) -> (TerminalId, Option<TerminalId>) {
        let id = TerminalId::from_index(self.terminals.len());
        let mut unknown = None;
        let literal_len = match &terminal.matcher {
            Matcher::Char(c) => Some(c.len_utf8()),
            Matcher::Literal { text, .. } => Some(text.len()),
            Matcher::Scan(_) | Matcher::Pattern { .. } => None,
            Matcher::OneOf(members) => {
                let mut min: Option<usize> = None;
                let mut literal = !members.is_empty();
                for &member in members {
                    match self.literal_len.get(member.index()) {
                        Some(Some(len)) => min = Some(min.map_or(*len, |m| m.min(*len))),
                        Some(None) => literal = false,
                        None => {
                            unknown.get_or_insert(member);
                            literal = false;
                        }
                    }
                }
                if literal { min } else { None }
            }
        };
        self.terminals.push(terminal);
        self.literal_len.push(literal_len);
        (id, unknown)
    }

    pub fn ids(&self) -> impl Iterator<Item = TerminalId> + '_ {
        (0..self.terminals.len()).map(TerminalId::from_index)
    }

    pub fn literal_len(&self, id: TerminalId) -> Option<usize> {
        self.literal_len.get(id.index()).copied().flatten()
    }

    pub fn is_literal(&self, id: TerminalId) -> bool {
        self.literal_len(id).is_some()
    }

    pub fn is_ignored(&self, id: TerminalId) -> bool {
        self.get(id).is_some_and(|t| t.ignored)
    }

    /// Every terminal identity a reference to `id` accepts: `id` itself and,
    /// for sets, each member's accepted identities.
    pub fn accepted(&self, id: TerminalId) -> Vec<TerminalId> {
        let mut out = vec![id];
        let mut i = 0;
        while i < out.len() {
            if let Some(Terminal {
                matcher: Matcher::OneOf(members),
                ..
            }) = self.get(out[i])
            {
                for &member in members {
                    // members precede their set, so this always terminates
                    if member.index() < out[i].index() && !out.contains(&member) {
                        out.push(member);
                    }
                }
            }
            i += 1;
        }
        out
    }

    /// Tries terminal `id` at byte offset `pos` of `text`.
    pub fn match_at(&self, id: TerminalId, text: &str, pos: usize) -> Option<TerminalMatch> {
        let terminal = self.get(id)?;
        let len = match &terminal.matcher {
            Matcher::OneOf(members) => members
                .iter()
                .filter(|member| member.index() < id.index())
                .find_map(|&member| self.match_at(member, text, pos))
                .map(|m| m.len),
            matcher => matcher.match_at(text, pos),
        }?;
        let end = pos + len;
        let extra = terminal.extend.as_ref().map_or(0, |hook| {
            let rest = &text[end..];
            let extra = hook(rest);
            if extra <= rest.len() && rest.is_char_boundary(extra) {
                extra
            } else {
                0
            }
        });
        Some(TerminalMatch { len, extra })
    }

    /// Display name: the registered name, or a rendering of the definition.
    pub fn display_name(&self, id: TerminalId) -> String {
        let Some(terminal) = self.get(id) else {
            return id.to_string();
        };
        if let Some(name) = &terminal.name {
            return name.clone();
        }
        match &terminal.matcher {
            Matcher::Char(c) => format!("{c:?}"),
            Matcher::Literal { text, .. } => format!("{text:?}"),
            Matcher::Pattern { source, .. } => format!("/{source}/"),
            Matcher::Scan(_) => id.to_string(),
            Matcher::OneOf(members) => members
                .iter()
                .map(|&member| {
                    if member.index() < id.index() {
                        self.display_name(member)
                    } else {
                        member.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}

pub(crate) fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
