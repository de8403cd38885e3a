use std::fmt;

use regex_automata::{Anchored, Input, meta};

use super::{ScanFn, TerminalId, is_word_byte};

pub(crate) enum Matcher {
    Char(char),
    Literal { text: String, bounded: bool },
    Scan(ScanFn),
    Pattern { source: String, regex: Box<meta::Regex> },
    /// Resolved by the table, which owns the members.
    OneOf(Vec<TerminalId>),
}

impl Matcher {
    /// Length of the match at `pos`, or `None`. Zero-length matches are `None`.
    pub fn match_at(&self, text: &str, pos: usize) -> Option<usize> {
        let rest = text.get(pos..)?;
        let len = match self {
            Matcher::Char(c) => rest.starts_with(*c).then(|| c.len_utf8()),
            Matcher::Literal { text: lit, bounded } => {
                if !rest.as_bytes().starts_with(lit.as_bytes()) {
                    return None;
                }
                let follows_word = rest.as_bytes().get(lit.len()).copied().is_some_and(is_word_byte);
                (!(*bounded && follows_word)).then_some(lit.len())
            }
            Matcher::Scan(scan) => scan(rest).filter(|&len| len <= rest.len() && rest.is_char_boundary(len)),
            Matcher::Pattern { regex, .. } => {
                let input = Input::new(text).span(pos..text.len()).anchored(Anchored::Yes);
                regex.search(&input).map(|m| m.end() - pos)
            }
            Matcher::OneOf(_) => None,
        }?;
        (len > 0).then_some(len)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Matcher::Literal { text, bounded } => f
                .debug_struct("Literal")
                .field("text", text)
                .field("bounded", bounded)
                .finish(),
            Matcher::Scan(_) => f.write_str("Scan"),
            Matcher::Pattern { source, .. } => f.debug_tuple("Pattern").field(source).finish(),
            Matcher::OneOf(members) => f.debug_tuple("OneOf").field(members).finish(),
        }
    }
}
