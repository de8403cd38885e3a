use rowan::TextRange;

use crate::terminal::TerminalId;

/// Input error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    /// Characters no terminal matches.
    UnrecognizedText,
    /// A symbol no rule accepts at its position.
    UnexpectedSymbol,
    /// Input ended while a rule still needed symbols.
    UnexpectedEnd,
}

impl DiagnosticKind {
    pub fn is_lexical(&self) -> bool {
        matches!(self, Self::UnrecognizedText)
    }

    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnrecognizedText => "unrecognized text",
            Self::UnexpectedSymbol => "unexpected symbol",
            Self::UnexpectedEnd => "unexpected end of input",
        }
    }

    pub fn custom_message(&self) -> String {
        match self {
            Self::UnrecognizedText => "unrecognized text `{}`".to_string(),
            Self::UnexpectedSymbol => "unexpected {}".to_string(),
            Self::UnexpectedEnd => format!("{}; {{}}", self.fallback_message()),
        }
    }

    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

/// One input error: where it is, what text it covers and, for structural
/// errors, which terminal was found and which would have been accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub(crate) kind: DiagnosticKind,
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) text: String,
    pub(crate) found: Option<TerminalId>,
    pub(crate) expected: Vec<TerminalId>,
}

impl Diagnostic {
    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            message: kind.fallback_message().to_string(),
            text: String::new(),
            found: None,
            expected: Vec::new(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn offset(&self) -> usize {
        self.range.start().into()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The offending source text (empty at end of input).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn found(&self) -> Option<TerminalId> {
        self.found
    }

    pub fn expected(&self) -> &[TerminalId] {
        &self.expected
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "error at {}..{}: {}",
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )
    }
}
