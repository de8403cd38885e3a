/// Grammar definition errors.
///
/// Builder misuse is recorded as the grammar is built and surfaces, together
/// with structural problems found by the compiler, from the first compile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("rule `{rule}` has no steps")]
    EmptyRule { rule: String },

    #[error("rule `{rule}` contains an empty alternation")]
    EmptyAlternation { rule: String },

    #[error("rule `{rule}` is a {existing} rule and cannot take {attempted} steps")]
    MixedRuleKinds {
        rule: String,
        existing: &'static str,
        attempted: &'static str,
    },

    #[error("rule `{rule}` has {groups} alternation groups but no match action")]
    MissingAction { rule: String, groups: usize },

    #[error("rule `{rule}` already has a match action")]
    DuplicateAction { rule: String },

    #[error("left recursion without progress: {}", .cycle.join(" -> "))]
    LeftRecursion { cycle: Vec<String> },

    #[error("rule `{rule}` references unknown rule #{id}")]
    UnknownRule { rule: String, id: u32 },

    #[error("{context} references unknown terminal #{id}")]
    UnknownTerminal { context: String, id: u32 },

    #[error("terminal #{id} is an empty literal")]
    EmptyLiteral { id: u32 },
}
