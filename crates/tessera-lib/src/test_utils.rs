use crate::grammar::{Grammar, Value};
use crate::parser::Parser;
use crate::terminal::Terminal;

pub fn whitespace() -> Terminal {
    Terminal::scan(|rest| Some(rest.len() - rest.trim_start().len())).ignored()
}

pub fn number() -> Terminal {
    Terminal::scan(|rest| Some(rest.bytes().take_while(u8::is_ascii_digit).count())).named("number")
}

pub fn identifier() -> Terminal {
    Terminal::scan(|rest| {
        let first = rest.bytes().next()?;
        if !(first.is_ascii_alphabetic() || first == b'_') {
            return None;
        }
        Some(
            rest.bytes()
                .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
                .count(),
        )
    })
    .named("identifier")
}

/// `list = number ("," number)*`, summed.
pub fn summing() -> Parser<i64> {
    let mut g = Grammar::<i64>::new();
    g.terminal(whitespace());
    let num = g.terminal(number());
    g.transform(num, |token| token.text().parse().unwrap_or_default());
    let comma = g.terminal(',');
    let list = g.rule("list");
    g.define(list)
        .repeat_separator(num, comma)
        .on_match(|children| children.into_iter().filter_map(Value::into_node).sum());
    Parser::new(g, list)
}
