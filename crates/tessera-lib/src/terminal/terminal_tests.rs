use super::*;

fn table(defs: impl IntoIterator<Item = Terminal>) -> (TerminalTable, Vec<TerminalId>) {
    let mut table = TerminalTable::default();
    let ids = defs.into_iter().map(|t| table.push(t).0).collect();
    (table, ids)
}

fn digits() -> Terminal {
    Terminal::scan(|rest| Some(rest.bytes().take_while(u8::is_ascii_digit).count()))
}

#[test]
fn ids_start_at_one() {
    let (_, ids) = table([Terminal::char('a'), Terminal::char('b')]);

    assert_eq!(ids[0].as_u32(), 1);
    assert_eq!(ids[1].as_u32(), 2);
    assert_eq!(ids[1].index(), 1);
    assert_eq!(std::mem::size_of::<Option<TerminalId>>(), 4);
}

#[test]
fn char_has_no_word_boundary() {
    let (table, ids) = table([Terminal::char('a')]);

    assert_eq!(table.match_at(ids[0], "ab", 0).map(|m| m.len), Some(1));
    assert_eq!(table.match_at(ids[0], "ba", 0), None);
}

#[test]
fn literal_respects_word_boundary() {
    let (table, ids) = table([Terminal::literal("end"), Terminal::literal("x")]);

    assert_eq!(table.match_at(ids[0], "endpoint", 0), None);
    assert_eq!(table.match_at(ids[0], "end point", 0).map(|m| m.len), Some(3));
    assert_eq!(table.match_at(ids[0], "end", 0).map(|m| m.len), Some(3));
    assert_eq!(table.match_at(ids[0], "end_", 0), None);
    assert_eq!(table.match_at(ids[1], "xy", 0), None);
    assert_eq!(table.match_at(ids[1], "x+", 0).map(|m| m.len), Some(1));
}

#[test]
fn punctuation_literal_is_unbounded() {
    let (table, ids) = table([Terminal::literal("==")]);

    assert_eq!(table.match_at(ids[0], "==a", 0).map(|m| m.len), Some(2));
}

#[test]
fn literal_matches_at_offset() {
    let (table, ids) = table([Terminal::literal("if")]);

    assert_eq!(table.match_at(ids[0], "x if", 2).map(|m| m.len), Some(2));
    assert_eq!(table.match_at(ids[0], "x if", 1), None);
}

#[test]
fn scan_zero_length_is_no_match() {
    let (table, ids) = table([digits()]);

    assert_eq!(table.match_at(ids[0], "123x", 0).map(|m| m.len), Some(3));
    assert_eq!(table.match_at(ids[0], "x123", 0), None);
}

#[test]
fn scan_rejects_out_of_range_lengths() {
    let (table, ids) = table([Terminal::scan(|_| Some(10)), Terminal::scan(|_| Some(1))]);

    assert_eq!(table.match_at(ids[0], "abc", 0), None);
    assert_eq!(table.match_at(ids[1], "é", 0), None);
}

#[test]
fn pattern_is_anchored() {
    let (table, ids) = table([Terminal::pattern("[a-z]+").unwrap()]);

    assert_eq!(table.match_at(ids[0], "abc1", 0).map(|m| m.len), Some(3));
    assert_eq!(table.match_at(ids[0], "1abc", 0), None);
    assert_eq!(table.match_at(ids[0], "1abc", 1).map(|m| m.len), Some(3));
}

#[test]
fn pattern_sees_context() {
    let (table, ids) = table([Terminal::pattern(r"\bx").unwrap()]);

    assert_eq!(table.match_at(ids[0], "ax", 1), None);
    assert_eq!(table.match_at(ids[0], " x", 1).map(|m| m.len), Some(1));
}

#[test]
fn invalid_pattern() {
    let err = Terminal::pattern("(").unwrap_err();

    assert!(matches!(err, Error::InvalidPattern { ref pattern, .. } if pattern == "("));
}

#[test]
fn set_tries_members_in_order() {
    let mut table = TerminalTable::default();
    let a = table.push(Terminal::literal("a")).0;
    let ch = table.push(Terminal::char('a')).0;
    let set = table.push(Terminal::one_of([ch, a])).0;

    assert_eq!(table.match_at(set, "ab", 0).map(|m| m.len), Some(1));
    assert_eq!(table.accepted(set), vec![set, ch, a]);
    assert_eq!(table.display_name(set), "'a' | \"a\"");
}

#[test]
fn set_literal_length_is_minimum() {
    let mut table = TerminalTable::default();
    let eq = table.push(Terminal::literal("==")).0;
    let ne = table.push(Terminal::literal("!==")).0;
    let word = table.push(digits()).0;
    let ops = table.push(Terminal::one_of([eq, ne])).0;
    let mixed = table.push(Terminal::one_of([eq, word])).0;

    assert_eq!(table.literal_len(ops), Some(2));
    assert!(!table.is_literal(mixed));
}

#[test]
fn set_with_unknown_member() {
    let mut table = TerminalTable::default();
    let ghost = TerminalId::from_index(7);
    let (id, unknown) = table.push(Terminal::one_of([ghost]));

    assert_eq!(unknown, Some(ghost));
    assert_eq!(table.match_at(id, "x", 0), None);
}

#[test]
fn extend_hook_consumes_more() {
    let quote = Terminal::char('"').extend(|rest| rest.find('"').map_or(0, |i| i + 1));
    let (table, ids) = table([quote]);

    let m = table.match_at(ids[0], "\"abc\" tail", 0).unwrap();
    assert_eq!(m, TerminalMatch { len: 1, extra: 4 });
    assert_eq!(m.consumed(), 5);
}

#[test]
fn display_names() {
    let (table, ids) = table([
        Terminal::char('+'),
        Terminal::literal("let"),
        digits(),
        digits().named("number"),
        Terminal::pattern("[a-z]+").unwrap(),
    ]);

    assert_eq!(table.display_name(ids[0]), "'+'");
    assert_eq!(table.display_name(ids[1]), "\"let\"");
    assert_eq!(table.display_name(ids[2]), "#3");
    assert_eq!(table.display_name(ids[3]), "number");
    assert_eq!(table.display_name(ids[4]), "/[a-z]+/");
}

#[test]
fn from_conversions() {
    let (table, ids) = table([Terminal::from('x'), Terminal::from("yy"), Terminal::from(String::from("z"))]);

    assert!(table.is_literal(ids[0]));
    assert_eq!(table.literal_len(ids[1]), Some(2));
    assert!(!table.is_ignored(ids[2]));
}
