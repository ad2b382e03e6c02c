//! Entry-id notation.
//!
//! Ids follow the conventional short notation for the Ethics: `e1p8` is
//! Proposition 8 of Part 1, `e2d4` is Definition 4 of Part 2, `e1apx` is the
//! Appendix of Part 1. Parsing is display-only sugar; ids are otherwise
//! opaque to the index and the graph, so an unconventional id simply yields
//! no notation.
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Definition,
    Axiom,
    Proposition,
    Corollary,
    Scholium,
    Lemma,
    Postulate,
    Preface,
    Appendix,
}

impl EntryKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Definition => "Definition",
            EntryKind::Axiom => "Axiom",
            EntryKind::Proposition => "Proposition",
            EntryKind::Corollary => "Corollary",
            EntryKind::Scholium => "Scholium",
            EntryKind::Lemma => "Lemma",
            EntryKind::Postulate => "Postulate",
            EntryKind::Preface => "Preface",
            EntryKind::Appendix => "Appendix",
        }
    }
}

/// Parsed form of a conventional entry id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notation {
    pub part: u32,
    pub kind: EntryKind,
    pub number: Option<u32>,
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.number {
            Some(n) => write!(f, "Part {}, {} {}", self.part, self.kind.label(), n),
            None => write!(f, "Part {}, {}", self.part, self.kind.label()),
        }
    }
}

fn notation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Longer tokens first so "apx" is not consumed as "a" + garbage.
        Regex::new(r"^e(\d+)(apx|pref|post|d|a|p|c|s|l)(\d+)?$").unwrap()
    })
}

/// Parse a conventional id like `e1p8`. Returns `None` for ids that do not
/// follow the notation.
#[must_use]
pub fn parse(id: &str) -> Option<Notation> {
    let caps = notation_re().captures(id)?;
    let part: u32 = caps.get(1)?.as_str().parse().ok()?;
    let kind = match caps.get(2)?.as_str() {
        "d" => EntryKind::Definition,
        "a" => EntryKind::Axiom,
        "p" => EntryKind::Proposition,
        "c" => EntryKind::Corollary,
        "s" => EntryKind::Scholium,
        "l" => EntryKind::Lemma,
        "post" => EntryKind::Postulate,
        "pref" => EntryKind::Preface,
        "apx" => EntryKind::Appendix,
        _ => return None,
    };
    let number = match caps.get(3) {
        Some(m) => Some(m.as_str().parse().ok()?),
        None => None,
    };
    Some(Notation { part, kind, number })
}

/// Human label for an id: the parsed notation when available, the raw id
/// otherwise.
#[must_use]
pub fn label(id: &str) -> String {
    match parse(id) {
        Some(n) => n.to_string(),
        None => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbered_entries() {
        let n = parse("e1p8").unwrap();
        assert_eq!(n, Notation { part: 1, kind: EntryKind::Proposition, number: Some(8) });
        assert_eq!(n.to_string(), "Part 1, Proposition 8");

        let n = parse("e2d4").unwrap();
        assert_eq!(n, Notation { part: 2, kind: EntryKind::Definition, number: Some(4) });
    }

    #[test]
    fn parses_unnumbered_entries() {
        let n = parse("e1apx").unwrap();
        assert_eq!(n, Notation { part: 1, kind: EntryKind::Appendix, number: None });
        assert_eq!(n.to_string(), "Part 1, Appendix");

        assert_eq!(parse("e4pref").unwrap().kind, EntryKind::Preface);
        assert_eq!(parse("e2post1").unwrap().kind, EntryKind::Postulate);
    }

    #[test]
    fn unconventional_ids_have_no_notation() {
        assert!(parse("intro").is_none());
        assert!(parse("e1x3").is_none());
        assert!(parse("p8").is_none());
        assert_eq!(label("intro"), "intro");
        assert_eq!(label("e1p8"), "Part 1, Proposition 8");
    }
}
