//! Text normalization for answer comparison.
//!
//! These transforms produce canonical forms that are only ever compared,
//! never displayed. All of them are idempotent and accept empty input.

use regex::Regex;
use std::sync::LazyLock;

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid regex"));

static LEADING_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(der|die|das)\s+").expect("valid regex"));

static LEADING_INFINITIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^to\s+").expect("valid regex"));

/// Lowercase and fold German letters to their base form.
///
/// Umlauts lose their dots, `ß` becomes `ss`, and question marks,
/// parenthesized asides and apostrophes are removed.
pub fn fold_diacritics(s: &str) -> String {
    let lowered = s.to_lowercase();
    let mut folded = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        match c {
            'ä' => folded.push('a'),
            'ö' => folded.push('o'),
            'ü' => folded.push('u'),
            'ß' => folded.push_str("ss"),
            '?' => {}
            _ => folded.push(c),
        }
    }
    let folded = strip_parenthesized(&folded);
    folded.replace('\'', "").trim().to_string()
}

/// Remove one leading definite article (`der`, `die`, `das`).
pub fn strip_article(s: &str) -> String {
    LEADING_ARTICLE.replace(s.trim(), "").into_owned()
}

/// Remove one leading infinitive marker (`to `).
pub fn strip_infinitive_marker(s: &str) -> String {
    LEADING_INFINITIVE.replace(s.trim(), "").into_owned()
}

/// Remove every `( ... )` aside, shortest match first.
pub fn strip_parenthesized(s: &str) -> String {
    PARENTHESIZED.replace_all(s, "").into_owned()
}

/// Trim, lowercase and drop question marks and asides.
///
/// This is the cleaning applied to both sides before any
/// direction-specific normalization.
pub fn clean(s: &str) -> String {
    let lowered = s.trim().to_lowercase().replace('?', "");
    strip_parenthesized(&lowered).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_maps_umlauts_and_sharp_s() {
        assert_eq!(fold_diacritics("Häuser"), "hauser");
        assert_eq!(fold_diacritics("Größe"), "grosse");
        assert_eq!(fold_diacritics("Übung"), "ubung");
    }

    #[test]
    fn fold_strips_punctuation_and_asides() {
        assert_eq!(fold_diacritics("Wie geht's?"), "wie gehts");
        assert_eq!(fold_diacritics("der Hund (m)"), "der hund");
    }

    #[test]
    fn fold_is_idempotent() {
        for s in [
            "",
            "Straße",
            "ÄÖÜ ß?",
            "a(b(c)d)e",
            "it's (so) 'quoted'",
            "  padded  ",
            "ẞ",
        ] {
            let once = fold_diacritics(s);
            assert_eq!(fold_diacritics(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn strip_article_only_at_start() {
        assert_eq!(strip_article("der Hund"), "Hund");
        assert_eq!(strip_article("DIE   Katze"), "Katze");
        assert_eq!(strip_article("Das Haus"), "Haus");
        assert_eq!(strip_article("Hund der"), "Hund der");
        assert_eq!(strip_article("derHund"), "derHund");
        assert_eq!(strip_article(""), "");
    }

    #[test]
    fn strip_article_removes_one_article() {
        assert_eq!(strip_article("der die Hund"), "die Hund");
    }

    #[test]
    fn strip_infinitive_marker_once() {
        assert_eq!(strip_infinitive_marker("to go"), "go");
        assert_eq!(strip_infinitive_marker("go to bed"), "go to bed");
        assert_eq!(strip_infinitive_marker("tomato"), "tomato");
        assert_eq!(strip_infinitive_marker(""), "");
    }

    #[test]
    fn clean_lowercases_and_trims() {
        assert_eq!(clean("  What?  "), "what");
        assert_eq!(clean("Bank (bench)"), "bank");
        assert_eq!(clean(""), "");
    }
}
