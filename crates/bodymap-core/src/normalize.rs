//! Canonical form for free text before dictionary matching.

/// Umlaut and sharp-s expansions applied after lower-casing.
const DIGRAPHS: [(char, &str); 4] = [('ä', "ae"), ('ö', "oe"), ('ü', "ue"), ('ß', "ss")];

/// Canonicalize free text for matching.
///
/// Lower-cases, expands German diacritics to their ASCII digraphs, turns every
/// character outside `[a-z0-9/]` and whitespace into a space, then collapses
/// whitespace runs and trims. Total and idempotent.
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());

    for ch in text.chars().flat_map(char::to_lowercase) {
        if let Some((_, digraph)) = DIGRAPHS.iter().find(|(c, _)| *c == ch) {
            folded.push_str(digraph);
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '/' {
            folded.push(ch);
        } else {
            // Whitespace and anything outside the whitelist collapse below.
            folded.push(' ');
        }
    }

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_expands_umlauts() {
        assert_eq!(normalize("Wirbelsäule"), "wirbelsaeule");
        assert_eq!(normalize("ÖL Übung Fuß"), "oel uebung fuss");
    }

    #[test]
    fn test_strips_punctuation_keeps_slash() {
        assert_eq!(normalize("  Schmerz: 6/10!! "), "schmerz 6/10");
        assert_eq!(normalize("N. radialis"), "n radialis");
    }

    #[test]
    fn test_foreign_accents_become_separators() {
        assert_eq!(normalize("brachiális"), "brachi lis");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("a\t\tb\n\nc"), "a b c");
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n"), "");
        assert_eq!(normalize("?!"), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "Brachialis rechts Schmerz 6/10 distal seit 3 Wochen",
            "Quad links, 7 von 10",
            "ÄÖÜß äöü",
            "İstanbul ǅ ﬁ",
            "   ---   ",
            "N. ischiadicus (L) — 8",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }
}
