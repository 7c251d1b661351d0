//! Normalization pass for chord and roman-numeral text.
//!
//! Pure string → string, driven by a substitution table that is applied in order,
//! followed by parenthesis flattening. Grammar matching happens afterwards on the
//! ASCII-only result, so the two stages never depend on each other.

/// Ordered substitutions. Longer patterns come before their prefixes so that
/// `Δ7` becomes `maj7` rather than `maj77`.
const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("𝄫", "bb"),
    ("𝄪", "##"),
    ("♭", "b"),
    ("♯", "#"),
    ("＃", "#"),
    ("♮", ""),
    ("（", "("),
    ("）", ")"),
    ("Δ7", "maj7"),
    ("△7", "maj7"),
    ("∆7", "maj7"),
    ("Δ", "maj7"),
    ("△", "maj7"),
    ("∆", "maj7"),
    ("−", "-"),
    ("º", "°"),
    ("˚", "°"),
];

/// Normalize Unicode musical notation to the ASCII grammar.
///
/// - flat/sharp glyphs (and their double forms) become `b` / `#`
/// - full-width parentheses and sharp become ASCII
/// - the triangle major-seventh glyph becomes `maj7`
/// - parenthesized alterations are flattened: `Bm7(b5)` → `Bm7b5`
///
/// # Example
/// ```
/// use chordflow::normalize::normalize;
///
/// assert_eq!(normalize("B♭△7"), "Bbmaj7");
/// assert_eq!(normalize("Bm7（♭5）"), "Bm7b5");
/// ```
pub fn normalize(text: &str) -> String {
    let mut out = text.trim().to_string();
    for (from, to) in SUBSTITUTIONS {
        if out.contains(from) {
            out = out.replace(from, to);
        }
    }
    flatten_parentheses(&out)
}

/// Drop parentheses, keeping their content in place.
fn flatten_parentheses(text: &str) -> String {
    text.chars().filter(|&c| c != '(' && c != ')').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accidental_glyphs() {
        assert_eq!(normalize("E♭m7"), "Ebm7");
        assert_eq!(normalize("F♯"), "F#");
        assert_eq!(normalize("C＃m"), "C#m");
        assert_eq!(normalize("♭VII"), "bVII");
        assert_eq!(normalize("B𝄫"), "Bbb");
    }

    #[test]
    fn test_triangle_forms() {
        assert_eq!(normalize("CΔ"), "Cmaj7");
        assert_eq!(normalize("C△"), "Cmaj7");
        assert_eq!(normalize("CΔ7"), "Cmaj7");
        assert_eq!(normalize("IΔ7"), "Imaj7");
    }

    #[test]
    fn test_parentheses_flattened() {
        assert_eq!(normalize("Bm7(b5)"), "Bm7b5");
        assert_eq!(normalize("Cm(maj7)"), "Cmmaj7");
        assert_eq!(normalize("C（add9）"), "Cadd9");
        assert_eq!(normalize("V7(b9)"), "V7b9");
    }

    #[test]
    fn test_plain_ascii_untouched() {
        assert_eq!(normalize("  G7/B "), "G7/B");
        assert_eq!(normalize("Am7"), "Am7");
    }
}
