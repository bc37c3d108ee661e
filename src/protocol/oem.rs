//! # DOS Code Pages
//!
//! Western-European ESC/POS character tables that have no WHATWG label and
//! so are not known to `encoding_rs`. Like [`super::cp437`], each is ASCII in
//! the lower half plus a 128-entry upper half.
//!
//! | Table | Usual `ESC t` | Notes |
//! |-------|---------------|-------|
//! | [`CP850`] | 2 | Multilingual Latin-1 |
//! | [`CP860`] | 3 | Portuguese |
//! | [`CP852`] | 18 | Latin-2 |
//! | [`CP858`] | 19 | CP850 with `€` at 0xD5 |

use tracing::warn;

/// A single-byte DOS table.
#[derive(Debug, PartialEq, Eq)]
pub struct OemTable {
    pub name: &'static str,
    /// Unicode characters for bytes 0x80–0xFF, in byte order.
    pub upper_half: [char; 128],
}

impl OemTable {
    /// Encode `s`, replacing unmapped characters with `?`.
    pub fn encode(&self, s: &str) -> Vec<u8> {
        s.chars()
            .map(|ch| {
                self.to_byte(ch).unwrap_or_else(|| {
                    warn!(codepage = self.name, character = %ch, "no mapping, printing '?'");
                    b'?'
                })
            })
            .collect()
    }

    pub fn to_byte(&self, ch: char) -> Option<u8> {
        if ch.is_ascii() {
            return Some(ch as u8);
        }
        self.upper_half
            .iter()
            .position(|&c| c == ch)
            .map(|idx| 0x80 + idx as u8)
    }
}

/// Resolve `cp850`, `850`, `ibm850`, `pc850` and the same for the other tables.
pub fn for_label(label: &str) -> Option<&'static OemTable> {
    let number = label
        .strip_prefix("cp")
        .or_else(|| label.strip_prefix("ibm"))
        .or_else(|| label.strip_prefix("pc"))
        .unwrap_or(label);
    match number {
        "850" => Some(&CP850),
        "852" => Some(&CP852),
        "858" => Some(&CP858),
        "860" => Some(&CP860),
        _ => None,
    }
}

#[rustfmt::skip]
pub static CP850: OemTable = OemTable {
    name: "cp850",
    upper_half: [
        // 0x80
        'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
        // 0x90
        'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', 'ø', '£', 'Ø', '×', 'ƒ',
        // 0xA0
        'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '®', '¬', '½', '¼', '¡', '«', '»',
        // 0xB0
        '░', '▒', '▓', '│', '┤', 'Á', 'Â', 'À', '©', '╣', '║', '╗', '╝', '¢', '¥', '┐',
        // 0xC0
        '└', '┴', '┬', '├', '─', '┼', 'ã', 'Ã', '╚', '╔', '╩', '╦', '╠', '═', '╬', '¤',
        // 0xD0
        'ð', 'Ð', 'Ê', 'Ë', 'È', 'ı', 'Í', 'Î', 'Ï', '┘', '┌', '█', '▄', '¦', 'Ì', '▀',
        // 0xE0
        'Ó', 'ß', 'Ô', 'Ò', 'õ', 'Õ', 'µ', 'þ', 'Þ', 'Ú', 'Û', 'Ù', 'ý', 'Ý', '¯', '´',
        // 0xF0
        '\u{00AD}', '±', '‗', '¾', '¶', '§', '÷', '¸', '°', '¨', '·', '¹', '³', '²', '■', '\u{00A0}',
    ],
};

#[rustfmt::skip]
pub static CP858: OemTable = OemTable {
    name: "cp858",
    upper_half: [
        // 0x80
        'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
        // 0x90
        'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', 'ø', '£', 'Ø', '×', 'ƒ',
        // 0xA0
        'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '®', '¬', '½', '¼', '¡', '«', '»',
        // 0xB0
        '░', '▒', '▓', '│', '┤', 'Á', 'Â', 'À', '©', '╣', '║', '╗', '╝', '¢', '¥', '┐',
        // 0xC0
        '└', '┴', '┬', '├', '─', '┼', 'ã', 'Ã', '╚', '╔', '╩', '╦', '╠', '═', '╬', '¤',
        // 0xD0
        'ð', 'Ð', 'Ê', 'Ë', 'È', '€', 'Í', 'Î', 'Ï', '┘', '┌', '█', '▄', '¦', 'Ì', '▀',
        // 0xE0
        'Ó', 'ß', 'Ô', 'Ò', 'õ', 'Õ', 'µ', 'þ', 'Þ', 'Ú', 'Û', 'Ù', 'ý', 'Ý', '¯', '´',
        // 0xF0
        '\u{00AD}', '±', '‗', '¾', '¶', '§', '÷', '¸', '°', '¨', '·', '¹', '³', '²', '■', '\u{00A0}',
    ],
};

#[rustfmt::skip]
pub static CP852: OemTable = OemTable {
    name: "cp852",
    upper_half: [
        // 0x80
        'Ç', 'ü', 'é', 'â', 'ä', 'ů', 'ć', 'ç', 'ł', 'ë', 'Ő', 'ő', 'î', 'Ź', 'Ä', 'Ć',
        // 0x90
        'É', 'Ĺ', 'ĺ', 'ô', 'ö', 'Ľ', 'ľ', 'Ś', 'ś', 'Ö', 'Ü', 'Ť', 'ť', 'Ł', '×', 'č',
        // 0xA0
        'á', 'í', 'ó', 'ú', 'Ą', 'ą', 'Ž', 'ž', 'Ę', 'ę', '¬', 'ź', 'Č', 'ş', '«', '»',
        // 0xB0
        '░', '▒', '▓', '│', '┤', 'Á', 'Â', 'Ě', 'Ş', '╣', '║', '╗', '╝', 'Ż', 'ż', '┐',
        // 0xC0
        '└', '┴', '┬', '├', '─', '┼', 'Ă', 'ă', '╚', '╔', '╩', '╦', '╠', '═', '╬', '¤',
        // 0xD0
        'đ', 'Đ', 'Ď', 'Ë', 'ď', 'Ň', 'Í', 'Î', 'ě', '┘', '┌', '█', '▄', 'Ţ', 'Ů', '▀',
        // 0xE0
        'Ó', 'ß', 'Ô', 'Ń', 'ń', 'ň', 'Š', 'š', 'Ŕ', 'Ú', 'ŕ', 'Ű', 'ý', 'Ý', 'ţ', '´',
        // 0xF0
        '\u{00AD}', '˝', '˛', 'ˇ', '˘', '§', '÷', '¸', '°', '¨', '˙', 'ű', 'Ř', 'ř', '■', '\u{00A0}',
    ],
};

#[rustfmt::skip]
pub static CP860: OemTable = OemTable {
    name: "cp860",
    upper_half: [
        // 0x80
        'Ç', 'ü', 'é', 'â', 'ã', 'à', 'Á', 'ç', 'ê', 'Ê', 'è', 'Í', 'Ô', 'ì', 'Ã', 'Â',
        // 0x90
        'É', 'À', 'È', 'ô', 'õ', 'ò', 'Ú', 'ù', 'Ì', 'Õ', 'Ü', '¢', '£', 'Ù', '₧', 'Ó',
        // 0xA0
        'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', 'Ò', '¬', '½', '¼', '¡', '«', '»',
        // 0xB0
        '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐',
        // 0xC0
        '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧',
        // 0xD0
        '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
        // 0xE0
        'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩',
        // 0xF0
        '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{00A0}',
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_have_no_duplicates() {
        for table in [&CP850, &CP852, &CP858, &CP860] {
            for (i, a) in table.upper_half.iter().enumerate() {
                for b in &table.upper_half[i + 1..] {
                    assert_ne!(a, b, "{}", table.name);
                }
            }
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(for_label("cp850"), Some(&CP850));
        assert_eq!(for_label("850"), Some(&CP850));
        assert_eq!(for_label("ibm852"), Some(&CP852));
        assert_eq!(for_label("pc858"), Some(&CP858));
        assert_eq!(for_label("cp860"), Some(&CP860));
        assert_eq!(for_label("cp865"), None);
    }

    #[test]
    fn test_euro_only_in_858() {
        assert_eq!(CP858.encode("Año €"), vec![b'A', 0xA4, b'o', b' ', 0xD5]);
        assert_eq!(CP850.encode("€"), vec![b'?']);
        assert_eq!(CP850.encode("ı"), vec![0xD5]);
    }

    #[test]
    fn test_portuguese_and_latin2() {
        assert_eq!(CP860.encode("Ação"), vec![b'A', 0x87, 0x84, b'o']);
        assert_eq!(CP852.encode("Łódź"), vec![0x9D, 0xA2, b'd', 0xAB]);
    }
}
