//! # Code Page 437
//!
//! PC437 is character table 0 on ESC/POS printers and the power-on default,
//! so it is the codepage every job starts in. ASCII passes through; the upper
//! half maps through [`UPPER_HALF`]; anything else becomes `?`.

use tracing::warn;

/// Unicode characters for CP437 bytes 0x80–0xFF, in byte order.
#[rustfmt::skip]
pub const UPPER_HALF: [char; 128] = [
    // 0x80
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    // 0x90
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ',
    // 0xA0
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»',
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
];

/// Encode a string as CP437 bytes, replacing unmapped characters with `?`.
pub fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        match to_byte(ch) {
            Some(byte) => out.push(byte),
            None => {
                warn!(character = %ch, code_point = ch as u32, "no CP437 mapping, printing '?'");
                out.push(b'?');
            }
        }
    }
    out
}

/// Map one character to its CP437 byte.
pub fn to_byte(ch: char) -> Option<u8> {
    if ch.is_ascii() {
        return Some(ch as u8);
    }
    UPPER_HALF
        .iter()
        .position(|&c| c == ch)
        .map(|idx| 0x80 + idx as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(encode("Total: $12.50\n"), b"Total: $12.50\n");
    }

    #[test]
    fn test_table_has_no_duplicates() {
        for (i, a) in UPPER_HALF.iter().enumerate() {
            for b in &UPPER_HALF[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_spanish_text() {
        assert_eq!(encode("Año"), vec![0x41, 0xA4, 0x6F]);
        assert_eq!(encode("¿Qué?"), vec![0xA8, 0x51, 0x75, 0x82, 0x3F]);
        assert_eq!(encode("¡Olé!"), vec![0xAD, 0x4F, 0x6C, 0x82, 0x21]);
    }

    #[test]
    fn test_table_anchors() {
        assert_eq!(to_byte('Ç'), Some(0x80));
        assert_eq!(to_byte('─'), Some(0xC4));
        assert_eq!(to_byte('°'), Some(0xF8));
        assert_eq!(to_byte('\u{00A0}'), Some(0xFF));
    }

    #[test]
    fn test_unmapped_char_becomes_question_mark() {
        assert_eq!(encode("€5"), vec![b'?', b'5']);
    }
}
