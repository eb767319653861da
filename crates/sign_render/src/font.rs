//! A small built-in bitmap font.
//!
//! spec §1 treats "the canvas rasterizer library" as an external
//! collaborator, so this crate does not ship a general-purpose text shaper.
//! What it needs is just enough to draw ASCII strings onto an LED matrix,
//! the same way the reference pack's `font_10x16` crate bundles a fixed
//! bitmap font instead of depending on a font-file parser. Each glyph is
//! `GLYPH_WIDTH x GLYPH_HEIGHT` pixels; lowercase letters reuse their
//! uppercase glyph, which is standard practice for small dot-matrix
//! signage fonts.

/// Glyph width in pixels, before `fontSize` scaling.
pub const GLYPH_WIDTH: usize = 3;
/// Glyph height in pixels, before `fontSize` scaling.
pub const GLYPH_HEIGHT: usize = 5;

/// Returns the glyph bitmap for `ch`, or the space glyph for anything not
/// in the table. Row 0 is the top row; within a row, bit 2 is the leftmost
/// column and bit 0 is the rightmost.
#[must_use]
pub fn glyph(ch: char) -> [u8; GLYPH_HEIGHT] {
    let upper = ch.to_ascii_uppercase();
    glyph_table(upper).unwrap_or(SPACE)
}

const SPACE: [u8; 5] = [0, 0, 0, 0, 0];

fn row(bits: &str) -> u8 {
    bits.bytes().fold(0u8, |acc, b| (acc << 1) | u8::from(b == b'1'))
}

fn glyph_table(ch: char) -> Option<[u8; GLYPH_HEIGHT]> {
    let rows: [&str; 5] = match ch {
        ' ' => ["000", "000", "000", "000", "000"],
        '!' => ["010", "010", "010", "000", "010"],
        '\'' => ["010", "010", "000", "000", "000"],
        ',' => ["000", "000", "000", "010", "100"],
        '-' => ["000", "000", "111", "000", "000"],
        '.' => ["000", "000", "000", "000", "010"],
        ':' => ["000", "010", "000", "010", "000"],
        ';' => ["000", "010", "000", "010", "100"],
        '?' => ["110", "001", "010", "000", "010"],
        '_' => ["000", "000", "000", "000", "111"],
        '0' => ["111", "101", "101", "101", "111"],
        '1' => ["010", "110", "010", "010", "111"],
        '2' => ["111", "001", "111", "100", "111"],
        '3' => ["111", "001", "111", "001", "111"],
        '4' => ["101", "101", "111", "001", "001"],
        '5' => ["111", "100", "111", "001", "111"],
        '6' => ["111", "100", "111", "101", "111"],
        '7' => ["111", "001", "010", "010", "010"],
        '8' => ["111", "101", "111", "101", "111"],
        '9' => ["111", "101", "111", "001", "111"],
        'A' => ["010", "101", "111", "101", "101"],
        'B' => ["110", "101", "110", "101", "110"],
        'C' => ["011", "100", "100", "100", "011"],
        'D' => ["110", "101", "101", "101", "110"],
        'E' => ["111", "100", "110", "100", "111"],
        'F' => ["111", "100", "110", "100", "100"],
        'G' => ["011", "100", "101", "101", "011"],
        'H' => ["101", "101", "111", "101", "101"],
        'I' => ["111", "010", "010", "010", "111"],
        'J' => ["001", "001", "001", "101", "010"],
        'K' => ["101", "101", "110", "101", "101"],
        'L' => ["100", "100", "100", "100", "111"],
        'M' => ["101", "111", "111", "101", "101"],
        'N' => ["101", "111", "111", "111", "101"],
        'O' => ["010", "101", "101", "101", "010"],
        'P' => ["110", "101", "110", "100", "100"],
        'Q' => ["010", "101", "101", "111", "011"],
        'R' => ["110", "101", "110", "101", "101"],
        'S' => ["011", "100", "010", "001", "110"],
        'T' => ["111", "010", "010", "010", "010"],
        'U' => ["101", "101", "101", "101", "111"],
        'V' => ["101", "101", "101", "101", "010"],
        'W' => ["101", "101", "101", "111", "101"],
        'X' => ["101", "101", "010", "101", "101"],
        'Y' => ["101", "101", "010", "010", "010"],
        'Z' => ["111", "001", "010", "100", "111"],
        _ => return None,
    };
    Some(rows.map(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_is_blank() {
        assert_eq!(glyph(' '), SPACE);
    }

    #[test]
    fn unknown_char_falls_back_to_blank() {
        assert_eq!(glyph('\u{1F600}'), SPACE);
    }

    #[test]
    fn lowercase_reuses_uppercase_glyph() {
        assert_eq!(glyph('h'), glyph('H'));
    }

    #[test]
    fn letter_h_is_not_blank() {
        assert_ne!(glyph('H'), SPACE);
    }
}
