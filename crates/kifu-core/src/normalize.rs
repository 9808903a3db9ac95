//! Full-width to half-width normalization for upstream Japanese text.

const FULLWIDTH_OFFSET: u32 = 0xFEE0;

/// Canonicalize full-width digits and Latin letters to ASCII, the
/// full-width space to an ASCII space, and the two triangular turn
/// markers to their star-glyph shogi-notation equivalents.
///
/// Pure, total and idempotent; no locale dependency.
pub fn normalize(s: &str) -> String {
    s.chars().map(normalize_char).collect()
}

fn normalize_char(c: char) -> char {
    match c {
        '０'..='９' | 'Ａ'..='Ｚ' | 'ａ'..='ｚ' => {
            char::from_u32(c as u32 - FULLWIDTH_OFFSET).unwrap_or(c)
        }
        '\u{3000}' => ' ',
        '△' => '☖',
        '▲' => '☗',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_fullwidth_digits_and_letters() {
        assert_eq!(normalize("２０２５年Ａ級ｂ組"), "2025年A級b組");
    }

    #[test]
    fn converts_fullwidth_space() {
        assert_eq!(normalize("豊島　将之"), "豊島 将之");
    }

    #[test]
    fn converts_turn_markers() {
        assert_eq!(normalize("▲７六歩 △３四歩"), "☗76歩 ☖34歩");
    }

    #[test]
    fn leaves_ordinary_text_alone() {
        assert_eq!(normalize("第83期名人戦七番勝負第1局"), "第83期名人戦七番勝負第1局");
    }

    #[test]
    fn idempotent() {
        let inputs = ["１２３ＡＢＣ", "▲△　", "第８４期順位戦Ａ級", "plain ascii"];
        for s in inputs {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }
}
