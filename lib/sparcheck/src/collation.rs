//! German collation used by the `order_string` check.
//!
//! Strings are compared on three levels, as the Unicode Collation Algorithm does:
//! base letters first, then diacritics, then case (lowercase first).
//! `ß` expands to `ss` and umlauts sort with their base letter (DIN 5007-1).

use std::cmp::Ordering;

/// A multi-level sort key. Comparing keys compares the source strings.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CollationKey {
    primary: Vec<char>,
    secondary: Vec<u8>,
    tertiary: Vec<u8>,
}

impl CollationKey {
    pub fn new(value: &str) -> Self {
        let mut key = Self {
            primary: Vec::with_capacity(value.len()),
            secondary: Vec::with_capacity(value.len()),
            tertiary: Vec::with_capacity(value.len()),
        };
        for ch in value.chars() {
            let case = u8::from(ch.is_uppercase());
            if matches!(ch, 'ß' | 'ẞ') {
                for _ in 0..2 {
                    key.primary.push('s');
                    key.secondary.push(ACCENT_SHARP_S);
                    key.tertiary.push(case);
                }
                continue;
            }
            let (base, accent) = strip_diacritic(ch);
            for lower in base.to_lowercase() {
                key.primary.push(lower);
                key.secondary.push(accent);
                key.tertiary.push(case);
            }
        }
        key
    }
}

/// Compares two strings with the German collation.
pub fn compare(left: &str, right: &str) -> Ordering {
    CollationKey::new(left).cmp(&CollationKey::new(right))
}

const ACCENT_NONE: u8 = 0;
const ACCENT_ACUTE: u8 = 1;
const ACCENT_GRAVE: u8 = 2;
const ACCENT_CIRCUMFLEX: u8 = 3;
const ACCENT_TILDE: u8 = 4;
const ACCENT_DIAERESIS: u8 = 5;
const ACCENT_RING: u8 = 6;
const ACCENT_CEDILLA: u8 = 7;
const ACCENT_STROKE: u8 = 8;
const ACCENT_LIGATURE: u8 = 9;
const ACCENT_SHARP_S: u8 = 10;
const ACCENT_MACRON: u8 = 11;
const ACCENT_BREVE: u8 = 12;
const ACCENT_OGONEK: u8 = 13;
const ACCENT_DOT: u8 = 14;
const ACCENT_CARON: u8 = 15;
const ACCENT_DOUBLE_ACUTE: u8 = 16;

/// The base letter of Latin-1 and Latin Extended-A characters and the weight of their diacritic.
fn strip_diacritic(ch: char) -> (char, u8) {
    let (lower, accent) = match ch.to_lowercase().next().unwrap_or(ch) {
        'á' => ('a', ACCENT_ACUTE),
        'à' => ('a', ACCENT_GRAVE),
        'â' => ('a', ACCENT_CIRCUMFLEX),
        'ã' => ('a', ACCENT_TILDE),
        'ä' => ('a', ACCENT_DIAERESIS),
        'å' => ('a', ACCENT_RING),
        'æ' => ('a', ACCENT_LIGATURE),
        'ç' => ('c', ACCENT_CEDILLA),
        'é' => ('e', ACCENT_ACUTE),
        'è' => ('e', ACCENT_GRAVE),
        'ê' => ('e', ACCENT_CIRCUMFLEX),
        'ë' => ('e', ACCENT_DIAERESIS),
        'í' => ('i', ACCENT_ACUTE),
        'ì' => ('i', ACCENT_GRAVE),
        'î' => ('i', ACCENT_CIRCUMFLEX),
        'ï' => ('i', ACCENT_DIAERESIS),
        'ñ' => ('n', ACCENT_TILDE),
        'ó' => ('o', ACCENT_ACUTE),
        'ò' => ('o', ACCENT_GRAVE),
        'ô' => ('o', ACCENT_CIRCUMFLEX),
        'õ' => ('o', ACCENT_TILDE),
        'ö' => ('o', ACCENT_DIAERESIS),
        'ø' => ('o', ACCENT_STROKE),
        'ú' => ('u', ACCENT_ACUTE),
        'ù' => ('u', ACCENT_GRAVE),
        'û' => ('u', ACCENT_CIRCUMFLEX),
        'ü' => ('u', ACCENT_DIAERESIS),
        'ý' => ('y', ACCENT_ACUTE),
        'ÿ' => ('y', ACCENT_DIAERESIS),
        // Latin Extended-A
        'ā' => ('a', ACCENT_MACRON),
        'ă' => ('a', ACCENT_BREVE),
        'ą' => ('a', ACCENT_OGONEK),
        'ć' => ('c', ACCENT_ACUTE),
        'ĉ' => ('c', ACCENT_CIRCUMFLEX),
        'ċ' => ('c', ACCENT_DOT),
        'č' => ('c', ACCENT_CARON),
        'ď' => ('d', ACCENT_CARON),
        'đ' => ('d', ACCENT_STROKE),
        'ē' => ('e', ACCENT_MACRON),
        'ĕ' => ('e', ACCENT_BREVE),
        'ė' => ('e', ACCENT_DOT),
        'ę' => ('e', ACCENT_OGONEK),
        'ě' => ('e', ACCENT_CARON),
        'ĝ' => ('g', ACCENT_CIRCUMFLEX),
        'ğ' => ('g', ACCENT_BREVE),
        'ġ' => ('g', ACCENT_DOT),
        'ģ' => ('g', ACCENT_CEDILLA),
        'ĥ' => ('h', ACCENT_CIRCUMFLEX),
        'ħ' => ('h', ACCENT_STROKE),
        'ĩ' => ('i', ACCENT_TILDE),
        'ī' => ('i', ACCENT_MACRON),
        'ĭ' => ('i', ACCENT_BREVE),
        'į' => ('i', ACCENT_OGONEK),
        'ı' => ('i', ACCENT_DOT),
        'ĳ' => ('i', ACCENT_LIGATURE),
        'ĵ' => ('j', ACCENT_CIRCUMFLEX),
        'ķ' => ('k', ACCENT_CEDILLA),
        'ĺ' => ('l', ACCENT_ACUTE),
        'ļ' => ('l', ACCENT_CEDILLA),
        'ľ' => ('l', ACCENT_CARON),
        'ŀ' => ('l', ACCENT_DOT),
        'ł' => ('l', ACCENT_STROKE),
        'ń' => ('n', ACCENT_ACUTE),
        'ņ' => ('n', ACCENT_CEDILLA),
        'ň' => ('n', ACCENT_CARON),
        'ō' => ('o', ACCENT_MACRON),
        'ŏ' => ('o', ACCENT_BREVE),
        'ő' => ('o', ACCENT_DOUBLE_ACUTE),
        'œ' => ('o', ACCENT_LIGATURE),
        'ŕ' => ('r', ACCENT_ACUTE),
        'ŗ' => ('r', ACCENT_CEDILLA),
        'ř' => ('r', ACCENT_CARON),
        'ś' => ('s', ACCENT_ACUTE),
        'ŝ' => ('s', ACCENT_CIRCUMFLEX),
        'ş' => ('s', ACCENT_CEDILLA),
        'š' => ('s', ACCENT_CARON),
        'ţ' => ('t', ACCENT_CEDILLA),
        'ť' => ('t', ACCENT_CARON),
        'ŧ' => ('t', ACCENT_STROKE),
        'ũ' => ('u', ACCENT_TILDE),
        'ū' => ('u', ACCENT_MACRON),
        'ŭ' => ('u', ACCENT_BREVE),
        'ů' => ('u', ACCENT_RING),
        'ű' => ('u', ACCENT_DOUBLE_ACUTE),
        'ų' => ('u', ACCENT_OGONEK),
        'ŵ' => ('w', ACCENT_CIRCUMFLEX),
        'ŷ' => ('y', ACCENT_CIRCUMFLEX),
        'ź' => ('z', ACCENT_ACUTE),
        'ż' => ('z', ACCENT_DOT),
        'ž' => ('z', ACCENT_CARON),
        other => (other, ACCENT_NONE),
    };
    if accent == ACCENT_NONE {
        (ch, accent)
    } else {
        (lower, accent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(values: &[&str]) -> Vec<String> {
        let mut values = values.iter().map(|v| (*v).to_owned()).collect::<Vec<_>>();
        values.sort_by(|a, b| compare(a, b));
        values
    }

    #[test]
    fn umlauts_sort_with_base_letter() {
        assert_eq!(
            sorted(&["Zebra", "Äpfel", "Apfel", "Birne", "äpfel"]),
            ["Apfel", "äpfel", "Äpfel", "Birne", "Zebra"]
        );
        assert_eq!(compare("Ofen", "Öl"), Ordering::Less);
        assert_eq!(compare("Öl", "Olive"), Ordering::Less);
    }

    #[test]
    fn case_is_the_last_level() {
        assert_eq!(compare("a", "B"), Ordering::Less);
        assert_eq!(compare("b", "B"), Ordering::Less);
        assert_eq!(compare("Berlin", "berlin"), Ordering::Greater);
        assert_eq!(compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn sharp_s_expands() {
        assert_eq!(compare("Straße", "Strasse"), Ordering::Greater);
        assert_eq!(compare("Straße", "Strasses"), Ordering::Less);
        assert_eq!(compare("Maß", "Mast"), Ordering::Less);
    }

    #[test]
    fn latin_extended_letters_sort_with_base_letter() {
        assert_eq!(
            sorted(&["Zebra", "Škoda", "Łódź", "Čapek", "Dvořák", "Erdős", "Sand"]),
            ["Čapek", "Dvořák", "Erdős", "Łódź", "Sand", "Škoda", "Zebra"]
        );
        assert_eq!(compare("Škoda", "škoda"), Ordering::Greater);
        assert_eq!(compare("Sko", "Škoda"), Ordering::Less);
    }

    #[test]
    fn codepoint_order_differs() {
        // 'Ä' is after 'Z' in code point order
        assert!("Äpfel" > "Zebra");
        assert_eq!(compare("Äpfel", "Zebra"), Ordering::Less);
    }
}
