//! Language-agnostic phonetic encoder.
//!
//! A Metaphone-family encoder: it keeps a consonant skeleton of the word,
//! folds letters that sound alike, drops silent letters and keeps a vowel
//! only when it starts the word. Diacritics are folded through Unicode NFD
//! first, so `"José"` and `"Jose"` share a code. Unlike classic Metaphone
//! the code length is not capped, which keeps long compound names apart.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::PhoneticEncoder;

/// Generic phonetic encoder used for every language without a dedicated one.
///
/// Stateless; all instances are equivalent. TH is encoded as `0` (theta),
/// following the Metaphone convention.
///
/// # Examples
///
/// ```
/// use rowmatch::{GenericPhonetic, PhoneticEncoder};
///
/// assert_eq!(GenericPhonetic.encode("Smith"), GenericPhonetic.encode("Smyth"));
/// assert_eq!(GenericPhonetic.encode("Knight"), "NT");
/// assert_eq!(GenericPhonetic.encode(""), "");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenericPhonetic;

impl PhoneticEncoder for GenericPhonetic {
    fn encode(&self, text: &str) -> String {
        let folded: String = text
            .trim()
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .collect::<String>()
            .to_uppercase();
        let chars: Vec<char> = folded.chars().filter(char::is_ascii_alphabetic).collect();
        skeleton(&chars)
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'A' | 'E' | 'I' | 'O' | 'U')
}

fn is_front_vowel(c: Option<char>) -> bool {
    matches!(c, Some('E' | 'I' | 'Y'))
}

fn skeleton(chars: &[char]) -> String {
    let len = chars.len();
    let mut code = String::with_capacity(len);
    if len == 0 {
        return code;
    }

    let mut i = 0;
    match (chars[0], chars.get(1).copied()) {
        ('K' | 'G' | 'P', Some('N')) | ('A', Some('E')) | ('W', Some('R')) => i = 1,
        ('W', Some('H')) => {
            code.push('W');
            i = 2;
        }
        ('X', _) => {
            code.push('S');
            i = 1;
        }
        _ => {}
    }

    while i < len {
        let c = chars[i];
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        let next2 = chars.get(i + 2).copied();

        // Doubled letters sound once, except CC which can be K+S.
        if prev == Some(c) && c != 'C' {
            i += 1;
            continue;
        }

        match c {
            'A' | 'E' | 'I' | 'O' | 'U' => {
                if i == 0 {
                    code.push(c);
                }
            }
            'B' => {
                if !(prev == Some('M') && i == len - 1) {
                    code.push('B');
                }
            }
            'C' => {
                if next == Some('I') && next2 == Some('A') {
                    code.push('X');
                    i += 2;
                } else if next == Some('H') {
                    code.push('X');
                    i += 1;
                } else if is_front_vowel(next) {
                    if prev != Some('S') {
                        code.push('S');
                    }
                } else {
                    code.push('K');
                }
            }
            'D' => {
                if next == Some('G') && is_front_vowel(next2) {
                    code.push('J');
                    i += 2;
                } else {
                    code.push('T');
                }
            }
            'G' => {
                if next == Some('H') {
                    if next2.is_some_and(is_vowel) {
                        code.push('K');
                    }
                    // GH before a consonant or at the end is silent ("knight", "hugh").
                    i += 1;
                } else if next == Some('N') && (next2.is_none() || next2 == Some('S')) {
                    // Silent final GN ("sign", "campaigns").
                } else if is_front_vowel(next) {
                    code.push('J');
                } else {
                    code.push('K');
                }
            }
            'H' => {
                if !prev.is_some_and(is_vowel) && next.is_some_and(is_vowel) {
                    code.push('H');
                }
            }
            'K' => {
                if prev != Some('C') {
                    code.push('K');
                }
            }
            'P' => {
                if next == Some('H') {
                    code.push('F');
                    i += 1;
                } else {
                    code.push('P');
                }
            }
            'Q' => code.push('K'),
            'S' => {
                if next == Some('H') {
                    code.push('X');
                    i += 1;
                } else if next == Some('I') && matches!(next2, Some('O' | 'A')) {
                    code.push('X');
                    i += 2;
                } else {
                    code.push('S');
                }
            }
            'T' => {
                if next == Some('I') && matches!(next2, Some('O' | 'A')) {
                    code.push('X');
                    i += 2;
                } else if next == Some('H') {
                    code.push('0');
                    i += 1;
                } else if !(next == Some('C') && next2 == Some('H')) {
                    code.push('T');
                }
            }
            'V' => code.push('F'),
            'W' | 'Y' => {
                if next.is_some_and(is_vowel) {
                    code.push(c);
                }
            }
            'X' => code.push_str("KS"),
            'Z' => code.push('S'),
            'F' | 'J' | 'L' | 'M' | 'N' | 'R' => code.push(c),
            _ => {}
        }

        i += 1;
    }

    code
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(s: &str) -> String {
        GenericPhonetic.encode(s)
    }

    #[test]
    fn empty_input() {
        assert_eq!(encode(""), "");
        assert_eq!(encode("  "), "");
        assert_eq!(encode("123"), "");
    }

    #[test]
    fn smith_and_smyth_share_a_code() {
        assert_eq!(encode("SMITH"), "SM0");
        assert_eq!(encode("SMYTH"), "SM0");
    }

    #[test]
    fn silent_leading_k_and_gh() {
        assert_eq!(encode("KNIGHT"), "NT");
        assert_eq!(encode("NIGHT"), "NT");
    }

    #[test]
    fn ph_is_f_and_doubles_collapse() {
        assert_eq!(encode("PHILIP"), "FLP");
        assert_eq!(encode("FILIP"), "FLP");
        assert_eq!(encode("PHILIPPE"), "FLP");
    }

    #[test]
    fn diacritics_are_folded() {
        assert_eq!(encode("José"), encode("Jose"));
        assert_eq!(encode("Jose"), "JS");
    }

    #[test]
    fn leading_vowel_kept() {
        assert_eq!(encode("ANNA"), "AN");
        assert_eq!(encode("OTTO"), "OT");
    }

    #[test]
    fn soft_and_hard_c() {
        assert_eq!(encode("CECIL"), "SSL");
        assert_eq!(encode("CARL"), "KRL");
        assert_eq!(encode("KARL"), "KRL");
    }

    #[test]
    fn leading_x_and_wh() {
        assert_eq!(encode("XAVIER"), "SFR");
        assert_eq!(encode("WHITE"), "WT");
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(encode("johnson"), encode("JOHNSON"));
    }

    #[test]
    fn code_is_not_truncated() {
        assert_eq!(encode("MACDONALDSON"), "MKTNLTSN");
    }
}
