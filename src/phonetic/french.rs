//! Rule-based French phonetic encoder.
//!
//! The encoder runs a fixed pipeline over the trimmed, upper-cased input:
//!
//! 1. fold accented letters to their base letter (`Ç` becomes `S`, the
//!    ligatures `Æ` and `Œ` become `E`);
//! 2. apply the ordered [`RULES`] table of digraph and trigraph rewrites;
//! 3. strip silent final letters, each at most once, in [`SILENT_ENDINGS`] order;
//! 4. collapse runs of identical letters;
//! 5. drop every character outside `A-Z`.
//!
//! The rewrites are not commutative, so the table order is part of the
//! algorithm's output contract.

use memchr::memmem;

use super::PhoneticEncoder;

/// A single rewrite step.
#[derive(Debug, Clone, Copy)]
enum Rewrite {
    /// Replace `from` with `to` only at the start of the word.
    Leading(&'static str, &'static str),
    /// Replace every non-overlapping occurrence, scanning left to right.
    Anywhere(&'static str, &'static str),
    /// Replace the letter with `to` when the next letter is one of `next`.
    /// The following letter is kept.
    Before {
        letter: char,
        next: &'static [char],
        to: char,
    },
}

const FRONT_VOWELS: &[char] = &['E', 'I', 'Y'];

const RULES: &[Rewrite] = &[
    Rewrite::Leading("PH", "F"),
    Rewrite::Leading("GN", "NI"),
    Rewrite::Anywhere("PH", "F"),
    Rewrite::Anywhere("GN", "NI"),
    Rewrite::Anywhere("CH", "SH"),
    Rewrite::Anywhere("QU", "K"),
    Rewrite::Anywhere("Q", "K"),
    // Soft C before a front vowel, hard C everywhere else.
    Rewrite::Before { letter: 'C', next: FRONT_VOWELS, to: 'S' },
    Rewrite::Before { letter: 'C', next: &['A', 'O', 'U'], to: 'K' },
    Rewrite::Anywhere("CC", "K"),
    Rewrite::Anywhere("CK", "K"),
    Rewrite::Anywhere("C", "K"),
    // Soft G before a front vowel, hard G everywhere else.
    Rewrite::Before { letter: 'G', next: FRONT_VOWELS, to: 'J' },
    Rewrite::Before { letter: 'G', next: &['A', 'O'], to: 'K' },
    Rewrite::Anywhere("GU", "K"),
    Rewrite::Anywhere("G", "K"),
    Rewrite::Anywhere("EAUX", "O"),
    Rewrite::Anywhere("EAU", "O"),
    Rewrite::Anywhere("AI", "E"),
    Rewrite::Anywhere("EI", "E"),
    Rewrite::Anywhere("AY", "E"),
    Rewrite::Anywhere("OU", "U"),
    Rewrite::Anywhere("H", ""),
    Rewrite::Anywhere("W", "V"),
    Rewrite::Anywhere("Y", "I"),
    Rewrite::Anywhere("LL", "L"),
    Rewrite::Anywhere("MM", "M"),
    Rewrite::Anywhere("NN", "N"),
    Rewrite::Anywhere("PP", "P"),
    Rewrite::Anywhere("RR", "R"),
    Rewrite::Anywhere("SS", "S"),
    Rewrite::Anywhere("TT", "T"),
];

const SILENT_ENDINGS: &[char] = &['E', 'S', 'T', 'X', 'Z', 'D', 'P'];

/// French phonetic encoder.
///
/// Stateless; all instances are equivalent.
///
/// # Examples
///
/// ```
/// use rowmatch::{FrenchPhonetic, PhoneticEncoder};
///
/// assert_eq!(FrenchPhonetic.encode("Philippe"), "FILI");
/// assert_eq!(FrenchPhonetic.encode("Catherine"), FrenchPhonetic.encode("Katherine"));
/// assert_eq!(FrenchPhonetic.encode(""), "");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrenchPhonetic;

impl PhoneticEncoder for FrenchPhonetic {
    fn encode(&self, text: &str) -> String {
        let mut word = fold_accents(&text.trim().to_uppercase());
        for rule in RULES {
            apply(rule, &mut word);
        }
        for &letter in SILENT_ENDINGS {
            if word.ends_with(letter) {
                word.pop();
            }
        }
        let mut code = String::with_capacity(word.len());
        let mut prev = None;
        for c in word.chars() {
            if prev != Some(c) {
                code.push(c);
                prev = Some(c);
            }
        }
        code.retain(|c| c.is_ascii_uppercase());
        code
    }
}

fn fold_accents(word: &str) -> String {
    word.chars()
        .map(|c| match c {
            'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
            'È' | 'É' | 'Ê' | 'Ë' => 'E',
            'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
            'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => 'O',
            'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
            'Ç' => 'S',
            'Ñ' => 'N',
            'Æ' | 'Œ' => 'E',
            other => other,
        })
        .collect()
}

fn apply(rule: &Rewrite, word: &mut String) {
    match *rule {
        Rewrite::Leading(from, to) => {
            if word.starts_with(from) {
                word.replace_range(..from.len(), to);
            }
        }
        Rewrite::Anywhere(from, to) => {
            // Skip the allocation of `str::replace` when there is nothing to do.
            if memmem::find(word.as_bytes(), from.as_bytes()).is_some() {
                *word = word.replace(from, to);
            }
        }
        Rewrite::Before { letter, next, to } => {
            let mut out = String::with_capacity(word.len());
            let mut chars = word.chars().peekable();
            let mut changed = false;
            while let Some(c) = chars.next() {
                if c == letter && chars.peek().is_some_and(|n| next.contains(n)) {
                    out.push(to);
                    changed = true;
                } else {
                    out.push(c);
                }
            }
            if changed {
                *word = out;
            }
        }
    }
}
