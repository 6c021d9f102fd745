//! Phonetic encoders.
//!
//! A phonetic code is a "sound fingerprint": words pronounced alike tend to
//! produce identical or very close codes. Two strategies exist, selected once
//! per query from a language code:
//!
//! - [`FrenchPhonetic`]: a hand-written rewrite pipeline tuned for French.
//! - [`GenericPhonetic`]: a Metaphone-family encoder for other Western names.

mod french;
mod generic;

pub use french::FrenchPhonetic;
pub use generic::GenericPhonetic;

/// A pure, total `text -> phonetic code` function.
///
/// Implementations must be deterministic and must return an empty code for
/// empty input rather than failing.
pub trait PhoneticEncoder: Send + Sync {
    /// Encodes `text` into its phonetic code.
    fn encode(&self, text: &str) -> String;
}

/// The phonetic strategy used for one query.
///
/// # Examples
///
/// ```
/// use rowmatch::{PhoneticEncoder, PhoneticStrategy};
///
/// let fr = PhoneticStrategy::for_language("FR");
/// assert!(matches!(fr, PhoneticStrategy::French(_)));
/// assert_eq!(fr.encode("Beaux"), fr.encode("beau"));
///
/// let en = PhoneticStrategy::for_language("en");
/// assert!(matches!(en, PhoneticStrategy::Generic(_)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneticStrategy {
    /// Rule-based French encoder.
    French(FrenchPhonetic),
    /// Language-agnostic encoder.
    Generic(GenericPhonetic),
}

impl PhoneticStrategy {
    /// Picks the strategy for a language code. Only `"fr"` (any case,
    /// surrounding whitespace ignored) selects the French encoder.
    pub fn for_language(language: &str) -> Self {
        if language.trim().eq_ignore_ascii_case("fr") {
            PhoneticStrategy::French(FrenchPhonetic)
        } else {
            PhoneticStrategy::Generic(GenericPhonetic)
        }
    }
}

impl Default for PhoneticStrategy {
    fn default() -> Self {
        PhoneticStrategy::Generic(GenericPhonetic)
    }
}

impl PhoneticEncoder for PhoneticStrategy {
    fn encode(&self, text: &str) -> String {
        match self {
            PhoneticStrategy::French(encoder) => encoder.encode(text),
            PhoneticStrategy::Generic(encoder) => encoder.encode(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn french_selected_case_insensitively() {
        assert!(matches!(PhoneticStrategy::for_language("fr"), PhoneticStrategy::French(_)));
        assert!(matches!(PhoneticStrategy::for_language(" Fr "), PhoneticStrategy::French(_)));
    }

    #[test]
    fn everything_else_is_generic() {
        for code in ["en", "de", "", "french", "fr-CA"] {
            assert!(
                matches!(PhoneticStrategy::for_language(code), PhoneticStrategy::Generic(_)),
                "{code:?} should select the generic encoder"
            );
        }
    }

    #[test]
    fn strategy_delegates_to_encoder() {
        let fr = PhoneticStrategy::for_language("fr");
        assert_eq!(fr.encode("Philippe"), FrenchPhonetic.encode("Philippe"));
        let en = PhoneticStrategy::default();
        assert_eq!(en.encode("Knight"), GenericPhonetic.encode("Knight"));
    }

    #[test]
    fn strategies_disagree_on_some_inputs() {
        let fr = PhoneticStrategy::for_language("fr");
        let en = PhoneticStrategy::for_language("en");
        assert_ne!(fr.encode("GEORGES"), en.encode("GEORGES"));
    }
}
