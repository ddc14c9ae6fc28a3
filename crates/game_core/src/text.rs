//! String sanitization helpers shared by every game variant.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Strips accents and other diacritical marks from a string.
///
/// The input is decomposed (NFD) so that base characters are separated from
/// their combining marks, and the marks are then dropped: `"ação"` becomes
/// `"acao"`. Applying it twice equals applying it once.
pub fn remove_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Case-folds and strips diacritics, the normal form used before any
/// comparison between player input and a secret.
pub fn normalize(text: &str) -> String {
    remove_diacritics(&text.to_lowercase())
}

/// Normalization for free-text answers: surrounding whitespace is not part
/// of the answer.
pub fn normalize_answer(text: &str) -> String {
    normalize(text.trim())
}
