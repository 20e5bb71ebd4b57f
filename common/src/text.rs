//! Text folding for accent and case insensitive comparison.

use unicode_normalization::UnicodeNormalization as _;

/// Range of the Unicode "Combining Diacritical Marks" block.
const COMBINING_DIACRITICS: std::ops::RangeInclusive<char> =
    '\u{0300}'..='\u{036F}';

/// Folds the provided `input` into a key suitable for accent and case
/// insensitive comparison of Vietnamese text.
///
/// The `input` is decomposed into NFD, stripped of combining diacritical
/// marks (U+0300..=U+036F), has its stroke letters `đ`/`Đ` replaced with
/// `d`/`D`, and is lowercased at last.
///
/// `đ` is not a composition of `d` with a combining mark, so it survives
/// decomposition and has to be substituted explicitly.
#[must_use]
pub fn fold(input: &str) -> String {
    input
        .nfd()
        .filter(|c| !COMBINING_DIACRITICS.contains(c))
        .map(|c| match c {
            'đ' => 'd',
            'Đ' => 'D',
            c => c,
        })
        .collect::<String>()
        .to_lowercase()
}
