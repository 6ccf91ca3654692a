use wana_kana::{
    ConvertJapanese,
    IsJapaneseStr,
};

/// Readings in the word table are usually hiragana, but some rows carry
/// katakana (loanwords, or sloppy source data). Fold those to hiragana so
/// distractor deduplication and mastery keys compare consistently.
pub fn normalize_reading(reading: &str) -> String {
    if reading.is_katakana() {
        reading.to_hiragana()
    } else {
        reading.to_string()
    }
}
