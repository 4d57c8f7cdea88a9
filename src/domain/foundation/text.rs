//! Text normalization shared by keyword matching.

/// Lowercases, folds Spanish accents and replaces punctuation with spaces.
///
/// Digits, letters and `/` survive so numbers and dates keep their shape.
pub fn normalize_text(raw: &str) -> String {
    let folded: String = raw
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            c if c.is_alphanumeric() || c == '/' => c,
            _ => ' ',
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whole-word phrase containment over whitespace-separated words.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    if needle.is_empty() || needle.len() > words.len() {
        return false;
    }
    words.windows(needle.len()).any(|w| w == needle.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_accents_and_punctuation() {
        assert_eq!(normalize_text("¡Hola!  ¿Qué tal?"), "hola que tal");
        assert_eq!(normalize_text("Adiós"), "adios");
    }

    #[test]
    fn normalize_keeps_dates() {
        assert_eq!(normalize_text(" 25/12/2030 "), "25/12/2030");
    }

    #[test]
    fn phrase_matching_respects_word_boundaries() {
        assert!(contains_phrase("quiero una pizza", "quiero"));
        assert!(contains_phrase("pago con mercado pago", "mercado pago"));
        assert!(!contains_phrase("chicken wings", "hi"));
        assert!(!contains_phrase("", "hola"));
    }
}
