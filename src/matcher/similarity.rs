use crate::normalizer::name_key;

/// Words that describe the kind of venue rather than which venue it is.
const GENERIC_WORDS: [&str; 5] = ["the", "and", "restaurant", "restaurante", "ristorante"];

/// Comparison key: `name_key` without generic venue words.
/// Falls back to the full key when nothing else is left ("The Restaurant").
pub fn comparison_key(name: &str) -> String {
    let full = name_key(name);
    let kept: Vec<&str> = full
        .split(' ')
        .filter(|word| !word.is_empty() && !GENERIC_WORDS.contains(word))
        .collect();
    if kept.is_empty() {
        full
    } else {
        kept.join(" ")
    }
}

/// Normalized edit similarity in `[0, 1]`: `(maxLen - levenshtein) / maxLen`
/// over comparison keys, counted in chars. Two empty keys are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (a, b) = (comparison_key(a), comparison_key(b));
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = strsim::levenshtein(&a, &b);
    (max_len - distance) as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_names_score_one() {
        assert_eq!(similarity("Versailles", "Versailles"), 1.0);
        assert_eq!(similarity("VERSAILLES", "versailles"), 1.0);
    }

    #[test]
    fn generic_venue_words_do_not_count() {
        assert!(similarity("Versailles Restaurant", "Versailles") > 0.8);
        assert!(similarity("The Versailles", "Versailles Restaurant") > 0.8);
        assert_eq!(comparison_key("The Restaurant"), "the restaurant");
    }

    #[test]
    fn different_venues_stay_apart() {
        assert!(similarity("Versailles", "Prime 112") < 0.8);
        assert!(similarity("La Carreta", "La Camaronera") < 0.8);
    }

    #[test]
    fn punctuation_variants_match() {
        assert_eq!(similarity("Joe's Stone Crab", "Joes Stone Crab"), 1.0);
        assert_eq!(similarity("Ball & Chain", "Ball and Chain"), 1.0);
    }

    #[test]
    fn small_typos_stay_above_threshold() {
        assert!(similarity("Puerto Sagua", "Puerto Saguaa") > 0.9);
    }

    #[test]
    fn empty_names() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("", "Kyu"), 0.0);
    }
}
