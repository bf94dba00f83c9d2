//! Text normalization ahead of keyword extraction

use regex::Regex;
use std::collections::HashSet;

/// Tokens at or below this length (in characters) are discarded
const MIN_TOKEN_CHARS: usize = 2;

/// Standard English stop-word list (NLTK corpus)
const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
    "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's",
    "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "that'll", "these", "those", "am", "is", "are",
    "was", "were", "be", "been", "being", "have", "has", "had", "having", "do",
    "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or", "because",
    "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below",
    "to", "from", "up", "down", "in", "out", "on", "off", "over", "under", "again",
    "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t",
    "can", "will", "just", "don", "don't", "should", "should've", "now", "d", "ll",
    "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't",
    "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't",
    "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't", "mustn",
    "mustn't", "needn", "needn't", "shan", "shan't", "shouldn", "shouldn't", "wasn",
    "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// Lower-cases, strips punctuation and filters short and stop-word tokens
pub struct TextNormalizer {
    stop_words: HashSet<&'static str>,
    non_word_regex: Regex,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        let non_word_regex = Regex::new(r"[^\w\s]").expect("Invalid non-word regex");

        Self {
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
            non_word_regex,
        }
    }

    /// Normalize text into space-separated content tokens, order preserved
    pub fn normalize(&self, text: &str) -> String {
        self.tokenize(text).join(" ")
    }

    /// Tokens that survive normalization; only word characters remain, so
    /// whitespace is the sole token boundary
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let stripped = self.non_word_regex.replace_all(&lowered, " ");

        stripped
            .split_whitespace()
            .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
            .filter(|token| !self.is_stop_word(token))
            .map(str::to_string)
            .collect()
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_stop_words() {
        let normalizer = TextNormalizer::new();
        let text = "Hello, World! I have 5 years of experience with Python & SQL.";

        let normalized = normalizer.normalize(text);

        assert_eq!(normalized, "hello world years experience python sql");
    }

    #[test]
    fn test_normalize_empty_and_whitespace() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize("   \n\t  "), "");
    }

    #[test]
    fn test_short_tokens_dropped() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("go js ui rust"), "rust");
    }

    #[test]
    fn test_punctuation_splits_tokens() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("node.js/react"), "node react");
    }

    #[test]
    fn test_unsegmented_scripts_stay_whole() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("数据分析"), "数据分析");
        assert_eq!(normalizer.normalize("Python、数据分析。SQL"), "python 数据分析 sql");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = TextNormalizer::new();
        let samples = [
            "Managed a TEAM of 12 engineers; shipped React + Node.js apps.",
            "Résumé: Données analytiques — Tableau, PowerBI, Excel!!!",
            "snake_case_identifiers and CamelCase words, 2019-2023",
            "",
        ];

        for sample in samples {
            let once = normalizer.normalize(sample);
            let twice = normalizer.normalize(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_output_has_no_punctuation_or_stop_words() {
        let normalizer = TextNormalizer::new();
        let text = "They've been (very) busy: leading, coaching & mentoring -- the whole team.";

        let normalized = normalizer.normalize(text);

        assert!(normalized
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == ' '));
        for token in normalized.split(' ') {
            assert!(!normalizer.is_stop_word(token), "stop word leaked: {}", token);
        }
    }
}
