//! Tokenizer port and the built-in stopword tokenizer.

use std::collections::HashSet;

use super::{AnalyzedRequest, Intent};

/// Turns raw request text into an [`AnalyzedRequest`].
///
/// Implementations must produce lowercase tokens in text order.
pub trait Tokenizer: Send + Sync {
    /// Analyses `text`.
    fn analyze(&self, text: &str) -> AnalyzedRequest;
}

/// Common English function words dropped before selection.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y",
];

/// Lowercases, splits on anything that is not alphanumeric and drops
/// stopwords.
///
/// Intent is detected on the words before stopword removal, since most
/// intent keywords are themselves stopwords.
#[derive(Debug, Clone)]
pub struct StopwordTokenizer {
    stopwords: HashSet<String>,
}

impl StopwordTokenizer {
    /// Creates a tokenizer with [`ENGLISH_STOPWORDS`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_stopwords(ENGLISH_STOPWORDS.iter().copied())
    }

    /// Creates a tokenizer with a custom stopword list.
    #[must_use]
    pub fn with_stopwords<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: stopwords
                .into_iter()
                .map(|word| word.as_ref().to_lowercase())
                .collect(),
        }
    }
}

impl Default for StopwordTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for StopwordTokenizer {
    fn analyze(&self, text: &str) -> AnalyzedRequest {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect();
        let intent = Intent::detect(&words);
        let tokens = words
            .into_iter()
            .filter(|word| !self.stopwords.contains(*word))
            .map(str::to_owned)
            .collect();
        AnalyzedRequest::new(text, tokens).with_intent(intent)
    }
}
