//! Analysed request value passed from tokenisation to selection.

use serde::{Deserialize, Serialize};

/// Coarse intent guessed from the words of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Starts or contains a question word.
    Question,
    /// Contains a request verb such as "please" or "could".
    Command,
    /// Contains a copula such as "is" or "were".
    Statement,
    /// Nothing recognisable.
    #[default]
    Unknown,
}

impl Intent {
    const KEYWORDS: [(Self, &'static [&'static str]); 3] = [
        (Self::Question, &["what", "why", "how", "when", "where", "who"]),
        (Self::Command, &["do", "please", "can", "could", "would"]),
        (Self::Statement, &["is", "are", "was", "were"]),
    ];

    /// Detects the intent from lowercase words, checking question words
    /// first, then request verbs, then copulas.
    #[must_use]
    pub fn detect<S: AsRef<str>>(words: &[S]) -> Self {
        Self::KEYWORDS
            .iter()
            .find(|(_, keywords)| {
                words
                    .iter()
                    .any(|word| keywords.contains(&word.as_ref()))
            })
            .map_or(Self::Unknown, |(intent, _)| *intent)
    }
}

/// Request text together with the tokens used to select an agent.
///
/// The original text is what gets dispatched; the tokens only drive
/// selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedRequest {
    original: String,
    tokens: Vec<String>,
    #[serde(default)]
    intent: Intent,
}

impl AnalyzedRequest {
    /// Creates a request from text and an externally produced token list.
    #[must_use]
    pub fn new(original: impl Into<String>, tokens: Vec<String>) -> Self {
        Self {
            original: original.into(),
            tokens,
            intent: Intent::Unknown,
        }
    }

    /// Sets the detected intent.
    #[must_use]
    pub const fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = intent;
        self
    }

    /// Returns the original request text.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Returns the selection tokens.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Returns the detected intent.
    #[must_use]
    pub const fn intent(&self) -> Intent {
        self.intent
    }
}
