//! Request routing: turning request text into tokens and picking an agent.
//!
//! Selection is a cheap heuristic. Agents are scanned in registry order and
//! the first one whose description contains any request token wins. There
//! is no scoring and no tie-break beyond that order.

mod request;
mod selector;
mod tokenizer;

pub use request::{AnalyzedRequest, Intent};
pub use selector::{AgentSelector, FirstMatchSelector, NO_MATCH};
pub use tokenizer::{ENGLISH_STOPWORDS, StopwordTokenizer, Tokenizer};

#[cfg(test)]
mod tests;
