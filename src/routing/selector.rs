//! Agent selection strategies.

use crate::registry::domain::AgentRecord;

/// Result string when no registered agent matches a request.
pub const NO_MATCH: &str = "No suitable agent found to process the input.";

/// Strategy for choosing the agent that handles a request.
pub trait AgentSelector: Send + Sync {
    /// Picks one of `agents` for `tokens`, or `None` when nothing fits.
    fn select<'a>(&self, agents: &'a [AgentRecord], tokens: &[String]) -> Option<&'a AgentRecord>;
}

/// Picks the first agent whose description contains any token.
///
/// Matching is a case-insensitive substring test against the whole
/// description, so `"echo"` matches `"Echo service"` and `"ech"` does too.
/// Empty tokens never match. A plain substring test would treat `""` as
/// contained in every description and pick the first agent; this selector
/// ignores such tokens instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMatchSelector;

impl AgentSelector for FirstMatchSelector {
    fn select<'a>(&self, agents: &'a [AgentRecord], tokens: &[String]) -> Option<&'a AgentRecord> {
        let needles: Vec<String> = tokens
            .iter()
            .filter(|token| !token.is_empty())
            .map(|token| token.to_lowercase())
            .collect();
        if needles.is_empty() {
            return None;
        }
        agents.iter().find(|agent| {
            let description = agent.description().to_lowercase();
            needles.iter().any(|needle| description.contains(needle.as_str()))
        })
    }
}
