//! Shared builders for dispatch tests.

use mockable::DefaultClock;

use crate::registry::domain::{AgentDetails, AgentKind, AgentName, AgentRecord};

pub(super) fn agent(kind: AgentKind, details: AgentDetails) -> AgentRecord {
    AgentRecord::new(
        AgentName::new("test agent").expect("valid name"),
        kind,
        details,
        &DefaultClock,
    )
}
