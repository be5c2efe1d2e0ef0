//! Transcript records handed over by the conversation layer.

use serde::{Deserialize, Serialize};

/// Trust tag an agent carries in the transcript.
///
/// Supplied by the caller; voting never infers it from the agent name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// Ordinary discussion participant
    #[default]
    Member,
    /// Designated high-trust agent (e.g. the moderating supervisor)
    Supervisor,
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentRole::Member => write!(f, "member"),
            AgentRole::Supervisor => write!(f, "supervisor"),
        }
    }
}

/// A single message of an agent discussion.
///
/// Field names follow the usual chat-history layout (`name`, `content`);
/// any other fields in the record are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    /// Originating agent
    #[serde(alias = "agent", default = "unknown_agent")]
    pub name: String,
    /// Free-text content
    #[serde(default)]
    pub content: String,
    /// Trust tag for weighting
    #[serde(default)]
    pub agent_role: AgentRole,
}

fn unknown_agent() -> String {
    "unknown".to_string()
}

impl TranscriptMessage {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            agent_role: AgentRole::Member,
        }
    }

    /// Shorthand for a message from a supervisor-role agent.
    pub fn supervisor(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(name, content).with_role(AgentRole::Supervisor)
    }

    pub fn with_role(mut self, role: AgentRole) -> Self {
        self.agent_role = role;
        self
    }
}
