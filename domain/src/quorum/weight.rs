//! Base weights for voting agents.
//!
//! Every agent's vote is scaled by a base weight before the confidence
//! multiplier is applied. Weights come from an explicit [`WeightPolicy`]
//! rather than being patched into a shared map at call time.

use crate::core::error::DomainError;
use crate::staging::AgentRole;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How agents without an explicit weight are weighed.
///
/// - `Uniform`: every agent gets the default weight (default)
/// - `ByRole`: supervisor-role agents get the supervisor weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlistedAgentWeight {
    #[default]
    Uniform,
    ByRole,
}

impl std::str::FromStr for UnlistedAgentWeight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "uniform" => Ok(UnlistedAgentWeight::Uniform),
            "by_role" | "role" => Ok(UnlistedAgentWeight::ByRole),
            other => Err(format!(
                "Unknown weight policy: {}. Valid: uniform, by_role",
                other
            )),
        }
    }
}

/// Base weight configuration for a vote.
///
/// # Example
///
/// ```
/// use tnm_domain::{AgentRole, UnlistedAgentWeight, WeightPolicy};
///
/// let policy = WeightPolicy::default()
///     .with_unlisted(UnlistedAgentWeight::ByRole)
///     .with_agent_weight("Pathologist", 2.0)
///     .unwrap();
///
/// assert_eq!(policy.base_weight("Pathologist", AgentRole::Member), 2.0);
/// assert_eq!(policy.base_weight("Supervisor", AgentRole::Supervisor), 1.5);
/// assert_eq!(policy.base_weight("Radiologist", AgentRole::Member), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightPolicy {
    /// Explicit per-agent weights; take precedence over everything else
    pub agents: BTreeMap<String, f64>,
    /// Policy for agents not listed in `agents`
    pub unlisted: UnlistedAgentWeight,
    /// Weight of unlisted agents
    pub default_weight: f64,
    /// Weight of unlisted supervisor-role agents under `ByRole`
    pub supervisor_weight: f64,
}

impl Default for WeightPolicy {
    fn default() -> Self {
        Self {
            agents: BTreeMap::new(),
            unlisted: UnlistedAgentWeight::Uniform,
            default_weight: 1.0,
            supervisor_weight: 1.5,
        }
    }
}

impl WeightPolicy {
    // ==================== Builder Methods ====================

    pub fn with_unlisted(mut self, unlisted: UnlistedAgentWeight) -> Self {
        self.unlisted = unlisted;
        self
    }

    pub fn with_agent_weight(
        mut self,
        agent: impl Into<String>,
        weight: f64,
    ) -> Result<Self, DomainError> {
        let agent = agent.into();
        check_weight(&format!("agent {}", agent), weight)?;
        self.agents.insert(agent, weight);
        Ok(self)
    }

    pub fn with_default_weight(mut self, weight: f64) -> Result<Self, DomainError> {
        check_weight("default_weight", weight)?;
        self.default_weight = weight;
        Ok(self)
    }

    pub fn with_supervisor_weight(mut self, weight: f64) -> Result<Self, DomainError> {
        check_weight("supervisor_weight", weight)?;
        self.supervisor_weight = weight;
        Ok(self)
    }

    /// Check every configured weight (useful after deserialization).
    pub fn validate(&self) -> Result<(), DomainError> {
        check_weight("default_weight", self.default_weight)?;
        check_weight("supervisor_weight", self.supervisor_weight)?;
        for (agent, weight) in &self.agents {
            check_weight(&format!("agent {}", agent), *weight)?;
        }
        Ok(())
    }

    /// Resolve the base weight of an agent.
    pub fn base_weight(&self, agent: &str, role: AgentRole) -> f64 {
        if let Some(weight) = self.agents.get(agent) {
            return *weight;
        }
        match (self.unlisted, role) {
            (UnlistedAgentWeight::ByRole, AgentRole::Supervisor) => self.supervisor_weight,
            _ => self.default_weight,
        }
    }
}

fn check_weight(subject: &str, weight: f64) -> Result<(), DomainError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(DomainError::InvalidWeight {
            subject: subject.to_string(),
            weight,
        })
    }
}
