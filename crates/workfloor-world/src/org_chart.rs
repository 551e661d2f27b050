//! Organizational chart: the tier of every known agent.
//!
//! The chart doubles as the roster the collaboration detector scans for
//! mentions, so every agent with a desk is registered here too (with the
//! default tier when none is configured).

use std::collections::BTreeMap;

use workfloor_types::{AgentId, Tier};

/// Mapping from agent to organizational tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OrgChart {
    tiers: BTreeMap<AgentId, Tier>,
}

impl OrgChart {
    /// Create an empty chart.
    pub const fn new() -> Self {
        Self {
            tiers: BTreeMap::new(),
        }
    }

    /// Set the tier of an agent, replacing any previous value.
    pub fn insert(&mut self, agent: AgentId, tier: Tier) {
        self.tiers.insert(agent, tier);
    }

    /// Register an agent with the default tier unless it is already known.
    pub fn register(&mut self, agent: AgentId) {
        self.tiers.entry(agent).or_default();
    }

    /// Tier of an agent; unknown agents rank lowest.
    pub fn tier_of(&self, agent: &str) -> Tier {
        self.tiers.get(agent).copied().unwrap_or_default()
    }

    /// All known agents in identifier order.
    pub fn agents(&self) -> impl Iterator<Item = &AgentId> {
        self.tiers.keys()
    }

    /// Whether the agent is known.
    pub fn contains(&self, agent: &str) -> bool {
        self.tiers.contains_key(agent)
    }

    /// Number of known agents.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Whether the chart is empty.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

impl FromIterator<(AgentId, Tier)> for OrgChart {
    fn from_iter<I: IntoIterator<Item = (AgentId, Tier)>>(iter: I) -> Self {
        Self {
            tiers: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_agent_is_worker() {
        let chart = OrgChart::new();
        assert_eq!(chart.tier_of("nobody"), Tier::Worker);
    }

    #[test]
    fn register_keeps_existing_tier() {
        let mut chart = OrgChart::new();
        chart.insert(AgentId::from("commander"), Tier::Commander);
        chart.register(AgentId::from("commander"));
        chart.register(AgentId::from("designer"));
        assert_eq!(chart.tier_of("commander"), Tier::Commander);
        assert_eq!(chart.tier_of("designer"), Tier::Worker);
        assert_eq!(chart.len(), 2);
    }
}
