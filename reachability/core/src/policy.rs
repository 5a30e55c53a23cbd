use crate::{Entity, Rule};
use netpol_reachability_k8s_api::Selector;
use std::fmt;

/// The direction of traffic relative to the workload a policy governs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Ingress,
    Egress,
}

/// A namespace-scoped network policy.
///
/// Each direction's rules are optional: `None` means the policy doesn't govern that direction,
/// while an empty list means it denies all traffic in that direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Policy {
    pub name: String,
    pub namespace: String,
    pub pod_selector: Selector,
    pub ingress: Option<Vec<Rule>>,
    pub egress: Option<Vec<Rule>>,
}

// === impl Direction ===

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingress => "ingress".fmt(f),
            Self::Egress => "egress".fmt(f),
        }
    }
}

// === impl Policy ===

impl Policy {
    /// A policy selecting pods in `namespace` that governs no direction.
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        pod_selector: Selector,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            pod_selector,
            ingress: None,
            egress: None,
        }
    }

    pub fn with_ingress(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.ingress = Some(rules.into_iter().collect());
        self
    }

    pub fn with_egress(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.egress = Some(rules.into_iter().collect());
        self
    }

    /// Returns the rules for a direction, or `None` if the policy doesn't govern it.
    pub fn rules(&self, direction: Direction) -> Option<&[Rule]> {
        match direction {
            Direction::Ingress => self.ingress.as_deref(),
            Direction::Egress => self.egress.as_deref(),
        }
    }

    pub fn governs(&self, direction: Direction) -> bool {
        self.rules(direction).is_some()
    }

    /// Checks whether the policy's pod selector selects `entity` in the policy's namespace.
    pub fn selects(&self, entity: &Entity) -> bool {
        entity.namespace() == Some(self.namespace.as_str())
            && self.pod_selector.matches(entity.labels())
    }
}
