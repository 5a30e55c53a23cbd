use crate::{namespace::NamespaceIndex, policy::mk_policy};
use netpol_reachability_core::{Direction, Entity, Policy, Protocol, Verdict};
use netpol_reachability_k8s_api::NetworkPolicy;
use tracing::{debug, instrument, trace};

/// Holds all policies, indexed by namespace.
#[derive(Debug, Default)]
pub struct Index {
    namespaces: NamespaceIndex,
    len: usize,
}

// === impl Index ===

impl Index {
    pub fn new(policies: impl IntoIterator<Item = Policy>) -> Self {
        let mut idx = Self::default();
        for policy in policies {
            idx.apply(policy);
        }
        idx
    }

    /// Indexes NetworkPolicy resources. Resources that don't name a namespace are placed in
    /// `default_ns`.
    pub fn from_resources(
        resources: impl IntoIterator<Item = NetworkPolicy>,
        default_ns: &str,
    ) -> Self {
        Self::new(resources.into_iter().map(|np| mk_policy(np, default_ns)))
    }

    fn apply(&mut self, policy: Policy) {
        debug!(
            ns = %policy.namespace,
            name = %policy.name,
            ingress = ?policy.ingress.as_ref().map(Vec::len),
            egress = ?policy.egress.as_ref().map(Vec::len),
            "Indexing policy"
        );
        self.namespaces
            .get_or_default(policy.namespace.clone())
            .policies
            .push(policy);
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Enumerates the indexed namespaces and the number of policies in each.
    pub fn namespaces(&self) -> impl Iterator<Item = (&str, usize)> {
        self.namespaces
            .iter()
            .map(|(name, ns)| (name.as_str(), ns.policies.len()))
    }

    /// Enumerates the policies in `namespace` that govern `entity` in `direction`.
    ///
    /// An empty result means that the entity is unrestricted in that direction.
    pub fn policies_governing<'i>(
        &'i self,
        namespace: &str,
        entity: &'i Entity,
        direction: Direction,
    ) -> impl Iterator<Item = &'i Policy> + 'i {
        self.namespaces
            .policies(namespace)
            .iter()
            .filter(move |policy| {
                let governs = policy.governs(direction) && policy.selects(entity);
                trace!(policy = %policy.name, entity = %entity.name(), %direction, governs);
                governs
            })
    }

    /// Checks whether the policies governing `entity` admit traffic with `peer` in `direction`.
    ///
    /// For egress, `entity` is the flow's source and `peer` its destination; for ingress, the
    /// roles are reversed.
    pub fn allows(
        &self,
        direction: Direction,
        entity: &Entity,
        peer: &Entity,
        port: u16,
        protocol: &Protocol,
    ) -> bool {
        let Some(namespace) = entity.namespace() else {
            trace!(entity = %entity.name(), %direction, "External entities are unrestricted");
            return true;
        };

        let mut governing = self
            .policies_governing(namespace, entity, direction)
            .peekable();
        if governing.peek().is_none() {
            trace!(entity = %entity.name(), %direction, "No policy governs entity");
            return true;
        }

        governing.any(|policy| {
            let allowed = policy
                .rules(direction)
                .unwrap_or_default()
                .iter()
                .any(|rule| rule.allows(port, protocol, peer, &policy.namespace));
            trace!(
                policy = %policy.name,
                entity = %entity.name(),
                peer = %peer.name(),
                %direction,
                allowed
            );
            allowed
        })
    }

    /// Evaluates both sides of a flow from `source` to `destination`.
    #[instrument(
        level = "debug",
        skip(self, source, destination),
        fields(
            src = %source.name(),
            dst = %destination.name(),
        )
    )]
    pub fn evaluate(
        &self,
        source: &Entity,
        destination: &Entity,
        port: u16,
        protocol: &Protocol,
    ) -> Verdict {
        let verdict = Verdict {
            egress: self.allows(Direction::Egress, source, destination, port, protocol),
            ingress: self.allows(Direction::Ingress, destination, source, port, protocol),
        };
        debug!(?verdict);
        verdict
    }

    /// Checks whether a flow from `source` to `destination` is allowed.
    pub fn is_allowed(
        &self,
        source: &Entity,
        destination: &Entity,
        port: u16,
        protocol: &Protocol,
    ) -> bool {
        self.evaluate(source, destination, port, protocol).is_allowed()
    }
}
