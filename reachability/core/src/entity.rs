use netpol_reachability_k8s_api::Labels;
use std::net::IpAddr;

/// A workload, or an endpoint outside of the cluster, that may originate or receive traffic.
///
/// External endpoints have no namespace, so no namespace-scoped policy ever governs them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    name: String,
    namespace: Option<String>,
    labels: Labels,
    ip: Option<IpAddr>,
}

// === impl Entity ===

impl Entity {
    pub fn workload(
        name: impl Into<String>,
        namespace: impl Into<String>,
        labels: impl Into<Labels>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
            labels: labels.into(),
            ip: None,
        }
    }

    pub fn external(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            labels: Labels::default(),
            ip: None,
        }
    }

    pub fn with_ip(mut self, ip: IpAddr) -> Self {
        self.ip = Some(ip);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn ip(&self) -> Option<IpAddr> {
        self.ip
    }

    pub fn is_external(&self) -> bool {
        self.namespace.is_none()
    }

    /// The labels of this entity's namespace, if it has one.
    pub fn namespace_labels(&self) -> Option<Labels> {
        self.namespace.as_deref().map(Labels::for_namespace)
    }
}
