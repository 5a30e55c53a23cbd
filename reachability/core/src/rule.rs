use crate::{Entity, NetworkMatch, PortMatch, Protocol};
use netpol_reachability_k8s_api::Selector;
use tracing::trace;

/// One allowed traffic pattern for a direction of a policy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rule {
    /// Restricts the ports the rule admits. `None` admits all ports.
    pub ports: Option<Vec<PortMatch>>,

    /// Restricts the peers the rule admits. `None` admits all peers; an empty list admits none.
    pub peers: Option<Vec<Peer>>,
}

/// Describes the endpoints on the other side of a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Peer {
    /// Matches an endpoint by address. `None` indicates that the block's CIDR was invalid, so
    /// that the peer matches nothing.
    Network(Option<NetworkMatch>),

    /// Matches an endpoint by its namespace's labels and its own labels.
    ///
    /// Without a namespace selector, the pod selector only applies to the policy's own
    /// namespace. Without either selector, every endpoint matches.
    Selector {
        namespaces: Option<Selector>,
        pods: Option<Selector>,
    },
}

// === impl Rule ===

impl Rule {
    /// A rule that admits all traffic.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn with_ports(mut self, ports: impl IntoIterator<Item = PortMatch>) -> Self {
        self.ports = Some(ports.into_iter().collect());
        self
    }

    pub fn with_peers(mut self, peers: impl IntoIterator<Item = Peer>) -> Self {
        self.peers = Some(peers.into_iter().collect());
        self
    }

    /// Checks whether this rule admits traffic on `port`/`protocol` with `other`, the endpoint on
    /// the far side of the policy's workload. `owner_ns` is the namespace of the policy that
    /// holds this rule.
    pub fn allows(&self, port: u16, protocol: &Protocol, other: &Entity, owner_ns: &str) -> bool {
        self.allows_port(port, protocol) && self.allows_peer(other, owner_ns)
    }

    fn allows_port(&self, port: u16, protocol: &Protocol) -> bool {
        match self.ports.as_deref() {
            None | Some([]) => true,
            Some(ports) => ports.iter().any(|p| p.matches(port, protocol)),
        }
    }

    fn allows_peer(&self, other: &Entity, owner_ns: &str) -> bool {
        match self.peers.as_deref() {
            None => true,
            Some(peers) => peers.iter().any(|p| p.matches(other, owner_ns)),
        }
    }
}

// === impl Peer ===

impl Peer {
    pub fn any() -> Self {
        Self::Selector {
            namespaces: None,
            pods: None,
        }
    }

    pub fn namespaces(selector: Selector) -> Self {
        Self::Selector {
            namespaces: Some(selector),
            pods: None,
        }
    }

    pub fn pods(selector: Selector) -> Self {
        Self::Selector {
            namespaces: None,
            pods: Some(selector),
        }
    }

    pub fn matches(&self, other: &Entity, owner_ns: &str) -> bool {
        let (namespaces, pods) = match self {
            Self::Network(net) => {
                let matches = net.as_ref().is_some_and(|net| net.matches(other.ip()));
                trace!(peer = %other.name(), ip = ?other.ip(), ?net, matches);
                return matches;
            }
            Self::Selector { namespaces, pods } => (namespaces, pods),
        };

        let namespace_ok = match (namespaces, pods) {
            (None, None) => return true,
            (Some(selector), _) => other
                .namespace_labels()
                .is_some_and(|labels| selector.matches(&labels)),
            (None, Some(_)) => other.namespace() == Some(owner_ns),
        };
        let pod_ok = pods
            .as_ref()
            .map_or(true, |selector| selector.matches(other.labels()));

        trace!(peer = %other.name(), namespace_ok, pod_ok);
        namespace_ok && pod_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Labels, Ports};
    use maplit::btreemap;
    use netpol_reachability_k8s_api::labels::NAMESPACE_NAME;
    use std::iter::FromIterator;

    fn app(name: &'static str) -> Selector {
        Selector::from_iter(Some(("app", name)))
    }

    fn namespace(name: &'static str) -> Selector {
        Selector::from_iter(Some((NAMESPACE_NAME, name)))
    }

    fn workload(ns: &str, app: &str) -> Entity {
        Entity::workload(
            app,
            ns,
            Labels::from(btreemap! { "app".to_string() => app.to_string() }),
        )
        .with_ip("10.244.0.11".parse().unwrap())
    }

    #[test]
    fn peer_shapes() {
        let web = workload("student-dev", "web");
        let gateway = workload("kube-system", "gateway");
        let internet = Entity::external("internet").with_ip("8.8.8.8".parse().unwrap());

        for (peer, other, matches, msg) in [
            (Peer::any(), &internet, true, "empty peer matches externals"),
            (Peer::any(), &gateway, true, "empty peer matches workloads"),
            (
                Peer::namespaces(namespace("kube-system")),
                &gateway,
                true,
                "namespace selector",
            ),
            (
                Peer::namespaces(namespace("kube-system")),
                &web,
                false,
                "namespace selector excludes other namespaces",
            ),
            (
                Peer::namespaces(Selector::default()),
                &internet,
                false,
                "namespace selector requires a namespace",
            ),
            (
                Peer::pods(app("web")),
                &web,
                true,
                "pod selector in the policy namespace",
            ),
            (
                Peer::pods(app("gateway")),
                &gateway,
                false,
                "pod selector is limited to the policy namespace",
            ),
            (
                Peer::pods(Selector::default()),
                &internet,
                false,
                "pod selector excludes externals",
            ),
            (
                Peer::Selector {
                    namespaces: Some(namespace("kube-system")),
                    pods: Some(app("gateway")),
                },
                &gateway,
                true,
                "both selectors",
            ),
            (
                Peer::Selector {
                    namespaces: Some(namespace("kube-system")),
                    pods: Some(app("dns")),
                },
                &gateway,
                false,
                "both selectors must match",
            ),
            (
                Peer::Network(NetworkMatch::parse("0.0.0.0/0", &["10.0.0.0/8"])),
                &internet,
                true,
                "ip block",
            ),
            (
                Peer::Network(NetworkMatch::parse("0.0.0.0/0", &["10.0.0.0/8"])),
                &web,
                false,
                "ip block exception",
            ),
            (
                Peer::Network(None),
                &internet,
                false,
                "invalid ip block",
            ),
            (
                Peer::Network(Some(NetworkMatch::from(
                    "10.0.0.0/8".parse::<crate::IpNet>().unwrap(),
                ))),
                &Entity::workload("no-ip", "student-dev", Labels::default()),
                false,
                "ip block requires an address",
            ),
        ] {
            assert_eq!(peer.matches(other, "student-dev"), matches, "{msg}");
        }
    }

    #[test]
    fn rules_require_port_and_peer() {
        let kube_system = Peer::namespaces(namespace("kube-system"));
        let gateway = workload("kube-system", "gateway");
        let web = workload("student-dev", "web");

        let rule = Rule::allow_all()
            .with_ports(Some(PortMatch::tcp(5000)))
            .with_peers(Some(kube_system));
        assert!(rule.allows(5000, &Protocol::Tcp, &gateway, "student-dev"));
        assert!(rule.allows(5000, &Protocol::from("tcp"), &gateway, "student-dev"));
        assert!(!rule.allows(5001, &Protocol::Tcp, &gateway, "student-dev"));
        assert!(!rule.allows(5000, &Protocol::Udp, &gateway, "student-dev"));
        assert!(!rule.allows(5000, &Protocol::Tcp, &web, "student-dev"));
    }

    #[test]
    fn absent_and_empty_lists() {
        let web = workload("student-dev", "web");

        assert!(Rule::allow_all().allows(1, &Protocol::Sctp, &web, "student-dev"));
        assert!(
            Rule::allow_all()
                .with_ports(None)
                .allows(443, &Protocol::Tcp, &web, "student-dev"),
            "an empty port list admits every port"
        );
        assert!(
            !Rule::allow_all()
                .with_peers(None)
                .allows(443, &Protocol::Tcp, &web, "student-dev"),
            "an empty peer list admits no peer"
        );
        assert!(!Rule::allow_all()
            .with_ports(Some(PortMatch::new(Protocol::Tcp, Ports::Unspecified)))
            .allows(443, &Protocol::Tcp, &web, "student-dev"));
    }
}
