use netpol_reachability_core::{NetworkMatch, Peer, Policy, PortMatch, Ports, Protocol, Rule};
use netpol_reachability_k8s_api::{
    policy::{NetworkPolicyPeer, NetworkPolicyPort, NetworkPolicySpec},
    IntOrString, NetworkPolicy,
};
use tracing::debug;

/// The name given to policies that don't declare one.
pub const UNNAMED_POLICY: &str = "unnamed-policy";

/// Builds a policy from a NetworkPolicy resource, placing it in `default_ns` when the resource
/// doesn't name a namespace.
///
/// Conversion never fails: parts of the resource that can't be interpreted (missing or invalid
/// CIDRs, named or invalid ports) become matchers that admit nothing. `endPort` is ignored, so a
/// port entry only ever matches its `port`.
pub(crate) fn mk_policy(np: NetworkPolicy, default_ns: &str) -> Policy {
    let name = np
        .metadata
        .name
        .unwrap_or_else(|| UNNAMED_POLICY.to_string());
    let namespace = np
        .metadata
        .namespace
        .unwrap_or_else(|| default_ns.to_string());

    let declares_ingress = np.spec.declares_ingress();
    let declares_egress = np.spec.declares_egress();
    let NetworkPolicySpec {
        pod_selector,
        ingress,
        egress,
        ..
    } = np.spec;

    let ingress = declares_ingress.then(|| {
        ingress
            .into_iter()
            .flatten()
            .map(|rule| mk_rule(rule.ports, rule.from))
            .collect()
    });
    let egress = declares_egress.then(|| {
        egress
            .into_iter()
            .flatten()
            .map(|rule| mk_rule(rule.ports, rule.to))
            .collect()
    });

    Policy {
        name,
        namespace,
        pod_selector: pod_selector.unwrap_or_default(),
        ingress,
        egress,
    }
}

fn mk_rule(ports: Option<Vec<NetworkPolicyPort>>, peers: Option<Vec<NetworkPolicyPeer>>) -> Rule {
    Rule {
        ports: ports.map(|ports| ports.into_iter().map(mk_port).collect()),
        peers: peers.map(|peers| peers.into_iter().map(mk_peer).collect()),
    }
}

fn mk_peer(peer: NetworkPolicyPeer) -> Peer {
    // Selectors alongside an ipBlock are ignored.
    if let Some(block) = peer.ip_block {
        let except = block.except.unwrap_or_default();
        let net = block
            .cidr
            .as_deref()
            .and_then(|cidr| NetworkMatch::parse(cidr, except.as_slice()));
        return Peer::Network(net);
    }

    Peer::Selector {
        namespaces: peer.namespace_selector,
        pods: peer.pod_selector,
    }
}

fn mk_port(port: NetworkPolicyPort) -> PortMatch {
    let protocol = port
        .protocol
        .as_deref()
        .map(Protocol::from)
        .unwrap_or_default();

    let ports = match port.port {
        None => Ports::Unspecified,
        Some(IntOrString::Int(number)) => mk_ports(number),
        Some(IntOrString::String(name)) => match name.trim().parse::<i32>() {
            Ok(number) => mk_ports(number),
            Err(_) => Ports::Named(name),
        },
    };

    PortMatch::new(protocol, ports)
}

fn mk_ports(number: i32) -> Ports {
    match u16::try_from(number) {
        Ok(port) => Ports::Exact(port),
        Err(_) => {
            debug!(port = number, "Ignoring invalid port");
            Ports::Unspecified
        }
    }
}
