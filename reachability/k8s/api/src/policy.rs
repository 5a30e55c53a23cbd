pub mod network;
pub mod network_policy;

pub use self::{
    network::{Cidr, CidrParseError},
    network_policy::{
        IpBlock, NetworkPolicy, NetworkPolicyEgressRule, NetworkPolicyIngressRule,
        NetworkPolicyPeer, NetworkPolicyPort, NetworkPolicySpec,
    },
};
