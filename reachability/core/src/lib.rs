#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

mod entity;
mod flow;
mod network_match;
mod policy;
mod port_match;
mod rule;

pub use self::{
    entity::Entity,
    flow::{Flow, Verdict},
    network_match::NetworkMatch,
    policy::{Direction, Policy},
    port_match::{PortMatch, Ports, Protocol},
    rule::{Peer, Rule},
};
pub use ipnet::IpNet;
pub use netpol_reachability_k8s_api::{labels::Labels, Selector};
