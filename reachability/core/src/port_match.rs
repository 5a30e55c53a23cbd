use std::{convert::Infallible, fmt, str::FromStr};
use tracing::trace;

/// A transport protocol. Names are case-insensitive.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
    Sctp,
    Other(String),
}

/// Matches traffic on a protocol and port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortMatch {
    pub protocol: Protocol,
    pub ports: Ports,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ports {
    /// A single port.
    Exact(u16),

    /// A named container port. Entities don't describe their container ports, so these never
    /// match.
    Named(String),

    /// No port, or a port number that isn't valid.
    Unspecified,
}

// === impl Protocol ===

impl FromStr for Protocol {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_uppercase();
        Ok(match s.as_str() {
            "TCP" => Self::Tcp,
            "UDP" => Self::Udp,
            "SCTP" => Self::Sctp,
            _ => Self::Other(s),
        })
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => "TCP".fmt(f),
            Self::Udp => "UDP".fmt(f),
            Self::Sctp => "SCTP".fmt(f),
            Self::Other(p) => p.fmt(f),
        }
    }
}

impl From<&str> for Protocol {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(p) => p,
            Err(never) => match never {},
        }
    }
}

// === impl PortMatch ===

impl PortMatch {
    pub fn new(protocol: Protocol, ports: Ports) -> Self {
        Self { protocol, ports }
    }

    pub fn tcp(port: u16) -> Self {
        Self::new(Protocol::Tcp, Ports::Exact(port))
    }

    pub fn udp(port: u16) -> Self {
        Self::new(Protocol::Udp, Ports::Exact(port))
    }

    pub fn matches(&self, port: u16, protocol: &Protocol) -> bool {
        if self.protocol != *protocol {
            return false;
        }

        match self.ports {
            Ports::Exact(p) => p == port,
            Ports::Named(ref name) => {
                trace!(%name, port, "Named ports are not resolved");
                false
            }
            Ports::Unspecified => false,
        }
    }
}
