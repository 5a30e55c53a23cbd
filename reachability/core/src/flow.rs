use crate::Protocol;

/// A connection from one named entity to another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flow {
    pub name: String,
    pub source: String,
    pub destination: String,
    pub port: u16,
    pub protocol: Protocol,
}

/// The outcome of evaluating a flow against a policy set.
///
/// A flow is allowed only when both the source's egress and the destination's ingress admit it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub egress: bool,
    pub ingress: bool,
}

// === impl Flow ===

impl Flow {
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
        port: u16,
        protocol: Protocol,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            destination: destination.into(),
            port,
            protocol,
        }
    }
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {}:{}/{}",
            self.source, self.destination, self.port, self.protocol
        )
    }
}

// === impl Verdict ===

impl Verdict {
    pub const ALLOW: Self = Self {
        egress: true,
        ingress: true,
    };

    pub fn is_allowed(&self) -> bool {
        self.egress && self.ingress
    }
}
