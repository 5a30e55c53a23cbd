use ipnet::IpNet;
use netpol_reachability_k8s_api::policy::Cidr;
use std::net::IpAddr;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NetworkMatch {
    /// A network to match against.
    pub net: IpNet,

    /// Networks to exclude from the match.
    pub except: Vec<IpNet>,
}

// === impl NetworkMatch ===

impl From<IpNet> for NetworkMatch {
    fn from(net: IpNet) -> Self {
        Self {
            net,
            except: vec![],
        }
    }
}

impl NetworkMatch {
    /// Builds a match from an `ipBlock`'s CIDR and exceptions as written.
    ///
    /// Returns `None` if the CIDR can't be parsed. Exceptions that can't be parsed are dropped.
    pub fn parse<S: AsRef<str>>(cidr: &str, except: &[S]) -> Option<Self> {
        let net = match cidr.parse::<Cidr>() {
            Ok(cidr) => IpNet::from(cidr),
            Err(error) => {
                debug!(%error, "Ignoring unparseable ipBlock");
                return None;
            }
        };

        let except = except
            .iter()
            .filter_map(|ex| match ex.as_ref().parse::<Cidr>() {
                Ok(cidr) => Some(IpNet::from(cidr)),
                Err(error) => {
                    debug!(%error, %net, "Ignoring unparseable ipBlock exception");
                    None
                }
            })
            .collect();

        Some(Self { net, except })
    }

    /// Checks whether an endpoint's address falls within the network and outside of every
    /// exception. An unknown address never matches.
    pub fn matches(&self, addr: Option<IpAddr>) -> bool {
        addr.is_some_and(|addr| self.contains(addr))
    }

    pub fn contains(&self, addr: IpAddr) -> bool {
        self.net.contains(&addr) && !self.except.iter().any(|ex| ex.contains(&addr))
    }
}
