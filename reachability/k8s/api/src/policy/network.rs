/// A network or a single address, as written in an `ipBlock`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Cidr {
    Addr(std::net::IpAddr),
    Net(ipnet::IpNet),
}

#[derive(Debug, thiserror::Error)]
#[error("not a valid CIDR or IP address: {0}")]
pub struct CidrParseError(String);

// === impl Cidr ===

impl std::str::FromStr for Cidr {
    type Err = CidrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(net) = s.parse() {
            return Ok(Self::Net(net));
        }

        if let Ok(addr) = s.parse() {
            return Ok(Self::Addr(addr));
        }

        Err(CidrParseError(s.to_string()))
    }
}

impl From<Cidr> for ipnet::IpNet {
    fn from(cidr: Cidr) -> ipnet::IpNet {
        match cidr {
            Cidr::Net(net) => net,
            Cidr::Addr(addr) => ipnet::IpNet::from(addr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_networks_and_addresses() {
        for (input, expected) in [
            ("10.0.0.0/8", Some("10.0.0.0/8")),
            ("10.1.2.3/8", Some("10.1.2.3/8")),
            (" 192.168.0.0/16 ", Some("192.168.0.0/16")),
            ("8.8.8.8", Some("8.8.8.8/32")),
            ("fd00::/8", Some("fd00::/8")),
            ("::1", Some("::1/128")),
            ("10.0.0.0/33", None),
            ("not-a-cidr", None),
            ("", None),
        ] {
            let parsed = input.parse::<Cidr>().ok().map(ipnet::IpNet::from);
            assert_eq!(
                parsed,
                expected.map(|e| e.parse::<ipnet::IpNet>().unwrap()),
                "{input:?}"
            );
        }
    }
}
