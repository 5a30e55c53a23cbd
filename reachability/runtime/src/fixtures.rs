//! The workloads and flows that policies are evaluated against.

use crate::core::{Entity, Flow, Labels, Protocol};
use ahash::AHashMap as HashMap;
use std::iter::FromIterator;

/// The namespace that hosts the cluster's gateway and DNS.
pub const SYSTEM_NAMESPACE: &str = "kube-system";

/// Entities, keyed by the logical name that flows use to refer to them.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entities: HashMap<String, Entity>,
}

/// A flow and whether it should be allowed once the policies apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpectedFlow {
    pub flow: Flow,
    pub allowed_after: bool,
}

// === impl Catalog ===

impl Catalog {
    /// The lab topology, with application workloads placed in `namespace`.
    pub fn fixture(namespace: &str) -> Self {
        let app = |name: &'static str| Labels::from_iter(Some(("app", name)));
        let workload = |name: &str, ns: &str, labels: Labels, ip: [u8; 4]| {
            Entity::workload(name, ns, labels).with_ip(ip.into())
        };

        vec![
            workload("gateway", SYSTEM_NAMESPACE, app("gateway"), [10, 96, 10, 10]),
            workload("student-app", namespace, app("student-app"), [10, 244, 0, 11]),
            workload("redis", namespace, app("redis"), [10, 244, 0, 12]),
            workload("uptime-kuma", namespace, app("uptime-kuma"), [10, 244, 0, 13]),
            workload(
                "dns",
                SYSTEM_NAMESPACE,
                Labels::from_iter(Some(("k8s-app", "kube-dns"))),
                [10, 96, 0, 10],
            ),
            Entity::external("internet").with_ip([8, 8, 8, 8].into()),
        ]
        .into_iter()
        .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }
}

impl FromIterator<Entity> for Catalog {
    fn from_iter<T: IntoIterator<Item = Entity>>(iter: T) -> Self {
        Self {
            entities: iter
                .into_iter()
                .map(|e| (e.name().to_string(), e))
                .collect(),
        }
    }
}

// === impl ExpectedFlow ===

impl ExpectedFlow {
    fn new(
        name: &str,
        source: &str,
        destination: &str,
        port: u16,
        protocol: Protocol,
        allowed_after: bool,
    ) -> Self {
        Self {
            flow: Flow::new(name, source, destination, port, protocol),
            allowed_after,
        }
    }
}

/// The flows of the lab topology, in report order.
pub fn flows() -> Vec<ExpectedFlow> {
    use Protocol::{Tcp, Udp};
    vec![
        ExpectedFlow::new("Gateway to student-app", "gateway", "student-app", 5000, Tcp, true),
        ExpectedFlow::new("Gateway to uptime-kuma", "gateway", "uptime-kuma", 3001, Tcp, true),
        ExpectedFlow::new("student-app to redis", "student-app", "redis", 6379, Tcp, true),
        ExpectedFlow::new(
            "uptime-kuma to student-app",
            "uptime-kuma",
            "student-app",
            5000,
            Tcp,
            true,
        ),
        ExpectedFlow::new(
            "uptime-kuma to internet HTTPS",
            "uptime-kuma",
            "internet",
            443,
            Tcp,
            true,
        ),
        ExpectedFlow::new(
            "student-app to internet HTTPS",
            "student-app",
            "internet",
            443,
            Tcp,
            false,
        ),
        ExpectedFlow::new("redis to internet HTTPS", "redis", "internet", 443, Tcp, false),
        ExpectedFlow::new("student-app to DNS", "student-app", "dns", 53, Udp, true),
        ExpectedFlow::new("redis to DNS", "redis", "dns", 53, Udp, true),
        ExpectedFlow::new("uptime-kuma to DNS", "uptime-kuma", "dns", 53, Udp, true),
        ExpectedFlow::new("Gateway to redis", "gateway", "redis", 6379, Tcp, false),
        ExpectedFlow::new("uptime-kuma to redis", "uptime-kuma", "redis", 6379, Tcp, false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_workloads() {
        let catalog = Catalog::fixture("student-dev");
        assert_eq!(catalog.len(), 6);

        for (name, namespace, ip) in [
            ("gateway", Some(SYSTEM_NAMESPACE), "10.96.10.10"),
            ("student-app", Some("student-dev"), "10.244.0.11"),
            ("redis", Some("student-dev"), "10.244.0.12"),
            ("uptime-kuma", Some("student-dev"), "10.244.0.13"),
            ("dns", Some(SYSTEM_NAMESPACE), "10.96.0.10"),
            ("internet", None, "8.8.8.8"),
        ] {
            let entity = catalog.get(name).expect("entity must exist");
            assert_eq!(entity.namespace(), namespace, "{name}");
            assert_eq!(entity.ip(), Some(ip.parse().unwrap()), "{name}");
        }

        assert!(catalog.get("internet").unwrap().is_external());
        assert_eq!(
            catalog.get("dns").unwrap().labels().get("k8s-app"),
            Some("kube-dns")
        );
        assert!(catalog.get("postgres").is_none());
    }

    #[test]
    fn follows_the_policy_namespace() {
        let catalog = Catalog::fixture("staging");
        assert_eq!(catalog.get("redis").unwrap().namespace(), Some("staging"));
        assert_eq!(
            catalog.get("gateway").unwrap().namespace(),
            Some(SYSTEM_NAMESPACE)
        );
    }

    #[test]
    fn flows_refer_to_cataloged_entities() {
        let catalog = Catalog::fixture("student-dev");
        let flows = flows();
        assert_eq!(flows.len(), 12);
        assert_eq!(flows.iter().filter(|f| f.allowed_after).count(), 8);
        for ExpectedFlow { flow, .. } in &flows {
            assert!(catalog.get(&flow.source).is_some(), "{flow}");
            assert!(catalog.get(&flow.destination).is_some(), "{flow}");
        }
    }
}
