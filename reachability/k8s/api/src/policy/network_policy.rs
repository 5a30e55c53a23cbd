use crate::{labels::Selector, IntOrString, ObjectMeta};
use serde::{Deserialize, Deserializer, Serialize};

/// A `networking.k8s.io/v1` NetworkPolicy document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicy {
    pub api_version: Option<String>,
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: NetworkPolicySpec,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicySpec {
    /// Selects the pods, in the policy's namespace, that the policy governs. When omitted, all
    /// pods in the namespace are selected.
    pub pod_selector: Option<Selector>,

    /// Names the directions (`Ingress`, `Egress`) the policy governs. When omitted, the
    /// directions are inferred from the rule lists present in the spec.
    pub policy_types: Option<Vec<String>>,

    /// Ingress rules. A key that is present with a null value holds an empty list.
    #[serde(default, deserialize_with = "present_rules")]
    pub ingress: Option<Vec<NetworkPolicyIngressRule>>,

    /// Egress rules. A key that is present with a null value holds an empty list.
    #[serde(default, deserialize_with = "present_rules")]
    pub egress: Option<Vec<NetworkPolicyEgressRule>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkPolicyIngressRule {
    pub from: Option<Vec<NetworkPolicyPeer>>,
    pub ports: Option<Vec<NetworkPolicyPort>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkPolicyEgressRule {
    pub to: Option<Vec<NetworkPolicyPeer>>,
    pub ports: Option<Vec<NetworkPolicyPort>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicyPeer {
    pub pod_selector: Option<Selector>,
    pub namespace_selector: Option<Selector>,
    pub ip_block: Option<IpBlock>,
}

/// A CIDR and the ranges excluded from it.
///
/// Addresses are kept as written; they are validated when the policy is indexed. A `cidr` that
/// is missing or isn't a string is held as `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IpBlock {
    #[serde(default, deserialize_with = "string_or_none")]
    pub cidr: Option<String>,
    pub except: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicyPort {
    pub protocol: Option<String>,
    pub port: Option<IntOrString>,
}

// === impl NetworkPolicy ===

impl NetworkPolicy {
    pub const KIND: &'static str = "NetworkPolicy";
}

// === impl NetworkPolicySpec ===

impl NetworkPolicySpec {
    pub const INGRESS: &'static str = "Ingress";
    pub const EGRESS: &'static str = "Egress";

    pub fn declares_ingress(&self) -> bool {
        self.declares(Self::INGRESS, self.ingress.is_some())
    }

    pub fn declares_egress(&self) -> bool {
        self.declares(Self::EGRESS, self.egress.is_some())
    }

    fn declares(&self, policy_type: &str, has_rules: bool) -> bool {
        match self.policy_types.as_ref() {
            Some(types) => types.iter().any(|t| t == policy_type),
            None => has_rules,
        }
    }
}

/// Reads a rule list whose key is present, so that `ingress:` with no value still declares the
/// direction.
fn present_rules<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let rules = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(Some(rules.unwrap_or_default()))
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}
