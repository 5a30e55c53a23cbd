//! Reads NetworkPolicy resources from multi-document YAML.

use crate::policy::NetworkPolicy;
use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document {index} is not valid YAML: {source}")]
    Yaml {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("document {index} is not a valid NetworkPolicy: {source}")]
    Invalid {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Parses every `NetworkPolicy` in `input`, in document order.
///
/// Documents of other kinds, and documents that aren't mappings, are skipped. `List` documents
/// are flattened. A `NetworkPolicy` document that doesn't fit the schema fails the whole parse.
pub fn network_policies(input: &str) -> Result<Vec<NetworkPolicy>, DocumentError> {
    let mut policies = Vec::new();
    for (index, doc) in serde_yaml::Deserializer::from_str(input).enumerate() {
        let value = Value::deserialize(doc).map_err(|source| DocumentError::Yaml { index, source })?;
        collect(index, value, &mut policies)?;
    }
    Ok(policies)
}

fn collect(
    index: usize,
    value: Value,
    policies: &mut Vec<NetworkPolicy>,
) -> Result<(), DocumentError> {
    let Value::Mapping(mut doc) = value else {
        debug!(index, "Skipping document that is not a mapping");
        return Ok(());
    };

    let kind = match doc.get("kind").and_then(Value::as_str) {
        Some(kind) => kind.to_string(),
        None => {
            debug!(index, "Skipping document without a kind");
            return Ok(());
        }
    };

    if kind == NetworkPolicy::KIND {
        let policy = serde_yaml::from_value(Value::Mapping(doc))
            .map_err(|source| DocumentError::Invalid { index, source })?;
        policies.push(policy);
        return Ok(());
    }

    if kind.ends_with("List") {
        if let Some(Value::Sequence(items)) = doc.remove("items") {
            for item in items {
                collect(index, item, policies)?;
            }
        }
        return Ok(());
    }

    debug!(index, %kind, "Skipping document");
    Ok(())
}
