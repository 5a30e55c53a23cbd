use crate::{index::Index, k8s};
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

/// Reads and indexes the NetworkPolicy documents in `path`.
///
/// Policies that don't name a namespace are placed in `default_ns`. Fails if the file can't be
/// read, if a NetworkPolicy document is malformed, or if the file holds no NetworkPolicy at all.
pub fn load_policies(path: &Path, default_ns: &str) -> Result<Index> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read policy file {}", path.display()))?;
    let policies = k8s::network_policies(&input)
        .with_context(|| format!("failed to parse policy file {}", path.display()))?;
    if policies.is_empty() {
        bail!("no NetworkPolicy documents found in {}", path.display());
    }

    let index = Index::from_resources(policies, default_ns);
    for (namespace, policies) in index.namespaces() {
        info!(%namespace, policies, "Loaded policies");
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn policy_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("must create temp file");
        file.write_all(contents.as_bytes())
            .expect("must write temp file");
        file
    }

    #[test]
    fn loads_the_bundled_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/network-policy.yaml");
        let index = load_policies(&path, "student-dev").expect("fixture must load");
        assert!(!index.is_empty());
        assert_eq!(
            index.namespaces().map(|(ns, _)| ns).collect::<Vec<_>>(),
            vec!["student-dev"]
        );
    }

    #[test]
    fn rejects_files_without_policies() {
        let file = policy_file("apiVersion: v1\nkind: Service\nmetadata:\n  name: redis\n");
        let error = load_policies(file.path(), "student-dev").expect_err("must fail");
        assert!(
            error.to_string().contains("no NetworkPolicy documents"),
            "{error}"
        );
    }

    #[test]
    fn rejects_malformed_policies() {
        let file =
            policy_file("kind: NetworkPolicy\nmetadata:\n  name: broken\nspec:\n  ingress: 42\n");
        assert!(load_policies(file.path(), "student-dev").is_err());
    }

    #[test]
    fn reports_missing_files() {
        let dir = tempfile::tempdir().expect("must create temp dir");
        let path = dir.path().join("network-policy.yaml");
        let error = load_policies(&path, "student-dev").expect_err("must fail");
        assert!(error.to_string().contains("failed to read"), "{error}");
    }
}
