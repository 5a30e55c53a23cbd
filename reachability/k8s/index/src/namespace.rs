use ahash::AHashMap as HashMap;
use netpol_reachability_core::Policy;

#[derive(Debug, Default)]
pub(crate) struct NamespaceIndex {
    pub index: HashMap<String, Namespace>,
}

#[derive(Debug, Default)]
pub(crate) struct Namespace {
    /// Policies in this namespace, in the order they were indexed.
    pub policies: Vec<Policy>,
}

// === impl NamespaceIndex ===

impl NamespaceIndex {
    pub fn get_or_default(&mut self, name: impl Into<String>) -> &mut Namespace {
        self.index.entry(name.into()).or_default()
    }

    pub fn policies(&self, name: &str) -> &[Policy] {
        self.index
            .get(name)
            .map(|ns| ns.policies.as_slice())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Namespace)> {
        self.index.iter()
    }
}
