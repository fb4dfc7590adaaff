//! Shared data models for provenance records
//!
//! [`ProvenanceMaterial`] is what the extraction collaborators produce;
//! [`ResourceDescriptor`] is what ends up in the provenance document's
//! `resolvedDependencies` list. Both carry a [`DigestSet`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Digests of one artifact keyed by algorithm name (`sha256`, `sha1`, ...).
///
/// A sorted map: two sets with the same entries serialize identically no matter
/// the order they were built in.
pub type DigestSet = BTreeMap<String, String>;

/// Build a [`DigestSet`] from `(algorithm, hex)` pairs.
///
/// ```rust
/// use provdeps::models::digest_set;
///
/// let digest = digest_set([("sha256", "d1")]);
/// assert_eq!(digest["sha256"], "d1");
/// ```
pub fn digest_set<I, K, V>(pairs: I) -> DigestSet
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// A raw artifact reference extracted from execution status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceMaterial {
    pub uri: String,
    #[serde(default)]
    pub digest: DigestSet,
}

impl ProvenanceMaterial {
    pub fn new(uri: impl Into<String>, digest: DigestSet) -> Self {
        Self {
            uri: uri.into(),
            digest,
        }
    }
}

/// An entry of the `resolvedDependencies` list.
///
/// `name` is a category label such as `"task"` or `"inputs/result"`; it never takes
/// part in duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub uri: String,
    #[serde(default, skip_serializing_if = "DigestSet::is_empty")]
    pub digest: DigestSet,
}

impl ResourceDescriptor {
    /// Descriptor without a category label.
    pub fn new(uri: impl Into<String>, digest: DigestSet) -> Self {
        Self {
            name: None,
            uri: uri.into(),
            digest,
        }
    }

    /// Descriptor tagged with a category label.
    pub fn named(name: impl Into<String>, uri: impl Into<String>, digest: DigestSet) -> Self {
        Self {
            name: Some(name.into()),
            uri: uri.into(),
            digest,
        }
    }

    /// The category label, or `""` when unset.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Document wrapper used for CLI input and output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDependencies {
    pub resolved_dependencies: Vec<ResourceDescriptor>,
}
