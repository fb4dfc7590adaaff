//! Parsing of digest-pinned container image IDs.
//!
//! The repository part is used verbatim: `alpine@sha256:…` becomes `oci://alpine`,
//! while `docker.io/library/alpine@sha256:…` becomes
//! `oci://docker.io/library/alpine`. No registry or namespace defaults are filled
//! in, so the two spellings of one image yield different URIs and are not treated
//! as duplicates of each other.

use crate::constants::OCI_SCHEME;
use crate::core::{ProvdepsError, Result};
use crate::models::{ProvenanceMaterial, digest_set};
use regex::Regex;
use std::sync::OnceLock;

/// Prefix some container runtimes put in front of the image ID.
const DOCKER_PULLABLE_PREFIX: &str = "docker-pullable://";

fn image_id_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<repo>[^@\s]+)@(?P<alg>[a-z0-9]+(?:[.+_-][a-z0-9]+)*):(?P<hex>[0-9a-fA-F]+)$")
            .ok()
    })
    .as_ref()
}

/// A parsed `repo@algorithm:hex` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageId<'a> {
    pub repository: &'a str,
    pub algorithm: &'a str,
    pub hex: &'a str,
}

impl<'a> ImageId<'a> {
    /// Parse an image ID as recorded in step or sidecar state.
    pub fn parse(raw: &'a str) -> Result<Self> {
        let trimmed = raw.trim();
        let reference = trimmed.strip_prefix(DOCKER_PULLABLE_PREFIX).unwrap_or(trimmed);

        let invalid = |reason: &str| ProvdepsError::ImageReference {
            image: raw.to_string(),
            reason: reason.to_string(),
        };

        if reference.is_empty() {
            return Err(invalid("image ID is empty"));
        }
        if !reference.contains('@') {
            return Err(invalid("image ID is not pinned by digest"));
        }

        let caps = image_id_regex()
            .and_then(|re| re.captures(reference))
            .ok_or_else(|| invalid("expected '<repository>@<algorithm>:<hex digest>'"))?;

        // Captures borrow from `reference`, which borrows from `raw`
        let (repository, algorithm, hex) = match (caps.name("repo"), caps.name("alg"), caps.name("hex")) {
            (Some(r), Some(a), Some(h)) => (r.as_str(), a.as_str(), h.as_str()),
            _ => return Err(invalid("expected '<repository>@<algorithm>:<hex digest>'")),
        };

        Ok(Self {
            repository,
            algorithm,
            hex,
        })
    }

    #[must_use]
    pub fn to_material(&self) -> ProvenanceMaterial {
        ProvenanceMaterial::new(
            format!("{OCI_SCHEME}{}", self.repository),
            digest_set([(self.algorithm, self.hex)]),
        )
    }
}
