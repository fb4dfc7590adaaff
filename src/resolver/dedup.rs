//! Duplicate removal for resolved dependencies.
//!
//! Two descriptors are duplicates when their `(uri, digest)` pair is identical; the
//! `name` label is ignored. The first occurrence wins and order is preserved, with
//! one exception: descriptors named `"task"` or `"pipeline"` are always emitted,
//! because they are the canonical record of where the run's configuration came from.
//!
//! ```text
//! input                         output
//! ─────────────────────────     ─────────────────────────
//! {            uri: a, x }  →   {            uri: a, x }
//! { task       uri: a, x }  →   { task       uri: a, x }   protected, kept
//! {            uri: a, x }      (skipped)
//! { inputs/res uri: b, y }  →   { inputs/res uri: b, y }
//! ```
//!
//! Protection only decides whether a repeat may pass; it never un-skips an earlier
//! entry and never exempts the key from later suppression.

use crate::constants::PROTECTED_NAMES;
use crate::core::{ProvdepsError, Result};
use crate::models::{DigestSet, ResourceDescriptor};
use serde::Serialize;
use std::collections::HashSet;

/// The part of a descriptor that decides identity.
#[derive(Serialize)]
struct IdentityKey<'a> {
    uri: &'a str,
    digest: &'a DigestSet,
}

/// Canonical serialization of a descriptor's `(uri, digest)` pair.
///
/// Digest entries are emitted in sorted algorithm order, so insertion order of the
/// digest map never affects identity.
pub fn identity_key(descriptor: &ResourceDescriptor) -> Result<String> {
    serde_json::to_string(&IdentityKey {
        uri: &descriptor.uri,
        digest: &descriptor.digest,
    })
    .map_err(|e| ProvdepsError::IdentitySerialization {
        uri: descriptor.uri.clone(),
        reason: e.to_string(),
    })
}

/// Whether descriptors with this name survive deduplication unconditionally.
#[must_use]
pub fn is_protected(name: &str) -> bool {
    PROTECTED_NAMES.contains(&name)
}

/// Remove duplicate resolved dependencies, keeping first-seen order.
pub fn remove_duplicates(descriptors: Vec<ResourceDescriptor>) -> Result<Vec<ResourceDescriptor>> {
    let mut out = Vec::with_capacity(descriptors.len());
    let mut seen: HashSet<String> = HashSet::with_capacity(descriptors.len());

    for descriptor in descriptors {
        let key = identity_key(&descriptor)?;
        if seen.contains(&key) && !is_protected(descriptor.name()) {
            tracing::trace!("Dropping duplicate resolved dependency {}", descriptor.uri);
            continue;
        }
        seen.insert(key);
        out.push(descriptor);
    }

    Ok(out)
}
