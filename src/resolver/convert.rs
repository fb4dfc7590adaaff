//! Material-to-descriptor conversion.

use crate::models::{ProvenanceMaterial, ResourceDescriptor};

/// Turn materials into resolved dependencies, one for one and in order.
///
/// Every descriptor gets `name` as its category label unless `name` is empty, in
/// which case the label is left unset. No deduplication happens here.
pub fn convert_materials(materials: Vec<ProvenanceMaterial>, name: &str) -> Vec<ResourceDescriptor> {
    let label = (!name.is_empty()).then(|| name.to_string());
    materials
        .into_iter()
        .map(|mat| ResourceDescriptor {
            name: label.clone(),
            uri: mat.uri,
            digest: mat.digest,
        })
        .collect()
}
