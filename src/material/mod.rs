//! Material extraction from execution status
//!
//! Each function here turns one part of a status snapshot into
//! [`ProvenanceMaterial`] records. The resolvers categorize and deduplicate them.
//!
//! | Source | Function | Fallible |
//! |--------|----------|----------|
//! | Step containers | [`from_step_images`] | yes |
//! | Sidecar containers | [`from_sidecar_images`] | yes |
//! | Type-hinted task params/results | [`from_task_params_and_results`] | no |
//! | Type-hinted pipeline params/results | [`from_pipeline_params_and_results`] | no |
//! | Bound git resources | [`from_task_resources`] | no |
//!
//! Image extraction fails on the first image ID that is not digest-pinned; the
//! other extractors skip malformed hints with a debug log.

mod hints;
pub mod image;
mod resources;

use crate::core::Result;
use crate::models::ProvenanceMaterial;
use crate::status::{SidecarState, StepState};
use image::ImageId;

pub use hints::{from_pipeline_params_and_results, from_task_params_and_results};
pub use resources::from_task_resources;

/// Materials for the images of each step container, in step order.
pub fn from_step_images(steps: &[StepState]) -> Result<Vec<ProvenanceMaterial>> {
    steps.iter().map(|step| ImageId::parse(&step.image_id).map(|id| id.to_material())).collect()
}

/// Materials for the images of each sidecar container, in sidecar order.
pub fn from_sidecar_images(sidecars: &[SidecarState]) -> Result<Vec<ProvenanceMaterial>> {
    sidecars
        .iter()
        .map(|sidecar| ImageId::parse(&sidecar.image_id).map(|id| id.to_material()))
        .collect()
}
