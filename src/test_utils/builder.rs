//! Fluent builders for execution status snapshots
//!
//! Building a [`TaskRun`] or [`PipelineRun`] by hand takes a lot of nesting; these
//! builders keep tests focused on the fields that matter.

use crate::constants::PIPELINE_TASK_LABEL;
use crate::models::digest_set;
use crate::status::{
    Param, ParamValue, PipelineRun, PipelineSpec, PipelineTask, Provenance, RefSource,
    ResourceBinding, RunResult, SidecarState, StepState, TaskRun,
};
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;

/// Fixed completion time so snapshots are reproducible.
fn completion_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single().unwrap_or_default()
}

fn ref_source(uri: &str, alg: &str, hex: &str) -> Provenance {
    Provenance {
        ref_source: Some(RefSource {
            uri: uri.to_string(),
            digest: digest_set([(alg, hex)]),
            entry_point: None,
        }),
        feature_flags: None,
    }
}

/// Builder for a leaf execution. Runs are completed unless [`Self::incomplete`] is called.
#[derive(Debug, Clone)]
pub struct TaskRunBuilder {
    run: TaskRun,
}

impl TaskRunBuilder {
    pub fn new(name: &str) -> Self {
        let mut run = TaskRun::default();
        run.metadata.name = name.to_string();
        run.status.completion_time = Some(completion_time());
        Self {
            run,
        }
    }

    /// Label the run as spawned for `pipeline_task`.
    pub fn for_pipeline_task(mut self, pipeline_task: &str) -> Self {
        self.run.metadata.labels.insert(PIPELINE_TASK_LABEL.to_string(), pipeline_task.to_string());
        self
    }

    pub fn ref_source(mut self, uri: &str, alg: &str, hex: &str) -> Self {
        self.run.status.provenance = Some(ref_source(uri, alg, hex));
        self
    }

    pub fn step(mut self, name: &str, image_id: &str) -> Self {
        self.run.status.steps.push(StepState {
            name: name.to_string(),
            image_id: image_id.to_string(),
            container: Some(format!("step-{name}")),
        });
        self
    }

    pub fn sidecar(mut self, name: &str, image_id: &str) -> Self {
        self.run.status.sidecars.push(SidecarState {
            name: name.to_string(),
            image_id: image_id.to_string(),
            container: Some(format!("sidecar-{name}")),
        });
        self
    }

    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.run.spec.params.push(Param {
            name: name.to_string(),
            value: ParamValue::String(value.to_string()),
        });
        self
    }

    /// Add an object-typed `*ARTIFACT_INPUTS` style result.
    pub fn artifact_result(mut self, name: &str, uri: &str, digest: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("uri".to_string(), uri.to_string());
        fields.insert("digest".to_string(), digest.to_string());
        self.run.status.results.push(RunResult {
            name: name.to_string(),
            result_type: Some("object".to_string()),
            value: ParamValue::Object(fields),
        });
        self
    }

    pub fn git_resource(mut self, name: &str, url: &str, commit: &str) -> Self {
        self.run.spec.resources.push(ResourceBinding {
            name: name.to_string(),
            resource_type: "git".to_string(),
            params: vec![Param {
                name: "url".to_string(),
                value: ParamValue::String(url.to_string()),
            }],
            commit: Some(commit.to_string()),
        });
        self
    }

    /// Clear the completion time.
    pub fn incomplete(mut self) -> Self {
        self.run.status.completion_time = None;
        self
    }

    pub fn build(self) -> TaskRun {
        self.run
    }
}

/// Builder for a composite execution.
#[derive(Debug, Clone)]
pub struct PipelineRunBuilder {
    run: PipelineRun,
}

impl PipelineRunBuilder {
    pub fn new(name: &str) -> Self {
        let mut run = PipelineRun::default();
        run.metadata.name = name.to_string();
        run.status.completion_time = Some(completion_time());
        run.status.pipeline_spec = Some(PipelineSpec::default());
        Self {
            run,
        }
    }

    pub fn ref_source(mut self, uri: &str, alg: &str, hex: &str) -> Self {
        self.run.status.provenance = Some(ref_source(uri, alg, hex));
        self
    }

    /// Declare a regular stage.
    pub fn task(mut self, name: &str) -> Self {
        self.spec_mut().tasks.push(PipelineTask {
            name: name.to_string(),
        });
        self
    }

    /// Declare a `finally` stage.
    pub fn finally(mut self, name: &str) -> Self {
        self.spec_mut().finally.push(PipelineTask {
            name: name.to_string(),
        });
        self
    }

    /// Record a sub-execution. Label it with [`TaskRunBuilder::for_pipeline_task`].
    pub fn task_run(mut self, run: TaskRun) -> Self {
        self.run.task_runs.push(run);
        self
    }

    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.run.spec.params.push(Param {
            name: name.to_string(),
            value: ParamValue::String(value.to_string()),
        });
        self
    }

    pub fn artifact_result(mut self, name: &str, uri: &str, digest: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("uri".to_string(), uri.to_string());
        fields.insert("digest".to_string(), digest.to_string());
        self.run.status.results.push(RunResult {
            name: name.to_string(),
            result_type: Some("object".to_string()),
            value: ParamValue::Object(fields),
        });
        self
    }

    /// Drop the recorded pipeline spec entirely.
    pub fn without_spec(mut self) -> Self {
        self.run.status.pipeline_spec = None;
        self
    }

    pub fn build(self) -> PipelineRun {
        self.run
    }

    fn spec_mut(&mut self) -> &mut PipelineSpec {
        self.run.status.pipeline_spec.get_or_insert_with(PipelineSpec::default)
    }
}
