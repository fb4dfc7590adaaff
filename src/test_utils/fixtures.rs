//! Ready-made status documents for CLI and parsing tests.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// A named document written to disk by tests.
pub struct StatusFixture {
    pub file_name: String,
    pub content: String,
}

impl StatusFixture {
    /// The leaf execution from the documented single-execution example.
    pub fn task_run_json() -> Self {
        Self {
            file_name: "taskrun.json".to_string(),
            content: r#"{
  "metadata": {"name": "build-run"},
  "spec": {"params": []},
  "status": {
    "provenance": {
      "refSource": {"uri": "git.example/repo", "digest": {"sha1": "abc"}}
    },
    "steps": [{"name": "build", "imageID": "reg/img@sha256:d1"}],
    "results": [
      {"name": "foo_ARTIFACT_INPUTS", "type": "object",
       "value": {"uri": "param/foo", "digest": "sha256:d2"}}
    ],
    "completionTime": "2024-01-01T12:00:00Z"
  }
}"#
            .to_string(),
        }
    }

    /// A composite execution with one stage that ran and one that never did.
    pub fn pipeline_run_yaml() -> Self {
        Self {
            file_name: "pipelinerun.yaml".to_string(),
            content: r#"metadata:
  name: release
spec:
  params:
    - name: CHAINS-GIT_URL
      value: https://git.example/app
    - name: CHAINS-GIT_COMMIT
      value: c0ffee
status:
  provenance:
    refSource:
      uri: git.example/pipelines
      digest:
        sha1: p1
  pipelineSpec:
    tasks:
      - name: build
      - name: deploy
    finally:
      - name: notify
  completionTime: "2024-01-01T12:30:00Z"
taskRuns:
  - metadata:
      name: release-build
      labels:
        tekton.dev/pipelineTask: build
    status:
      provenance:
        refSource:
          uri: git.example/tasks
          digest:
            sha1: t1
      steps:
        - name: compile
          imageID: docker-pullable://reg/builder@sha256:b1
      sidecars:
        - name: cache
          imageID: reg/cache@sha256:c1
      completionTime: "2024-01-01T12:10:00Z"
  - metadata:
      name: release-notify
      labels:
        tekton.dev/pipelineTask: notify
    status:
      steps:
        - name: send
          imageID: reg/notifier@sha256:e1
"#
            .to_string(),
        }
    }

    /// A leaf execution whose step image is not digest-pinned.
    pub fn unpinned_task_run_json() -> Self {
        Self {
            file_name: "unpinned.json".to_string(),
            content: r#"{"status": {"steps": [{"name": "build", "imageID": "alpine:3.19"}]}}"#
                .to_string(),
        }
    }

    /// A descriptor list with duplicates around a protected entry.
    pub fn descriptors_json() -> Self {
        Self {
            file_name: "deps.json".to_string(),
            content: r#"{"resolvedDependencies": [
  {"name": "task", "uri": "a", "digest": {"sha256": "x"}},
  {"uri": "a", "digest": {"sha256": "x"}},
  {"uri": "b", "digest": {"sha256": "y"}},
  {"name": "inputs/result", "uri": "b", "digest": {"sha256": "y"}}
]}"#
            .to_string(),
        }
    }

    /// Write the fixture into `dir`, returning its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.content)?;
        Ok(path)
    }
}
