//! Behavioural properties of the deduplicator and resolvers, checked over a set of
//! hand-picked descriptor sequences.

use provdeps::config::SlsaConfig;
use provdeps::models::{ResourceDescriptor, digest_set};
use provdeps::resolver::{identity_key, is_protected, pipeline_run, remove_duplicates, task_run};
use provdeps::test_utils::{PipelineRunBuilder, TaskRunBuilder};
use std::collections::HashSet;

fn rd(name: Option<&str>, uri: &str, hex: &str) -> ResourceDescriptor {
    ResourceDescriptor {
        name: name.map(str::to_string),
        uri: uri.to_string(),
        digest: digest_set([("sha256", hex)]),
    }
}

fn corpus() -> Vec<Vec<ResourceDescriptor>> {
    vec![
        vec![],
        vec![rd(None, "a", "1")],
        vec![rd(Some("task"), "a", "1"), rd(None, "a", "1")],
        vec![rd(None, "a", "1"), rd(Some("task"), "a", "1"), rd(Some("task"), "a", "1")],
        vec![
            rd(Some("pipeline"), "p", "0"),
            rd(Some("pipelineTask"), "t", "1"),
            rd(None, "img", "2"),
            rd(Some("pipelineTask"), "t", "1"),
            rd(None, "img", "2"),
            rd(Some("inputs/result"), "p", "0"),
            rd(Some("pipeline"), "p", "0"),
        ],
        vec![
            rd(None, "c", "3"),
            rd(Some("inputs/result"), "b", "2"),
            rd(None, "a", "1"),
            rd(Some("pipelineResource"), "b", "2"),
            rd(None, "c", "3"),
            rd(Some("task"), "c", "3"),
        ],
    ]
}

#[test]
fn test_dedup_is_idempotent() {
    for input in corpus() {
        let once = remove_duplicates(input.clone()).unwrap();
        let twice = remove_duplicates(once.clone()).unwrap();
        assert_eq!(once, twice, "input: {input:?}");
    }
}

#[test]
fn test_first_occurrences_keep_relative_order() {
    for input in corpus() {
        let mut seen = HashSet::new();
        let firsts: Vec<&ResourceDescriptor> =
            input.iter().filter(|d| seen.insert(identity_key(d).unwrap())).collect();

        let output = remove_duplicates(input.clone()).unwrap();
        let mut seen = HashSet::new();
        let output_firsts: Vec<&ResourceDescriptor> =
            output.iter().filter(|d| seen.insert(identity_key(d).unwrap())).collect();

        assert_eq!(firsts, output_firsts, "input: {input:?}");
    }
}

#[test]
fn test_protected_entries_always_retained() {
    for input in corpus() {
        let protected_in = input.iter().filter(|d| is_protected(d.name())).count();
        let output = remove_duplicates(input.clone()).unwrap();
        let protected_out = output.iter().filter(|d| is_protected(d.name())).count();
        assert_eq!(protected_in, protected_out, "input: {input:?}");
    }
}

#[test]
fn test_unprotected_duplicates_suppressed() {
    for input in corpus() {
        let output = remove_duplicates(input.clone()).unwrap();
        for d in output.iter().filter(|d| !is_protected(d.name())) {
            let key = identity_key(d).unwrap();
            // An unprotected entry may only appear if no earlier entry shares its identity
            let earlier = output
                .iter()
                .take_while(|e| !std::ptr::eq(*e, d))
                .any(|e| identity_key(e).unwrap() == key);
            assert!(!earlier, "duplicate {d:?} survived in {output:?}");
        }
    }
}

#[test]
fn test_declared_stage_without_run_contributes_nothing() {
    let with_b = PipelineRunBuilder::new("release")
        .task("a")
        .task("b")
        .task_run(
            TaskRunBuilder::new("release-a").for_pipeline_task("a").step("s", "reg/a@sha256:a1").build(),
        )
        .build();
    let without_b = PipelineRunBuilder::new("release")
        .task("a")
        .task_run(
            TaskRunBuilder::new("release-a").for_pipeline_task("a").step("s", "reg/a@sha256:a1").build(),
        )
        .build();

    assert_eq!(
        pipeline_run(&with_b, &SlsaConfig::default()).unwrap(),
        pipeline_run(&without_b, &SlsaConfig::default()).unwrap()
    );
}

#[test]
fn test_resolvers_are_pure() {
    let run = TaskRunBuilder::new("build")
        .ref_source("git.example/repo", "sha1", "abc")
        .step("s", "reg/img@sha256:d1")
        .build();
    assert_eq!(task_run(&run).unwrap(), task_run(&run).unwrap());

    // Independent runs resolved concurrently share nothing
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let run = TaskRunBuilder::new(&format!("run-{i}"))
                .step("s", &format!("reg/img{i}@sha256:0{i}"))
                .build();
            std::thread::spawn(move || task_run(&run).unwrap())
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let deps = handle.join().unwrap();
        assert_eq!(deps, vec![rd(None, &format!("oci://reg/img{i}"), &format!("0{i}"))]);
    }
}
