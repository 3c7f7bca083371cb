mod fixtures;

use fixtures::{FailingHandler, StaticEntityHandler, SubsetBatchHandler, org, project};
use flagstone_domain::context::Project;
use flagstone_domain::scope::FeatureStrategy;
use flagstone_flags::{FeatureCheckBatch, FeatureManager};
use std::sync::Arc;

#[test]
fn batch_resolves_subset_and_defaults_the_rest() {
    let mut features = FeatureManager::builder().build();
    features.add("projects:minidump", FeatureStrategy::Internal, false).expect("add");

    let projects = vec![project(1), project(2), project(3)];
    let handler =
        Arc::new(SubsetBatchHandler::new("projects:minidump", vec![(projects[0].id, true)]));
    features.add_handler(handler);

    let acme = org();
    let results = features.has_for_batch("projects:minidump", &acme, &projects, None);

    assert_eq!(results.len(), 3, "exactly one entry per input project");
    assert_eq!(results.get(&projects[0].id), Some(&true));
    assert_eq!(results.get(&projects[1].id), Some(&false));
    assert_eq!(results.get(&projects[2].id), Some(&false));
}

#[test]
fn later_handlers_only_see_pending_projects() {
    let mut features = FeatureManager::builder().build();
    features.add("projects:minidump", FeatureStrategy::Internal, false).expect("add");

    let projects = vec![project(1), project(2)];
    let first =
        Arc::new(SubsetBatchHandler::new("projects:minidump", vec![(projects[0].id, true)]));
    let second =
        Arc::new(SubsetBatchHandler::new("projects:minidump", vec![(projects[0].id, false), (projects[1].id, false)]));
    features.add_handler(first.clone());
    features.add_handler(second.clone());

    let acme = org();
    let results = features.has_for_batch("projects:minidump", &acme, &projects, None);

    // The first handler claimed project 1; the second may only answer for project 2.
    assert_eq!(results.get(&projects[0].id), Some(&true));
    assert_eq!(results.get(&projects[1].id), Some(&false));
    assert_eq!(first.batch_calls(), 1);
    assert_eq!(second.batch_calls(), 1);
}

#[test]
fn batch_stops_early_once_nothing_is_pending() {
    let mut features = FeatureManager::builder().build();
    features.add("projects:minidump", FeatureStrategy::Internal, false).expect("add");

    let projects = vec![project(1)];
    let first =
        Arc::new(SubsetBatchHandler::new("projects:minidump", vec![(projects[0].id, true)]));
    let second = Arc::new(SubsetBatchHandler::new("projects:minidump", vec![]));
    features.add_handler(first);
    features.add_handler(second.clone());

    let acme = org();
    let results = features.has_for_batch("projects:minidump", &acme, &projects, None);

    assert_eq!(results.len(), 1);
    assert_eq!(second.batch_calls(), 0, "no handler runs once the batch is resolved");
}

#[test]
fn batch_subject_is_the_parent_organization() {
    let acme = org();
    let projects = vec![project(1), project(2)];
    let pending: Vec<&Project> = projects.iter().collect();

    let batch = FeatureCheckBatch {
        feature_name: "projects:minidump",
        organization: &acme,
        objects: pending,
        actor: None,
    };

    assert_eq!(batch.subject().id, acme.id);
    assert_eq!(batch.len(), 2);
    assert!(!batch.is_empty());
}

#[test]
fn batch_handler_failure_falls_back_to_defaults() {
    let mut features = FeatureManager::builder().build();
    features.add("projects:minidump", FeatureStrategy::Internal, true).expect("add");
    features.add_handler(Arc::new(FailingHandler::new("projects:minidump")));

    let acme = org();
    let projects = vec![project(1), project(2)];
    let results = features.has_for_batch("projects:minidump", &acme, &projects, None);

    assert_eq!(results.len(), 2);
    assert!(results.values().all(|&flag| flag), "all projects get the static default");
}

#[test]
fn batch_of_unregistered_feature_defaults_to_false() {
    let features = FeatureManager::builder().build();
    let acme = org();
    let projects = vec![project(1), project(2)];

    let results = features.has_for_batch("projects:unknown", &acme, &projects, None);
    assert_eq!(results.len(), 2);
    assert!(results.values().all(|&flag| !flag));
}

#[test]
fn batch_has_is_delegated_to_the_entity_handler() {
    let mut features = FeatureManager::builder().build();
    features.add("organizations:replay", FeatureStrategy::Internal, false).expect("add");
    features.add_entity_handler(Arc::new(StaticEntityHandler::new(Some(true))));

    let acme = org();
    let results = features
        .batch_has(&["organizations:replay"], None, None, Some(&acme))
        .expect("entity handler answers");

    let checks = results.get("organization:1").expect("organization key");
    assert_eq!(checks.get("organizations:replay"), Some(&true));
}

#[test]
fn batch_has_partitions_project_scoped_names() {
    let mut features = FeatureManager::builder().build();
    features.add("projects:minidump", FeatureStrategy::Internal, true).expect("add");

    let projects = vec![project(1), project(2)];
    let results = features
        .batch_has(&["projects:minidump"], None, Some(&projects), None)
        .expect("project partition applies");

    assert_eq!(results.len(), 2);
    assert_eq!(results.get("project:1").and_then(|c| c.get("projects:minidump")), Some(&true));
    assert_eq!(results.get("project:2").and_then(|c| c.get("projects:minidump")), Some(&true));
}

#[test]
fn batch_has_partitions_organization_scoped_names() {
    let mut features = FeatureManager::builder().build();
    features.add("organizations:replay", FeatureStrategy::Internal, true).expect("add");

    let acme = org();
    let results = features
        .batch_has(&["organizations:replay"], None, None, Some(&acme))
        .expect("organization partition applies");

    assert_eq!(
        results.get("organization:1").and_then(|c| c.get("organizations:replay")),
        Some(&true)
    );
}

#[test]
fn batch_has_answers_unscoped_names() {
    let mut features = FeatureManager::builder().build();
    features.add("auth:register", FeatureStrategy::Internal, true).expect("add");

    let results =
        features.batch_has(&["auth:register"], None, None, None).expect("unscoped partition");
    assert_eq!(results.get("unscoped").and_then(|c| c.get("auth:register")), Some(&true));
}

#[test]
fn batch_has_without_applicable_partition_is_none() {
    let mut features = FeatureManager::builder().build();
    features.add("projects:minidump", FeatureStrategy::Internal, true).expect("add");

    // Project-scoped names but no projects supplied.
    assert!(features.batch_has(&["projects:minidump"], None, None, None).is_none());
    assert!(features.batch_has(&[], None, None, None).is_none());
}
