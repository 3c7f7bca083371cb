use flagstone_metrics::FlagMetrics;
use prometheus::Registry;

fn counter_value(registry: &Registry, feature: &str, result: &str) -> f64 {
    registry
        .gather()
        .iter()
        .find(|family| family.get_name() == "feature_has_result_total")
        .map_or(0.0, |family| {
            family
                .get_metric()
                .iter()
                .filter(|metric| {
                    metric.get_label().iter().any(|l| l.get_name() == "feature" && l.get_value() == feature)
                        && metric.get_label().iter().any(|l| l.get_name() == "result" && l.get_value() == result)
                })
                .map(|metric| metric.get_counter().get_value())
                .sum()
        })
}

#[test]
fn result_counter_tracks_outcomes() {
    let registry = Registry::new();
    let metrics = FlagMetrics::new(&registry).expect("metrics");

    metrics.record_result("organizations:replay", true);
    metrics.record_result("organizations:replay", true);
    metrics.record_result("organizations:replay", false);

    assert_eq!(counter_value(&registry, "organizations:replay", "true"), 2.0);
    assert_eq!(counter_value(&registry, "organizations:replay", "false"), 1.0);
}

#[test]
fn duration_timer_observes_on_drop() {
    let registry = Registry::new();
    let metrics = FlagMetrics::new(&registry).expect("metrics");

    let timer = metrics.start_has("projects:minidump");
    drop(timer);

    let sample_count = registry
        .gather()
        .iter()
        .find(|family| family.get_name() == "features_has_duration_seconds")
        .map_or(0, |family| {
            family.get_metric().iter().map(|m| m.get_histogram().get_sample_count()).sum()
        });
    assert_eq!(sample_count, 1);
}

#[test]
fn double_registration_in_same_registry_fails() {
    let registry = Registry::new();
    let _first = FlagMetrics::new(&registry).expect("first registration");
    assert!(FlagMetrics::new(&registry).is_err());
}
