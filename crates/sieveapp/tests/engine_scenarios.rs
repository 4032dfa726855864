use std::time::Duration;

use serde_json::{json, Value};
use sieveapp::debounce::ManualClock;
use sieveapp::{EngineOptions, FilterConfig, FilterEngine, MemStore};

fn schools() -> Vec<Value> {
    vec![
        json!({"name": "Ohio State University", "location": "Columbus, OH"}),
        json!({"name": "University of Michigan", "location": "Ann Arbor, MI"}),
        json!({"name": "University of Toledo", "location": "Toledo, OH"}),
    ]
}

fn search_config() -> FilterConfig {
    FilterConfig::text("search").with_filter_fn(|record, value| {
        let needle = value.as_str().unwrap_or_default().to_lowercase();
        ["name", "location"].iter().any(|key| {
            record
                .get(*key)
                .and_then(Value::as_str)
                .is_some_and(|s| s.to_lowercase().contains(&needle))
        })
    })
}

fn names(items: &[&Value]) -> Vec<String> {
    items
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

fn recruits() -> Vec<Value> {
    vec![
        json!({"name": "A. Rivera", "position": "QB", "gpa": 3.2, "committed": false, "visited": "2025-02-10", "tags": ["camp"]}),
        json!({"name": "B. Chen", "position": "WR", "gpa": 3.9, "committed": true, "visited": "2025-04-01", "tags": []}),
        json!({"name": "C. Okafor", "position": "LB", "gpa": 2.8, "committed": false, "visited": null, "tags": ["camp", "film"]}),
        json!({"name": "D. Novak", "position": "QB", "gpa": 3.6, "committed": true, "visited": "2025-07-19"}),
    ]
}

fn recruit_configs() -> Vec<FilterConfig> {
    vec![
        FilterConfig::text("name"),
        FilterConfig::select("position"),
        FilterConfig::multiselect("tags").with_default(json!([])),
        FilterConfig::boolean("committed"),
        FilterConfig::range("gpa"),
        FilterConfig::date_range("visited"),
    ]
}

fn recruit_engine() -> FilterEngine<MemStore> {
    FilterEngine::new(
        recruits(),
        recruit_configs(),
        EngineOptions::default().with_persist_state(false),
        MemStore::new(),
    )
}

#[test]
fn school_search_scenario() {
    let mut engine = FilterEngine::new(
        schools(),
        vec![search_config()],
        EngineOptions::default(),
        MemStore::new(),
    );

    engine.set_filter_value("search", json!("OH"));
    assert_eq!(
        names(&engine.filtered_items()),
        vec!["Ohio State University", "University of Toledo"]
    );

    engine.set_filter_value("search", json!(""));
    assert_eq!(engine.filtered_count(), 3);

    engine.set_filter_value("search", json!("Columbus"));
    assert_eq!(names(&engine.filtered_items()), vec!["Ohio State University"]);
}

#[test]
fn empty_values_are_no_ops_for_every_kind() {
    let active = [
        ("name", json!("a.")),
        ("position", json!("QB")),
        ("tags", json!(["camp"])),
        ("committed", json!(false)),
        ("gpa", json!([3.0, 4.0])),
        ("visited", json!(["2025-01-01", "2025-03-01"])),
    ];

    for (field, value) in &active {
        let mut engine = recruit_engine();
        engine.set_filter_value("committed", json!(false));
        let baseline = engine.filtered_indices().to_vec();

        for empty in [Value::Null, json!(""), json!([])] {
            if *field == "committed" {
                continue;
            }
            engine.set_filter_value(field, value.clone());
            engine.set_filter_value(field, empty);
            assert_eq!(
                engine.filtered_indices(),
                baseline.as_slice(),
                "{} should be inactive when emptied",
                field
            );
        }
    }
}

#[test]
fn results_are_the_and_of_each_filter() {
    let settings = [
        ("position", json!("QB")),
        ("committed", json!(true)),
        ("gpa", json!([3.5, 4.0])),
    ];

    let mut combined = recruit_engine();
    let mut expected: Vec<bool> = vec![true; recruits().len()];
    for (field, value) in &settings {
        combined.set_filter_value(field, value.clone());

        let mut single = recruit_engine();
        single.set_filter_value(field, value.clone());
        for (i, record) in recruits().iter().enumerate() {
            expected[i] &= single.passes_filters(record);
        }
    }

    let expected_indices: Vec<usize> = expected
        .iter()
        .enumerate()
        .filter(|(_, keep)| **keep)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(combined.filtered_indices(), expected_indices.as_slice());
    assert_eq!(names(&combined.filtered_items()), vec!["D. Novak"]);
}

#[test]
fn filtered_items_keep_source_order() {
    let mut engine = recruit_engine();
    engine.set_filter_value("tags", json!(["camp"]));
    let indices = engine.filtered_indices();
    assert_eq!(indices, &[0, 2]);
    assert!(indices.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn range_bounds_are_inclusive() {
    let mut engine = recruit_engine();

    engine.set_filter_value("gpa", json!([3.2, 3.6]));
    assert_eq!(names(&engine.filtered_items()), vec!["A. Rivera", "D. Novak"]);

    engine.set_filter_value("gpa", json!([3.3, 3.5]));
    assert_eq!(engine.filtered_count(), 0);
}

#[test]
fn date_range_excludes_missing_dates() {
    let mut engine = recruit_engine();
    engine.set_filter_value("visited", json!(["2025-01-01", "2025-12-31"]));
    assert_eq!(
        names(&engine.filtered_items()),
        vec!["A. Rivera", "B. Chen", "D. Novak"]
    );
}

#[test]
fn active_count_with_one_of_three_set() {
    let configs = vec![
        FilterConfig::text("name"),
        FilterConfig::select("position"),
        FilterConfig::multiselect("tags").with_default(json!([])),
    ];
    let mut engine = FilterEngine::new(
        recruits(),
        configs,
        EngineOptions::default(),
        MemStore::new(),
    );
    engine.set_filter_value("position", json!("WR"));

    assert_eq!(engine.active_filter_count(), 1);
    assert!(engine.has_active_filters());
}

#[test]
fn preset_round_trip_is_deep_equal() {
    let mut engine = recruit_engine();
    engine.set_filter_value("position", json!("QB"));
    engine.set_filter_value("gpa", json!([3.0, 4.0]));
    let snapshot = engine.filter_values_raw();

    let preset = engine.save_preset("QBs over 3.0", None);
    engine.clear_filters();
    assert!(!engine.has_active_filters());

    assert!(engine.load_preset(&preset.id));
    assert_eq!(engine.filter_values(), &snapshot);
    assert_eq!(engine.active_preset_id(), Some(preset.id.as_str()));
}

#[test]
fn debounce_applies_only_the_last_value() {
    let clock = ManualClock::new();
    let options = EngineOptions::default()
        .with_persist_state(false)
        .with_debounce(Duration::from_millis(100))
        .with_clock(clock.clone());
    let mut engine = FilterEngine::new(recruits(), recruit_configs(), options, MemStore::new());

    engine.set_filter_value("position", json!("QB"));
    clock.advance(Duration::from_millis(25));
    engine.set_filter_value("position", json!("WR"));
    clock.advance(Duration::from_millis(25));
    engine.set_filter_value("position", json!("LB"));

    assert_eq!(engine.flush_due(), 0);
    assert_eq!(engine.filtered_count(), 4);

    clock.advance(Duration::from_millis(100));
    assert_eq!(engine.flush_due(), 1);
    assert_eq!(engine.filter_value("position"), Some(&json!("LB")));
    assert_eq!(names(&engine.filtered_items()), vec!["C. Okafor"]);
    assert_eq!(engine.flush_due(), 0);
}

#[test]
fn engines_do_not_share_debounce_state() {
    let clock = ManualClock::new();
    let options = || {
        EngineOptions::default()
            .with_persist_state(false)
            .with_debounce(Duration::from_millis(100))
            .with_clock(clock.clone())
    };
    let mut first = FilterEngine::new(recruits(), recruit_configs(), options(), MemStore::new());
    let mut second = FilterEngine::new(recruits(), recruit_configs(), options(), MemStore::new());

    first.set_filter_value("position", json!("QB"));
    second.set_filter_value("position", json!("WR"));
    clock.advance(Duration::from_millis(150));

    first.flush_due();
    assert_eq!(first.filtered_count(), 2);
    assert_eq!(second.filtered_count(), 4);
    second.flush_due();
    assert_eq!(names(&second.filtered_items()), vec!["B. Chen"]);
}
