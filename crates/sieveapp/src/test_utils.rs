use crate::model::FilterConfig;
use crate::store::FsStore;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

/// Three schools, two of them in Ohio.
pub fn schools() -> Vec<Value> {
    vec![
        json!({
            "name": "Ohio State University",
            "location": "Columbus, OH",
            "division": "D1",
            "verified": true,
            "scholarship": 85,
            "visit_date": "2025-03-14",
            "coach": {"name": "Ryan Day"}
        }),
        json!({
            "name": "University of Michigan",
            "location": "Ann Arbor, MI",
            "division": "D1",
            "verified": true,
            "scholarship": 60,
            "visit_date": "2025-06-02",
            "coach": {"name": "Sherrone Moore"}
        }),
        json!({
            "name": "University of Toledo",
            "location": "Toledo, OH",
            "division": "D2",
            "verified": false,
            "scholarship": 20,
            "visit_date": null,
            "coach": null
        }),
    ]
}

/// Configs for [`schools`]: a name-or-location search plus one filter of most kinds.
pub fn school_configs() -> Vec<FilterConfig> {
    vec![
        FilterConfig::text("search").with_filter_fn(|record, value| {
            let needle = value.as_str().unwrap_or_default().to_lowercase();
            ["name", "location"].iter().any(|key| {
                record
                    .get(*key)
                    .and_then(Value::as_str)
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
            })
        }),
        FilterConfig::multiselect("division")
            .with_default(json!([]))
            .with_option("D1", "Division I")
            .with_option("D2", "Division II")
            .with_option("D3", "Division III"),
        FilterConfig::boolean("verified"),
        FilterConfig::range("scholarship"),
        FilterConfig::date_range("visit_date"),
    ]
}

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// A fresh store over the same directory, as a restarted process would open it.
    pub fn store(&self) -> FsStore {
        FsStore::new(self.root.clone())
    }
}
