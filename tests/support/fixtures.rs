use std::path::{Path, PathBuf};

pub const TRAINING_JSON: &str = r#"{
    "0": {"loss": 1.2, "accuracy": 0.41},
    "1": {"loss": 0.8, "accuracy": 0.63},
    "2": {"loss": 0.5, "accuracy": 0.77}
}"#;

pub const TESTING_JSON: &str = r#"{
    "0": {"loss": 1.3},
    "1": {"loss": 0.9},
    "2": {"loss": 0.7}
}"#;

pub fn write_json(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}
