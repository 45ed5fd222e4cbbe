// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration files on disk.

use loom_sdk::config::MAX_KEY_CODE_LIMIT;
use loom_sdk::{ConfigError, FontConfig, LoomConfig};
use std::path::PathBuf;

#[test]
fn config_survives_a_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loom.json");

    let mut config = LoomConfig::default();
    config.window.title = "Orbit".to_string();
    config.clear_color = [0.2, 0.3, 0.4, 1.0];
    config.fonts.push(FontConfig {
        name: "mono".to_string(),
        path: PathBuf::from("fonts/mono.ttf"),
        monospace: true,
        scale: 1.25,
    });
    config.to_file(&path).unwrap();

    let loaded = LoomConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = LoomConfig::load_or_default(dir.path().join("absent.json")).unwrap();
    assert_eq!(config, LoomConfig::default());
}

#[test]
fn unreadable_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = LoomConfig::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn invalid_file_is_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loom.json");
    std::fs::write(&path, r#"{ "window": { "height": 0 } }"#).unwrap();

    let err = LoomConfig::load_or_default(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("zero dimension"));
}

#[test]
fn key_table_range_is_bounded() {
    for code in [100, 347, MAX_KEY_CODE_LIMIT + 1, i32::MAX] {
        let json = format!(r#"{{ "max_key_code": {code} }}"#);
        let err = LoomConfig::from_json(&json).unwrap_err();
        assert!(
            matches!(&err, ConfigError::Invalid(msg) if msg.contains("max_key_code")),
            "{code}: {err}"
        );
    }

    for code in [348, MAX_KEY_CODE_LIMIT] {
        let json = format!(r#"{{ "max_key_code": {code} }}"#);
        assert_eq!(LoomConfig::from_json(&json).unwrap().max_key_code, code);
    }
}
