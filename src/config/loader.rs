//! Configuration loading and environment parsing.

use super::Config;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load configuration with the following precedence (highest first):
/// 1) `ROOM_RELAY_CONFIG_JSON` env var containing raw JSON
/// 2) File pointed to by `ROOM_RELAY_CONFIG_PATH`
/// 3) config.json in the current working directory
/// 4) Defaults compiled into the binary
///
/// Individual fields can additionally be overridden by environment variables
/// with the `ROOM_RELAY__` prefix and `__` as a nested separator, e.g.
/// `ROOM_RELAY__PORT=8080` or `ROOM_RELAY__LOGGING__LEVEL=debug`.
/// Errors while reading or parsing are printed to stderr and the affected
/// source is skipped — `load()` always returns a usable `Config`.
#[must_use]
pub fn load() -> Config {
    let defaults = Config::default();
    let mut merged =
        serde_json::to_value(&defaults).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

    if let Ok(json) = std::env::var("ROOM_RELAY_CONFIG_JSON") {
        if let Some(value) = parse_json_document(&json, "ROOM_RELAY_CONFIG_JSON") {
            merge_values(&mut merged, value);
        }
    }

    if let Ok(path) = std::env::var("ROOM_RELAY_CONFIG_PATH") {
        merge_file_source(&mut merged, Path::new(&path));
    }

    merge_file_source(&mut merged, Path::new("config.json"));

    apply_env_overrides(&mut merged);

    match serde_json::from_value::<Config>(merged) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to deserialize config; using defaults: {e}");
            defaults
        }
    }
}

fn parse_json_document(raw: &str, label: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }

    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            eprintln!("Failed to parse config from {label}: {err}");
            None
        }
    }
}

fn merge_file_source(target: &mut Value, path: &Path) {
    if path.as_os_str().is_empty() || !path.exists() {
        return;
    }

    match fs::read_to_string(path) {
        Ok(contents) => {
            if let Some(value) = parse_json_document(&contents, &format!("file {}", path.display()))
            {
                merge_values(target, value);
            }
        }
        Err(err) => {
            eprintln!("Failed to read config from {}: {}", path.display(), err);
        }
    }
}

fn merge_values(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, value) in source_map {
                match target_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (target_slot, source_value) => {
            *target_slot = source_value;
        }
    }
}

fn apply_env_overrides(root: &mut Value) {
    for (key, raw_value) in std::env::vars() {
        let Some(stripped) = key.strip_prefix("ROOM_RELAY__") else {
            continue;
        };

        let segments: Vec<String> = stripped
            .split("__")
            .filter(|segment| !segment.is_empty())
            .map(str::to_ascii_lowercase)
            .collect();

        if segments.is_empty() {
            continue;
        }

        // Bare scalars parse as JSON where possible, otherwise as strings.
        let value =
            serde_json::from_str(raw_value.trim()).unwrap_or(Value::String(raw_value.clone()));
        set_nested_value(root, &segments, value);
    }
}

fn set_nested_value(target: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *target = value;
        return;
    };

    let map = match target {
        Value::Object(map) => map,
        other => {
            *other = Value::Object(serde_json::Map::new());
            match other {
                Value::Object(map) => map,
                // Just assigned an object above.
                _ => return,
            }
        }
    };

    if rest.is_empty() {
        map.insert(head.clone(), value);
        return;
    }

    let entry = map
        .entry(head.clone())
        .or_insert_with(|| Value::Object(serde_json::Map::new()));
    set_nested_value(entry, rest, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_overlays_nested_objects() {
        let mut base = json!({"port": 4444, "server": {"max_message_size": 1024}});
        merge_values(
            &mut base,
            json!({"server": {"outbound_queue_capacity": 16}, "port": 9000}),
        );

        assert_eq!(base["port"], 9000);
        assert_eq!(base["server"]["max_message_size"], 1024);
        assert_eq!(base["server"]["outbound_queue_capacity"], 16);
    }

    #[test]
    fn set_nested_value_builds_intermediate_objects() {
        let mut root = json!({});
        set_nested_value(
            &mut root,
            &["logging".to_string(), "level".to_string()],
            json!("debug"),
        );
        assert_eq!(root["logging"]["level"], "debug");
    }

    #[test]
    fn empty_json_document_is_skipped() {
        assert!(parse_json_document("   ", "test").is_none());
        assert!(parse_json_document("not json", "test").is_none());
        assert!(parse_json_document(r#"{"port": 1}"#, "test").is_some());
    }
}
