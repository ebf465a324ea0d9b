//! YAML configuration loading with `$include` composition and
//! `${ENV:default}` expansion (§6 "Configuration surface"). Adapted from
//! `orchestrator::config::loader`.

use crate::error::{Result, ToolingError};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use std::env;
use std::path::Path;

/// Loads a YAML file, resolving `$include` directives relative to the
/// file's own directory and expanding `${ENV:default}` references.
pub fn load_yaml_file<P: AsRef<Path>>(path: P) -> Result<YamlValue> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let mut value: YamlValue = serde_yaml::from_str(&content)?;

    let base_dir = path
        .parent()
        .ok_or_else(|| ToolingError::General(format!("invalid config path: {path:?}")))?;

    process_includes(&mut value, base_dir)?;
    expand_variables(&mut value);
    Ok(value)
}

/// Loads a YAML file and deserializes it into `T`.
pub fn load_yaml_config<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let yaml = load_yaml_file(path)?;
    let json = yaml_to_json(&yaml)?;
    Ok(serde_json::from_value(json)?)
}

fn process_includes(value: &mut YamlValue, base_dir: &Path) -> Result<()> {
    match value {
        YamlValue::Mapping(map) => {
            if let Some(YamlValue::String(include_path)) = map.get(&YamlValue::String("$include".to_string())) {
                let included = load_yaml_file(base_dir.join(include_path))?;
                *value = included;
                return Ok(());
            }
            for (_, v) in map.iter_mut() {
                process_includes(v, base_dir)?;
            }
        }
        YamlValue::Sequence(seq) => {
            for item in seq.iter_mut() {
                process_includes(item, base_dir)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn expand_variables(value: &mut YamlValue) {
    match value {
        YamlValue::String(s) => {
            if let Some(expanded) = expand_env_in_string(s) {
                *s = expanded;
            }
        }
        YamlValue::Mapping(map) => {
            for (_, v) in map.iter_mut() {
                expand_variables(v);
            }
        }
        YamlValue::Sequence(seq) => {
            for item in seq.iter_mut() {
                expand_variables(item);
            }
        }
        _ => {}
    }
}

/// Expands every `${VAR}` / `${VAR:default}` reference in `s`, preferring
/// the live environment value and falling back to the declared default.
fn expand_env_in_string(s: &str) -> Option<String> {
    if !s.contains("${") {
        return None;
    }
    let re = regex::Regex::new(r"\$\{([^:}]+)(?::([^}]*))?\}").ok()?;
    let mut result = s.to_string();
    for cap in re.captures_iter(s) {
        let full_match = cap.get(0)?.as_str();
        let var_name = cap.get(1)?.as_str();
        let default_value = cap.get(2).map(|m| m.as_str()).unwrap_or("");
        let value = env::var(var_name).unwrap_or_else(|_| default_value.to_string());
        result = result.replace(full_match, &value);
    }
    Some(result)
}

fn yaml_to_json(yaml: &YamlValue) -> Result<JsonValue> {
    match yaml {
        YamlValue::Null => Ok(JsonValue::Null),
        YamlValue::Bool(b) => Ok(JsonValue::Bool(*b)),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(JsonValue::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(JsonValue::Number(u.into()))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(JsonValue::Number)
                    .ok_or_else(|| ToolingError::General(format!("invalid number: {f}")))
            } else {
                Err(ToolingError::General("invalid number".to_string()))
            }
        }
        YamlValue::String(s) => Ok(JsonValue::String(s.clone())),
        YamlValue::Sequence(seq) => Ok(JsonValue::Array(
            seq.iter().map(yaml_to_json).collect::<Result<Vec<_>>>()?,
        )),
        YamlValue::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    YamlValue::String(s) => s.clone(),
                    _ => return Err(ToolingError::General("map keys must be strings".to_string())),
                };
                json_map.insert(key, yaml_to_json(v)?);
            }
            Ok(JsonValue::Object(json_map))
        }
        YamlValue::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}
