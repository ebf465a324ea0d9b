//! Parameter resolver (§4.2): recursive `$ref` substitution over nested
//! maps and lists, with single-expression (structure-preserving) and
//! embedded-expression (string-substitution) forms.

use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::OnceLock;
use weft_core::{Progress, ResolutionError};

fn embedded_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$[A-Za-z0-9_]+\.[A-Za-z0-9_]+").unwrap())
}

/// Resolve a node's declared `params` object against the current
/// `progress` map and an optional per-iteration `context` (§4.2).
pub fn resolve_params(
    params: &HashMap<String, Value>,
    progress: &Progress,
    context: &HashMap<String, Value>,
) -> Result<HashMap<String, Value>, ResolutionError> {
    let mut resolved = HashMap::with_capacity(params.len());
    for (key, value) in params {
        resolved.insert(key.clone(), resolve_value(value, progress, context)?);
    }
    Ok(resolved)
}

fn resolve_value(
    value: &Value,
    progress: &Progress,
    context: &HashMap<String, Value>,
) -> Result<Value, ResolutionError> {
    match value {
        Value::String(s) => resolve_string(s, progress, context),
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.clone(), resolve_value(v, progress, context)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(resolve_value(item, progress, context)?);
            }
            Ok(Value::Array(out))
        }
        other => Ok(other.clone()),
    }
}

fn is_single_expression(s: &str) -> bool {
    s.starts_with('$') && s.contains('.') && !s.contains(' ')
}

fn resolve_string(
    s: &str,
    progress: &Progress,
    context: &HashMap<String, Value>,
) -> Result<Value, ResolutionError> {
    if is_single_expression(s) {
        let (root, path) = split_ref(&s[1..]);
        return resolve_path(root, &path, progress, context);
    }
    if s.contains('$') {
        return Ok(Value::String(substitute_embedded(s, progress, context)?));
    }
    Ok(Value::String(s.to_string()))
}

fn split_ref(ref_path: &str) -> (&str, Vec<&str>) {
    let mut parts = ref_path.split('.');
    let root = parts.next().unwrap_or_default();
    (root, parts.collect())
}

/// Look up `root` first in `context`, then in `progress`; step into the
/// rest of the path by map key or array index.
fn resolve_path(
    root: &str,
    path: &[&str],
    progress: &Progress,
    context: &HashMap<String, Value>,
) -> Result<Value, ResolutionError> {
    let mut current = if let Some(v) = context.get(root) {
        v.clone()
    } else {
        let result = progress
            .get(root)
            .ok_or_else(|| ResolutionError::UnresolvedRef(root.to_string()))?;
        result
            .data
            .clone()
            .ok_or_else(|| ResolutionError::NoData(root.to_string()))?
    };

    for segment in path {
        current = step_into(&current, segment)?;
    }
    Ok(current)
}

fn step_into(current: &Value, segment: &str) -> Result<Value, ResolutionError> {
    match current {
        Value::Object(map) => map
            .get(segment)
            .cloned()
            .ok_or_else(|| ResolutionError::MissingField(segment.to_string())),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|idx| items.get(idx).cloned())
            .ok_or_else(|| ResolutionError::MissingField(segment.to_string())),
        _ => Err(ResolutionError::MissingField(segment.to_string())),
    }
}

fn substitute_embedded(
    s: &str,
    progress: &Progress,
    context: &HashMap<String, Value>,
) -> Result<String, ResolutionError> {
    let mut err: Option<ResolutionError> = None;
    let replaced = embedded_pattern().replace_all(s, |caps: &regex::Captures| {
        let matched = &caps[0];
        let (root, path) = split_ref(&matched[1..]);
        match resolve_path(root, &path, progress, context) {
            Ok(value) => stringify(&value),
            Err(e) => {
                if err.is_none() {
                    err = Some(e);
                }
                String::new()
            }
        }
    });
    if let Some(e) = err {
        return Err(e);
    }
    Ok(replaced.into_owned())
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
