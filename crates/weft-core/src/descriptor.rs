//! Static node metadata, loaded once at startup and never mutated.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Declared shape of one node parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default)]
    pub description: String,
}

impl ParamSpec {
    pub fn new(param_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            param_type: param_type.into(),
            required: false,
            default: None,
            description: description.into(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Declared shape of one node output field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSpec {
    pub description: String,
}

/// Immutable metadata for one registered node type.
///
/// Created at startup, referenced for the lifetime of the process, never
/// mutated (§3 "Node descriptor").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescriptor {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub params: HashMap<String, ParamSpec>,
    #[serde(default)]
    pub outputs: HashMap<String, OutputSpec>,
    /// Whether the node's `execute` emits a stream of partials (vs. a
    /// single terminal result). Observable statically from the descriptor
    /// per §4.3.
    #[serde(default)]
    pub streaming: bool,
    /// Retry policy exposed when this descriptor is surfaced to the agent
    /// loop as a tool (§3 "Agent tool").
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay: f64,
    /// Whether the node body is async (cooperative) or must run on the
    /// blocking worker pool (§4.4).
    #[serde(default)]
    pub is_async: bool,
}

fn default_retry_delay() -> f64 {
    1.0
}

impl NodeDescriptor {
    pub fn new(type_tag: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            name: name.into(),
            description: String::new(),
            params: HashMap::new(),
            outputs: HashMap::new(),
            streaming: false,
            max_retries: 0,
            retry_delay: default_retry_delay(),
            is_async: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, spec: ParamSpec) -> Self {
        self.params.insert(name.into(), spec);
        self
    }

    pub fn with_output(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.outputs.insert(
            name.into(),
            OutputSpec {
                description: description.into(),
            },
        );
        self
    }

    pub fn streaming(mut self) -> Self {
        self.streaming = true;
        self
    }

    pub fn with_retry(mut self, max_retries: u32, retry_delay: f64) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let d = NodeDescriptor::new("double", "Double")
            .with_description("doubles a number")
            .with_param("x", ParamSpec::new("number", "input value").required())
            .with_output("out", "doubled value")
            .with_retry(2, 0.5);

        assert_eq!(d.type_tag, "double");
        assert!(d.params["x"].required);
        assert!(d.outputs.contains_key("out"));
        assert_eq!(d.max_retries, 2);
        assert_eq!(d.retry_delay, 0.5);
    }

    #[test]
    fn defaults_are_non_streaming_async() {
        let d = NodeDescriptor::new("t", "T");
        assert!(!d.streaming);
        assert!(d.is_async);
        assert_eq!(d.max_retries, 0);
    }
}
