//! Arithmetic node plug-ins used by the diamond-dependency scenario
//! (§8 P1), grounded on `original_source/src/nodes/multiply.py`'s
//! `float(params["num1"]) * float(params["num2"])` shape, generalized to
//! the three operations the scenario exercises.

use crate::error::NodeError;
use async_trait::async_trait;
use serde_json::{json, Value};
use weft_core::{NodeDescriptor, ParamSpec};
use weft_node::{NodeBody, NodeContext, NodeOutput};

fn require_number(params: &Value, name: &str) -> Result<f64, String> {
    params
        .get(name)
        .and_then(Value::as_f64)
        .ok_or_else(|| NodeError::MissingParam(name.to_string()).to_string())
}

pub struct DoubleNode;

#[async_trait]
impl NodeBody for DoubleNode {
    async fn invoke(&self, params: Value, _ctx: &NodeContext) -> Result<NodeOutput, String> {
        let x = require_number(&params, "x")?;
        Ok(NodeOutput::terminal(json!({ "value": x * 2.0 })))
    }
}

pub fn double_descriptor() -> NodeDescriptor {
    NodeDescriptor::new("double", "Double")
        .with_description("doubles a numeric input")
        .with_param("x", ParamSpec::new("number", "value to double").required())
        .with_output("value", "the doubled result")
}

pub struct TripleNode;

#[async_trait]
impl NodeBody for TripleNode {
    async fn invoke(&self, params: Value, _ctx: &NodeContext) -> Result<NodeOutput, String> {
        let x = require_number(&params, "x")?;
        Ok(NodeOutput::terminal(json!({ "value": x * 3.0 })))
    }
}

pub fn triple_descriptor() -> NodeDescriptor {
    NodeDescriptor::new("triple", "Triple")
        .with_description("triples a numeric input")
        .with_param("x", ParamSpec::new("number", "value to triple").required())
        .with_output("value", "the tripled result")
}

pub struct SumNode;

#[async_trait]
impl NodeBody for SumNode {
    async fn invoke(&self, params: Value, _ctx: &NodeContext) -> Result<NodeOutput, String> {
        let a = require_number(&params, "a")?;
        let b = require_number(&params, "b")?;
        Ok(NodeOutput::terminal(json!({ "value": a + b })))
    }
}

pub fn sum_descriptor() -> NodeDescriptor {
    NodeDescriptor::new("sum", "Sum")
        .with_description("adds two numeric inputs")
        .with_param("a", ParamSpec::new("number", "first addend").required())
        .with_param("b", ParamSpec::new("number", "second addend").required())
        .with_output("value", "the sum")
}
