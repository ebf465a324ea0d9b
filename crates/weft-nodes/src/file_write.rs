//! Writes a file to disk, grounded on
//! `original_source/src/nodes/file_write.py`: `path` carries
//! `base_path`/`filename`, `content` carries `data`/`encoding` (or is used
//! as a bare string), `mode` selects overwrite vs. append.

use crate::error::NodeError;
use async_trait::async_trait;
use serde_json::{json, Value};
use weft_core::{NodeDescriptor, ParamSpec};
use weft_node::{NodeBody, NodeContext, NodeOutput};

pub struct FileWriteNode;

#[async_trait]
impl NodeBody for FileWriteNode {
    async fn invoke(&self, params: Value, _ctx: &NodeContext) -> Result<NodeOutput, String> {
        let path_info = params
            .get("path")
            .and_then(Value::as_object)
            .ok_or_else(|| NodeError::InvalidParam {
                name: "path".to_string(),
                reason: "must be an object with base_path/filename".to_string(),
            }.to_string())?;

        let base_path = path_info.get("base_path").and_then(Value::as_str).unwrap_or("");
        let filename = path_info
            .get("filename")
            .and_then(Value::as_str)
            .ok_or_else(|| NodeError::MissingParam("path.filename".to_string()).to_string())?;
        let file_path = std::path::Path::new(base_path).join(filename);

        let content_param = params.get("content").cloned().unwrap_or(Value::Null);
        let (content, encoding) = match &content_param {
            Value::Object(map) => (
                map.get("data").and_then(Value::as_str).unwrap_or("").to_string(),
                map.get("encoding").and_then(Value::as_str).unwrap_or("utf-8").to_string(),
            ),
            Value::String(s) => (s.clone(), "utf-8".to_string()),
            other => (other.to_string(), "utf-8".to_string()),
        };

        let append = params
            .get("mode")
            .and_then(Value::as_object)
            .and_then(|m| m.get("type"))
            .and_then(Value::as_str)
            == Some("append");

        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| NodeError::Io(e).to_string())?;
            }
        }

        if append {
            use tokio::io::AsyncWriteExt;
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&file_path)
                .await
                .map_err(|e| NodeError::Io(e).to_string())?;
            file.write_all(content.as_bytes()).await.map_err(|e| NodeError::Io(e).to_string())?;
        } else {
            tokio::fs::write(&file_path, content.as_bytes()).await.map_err(|e| NodeError::Io(e).to_string())?;
        }

        Ok(NodeOutput::terminal(json!({
            "result": "success",
            "path": file_path.to_string_lossy(),
            "bytes_written": content.as_bytes().len(),
            "encoding": encoding,
            "mode": if append { "append" } else { "overwrite" },
        })))
    }
}

pub fn descriptor() -> NodeDescriptor {
    NodeDescriptor::new("file_write", "File Write")
        .with_description("writes text content to a file on disk")
        .with_param("path", ParamSpec::new("object", "base_path/filename").required())
        .with_param("content", ParamSpec::new("object|string", "data/encoding, or a bare string").required())
        .with_param("mode", ParamSpec::new("object", "{type: overwrite|append}"))
        .with_output("result", "\"success\" on completion")
        .with_output("path", "the resolved file path written")
        .with_output("bytes_written", "number of bytes written")
}
