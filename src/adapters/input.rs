use crate::domain::model::Record;
use crate::utils::error::{ExportError, Result};
use serde_json::Value;
use std::path::Path;

/// 讀取 JSON 物件陣列作為匯出來源
pub async fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    tracing::debug!("Reading records from {}", path.display());

    let content = tokio::fs::read(path).await?;
    records_from_slice(&content)
}

pub fn records_from_slice(content: &[u8]) -> Result<Vec<Record>> {
    match serde_json::from_slice::<Value>(content)? {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(ExportError::ValidationError {
                    message: format!(
                        "Element {} is not an object (found {})",
                        index,
                        value_kind(&other)
                    ),
                }),
            })
            .collect(),
        other => Err(ExportError::ValidationError {
            message: format!("Expected a JSON array of objects, found {}", value_kind(&other)),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
