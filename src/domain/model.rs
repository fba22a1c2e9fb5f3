use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::ExportError;

/// 一筆輸入資料：欄位名稱 -> 任意 JSON 值，保留插入順序。
pub type Record = serde_json::Map<String, serde_json::Value>;

/// 使用者提供的表頭：純欄位名，或 `{ name, alias }` 對照。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderEntry {
    Plain(String),
    Aliased { name: String, alias: String },
}

impl HeaderEntry {
    pub fn plain(name: impl Into<String>) -> Self {
        Self::Plain(name.into())
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::Aliased {
            name: name.into(),
            alias: alias.into(),
        }
    }

    /// 來源欄位名
    pub fn name(&self) -> &str {
        match self {
            Self::Plain(name) => name,
            Self::Aliased { name, .. } => name,
        }
    }

    /// 輸出標籤
    pub fn alias(&self) -> &str {
        match self {
            Self::Plain(name) => name,
            Self::Aliased { alias, .. } => alias,
        }
    }
}

/// CLI 形式 `name` 或 `name=alias`
impl FromStr for HeaderEntry {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ExportError::InvalidConfigValueError {
                field: "header".to_string(),
                value: s.to_string(),
                reason: "Header cannot be empty".to_string(),
            });
        }

        match trimmed.split_once('=') {
            Some((name, alias)) => Ok(Self::aliased(name.trim(), alias.trim())),
            None => Ok(Self::plain(trimmed)),
        }
    }
}

/// 正規化後的表頭：兩個等長、索引對齊的序列。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedHeaders {
    pub key_headers: Vec<String>,
    pub alias_headers: Vec<String>,
}

impl NormalizedHeaders {
    pub fn len(&self) -> usize {
        self.key_headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_headers.is_empty()
    }

    /// (來源欄位, 別名) 依表頭順序
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.key_headers
            .iter()
            .zip(self.alias_headers.iter())
            .map(|(key, alias)| (key.as_str(), alias.as_str()))
    }
}

/// Markup renderer 使用的封閉值型別。
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Scalar(String),
    List(Vec<Node>),
    Record(Vec<(String, Node)>),
}

impl Node {
    /// 依欄位名取子節點，找不到回傳 None
    pub fn field(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Record(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn from_records(records: &[Record]) -> Self {
        Node::List(records.iter().map(Node::from_record).collect())
    }

    pub fn from_record(record: &Record) -> Self {
        Node::Record(
            record
                .iter()
                .map(|(key, value)| (key.clone(), Node::from(value)))
                .collect(),
        )
    }
}

impl From<&serde_json::Value> for Node {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Scalar(b.to_string()),
            Value::Number(n) => Node::Scalar(format_number(n)),
            Value::String(s) => Node::Scalar(s.clone()),
            Value::Array(items) => Node::List(items.iter().map(Node::from).collect()),
            Value::Object(map) => Node::from_record(map),
        }
    }
}

/// 數字轉字串：整數保持原樣，浮點數整數值不帶 `.0`
pub fn format_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

/// 支援的輸出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Xls,
    Xlsx,
    Csv,
    Html,
    Xml,
    Json,
    #[serde(alias = "txt")]
    Text,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 7] = [
        ExportFormat::Xls,
        ExportFormat::Xlsx,
        ExportFormat::Csv,
        ExportFormat::Html,
        ExportFormat::Xml,
        ExportFormat::Json,
        ExportFormat::Text,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xls => "xls",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Html => "html",
            ExportFormat::Xml => "xml",
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Xls => "application/vnd.ms-excel",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Html => "text/html;charset=utf-8",
            ExportFormat::Xml => "application/xml;charset=utf-8",
            ExportFormat::Json => "application/json;charset=utf-8",
            ExportFormat::Text => "text/plain;charset=utf-8",
        }
    }

    /// 是否交由 sheet builder 產生
    pub fn is_spreadsheet(&self) -> bool {
        matches!(
            self,
            ExportFormat::Xls | ExportFormat::Xlsx | ExportFormat::Csv | ExportFormat::Html
        )
    }

    pub fn file_name(&self, filename: &str) -> String {
        format!("{}.{}", filename, self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xls" => Ok(ExportFormat::Xls),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            "html" => Ok(ExportFormat::Html),
            "xml" => Ok(ExportFormat::Xml),
            "json" => Ok(ExportFormat::Json),
            "txt" | "text" => Ok(ExportFormat::Text),
            other => Err(ExportError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// 待存檔的內容與 MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl Blob {
    pub fn new(bytes: Vec<u8>, mime_type: &'static str) -> Self {
        Self { bytes, mime_type }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
