use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Workbook write failed: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("XML writer error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Duplicate header alias: {alias}")]
    DuplicateAlias { alias: String },

    #[error("Unsupported export format: {format}")]
    UnsupportedFormat { format: String },
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Data,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ExportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExportError::ConfigError { .. }
            | ExportError::ConfigValidationError { .. }
            | ExportError::InvalidConfigValueError { .. }
            | ExportError::MissingConfigError { .. }
            | ExportError::UnsupportedFormat { .. } => ErrorCategory::Configuration,
            ExportError::ProcessingError { .. }
            | ExportError::ValidationError { .. }
            | ExportError::DuplicateAlias { .. }
            | ExportError::SerializationError(_) => ErrorCategory::Data,
            ExportError::XlsxError(_)
            | ExportError::CsvError(_)
            | ExportError::XmlError(_) => ErrorCategory::Output,
            ExportError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            ExportError::IoError(e) => format!("無法讀寫檔案: {}", e),
            ExportError::DuplicateAlias { alias } => {
                format!("表頭別名 '{}' 重複出現", alias)
            }
            ExportError::UnsupportedFormat { format } => {
                format!("不支援的輸出格式: {}", format)
            }
            ExportError::MissingConfigError { field } => format!("缺少必要設定: {}", field),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ExportError::IoError(_) => "確認輸出目錄存在且具有寫入權限",
            ExportError::DuplicateAlias { .. } => {
                "為每個欄位指定不同的 alias，或改用 overwrite 策略"
            }
            ExportError::UnsupportedFormat { .. } => {
                "可用格式: xls, xlsx, csv, html, xml, json, txt"
            }
            ExportError::SerializationError(_) | ExportError::ValidationError { .. } => {
                "確認輸入檔為 JSON 物件陣列"
            }
            ExportError::XlsxError(_) | ExportError::CsvError(_) | ExportError::XmlError(_) => {
                "檢查資料列數與欄數是否超過試算表限制"
            }
            ExportError::ProcessingError { .. } => "檢查輸入資料內容",
            _ => "檢查設定檔與命令列參數",
        }
    }
}
