use crate::core::exporter::ExportOptions;
use crate::domain::model::ExportFormat;
use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub export: ExportSection,
    #[serde(default)]
    pub options: ExportOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSection {
    pub input: Option<String>,
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default)]
    pub formats: Vec<ExportFormat>,
}

fn default_filename() -> String {
    "export".to_string()
}

fn default_output_path() -> String {
    "./output".to_string()
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            input: None,
            filename: default_filename(),
            output_path: default_output_path(),
            formats: Vec::new(),
        }
    }
}

impl ExportConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExportError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn input(&self) -> Result<&str> {
        validation::validate_required_field("export.input", &self.export.input).map(String::as_str)
    }
}

impl Validate for ExportConfig {
    fn validate(&self) -> Result<()> {
        if let Some(input) = &self.export.input {
            validation::validate_path("export.input", input)?;
        }
        validation::validate_filename("export.filename", &self.export.filename)?;
        validation::validate_path("export.output_path", &self.export.output_path)?;
        validation::validate_formats("export.formats", &self.export.formats)?;

        if let Some(date_format) = &self.options.sheet.date_format {
            validation::validate_non_empty_string("options.sheet.date_format", date_format)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::headers::DuplicateAliasPolicy;
    use crate::domain::model::HeaderEntry;

    const SAMPLE: &str = r#"
[export]
input = "people.json"
filename = "people"
output_path = "./out"
formats = ["xlsx", "xml", "txt"]

[options]
headers = ["id", { name = "name", alias = "Name" }]
duplicate_aliases = "reject"

[options.sheet]
cell_dates = true
date_format = "dd/mm/yyyy"

[options.markup]
escape_attributes = true
"#;

    #[test]
    fn test_parse_full_config() {
        let config = ExportConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.input().unwrap(), "people.json");
        assert_eq!(
            config.export.formats,
            vec![ExportFormat::Xlsx, ExportFormat::Xml, ExportFormat::Text]
        );
        assert_eq!(
            config.options.headers,
            Some(vec![
                HeaderEntry::plain("id"),
                HeaderEntry::aliased("name", "Name")
            ])
        );
        assert_eq!(config.options.duplicate_aliases, DuplicateAliasPolicy::Reject);
        assert!(config.options.sheet.cell_dates);
        assert!(!config.options.sheet.sheet_stubs);
        assert!(config.options.markup.escape_attributes);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_and_validation() {
        let config = ExportConfig::from_toml_str("[export]\n").unwrap();
        assert_eq!(config.export.filename, "export");
        assert_eq!(config.export.output_path, "./output");
        assert!(config.options.headers.is_none());
        assert!(config.input().is_err());
        // 至少要一種格式
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("RECORD_EXPORT_TEST_DIR", "/tmp/exports");
        let config = ExportConfig::from_toml_str(
            "[export]\noutput_path = \"${RECORD_EXPORT_TEST_DIR}\"\nformats = [\"json\"]\n",
        )
        .unwrap();
        assert_eq!(config.export.output_path, "/tmp/exports");

        let untouched = ExportConfig::from_toml_str(
            "[export]\noutput_path = \"${RECORD_EXPORT_UNSET_VAR}\"\n",
        )
        .unwrap();
        assert_eq!(untouched.export.output_path, "${RECORD_EXPORT_UNSET_VAR}");
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result = ExportConfig::from_toml_str("[export]\nformats = [\"pdf\"]\n");
        assert!(matches!(
            result,
            Err(ExportError::ConfigValidationError { .. })
        ));
    }
}
