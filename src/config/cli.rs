use crate::config::toml_config::{ExportConfig, ExportSection};
use crate::core::exporter::ExportOptions;
use crate::core::headers::DuplicateAliasPolicy;
use crate::domain::model::{ExportFormat, HeaderEntry};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "record-export")]
#[command(about = "Export a JSON array of records to spreadsheet, markup and text formats")]
pub struct CliConfig {
    /// JSON file containing an array of objects
    #[arg(short, long)]
    pub input: Option<String>,

    /// TOML configuration file; flags below override its values
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output formats (xls, xlsx, csv, html, xml, json, txt)
    #[arg(short, long, value_delimiter = ',')]
    pub format: Vec<ExportFormat>,

    /// File name without extension
    #[arg(long)]
    pub filename: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    /// Header as `name` or `name=alias`; repeat to keep order
    #[arg(long = "header")]
    pub headers: Vec<HeaderEntry>,

    /// Escape alias values written into XML attributes
    #[arg(long)]
    pub escape_attributes: bool,

    /// Fail when two headers share an alias
    #[arg(long)]
    pub reject_duplicate_aliases: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 載入 TOML (若有) 後套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<ExportConfig> {
        let mut config = match &self.config {
            Some(path) => ExportConfig::from_file(path)?,
            None => ExportConfig {
                export: ExportSection::default(),
                options: ExportOptions::default(),
            },
        };

        if let Some(input) = &self.input {
            config.export.input = Some(input.clone());
        }
        if let Some(filename) = &self.filename {
            config.export.filename = filename.clone();
        }
        if let Some(output_path) = &self.output_path {
            config.export.output_path = output_path.clone();
        }
        if !self.format.is_empty() {
            config.export.formats = self.format.clone();
        }
        if !self.headers.is_empty() {
            config.options.headers = Some(self.headers.clone());
        }
        if self.escape_attributes {
            config.options.markup.escape_attributes = true;
        }
        if self.reject_duplicate_aliases {
            config.options.duplicate_aliases = DuplicateAliasPolicy::Reject;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = CliConfig::parse_from([
            "record-export",
            "--input",
            "data.json",
            "--format",
            "xml,json",
            "--header",
            "id=ID",
            "--header",
            "name",
            "--reject-duplicate-aliases",
        ]);

        let config = cli.resolve().unwrap();
        assert_eq!(config.export.input.as_deref(), Some("data.json"));
        assert_eq!(config.export.formats, vec![ExportFormat::Xml, ExportFormat::Json]);
        assert_eq!(
            config.options.headers,
            Some(vec![HeaderEntry::aliased("id", "ID"), HeaderEntry::plain("name")])
        );
        assert_eq!(config.options.duplicate_aliases, DuplicateAliasPolicy::Reject);
        assert_eq!(config.export.filename, "export");
    }

    #[test]
    fn test_missing_format_fails_validation() {
        let cli = CliConfig::parse_from(["record-export", "--input", "data.json"]);
        assert!(cli.resolve().is_err());
    }

    #[test]
    fn test_bad_format_rejected_by_parser() {
        let result = CliConfig::try_parse_from(["record-export", "--format", "pdf"]);
        assert!(result.is_err());
    }
}
