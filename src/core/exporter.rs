use crate::core::headers::{apply_alias_policy, normalize_headers, DuplicateAliasPolicy};
use crate::core::markup::{render_with, MarkupOptions};
use crate::core::reshape::{to_keyed_records, to_rows};
use crate::core::sheet::{aoa_to_sheet, json_to_sheet, SheetOptions};
use crate::core::workbook::write_book;
use crate::domain::model::{Blob, ExportFormat, HeaderEntry, NormalizedHeaders, Record};
use crate::domain::ports::Saver;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// 每次匯出的選項
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub headers: Option<Vec<HeaderEntry>>,
    pub sheet: SheetOptions,
    pub markup: MarkupOptions,
    pub duplicate_aliases: DuplicateAliasPolicy,
}

impl ExportOptions {
    pub fn with_headers(headers: Vec<HeaderEntry>) -> Self {
        Self {
            headers: Some(headers),
            ..Default::default()
        }
    }

    fn normalized_headers(&self) -> Result<NormalizedHeaders> {
        let headers = normalize_headers(self.headers.as_deref());
        apply_alias_policy(&headers, self.duplicate_aliases)?;
        Ok(headers)
    }
}

/// 產生指定格式的內容，不做任何 I/O
pub fn encode(
    format: ExportFormat,
    records: &[Record],
    filename: &str,
    options: &ExportOptions,
) -> Result<Blob> {
    let headers = options.normalized_headers()?;

    let bytes = match format {
        ExportFormat::Xls | ExportFormat::Xlsx | ExportFormat::Csv | ExportFormat::Html => {
            let sheet = if headers.is_empty() {
                json_to_sheet(records, &options.sheet)
            } else {
                aoa_to_sheet(&to_rows(records, &headers), &options.sheet)
            };
            write_book(&sheet, format, &options.sheet, filename)?
        }
        ExportFormat::Xml => render_with(records, &headers, &options.markup).into_bytes(),
        ExportFormat::Json => {
            serde_json::to_string_pretty(&*reshape(records, &headers))?.into_bytes()
        }
        ExportFormat::Text => to_json_lines(&reshape(records, &headers))?.into_bytes(),
    };

    Ok(Blob::new(bytes, format.mime_type()))
}

fn reshape<'a>(records: &'a [Record], headers: &NormalizedHeaders) -> Cow<'a, [Record]> {
    if headers.is_empty() {
        Cow::Borrowed(records)
    } else {
        Cow::Owned(to_keyed_records(records, headers))
    }
}

/// 每筆記錄一行精簡 JSON，每行皆以換行結尾
pub fn to_json_lines(records: &[Record]) -> Result<String> {
    let mut text = String::new();
    for record in records {
        text.push_str(&serde_json::to_string(record)?);
        text.push('\n');
    }
    Ok(text)
}

/// 編碼後交給 `Saver` 存成 `<filename>.<ext>`
pub struct Exporter<S: Saver> {
    saver: S,
}

impl<S: Saver> Exporter<S> {
    pub fn new(saver: S) -> Self {
        Self { saver }
    }

    pub fn saver(&self) -> &S {
        &self.saver
    }

    /// 回傳存檔使用的檔名
    pub async fn export(
        &self,
        format: ExportFormat,
        records: &[Record],
        filename: &str,
        options: &ExportOptions,
    ) -> Result<String> {
        tracing::debug!("Encoding {} records as {}", records.len(), format);
        let blob = encode(format, records, filename, options)?;

        let target = format.file_name(filename);
        tracing::debug!("Saving {} ({} bytes, {})", target, blob.len(), blob.mime_type);
        self.saver.save(&blob, &target).await?;

        tracing::info!("Exported {} records to {}", records.len(), target);
        Ok(target)
    }

    pub async fn to_xls(
        &self,
        records: &[Record],
        filename: &str,
        options: &ExportOptions,
    ) -> Result<String> {
        self.export(ExportFormat::Xls, records, filename, options).await
    }

    pub async fn to_xlsx(
        &self,
        records: &[Record],
        filename: &str,
        options: &ExportOptions,
    ) -> Result<String> {
        self.export(ExportFormat::Xlsx, records, filename, options).await
    }

    pub async fn to_csv(
        &self,
        records: &[Record],
        filename: &str,
        options: &ExportOptions,
    ) -> Result<String> {
        self.export(ExportFormat::Csv, records, filename, options).await
    }

    pub async fn to_html(
        &self,
        records: &[Record],
        filename: &str,
        options: &ExportOptions,
    ) -> Result<String> {
        self.export(ExportFormat::Html, records, filename, options).await
    }

    pub async fn to_xml(
        &self,
        records: &[Record],
        filename: &str,
        options: &ExportOptions,
    ) -> Result<String> {
        self.export(ExportFormat::Xml, records, filename, options).await
    }

    pub async fn to_json(
        &self,
        records: &[Record],
        filename: &str,
        options: &ExportOptions,
    ) -> Result<String> {
        self.export(ExportFormat::Json, records, filename, options).await
    }

    pub async fn to_text(
        &self,
        records: &[Record],
        filename: &str,
        options: &ExportOptions,
    ) -> Result<String> {
        self.export(ExportFormat::Text, records, filename, options).await
    }
}
