use anyhow::Result;
use record_export::{
    encode, DuplicateAliasPolicy, ExportError, ExportFormat, ExportOptions, Exporter, HeaderEntry,
    LocalSaver, Record, SheetOptions,
};
use serde_json::{json, Value};
use tempfile::TempDir;

fn people() -> Vec<Record> {
    json!([
        {"id": 1, "name": "Ann"},
        {"id": 2, "name": "Bo"}
    ])
    .as_array()
    .into_iter()
    .flatten()
    .filter_map(|v| v.as_object().cloned())
    .collect()
}

fn aliased() -> ExportOptions {
    ExportOptions::with_headers(vec![
        HeaderEntry::aliased("id", "ID"),
        HeaderEntry::aliased("name", "Name"),
    ])
}

/// JSON 匯出：縮排兩格，內容套用別名
#[tokio::test]
async fn test_json_export_with_aliases() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let exporter = Exporter::new(LocalSaver::new(temp_dir.path()));

    let name = exporter.to_json(&people(), "people", &aliased()).await?;
    assert_eq!(name, "people.json");

    let content = tokio::fs::read_to_string(temp_dir.path().join("people.json")).await?;
    assert!(content.contains("\n  {\n    \"ID\": 1,\n    \"Name\": \"Ann\"\n  }"));

    let parsed: Value = serde_json::from_str(&content)?;
    assert_eq!(parsed, json!([{"ID": 1, "Name": "Ann"}, {"ID": 2, "Name": "Bo"}]));
    Ok(())
}

/// 每筆一行，行數等於記錄數且每行皆有換行
#[tokio::test]
async fn test_text_export_one_line_per_record() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let exporter = Exporter::new(LocalSaver::new(temp_dir.path()));
    let data = people();

    exporter.to_text(&data, "people", &aliased()).await?;

    let content = tokio::fs::read_to_string(temp_dir.path().join("people.txt")).await?;
    assert!(content.ends_with('\n'));
    assert_eq!(content.matches('\n').count(), data.len());

    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), data.len());
    assert_eq!(lines[0], r#"{"ID":1,"Name":"Ann"}"#);
    for line in lines {
        let value: Value = serde_json::from_str(line)?;
        assert!(value.is_object());
    }
    Ok(())
}

#[tokio::test]
async fn test_xml_export_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let exporter = Exporter::new(LocalSaver::new(temp_dir.path()));

    exporter.to_xml(&people(), "people", &aliased()).await?;

    let content = tokio::fs::read_to_string(temp_dir.path().join("people.xml")).await?;
    assert!(content.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rows>"));
    assert_eq!(content.matches("  <row>").count(), 2);
    assert!(content.contains(r#"<id name="ID">2</id>"#));
    Ok(())
}

#[tokio::test]
async fn test_spreadsheet_exports() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let exporter = Exporter::new(LocalSaver::new(temp_dir.path()));
    let data = people();

    exporter.to_xlsx(&data, "people", &aliased()).await?;
    let xlsx = tokio::fs::read(temp_dir.path().join("people.xlsx")).await?;
    assert_eq!(&xlsx[0..2], b"PK");

    exporter.to_csv(&data, "people", &aliased()).await?;
    let csv = tokio::fs::read_to_string(temp_dir.path().join("people.csv")).await?;
    assert_eq!(csv, "ID,Name\n1,Ann\n2,Bo\n");

    exporter.to_html(&data, "people", &ExportOptions::default()).await?;
    let html = tokio::fs::read_to_string(temp_dir.path().join("people.html")).await?;
    assert!(html.contains("<tr><td>id</td><td>name</td></tr>"));
    assert!(html.contains("<tr><td>2</td><td>Bo</td></tr>"));

    exporter.to_xls(&data, "people", &aliased()).await?;
    let xls = tokio::fs::read_to_string(temp_dir.path().join("people.xls")).await?;
    assert!(xls.contains("urn:schemas-microsoft-com:office:spreadsheet"));
    assert!(xls.contains(r#"<Data ss:Type="String">Name</Data>"#));
    Ok(())
}

#[test]
fn test_passthrough_sheet_options() -> Result<()> {
    let data: Vec<Record> = json!([
        {"id": 1, "seen": "2024-05-01", "note": null},
        {"id": 2, "seen": "2024-05-02", "note": "ok"}
    ])
    .as_array()
    .into_iter()
    .flatten()
    .filter_map(|v| v.as_object().cloned())
    .collect();

    let options = ExportOptions {
        sheet: SheetOptions {
            cell_dates: true,
            null_error: true,
            skip_header: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let blob = encode(ExportFormat::Csv, &data, "seen", &options)?;
    let csv = String::from_utf8(blob.bytes)?;
    assert_eq!(
        csv,
        "1,2024-05-01 00:00:00,#NULL!\n2,2024-05-02 00:00:00,ok\n"
    );
    assert_eq!(blob.mime_type, "text/csv;charset=utf-8");
    Ok(())
}

#[tokio::test]
async fn test_reject_policy_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let exporter = Exporter::new(LocalSaver::new(temp_dir.path()));
    let mut options = ExportOptions::with_headers(vec![
        HeaderEntry::aliased("id", "Same"),
        HeaderEntry::aliased("name", "Same"),
    ]);
    options.duplicate_aliases = DuplicateAliasPolicy::Reject;

    let result = exporter.to_json(&people(), "people", &options).await;

    assert!(matches!(result, Err(ExportError::DuplicateAlias { ref alias }) if alias == "Same"));
    assert!(!temp_dir.path().join("people.json").exists());
    Ok(())
}

#[test]
fn test_mime_types_per_format() -> Result<()> {
    for format in ExportFormat::ALL {
        let blob = encode(format, &people(), "people", &ExportOptions::default())?;
        assert_eq!(blob.mime_type, format.mime_type());
        assert!(!blob.is_empty());
    }
    assert_eq!(ExportFormat::Json.mime_type(), "application/json;charset=utf-8");
    assert_eq!(ExportFormat::Text.mime_type(), "text/plain;charset=utf-8");
    Ok(())
}
