use crate::core::markup::XML_DECLARATION;
use crate::core::sheet::{Cell, Sheet, SheetOptions, NULL_ERROR};
use crate::domain::model::{format_number, ExportFormat};
use crate::utils::error::{ExportError, Result};
use chrono::{Datelike, NaiveDateTime, Timelike};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::io::Write;

pub const SHEET_NAME: &str = "Sheet1";

const SPREADSHEET_NS: &str = "urn:schemas-microsoft-com:office:spreadsheet";
const MSO_APPLICATION: &str = r#"<?mso-application progid="Excel.Sheet"?>"#;
const DATE_STYLE: &str = "date";
const NULL_FORMULA: &str = "=#NULL!";

/// 將 sheet 寫成指定 book type 的位元組
pub fn write_book(
    sheet: &Sheet,
    book_type: ExportFormat,
    options: &SheetOptions,
    title: &str,
) -> Result<Vec<u8>> {
    tracing::debug!(
        "Writing {} book: {} rows x {} columns",
        book_type,
        sheet.height(),
        sheet.width()
    );

    match book_type {
        ExportFormat::Xlsx => write_xlsx(sheet, options),
        ExportFormat::Xls => write_spreadsheet_ml(sheet, options),
        ExportFormat::Csv => write_csv(sheet),
        ExportFormat::Html => write_html(sheet, title),
        other => Err(ExportError::UnsupportedFormat {
            format: format!("{} is not a sheet book type", other),
        }),
    }
}

fn write_xlsx(sheet: &Sheet, options: &SheetOptions) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let date_format = Format::new().set_num_format(options.date_format());
    let blank_format = Format::new();

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let excel_row = u32::try_from(row_idx).map_err(|_| out_of_range("row", row_idx))?;
        for (col_idx, cell) in row.iter().enumerate() {
            let excel_col = u16::try_from(col_idx).map_err(|_| out_of_range("column", col_idx))?;
            match cell {
                Cell::Absent => {}
                Cell::Stub => {
                    worksheet.write_blank(excel_row, excel_col, &blank_format)?;
                }
                Cell::Error => {
                    worksheet.write_formula(excel_row, excel_col, NULL_FORMULA)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(excel_row, excel_col, *b)?;
                }
                Cell::Number(n) => {
                    let value = n.as_f64().unwrap_or_default();
                    worksheet.write_number(excel_row, excel_col, value)?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(excel_row, excel_col, s)?;
                }
                Cell::Date(dt) => {
                    let datetime = to_excel_datetime(dt)?;
                    worksheet.write_datetime_with_format(
                        excel_row,
                        excel_col,
                        &datetime,
                        &date_format,
                    )?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn to_excel_datetime(dt: &NaiveDateTime) -> Result<ExcelDateTime> {
    // 年份超出範圍時交給 ExcelDateTime 回報錯誤
    let year = u16::try_from(dt.year()).unwrap_or(0);
    let datetime = ExcelDateTime::from_ymd(year, dt.month() as u8, dt.day() as u8)?
        .and_hms(dt.hour() as u16, dt.minute() as u8, dt.second())?;
    Ok(datetime)
}

fn out_of_range(kind: &str, index: usize) -> ExportError {
    ExportError::ProcessingError {
        message: format!("Sheet {} index {} exceeds workbook limits", kind, index),
    }
}

/// 舊版 .xls：輸出 Excel 可直接開啟的 SpreadsheetML 2003 活頁簿
fn write_spreadsheet_ml(sheet: &Sheet, options: &SheetOptions) -> Result<Vec<u8>> {
    let prolog = format!("{}\n{}\n", XML_DECLARATION, MSO_APPLICATION);
    let mut writer = Writer::new_with_indent(prolog.into_bytes(), b' ', 1);

    let workbook = BytesStart::new("Workbook")
        .with_attributes([("xmlns", SPREADSHEET_NS), ("xmlns:ss", SPREADSHEET_NS)]);
    writer.write_event(Event::Start(workbook))?;

    writer.write_event(Event::Start(BytesStart::new("Styles")))?;
    writer.write_event(Event::Start(
        BytesStart::new("Style").with_attributes([("ss:ID", DATE_STYLE)]),
    ))?;
    writer.write_event(Event::Empty(
        BytesStart::new("NumberFormat").with_attributes([("ss:Format", options.date_format())]),
    ))?;
    writer.write_event(Event::End(BytesEnd::new("Style")))?;
    writer.write_event(Event::End(BytesEnd::new("Styles")))?;

    writer.write_event(Event::Start(
        BytesStart::new("Worksheet").with_attributes([("ss:Name", SHEET_NAME)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("Table")))?;

    for row in &sheet.rows {
        writer.write_event(Event::Start(BytesStart::new("Row")))?;
        let mut skipped = false;

        for (col_idx, cell) in row.iter().enumerate() {
            let mut start = BytesStart::new("Cell");
            // 跳過儲存格後要標明位置 (1-based)
            if std::mem::take(&mut skipped) {
                start.push_attribute(("ss:Index", (col_idx + 1).to_string().as_str()));
            }

            let (data_type, text) = match cell {
                Cell::Absent => {
                    skipped = true;
                    continue;
                }
                Cell::Stub => {
                    writer.write_event(Event::Empty(start))?;
                    continue;
                }
                Cell::Error => {
                    start.push_attribute(("ss:Formula", NULL_FORMULA));
                    ("Error", NULL_ERROR.to_string())
                }
                Cell::Bool(b) => ("Boolean", u8::from(*b).to_string()),
                Cell::Number(n) => ("Number", format_number(n)),
                Cell::Text(s) => ("String", s.clone()),
                Cell::Date(dt) => {
                    start.push_attribute(("ss:StyleID", DATE_STYLE));
                    ("DateTime", dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
                }
            };

            writer.write_event(Event::Start(start))?;
            write_text_element(&mut writer, "Data", &[("ss:Type", data_type)], &text)?;
            writer.write_event(Event::End(BytesEnd::new("Cell")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("Row")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Table")))?;
    writer.write_event(Event::End(BytesEnd::new("Worksheet")))?;
    writer.write_event(Event::End(BytesEnd::new("Workbook")))?;
    Ok(writer.into_inner())
}

/// `<tag attrs>text</tag>`，結束標籤與文字同一行
fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    attributes: &[(&str, &str)],
    text: &str,
) -> Result<()> {
    let start = BytesStart::new(tag).with_attributes(attributes.iter().copied());
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_csv(sheet: &Sheet) -> Result<Vec<u8>> {
    let width = sheet.width();
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    for row in &sheet.rows {
        let mut fields: Vec<String> = row.iter().map(Cell::display_text).collect();
        fields.resize(width, String::new());
        writer.write_record(&fields)?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::IoError(e.into_error()))
}

fn write_html(sheet: &Sheet, title: &str) -> Result<Vec<u8>> {
    let width = sheet.width();
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Start(BytesStart::new("html")))?;
    writer.write_event(Event::Start(BytesStart::new("head")))?;
    writer.write_event(Event::Empty(
        BytesStart::new("meta").with_attributes([("charset", "utf-8")]),
    ))?;
    write_text_element(&mut writer, "title", &[], title)?;
    writer.write_event(Event::End(BytesEnd::new("head")))?;
    writer.write_event(Event::Start(BytesStart::new("body")))?;
    writer.write_event(Event::Start(BytesStart::new("table")))?;

    for row in &sheet.rows {
        writer.write_event(Event::Start(BytesStart::new("tr")))?;
        for col_idx in 0..width {
            let text = row.get(col_idx).map(Cell::display_text).unwrap_or_default();
            write_text_element(&mut writer, "td", &[], &text)?;
        }
        writer.write_event(Event::End(BytesEnd::new("tr")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("table")))?;
    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("html")))?;
    Ok(writer.into_inner())
}
