use crate::core::reshape::Row;
use crate::domain::model::{format_number, Record};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
pub const NULL_ERROR: &str = "#NULL!";

/// Excel 可表示的年份範圍
pub const EXCEL_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=9999;

/// 轉交給 sheet builder 的選項
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetOptions {
    /// 日期儲存格的數字格式 (Excel 格式字串)
    pub date_format: Option<String>,
    /// 將日期字串轉為日期儲存格
    pub cell_dates: bool,
    /// 空值仍輸出空白儲存格
    pub sheet_stubs: bool,
    /// null 輸出為 `#NULL!` 錯誤儲存格
    pub null_error: bool,
    /// json_to_sheet 不輸出表頭列
    pub skip_header: bool,
}

impl SheetOptions {
    pub fn date_format(&self) -> &str {
        self.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// 不輸出任何儲存格
    Absent,
    /// 空白儲存格
    Stub,
    Error,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Date(NaiveDateTime),
}

impl Cell {
    /// 純文字格式 (csv / html) 的顯示值
    pub fn display_text(&self) -> String {
        match self {
            Cell::Absent | Cell::Stub => String::new(),
            Cell::Error => NULL_ERROR.to_string(),
            Cell::Bool(b) => b.to_string().to_uppercase(),
            Cell::Number(n) => format_number(n),
            Cell::Text(s) => s.clone(),
            Cell::Date(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// 最寬的一列
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// 二維陣列轉 sheet
pub fn aoa_to_sheet(rows: &[Row], options: &SheetOptions) -> Sheet {
    Sheet {
        rows: rows
            .iter()
            .map(|row| row.iter().map(|value| to_cell(value.as_ref(), options)).collect())
            .collect(),
    }
}

/// 記錄陣列轉 sheet，欄位為所有記錄 key 的聯集 (依首次出現順序)
pub fn json_to_sheet(records: &[Record], options: &SheetOptions) -> Sheet {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut rows = Vec::with_capacity(records.len() + 1);
    if !options.skip_header {
        rows.push(columns.iter().map(|c| Cell::Text(c.to_string())).collect());
    }

    for record in records {
        rows.push(
            columns
                .iter()
                .map(|column| to_cell(record.get(*column), options))
                .collect(),
        );
    }

    Sheet { rows }
}

fn to_cell(value: Option<&Value>, options: &SheetOptions) -> Cell {
    match value {
        None => {
            if options.sheet_stubs {
                Cell::Stub
            } else {
                Cell::Absent
            }
        }
        Some(Value::Null) => {
            if options.null_error {
                Cell::Error
            } else if options.sheet_stubs {
                Cell::Stub
            } else {
                Cell::Absent
            }
        }
        Some(Value::Bool(b)) => Cell::Bool(*b),
        Some(Value::Number(n)) => Cell::Number(n.clone()),
        Some(Value::String(s)) => {
            if options.cell_dates {
                // 超出 Excel 年份範圍的日期維持字串
                let in_range = |dt: &NaiveDateTime| EXCEL_YEAR_RANGE.contains(&dt.year());
                if let Some(dt) = parse_date(s).filter(in_range) {
                    return Cell::Date(dt);
                }
            }
            Cell::Text(s.clone())
        }
        Some(nested) => Cell::Text(nested.to_string()),
    }
}

/// 可辨識 RFC 3339 與 `YYYY-MM-DD[ HH:MM:SS]`
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<Record> {
        [
            json!({"id": 1, "name": "Ann", "joined": "2024-01-15"}),
            json!({"id": 2, "name": null, "extra": [1, 2]}),
        ]
        .into_iter()
        .filter_map(|v| v.as_object().cloned())
        .collect()
    }

    #[test]
    fn test_json_to_sheet_union_of_keys() {
        let sheet = json_to_sheet(&records(), &SheetOptions::default());

        assert_eq!(sheet.height(), 3);
        assert_eq!(
            sheet.rows[0],
            vec![
                Cell::Text("id".into()),
                Cell::Text("name".into()),
                Cell::Text("joined".into()),
                Cell::Text("extra".into()),
            ]
        );
        assert_eq!(sheet.rows[2][1], Cell::Absent);
        assert_eq!(sheet.rows[2][2], Cell::Absent);
        assert_eq!(sheet.rows[2][3], Cell::Text("[1,2]".into()));
    }

    #[test]
    fn test_skip_header() {
        let options = SheetOptions {
            skip_header: true,
            ..Default::default()
        };
        let sheet = json_to_sheet(&records(), &options);
        assert_eq!(sheet.height(), 2);
        assert_eq!(sheet.rows[0][0], Cell::Number(1.into()));
    }

    #[test]
    fn test_null_handling_options() {
        let rows = vec![vec![Some(Value::Null), None]];

        let plain = aoa_to_sheet(&rows, &SheetOptions::default());
        assert_eq!(plain.rows[0], vec![Cell::Absent, Cell::Absent]);

        let stubs = aoa_to_sheet(
            &rows,
            &SheetOptions {
                sheet_stubs: true,
                ..Default::default()
            },
        );
        assert_eq!(stubs.rows[0], vec![Cell::Stub, Cell::Stub]);

        let errors = aoa_to_sheet(
            &rows,
            &SheetOptions {
                null_error: true,
                ..Default::default()
            },
        );
        assert_eq!(errors.rows[0], vec![Cell::Error, Cell::Absent]);
        assert_eq!(errors.rows[0][0].display_text(), "#NULL!");
    }

    #[test]
    fn test_cell_dates() {
        let options = SheetOptions {
            cell_dates: true,
            ..Default::default()
        };
        let sheet = json_to_sheet(&records(), &options);
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(sheet.rows[1][2], Cell::Date(expected));
        assert_eq!(sheet.rows[1][2].display_text(), "2024-01-15 00:00:00");

        // 未開啟時維持字串
        let sheet = json_to_sheet(&records(), &SheetOptions::default());
        assert_eq!(sheet.rows[1][2], Cell::Text("2024-01-15".into()));
    }

    #[test]
    fn test_parse_date_variants() {
        assert!(parse_date("2024-03-20T14:45:00Z").is_some());
        assert!(parse_date("2024-03-20 14:45:00").is_some());
        assert!(parse_date("not a date").is_none());
        assert!(parse_date("12").is_none());
    }

    fn number(f: f64) -> Cell {
        Cell::Number(serde_json::Number::from_f64(f).unwrap())
    }

    #[test]
    fn test_large_numbers_display_exactly() {
        let rows = vec![vec![Some(json!(1e20)), Some(json!(u64::MAX))]];
        let sheet = aoa_to_sheet(&rows, &SheetOptions::default());

        assert_eq!(sheet.rows[0][0].display_text(), "100000000000000000000");
        assert_eq!(sheet.rows[0][1].display_text(), "18446744073709551615");
    }

    #[test]
    fn test_dates_outside_excel_range_stay_text() {
        let options = SheetOptions {
            cell_dates: true,
            ..Default::default()
        };
        let rows = vec![vec![Some(json!("1850-01-01")), Some(json!("1900-01-01"))]];
        let sheet = aoa_to_sheet(&rows, &options);

        assert_eq!(sheet.rows[0][0], Cell::Text("1850-01-01".into()));
        assert!(matches!(sheet.rows[0][1], Cell::Date(_)));
    }

    #[test]
    fn test_display_text() {
        assert_eq!(Cell::Number(3.into()).display_text(), "3");
        assert_eq!(number(3.0).display_text(), "3");
        assert_eq!(number(0.25).display_text(), "0.25");
        assert_eq!(Cell::Bool(true).display_text(), "TRUE");
        assert_eq!(Cell::Stub.display_text(), "");
    }
}
