use crate::domain::model::{NormalizedHeaders, Record};
use serde_json::Value;

/// 一列資料；None 代表來源記錄缺少該欄位。
pub type Row = Vec<Option<Value>>;

/// 記錄轉成二維陣列：第一列為別名，其後每列依 key 順序取值。
pub fn to_rows(records: &[Record], headers: &NormalizedHeaders) -> Vec<Row> {
    let mut rows = Vec::with_capacity(records.len() + 1);

    rows.push(
        headers
            .alias_headers
            .iter()
            .map(|alias| Some(Value::String(alias.clone())))
            .collect(),
    );

    for record in records {
        rows.push(
            headers
                .key_headers
                .iter()
                .map(|key| record.get(key).cloned())
                .collect(),
        );
    }

    rows
}

/// 依別名重新組成記錄；別名重複時後者覆寫前者，但位置維持第一次出現處。
/// 最後值為缺少的欄位不輸出。
pub fn to_keyed_records(records: &[Record], headers: &NormalizedHeaders) -> Vec<Record> {
    records
        .iter()
        .map(|record| {
            let mut slots: Vec<(&str, Option<&Value>)> = Vec::with_capacity(headers.len());
            for (key, alias) in headers.pairs() {
                let value = record.get(key);
                match slots.iter_mut().find(|(name, _)| *name == alias) {
                    Some(slot) => slot.1 = value,
                    None => slots.push((alias, value)),
                }
            }

            slots
                .into_iter()
                .filter_map(|(alias, value)| value.map(|v| (alias.to_string(), v.clone())))
                .collect()
        })
        .collect()
}
