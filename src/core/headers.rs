use crate::domain::model::{HeaderEntry, NormalizedHeaders};
use crate::utils::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 別名重複時的處理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateAliasPolicy {
    /// 後面的欄位覆寫前面的
    #[default]
    Overwrite,
    /// 直接回報錯誤
    Reject,
}

/// 將使用者表頭拆成 key / alias 兩個對齊序列；沒有表頭時兩者皆為空。
pub fn normalize_headers(headers: Option<&[HeaderEntry]>) -> NormalizedHeaders {
    let mut normalized = NormalizedHeaders::default();

    for header in headers.unwrap_or_default() {
        normalized.key_headers.push(header.name().to_string());
        normalized.alias_headers.push(header.alias().to_string());
    }

    normalized
}

impl NormalizedHeaders {
    /// 重複出現的別名，依第一次重複的順序
    pub fn duplicate_aliases(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates: Vec<&str> = Vec::new();

        for alias in &self.alias_headers {
            if !seen.insert(alias.as_str()) && !duplicates.contains(&alias.as_str()) {
                duplicates.push(alias);
            }
        }

        duplicates
    }
}

pub fn ensure_unique_aliases(headers: &NormalizedHeaders) -> Result<()> {
    match headers.duplicate_aliases().first() {
        Some(alias) => Err(ExportError::DuplicateAlias {
            alias: alias.to_string(),
        }),
        None => Ok(()),
    }
}

pub fn apply_alias_policy(headers: &NormalizedHeaders, policy: DuplicateAliasPolicy) -> Result<()> {
    match policy {
        DuplicateAliasPolicy::Overwrite => {
            for alias in headers.duplicate_aliases() {
                tracing::warn!("Header alias '{}' repeats; later fields overwrite earlier ones", alias);
            }
            Ok(())
        }
        DuplicateAliasPolicy::Reject => ensure_unique_aliases(headers),
    }
}
