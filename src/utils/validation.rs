use crate::domain::model::ExportFormat;
use crate::utils::error::{ExportError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ExportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ExportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 檔名不含副檔名，也不得含路徑分隔符
pub fn validate_filename(field_name: &str, filename: &str) -> Result<()> {
    validate_non_empty_string(field_name, filename)?;
    validate_path(field_name, filename)?;

    if filename.contains('/') || filename.contains('\\') {
        return Err(ExportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: filename.to_string(),
            reason: "File name cannot contain path separators".to_string(),
        });
    }

    Ok(())
}

pub fn validate_formats(field_name: &str, formats: &[ExportFormat]) -> Result<()> {
    if formats.is_empty() {
        return Err(ExportError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    let mut seen = HashSet::new();
    for format in formats {
        if !seen.insert(format) {
            return Err(ExportError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.to_string(),
                reason: "Format listed more than once".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ExportError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ExportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
