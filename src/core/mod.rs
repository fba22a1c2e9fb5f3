pub mod exporter;
pub mod headers;
pub mod markup;
pub mod reshape;
pub mod sheet;
pub mod workbook;

pub use crate::domain::model::{Blob, ExportFormat, HeaderEntry, NormalizedHeaders, Node, Record};
pub use crate::domain::ports::Saver;
pub use crate::utils::error::Result;
