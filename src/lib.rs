pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::ExportConfig;

pub use crate::adapters::LocalSaver;
pub use crate::core::exporter::{encode, ExportOptions, Exporter};
pub use crate::core::headers::{normalize_headers, DuplicateAliasPolicy};
pub use crate::core::markup::{render, MarkupOptions};
pub use crate::core::reshape::{to_keyed_records, to_rows};
pub use crate::core::sheet::SheetOptions;
pub use crate::domain::model::{Blob, ExportFormat, HeaderEntry, NormalizedHeaders, Record};
pub use crate::domain::ports::Saver;
pub use crate::utils::error::{ExportError, Result};
