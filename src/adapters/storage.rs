use crate::domain::model::Blob;
use crate::domain::ports::Saver;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// 將匯出內容寫到本機目錄下
#[derive(Debug, Clone)]
pub struct LocalSaver {
    base_path: PathBuf,
}

impl LocalSaver {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl Saver for LocalSaver {
    async fn save(&self, blob: &Blob, filename: &str) -> Result<()> {
        let full_path = self.base_path.join(filename);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tracing::debug!(
            "Writing {} bytes ({}) to {}",
            blob.len(),
            blob.mime_type,
            full_path.display()
        );
        tokio::fs::write(&full_path, &blob.bytes).await?;
        Ok(())
    }
}
