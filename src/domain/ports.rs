use crate::domain::model::Blob;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 檔案存檔介面：接收內容與目標檔名，一次嘗試，不重試。
#[async_trait]
pub trait Saver: Send + Sync {
    async fn save(&self, blob: &Blob, filename: &str) -> Result<()>;
}

