// Blob Storage Port (Interface)
//
// Write-only artifacts: signature images and generated reports.

use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under bucket/path, creating intermediate directories
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<()>;

    /// Blob names in a bucket matching a prefix
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;

    /// Resolvable URL for an existing blob; MissingAsset if absent
    async fn public_url(&self, bucket: &str, path: &str) -> Result<String>;
}
