// Filesystem BlobStore Implementation
//
// Blobs live at <root>/<bucket>/<path>. Buckets are plain directories
// created on first upload.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use upkeep_core::error::{AppError, Result};
use upkeep_core::port::BlobStore;

pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn blob_path(&self, bucket: &str, path: &str) -> Result<PathBuf> {
        validate_component(bucket)?;
        for segment in path.split('/') {
            validate_component(segment)?;
        }
        Ok(self.root.join(bucket).join(path))
    }
}

// Reject empty and traversal segments before they touch the filesystem
fn validate_component(segment: &str) -> Result<()> {
    if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
        return Err(AppError::Validation(format!(
            "invalid blob path segment: {:?}",
            segment
        )));
    }
    Ok(())
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<()> {
        let full_path = self.blob_path(bucket, path)?;

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full_path, bytes).await?;

        debug!(
            bucket = %bucket,
            path = %path,
            size = bytes.len(),
            content_type = %content_type,
            "Blob stored"
        );

        Ok(())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        validate_component(bucket)?;
        let bucket_dir = self.root.join(bucket);

        if !bucket_dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        collect_blobs(&bucket_dir, &bucket_dir, &mut names).await?;
        names.retain(|n| n.starts_with(prefix));
        names.sort();

        Ok(names)
    }

    async fn public_url(&self, bucket: &str, path: &str) -> Result<String> {
        let full_path = self.blob_path(bucket, path)?;

        if !full_path.is_file() {
            return Err(AppError::MissingAsset(format!("{}/{}", bucket, path)));
        }

        Ok(format!("file://{}", full_path.display()))
    }
}

// Walks the bucket directory, pushing paths relative to the bucket root.
// Recursion via Box::pin because async fns cannot self-recurse directly.
fn collect_blobs<'a>(
    bucket_root: &'a Path,
    dir: &'a Path,
    names: &'a mut Vec<String>,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + Send + 'a>> {
    Box::pin(async move {
        let mut entries = tokio::fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let entry_path = entry.path();
            if entry_path.is_dir() {
                collect_blobs(bucket_root, &entry_path, names).await?;
            } else if let Ok(relative) = entry_path.strip_prefix(bucket_root) {
                names.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }

        Ok(())
    })
}
