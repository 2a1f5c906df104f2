use async_trait::async_trait;
use std::path::Path;

/// Persists rendered images.
///
/// Writes are a single attempt. A failed write leaves the destination in an unknown state.
#[async_trait]
pub trait FileWriter: Send + Sync {
    async fn write(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()>;
}

/// Writes straight to the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsFileWriter;

#[async_trait]
impl FileWriter for FsFileWriter {
    async fn write(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        tracing::debug!("[FILES] Writing {} bytes to {}", bytes.len(), path.display());
        tokio::fs::write(path, bytes).await
    }
}
