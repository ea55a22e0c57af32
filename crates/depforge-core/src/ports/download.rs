//! Archive download port.

use std::path::Path;

use async_trait::async_trait;

use crate::error::PipelineResult;

/// Fetches a remote archive to a local file.
///
/// Implementations create the parent directory of `dest` if needed and leave
/// no partial file behind on failure.
#[async_trait]
pub trait ArchiveDownloader: Send + Sync {
    async fn download(&self, url: &str, dest: &Path) -> PipelineResult<()>;
}
