//! 本地文件系统 Blob 存储
//!
//! 文件写入 `{dir}/{name}`，对外地址为 `{public_path}/{name}`，
//! 由 HTTP 层以静态文件方式提供。

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use halcon_errors::{AppError, AppResult};
use halcon_ports::BlobStore;
use tokio::fs;
use tracing::{debug, warn};

pub struct LocalBlobStore {
    dir: PathBuf,
    public_path: String,
}

impl LocalBlobStore {
    /// 创建存储，目录不存在时自动创建
    pub async fn new(dir: impl AsRef<Path>, public_path: impl Into<String>) -> AppResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::storage(format!("Failed to create upload dir: {}", e)))?;

        Ok(Self {
            dir,
            public_path: public_path.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 名称不得逃逸出存储目录
    fn path_for(&self, name: &str) -> AppResult<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(AppError::validation("invalid file name"));
        }
        Ok(self.dir.join(name))
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.public_path, name)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, name: &str, bytes: &[u8]) -> AppResult<String> {
        let path = self.path_for(name)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, bytes)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write file: {}", e)))?;
        if let Err(e) = fs::rename(&temp_path, &path).await {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                warn!(path = %temp_path.display(), error = %cleanup, "Failed to remove temp file");
            }
            return Err(AppError::storage(format!("Failed to store file: {}", e)));
        }

        debug!(path = %path.display(), size = bytes.len(), "Stored blob");
        Ok(self.url_for(name))
    }

    async fn delete(&self, name: &str) -> AppResult<()> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Removed blob");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::storage(format!("Failed to remove file: {}", e))),
        }
    }
}
