//! Blob 存储 trait 定义

use async_trait::async_trait;
use halcon_errors::{AppError, AppResult};

/// Blob 存储
///
/// 按名称保存字节流，返回可对外引用的稳定地址（URL 或路径）
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// 保存对象，同名覆盖
    async fn put(&self, name: &str, bytes: &[u8]) -> AppResult<String>;

    /// 删除对象，不存在时视为成功
    async fn delete(&self, name: &str) -> AppResult<()>;
}

/// 上传策略：大小上限与扩展名白名单
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_size: u64,
    /// 小写、带点，如 `.jpg`
    pub allowed_extensions: Vec<String>,
}

impl UploadPolicy {
    pub fn new(max_size: u64, allowed_extensions: Vec<String>) -> Self {
        let allowed_extensions = allowed_extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.trim().to_lowercase();
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{}", ext)
                }
            })
            .collect();

        Self {
            max_size,
            allowed_extensions,
        }
    }

    /// 校验文件，返回规范化的扩展名
    pub fn check(&self, file_name: &str, size: u64) -> AppResult<String> {
        if size == 0 {
            return Err(AppError::validation("photo file is required"));
        }
        if size > self.max_size {
            return Err(AppError::validation("file size exceeds maximum allowed"));
        }

        let ext = extension_of(file_name);
        if !self.allowed_extensions.contains(&ext) {
            return Err(AppError::validation(format!(
                "only {} files are allowed",
                self.allowed_extensions.join(", ")
            )));
        }

        Ok(ext)
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(
            10 * 1024 * 1024,
            vec![".jpg".to_string(), ".jpeg".to_string(), ".png".to_string()],
        )
    }
}

/// 取小写扩展名（含点），无扩展名时返回空串
fn extension_of(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_extensions_case_insensitive() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.check("proof.JPG", 1024).unwrap(), ".jpg");
        assert_eq!(policy.check("proof.jpeg", 1024).unwrap(), ".jpeg");
        assert_eq!(policy.check("dir/proof.png", 1024).unwrap(), ".png");
    }

    #[test]
    fn test_rejects_other_types() {
        let policy = UploadPolicy::default();
        assert!(matches!(policy.check("proof.gif", 10), Err(AppError::Validation(_))));
        assert!(matches!(policy.check("proof", 10), Err(AppError::Validation(_))));
        assert!(matches!(policy.check("proof.png.exe", 10), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_size_ceiling() {
        let policy = UploadPolicy::new(100, vec!["png".to_string()]);
        assert!(policy.check("a.png", 100).is_ok());
        assert!(matches!(policy.check("a.png", 101), Err(AppError::Validation(_))));
        assert!(matches!(policy.check("a.png", 0), Err(AppError::Validation(_))));
    }
}
