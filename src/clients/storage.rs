use crate::error::BillError;
use async_trait::async_trait;
use std::path::PathBuf;

/// 对象存储: 上传字节先落一跳, 再取回送分析
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), BillError>;
    async fn get(&self, key: &str) -> Result<Vec<u8>, BillError>;
}

/// 本地目录实现, 根目录即桶 (开发与单机部署用)
pub struct FsObjectStorage {
    root: PathBuf,
}

impl FsObjectStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ObjectStorage for FsObjectStorage {
    // 文件系统挂不了对象元数据, content_type 只对真实对象存储有意义
    async fn put(&self, key: &str, bytes: &[u8], _content_type: &str) -> Result<(), BillError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| BillError::upstream("storage", e))?;
        tokio::fs::write(self.root.join(key), bytes)
            .await
            .map_err(|e| BillError::upstream("storage", e))
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, BillError> {
        tokio::fs::read(self.root.join(key))
            .await
            .map_err(|e| BillError::upstream("storage", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsObjectStorage::new(dir.path());

        storage
            .put("abc.png", b"receipt bytes", "image/png")
            .await
            .unwrap();
        let fetched = storage.get("abc.png").await.unwrap();
        assert_eq!(fetched, b"receipt bytes");
    }

    #[tokio::test]
    async fn test_get_missing_key_is_upstream_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsObjectStorage::new(dir.path());

        let err = storage.get("nope.png").await.unwrap_err();
        assert!(matches!(
            err,
            BillError::UpstreamUnavailable { service: "storage", .. }
        ));
    }
}
