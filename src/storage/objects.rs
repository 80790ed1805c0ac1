//! 用户文件存储
//!
//! 路径形如 `users/{uid}/profile/avatar`。本地实现把内容写到
//! `{root}/{path}`，元数据写到同目录下的 `{name}.meta.json`。

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tracing::debug;

use crate::errors::{Result, ShrtError};
use crate::storage::models::StoredObject;

const META_SUFFIX: &str = ".meta.json";

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 写入（覆盖）对象
    async fn put(&self, path: &str, content_type: &str, data: Bytes) -> Result<StoredObject>;

    /// 读取对象内容和元数据，不存在时返回 None
    async fn get(&self, path: &str) -> Result<Option<(StoredObject, Bytes)>>;

    /// 只读元数据
    async fn head(&self, path: &str) -> Result<Option<StoredObject>>;

    async fn delete(&self, path: &str) -> Result<bool>;
}

/// 校验对象路径：相对路径、无 `..`、无空段
pub fn validate_object_path(path: &str) -> Result<()> {
    if path.is_empty() || path.starts_with('/') || path.contains('\\') {
        return Err(ShrtError::validation(format!("Invalid object path: {}", path)));
    }
    if path.ends_with(META_SUFFIX) {
        return Err(ShrtError::validation("Reserved object name"));
    }
    for segment in path.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(ShrtError::validation(format!("Invalid object path: {}", path)));
        }
    }
    if Path::new(path)
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(ShrtError::validation(format!("Invalid object path: {}", path)));
    }
    Ok(())
}

/// 本地文件系统实现
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn data_path(&self, path: &str) -> Result<PathBuf> {
        validate_object_path(path)?;
        Ok(self.root.join(path))
    }

    fn meta_path(data_path: &Path) -> PathBuf {
        let mut name = data_path.as_os_str().to_os_string();
        name.push(META_SUFFIX);
        PathBuf::from(name)
    }

    async fn read_meta(&self, path: &str, data_path: &Path) -> Result<Option<StoredObject>> {
        let meta_path = Self::meta_path(data_path);
        match tokio::fs::read(&meta_path).await {
            Ok(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // 没有元数据但文件存在：按二进制处理
                match tokio::fs::metadata(data_path).await {
                    Ok(meta) if meta.is_file() => Ok(Some(StoredObject {
                        path: path.to_string(),
                        content_type: "application/octet-stream".to_string(),
                        size: meta.len(),
                        updated_at: Utc::now(),
                    })),
                    Ok(_) => Ok(None),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, path: &str, content_type: &str, data: Bytes) -> Result<StoredObject> {
        let data_path = self.data_path(path)?;
        if let Some(parent) = data_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let object = StoredObject {
            path: path.to_string(),
            content_type: content_type.to_string(),
            size: data.len() as u64,
            updated_at: Utc::now(),
        };

        tokio::fs::write(&data_path, &data).await?;
        tokio::fs::write(Self::meta_path(&data_path), serde_json::to_vec(&object)?).await?;

        debug!("Stored object {} ({} bytes)", path, object.size);
        Ok(object)
    }

    async fn get(&self, path: &str) -> Result<Option<(StoredObject, Bytes)>> {
        let data_path = self.data_path(path)?;
        let Some(meta) = self.read_meta(path, &data_path).await? else {
            return Ok(None);
        };

        match tokio::fs::read(&data_path).await {
            Ok(data) => Ok(Some((meta, Bytes::from(data)))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn head(&self, path: &str) -> Result<Option<StoredObject>> {
        let data_path = self.data_path(path)?;
        if !tokio::fs::try_exists(&data_path).await? {
            return Ok(None);
        }
        self.read_meta(path, &data_path).await
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        let data_path = self.data_path(path)?;
        match tokio::fs::remove_file(&data_path).await {
            Ok(()) => {
                let _ = tokio::fs::remove_file(Self::meta_path(&data_path)).await;
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
