//! Media bucket: blobs in an [`ObjectStore`], indexed by the `media_files`
//! table.
//!
//! Uploads get a fresh object key of the form `<millis>-<random7>.<ext>`.
//! The blob is written before its index row, and removed before its row on
//! delete, so a listed file always has bytes behind it.

use std::path::Path as FsPath;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Result, StorageError};
use crate::store::{ContentStore, MediaFileRow};

pub const MEDIA_BUCKET: &str = "media";

/// Maximum number of files returned by [`MediaLibrary::list`].
pub const LIST_LIMIT: usize = 100;

/// A media file with the URL it is served from.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MediaItem {
    #[serde(flatten)]
    pub file: MediaFileRow,
    pub url: String,
}

pub struct MediaLibrary {
    objects: Arc<dyn ObjectStore>,
    index: Arc<ContentStore>,
    public_base_url: String,
}

impl MediaLibrary {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        index: Arc<ContentStore>,
        public_base_url: &str,
    ) -> Self {
        Self {
            objects,
            index,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Blobs under `<root>/media` on the local filesystem.
    pub fn local(root: &FsPath, index: Arc<ContentStore>, public_base_url: &str) -> Result<Self> {
        let dir = root.join(MEDIA_BUCKET);
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::Other(e.to_string()))?;
        let objects = LocalFileSystem::new_with_prefix(&dir)?;
        tracing::info!(dir = %dir.display(), "Using local media storage");
        Ok(Self::new(Arc::new(objects), index, public_base_url))
    }

    /// Blobs in an S3-compatible bucket. Credentials, region and endpoint
    /// come from the standard `AWS_*` environment variables.
    pub fn s3_from_env(
        bucket: &str,
        index: Arc<ContentStore>,
        public_base_url: &str,
    ) -> Result<Self> {
        let objects = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()?;
        tracing::info!(bucket = %bucket, "Using S3 media storage");
        Ok(Self::new(Arc::new(objects), index, public_base_url))
    }

    pub fn public_url(&self, name: &str) -> String {
        format!("{}/media/{}", self.public_base_url, name)
    }

    fn item(&self, file: MediaFileRow) -> MediaItem {
        MediaItem {
            url: self.public_url(&file.name),
            file,
        }
    }

    /// Newest files first, at most [`LIST_LIMIT`].
    pub async fn list(&self) -> Result<Vec<MediaItem>> {
        let files = self.index.list_media_files(LIST_LIMIT).await?;
        Ok(files.into_iter().map(|f| self.item(f)).collect())
    }

    /// Stores `data` under a new object key derived from `original_name`.
    pub async fn upload(
        &self,
        original_name: &str,
        mime_type: &str,
        data: Bytes,
    ) -> Result<MediaItem> {
        let name = object_key(original_name);
        let size = data.len() as i64;
        self.objects
            .put(&Path::from(name.as_str()), PutPayload::from(data))
            .await?;
        let row = match self.index.insert_media_file(&name, mime_type, size).await {
            Ok(row) => row,
            Err(e) => {
                if let Err(cleanup) = self.objects.delete(&Path::from(name.as_str())).await {
                    tracing::warn!(name = %name, error = %cleanup, "Failed to remove orphaned media blob");
                }
                return Err(e);
            }
        };
        tracing::info!(name = %row.name, size = row.size, "Uploaded media file");
        Ok(self.item(row))
    }

    /// Bytes and mime type of a stored file, or `None` when it is not
    /// indexed or its blob is gone.
    pub async fn fetch(&self, name: &str) -> Result<Option<(MediaFileRow, Bytes)>> {
        validate_name(name)?;
        let Some(row) = self.index.get_media_file(name).await? else {
            return Ok(None);
        };
        let object = match self.objects.get(&Path::from(name)).await {
            Ok(object) => object,
            Err(object_store::Error::NotFound { .. }) => {
                tracing::warn!(name = %name, "Indexed media file has no blob");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Some((row, object.bytes().await?)))
    }

    /// Removes the blob and its index row. Returns `false` when the file is
    /// not indexed.
    ///
    /// Existence is decided by the index alone: S3 and the in-memory store
    /// report success when deleting a missing key.
    pub async fn remove(&self, name: &str) -> Result<bool> {
        validate_name(name)?;
        if self.index.get_media_file(name).await?.is_none() {
            return Ok(false);
        }
        match self.objects.delete(&Path::from(name)).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }
        let removed = self.index.delete_media_file(name).await?;
        tracing::info!(name = %name, "Removed media file");
        Ok(removed)
    }
}

/// `<millis>-<random7>.<ext>`; the extension comes from the uploaded file
/// name, lowercased, and defaults to `bin`.
pub fn object_key(original_name: &str) -> String {
    let ext = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_string());
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{}-{}.{}", Utc::now().timestamp_millis(), suffix, ext)
}

fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::Invalid(format!("invalid media name: {name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_keeps_lowercased_extension() {
        let key = object_key("Team Photo.PNG");
        assert!(key.ends_with(".png"), "{key}");
        let (millis, rest) = key.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(rest.len(), "abcdefg.png".len());
    }

    #[test]
    fn object_key_defaults_extension() {
        assert!(object_key("README").ends_with(".bin"));
        assert!(object_key("weird.").ends_with(".bin"));
    }

    #[test]
    fn names_with_path_segments_are_rejected() {
        assert!(validate_name("1700000000000-abcdefg.png").is_ok());
        assert!(validate_name("../secrets").is_err());
        assert!(validate_name("a/b.png").is_err());
        assert!(validate_name("").is_err());
    }
}
