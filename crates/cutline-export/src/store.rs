//! Media and output collaborators for the export pipeline.
//!
//! The pipeline never talks to storage directly: sources come in through a
//! [`MediaResolver`] and the finished artifact leaves through an
//! [`OutputStore`], so the surrounding system decides where bytes live.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use cutline_core::{CutlineError, Result};
use uuid::Uuid;

/// A resolved media reference.
#[derive(Debug, Clone)]
pub struct ResolvedMedia {
    /// Where the source bytes can be fetched from.
    pub url: String,
    /// Full source duration in frames.
    pub duration_frames: i64,
}

/// Resolves and fetches source media referenced by clips.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Resolve a media ID to a fetchable location.
    async fn resolve(&self, media_id: &str) -> Result<ResolvedMedia>;

    /// Fetch the resolved media into a local file.
    async fn fetch(&self, media: &ResolvedMedia, dest: &Path) -> Result<()>;
}

/// Destination for the finished export artifact.
#[async_trait]
pub trait OutputStore: Send + Sync {
    /// Persist the artifact, returning its reference ID. A retried export
    /// may call this again and overwrite a prior marker for the same job.
    async fn persist(&self, artifact: &Path) -> Result<String>;
}

// ── In-memory resolver (tests, headless use) ────────────────────────

/// Media resolver backed by in-memory byte buffers.
#[derive(Default)]
pub struct MemoryMediaStore {
    media: Mutex<HashMap<String, (Vec<u8>, i64)>>,
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a media asset.
    pub fn insert(&self, media_id: impl Into<String>, bytes: Vec<u8>, duration_frames: i64) {
        self.media
            .lock()
            .expect("media store lock")
            .insert(media_id.into(), (bytes, duration_frames));
    }
}

#[async_trait]
impl MediaResolver for MemoryMediaStore {
    async fn resolve(&self, media_id: &str) -> Result<ResolvedMedia> {
        let media = self.media.lock().expect("media store lock");
        let (_, duration) = media
            .get(media_id)
            .ok_or_else(|| CutlineError::NotFound(media_id.to_string()))?;
        Ok(ResolvedMedia {
            url: format!("memory://{media_id}"),
            duration_frames: *duration,
        })
    }

    async fn fetch(&self, media: &ResolvedMedia, dest: &Path) -> Result<()> {
        let media_id = media
            .url
            .strip_prefix("memory://")
            .ok_or_else(|| CutlineError::Transport(format!("unexpected url: {}", media.url)))?;
        let bytes = {
            let store = self.media.lock().expect("media store lock");
            store
                .get(media_id)
                .map(|(bytes, _)| bytes.clone())
                .ok_or_else(|| CutlineError::Transport(format!("fetch failed: {media_id}")))?
        };
        tokio::fs::write(dest, bytes).await?;
        Ok(())
    }
}

// ── Directory-backed output store ───────────────────────────────────

/// Output store that moves artifacts into a directory.
pub struct DirectoryOutputStore {
    dir: PathBuf,
}

impl DirectoryOutputStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path an artifact with the given ID would live at.
    pub fn artifact_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.mp4"))
    }
}

#[async_trait]
impl OutputStore for DirectoryOutputStore {
    async fn persist(&self, artifact: &Path) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let dest = self.artifact_path(&id);
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::copy(artifact, &dest)
            .await
            .map_err(|e| CutlineError::Transport(format!("persist failed: {e}")))?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_resolves_and_fetches() {
        let store = MemoryMediaStore::new();
        store.insert("clip-a", b"fake video bytes".to_vec(), 300);

        let media = store.resolve("clip-a").await.unwrap();
        assert_eq!(media.duration_frames, 300);

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("clip-a.mp4");
        store.fetch(&media, &dest).await.unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"fake video bytes");
    }

    #[tokio::test]
    async fn unknown_media_is_not_found() {
        let store = MemoryMediaStore::new();
        assert!(matches!(
            store.resolve("missing").await,
            Err(CutlineError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn directory_output_persists_artifact() {
        let src_dir = tempfile::tempdir().unwrap();
        let artifact = src_dir.path().join("out.mp4");
        std::fs::write(&artifact, b"encoded").unwrap();

        let out_dir = tempfile::tempdir().unwrap();
        let store = DirectoryOutputStore::new(out_dir.path());
        let id = store.persist(&artifact).await.unwrap();
        assert_eq!(std::fs::read(store.artifact_path(&id)).unwrap(), b"encoded");
    }
}
