use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Process-wide scratch directory handing out one uniquely named slot per upload.
///
/// Slots are created with `O_EXCL` semantics so concurrent requests never
/// share a path, and every slot removes itself from disk when dropped.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reserves a fresh slot, creating the staging directory if needed.
    ///
    /// `suffix` is appended to the generated name (e.g. `.png`).
    pub async fn acquire(&self, suffix: &str) -> io::Result<StagingSlot> {
        tokio::fs::create_dir_all(&self.root).await?;

        let root = self.root.clone();
        let suffix = suffix.to_string();
        let (file, path) = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix("upload-")
                .suffix(&suffix)
                .tempfile_in(&root)
        })
        .await
        .map_err(io::Error::other)??
        .into_parts();

        Ok(StagingSlot {
            file: File::from_std(file),
            path,
            size: 0,
        })
    }
}

/// A slot that is still being written.
pub struct StagingSlot {
    file: File,
    path: TempPath,
    size: u64,
}

impl StagingSlot {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.file.write_all(chunk).await?;
        self.size += chunk.len() as u64;
        Ok(())
    }

    /// Flushes the slot and turns it into a [`StagedFile`].
    pub async fn finish(mut self, content_type: Option<String>) -> io::Result<StagedFile> {
        self.file.flush().await?;
        drop(self.file);

        Ok(StagedFile {
            path: self.path,
            size: self.size,
            content_type,
        })
    }
}

/// An accepted upload sitting in transient storage.
///
/// Owned by exactly one request. The file is deleted either by
/// [`StagedFile::read_and_release`] or, on any other exit path, when the
/// value is dropped.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
    size: u64,
    content_type: Option<String>,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Reads the whole file and deletes it right away.
    ///
    /// Deletion failures are logged and otherwise ignored; the read result
    /// alone decides the outcome.
    pub async fn read_and_release(self) -> io::Result<Vec<u8>> {
        // On a read error `self` is dropped here, which still removes the file
        let bytes = tokio::fs::read(&self.path).await?;

        let path = self.path.to_path_buf();
        match self.path.close() {
            Ok(()) => tracing::debug!("Released staged file {}", path.display()),
            Err(e) => tracing::warn!("Failed to delete staged file {}: {}", path.display(), e),
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn stage(area: &StagingArea, data: &[u8]) -> StagedFile {
        let mut slot = area.acquire(".png").await.unwrap();
        slot.write_chunk(data).await.unwrap();
        slot.finish(Some("image/png".into())).await.unwrap()
    }

    #[tokio::test]
    async fn test_directory_created_on_demand() {
        let tmp = tempfile::tempdir().unwrap();
        let area = StagingArea::new(tmp.path().join("nested").join("staging"));
        assert!(!area.root().exists());

        let staged = stage(&area, b"abc").await;
        assert!(area.root().is_dir());
        assert!(staged.path().starts_with(area.root()));
        assert_eq!(staged.path().extension().unwrap(), "png");
    }

    #[tokio::test]
    async fn test_read_and_release_deletes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let area = StagingArea::new(tmp.path());

        let staged = stage(&area, b"\x89PNG fake image").await;
        let path = staged.path().to_path_buf();
        assert_eq!(staged.size(), 15);
        assert_eq!(staged.content_type(), Some("image/png"));
        assert!(path.exists());

        let bytes = staged.read_and_release().await.unwrap();
        assert_eq!(bytes, b"\x89PNG fake image");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_drop_without_read_deletes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let area = StagingArea::new(tmp.path());

        let staged = stage(&area, b"orphan").await;
        let path = staged.path().to_path_buf();
        drop(staged);
        assert!(!path.exists());

        // A slot abandoned mid-write is also reclaimed
        let mut slot = area.acquire(".jpg").await.unwrap();
        slot.write_chunk(b"partial").await.unwrap();
        let slot_path = slot.path().to_path_buf();
        drop(slot);
        assert!(!slot_path.exists());

        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_read_failure_still_releases() {
        let tmp = tempfile::tempdir().unwrap();
        let area = StagingArea::new(tmp.path());

        let staged = stage(&area, b"data").await;
        let path = staged.path().to_path_buf();
        std::fs::remove_file(&path).unwrap();

        assert!(staged.read_and_release().await.is_err());
        assert!(!path.exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_slots_never_collide() {
        let tmp = tempfile::tempdir().unwrap();
        let area = StagingArea::new(tmp.path());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let area = area.clone();
                tokio::spawn(async move {
                    let mut slot = area.acquire(".jpg").await.unwrap();
                    slot.write_chunk(format!("image-{i}").as_bytes()).await.unwrap();
                    slot.finish(None).await.unwrap()
                })
            })
            .collect();

        let mut staged = Vec::new();
        for handle in handles {
            staged.push(handle.await.unwrap());
        }

        let paths: HashSet<PathBuf> = staged.iter().map(|s| s.path().to_path_buf()).collect();
        assert_eq!(paths.len(), 32);

        drop(staged);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
