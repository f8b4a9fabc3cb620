//! On-disk document storage.
//!
//! Uploaded files land under a per-deal directory with a millisecond
//! timestamp prefix, so repeated uploads of the same filename never clobber
//! each other. Only metadata goes in the database; the bytes stay here.

use std::path::{Path, PathBuf};

use relieftrack_core::types::DbId;

/// Writes uploads beneath a configured root directory.
#[derive(Debug)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persist an uploaded file for a deal, returning the path it was
    /// written to: `<root>/<deal_id>/<millis>-<sanitized name>`.
    pub async fn save(
        &self,
        deal_id: DbId,
        original_name: &str,
        bytes: &[u8],
    ) -> std::io::Result<PathBuf> {
        let dir = self.root.join(deal_id.to_string());
        tokio::fs::create_dir_all(&dir).await?;

        let stamp = chrono::Utc::now().timestamp_millis();
        let path = dir.join(format!("{stamp}-{}", sanitize_filename(original_name)));
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

/// Strip any path components from a client-supplied filename and replace
/// separator characters, so a name like `../../etc/passwd` cannot escape
/// the deal's directory.
fn sanitize_filename(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    base.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[tokio::test]
    async fn test_save_writes_under_deal_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());

        let path = store.save(42, "eis2-letter.pdf", b"approved").await.unwrap();

        assert!(path.starts_with(tmp.path().join("42")));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with("-eis2-letter.pdf"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"approved");
    }

    #[tokio::test]
    async fn test_repeated_uploads_do_not_collide() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());

        let first = store.save(7, "deck.pdf", b"v1").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.save(7, "deck.pdf", b"v2").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(tokio::fs::read(&first).await.unwrap(), b"v1");
        assert_eq!(tokio::fs::read(&second).await.unwrap(), b"v2");
    }
}
