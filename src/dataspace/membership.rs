/// File-backed repository of joined data spaces
///
/// One DID per line, UTF-8, newline-terminated. Adds append (duplicates
/// are preserved), removes drop the first matching line. Writes serialize
/// under a mutex and land via write-then-rename so a failed write never
/// leaves a torn file.
use crate::error::{ConnectorError, ConnectorResult};
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;

pub struct MembershipRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl MembershipRepository {
    /// Open the repository, creating the backing file if absent
    pub async fn new(path: PathBuf) -> ConnectorResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                ConnectorError::Storage(format!("Failed to create membership directory: {}", e))
            })?;
        }

        if fs::metadata(&path).await.is_err() {
            fs::write(&path, b"").await.map_err(|e| {
                ConnectorError::Storage(format!("Failed to create membership file: {}", e))
            })?;
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// All stored data space DIDs, in insertion order
    pub async fn list(&self) -> ConnectorResult<Vec<String>> {
        let raw = fs::read_to_string(&self.path).await.map_err(|e| {
            ConnectorError::Storage(format!("Failed to read memberships: {}", e))
        })?;

        Ok(raw
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect())
    }

    /// Append a data space DID; repeated adds produce repeated lines
    pub async fn add(&self, did: &str) -> ConnectorResult<()> {
        let _guard = self.lock.lock().await;

        let mut entries = self.list().await?;
        entries.push(did.to_string());
        self.write_entries(&entries).await
    }

    /// Remove the first matching entry; a no-op when the DID is absent
    pub async fn remove(&self, did: &str) -> ConnectorResult<()> {
        let _guard = self.lock.lock().await;

        let mut entries = self.list().await?;
        let Some(position) = entries.iter().position(|entry| entry == did) else {
            return Ok(());
        };
        entries.remove(position);
        self.write_entries(&entries).await
    }

    /// Remove all entries
    pub async fn clear(&self) -> ConnectorResult<()> {
        let _guard = self.lock.lock().await;
        self.write_entries(&[]).await
    }

    async fn write_entries(&self, entries: &[String]) -> ConnectorResult<()> {
        let mut contents = entries.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, contents).await.map_err(|e| {
            ConnectorError::Storage(format!("Failed to write memberships: {}", e))
        })?;
        fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            ConnectorError::Storage(format!("Failed to replace membership file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn repository() -> (tempfile::TempDir, MembershipRepository) {
        let dir = tempdir().unwrap();
        let repo = MembershipRepository::new(dir.path().join("space-memberships.txt"))
            .await
            .unwrap();
        (dir, repo)
    }

    #[tokio::test]
    async fn test_add_then_list_contains_entry() {
        let (_dir, repo) = repository().await;

        repo.add("did:web:hub.example").await.unwrap();
        assert_eq!(repo.list().await.unwrap(), vec!["did:web:hub.example"]);
    }

    #[tokio::test]
    async fn test_remove_drops_only_first_match() {
        let (_dir, repo) = repository().await;

        repo.add("did:web:hub.example").await.unwrap();
        repo.add("did:web:hub.example").await.unwrap();
        repo.remove("did:web:hub.example").await.unwrap();

        assert_eq!(repo.list().await.unwrap(), vec!["did:web:hub.example"]);
    }

    #[tokio::test]
    async fn test_remove_absent_entry_is_a_noop() {
        let (_dir, repo) = repository().await;

        repo.add("did:web:hub.example").await.unwrap();
        repo.remove("did:web:unknown.example").await.unwrap();

        assert_eq!(repo.list().await.unwrap(), vec!["did:web:hub.example"]);
    }

    #[tokio::test]
    async fn test_duplicates_are_preserved_on_add() {
        let (_dir, repo) = repository().await;

        repo.add("did:web:hub.example").await.unwrap();
        repo.add("did:web:hub.example").await.unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let (_dir, repo) = repository().await;

        repo.add("did:web:hub.example").await.unwrap();
        repo.clear().await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());

        repo.clear().await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_is_newline_terminated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("space-memberships.txt");
        let repo = MembershipRepository::new(path.clone()).await.unwrap();

        repo.add("did:web:a.example").await.unwrap();
        repo.add("did:web:b.example").await.unwrap();

        let raw = fs::read_to_string(&path).await.unwrap();
        assert_eq!(raw, "did:web:a.example\ndid:web:b.example\n");
    }
}
