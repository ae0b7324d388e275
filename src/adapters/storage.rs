use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    fn locate(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }

    async fn exists(&self, path: &str) -> bool {
        self.locate(path).exists()
    }

    async fn create_dir(&self, path: &str) -> Result<()> {
        fs::create_dir_all(self.locate(path))?;
        Ok(())
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.locate(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        assert!(!storage.exists("03/doc.pdf").await);
        storage.write_file("03/doc.pdf", b"%PDF").await.unwrap();

        assert!(storage.exists("03/doc.pdf").await);
        assert_eq!(fs::read(temp_dir.path().join("03/doc.pdf")).unwrap(), b"%PDF");
        assert_eq!(storage.locate("03/doc.pdf"), temp_dir.path().join("03/doc.pdf"));
    }
}
