use crate::domain::ports::Storage;
use crate::utils::error::{AppError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn append_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(full_path)
            .await?;
        file.write_all(data).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Append-only JSON-lines collections, one `<collection>.jsonl` file each.
#[derive(Debug, Clone)]
pub struct RecordStore<S: Storage> {
    storage: S,
}

impl<S: Storage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn file_name(collection: &str) -> String {
        format!("{}.jsonl", collection)
    }

    pub async fn append<T: Serialize>(&self, collection: &str, record: &T) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        self.storage
            .append_file(&Self::file_name(collection), &line)
            .await
            .map_err(|e| AppError::Storage {
                message: format!("failed to append to '{}': {}", collection, e),
            })?;

        tracing::debug!(collection, bytes = line.len(), "Stored record");
        Ok(())
    }

    /// Every record of a collection; a collection never written to is empty.
    pub async fn read_all<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        let data = match self.storage.read_file(&Self::file_name(collection)).await {
            Ok(data) => data,
            Err(AppError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        data.split(|b| *b == b'\n')
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_slice(line).map_err(AppError::from))
            .collect()
    }
}
