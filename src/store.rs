use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// A stored document: field name -> value.
pub type Document = HashMap<String, String>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value persistence keyed by (collection, key).
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when nothing was ever stored under the key.
    fn retrieve(
        &self,
        collection: &str,
        key: &str,
    ) -> impl Future<Output = Result<Option<Document>, StoreError>> + Send;

    /// Replaces the whole document stored under the key.
    fn upsert(
        &self,
        collection: &str,
        key: &str,
        document: Document,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<(String, String), Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn retrieve(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .get(&(collection.to_string(), key.to_string()))
            .cloned())
    }

    async fn upsert(&self, collection: &str, key: &str, document: Document) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        documents.insert((collection.to_string(), key.to_string()), document);
        Ok(())
    }
}

// collection -> key -> document
type FileContents = BTreeMap<String, BTreeMap<String, Document>>;

/// Keeps every collection in a single pretty-printed JSON file.
///
/// The whole file is rewritten on each upsert (via a temporary file and a
/// rename), so it is only meant for a single bot process.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    file_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_contents(&self) -> Result<FileContents, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(FileContents::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(FileContents::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_contents(&self, contents: &FileContents) -> Result<(), StoreError> {
        let serialized = serde_json::to_string_pretty(contents)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized).await?;
        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    async fn retrieve(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        let _guard = self.file_lock.lock().await;
        let mut contents = self.read_contents().await?;
        Ok(contents
            .get_mut(collection)
            .and_then(|documents| documents.remove(key)))
    }

    async fn upsert(&self, collection: &str, key: &str, document: Document) -> Result<(), StoreError> {
        let _guard = self.file_lock.lock().await;
        let mut contents = self.read_contents().await?;
        contents
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), document);
        self.write_contents(&contents).await?;
        debug!(path = ?self.path, collection, key, "Wrote document");
        Ok(())
    }
}
