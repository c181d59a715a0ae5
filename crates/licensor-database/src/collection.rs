//! A JSON-serialized collection held in memory and optionally mirrored to a file.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info};

use licensor_core::error::{AppError, ErrorKind};
use licensor_core::result::AppResult;

/// An ordered collection of records.
///
/// Mutations run against a copy; the copy is written to disk first and only
/// swapped in once the write has completed, so a failed write leaves the
/// previous contents visible to readers.
#[derive(Debug)]
pub struct JsonCollection<T> {
    name: &'static str,
    path: Option<PathBuf>,
    items: RwLock<Vec<T>>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// A collection that lives only in process memory.
    pub fn in_memory(name: &'static str) -> Self {
        Self {
            name,
            path: None,
            items: RwLock::new(Vec::new()),
        }
    }

    /// Open `{dir}/{name}.json`, creating the directory if needed.
    ///
    /// A missing file is an empty collection.
    pub async fn open(name: &'static str, dir: &Path) -> AppResult<Self> {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create data directory {}", dir.display()),
                e,
            )
        })?;

        let path = dir.join(format!("{name}.json"));
        let items = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Serialization,
                    format!("Failed to parse {}", path.display()),
                    e,
                )
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read {}", path.display()),
                    e,
                ));
            }
        };

        info!(collection = name, path = %path.display(), records = items.len(), "Opened collection");

        Ok(Self {
            name,
            path: Some(path),
            items: RwLock::new(items),
        })
    }

    /// Collection name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// A copy of every record.
    pub async fn snapshot(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    /// Run a read-only query against the records.
    pub async fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let items = self.items.read().await;
        f(&items)
    }

    /// Apply `f` to a copy of the records, persist it, then publish it.
    ///
    /// If `f` returns an error nothing is written.
    pub async fn mutate<R>(&self, f: impl FnOnce(&mut Vec<T>) -> AppResult<R>) -> AppResult<R> {
        let mut items = self.items.write().await;
        let mut next = items.clone();
        let out = f(&mut next)?;
        self.persist(&next).await?;
        *items = next;
        Ok(out)
    }

    /// Replace every record.
    pub async fn replace(&self, records: Vec<T>) -> AppResult<()> {
        let mut items = self.items.write().await;
        self.persist(&records).await?;
        *items = records;
        Ok(())
    }

    /// Write the backing file if it does not exist yet. Returns whether a
    /// file was created.
    pub async fn ensure_file(&self) -> AppResult<bool> {
        let Some(path) = &self.path else {
            return Ok(false);
        };
        if tokio::fs::try_exists(path).await? {
            return Ok(false);
        }
        let items = self.items.read().await;
        self.persist(&items).await?;
        debug!(collection = self.name, "Created empty collection file");
        Ok(true)
    }

    async fn persist(&self, records: &[T]) -> AppResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(records)?;
        let tmp = path.with_extension("json.tmp");

        let write = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(&bytes).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp, path).await
        };

        if let Err(e) = write.await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write {}", path.display()),
                e,
            ));
        }

        debug!(collection = self.name, records = records.len(), "Persisted collection");
        Ok(())
    }
}
