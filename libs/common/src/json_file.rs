//! JSON file backed record store
//!
//! Each collection lives in a single file holding a versioned envelope:
//!
//! ```json
//! {"version": 1, "kind": "user", "records": [ ... ]}
//! ```
//!
//! Every operation re-reads the file, so the file stays the only source of
//! truth. All handles opened on the same file within a process share one
//! lock; mutations hold it for the whole read-modify-write cycle. New
//! contents land in a uniquely named temporary file in the same directory
//! that is renamed over the target, so a crash mid-write leaves the previous
//! collection intact.
//!
//! The lock is per process. Two processes must not share a data directory.

use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::{fs, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::{StoreError, StoreResult},
    record::Record,
    store,
    store::RecordStore,
};

/// Current on-disk schema version
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Deserialize)]
struct Header {
    version: u32,
    kind: String,
}

#[derive(Deserialize)]
struct Envelope<R> {
    records: Vec<R>,
}

#[derive(Serialize)]
struct EnvelopeRef<'a, R> {
    version: u32,
    kind: &'a str,
    records: &'a [R],
}

/// Lock shared by every handle on one canonical file path
fn shared_lock(canonical: &Path) -> Arc<RwLock<()>> {
    static LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<RwLock<()>>>>> = OnceLock::new();

    let mut locks = LOCKS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    locks.entry(canonical.to_path_buf()).or_default().clone()
}

/// Record store persisted as one JSON file
#[derive(Debug)]
pub struct JsonFileStore<R> {
    path: PathBuf,
    dir: PathBuf,
    lock: Arc<RwLock<()>>,
    _records: std::marker::PhantomData<fn() -> R>,
}

impl<R: Record> JsonFileStore<R> {
    /// Open a store backed by `path`, creating the parent directory if needed.
    ///
    /// The file itself is only created by the first mutation; until then the
    /// collection reads as empty.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).await.map_err(io_err(&dir))?;

        let canonical = fs::canonicalize(&dir)
            .await
            .map_err(io_err(&dir))?
            .join(path.file_name().unwrap_or_default());

        info!("Opened {} store at {}", R::KIND, canonical.display());

        Ok(Self {
            path,
            dir,
            lock: shared_lock(&canonical),
            _records: std::marker::PhantomData,
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StoreResult<Vec<R>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(&self.path)(e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let header: Header =
            serde_json::from_slice(&bytes).map_err(|source| self.corrupt(source))?;
        if header.version != SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion {
                path: self.path.clone(),
                found: header.version,
                expected: SCHEMA_VERSION,
            });
        }
        if header.kind != R::KIND {
            return Err(StoreError::KindMismatch {
                path: self.path.clone(),
                found: header.kind,
                expected: R::KIND,
            });
        }

        let envelope: Envelope<R> =
            serde_json::from_slice(&bytes).map_err(|source| self.corrupt(source))?;

        debug!(
            "Loaded {} {} records from {}",
            envelope.records.len(),
            R::KIND,
            self.path.display()
        );
        Ok(envelope.records)
    }

    async fn persist(&self, records: &[R]) -> StoreResult<()> {
        let envelope = EnvelopeRef {
            version: SCHEMA_VERSION,
            kind: R::KIND,
            records,
        };
        let bytes = serde_json::to_vec_pretty(&envelope).map_err(StoreError::Serialize)?;

        let dir = self.dir.clone();
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &path, &bytes))
            .await
            .map_err(|e| StoreError::Io {
                path: self.path.clone(),
                source: std::io::Error::other(e),
            })??;

        debug!(
            "Wrote {} {} records to {}",
            records.len(),
            R::KIND,
            self.path.display()
        );
        Ok(())
    }

    fn corrupt(&self, source: serde_json::Error) -> StoreError {
        StoreError::Corrupt {
            path: self.path.clone(),
            source,
        }
    }
}

/// Write `bytes` to a fresh temporary file in `dir`, flush it, rename it over
/// `path` and flush the directory entry. The temporary file is removed if any
/// step before the rename fails.
fn write_atomically(dir: &Path, path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err(dir))?;
    tmp.write_all(bytes).map_err(io_err(tmp.path()))?;
    tmp.as_file().sync_all().map_err(io_err(tmp.path()))?;

    tmp.persist(path).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    sync_dir(dir)
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> StoreResult<()> {
    std::fs::File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(io_err(dir))
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> StoreResult<()> {
    Ok(())
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

#[async_trait]
impl<R: Record> RecordStore<R> for JsonFileStore<R> {
    async fn append(&self, record: R) -> StoreResult<R> {
        let _guard = self.lock.write().await;
        let mut records = self.load().await?;
        let created = store::append(&mut records, record)?;
        self.persist(&records).await?;

        info!("Appended {} {}", R::KIND, created.id());
        Ok(created)
    }

    async fn list_all(&self) -> StoreResult<Vec<R>> {
        let _guard = self.lock.read().await;
        self.load().await
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<R> {
        let _guard = self.lock.read().await;
        let records = self.load().await?;
        store::find(&records, id)
    }

    async fn replace(&self, id: Uuid, record: R) -> StoreResult<R> {
        let _guard = self.lock.write().await;
        let mut records = self.load().await?;
        let old = store::replace(&mut records, id, record)?;
        self.persist(&records).await?;

        info!("Replaced {} {}", R::KIND, id);
        Ok(old)
    }

    async fn remove(&self, id: Uuid) -> StoreResult<R> {
        let _guard = self.lock.write().await;
        let mut records = self.load().await?;
        let removed = store::remove(&mut records, id)?;
        self.persist(&records).await?;

        info!("Removed {} {}", R::KIND, id);
        Ok(removed)
    }
}
