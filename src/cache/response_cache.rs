use crate::cache::error::CacheError;
use crate::utils::ensure_cache_dir_exists;
use bincode::config::{Configuration, Fixint, LittleEndian};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const DEFAULT_CACHE_STORE_NAME: &str = "VCSN_cache";
pub const DEFAULT_CACHE_TTL_SECS: i64 = 3 * 60 * 60;

const STORE_EXTENSION: &str = "bin";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheStore {
    entries: HashMap<String, CachedResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedResponse {
    stored_at: i64,
    // JSON text; serde_json::Value cannot round-trip through bincode
    body: String,
}

/// Time-limited store of JSON replies keyed by exact request URL.
///
/// Backed by a single bincode file, `<cache_dir>/<store_name>.bin`. A TTL of zero
/// or less disables reads and writes, but [`ResponseCache::clear`] still removes
/// any store left from earlier runs.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
    path: PathBuf,
    ttl_secs: i64,
}

impl ResponseCache {
    pub fn new(cache_dir: &Path, store_name: &str, ttl_secs: i64) -> Self {
        Self {
            dir: cache_dir.to_path_buf(),
            path: cache_dir.join(format!("{}.{}", store_name, STORE_EXTENSION)),
            ttl_secs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_enabled(&self) -> bool {
        self.ttl_secs > 0
    }

    /// The cached reply for `url`, if one was stored within the TTL.
    pub fn get(&self, url: &str) -> Option<Value> {
        self.get_at(url, Utc::now())
    }

    fn get_at(&self, url: &str, now: DateTime<Utc>) -> Option<Value> {
        if !self.is_enabled() {
            return None;
        }
        let store = self.load();
        let Some(entry) = store.entries.get(url) else {
            debug!("Cache miss for {}", url);
            return None;
        };
        if !self.is_fresh(entry, now) {
            debug!("Cache entry for {} has expired", url);
            return None;
        }
        match serde_json::from_str(&entry.body) {
            Ok(value) => {
                info!("Cache hit for {}", url);
                Some(value)
            }
            Err(e) => {
                warn!("Ignoring unreadable cache entry for {}: {}", url, e);
                None
            }
        }
    }

    /// Stores `reply` for `url`, dropping entries that have expired.
    pub fn put(&self, url: &str, reply: &Value) -> Result<(), CacheError> {
        self.put_at(url, reply, Utc::now())
    }

    fn put_at(&self, url: &str, reply: &Value, now: DateTime<Utc>) -> Result<(), CacheError> {
        if !self.is_enabled() {
            return Ok(());
        }
        let body = serde_json::to_string(reply).map_err(CacheError::ResponseEncode)?;

        let mut store = self.load();
        store.entries.retain(|_, entry| self.is_fresh(entry, now));
        store.entries.insert(
            url.to_string(),
            CachedResponse {
                stored_at: now.timestamp(),
                body,
            },
        );

        let bytes = bincode::serde::encode_to_vec(&store, BINCODE_CONFIG)
            .map_err(|e| CacheError::CacheEncode(Box::new(e)))?;
        ensure_cache_dir_exists(&self.dir)?;
        self.write_atomically(&bytes)
            .map_err(|e| CacheError::CacheWrite(self.path.clone(), e))?;
        debug!(
            "Cached reply for {} ({} entries in {})",
            url,
            store.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Deletes the backing store. A store that does not exist is not an error.
    pub fn clear(&self) -> Result<(), CacheError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Deleted response cache {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::CacheDeletion(self.path.clone(), e)),
        }
    }

    fn is_fresh(&self, entry: &CachedResponse, now: DateTime<Utc>) -> bool {
        let age = now.timestamp() - entry.stored_at;
        (0..self.ttl_secs).contains(&age)
    }

    fn load(&self) -> CacheStore {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return CacheStore::default(),
            Err(e) => {
                warn!("Failed to read cache {}: {}", self.path.display(), e);
                return CacheStore::default();
            }
        };
        match bincode::serde::decode_from_slice::<CacheStore, _>(&bytes, BINCODE_CONFIG) {
            Ok((store, _)) => store,
            Err(e) => {
                warn!(
                    "Cache {} is corrupt and will be rebuilt: {}",
                    self.path.display(),
                    e
                );
                CacheStore::default()
            }
        }
    }

    fn write_atomically(&self, bytes: &[u8]) -> io::Result<()> {
        let mut temp_file = NamedTempFile::new_in(&self.dir)?;
        temp_file.write_all(bytes)?;
        temp_file.flush()?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
