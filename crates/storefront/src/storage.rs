//! Cart persistence.
//!
//! The cart survives reloads by being written, as a JSON array of line items,
//! under a single key in a durable key-value store. [`KeyValueStore`] is the
//! port; [`MemoryStore`] and [`FileStore`] are the two backends.
//!
//! [`CartPersistence`] never fails its caller: a store error is reported
//! through [`AppError`] and dropped, and a missing or unreadable value loads
//! as an empty cart.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cartkit_core::Cart;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::error::AppError;

/// Errors raised by a [`KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backing file is not a JSON object of strings.
    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The store refuses writes (quota, read-only profile, ...).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A string-to-string store scoped to one storefront origin.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-process store; contents vanish with the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every write, like a full or disabled browser store.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            entries: HashMap::new(),
            read_only: true,
        }
    }

    /// Seed a raw value, bypassing the read-only flag.
    #[must_use]
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Raw stored value, for inspection.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Unavailable("store is read-only".to_string()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// Durable store backed by a JSON object file.
///
/// Every `set` rewrites the whole file through a temporary sibling and a
/// rename. Two processes sharing a file race with last-write-wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open a store at `path`. The file is created lazily on first write.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StorageError::Corrupt(e)) => {
                warn!(path = %self.path.display(), error = %e, "Discarding corrupt storage file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// =============================================================================
// CartPersistence
// =============================================================================

/// Saves and loads the cart under one fixed key.
#[derive(Debug, Clone)]
pub struct CartPersistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> CartPersistence<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Write the cart, overwriting the previous value. Failures are reported
    /// only.
    #[instrument(skip(self, cart), fields(key = %self.key, lines = cart.len()))]
    pub fn save(&mut self, cart: &Cart) {
        let payload = match serde_json::to_string(cart) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cart");
                return;
            }
        };

        match self.store.set(&self.key, &payload) {
            Ok(()) => debug!("Cart persisted"),
            Err(e) => AppError::from(e).report(),
        }
    }

    /// Read the cart back. Absent or malformed data yields an empty cart.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn load(&self) -> Cart {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                AppError::from(e).report();
                return Cart::new();
            }
        };

        match serde_json::from_str::<Cart>(&raw) {
            Ok(cart) => {
                debug!(lines = cart.len(), "Cart restored");
                cart
            }
            Err(e) => {
                warn!(error = %e, "Persisted cart is malformed, starting empty");
                Cart::new()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cartkit_core::{Price, ProductId};
    use tempfile::TempDir;

    use super::*;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), "Pen", "1.5".parse().unwrap(), 3)
            .unwrap();
        cart.add(ProductId::new(1), "Pen", "1.5".parse().unwrap(), 3)
            .unwrap();
        cart.add(ProductId::new(4), "4K Monitor", Price::from_cents(40_000), 800)
            .unwrap();
        cart
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let mut persistence = CartPersistence::new(MemoryStore::new(), "shoppingCart");
        let cart = sample_cart();

        persistence.save(&cart);
        assert_eq!(persistence.load(), cart);
    }

    #[test]
    fn test_stored_format_matches_browser_layout() {
        let mut persistence = CartPersistence::new(MemoryStore::new(), "shoppingCart");
        persistence.save(&sample_cart());

        let raw = persistence.store().raw("shoppingCart").unwrap();
        let value: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(
            value[0],
            serde_json::json!({"id": 1, "name": "Pen", "price": 1.5, "quantity": 2, "stock": 3})
        );
    }

    #[test]
    fn test_load_absent_is_empty() {
        let persistence = CartPersistence::new(MemoryStore::new(), "shoppingCart");
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let malformed = [
            "not json",
            r#"{"id":1}"#,
            r#"[{"id":"x"}]"#,
            r#"[{"id":1,"name":"Pen","price":-2,"quantity":1,"stock":1}]"#,
        ];
        for raw in malformed {
            let store = MemoryStore::new().with_entry("shoppingCart", raw);
            let persistence = CartPersistence::new(store, "shoppingCart");
            assert!(persistence.load().is_empty(), "expected empty cart for {raw}");
        }
    }

    #[test]
    fn test_load_collapses_duplicate_lines() {
        let raw = r#"[
            {"id":1,"name":"Pen","price":1.5,"quantity":2,"stock":3},
            {"id":1,"name":"Pen","price":1.5,"quantity":1,"stock":3}
        ]"#;
        let store = MemoryStore::new().with_entry("shoppingCart", raw);
        let cart = CartPersistence::new(store, "shoppingCart").load();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let mut persistence = CartPersistence::new(MemoryStore::read_only(), "shoppingCart");
        persistence.save(&sample_cart());
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_load_of_unreadable_store_is_empty() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be cannot be read as a file
        let persistence = CartPersistence::new(FileStore::open(dir.path()), "shoppingCart");
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut persistence = CartPersistence::new(FileStore::open(&path), "shoppingCart");
        persistence.save(&sample_cart());

        let reopened = CartPersistence::new(FileStore::open(&path), "shoppingCart");
        assert_eq!(reopened.load(), sample_cart());
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");

        let mut store = FileStore::open(&path);
        store.set("theme", "dark").unwrap();
        store.set("shoppingCart", "[]").unwrap();

        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get("shoppingCart").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_file_store_recovers_from_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{ truncated").unwrap();

        let mut store = FileStore::open(&path);
        assert!(matches!(store.get("shoppingCart"), Err(StorageError::Corrupt(_))));
        store.set("shoppingCart", "[]").unwrap();
        assert_eq!(store.get("shoppingCart").unwrap().as_deref(), Some("[]"));
    }
}
