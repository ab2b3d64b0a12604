//! Module: cache
//! Responsibility: memoize compiled processors by fingerprint or by name so
//! each key is built at most once.
//! Does not own: fingerprint derivation or processor construction.

mod item;


use crate::{error::ErrorClass, fingerprint::Fingerprint};
use std::{
    any::Any,
    collections::HashMap,
    fmt,
    sync::{
        Arc, Mutex, PoisonError, RwLock,
        atomic::{AtomicUsize, Ordering},
    },
};
use thiserror::Error as ThisError;

// re-exports
pub use item::{CacheItem, CacheMode};

type Entry = Arc<dyn Any + Send + Sync>;

///
/// CacheError
///

#[derive(Debug, ThisError)]
pub enum CacheError {
    #[error("cache entry '{key}' does not hold a {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}

impl CacheError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::TypeMismatch { .. } => ErrorClass::Conflict,
        }
    }
}

///
/// ProcessorKey
///
/// Fingerprint keys and caller-chosen names live in separate namespaces.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ProcessorKey {
    Fingerprint(Fingerprint),
    Name(String),
}

impl fmt::Display for ProcessorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fingerprint(fingerprint) => write!(f, "fingerprint:{fingerprint}"),
            Self::Name(name) => write!(f, "name:{name}"),
        }
    }
}

///
/// CacheStats
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub builds: usize,
    pub size: usize,
}

///
/// ProcessorCache
///
/// Type-erased processor store. Lookups share a read lock; builds for one
/// key serialize on a per-key gate and re-check before building. Entries
/// are never evicted.
///

#[derive(Default)]
pub struct ProcessorCache {
    entries: RwLock<HashMap<ProcessorKey, Entry>>,
    gates: Mutex<HashMap<ProcessorKey, Arc<Mutex<()>>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
    builds: AtomicUsize,
}

impl ProcessorCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an existing processor without building.
    pub fn get<P>(&self, key: &ProcessorKey) -> Result<Option<Arc<P>>, CacheError>
    where
        P: Any + Send + Sync,
    {
        let entry = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned();

        entry.map(|entry| downcast(key, entry)).transpose()
    }

    /// Return the processor stored under `key`, building it on first use.
    ///
    /// Racing callers for one key block on the key's gate; exactly one runs
    /// `build` and the rest receive its result. A failed build is returned to
    /// its caller only and leaves the key empty.
    pub fn get_or_build<P, E, B>(&self, key: ProcessorKey, build: B) -> Result<Arc<P>, E>
    where
        P: Any + Send + Sync,
        E: From<CacheError>,
        B: FnOnce() -> Result<P, E>,
    {
        if let Some(found) = self.get::<P>(&key)? {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(key = %key, "processor cache hit");

            return Ok(found);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);

        let gate = self.gate(&key);
        let _guard = gate.lock().unwrap_or_else(PoisonError::into_inner);

        // another caller may have finished the build while we waited
        if let Some(found) = self.get::<P>(&key)? {
            return Ok(found);
        }

        tracing::debug!(
            key = %key,
            processor = std::any::type_name::<P>(),
            "processor cache miss; building"
        );

        let processor = match build() {
            Ok(processor) => Arc::new(processor),
            Err(err) => {
                tracing::warn!(key = %key, "processor build failed; key left empty");
                return Err(err);
            }
        };
        self.builds.fetch_add(1, Ordering::Relaxed);

        let entry: Entry = processor.clone();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), entry);

        // the entry is visible now, later callers never reach the gate
        self.gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);

        Ok(processor)
    }

    #[must_use]
    pub fn contains(&self, key: &ProcessorKey) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Statistics are best-effort only.
    // Relaxed atomics are sufficient because stats are not used for correctness.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
            size: self.len(),
        }
    }

    fn gate(&self, key: &ProcessorKey) -> Arc<Mutex<()>> {
        self.gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.clone())
            .or_default()
            .clone()
    }
}

impl fmt::Debug for ProcessorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

fn downcast<P>(key: &ProcessorKey, entry: Entry) -> Result<Arc<P>, CacheError>
where
    P: Any + Send + Sync,
{
    entry.downcast::<P>().map_err(|_| CacheError::TypeMismatch {
        key: key.to_string(),
        expected: std::any::type_name::<P>(),
    })
}
