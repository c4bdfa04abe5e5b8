use std::{
    collections::HashMap,
    hash::Hash,
    path::{Path, PathBuf},
};

use dashmap::DashMap;
use rand::Rng;
use serde::{de::DeserializeOwned, Serialize};

use crate::Error;

/// A record kept in a [`Store`].
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Name of the record kind, used as directory name and in error messages.
    const KIND: &'static str;

    fn id(&self) -> u64;
}

/// Keyed records of one kind.
///
/// With a data directory, every record is mirrored to
/// `<data_dir>/<kind>/<id>.toml` on each write and loaded back on open.
pub struct Store<T> {
    inner: DashMap<u64, T>,
    dir: Option<PathBuf>,
}

impl<T: Record> Store<T> {
    /// Largest id handed out, TOML integers are signed 64 bits.
    const MAX_ID: u64 = i64::MAX as u64;

    pub fn in_memory() -> Self {
        Self {
            inner: DashMap::new(),
            dir: None,
        }
    }

    /// Opens the store under `data_dir`, loading every readable record.
    /// Unreadable files are skipped with a warning.
    pub fn open(data_dir: Option<&Path>) -> Result<Self, Error> {
        let Some(root) = data_dir else {
            return Ok(Self::in_memory());
        };

        let dir = root.join(T::KIND);
        std::fs::create_dir_all(&dir)?;

        let inner = DashMap::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().map_or(true, |ext| ext != "toml") {
                continue;
            }

            match std::fs::read_to_string(&path)
                .map_err(Error::from)
                .and_then(|s| toml::from_str::<T>(&s).map_err(Error::from))
            {
                Ok(record) => {
                    inner.insert(record.id(), record);
                }
                Err(err) => {
                    tracing::warn!("skipping {} record {}: {err}", T::KIND, path.display())
                }
            }
        }

        tracing::info!("loaded {} {} records", inner.len(), T::KIND);
        Ok(Self {
            inner,
            dir: Some(dir),
        })
    }

    /// A random id not used by any record of this store.
    pub fn next_id(&self) -> u64 {
        let mut rng = rand::thread_rng();
        loop {
            let id = rng.gen_range(1..=Self::MAX_ID);
            if !self.inner.contains_key(&id) {
                return id;
            }
        }
    }

    /// Insert or replace a record.
    pub fn insert(&self, record: T) {
        self.save(&record);
        self.inner.insert(record.id(), record);
    }

    #[inline]
    pub fn get(&self, id: u64) -> Option<T> {
        self.inner.get(&id).map(|e| e.value().clone())
    }

    /// Get a record or [`Error::NotFound`].
    #[inline]
    pub fn try_get(&self, id: u64) -> Result<T, Error> {
        self.get(id).ok_or(Error::NotFound(T::KIND))
    }

    /// Reads a record in place.
    #[inline]
    pub fn with<R>(&self, id: u64, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.inner.get(&id).map(|e| f(e.value()))
    }

    #[inline]
    pub fn contains(&self, id: u64) -> bool {
        self.inner.contains_key(&id)
    }

    /// Mutates a record in place and saves it if `f` succeeds.
    ///
    /// `f` must leave the record untouched when it fails.
    /// Other records of this store must not be accessed from inside `f`.
    pub fn update<R>(&self, id: u64, f: impl FnOnce(&mut T) -> Result<R, Error>) -> Result<R, Error> {
        let mut entry = self.inner.get_mut(&id).ok_or(Error::NotFound(T::KIND))?;
        let result = f(entry.value_mut())?;
        self.save(entry.value());
        Ok(result)
    }

    pub fn remove(&self, id: u64) -> Option<T> {
        let (_, record) = self.inner.remove(&id)?;
        self.delete_file(id);
        Some(record)
    }

    /// Clones of all records matching `pred`, in no particular order.
    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.inner
            .iter()
            .filter(|e| pred(e.value()))
            .map(|e| e.value().clone())
            .collect()
    }

    /// Clones of all records, in no particular order.
    #[inline]
    pub fn snapshot(&self) -> Vec<T> {
        self.filter(|_| true)
    }

    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.inner
            .iter()
            .find(|e| pred(e.value()))
            .map(|e| e.value().clone())
    }

    pub fn count(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.inner.iter().filter(|e| pred(e.value())).count()
    }

    /// Counts records per `key`.
    pub fn tally<K: Hash + Eq>(&self, key: impl Fn(&T) -> K) -> HashMap<K, usize> {
        let mut counts = HashMap::new();
        for e in self.inner.iter() {
            *counts.entry(key(e.value())).or_insert(0) += 1;
        }
        counts
    }

    /// Removes every record not matching `keep`, returning how many were removed.
    pub fn retain(&self, keep: impl Fn(&T) -> bool) -> usize {
        let doomed: Vec<u64> = self
            .inner
            .iter()
            .filter(|e| !keep(e.value()))
            .map(|e| *e.key())
            .collect();

        doomed
            .into_iter()
            .filter(|id| self.remove(*id).is_some())
            .count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn path(&self, id: u64) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(format!("{id}.toml")))
    }

    fn save(&self, record: &T) {
        let Some(path) = self.path(record.id()) else {
            return;
        };

        let result = toml::to_string(record)
            .map_err(Error::from)
            .and_then(|s| std::fs::write(&path, s).map_err(Error::from));
        if let Err(err) = result {
            tracing::error!("failed to save {} record {}: {err}", T::KIND, path.display());
        }
    }

    fn delete_file(&self, id: u64) {
        if let Some(path) = self.path(id) {
            if let Err(err) = std::fs::remove_file(&path) {
                tracing::error!("failed to remove {} record {}: {err}", T::KIND, path.display());
            }
        }
    }
}
