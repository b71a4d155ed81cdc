//! Single-entry memo of the merged table, keyed by input identity.
//!
//! Re-rendering with new filters should not reparse the inputs. The cache
//! holds at most one result; asking for a different input replaces it.
//! Failed loads are never stored.

use crate::config::LoaderConfig;
use crate::error::Result;
use crate::loader::load_and_merge;
use crate::source::{RatingsSource, SourceFingerprint};
use crate::types::MergedTable;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// What a cached table was computed from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: SourceFingerprint,
    pub genre_dir: PathBuf,
}

impl CacheKey {
    pub fn new(source: &RatingsSource, config: &LoaderConfig) -> Result<Self> {
        Ok(Self {
            source: source.fingerprint()?,
            genre_dir: config.genre_dir.clone(),
        })
    }
}

#[derive(Debug, Default)]
pub struct MergeCache {
    entry: Option<(CacheKey, Arc<MergedTable>)>,
    hits: u64,
    misses: u64,
}

impl MergeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the merged table for these inputs, loading it on a miss
    pub fn get_or_load(
        &mut self,
        source: &RatingsSource,
        config: &LoaderConfig,
    ) -> Result<Arc<MergedTable>> {
        let key = CacheKey::new(source, config)?;
        self.get_or_try_insert_with(key, || load_and_merge(source, config))
    }

    /// Return the entry for `key`, or compute and store it.
    ///
    /// An error from `load` leaves the cache empty.
    pub fn get_or_try_insert_with<F>(&mut self, key: CacheKey, load: F) -> Result<Arc<MergedTable>>
    where
        F: FnOnce() -> Result<MergedTable>,
    {
        if let Some((cached_key, table)) = &self.entry {
            if *cached_key == key {
                self.hits += 1;
                debug!(hits = self.hits, "Merge cache hit");
                return Ok(Arc::clone(table));
            }
        }

        self.misses += 1;
        debug!(misses = self.misses, "Merge cache miss");
        self.entry = None;

        let table = Arc::new(load()?);
        self.entry = Some((key, Arc::clone(&table)));
        Ok(table)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_cached(&self, key: &CacheKey) -> bool {
        matches!(&self.entry, Some((cached, _)) if cached == key)
    }

    /// (hits, misses) since creation
    pub fn counts(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataLoadError;
    use crate::source::Upload;
    use crate::types::{LoadStats, MergedRecord};
    use std::cell::Cell;

    fn key_for(content: &str) -> CacheKey {
        let source = RatingsSource::Upload(Upload::new("ratings.csv", content));
        CacheKey::new(&source, &LoaderConfig::default()).unwrap()
    }

    fn table_with(title: &str) -> MergedTable {
        MergedTable::new(
            vec![MergedRecord {
                title: title.to_string(),
                year: 2010,
                rating: 4.0,
                genre: "Drama".to_string(),
                date: None,
                letterboxd_uri: None,
            }],
            LoadStats::default(),
        )
    }

    #[test]
    fn test_same_key_reuses_result() {
        let mut cache = MergeCache::new();
        let loads = Cell::new(0);

        for _ in 0..3 {
            let table = cache
                .get_or_try_insert_with(key_for("a"), || {
                    loads.set(loads.get() + 1);
                    Ok(table_with("First"))
                })
                .unwrap();
            assert_eq!(table.records[0].title, "First");
        }

        assert_eq!(loads.get(), 1);
        assert_eq!(cache.counts(), (2, 1));
    }

    #[test]
    fn test_new_key_replaces_entry() {
        let mut cache = MergeCache::new();
        cache
            .get_or_try_insert_with(key_for("a"), || Ok(table_with("First")))
            .unwrap();

        let table = cache
            .get_or_try_insert_with(key_for("b"), || Ok(table_with("Second")))
            .unwrap();

        assert_eq!(table.records[0].title, "Second");
        assert!(cache.is_cached(&key_for("b")));
        assert!(!cache.is_cached(&key_for("a")));
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache = MergeCache::new();
        let result = cache.get_or_try_insert_with(key_for("a"), || Err(DataLoadError::NoMatches));
        assert!(result.is_err());
        assert!(!cache.is_cached(&key_for("a")));

        let table = cache
            .get_or_try_insert_with(key_for("a"), || Ok(table_with("Retry")))
            .unwrap();
        assert_eq!(table.records[0].title, "Retry");
    }
}
