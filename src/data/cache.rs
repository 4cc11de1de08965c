use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::error::Result;
use super::model::NormalizedTable;

// ---------------------------------------------------------------------------
// SourceId – identity of one survey source
// ---------------------------------------------------------------------------

/// Identifies where a table came from, so one source normalizes once per
/// session. For files this is the canonical path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        SourceId(id.into())
    }

    /// Canonicalize so `./survey.csv` and its absolute path share one cache
    /// slot; sources that do not resolve keep their literal spelling.
    pub fn from_path(path: &Path) -> Self {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        SourceId(canonical.display().to_string())
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// NormalizedCache – one normalization per source per session
// ---------------------------------------------------------------------------

/// Session-owned memo of normalized tables, keyed by source identity.
///
/// Normalization is a pure function of the raw table, so cached values are
/// shared read-only via `Arc`. Invalidation is explicit: reloading a source
/// that changed on disk goes through [`NormalizedCache::invalidate`].
#[derive(Debug, Default)]
pub struct NormalizedCache {
    entries: BTreeMap<SourceId, Arc<NormalizedTable>>,
}

impl NormalizedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &SourceId) -> Option<Arc<NormalizedTable>> {
        self.entries.get(id).cloned()
    }

    /// Return the cached table for `id`, or run `produce` once and cache its
    /// result. A failed `produce` caches nothing.
    pub fn get_or_try_insert_with(
        &mut self,
        id: SourceId,
        produce: impl FnOnce() -> Result<NormalizedTable>,
    ) -> Result<Arc<NormalizedTable>> {
        if let Some(table) = self.entries.get(&id) {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(produce()?);
        self.entries.insert(id, Arc::clone(&table));
        Ok(table)
    }

    /// Drop one source's entry. Returns whether anything was evicted.
    pub fn invalidate(&mut self, id: &SourceId) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::SurveyError;
    use crate::data::model::{CellValue, Column};

    fn tiny_table(tag: i64) -> NormalizedTable {
        NormalizedTable {
            columns: vec![Column::new("Pipe Age", vec![CellValue::Integer(tag)])],
        }
    }

    #[test]
    fn second_lookup_reuses_the_first_result() {
        let mut cache = NormalizedCache::new();
        let id = SourceId::new("survey-a");
        let mut runs = 0;

        let first = cache
            .get_or_try_insert_with(id.clone(), || {
                runs += 1;
                Ok(tiny_table(1))
            })
            .unwrap();
        let second = cache
            .get_or_try_insert_with(id, || {
                runs += 1;
                Ok(tiny_table(2))
            })
            .unwrap();

        assert_eq!(runs, 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn sources_are_cached_independently() {
        let mut cache = NormalizedCache::new();
        cache
            .get_or_try_insert_with(SourceId::new("a"), || Ok(tiny_table(1)))
            .unwrap();
        cache
            .get_or_try_insert_with(SourceId::new("b"), || Ok(tiny_table(2)))
            .unwrap();
        assert_eq!(cache.len(), 2);
        assert_ne!(
            cache.get(&SourceId::new("a")).unwrap().columns,
            cache.get(&SourceId::new("b")).unwrap().columns
        );
    }

    #[test]
    fn invalidate_forces_a_recompute() {
        let mut cache = NormalizedCache::new();
        let id = SourceId::new("survey-a");
        cache
            .get_or_try_insert_with(id.clone(), || Ok(tiny_table(1)))
            .unwrap();

        assert!(cache.invalidate(&id));
        assert!(!cache.invalidate(&id));

        let mut runs = 0;
        cache
            .get_or_try_insert_with(id, || {
                runs += 1;
                Ok(tiny_table(3))
            })
            .unwrap();
        assert_eq!(runs, 1);
    }

    #[test]
    fn clear_drops_every_source() {
        let mut cache = NormalizedCache::new();
        cache
            .get_or_try_insert_with(SourceId::new("a"), || Ok(tiny_table(1)))
            .unwrap();
        cache
            .get_or_try_insert_with(SourceId::new("b"), || Ok(tiny_table(2)))
            .unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&SourceId::new("a")).is_none());
    }

    #[test]
    fn failed_normalization_is_not_cached() {
        let mut cache = NormalizedCache::new();
        let id = SourceId::new("survey-a");

        let err = cache.get_or_try_insert_with(id.clone(), || {
            Err(SurveyError::DuplicateColumn {
                column: "Depth (mm)".into(),
            })
        });
        assert!(err.is_err());
        assert!(cache.is_empty());

        cache
            .get_or_try_insert_with(id, || Ok(tiny_table(1)))
            .unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn relative_and_absolute_paths_share_an_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.csv");
        std::fs::write(&path, "Stationing (m)\n0\n").unwrap();

        let absolute = SourceId::from_path(&path);
        let via_parent = SourceId::from_path(&dir.path().join(".").join("survey.csv"));
        assert_eq!(absolute, via_parent);
    }
}
