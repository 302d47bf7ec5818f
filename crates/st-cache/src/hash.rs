//! Content-based fingerprinting of cached result sets.

use sha2::{Digest, Sha256};
use st_core::{ProjectId, ResultSetId};

use crate::store::MemoryCacheStore;
use crate::types::CacheEntry;

/// Hash a result set's entries into a stable hex fingerprint.
///
/// Entries arrive in key order from the store and values are hashed by bit
/// pattern, so two rebuilds over identical input produce identical
/// fingerprints.
pub fn compute_cache_fingerprint(
    store: &MemoryCacheStore,
    project: ProjectId,
    result_set: ResultSetId,
) -> String {
    let mut hasher = Sha256::new();
    for entry in store.entries_of(project, result_set) {
        hash_entry(&mut hasher, entry);
    }
    format!("{:x}", hasher.finalize())
}

fn hash_entry(hasher: &mut Sha256, entry: &CacheEntry) {
    hasher.update(entry.key.kind.to_string().as_bytes());
    hasher.update(format!("{:?}", entry.key.scope).as_bytes());
    hasher.update(entry.story_sort_order.to_le_bytes());
    for (key, value) in &entry.matrix {
        hasher.update(key.to_string().as_bytes());
        hasher.update(value.to_bits().to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{Direction, Extreme, ResultKind};
    use crate::store::CacheStore;
    use crate::types::{CacheKey, CacheScope, LoadCaseKey, ResultsMatrix};
    use st_core::Id;

    fn populate(store: &mut MemoryCacheStore, value: f64) {
        let key = CacheKey {
            project: Id::from_index(0),
            result_set: Id::from_index(0),
            kind: ResultKind::StoryDrift(Extreme::Max),
            scope: CacheScope::Story(Id::from_index(0)),
        };
        let mut matrix = ResultsMatrix::new();
        matrix.insert(LoadCaseKey::new("TH01", Some(Direction::X)), value);
        store.upsert(key, matrix, 0).unwrap();
    }

    #[test]
    fn fingerprint_is_stable() {
        let mut a = MemoryCacheStore::new();
        let mut b = MemoryCacheStore::new();
        populate(&mut a, 0.1);
        populate(&mut b, 0.1);
        assert_eq!(
            compute_cache_fingerprint(&a, Id::from_index(0), Id::from_index(0)),
            compute_cache_fingerprint(&b, Id::from_index(0), Id::from_index(0)),
        );
    }

    #[test]
    fn fingerprint_differs_for_different_values() {
        let mut a = MemoryCacheStore::new();
        let mut b = MemoryCacheStore::new();
        populate(&mut a, 0.1);
        populate(&mut b, 0.2);
        assert_ne!(
            compute_cache_fingerprint(&a, Id::from_index(0), Id::from_index(0)),
            compute_cache_fingerprint(&b, Id::from_index(0), Id::from_index(0)),
        );
    }
}
