use tracing::{debug, warn};

use crate::storage::{KeyRange, Store, sequence_key};

use super::{EngineError, EngineResult};

/// Derives sequential record ids by counting the keys already in a range.
///
/// The id is not reserved: allocation and the write that follows are two
/// separate store calls, so two allocations observed before either write
/// lands return the same id. This is only safe while the host serializes
/// calls against the store one at a time.
///
/// Ids never leave their range: once the next id would fall on or past the
/// range end, allocation fails instead of handing out a key that later scans
/// cannot see.
pub struct IdAllocator<'a> {
    store: &'a dyn Store,
}

impl<'a> IdAllocator<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Return `prefix` followed by the number of keys in `range`, zero-padded to three digits.
    pub async fn allocate(&self, prefix: &str, range: KeyRange) -> EngineResult<String> {
        let count = self.store.scan(range).await?.len();
        let id = sequence_key(prefix, count);
        if !range.contains(&id) {
            warn!(prefix, count, "id space exhausted");
            return Err(EngineError::Store(anyhow::anyhow!(
                "id space exhausted for {}",
                prefix
            )));
        }
        debug!(prefix, count, id = %id, "allocated id");
        Ok(id)
    }
}
