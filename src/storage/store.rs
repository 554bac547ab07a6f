use anyhow::Result;
use async_trait::async_trait;

use super::KeyRange;

/// A stored `(key, value)` pair as returned by a range scan.
pub type Record = (String, Vec<u8>);

/// Ordered key-value store the engine persists its records in.
///
/// Implementations must return range scans in ascending lexicographic key
/// order. No multi-key atomicity is assumed: callers that need it must
/// serialize access themselves.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Insert or overwrite the value under `key`.
    async fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// All records with `start <= key < end`, in key order.
    async fn range_scan(&self, start: &str, end: &str) -> Result<Vec<Record>>;

    async fn scan(&self, range: KeyRange) -> Result<Vec<Record>> {
        self.range_scan(range.start, range.end).await
    }
}
