// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Result, bail};
use async_trait::async_trait;
use shipledger::application::{EngineOptions, LedgerService};
use shipledger::storage::{MemoryStore, Record, Store};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap(), EngineOptions::default()).await?;
    Ok((service, temp_dir))
}

/// In-memory service with the seed accounts already written
pub async fn seeded_service(options: EngineOptions) -> Result<LedgerService> {
    let service = LedgerService::in_memory(options);
    service.init_ledger().await?;
    Ok(service)
}

/// Eleven `createShipment` arguments: creator ID0, carrier as given,
/// recipient ID1, retailer ID2, the given price.
pub fn shipment_args(carrier: &str, price: &str) -> Vec<String> {
    [
        "ID0",
        carrier,
        "ID1",
        "ID2",
        price,
        "Hamburg",
        "Munich",
        "2 pallets of books",
        "4m3",
        "53.55,9.99",
        "48.13,11.58",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn status_args(id: &str, status: &str, changer: &str, space: &str) -> Vec<String> {
    vec![id.into(), status.into(), changer.into(), space.into()]
}

pub async fn balance_of(service: &LedgerService, id: &str) -> Result<String> {
    Ok(service.get_account(id).await?.balance)
}

/// Store wrapper whose writes can be switched to fail for keys with a prefix.
pub struct FlakyStore {
    inner: MemoryStore,
    fail_prefix: &'static str,
    failing: AtomicBool,
}

impl FlakyStore {
    pub fn new(fail_prefix: &'static str) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::new(),
            fail_prefix,
            failing: AtomicBool::new(false),
        })
    }

    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) && key.starts_with(self.fail_prefix) {
            bail!("write to {} rejected", key);
        }
        self.inner.put(key, value).await
    }

    async fn range_scan(&self, start: &str, end: &str) -> Result<Vec<Record>> {
        self.inner.range_scan(start, end).await
    }
}
