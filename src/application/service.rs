use std::sync::Arc;

use serde::Serialize;
use serde_json::value::RawValue;
use tracing::{debug, info, warn};

use crate::domain::{Account, SEED_ACCOUNTS, Shipment, Transaction};
use crate::storage::{
    ACCOUNT_RANGE, MemoryStore, SHIPMENT_RANGE, SqliteStore, Store, account_key,
};

use super::{
    EngineError, EngineResult, ShipmentRegistry, StatusUpdate, TransactionLedger,
};

/// Engine behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Re-apply a deposit's balance delta on every deposit lookup, including
    /// the one made while approving a shipment.
    pub legacy_lookup: bool,
}

/// Outcome of a named call, as handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Success(Vec<u8>),
    Error(String),
}

impl Response {
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }

    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Response::Success(payload) => Some(payload),
            Response::Error(_) => None,
        }
    }
}

impl From<EngineResult<Vec<u8>>> for Response {
    fn from(result: EngineResult<Vec<u8>>) -> Self {
        match result {
            Ok(payload) => Response::Success(payload),
            Err(err) => Response::Error(err.to_string()),
        }
    }
}

/// One element of the `queryAllShips` listing. The record is embedded as stored.
#[derive(Debug, Serialize)]
pub struct ShipmentEntry {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Record")]
    pub record: Box<RawValue>,
}

impl ShipmentEntry {
    /// Wrap stored bytes. Values that are not JSON are embedded as a JSON string.
    pub fn from_stored(key: String, value: Vec<u8>) -> EngineResult<Self> {
        let text = String::from_utf8_lossy(&value).into_owned();
        let record = match RawValue::from_string(text.clone()) {
            Ok(raw) => raw,
            Err(_) => serde_json::value::to_raw_value(&text)?,
        };
        Ok(Self { key, record })
    }
}

/// Application service exposing the engine's named operations.
/// This is the primary interface for any client (CLI, dispatcher, tests).
pub struct LedgerService {
    store: Arc<dyn Store>,
    options: EngineOptions,
}

impl LedgerService {
    /// Create a new service over the given store.
    pub fn new(store: Arc<dyn Store>, options: EngineOptions) -> Self {
        Self { store, options }
    }

    /// A service over a fresh in-memory store.
    pub fn in_memory(options: EngineOptions) -> Self {
        Self::new(Arc::new(MemoryStore::new()), options)
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str, options: EngineOptions) -> EngineResult<Self> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let store = SqliteStore::init(&db_url).await?;
        Ok(Self::new(Arc::new(store), options))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str, options: EngineOptions) -> EngineResult<Self> {
        let db_url = format!("sqlite:{}", database_path);
        let store = SqliteStore::connect(&db_url).await?;
        Ok(Self::new(Arc::new(store), options))
    }

    fn registry(&self) -> ShipmentRegistry<'_> {
        ShipmentRegistry::new(self.store.as_ref(), self.options)
    }

    fn ledger(&self) -> TransactionLedger<'_> {
        TransactionLedger::new(self.store.as_ref())
    }

    // ========================
    // Named operations
    // ========================

    /// `initLedger`: write the seed accounts `ID0..ID5`.
    pub async fn init_ledger(&self) -> EngineResult<Vec<Account>> {
        let mut accounts = Vec::with_capacity(SEED_ACCOUNTS.len());
        for (index, (balance, name)) in SEED_ACCOUNTS.iter().enumerate() {
            let account = Account::new(account_key(index), *balance, *name);
            let bytes = serde_json::to_vec(&account)?;
            self.store.put(&account.id, &bytes).await?;
            debug!(id = %account.id, balance = %account.balance, "seeded account");
            accounts.push(account);
        }
        info!(count = accounts.len(), "ledger initialized");
        Ok(accounts)
    }

    /// `createShipment`: eleven positional arguments.
    pub async fn create_shipment(&self, args: &[String]) -> EngineResult<Shipment> {
        self.registry().create(args).await
    }

    /// `updateStatus`: shipment id, status, changer id, space.
    pub async fn update_status(&self, args: &[String]) -> EngineResult<Shipment> {
        let update = StatusUpdate::from_args(args).ok_or_else(|| {
            EngineError::InvalidArgument(format!(
                "expected {} arguments, got {}",
                StatusUpdate::ARG_COUNT,
                args.len()
            ))
        })?;
        self.registry().update_status(&update).await
    }

    /// `queryAllShips`: every record in the shipment range as a `{"Key", "Record"}` pair.
    pub async fn query_all_ships(&self) -> EngineResult<Vec<u8>> {
        let entries = self
            .store
            .scan(SHIPMENT_RANGE)
            .await?
            .into_iter()
            .map(|(key, value)| ShipmentEntry::from_stored(key, value))
            .collect::<EngineResult<Vec<_>>>()?;
        debug!(count = entries.len(), "listed shipments");
        Ok(serde_json::to_vec(&entries)?)
    }

    /// `queryId`: raw bytes stored under `key`; empty when nothing is stored.
    pub async fn query_id(&self, key: &str) -> EngineResult<Vec<u8>> {
        match self.store.get(key).await? {
            Some(bytes) => Ok(bytes),
            None => {
                debug!(key, "no record stored under key");
                Ok(Vec::new())
            }
        }
    }

    /// Route a named call with string arguments to its operation.
    pub async fn invoke(&self, function: &str, args: &[String]) -> Response {
        let result = match function {
            "initLedger" => self.init_ledger().await.map(|_| Vec::new()),
            "createShipment" => match self.create_shipment(args).await {
                Ok(shipment) => serde_json::to_vec(&shipment).map_err(EngineError::from),
                Err(err) => Err(err),
            },
            "updateStatus" => match self.update_status(args).await {
                Ok(shipment) => serde_json::to_vec(&shipment).map_err(EngineError::from),
                Err(err) => Err(err),
            },
            "queryAllShips" => self.query_all_ships().await,
            "queryId" => match args {
                [key] => self.query_id(key).await,
                _ => Err(EngineError::InvalidArgument(format!(
                    "expected 1 argument, got {}",
                    args.len()
                ))),
            },
            other => Err(EngineError::InvalidArgument(format!(
                "unknown function: {}",
                other
            ))),
        };

        if let Err(err) = &result {
            warn!(function, kind = err.kind(), error = %err, "call failed");
        }
        Response::from(result)
    }

    // ========================
    // Read helpers
    // ========================

    pub async fn get_shipment(&self, id: &str) -> EngineResult<Shipment> {
        self.registry().get(id).await
    }

    pub async fn list_shipments(&self) -> EngineResult<Vec<Shipment>> {
        self.registry().list().await
    }

    pub async fn get_transaction(&self, id: &str) -> EngineResult<Transaction> {
        self.ledger().get(id).await
    }

    pub async fn list_transactions(&self) -> EngineResult<Vec<Transaction>> {
        self.ledger().list().await
    }

    pub async fn get_account(&self, id: &str) -> EngineResult<Account> {
        let bytes = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("account {}", id)))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn list_accounts(&self) -> EngineResult<Vec<Account>> {
        self.store
            .scan(ACCOUNT_RANGE)
            .await?
            .into_iter()
            .map(|(_, value)| serde_json::from_slice(&value).map_err(EngineError::from))
            .collect()
    }
}
