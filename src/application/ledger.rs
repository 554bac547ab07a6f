use tracing::{debug, info};

use crate::domain::{NewTransaction, Transaction, TransactionType};
use crate::storage::{Store, TRANSACTION_PREFIX, TRANSACTION_RANGE};

use super::{BalanceService, EngineError, EngineResult, IdAllocator};

/// Creates, looks up and settles transaction records.
pub struct TransactionLedger<'a> {
    store: &'a dyn Store,
}

impl<'a> TransactionLedger<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Allocate an id and persist a new posting.
    ///
    /// When the posting has a receiver, balances are adjusted before the
    /// transaction record is written. A failed write afterwards leaves the
    /// balance change in place.
    pub async fn create(&self, new: NewTransaction) -> EngineResult<Transaction> {
        let id = IdAllocator::new(self.store)
            .allocate(TRANSACTION_PREFIX, TRANSACTION_RANGE)
            .await?;
        let transaction = new.into_transaction(id);

        if transaction.has_receiver() {
            BalanceService::new(self.store).apply(&transaction).await?;
        }

        self.save(&transaction).await?;
        info!(
            id = %transaction.id,
            kind = %transaction.kind,
            shipment = %transaction.shipment_id,
            amount = %transaction.amount,
            "created transaction"
        );
        Ok(transaction)
    }

    /// First transaction, in key order, for `shipment_id` with the given type.
    pub async fn find(
        &self,
        shipment_id: &str,
        kind: TransactionType,
    ) -> EngineResult<Option<Transaction>> {
        for (_, value) in self.store.scan(TRANSACTION_RANGE).await? {
            let transaction: Transaction = serde_json::from_slice(&value)?;
            if transaction.shipment_id == shipment_id && transaction.kind == kind {
                debug!(id = %transaction.id, shipment = shipment_id, %kind, "found transaction");
                return Ok(Some(transaction));
            }
        }
        Ok(None)
    }

    /// Apply a previously posted transaction's delta to balances again.
    ///
    /// Not idempotent: each call with `needed` set moves the amount once more.
    pub async fn apply_if_needed(
        &self,
        transaction: &Transaction,
        needed: bool,
    ) -> EngineResult<()> {
        if !needed {
            return Ok(());
        }
        BalanceService::new(self.store).apply(transaction).await
    }

    /// Fetch a transaction by id.
    pub async fn get(&self, id: &str) -> EngineResult<Transaction> {
        let bytes = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("transaction {}", id)))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Overwrite the receiver of an existing transaction. Balances are untouched.
    pub async fn update_receiver(&self, id: &str, receiver: &str) -> EngineResult<Transaction> {
        let mut transaction = self.get(id).await?;
        transaction.receiver = receiver.to_string();
        self.save(&transaction).await?;
        info!(id, receiver, "updated transaction receiver");
        Ok(transaction)
    }

    /// All transactions in key order.
    pub async fn list(&self) -> EngineResult<Vec<Transaction>> {
        self.store
            .scan(TRANSACTION_RANGE)
            .await?
            .into_iter()
            .map(|(_, value)| serde_json::from_slice(&value).map_err(EngineError::from))
            .collect()
    }

    async fn save(&self, transaction: &Transaction) -> EngineResult<()> {
        let bytes = serde_json::to_vec(transaction)?;
        self.store.put(&transaction.id, &bytes).await?;
        Ok(())
    }
}
