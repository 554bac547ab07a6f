use tracing::{debug, info};

use crate::domain::{Account, Transaction, parse_amount};
use crate::storage::{ACCOUNT_RANGE, Store};

use super::{EngineError, EngineResult};

/// Applies a transaction's debit and credit to the affected accounts.
pub struct BalanceService<'a> {
    store: &'a dyn Store,
}

impl<'a> BalanceService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Credit `receiver` and debit `sender` by `amount`.
    ///
    /// Accounts are visited in key order and each matched account is written
    /// back immediately. The two writes are not paired: if the second one
    /// fails, the first stays applied.
    pub async fn apply(&self, transaction: &Transaction) -> EngineResult<()> {
        let records = self.store.scan(ACCOUNT_RANGE).await?;
        if records.is_empty() {
            return Err(EngineError::NotFound(
                "no accounts in the ledger; run initLedger first".to_string(),
            ));
        }

        for (key, value) in records {
            let mut account: Account = serde_json::from_slice(&value)?;

            if account.id == transaction.receiver {
                let amount = parse_amount(&transaction.amount)?;
                account.credit(amount)?;
            } else if account.id == transaction.sender {
                let amount = parse_amount(&transaction.amount)?;
                account.debit(amount)?;
            } else {
                continue;
            }

            let bytes = serde_json::to_vec(&account)?;
            self.store.put(&account.id, &bytes).await?;
            debug!(key = %key, balance = %account.balance, "account balance updated");
        }

        info!(
            transaction = %transaction.id,
            sender = %transaction.sender,
            receiver = %transaction.receiver,
            amount = %transaction.amount,
            "applied transaction to balances"
        );
        Ok(())
    }
}
