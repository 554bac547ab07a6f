use serde::{Deserialize, Serialize};

use super::{Amount, ParseAmountError, adjust_amount};

/// A balance-holding party. Accounts are seeded once and never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    /// Decimal text, re-encoded with two digits after every adjustment
    pub balance: String,
    pub name: String,
}

/// Accounts written by `initLedger`, in key order `ID0..ID5`.
pub const SEED_ACCOUNTS: [(&str, &str); 6] = [
    ("98053", "Harbor Logistics"),
    ("235", "Mara Lindqvist"),
    ("5534", "Northgate Retail"),
    ("2366", "Quayside Carriers"),
    ("334", "Tomas Brandt"),
    ("542", "Westfield Traders"),
];

impl Account {
    pub fn new(id: impl Into<String>, balance: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            balance: balance.into(),
            name: name.into(),
        }
    }

    pub fn credit(&mut self, amount: Amount) -> Result<(), ParseAmountError> {
        self.balance = adjust_amount(&self.balance, amount)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: Amount) -> Result<(), ParseAmountError> {
        self.balance = adjust_amount(&self.balance, -amount)?;
        Ok(())
    }
}
