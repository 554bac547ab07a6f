use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Escrow posted by the carrier when it accepts a shipment
    Deposit,
    /// Funds moved from recipient to carrier on approval
    Payment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Payment => "payment",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ledger posting tied to a shipment. Append-only, except for `receiver`,
/// which is filled in when a deposit is settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Credited account id; empty when nobody is credited yet
    pub receiver: String,
    /// Debited account id
    pub sender: String,
    /// Decimal text
    pub amount: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(rename = "ship_id")]
    pub shipment_id: String,
}

/// Fields of a posting before an id has been allocated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub sender: String,
    pub receiver: String,
    pub amount: String,
    pub shipment_id: String,
    pub kind: TransactionType,
}

impl NewTransaction {
    pub fn into_transaction(self, id: String) -> Transaction {
        Transaction {
            id,
            receiver: self.receiver,
            sender: self.sender,
            amount: self.amount,
            kind: self.kind,
            shipment_id: self.shipment_id,
        }
    }
}

impl Transaction {
    /// Whether posting this transaction moves money into an account.
    pub fn has_receiver(&self) -> bool {
        !self.receiver.is_empty()
    }
}
