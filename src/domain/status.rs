use serde::{Deserialize, Serialize};

/// Lifecycle state of a shipment.
///
/// Statuses arrive as free text. Only a handful carry ledger effects; anything
/// else is kept verbatim in `Other` and stored unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShipmentStatus {
    Created,
    Accepted,
    Approved,
    NotDelivered,
    Other(String),
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ShipmentStatus::Created => "Created",
            ShipmentStatus::Accepted => "Accepted",
            ShipmentStatus::Approved => "Approved",
            ShipmentStatus::NotDelivered => "not delivered",
            ShipmentStatus::Other(s) => s,
        }
    }

    /// Exact, case-sensitive match on the status text.
    pub fn parse(s: &str) -> Self {
        match s {
            "Created" => ShipmentStatus::Created,
            "Accepted" => ShipmentStatus::Accepted,
            "Approved" => ShipmentStatus::Approved,
            "not delivered" => ShipmentStatus::NotDelivered,
            other => ShipmentStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for ShipmentStatus {
    fn from(s: String) -> Self {
        match ShipmentStatus::parse(&s) {
            ShipmentStatus::Other(_) => ShipmentStatus::Other(s),
            known => known,
        }
    }
}

impl From<ShipmentStatus> for String {
    fn from(status: ShipmentStatus) -> Self {
        match status {
            ShipmentStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ledger side effect attached to reaching a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEffect {
    /// Status is stored, nothing is posted
    None,
    /// Post a deposit from the carrier with no receiver
    PostDeposit,
    /// Post a payment from recipient to carrier, then settle the deposit to the carrier
    PostPayment,
    /// Re-apply the deposit and settle it to the retailer
    ForfeitDeposit,
}

impl LedgerEffect {
    /// Whether the prior deposit must exist for this effect to complete.
    pub fn needs_deposit(&self) -> bool {
        matches!(self, LedgerEffect::PostPayment | LedgerEffect::ForfeitDeposit)
    }

    /// Whether the located deposit's balance delta is applied again.
    pub fn reapplies_deposit(&self) -> bool {
        matches!(self, LedgerEffect::ForfeitDeposit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: ShipmentStatus,
    pub effect: LedgerEffect,
}

/// Transition table: `(current, requested) -> (next, effect)`.
///
/// Every transition is accepted regardless of the current status; the effect
/// is selected by the requested status alone.
pub fn transition(current: &ShipmentStatus, requested: &ShipmentStatus) -> Transition {
    let effect = match (current, requested) {
        (_, ShipmentStatus::Accepted) => LedgerEffect::PostDeposit,
        (_, ShipmentStatus::Approved) => LedgerEffect::PostPayment,
        (_, ShipmentStatus::NotDelivered) => LedgerEffect::ForfeitDeposit,
        (_, ShipmentStatus::Created | ShipmentStatus::Other(_)) => LedgerEffect::None,
    };

    Transition {
        next: requested.clone(),
        effect,
    }
}
