//! Key layout of the store.
//!
//! Shipments and transactions use a prefix followed by a zero-padded
//! sequence number; accounts use `ID<n>`. All scans are half-open.

/// Half-open key range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRange {
    pub start: &'static str,
    pub end: &'static str,
}

impl KeyRange {
    pub fn contains(&self, key: &str) -> bool {
        key >= self.start && key < self.end
    }
}

pub const SHIPMENT_PREFIX: &str = "SHIP";
pub const SHIPMENT_RANGE: KeyRange = KeyRange {
    start: "SHIP000",
    end: "SHIP999",
};

pub const TRANSACTION_PREFIX: &str = "TRANS";
pub const TRANSACTION_RANGE: KeyRange = KeyRange {
    start: "TRANS000",
    end: "TRANS999",
};

pub const ACCOUNT_PREFIX: &str = "ID";
pub const ACCOUNT_RANGE: KeyRange = KeyRange {
    start: "ID0",
    end: "ID999",
};

/// Width of the zero-padded sequence part of generated ids.
pub const SEQUENCE_WIDTH: usize = 3;

pub fn sequence_key(prefix: &str, sequence: usize) -> String {
    format!("{}{:0width$}", prefix, sequence, width = SEQUENCE_WIDTH)
}

pub fn account_key(index: usize) -> String {
    format!("{}{}", ACCOUNT_PREFIX, index)
}
