use thiserror::Error;

use crate::domain::ParseAmountError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A record that must exist for this step, such as a shipment's deposit, is missing.
    #[error("Inconsistent ledger: {0}")]
    Inconsistent(String),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Amount format error: {0}")]
    AmountFormat(#[from] ParseAmountError),
}

impl EngineError {
    /// Short, stable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidArgument(_) => "InvalidArgument",
            EngineError::NotFound(_) => "NotFound",
            EngineError::Inconsistent(_) => "Inconsistent",
            EngineError::Store(_) => "StoreFailure",
            EngineError::Serialization(_) => "SerializationFailure",
            EngineError::AmountFormat(_) => "AmountFormatError",
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
