// Application layer - the engine components and the operations exposed to callers.
// Components are leaf to root:
// - IdAllocator: sequential ids by range count
// - BalanceService: debit/credit of account records
// - TransactionLedger: postings and deposit settlement
// - ShipmentRegistry: shipment lifecycle and its ledger effects

mod balances;
pub mod error;
mod ids;
mod ledger;
mod registry;
mod service;

pub use balances::*;
pub use error::*;
pub use ids::*;
pub use ledger::*;
pub use registry::*;
pub use service::*;
