mod account;
mod money;
mod shipment;
mod status;
mod transaction;

pub use account::*;
pub use money::*;
pub use shipment::*;
pub use status::*;
pub use transaction::*;
