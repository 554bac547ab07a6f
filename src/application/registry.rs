use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{
    LedgerEffect, NewShipment, NewTransaction, Shipment, ShipmentStatus, TransactionType,
    transition,
};
use crate::storage::{SHIPMENT_PREFIX, SHIPMENT_RANGE, Store};

use super::{EngineError, EngineOptions, EngineResult, IdAllocator, TransactionLedger};

/// Arguments of a status change, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub shipment_id: String,
    pub status: String,
    pub changer_id: String,
    pub space: String,
}

impl StatusUpdate {
    pub const ARG_COUNT: usize = 4;

    pub fn from_args(args: &[String]) -> Option<Self> {
        let [shipment_id, status, changer_id, space] = args else {
            return None;
        };
        Some(Self {
            shipment_id: shipment_id.clone(),
            status: status.clone(),
            changer_id: changer_id.clone(),
            space: space.clone(),
        })
    }
}

/// Creates shipments and drives them through their status lifecycle.
pub struct ShipmentRegistry<'a> {
    store: &'a dyn Store,
    options: EngineOptions,
}

impl<'a> ShipmentRegistry<'a> {
    pub fn new(store: &'a dyn Store, options: EngineOptions) -> Self {
        Self { store, options }
    }

    /// Create a shipment from exactly eleven positional arguments.
    pub async fn create(&self, args: &[String]) -> EngineResult<Shipment> {
        let fields = NewShipment::from_args(args).ok_or_else(|| {
            EngineError::InvalidArgument(format!(
                "expected {} arguments, got {}",
                NewShipment::ARG_COUNT,
                args.len()
            ))
        })?;

        let id = IdAllocator::new(self.store)
            .allocate(SHIPMENT_PREFIX, SHIPMENT_RANGE)
            .await?;
        let shipment = Shipment::new(id, fields, Utc::now());

        self.save(&shipment).await?;
        info!(id = %shipment.id, creator = %shipment.creator_id, "created shipment");
        Ok(shipment)
    }

    /// Fetch a shipment by id.
    pub async fn get(&self, id: &str) -> EngineResult<Shipment> {
        let bytes = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("shipment {}", id)))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Move a shipment to a new status and post the ledger effect that status carries.
    ///
    /// The shipment is only written once its ledger effect has completed. When
    /// an effect fails midway, postings already made stay in the ledger and
    /// the shipment keeps its previous state.
    pub async fn update_status(&self, update: &StatusUpdate) -> EngineResult<Shipment> {
        let mut shipment = self.get(&update.shipment_id).await?;
        let requested = ShipmentStatus::parse(&update.status);
        let step = transition(&shipment.status, &requested);

        shipment.status = step.next;
        shipment.assign_carrier_if_empty(&update.changer_id);

        self.post_effect(&shipment, step.effect).await?;

        shipment.stamp(&update.changer_id, &update.space, Utc::now());
        self.save(&shipment).await?;
        info!(
            id = %shipment.id,
            status = %shipment.status,
            changer = %shipment.status_changer,
            "updated shipment status"
        );
        Ok(shipment)
    }

    async fn post_effect(&self, shipment: &Shipment, effect: LedgerEffect) -> EngineResult<()> {
        let ledger = TransactionLedger::new(self.store);

        match effect {
            LedgerEffect::PostDeposit => {
                ledger
                    .create(NewTransaction {
                        sender: shipment.carrier.clone(),
                        receiver: String::new(),
                        amount: shipment.price.clone(),
                        shipment_id: shipment.id.clone(),
                        kind: TransactionType::Deposit,
                    })
                    .await?;
            }
            LedgerEffect::PostPayment => {
                ledger
                    .create(NewTransaction {
                        sender: shipment.recipient.clone(),
                        receiver: shipment.carrier.clone(),
                        amount: shipment.price.clone(),
                        shipment_id: shipment.id.clone(),
                        kind: TransactionType::Payment,
                    })
                    .await?;
            }
            LedgerEffect::None | LedgerEffect::ForfeitDeposit => {}
        }

        if !effect.needs_deposit() {
            return Ok(());
        }

        let deposit = ledger
            .find(&shipment.id, TransactionType::Deposit)
            .await?
            .ok_or_else(|| {
                warn!(shipment = %shipment.id, status = %shipment.status, "no deposit to settle");
                EngineError::Inconsistent(format!("shipment {} has no deposit", shipment.id))
            })?;

        let reapply = effect.reapplies_deposit() || self.options.legacy_lookup;
        ledger.apply_if_needed(&deposit, reapply).await?;

        let settle_to = match effect {
            LedgerEffect::ForfeitDeposit => &shipment.retailer,
            _ => &shipment.carrier,
        };
        ledger.update_receiver(&deposit.id, settle_to).await?;
        Ok(())
    }

    /// All shipments in key order.
    pub async fn list(&self) -> EngineResult<Vec<Shipment>> {
        self.store
            .scan(SHIPMENT_RANGE)
            .await?
            .into_iter()
            .map(|(_, value)| serde_json::from_slice(&value).map_err(EngineError::from))
            .collect()
    }

    async fn save(&self, shipment: &Shipment) -> EngineResult<()> {
        let bytes = serde_json::to_vec(shipment)?;
        self.store.put(&shipment.id, &bytes).await?;
        Ok(())
    }
}
