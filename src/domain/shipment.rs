use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ShipmentStatus;

/// A tracked consignment. Every field is stored as text, including `price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: String,
    #[serde(rename = "creater_id")]
    pub creator_id: String,
    pub status: ShipmentStatus,
    pub status_update_time: String,
    pub status_changer: String,
    /// Account id of the carrier; set once, by the first responder if empty
    pub carrier: String,
    pub recipient: String,
    pub retailer: String,
    /// Decimal text
    pub price: String,
    #[serde(rename = "pick_up")]
    pub pickup: String,
    pub destination: String,
    pub content_list: String,
    pub space: String,
    pub startpoint: String,
    pub endpoint: String,
}

/// The eleven caller-supplied fields of a new shipment, in argument order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShipment {
    pub creator_id: String,
    pub carrier: String,
    pub recipient: String,
    pub retailer: String,
    pub price: String,
    pub pickup: String,
    pub destination: String,
    pub content_list: String,
    pub space: String,
    pub startpoint: String,
    pub endpoint: String,
}

impl NewShipment {
    pub const ARG_COUNT: usize = 11;

    /// Build from positional arguments; `None` unless exactly eleven are given.
    pub fn from_args(args: &[String]) -> Option<Self> {
        let [
            creator_id,
            carrier,
            recipient,
            retailer,
            price,
            pickup,
            destination,
            content_list,
            space,
            startpoint,
            endpoint,
        ] = args
        else {
            return None;
        };

        Some(Self {
            creator_id: creator_id.clone(),
            carrier: carrier.clone(),
            recipient: recipient.clone(),
            retailer: retailer.clone(),
            price: price.clone(),
            pickup: pickup.clone(),
            destination: destination.clone(),
            content_list: content_list.clone(),
            space: space.clone(),
            startpoint: startpoint.clone(),
            endpoint: endpoint.clone(),
        })
    }
}

/// Text form of a status timestamp.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

impl Shipment {
    /// A freshly created shipment: status `Created`, changed by its creator.
    pub fn new(id: String, fields: NewShipment, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            status: ShipmentStatus::Created,
            status_update_time: format_timestamp(created_at),
            status_changer: fields.creator_id.clone(),
            creator_id: fields.creator_id,
            carrier: fields.carrier,
            recipient: fields.recipient,
            retailer: fields.retailer,
            price: fields.price,
            pickup: fields.pickup,
            destination: fields.destination,
            content_list: fields.content_list,
            space: fields.space,
            startpoint: fields.startpoint,
            endpoint: fields.endpoint,
        }
    }

    /// Record who responded; only the first responder becomes the carrier.
    pub fn assign_carrier_if_empty(&mut self, changer_id: &str) {
        if self.carrier.is_empty() {
            self.carrier = changer_id.to_string();
        }
    }

    /// Stamp the status change.
    ///
    /// `space` is only written when the incoming value is itself empty, which
    /// means it can be cleared here but never set to a new value.
    pub fn stamp(&mut self, changer_id: &str, space: &str, at: DateTime<Utc>) {
        self.status_update_time = format_timestamp(at);
        self.status_changer = changer_id.to_string();
        if space.is_empty() {
            self.space = space.to_string();
        }
    }
}
