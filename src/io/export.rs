use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Account, Shipment, Transaction};

/// Full ledger snapshot for JSON export
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub accounts: Vec<Account>,
    pub shipments: Vec<Shipment>,
    pub transactions: Vec<Transaction>,
}

/// Exporter for converting ledger records to CSV and JSON
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export account balances to CSV format
    pub async fn export_accounts_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let accounts = self.service.list_accounts().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "name", "balance"])?;

        for account in &accounts {
            csv_writer.write_record([&account.id, &account.name, &account.balance])?;
        }

        csv_writer.flush()?;
        Ok(accounts.len())
    }

    /// Export transactions to CSV format
    pub async fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.list_transactions().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "ship_id", "type", "sender", "receiver", "amount"])?;

        for tx in &transactions {
            csv_writer.write_record([
                tx.id.as_str(),
                tx.shipment_id.as_str(),
                tx.kind.as_str(),
                tx.sender.as_str(),
                tx.receiver.as_str(),
                tx.amount.as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Export shipments to CSV format
    pub async fn export_shipments_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let shipments = self.service.list_shipments().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "creater_id",
            "status",
            "status_update_time",
            "status_changer",
            "carrier",
            "recipient",
            "retailer",
            "price",
            "pick_up",
            "destination",
            "content_list",
            "space",
            "startpoint",
            "endpoint",
        ])?;

        for ship in &shipments {
            csv_writer.write_record([
                ship.id.as_str(),
                ship.creator_id.as_str(),
                ship.status.as_str(),
                ship.status_update_time.as_str(),
                ship.status_changer.as_str(),
                ship.carrier.as_str(),
                ship.recipient.as_str(),
                ship.retailer.as_str(),
                ship.price.as_str(),
                ship.pickup.as_str(),
                ship.destination.as_str(),
                ship.content_list.as_str(),
                ship.space.as_str(),
                ship.startpoint.as_str(),
                ship.endpoint.as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(shipments.len())
    }

    /// Export every record as one JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            accounts: self.service.list_accounts().await?,
            shipments: self.service.list_shipments().await?,
            transactions: self.service.list_transactions().await?,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
