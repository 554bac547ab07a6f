mod common;

use std::sync::Arc;

use anyhow::Result;
use common::{seeded_service, shipment_args, status_args};
use shipledger::application::{EngineError, EngineOptions, LedgerService};
use shipledger::domain::{Shipment, ShipmentStatus, TransactionType};
use shipledger::storage::{MemoryStore, SHIPMENT_PREFIX, Store, sequence_key};

#[tokio::test]
async fn test_create_shipment_sets_initial_state() -> Result<()> {
    let service = seeded_service(EngineOptions::default()).await?;

    let ship = service.create_shipment(&shipment_args("ID3", "100")).await?;

    assert_eq!(ship.id, "SHIP000");
    assert_eq!(ship.status, ShipmentStatus::Created);
    assert_eq!(ship.creator_id, "ID0");
    assert_eq!(ship.status_changer, "ID0");
    assert_eq!(ship.carrier, "ID3");
    assert_eq!(ship.recipient, "ID1");
    assert_eq!(ship.retailer, "ID2");
    assert_eq!(ship.price, "100");
    assert_eq!(ship.pickup, "Hamburg");
    assert_eq!(ship.endpoint, "48.13,11.58");
    assert!(!ship.status_update_time.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_created_shipment_is_retrievable_unchanged() -> Result<()> {
    let service = seeded_service(EngineOptions::default()).await?;
    let ship = service.create_shipment(&shipment_args("", "250.50")).await?;

    let raw = service.query_id(&ship.id).await?;
    let stored: Shipment = serde_json::from_slice(&raw)?;
    assert_eq!(stored, ship);

    Ok(())
}

#[tokio::test]
async fn test_create_requires_eleven_arguments() -> Result<()> {
    let service = seeded_service(EngineOptions::default()).await?;

    let mut args = shipment_args("", "100");
    args.pop();
    let err = service.create_shipment(&args).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));

    assert!(service.list_shipments().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_shipment_ids_are_dense() -> Result<()> {
    let service = seeded_service(EngineOptions::default()).await?;

    let mut last = String::new();
    for _ in 0..12 {
        last = service.create_shipment(&shipment_args("", "1")).await?.id;
    }
    assert_eq!(last, "SHIP011");

    let ids: Vec<String> = service
        .list_shipments()
        .await?
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids.len(), 12);
    assert_eq!(ids[10], "SHIP010");

    Ok(())
}

#[tokio::test]
async fn test_full_id_range_never_overwrites_shipments() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    for n in 0..998 {
        store.put(&sequence_key(SHIPMENT_PREFIX, n), b"{}").await?;
    }
    let service = LedgerService::new(store.clone(), EngineOptions::default());

    let last = service.create_shipment(&shipment_args("ID3", "100")).await?;
    assert_eq!(last.id, "SHIP998");

    let err = service
        .create_shipment(&shipment_args("ID4", "100"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Store(_)));
    assert_eq!(err.kind(), "StoreFailure");

    assert_eq!(service.get_shipment("SHIP998").await?.carrier, "ID3");
    assert_eq!(store.get("SHIP999").await?, None);

    Ok(())
}

#[tokio::test]
async fn test_first_responder_becomes_carrier() -> Result<()> {
    let service = seeded_service(EngineOptions::default()).await?;
    service.create_shipment(&shipment_args("", "100")).await?;

    let ship = service
        .update_status(&status_args("SHIP000", "In transit", "ID3", ""))
        .await?;
    assert_eq!(ship.carrier, "ID3");

    let ship = service
        .update_status(&status_args("SHIP000", "Delayed", "ID4", ""))
        .await?;
    assert_eq!(ship.carrier, "ID3");
    assert_eq!(ship.status_changer, "ID4");

    Ok(())
}

#[tokio::test]
async fn test_free_text_status_has_no_ledger_effect() -> Result<()> {
    let service = seeded_service(EngineOptions::default()).await?;
    service.create_shipment(&shipment_args("ID3", "100")).await?;

    let ship = service
        .update_status(&status_args("SHIP000", "In transit", "ID3", ""))
        .await?;

    assert_eq!(ship.status, ShipmentStatus::Other("In transit".into()));
    assert!(service.list_transactions().await?.is_empty());

    let stored: serde_json::Value = serde_json::from_slice(&service.query_id("SHIP000").await?)?;
    assert_eq!(stored["status"], "In transit");

    Ok(())
}

#[tokio::test]
async fn test_space_only_changes_when_argument_is_empty() -> Result<()> {
    let service = seeded_service(EngineOptions::default()).await?;
    service.create_shipment(&shipment_args("ID3", "100")).await?;

    let ship = service
        .update_status(&status_args("SHIP000", "Loading", "ID3", "9m3"))
        .await?;
    assert_eq!(ship.space, "4m3");

    let ship = service
        .update_status(&status_args("SHIP000", "Loaded", "ID3", ""))
        .await?;
    assert_eq!(ship.space, "");

    Ok(())
}

#[tokio::test]
async fn test_update_status_validation() -> Result<()> {
    let service = seeded_service(EngineOptions::default()).await?;

    let err = service
        .update_status(&status_args("SHIP000", "Accepted", "ID3", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let err = service
        .update_status(&["SHIP000".to_string(), "Accepted".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));

    Ok(())
}

#[tokio::test]
async fn test_accepted_posts_deposit_without_touching_balances() -> Result<()> {
    let service = seeded_service(EngineOptions::default()).await?;
    let before = service.list_accounts().await?;
    service.create_shipment(&shipment_args("", "100")).await?;

    let ship = service
        .update_status(&status_args("SHIP000", "Accepted", "ID3", ""))
        .await?;
    assert_eq!(ship.status, ShipmentStatus::Accepted);
    assert_eq!(ship.carrier, "ID3");

    let transactions = service.list_transactions().await?;
    assert_eq!(transactions.len(), 1);
    let deposit = &transactions[0];
    assert_eq!(deposit.id, "TRANS000");
    assert_eq!(deposit.kind, TransactionType::Deposit);
    assert_eq!(deposit.sender, "ID3");
    assert_eq!(deposit.receiver, "");
    assert_eq!(deposit.amount, "100");
    assert_eq!(deposit.shipment_id, "SHIP000");

    assert_eq!(service.list_accounts().await?, before);
    Ok(())
}

#[tokio::test]
async fn test_not_delivered_without_deposit_is_inconsistent() -> Result<()> {
    let service = seeded_service(EngineOptions::default()).await?;
    let created = service.create_shipment(&shipment_args("ID3", "100")).await?;
    let before = service.list_accounts().await?;

    let err = service
        .update_status(&status_args("SHIP000", "not delivered", "ID3", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Inconsistent(_)));

    assert_eq!(service.get_shipment("SHIP000").await?, created);
    assert_eq!(service.list_accounts().await?, before);
    assert!(service.list_transactions().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_query_all_ships_lists_key_record_pairs() -> Result<()> {
    let service = seeded_service(EngineOptions::default()).await?;
    service.create_shipment(&shipment_args("ID3", "100")).await?;
    service.create_shipment(&shipment_args("ID5", "20")).await?;
    service
        .update_status(&status_args("SHIP000", "Accepted", "ID3", ""))
        .await?;

    let payload = service.query_all_ships().await?;
    let entries: serde_json::Value = serde_json::from_slice(&payload)?;
    let entries = entries.as_array().expect("array");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["Key"], "SHIP000");
    assert_eq!(entries[0]["Record"]["status"], "Accepted");
    assert_eq!(entries[1]["Key"], "SHIP001");
    assert_eq!(entries[1]["Record"]["carrier"], "ID5");
    assert_eq!(entries[1]["Record"]["creater_id"], "ID0");

    Ok(())
}

#[tokio::test]
async fn test_query_all_ships_empty() -> Result<()> {
    let service = seeded_service(EngineOptions::default()).await?;
    assert_eq!(service.query_all_ships().await?, b"[]".to_vec());
    Ok(())
}

#[tokio::test]
async fn test_query_all_ships_returns_stored_records_verbatim() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    let service = LedgerService::new(store.clone(), EngineOptions::default());
    service.create_shipment(&shipment_args("ID3", "100")).await?;
    store.put("SHIP001", br#"{"note":"hand written"}"#).await?;
    store.put("SHIP002", b"not json").await?;

    let payload = service.query_all_ships().await?;
    let entries: serde_json::Value = serde_json::from_slice(&payload)?;
    let entries = entries.as_array().expect("array");

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["Record"]["carrier"], "ID3");
    assert_eq!(entries[1]["Key"], "SHIP001");
    assert_eq!(entries[1]["Record"]["note"], "hand written");
    assert_eq!(entries[2]["Record"], "not json");

    Ok(())
}
