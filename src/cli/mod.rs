use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use crate::application::{EngineOptions, LedgerService, Response};
use crate::domain::Shipment;
use crate::io::Exporter;

/// Shipledger - shipment escrow ledger
#[derive(Parser)]
#[command(name = "shipledger")]
#[command(about = "Track shipments through their lifecycle with a ledger of escrow postings")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "SHIPLEDGER_DB", default_value = "shipledger.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Re-apply the deposit's balance delta on every deposit lookup
    #[arg(long, global = true, env = "SHIPLEDGER_LEGACY_LOOKUP")]
    pub legacy_lookup: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database and seed the accounts
    Init,

    /// Create a shipment
    Create {
        /// Account id of the creator
        creator: String,

        /// Carrier account id (empty: first responder becomes carrier)
        #[arg(long, default_value = "")]
        carrier: String,

        /// Recipient account id
        #[arg(long)]
        recipient: String,

        /// Retailer account id
        #[arg(long)]
        retailer: String,

        /// Price as decimal text (e.g., "100" or "99.50")
        #[arg(long)]
        price: String,

        #[arg(long, default_value = "")]
        pickup: String,

        #[arg(long, default_value = "")]
        destination: String,

        /// Free-text description of the contents
        #[arg(long, default_value = "")]
        contents: String,

        #[arg(long, default_value = "")]
        space: String,

        #[arg(long, default_value = "")]
        startpoint: String,

        #[arg(long, default_value = "")]
        endpoint: String,
    },

    /// Change the status of a shipment
    Status {
        /// Shipment id (e.g., SHIP000)
        id: String,

        /// New status ("Accepted", "Approved", "not delivered", or any text)
        status: String,

        /// Account id of whoever changes the status
        changer: String,

        #[arg(long, default_value = "")]
        space: String,
    },

    /// List all shipments
    Ships,

    /// Show the raw record stored under a key
    Get {
        /// Record key (e.g., SHIP000, TRANS001, ID3)
        key: String,
    },

    /// Show account balances
    Accounts,

    /// List ledger transactions
    Transactions,

    /// Call an operation by name with positional string arguments
    Invoke {
        /// Operation name (e.g., createShipment, updateStatus, queryId)
        function: String,

        args: Vec<String>,
    },

    /// Export records
    Export {
        #[arg(value_enum)]
        what: ExportKind,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportKind {
    Accounts,
    Shipments,
    Transactions,
    Json,
}

impl Cli {
    fn options(&self) -> EngineOptions {
        EngineOptions {
            legacy_lookup: self.legacy_lookup,
        }
    }

    fn init_tracing(&self) {
        let default = if self.verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    pub async fn run(self) -> Result<()> {
        self.init_tracing();
        let options = self.options();

        let service = match self.command {
            Commands::Init => LedgerService::init(&self.database, options)
                .await
                .with_context(|| format!("Failed to create database {}", self.database))?,
            _ => connect(&self.database, options).await?,
        };

        run_command(&service, self.command).await
    }
}

async fn connect(database: &str, options: EngineOptions) -> Result<LedgerService> {
    if !Path::new(database).exists() {
        bail!("Database not found: {}. Run `shipledger init` first.", database);
    }
    LedgerService::connect(database, options)
        .await
        .context("Failed to open ledger")
}

async fn run_command(service: &LedgerService, command: Commands) -> Result<()> {
    match command {
        Commands::Init => {
            let accounts = service.init_ledger().await?;
            println!("Ledger initialized ({} accounts)", accounts.len());
        }

        Commands::Create {
            creator,
            carrier,
            recipient,
            retailer,
            price,
            pickup,
            destination,
            contents,
            space,
            startpoint,
            endpoint,
        } => {
            let args = vec![
                creator,
                carrier,
                recipient,
                retailer,
                price,
                pickup,
                destination,
                contents,
                space,
                startpoint,
                endpoint,
            ];
            let shipment = service.create_shipment(&args).await?;
            println!("Created shipment {} ({})", shipment.id, shipment.status);
        }

        Commands::Status {
            id,
            status,
            changer,
            space,
        } => {
            let shipment = service
                .update_status(&[id, status, changer, space])
                .await?;
            println!(
                "Shipment {} is now '{}' (carrier: {})",
                shipment.id,
                shipment.status,
                display_or_dash(&shipment.carrier)
            );
        }

        Commands::Ships => {
            let shipments = service.list_shipments().await?;
            print_shipments(&shipments);
        }

        Commands::Get { key } => {
            let bytes = service.query_id(&key).await?;
            if bytes.is_empty() {
                println!("No record stored under {}", key);
            } else {
                println!("{}", String::from_utf8_lossy(&bytes));
            }
        }

        Commands::Accounts => {
            let accounts = service.list_accounts().await?;
            if accounts.is_empty() {
                println!("No accounts found.");
            } else {
                println!("{:<6} {:<24} {:>14}", "ID", "NAME", "BALANCE");
                println!("{}", "-".repeat(46));
                for account in accounts {
                    println!(
                        "{:<6} {:<24} {:>14}",
                        account.id,
                        truncate(&account.name, 24),
                        account.balance
                    );
                }
            }
        }

        Commands::Transactions => {
            let transactions = service.list_transactions().await?;
            if transactions.is_empty() {
                println!("No transactions found.");
            } else {
                println!(
                    "{:<10} {:<9} {:<8} {:<8} {:<8} {:>12}",
                    "ID", "SHIPMENT", "TYPE", "SENDER", "RECEIVER", "AMOUNT"
                );
                println!("{}", "-".repeat(60));
                for tx in transactions {
                    println!(
                        "{:<10} {:<9} {:<8} {:<8} {:<8} {:>12}",
                        tx.id,
                        tx.shipment_id,
                        tx.kind.as_str(),
                        display_or_dash(&tx.sender),
                        display_or_dash(&tx.receiver),
                        tx.amount
                    );
                }
            }
        }

        Commands::Invoke { function, args } => match service.invoke(&function, &args).await {
            Response::Success(payload) => {
                if !payload.is_empty() {
                    println!("{}", String::from_utf8_lossy(&payload));
                }
            }
            Response::Error(message) => bail!("{} failed: {}", function, message),
        },

        Commands::Export { what, output } => {
            run_export_command(service, what, output).await?;
        }
    }

    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    what: ExportKind,
    output: Option<String>,
) -> Result<()> {
    let exporter = Exporter::new(service);

    let writer: Box<dyn std::io::Write> = match &output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path))?,
        ),
        None => Box::new(std::io::stdout()),
    };

    let count = match what {
        ExportKind::Accounts => exporter.export_accounts_csv(writer).await?,
        ExportKind::Shipments => exporter.export_shipments_csv(writer).await?,
        ExportKind::Transactions => exporter.export_transactions_csv(writer).await?,
        ExportKind::Json => {
            let snapshot = exporter.export_full_json(writer).await?;
            snapshot.accounts.len() + snapshot.shipments.len() + snapshot.transactions.len()
        }
    };

    if let Some(path) = output {
        println!("Exported {} records to {}", count, path);
    }
    Ok(())
}

fn print_shipments(shipments: &[Shipment]) {
    if shipments.is_empty() {
        println!("No shipments found.");
        return;
    }

    println!(
        "{:<8} {:<16} {:<8} {:<8} {:<8} {:>10}",
        "ID", "STATUS", "CARRIER", "RECIP.", "RETAIL.", "PRICE"
    );
    println!("{}", "-".repeat(63));
    for ship in shipments {
        println!(
            "{:<8} {:<16} {:<8} {:<8} {:<8} {:>10}",
            ship.id,
            truncate(ship.status.as_str(), 16),
            display_or_dash(&ship.carrier),
            display_or_dash(&ship.recipient),
            display_or_dash(&ship.retailer),
            ship.price
        );
    }
}

fn display_or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
