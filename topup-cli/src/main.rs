//! Top-Up CLI
//!
//! Command-line interface for the Top-Up API.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use topup_client::TopUpClient;

#[derive(Parser)]
#[command(name = "topup")]
#[command(author, version, about = "Top-Up API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Top-Up API
    #[arg(long, env = "TOPUP_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// User the requests are made on behalf of
    #[arg(long, env = "TOPUP_USER_ID")]
    user_id: Option<i64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recharge a mobile line
    Recharge {
        /// Mobile number (10 digits starting with 3)
        #[arg(long)]
        phone: String,
        /// Amount in pesos (1000 to 100000)
        #[arg(long)]
        value: Decimal,
        /// Supplier id (8753, 9773, 3398, 4689)
        #[arg(long)]
        supplier: String,
    },
    /// Transaction operations
    Transaction {
        #[command(subcommand)]
        action: TransactionCommands,
    },
    /// List available suppliers
    Suppliers,
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum TransactionCommands {
    /// List your transactions, newest first
    List {
        #[arg(long, default_value = "0")]
        page: u32,
        #[arg(long, default_value = "20")]
        size: u32,
    },
    /// Get transaction details
    Get { id: i64 },
    /// Hide a transaction from listings
    Delete { id: i64 },
    /// Restore a hidden transaction
    Reactivate { id: i64 },
    /// List transactions sent to a phone number
    Phone { phone: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut client = TopUpClient::new(&cli.api_url);
    if let Some(user_id) = cli.user_id {
        client = client.with_user_id(user_id);
    }

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Recharge {
            phone,
            value,
            supplier,
        } => {
            let tx = client.top_up(&phone, value, &supplier).await?;
            println!("{}", serde_json::to_string_pretty(&tx)?);
        }

        Commands::Transaction { action } => match action {
            TransactionCommands::List { page, size } => {
                let page = client.list_transactions(page, size).await?;
                println!("{}", serde_json::to_string_pretty(&page)?);
            }
            TransactionCommands::Get { id } => {
                let tx = client.get_transaction(id).await?;
                println!("{}", serde_json::to_string_pretty(&tx)?);
            }
            TransactionCommands::Delete { id } => {
                client.delete_transaction(id).await?;
                println!("✓ Transaction {} deleted", id);
            }
            TransactionCommands::Reactivate { id } => {
                let tx = client.reactivate_transaction(id).await?;
                println!("{}", serde_json::to_string_pretty(&tx)?);
            }
            TransactionCommands::Phone { phone } => {
                let txs = client.transactions_by_phone(&phone).await?;
                println!("{}", serde_json::to_string_pretty(&txs)?);
            }
        },

        Commands::Suppliers => {
            let suppliers = client.list_suppliers().await?;
            println!("{}", serde_json::to_string_pretty(&suppliers)?);
        }
    }

    Ok(())
}
