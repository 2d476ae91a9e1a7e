//! Contract Wallet Keyring CLI
//!
//! Command-line host that loads the persisted keyring, runs one operation
//! and writes the keyring back when it changed.

use alloy::consensus::TxLegacy;
use alloy::primitives::{hex, Address, Bytes, TxKind, U256};
use clap::{Parser, Subcommand};
use contract_wallet_keyring::{
    storage, AuditLog, ContractWalletKeyring, Error, Keyring, KeyringConfig, Result,
    UnsignedTransaction,
};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "keyring")]
#[command(about = "Owner key storage and signing for contract wallet proxies")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List known proxy addresses
    Accounts,

    /// Generate new owner keys
    Add {
        /// Number of accounts to generate
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Sign a raw 32-byte digest (no EIP-191 prefix)
    SignMessage {
        /// Proxy address, any case, with or without 0x
        #[arg(long)]
        address: String,

        /// Digest (hex encoded, with or without 0x prefix)
        #[arg(long)]
        data: String,
    },

    /// Sign a message with EIP-191 personal_sign
    SignPersonal {
        /// Proxy address, any case, with or without 0x
        #[arg(long)]
        address: String,

        /// UTF-8 message text
        #[arg(long)]
        message: String,
    },

    /// Sign a legacy transaction
    SignTx {
        /// Proxy address, any case, with or without 0x
        #[arg(long)]
        address: String,

        /// Recipient address
        #[arg(long)]
        to: String,

        /// Value in wei
        #[arg(long, default_value = "0")]
        value: String,

        #[arg(long, default_value_t = 0)]
        nonce: u64,

        #[arg(long, default_value_t = 21_000)]
        gas_limit: u64,

        /// Gas price in wei
        #[arg(long, default_value_t = 0)]
        gas_price: u128,

        /// Calldata (hex encoded, with or without 0x prefix)
        #[arg(long)]
        data: Option<String>,

        /// Overrides the configured chain id
        #[arg(long)]
        chain_id: Option<u64>,
    },

    /// Export a private key (not supported for contract wallets)
    Export {
        #[arg(long)]
        address: String,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = KeyringConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Accounts => {
            let keyring = open_keyring(&config).await?;
            for account in keyring.get_accounts().await? {
                println!("{}", account);
            }
        }
        Commands::Add { count } => {
            let keyring = open_keyring(&config).await?;
            let accounts = keyring.add_accounts(count).await?;
            storage::save(&config.keyring_path, &keyring.serialize().await?)?;
            tracing::info!(added = count, total = accounts.len(), "Keyring updated");
            for account in accounts {
                println!("{}", account);
            }
        }
        Commands::SignMessage { address, data } => {
            let keyring = open_keyring(&config).await?;
            println!("{}", keyring.sign_message(&address, &data).await?);
        }
        Commands::SignPersonal { address, message } => {
            let keyring = open_keyring(&config).await?;
            println!(
                "{}",
                keyring
                    .sign_personal_message(&address, message.as_bytes())
                    .await?
            );
        }
        Commands::SignTx {
            address,
            to,
            value,
            nonce,
            gas_limit,
            gas_price,
            data,
            chain_id,
        } => {
            let keyring = open_keyring(&config).await?;
            let tx = build_legacy_tx(&to, &value, nonce, gas_limit, gas_price, data.as_deref())?;
            let mut unsigned = UnsignedTransaction::new(tx);
            if let Some(chain_id) = chain_id.or(config.chain_id) {
                unsigned = unsigned.with_chain_id(chain_id);
            }

            let signed = keyring.sign_transaction(&address, unsigned).await?.into_signed()?;
            println!("Transaction SIGNED");
            println!("  Hash: {}", signed.hash());
            println!(
                "  Signature: {}",
                hex::encode_prefixed(signed.signature().as_bytes())
            );
        }
        Commands::Export { address } => {
            let keyring = open_keyring(&config).await?;
            println!("{}", keyring.export_account(&address).await?);
        }
    }

    Ok(())
}

/// Load the persisted keyring and attach the audit trail
async fn open_keyring(config: &KeyringConfig) -> Result<ContractWalletKeyring> {
    let mut keyring = ContractWalletKeyring::new();
    if let Some(path) = &config.audit_log_path {
        keyring = keyring.with_audit_log(AuditLog::new(path));
    }
    keyring.deserialize(storage::load(&config.keyring_path)?).await?;

    tracing::debug!(
        keyring_type = keyring.keyring_type(),
        path = %config.keyring_path.display(),
        "Keyring ready"
    );
    Ok(keyring)
}

fn build_legacy_tx(
    to: &str,
    value: &str,
    nonce: u64,
    gas_limit: u64,
    gas_price: u128,
    data: Option<&str>,
) -> Result<TxLegacy> {
    let to = Address::from_str(to)
        .map_err(|e| Error::InvalidArgument(format!("Invalid recipient address: {}", e)))?;
    let value = U256::from_str(value)
        .map_err(|e| Error::InvalidArgument(format!("Invalid value: {}", e)))?;
    let input = match data {
        Some(data) => {
            let data = data.strip_prefix("0x").unwrap_or(data);
            Bytes::from(
                hex::decode(data)
                    .map_err(|e| Error::InvalidArgument(format!("Invalid calldata: {}", e)))?,
            )
        }
        None => Bytes::new(),
    };

    Ok(TxLegacy {
        chain_id: None,
        nonce,
        gas_price,
        gas_limit,
        to: TxKind::Call(to),
        value,
        input,
    })
}
