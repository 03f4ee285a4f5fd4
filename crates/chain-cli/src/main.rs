use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "chain-cli")]
#[command(about = "CLI client for the chain node")]
struct Cli {
    /// Node base URL (e.g. http://127.0.0.1:8080)
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    node: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a transaction
    Submit {
        /// Sender
        #[arg(long)]
        sender: String,
        /// Recipient
        #[arg(long)]
        recipient: String,
        /// Amount
        #[arg(long)]
        amount: u64,
        /// Optional free-text note
        #[arg(long)]
        message: Option<String>,
    },
    /// Mine a new block
    Mine,
    /// Print the full chain
    Chain,
    /// List known peer nodes
    Peers,
    /// Register peer node addresses
    Register {
        /// Peer addresses, e.g. http://10.0.0.2:5000
        addresses: Vec<String>,
    },
    /// Run conflict resolution against known peers
    Resolve,
    /// Persist newly mined blocks
    Save,
}

#[derive(Serialize)]
struct TxRequest {
    sender: String,
    recipient: String,
    amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Serialize)]
struct RegisterRequest {
    nodes: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let node = cli.node;

    let response = match cli.cmd {
        Command::Submit {
            sender,
            recipient,
            amount,
            message,
        } => {
            let tx = TxRequest {
                sender,
                recipient,
                amount,
                message,
            };
            client
                .post(format!("{node}/transactions/new"))
                .json(&tx)
                .send()
                .await?
        }
        Command::Mine => client.get(format!("{node}/mine")).send().await?,
        Command::Chain => client.get(format!("{node}/chain")).send().await?,
        Command::Peers => client.get(format!("{node}/nodes")).send().await?,
        Command::Register { addresses } => {
            let body = RegisterRequest { nodes: addresses };
            client
                .post(format!("{node}/nodes/register"))
                .json(&body)
                .send()
                .await?
        }
        Command::Resolve => client.get(format!("{node}/nodes/resolve")).send().await?,
        Command::Save => client.get(format!("{node}/save")).send().await?,
    };

    let status = response.status();
    let body = response.text().await?;
    println!("status: {}", status);
    println!("{body}");
    Ok(())
}
