pub mod client;
pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use self::config::ClientConfig;

#[derive(Parser)]
#[command(name = "scripty")]
#[command(about = "Scripty CLI - place blocks and spawn entities through the Scripty REST API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, default_value = "localhost", help = "Server hostname")]
    pub host: String,

    #[arg(long, global = true, default_value_t = 6060, help = "Server port")]
    pub port: u16,

    #[arg(long, global = true, help = "API key (otherwise SCRIPTY_API_KEY or an api-key.txt file)")]
    pub api_key: Option<String>,

    #[arg(long, global = true, default_value_t = 10, help = "Request timeout in seconds")]
    pub timeout_secs: u64,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Place a block")]
    Block(commands::block::BlockArgs),

    #[command(about = "Spawn an entity")]
    Spawn(commands::spawn::SpawnArgs),

    #[command(about = "Show the API key discovered on this machine")]
    Key(commands::key::KeyArgs),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = ClientConfig {
        host: cli.host,
        port: cli.port,
        api_key: cli.api_key,
        timeout_secs: cli.timeout_secs,
        ..ClientConfig::default()
    };

    match cli.command {
        Commands::Block(args) => commands::block::handle(args, &config, output_format).await,
        Commands::Spawn(args) => commands::spawn::handle(args, &config, output_format).await,
        Commands::Key(args) => commands::key::handle(args, &config, output_format).await,
    }
}
