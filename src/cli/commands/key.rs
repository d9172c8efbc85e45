use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use crate::auth::read_notice_key;
use crate::cli::config::ClientConfig;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct KeyArgs {
    #[arg(long, help = "Read the key from this api-key.txt instead of searching")]
    pub path: Option<PathBuf>,
}

pub async fn handle(args: KeyArgs, config: &ClientConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let key = match args.path {
        Some(path) => read_notice_key(&path)?
            .ok_or_else(|| anyhow::anyhow!("no API key line found in {}", path.display()))?,
        None => config.resolve_api_key()?,
    };

    match output_format {
        OutputFormat::Json => output_success(&output_format, "API key found", Some(json!({ "api_key": key }))),
        OutputFormat::Text => {
            println!("{}", key);
            Ok(())
        }
    }
}
