use clap::Args;
use serde_json::json;

use crate::api::BlockPlacementRequest;
use crate::cli::client::ScriptyClient;
use crate::cli::config::ClientConfig;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::game::Material;

#[derive(Args)]
pub struct BlockArgs {
    #[arg(allow_negative_numbers = true, help = "X coordinate")]
    pub x: f64,

    #[arg(allow_negative_numbers = true, help = "Y coordinate")]
    pub y: f64,

    #[arg(allow_negative_numbers = true, help = "Z coordinate")]
    pub z: f64,

    #[arg(help = "Block material, e.g. STONE or diamond_block")]
    pub material: String,

    #[arg(long, help = "Target world (defaults to \"world\")")]
    pub world: Option<String>,
}

pub async fn handle(args: BlockArgs, config: &ClientConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    // Reject typos before touching the network
    let material: Material = args
        .material
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid block type: {}", args.material))?;

    let world = args.world.unwrap_or_else(|| config.default_world.clone());
    let api_key = config.resolve_api_key()?;
    let client = ScriptyClient::new(config, api_key)?;

    let request = BlockPlacementRequest::new(world.clone(), args.x, args.y, args.z, material.name());
    let response = client.place_block(&request).await?;

    let data = response.data.unwrap_or_else(|| {
        json!({ "world": world, "x": args.x, "y": args.y, "z": args.z, "material": material.name() })
    });
    output_success(&output_format, &response.message, Some(data))
}
