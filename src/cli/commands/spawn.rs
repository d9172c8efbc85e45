use clap::Args;
use serde_json::json;

use crate::api::EntitySpawnRequest;
use crate::cli::client::ScriptyClient;
use crate::cli::config::ClientConfig;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::game::EntityType;

#[derive(Args)]
pub struct SpawnArgs {
    #[arg(allow_negative_numbers = true, help = "X coordinate")]
    pub x: f64,

    #[arg(allow_negative_numbers = true, help = "Y coordinate")]
    pub y: f64,

    #[arg(allow_negative_numbers = true, help = "Z coordinate")]
    pub z: f64,

    #[arg(help = "Entity type, e.g. ZOMBIE or iron_golem")]
    pub entity_type: EntityType,

    #[arg(long, help = "Target world (defaults to \"world\")")]
    pub world: Option<String>,
}

pub async fn handle(args: SpawnArgs, config: &ClientConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let world = args.world.unwrap_or_else(|| config.default_world.clone());
    let api_key = config.resolve_api_key()?;
    let client = ScriptyClient::new(config, api_key)?;

    let request = EntitySpawnRequest {
        world: world.clone(),
        x: args.x,
        y: args.y,
        z: args.z,
        entity_type: args.entity_type,
    };
    let response = client.spawn_entity(&request).await?;

    // The server answers before the spawn runs, so echo what was asked for
    let data = json!({
        "world": world,
        "x": args.x,
        "y": args.y,
        "z": args.z,
        "entityType": args.entity_type.name(),
    });
    output_success(&output_format, &response.message, Some(data))
}
