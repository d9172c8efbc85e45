mod common;

use scripty_api::api::{BlockPlacementRequest, EntitySpawnRequest};
use scripty_api::cli::client::{ClientError, ScriptyClient};
use scripty_api::cli::config::ClientConfig;
use scripty_api::game::{BlockPos, EntityType, Material};
use scripty_api::server;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use common::{TestApp, TEST_KEY};

/// Serves the app on an ephemeral port until the returned sender fires
async fn serve(app: &TestApp) -> (ClientConfig, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let state = app.state.clone();
    tokio::spawn(async move {
        server::serve_on(listener, state, async {
            let _ = stop_rx.await;
        })
        .await
        .unwrap();
    });

    let config = ClientConfig {
        host: "127.0.0.1".to_string(),
        port,
        timeout_secs: 5,
        ..ClientConfig::default()
    };
    (config, stop_tx)
}

#[tokio::test]
async fn test_client_places_block() {
    let app = TestApp::new();
    let (config, _stop) = serve(&app).await;

    let client = ScriptyClient::new(&config, TEST_KEY).unwrap();
    let response = client
        .place_block(&BlockPlacementRequest::new("world", 3.0, 70.0, -4.0, "cobblestone"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.message, "Block placed successfully");
    assert_eq!(app.block_at("world", BlockPos::new(3, 70, -4)).await, Some(Material::Cobblestone));
}

#[tokio::test]
async fn test_client_spawns_entity() {
    let app = TestApp::new();
    let (config, _stop) = serve(&app).await;

    let client = ScriptyClient::new(&config, TEST_KEY).unwrap();
    let response = client
        .spawn_entity(&EntitySpawnRequest {
            world: "world".to_string(),
            x: 1.0,
            y: 64.0,
            z: 1.0,
            entity_type: EntityType::Pig,
        })
        .await
        .unwrap();

    assert_eq!(response.message, "Entity spawn scheduled");
    app.flush().await;
    assert_eq!(app.entities("world").await[0].entity_type, EntityType::Pig);
}

#[tokio::test]
async fn test_client_reports_wrong_key() {
    let app = TestApp::new();
    let (config, _stop) = serve(&app).await;

    let client = ScriptyClient::new(&config, "not-the-key").unwrap();
    let err = client
        .place_block(&BlockPlacementRequest::new("world", 0.0, 64.0, 0.0, "STONE"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Authentication), "{err:?}");
    assert_eq!(app.set_block_calls(), 0);
}

#[tokio::test]
async fn test_client_surfaces_server_message() {
    let app = TestApp::new();
    let (config, _stop) = serve(&app).await;

    let client = ScriptyClient::new(&config, TEST_KEY).unwrap();
    let err = client
        .place_block(&BlockPlacementRequest::new("missing_world", 0.0, 64.0, 0.0, "STONE"))
        .await
        .unwrap_err();

    match err {
        ClientError::Server(message) => assert_eq!(message, "Failed to place block"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_client_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ClientConfig {
        host: "127.0.0.1".to_string(),
        port,
        timeout_secs: 2,
        ..ClientConfig::default()
    };
    let client = ScriptyClient::new(&config, TEST_KEY).unwrap();
    let err = client
        .place_block(&BlockPlacementRequest::new("world", 0.0, 64.0, 0.0, "STONE"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Connection(_)), "{err:?}");
}
