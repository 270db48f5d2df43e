//! The native WebSocket transport against a live server.

use mapink_core::{Action, ActionClient, ActionResult, Transport, WsTransport};
use mapink_server::{AppState, router};
use std::sync::Arc;

async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(Arc::new(AppState::default()))).await.unwrap();
    });
    format!("ws://{addr}/ws")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_client_round_trips_over_websocket() {
    let url = spawn_server().await;

    let snapshot = tokio::task::spawn_blocking(move || {
        let transport = WsTransport::connect(&url).unwrap();
        let client = ActionClient::new(transport);

        for point in [(10.0, 10.0), (20.0, 10.0)] {
            let trip = pollster::block_on(client.perform_action(&Action::AddPathSegment { point: point.into() }));
            assert_eq!(trip.result.unwrap(), ActionResult::ok("Segment added."));
            let last = trip.snapshot.unwrap().temp_path.last().map(|p| (p.x, p.y));
            assert_eq!(last, Some(point));
        }

        let trip = pollster::block_on(client.perform_action(&Action::FinishPath { tool: "road".into() }));
        assert!(trip.delivered());
        assert_eq!(trip.status(), "Path added.");
        trip.snapshot.unwrap()
    })
    .await
    .unwrap();

    let road = snapshot.path_elements().next().unwrap();
    assert_eq!(road.path.len(), 2);
    assert!(snapshot.temp_path.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejection_travels_as_result() {
    let url = spawn_server().await;

    tokio::task::spawn_blocking(move || {
        let transport = WsTransport::connect(&url).unwrap();
        let result = pollster::block_on(transport.send_action(&Action::FinishPath { tool: "tree".into() })).unwrap();
        assert!(!result.success);
        assert_eq!(result.message, "'tree' is not a path element type.");

        transport.close();
        assert!(pollster::block_on(transport.fetch_state()).is_err());
    })
    .await
    .unwrap();
}
