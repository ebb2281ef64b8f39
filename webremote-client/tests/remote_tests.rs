//! Integration tests for the control channel driver against a local
//! WebSocket player

use std::sync::{Arc, Mutex};

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;
use webremote_client::remote::{RemoteClient, UserCommand};
use webremote_client::sync::AlbumArt;
use webremote_client::SyncEvent;
use webremote_common::api::{Signature, Signer};
use webremote_common::config::ClientConfig;
use webremote_common::protocol::TransportAction;

const ACCESS_KEY: &str = "hunter2";

/// Accept one connection; record the handshake path; hand back the socket
async fn accept_one(
    listener: TcpListener,
) -> (
    tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>,
    String,
) {
    let (stream, _) = listener.accept().await.unwrap();
    let path = Arc::new(Mutex::new(String::new()));
    let seen = path.clone();
    let ws = tokio_tungstenite::accept_hdr_async(stream, move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
        *seen.lock().unwrap() = req.uri().path().to_string();
        Ok(resp)
    })
    .await
    .unwrap();
    let path = path.lock().unwrap().clone();
    (ws, path)
}

async fn next_text(ws: &mut tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>) -> serde_json::Value {
    loop {
        match ws.next().await.unwrap().unwrap() {
            Message::Text(text) => return serde_json::from_str(&text).unwrap(),
            _ => continue,
        }
    }
}

async fn local_client() -> (RemoteClient, TcpListener) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = ClientConfig {
        host: "127.0.0.1".to_string(),
        port,
        access_key: ACCESS_KEY.to_string(),
        ..Default::default()
    };
    (RemoteClient::new(config), listener)
}

#[tokio::test]
async fn test_session_reflects_player_snapshot() {
    let (client, listener) = local_client().await;

    let server = tokio::spawn(async move {
        let (mut ws, path) = accept_one(listener).await;

        // Signature follows the channel path after a colon
        let (channel, query) = path.split_once(':').unwrap();
        assert_eq!(channel, "/ws/player");
        let signature = Signature::from_query(query).unwrap();
        assert!(Signer::new(ACCESS_KEY).verify("/ws/player", &signature));

        let request = next_text(&mut ws).await;
        assert_eq!(request, serde_json::json!({"action": "status"}));

        ws.send(Message::Text(
            r#"{"hostname": "studio", "id": 7, "title": "Song", "artist": "Band",
                "album": "Record", "duration": 215.5, "playing": false,
                "position": 61000, "albumart": null}"#
                .to_string(),
        ))
        .await
        .unwrap();
        ws.send(Message::Text("not json".to_string())).await.unwrap();
        ws.close(None).await.unwrap();
    });

    let (_tx, rx) = mpsc::unbounded_channel();
    let display = client.run(rx).await.unwrap();
    server.await.unwrap();

    assert_eq!(display.title.as_deref(), Some("Song"));
    assert_eq!(display.album.as_deref(), Some("Record"));
    assert_eq!(display.position_ms, 61_000);
    assert_eq!(display.position_text(), "01:01");
    assert_eq!(display.duration_text(), "03:35");
    assert_eq!(display.album_art, Some(AlbumArt::Missing));
    assert!(!display.playing);
    // Channel closed: hostname no longer known
    assert!(!display.connected);
    assert!(display.hostname.is_none());
}

#[tokio::test]
async fn test_user_commands_reach_player() {
    let (client, listener) = local_client().await;

    let server = tokio::spawn(async move {
        let (mut ws, _) = accept_one(listener).await;
        let mut received = Vec::new();
        for _ in 0..3 {
            received.push(next_text(&mut ws).await);
        }
        // Client closes after quit
        while let Some(Ok(message)) = ws.next().await {
            if message.is_close() {
                break;
            }
        }
        received
    });

    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(UserCommand::Event(SyncEvent::Transport(TransportAction::Next)))
        .unwrap();
    tx.send(UserCommand::Event(SyncEvent::Seek { position_ms: 30_000 }))
        .unwrap();
    tx.send(UserCommand::Quit).unwrap();

    client.run(rx).await.unwrap();
    let received = server.await.unwrap();

    assert_eq!(
        received,
        vec![
            serde_json::json!({"action": "status"}),
            serde_json::json!({"action": "next"}),
            serde_json::json!({"action": "seek", "time": 30.0}),
        ]
    );
}

#[tokio::test]
async fn test_connection_refused() {
    let (client, listener) = local_client().await;
    drop(listener);

    let (_tx, rx) = mpsc::unbounded_channel();
    assert!(client.run(rx).await.is_err());
}
