//! Integration tests for the WebSocket transport against a real
//! `tokio-tungstenite` client.

#[cfg(feature = "websocket")]
mod websocket {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;
    use tron_transport::{Connection, Transport, WebSocketConnection, WebSocketTransport};

    type Client =
        tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

    /// Binds on a free port and returns one accepted connection plus the
    /// client talking to it.
    async fn connected_pair() -> (WebSocketConnection, Client) {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr: SocketAddr = transport.local_addr().expect("bound address");

        let server = tokio::spawn(async move { transport.accept().await.expect("should accept") });
        let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        let conn = server.await.expect("accept task");
        (conn, client)
    }

    #[tokio::test]
    async fn test_local_addr_reports_assigned_port() {
        let transport = WebSocketTransport::bind("127.0.0.1:0").await.unwrap();
        assert_ne!(transport.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_json_goes_out_as_text_frame() {
        let (conn, mut client) = connected_pair().await;
        assert!(conn.id().into_inner() > 0);

        conn.send(br#"{"type":"Ready","color":"blue"}"#).await.unwrap();

        let msg = client.next().await.unwrap().unwrap();
        assert!(msg.is_text());
        assert_eq!(msg.into_text().unwrap().as_str(), r#"{"type":"Ready","color":"blue"}"#);
    }

    #[tokio::test]
    async fn test_recv_text_and_binary() {
        let (conn, mut client) = connected_pair().await;

        client.send(Message::text("hello".to_owned())).await.unwrap();
        client.send(Message::binary(vec![1u8, 2, 3])).await.unwrap();

        assert_eq!(conn.recv().await.unwrap().unwrap(), b"hello");
        assert_eq!(conn.recv().await.unwrap().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_send_while_recv_pending() {
        let (conn, mut client) = connected_pair().await;
        let conn = Arc::new(conn);

        let reader = {
            let conn = Arc::clone(&conn);
            tokio::spawn(async move { conn.recv().await })
        };
        // Let the reader park on the stream half.
        tokio::time::sleep(Duration::from_millis(20)).await;

        tokio::time::timeout(Duration::from_secs(1), conn.send(b"tick"))
            .await
            .expect("send must not wait for recv")
            .unwrap();
        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"tick");

        client.send(Message::text("move".to_owned())).await.unwrap();
        let got = reader.await.unwrap().unwrap().unwrap();
        assert_eq!(got, b"move");
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_client_close() {
        let (conn, mut client) = connected_pair().await;

        client.send(Message::Close(None)).await.unwrap();

        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_server_close_reaches_client() {
        let (conn, mut client) = connected_pair().await;

        conn.close().await.unwrap();

        match client.next().await {
            Some(Ok(Message::Close(_))) | None => {}
            other => panic!("expected close, got {other:?}"),
        }
    }
}
