//! `TronServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → hall → game.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tron_game::DEFAULT_MAILBOX_CAPACITY;
use tron_protocol::{Codec, JsonCodec};
use tron_room::{Hall, RoomConfig};
use tron_transport::{Connection, Transport, WebSocketTransport};

use crate::TronError;
use crate::handler::handle_connection;

/// How long a new connection has to send `JoinRoom`.
pub const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-connection settings.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ConnectionSettings {
    pub(crate) join_timeout: Duration,
    pub(crate) mailbox_capacity: usize,
}

/// Shared server state passed to each connection task.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) hall: Hall,
    pub(crate) codec: C,
    pub(crate) settings: ConnectionSettings,
}

/// Builder for configuring and starting a server.
///
/// # Example
///
/// ```rust,no_run
/// use tron::prelude::*;
///
/// # async fn start() -> Result<(), TronError> {
/// let server = TronServer::builder()
///     .bind("0.0.0.0:8080")
///     .room_config(RoomConfig::default())
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TronServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    join_timeout: Duration,
    mailbox_capacity: usize,
}

impl TronServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
            join_timeout: DEFAULT_JOIN_TIMEOUT,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }

    /// Sets the address to bind to. Port 0 picks a free port.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets room capacity and the settings of every game.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    pub fn join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout = timeout;
        self
    }

    /// Sets how many undelivered events a slow client may have queued
    /// before further ones are dropped.
    pub fn mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity.max(1);
        self
    }

    /// Binds the listener and builds the server with a [`JsonCodec`].
    pub async fn build(self) -> Result<TronServer<JsonCodec>, TronError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let state = Arc::new(ServerState {
            hall: Hall::new(self.room_config),
            codec: JsonCodec,
            settings: ConnectionSettings {
                join_timeout: self.join_timeout,
                mailbox_capacity: self.mailbox_capacity,
            },
        });
        Ok(TronServer { transport, state })
    }
}

impl Default for TronServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound server. Call [`run()`](Self::run) to start accepting
/// connections.
pub struct TronServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl TronServer<JsonCodec> {
    pub fn builder() -> TronServerBuilder {
        TronServerBuilder::new()
    }
}

impl<C: Codec> TronServer<C> {
    pub fn local_addr(&self) -> Result<SocketAddr, TronError> {
        Ok(self.transport.local_addr()?)
    }

    /// Runs the accept loop until the process ends.
    ///
    /// Each connection gets its own task. A failed accept is logged and
    /// does not stop the loop.
    pub async fn run(mut self) -> Result<(), TronError> {
        tracing::info!(addr = %self.local_addr()?, "tron server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        let conn_id = conn.id();
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(%conn_id, error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                }
            }
        }
    }
}
