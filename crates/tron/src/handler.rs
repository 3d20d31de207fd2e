//! Per-connection handler: room join, matchmaking and event forwarding.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Receive `JoinRoom` within the join timeout → attach to the room
//!   2. Admit into the room's forming game → send `Ready`
//!   3. Loop: forward client moves to the game and game events to the
//!      client, whichever arrives first

use std::sync::Arc;

use tron_arena::Color;
use tron_game::{GameEvent, GameHandle, Mailbox, PlayerHandle, PlayerId};
use tron_protocol::{ClientMessage, Codec, ProtocolError, ServerMessage};
use tron_room::Room;
use tron_transport::{Connection, WebSocketConnection};

use crate::TronError;
use crate::server::ServerState;

/// Drop guard that detaches the player from their room when the handler
/// exits, including on error or panic. `Drop` is synchronous, so the
/// async leave runs on a spawned task.
struct HallGuard<C: Codec> {
    room: String,
    player_id: PlayerId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for HallGuard<C> {
    fn drop(&mut self) {
        let room = std::mem::take(&mut self.room);
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.hall.leave(&room, player_id).await;
        });
    }
}

/// The game a connection currently plays in.
struct Seat {
    game: GameHandle,
    color: Color,
    mailbox: Mailbox,
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), TronError> {
    let conn_id = conn.id();
    let player_id = PlayerId(conn_id.into_inner());
    tracing::debug!(%conn_id, peer = %conn.peer_addr(), "handling new connection");

    // --- Step 1: JoinRoom ---
    let room_name = await_join(&conn, &state).await?;
    let room = match state.hall.join(&room_name, player_id).await {
        Ok(room) => room,
        Err(e) => {
            send(&conn, &state.codec, &ServerMessage::error(e.to_string())).await?;
            let _ = conn.close().await;
            return Err(e.into());
        }
    };
    let _guard = HallGuard {
        room: room_name,
        player_id,
        state: Arc::clone(&state),
    };
    tracing::info!(%player_id, room = %room.name(), "player joined");

    // --- Step 2: first game ---
    let mut seat = Some(take_seat(&conn, &state, &room, player_id).await?);

    // --- Step 3: event loop ---
    loop {
        tokio::select! {
            incoming = conn.recv() => {
                let data = match incoming {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%player_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "recv error");
                        break;
                    }
                };

                let msg: ClientMessage = match state.codec.decode(&data) {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "malformed client message, closing");
                        let _ = conn.close().await;
                        return Err(e.into());
                    }
                };

                match msg {
                    ClientMessage::Ready => {
                        // The old mailbox is dropped with the old seat.
                        seat = Some(take_seat(&conn, &state, &room, player_id).await?);
                    }
                    ClientMessage::Move { direction } => match &seat {
                        Some(seat) => {
                            seat.game.submit(seat.color, direction);
                        }
                        None => tracing::debug!(%player_id, "move outside a game, ignoring"),
                    },
                    ClientMessage::Leave => {
                        tracing::info!(%player_id, "player left");
                        break;
                    }
                    ClientMessage::JoinRoom { room: other } => {
                        tracing::debug!(%player_id, room = %other, "already in a room, ignoring JoinRoom");
                    }
                }
            }

            event = next_event(&mut seat) => match event {
                Some(event) => {
                    send(&conn, &state.codec, &ServerMessage::from(&event)).await?;
                    if let GameEvent::End { winner } = event {
                        tracing::debug!(%player_id, ?winner, "game over for player");
                    }
                }
                // The game worker has finished and released the mailbox.
                None => seat = None,
            },
        }
    }

    // _guard drops here → hall leave fires.
    Ok(())
}

/// Waits for the first frame, which must be `JoinRoom`.
async fn await_join<C: Codec>(
    conn: &WebSocketConnection,
    state: &ServerState<C>,
) -> Result<String, TronError> {
    let data = match tokio::time::timeout(state.settings.join_timeout, conn.recv()).await {
        Ok(Ok(Some(data))) => data,
        Ok(Ok(None)) => {
            return Err(ProtocolError::InvalidMessage("connection closed before JoinRoom".into()).into());
        }
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => {
            return Err(ProtocolError::InvalidMessage("JoinRoom timed out".into()).into());
        }
    };

    let msg: ClientMessage = state.codec.decode(&data)?;
    match msg {
        ClientMessage::JoinRoom { room } => Ok(room),
        _ => {
            send(conn, &state.codec, &ServerMessage::error("expected JoinRoom")).await?;
            let _ = conn.close().await;
            Err(ProtocolError::InvalidMessage("first message must be JoinRoom".into()).into())
        }
    }
}

/// Admits the player into the room's forming game with a fresh mailbox
/// and tells them their color.
async fn take_seat<C: Codec>(
    conn: &WebSocketConnection,
    state: &ServerState<C>,
    room: &Room,
    player_id: PlayerId,
) -> Result<Seat, TronError> {
    let (player, mailbox) = PlayerHandle::new(player_id, state.settings.mailbox_capacity);
    let (game, color) = match room.admit(player).await {
        Ok(admitted) => admitted,
        Err(e) => {
            send(conn, &state.codec, &ServerMessage::error(e.to_string())).await?;
            return Err(e.into());
        }
    };
    send(conn, &state.codec, &ServerMessage::Ready { color }).await?;
    tracing::debug!(%player_id, %color, game = %game.id(), "player seated");
    Ok(Seat {
        game,
        color,
        mailbox,
    })
}

/// The next event for the seated player. Pends forever without a seat.
async fn next_event(seat: &mut Option<Seat>) -> Option<GameEvent> {
    match seat {
        Some(seat) => seat.mailbox.recv().await,
        None => std::future::pending().await,
    }
}

async fn send<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
    msg: &ServerMessage,
) -> Result<(), TronError> {
    let bytes = codec.encode(msg)?;
    conn.send(&bytes).await?;
    Ok(())
}
