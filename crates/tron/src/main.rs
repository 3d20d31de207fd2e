use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tron::prelude::*;

/// Multiplayer light-cycle game server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "TRON_BIND", default_value = "127.0.0.1:8080")]
    bind: String,

    /// Players per room; a game starts when this many are ready.
    #[arg(long, default_value_t = 4)]
    room_capacity: usize,

    /// Length of the starting-direction window in milliseconds.
    #[arg(long, default_value_t = 3000)]
    select_window_ms: u64,

    /// Tick period in milliseconds.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,

    /// Seconds a new connection has to send JoinRoom.
    #[arg(long, default_value_t = 5)]
    join_timeout_secs: u64,
}

impl Args {
    fn room_config(&self) -> RoomConfig {
        RoomConfig {
            max_players: self.room_capacity,
            game: GameConfig {
                select_window: Duration::from_millis(self.select_window_ms),
                tick: TickConfig::with_period(Duration::from_millis(self.tick_ms)),
                ..GameConfig::default()
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), TronError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let server = TronServer::builder()
        .bind(&args.bind)
        .room_config(args.room_config())
        .join_timeout(Duration::from_secs(args.join_timeout_secs))
        .build()
        .await?;

    tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
            Ok(())
        }
    }
}
