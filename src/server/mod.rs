//! Request/reply server over TCP.
//!
//! One serialized message per line, one reply line per message — the Rust
//! rendition of the reference deployment's single REP socket. A connection
//! is served strictly sequentially; concurrency comes from accepting many
//! connections, never from handling two in-flight messages of one peer.

mod config;
mod service;

pub use config::{ServerConfig, DEFAULT_GROUP_BITS, DEFAULT_ROUNDS};
pub use service::HandshakeService;

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use crate::crypto::rng::SecureRng;
use crate::wire;
use crate::Result;

/// Binds the configured address and serves until the task is dropped.
pub async fn run(config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.addr()).await?;
    serve(listener, config).await
}

/// Serves connections from an already-bound listener.
pub async fn serve(listener: TcpListener, config: ServerConfig) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, group_bits = config.group_bits, rounds = config.rounds, "listening");

    let service = Arc::new(HandshakeService::new(config));
    let rng = SecureRng::new();

    loop {
        let (stream, peer) = listener.accept().await?;
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            if let Err(error) = serve_connection(stream, service, rng).await {
                warn!(%peer, %error, "connection closed with error");
            }
        });
    }
}

async fn serve_connection(
    stream: TcpStream,
    service: Arc<HandshakeService>,
    rng: SecureRng,
) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        // Safe-prime generation is CPU-heavy; keep it off the reactor threads.
        let service = Arc::clone(&service);
        let outcome = tokio::task::spawn_blocking(move || {
            let mut rng = rng;
            service.handle(&line, &mut rng)
        })
        .await
        .map_err(|join| io::Error::new(io::ErrorKind::Other, join))?;

        let reply = match outcome {
            Ok(reply) => reply,
            Err(error) => {
                warn!(%error, "phase construction failed");
                wire::error_reply(&error)
            }
        };

        writer.write_all(reply.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }

    Ok(())
}
