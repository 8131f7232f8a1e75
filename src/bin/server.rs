//! Identity handshake request/reply server.

use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use zk_identity::server::{self, ServerConfig, DEFAULT_GROUP_BITS, DEFAULT_ROUNDS};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Identity handshake request/reply server", long_about = None)]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value = "5555")]
    port: u16,

    /// Safe-prime group size in bits for Data requests that do not carry one
    #[arg(long, env = "GROUP_BITS", default_value_t = DEFAULT_GROUP_BITS)]
    group_bits: u64,

    /// Commitment rounds for Data requests that do not carry a count
    #[arg(long, env = "PROOF_ROUNDS", default_value_t = DEFAULT_ROUNDS)]
    rounds: usize,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        group_bits: args.group_bits,
        rounds: args.rounds,
    };

    tokio::select! {
        result = server::run(config) => {
            if let Err(e) = result {
                error!(error = %e, "server terminated");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("shutting down");
        }
    }
}
