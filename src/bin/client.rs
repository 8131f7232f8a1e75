//! Demo client: drives a full three-phase exchange against the server.
//!
//! Hashes the given identity with SHA-256, asks the server to build the Data
//! transaction, feeds its payload back as a Request, and closes with the
//! Answer built from the Data payload's retained secrets.

use std::io;

use clap::Parser;
use sha2::{Digest, Sha256};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zk_identity::wire::{BuildAnswer, BuildData, BuildRequest, Command, Message};
use zk_identity::{Error, Result};

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "Identity handshake demo client", long_about = None)]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, env = "SERVER_ADDR", default_value = "127.0.0.1:5555")]
    addr: String,

    /// Identity to prove knowledge of
    #[arg(short, long, default_value = "alice@example.com")]
    identity: String,

    /// Correlation token echoed through all three phases
    #[arg(short, long, default_value = "demo")]
    token: String,

    /// Safe-prime group size in bits (server default when omitted)
    #[arg(long)]
    bit_size: Option<u64>,

    /// Commitment rounds (server default when omitted)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    rounds: Option<u64>,

    /// Ask the server to attach a transport key pair to the Data payload
    #[arg(long)]
    with_keys: bool,
}

struct Connection {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Connection {
    async fn open(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            lines: BufReader::new(reader).lines(),
            writer,
        })
    }

    async fn round_trip(&mut self, command: &Command) -> Result<Message> {
        let text = command.to_json()?;
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;

        let line = self.lines.next_line().await?.ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "server closed the connection",
            ))
        })?;

        // An error reply carries a single `error` field instead of a tag.
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&line) {
            if let Some(message) = value.get("error").and_then(|v| v.as_str()) {
                return Err(Error::Peer(message.to_string()));
            }
        }

        Message::from_json(&line)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let hashed_identity = hex::encode(Sha256::digest(args.identity.as_bytes()));
    info!(identity = %args.identity, digest = %hashed_identity, "starting handshake");

    let mut connection = Connection::open(&args.addr).await?;

    let data = match connection
        .round_trip(&Command::BuildData(BuildData {
            bit_size: args.bit_size,
            rounds: args.rounds,
            hashed_identity: hashed_identity.clone(),
            token: args.token.clone(),
            with_keys: args.with_keys,
        }))
        .await?
    {
        Message::Data(payload) => payload,
        _ => return Err(Error::TypeMismatch("type")),
    };
    info!(
        rounds = data.rounds,
        group = %data.modulus,
        keyed = data.pub_key.is_some(),
        "data transaction built"
    );

    let request = match connection
        .round_trip(&Command::BuildRequest(BuildRequest {
            data: data.clone(),
            hashed_identity,
            token: args.token.clone(),
        }))
        .await?
    {
        Message::Request(payload) => payload,
        _ => return Err(Error::TypeMismatch("type")),
    };
    info!(challenge = %request.req, "request transaction built");

    let answer = match connection
        .round_trip(&Command::BuildAnswer(BuildAnswer {
            modulus: data.modulus.clone(),
            g: data.g.clone(),
            g_b: request.g_b.clone(),
            req: request.req.clone(),
            a: data.a.clone(),
            r: data.r.clone(),
            r_i: data.r_i.clone(),
            token: args.token.clone(),
        }))
        .await?
    {
        Message::Answer(payload) => payload,
        _ => return Err(Error::TypeMismatch("type")),
    };
    info!(responses = answer.response.len(), "answer transaction built");

    for (i, response) in answer.response.iter().enumerate() {
        let opened = request.req.as_bytes()[i] == b'0';
        println!(
            "round {i}: {} {response}",
            if opened { "opened " } else { "masked " }
        );
    }
    println!("token: {}", answer.token);

    Ok(())
}
