//! Table watcher - joins a lobby and prints every published table view as a
//! JSON line, or lists the joinable lobbies.
//!
//! Usage:
//!   cargo run --bin table-watch -- --list
//!   cargo run --bin table-watch -- --lobby-id 7 --player-id 1

use anyhow::Result;
use clap::Parser;
use tablestream_client::{Client, Pacing, Reconciler};
use tablestream_types::Request;
use tokio::sync::mpsc;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(author, version, about = "Follow a table and dump every published view")]
struct Args {
    #[arg(short, long, default_value = "http://localhost:7878")]
    url: String,

    #[arg(long, default_value = "1")]
    lobby_id: u64,

    #[arg(long, default_value = "1")]
    player_id: u64,

    /// List joinable lobbies and exit.
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let client = Client::new(&args.url)?;

    if args.list {
        let list = client.lobbies().await?;
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    let mut table = client.connect(args.lobby_id, args.player_id).await?;
    table.commands.send(Request::JoinLobby {
        lobby_id: args.lobby_id,
        player_id: args.player_id,
    })?;

    let (views_tx, mut views_rx) = mpsc::unbounded_channel();
    let reconciler = Reconciler::new(views_tx, Pacing::from_env());

    let printer = tokio::spawn(async move {
        while let Some(view) = views_rx.recv().await {
            match serde_json::to_string(&view) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!(error = %err, "failed to serialize view"),
            }
        }
    });

    while let Some(result) = table.snapshots.next().await {
        match result {
            Ok(snapshot) => {
                if !reconciler.submit(snapshot) {
                    break;
                }
            }
            // The stream already logged the frame; keep draining.
            Err(err) => warn!(error = %err, "dropping undecodable snapshot"),
        }
    }

    drop(reconciler);
    printer.await?;
    Ok(())
}
