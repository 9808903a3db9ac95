//! Batch-fetch AI games into JSON files.
//!
//! Fetches the game-id list, then fans out per-game fetch+decode with
//! bounded concurrency. Per-game failures are logged and skipped; the
//! batch keeps going (all-or-nothing applies to a single game's decode,
//! not to the batch).
//!
//! Usage: cargo run --release --bin fetch-ai -- <out_dir> [--max N]

use std::fs;
use std::path::PathBuf;

use futures::StreamExt;
use tracing_subscriber::EnvFilter;

use ingest::clients::ai::AiClient;
use ingest::Config;

const CONCURRENCY: usize = 8;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let out_dir = PathBuf::from(
        args.next()
            .ok_or_else(|| anyhow::anyhow!("usage: fetch-ai <out_dir> [--max N]"))?,
    );
    let mut max: Option<usize> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--max" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--max requires a value"))?;
                max = Some(value.parse()?);
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }
    fs::create_dir_all(&out_dir)?;

    let config = Config::from_env();
    let client = AiClient::new(config.ai);

    let mut entries = client.fetch_game_list().await?;
    tracing::info!("Fetched {} game ids", entries.len());
    if let Some(max) = max {
        entries.truncate(max);
    }

    let mut ok = 0usize;
    let mut failed = 0usize;
    let mut results = futures::stream::iter(entries.into_iter().map(|entry| {
        let client = &client;
        async move { (entry.game_id, client.fetch_game(entry.game_id).await) }
    }))
    .buffer_unordered(CONCURRENCY);

    while let Some((game_id, result)) = results.next().await {
        match result {
            Ok(jkf) => {
                let path = out_dir.join(format!("{game_id}.json"));
                fs::write(&path, serde_json::to_string_pretty(&jkf)?)?;
                ok += 1;
            }
            Err(e) => {
                tracing::warn!("game {game_id}: {e}");
                failed += 1;
            }
        }
    }

    tracing::info!("Done: {ok} written, {failed} failed");
    Ok(())
}
