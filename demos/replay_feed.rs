//! Replay a race dataset to the terminal.
//!
//! ```text
//! cargo run --example replay_feed -- test-data/vendee test-data/config.yaml
//! RUST_LOG=regatta=debug REGATTA_TIMER=2 cargo run --example replay_feed -- test-data/vendee
//! ```

use std::time::Duration;

use anyhow::Context;
use futures::StreamExt;
use regatta::{GameConfig, Regatta};
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let dataset = args.next().context("usage: replay_feed <dataset-dir> [config.yaml]")?;
    let config = match args.next() {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::new(1)?.with_env_overrides()?,
    };

    let feed = Regatta::open(&dataset, &config).await?;
    let boats = feed.all_boats().await?;
    println!("{} boats, replaying over {} min", boats.len(), config.timer);

    let mut updates = Box::pin(feed.updates(Duration::from_secs(1)));
    while let Some(update) = updates.next().await {
        let update = update?;
        println!(
            "[{:>5.1}%] {}  +{} samples ({} visible)",
            update.progress * 100.0,
            update.as_of,
            update.observations.len(),
            update.total_visible
        );

        for obs in feed.latest_positions(Instant::now()).await?.iter().take(3) {
            let name = boats
                .iter()
                .find(|b| b.nat_voile == obs.nat_voile)
                .map(|b| b.skipper())
                .unwrap_or_else(|| obs.nat_voile.clone());
            println!(
                "    #{} {:<24} {:>8.1} nm to finish  {:>5.1} kn",
                obs.rank, name, obs.distance_to_finish, obs.last_30min.speed
            );
        }
    }

    println!("Replay complete");
    Ok(())
}
