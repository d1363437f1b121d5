//! Example: one scheduling round against the configured stores
//!
//! Loads configuration (environment first, then `huddle.toml` and friends),
//! creates a group, records two members' availability and prints the share
//! text. With no reachable remote every write lands in the SQLite mirror.
//!
//! ```bash
//! HUDDLE_REMOTE_URL=http://127.0.0.1:9000 HUDDLE_DB_PATH=/tmp/huddle.db \
//!     cargo run -p huddle-infra --example huddle_demo
//! ```

use std::sync::Arc;

use anyhow::Context;
use huddle_core::{
    candidate_slots, DualWriteCoordinator, IsoSlotFormatter, NotificationChannel, SummaryEngine,
};
use huddle_domain::AvailabilityRecord;
use huddle_infra::{config, logging, DbManager, HttpDocumentStore, SqliteDocumentStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load().context("loading configuration")?;
    logging::init(&config.logging).context("installing tracing subscriber")?;

    let remote = HttpDocumentStore::from_config(&config.remote).context("remote store")?;
    let db = DbManager::from_config(&config.local).context("opening SQLite mirror")?;
    let local = SqliteDocumentStore::new(Arc::new(db));

    let notices = NotificationChannel::default();
    let mut feed = notices.subscribe();
    tokio::spawn(async move {
        while let Ok(notice) = feed.recv().await {
            tracing::info!(?notice, "sync notice");
        }
    });

    let coordinator =
        DualWriteCoordinator::new(Arc::new(remote), Arc::new(local), &config.sync, notices);

    let group = coordinator.create_group("Demo Night", "alice").await?;
    let group = coordinator.join_group(&group.code, "bob").await?;

    let dates = vec!["2024-03-04".to_string(), "2024-03-05".to_string()];
    for (user, start, end) in [("alice", 18, 21), ("bob", 19, 23)] {
        let mut record = coordinator
            .load_availability(&group.id, user)
            .await?
            .unwrap_or_else(|| AvailabilityRecord::new(user, group.id.as_str()));
        record.apply_hour_range(&dates[0], start, end)?;
        coordinator.save_availability(&record).await?;
    }

    let records = coordinator.load_group_availabilities(&group).await?;
    let hours: Vec<u32> = (17..=23).collect();
    let candidates = candidate_slots(&dates, &hours)?;

    let summaries = SummaryEngine::new(config.scoring.clone());
    let summary = summaries.summarize(&group, &records, &candidates);
    let text = summaries.render_share_text(
        &group.name,
        "Mar 4 - Mar 5",
        &summary,
        &IsoSlotFormatter,
    );

    #[allow(clippy::print_stdout)]
    {
        println!("{text}");
    }
    Ok(())
}
