//! This module provides one poll cycle: fetch every source, reconcile the
//! stored free games with what was fetched, then announce what's new.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use futures::future;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::{
    StdResult,
    broadcast::{BroadcastReport, Broadcaster},
    detector,
    models::Game,
    sources::{Registry, Source, SourceError},
    store::{GameStore, StoreResult},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Sources whose data was unusable this cycle.
    pub skipped: Vec<&'static str>,
    pub newly_free: usize,
    pub no_longer_free: usize,
    pub broadcast: Option<BroadcastReport>,
}

/// The most recent cycle that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastCycle {
    pub finished_at: DateTime<Utc>,
    pub report: CycleReport,
}

pub struct Poller {
    registry: Arc<Registry>,
    games: Arc<dyn GameStore>,
    broadcaster: Broadcaster,
    source_timeout: Duration,
    last_cycle: watch::Sender<Option<LastCycle>>,
}

impl Poller {
    pub fn new(
        registry: Arc<Registry>,
        games: Arc<dyn GameStore>,
        broadcaster: Broadcaster,
        source_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            games,
            broadcaster,
            source_timeout,
            last_cycle: watch::Sender::new(None),
        }
    }

    pub fn last_cycle(&self) -> Option<LastCycle> {
        self.last_cycle.borrow().clone()
    }

    /// Runs one cycle. A source that fails to fetch or parse is skipped
    /// without touching its stored games. A store failure aborts the cycle
    /// before anything is announced.
    #[tracing::instrument(skip(self))]
    pub async fn run_cycle(&self) -> StoreResult<CycleReport> {
        let mut report = CycleReport::default();
        let mut newly_free = Vec::new();

        for (id, retrieved) in self.fetch_all().await {
            let retrieved = match retrieved {
                Ok(games) => games,
                Err(err) => {
                    warn!(source = id, %err, "Ignoring results this cycle");
                    report.skipped.push(id);
                    continue;
                }
            };

            let stored = self.games.current(id).await?;
            let diff = detector::diff(&retrieved, &stored);
            for game in &diff.no_longer_free {
                self.games.archive(game).await?;
                info!(source = id, name = game.name.as_str(), "No longer free");
            }
            for game in &diff.newly_free {
                self.games.insert(game).await?;
                info!(source = id, name = game.name.as_str(), "Newly free");
            }

            report.no_longer_free += diff.no_longer_free.len();
            report.newly_free += diff.newly_free.len();
            newly_free.extend(diff.newly_free);
        }

        if !newly_free.is_empty() {
            report.broadcast = Some(self.broadcaster.broadcast(&newly_free).await?);
        }

        self.last_cycle.send_replace(Some(LastCycle {
            finished_at: Utc::now(),
            report: report.clone(),
        }));
        Ok(report)
    }

    /// Fetches all sources concurrently. Each runs in its own task under
    /// the source timeout so a hung or panicking source only loses its own
    /// results.
    async fn fetch_all(&self) -> Vec<(&'static str, StdResult<Vec<Game>, SourceError>)> {
        let timeout = self.source_timeout;
        let tasks = self.registry.iter().map(|source| {
            let source = Arc::clone(source);
            let id = source.descriptor().id;
            let handle = tokio::spawn(async move {
                tokio::time::timeout(timeout, source.free_games())
                    .await
                    .unwrap_or(Err(SourceError::Timeout(timeout)))
            });
            async move {
                let result = handle.await.unwrap_or_else(|err| {
                    error!(source = id, %err, "Source task failed");
                    Err(SourceError::Panicked)
                });
                (id, result.map(|games| own_games(id, games)))
            }
        });

        future::join_all(tasks).await
    }
}

/// Drops games a source attributed to another source id.
fn own_games(id: &str, mut games: Vec<Game>) -> Vec<Game> {
    games.retain(|game| {
        let own = game.source_id == id;
        if !own {
            warn!(source = id, other = game.source_id.as_str(), "Dropping foreign game");
        }
        own
    });
    games
}

/// Runs [`Poller::run_cycle`] and logs the outcome.
pub async fn run_logged(poller: &Poller) {
    match poller.run_cycle().await {
        Ok(report) => info!(
            skipped = ?report.skipped,
            newly_free = report.newly_free,
            no_longer_free = report.no_longer_free,
            delivered = report.broadcast.map_or(0, |b| b.success),
            "Poll cycle finished"
        ),
        Err(err) => error!(%err, "Poll cycle aborted, retrying next cycle"),
    }
}
