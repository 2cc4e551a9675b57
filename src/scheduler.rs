//! This module drives [`Poller`] on a fixed interval while polling is on.

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;
use tracing::info;

use crate::poller::{self, LastCycle, Poller};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollingStatus {
    Started,
    AlreadyStarted,
    Stopped,
    AlreadyStopped,
}

/// Handle to the poll loop task. Dropping it ends the loop once the current
/// cycle finishes.
pub struct Scheduler {
    active: watch::Sender<bool>,
    poller: Arc<Poller>,
}

impl Scheduler {
    /// Spawns the poll loop in the idle state.
    pub fn spawn(poller: Arc<Poller>, interval: Duration) -> Self {
        let (active, rx) = watch::channel(false);
        tokio::spawn(run(poller.clone(), interval, rx));
        Self { active, poller }
    }

    /// Turns polling on. The first cycle runs right away.
    pub fn start(&self) -> PollingStatus {
        if self.active.send_replace(true) {
            PollingStatus::AlreadyStarted
        } else {
            info!("Polling started");
            PollingStatus::Started
        }
    }

    /// Turns polling off. A cycle in progress finishes, no new one begins.
    pub fn stop(&self) -> PollingStatus {
        if self.active.send_replace(false) {
            info!("Polling stopped");
            PollingStatus::Stopped
        } else {
            PollingStatus::AlreadyStopped
        }
    }

    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    pub fn last_cycle(&self) -> Option<LastCycle> {
        self.poller.last_cycle()
    }
}

async fn run(poller: Arc<Poller>, interval: Duration, mut active: watch::Receiver<bool>) {
    loop {
        if active.wait_for(|on| *on).await.is_err() {
            return;
        }

        poller::run_logged(&poller).await;

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            open = async { active.wait_for(|on| !*on).await.is_ok() } => {
                if !open {
                    return;
                }
            }
        }
    }
}
