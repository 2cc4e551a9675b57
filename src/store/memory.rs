//! In-memory stores for tests.

use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;

use super::{DestinationStore, GameStore, StoreError, StoreResult};
use crate::models::{Destination, DestinationUpdate, Game, PastGame};

#[derive(Default)]
pub struct MemoryGames {
    current: Mutex<Vec<Game>>,
    past: Mutex<Vec<PastGame>>,
    unavailable: AtomicBool,
}

impl MemoryGames {
    pub fn with_current(games: impl IntoIterator<Item = Game>) -> Self {
        let store = Self::default();
        store.current.lock().unwrap().extend(games);
        store
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn all_current(&self) -> Vec<Game> {
        self.current.lock().unwrap().clone()
    }

    pub fn past(&self) -> Vec<PastGame> {
        self.past.lock().unwrap().clone()
    }

    fn check(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Simulated);
        }
        Ok(())
    }
}

#[async_trait]
impl GameStore for MemoryGames {
    async fn current(&self, source_id: &str) -> StoreResult<Vec<Game>> {
        self.check()?;
        let current = self.current.lock().unwrap();
        Ok(current
            .iter()
            .filter(|g| g.source_id == source_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, game: &Game) -> StoreResult<()> {
        self.check()?;
        let mut current = self.current.lock().unwrap();
        if !current.iter().any(|g| g.identity() == game.identity()) {
            current.push(game.clone());
        }
        Ok(())
    }

    async fn archive(&self, game: &Game) -> StoreResult<bool> {
        self.check()?;
        let mut current = self.current.lock().unwrap();
        let Some(idx) = current.iter().position(|g| g.identity() == game.identity()) else {
            return Ok(false);
        };
        let removed = current.remove(idx);
        self.past.lock().unwrap().push(removed.into());
        Ok(true)
    }
}

#[derive(Default)]
pub struct MemoryDestinations {
    records: Mutex<BTreeMap<i64, Destination>>,
    unavailable: AtomicBool,
}

impl MemoryDestinations {
    pub fn with(destinations: impl IntoIterator<Item = Destination>) -> Self {
        let store = Self::default();
        store
            .records
            .lock()
            .unwrap()
            .extend(destinations.into_iter().map(|d| (d.guild_id, d)));
        store
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn snapshot(&self, guild_id: i64) -> Option<Destination> {
        self.records.lock().unwrap().get(&guild_id).cloned()
    }

    fn check(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Simulated);
        }
        Ok(())
    }
}

#[async_trait]
impl DestinationStore for MemoryDestinations {
    async fn all(&self) -> StoreResult<Vec<Destination>> {
        self.check()?;
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn get(&self, guild_id: i64) -> StoreResult<Option<Destination>> {
        self.check()?;
        Ok(self.snapshot(guild_id))
    }

    async fn create_if_absent(&self, destination: &Destination) -> StoreResult<()> {
        self.check()?;
        self.records
            .lock()
            .unwrap()
            .entry(destination.guild_id)
            .or_insert_with(|| destination.clone());
        Ok(())
    }

    async fn update(&self, guild_id: i64, update: &DestinationUpdate) -> StoreResult<bool> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        Ok(records
            .get_mut(&guild_id)
            .is_some_and(|destination| update.apply(destination)))
    }

    async fn ensure_sources(&self, source_ids: &[&str]) -> StoreResult<u64> {
        self.check()?;
        let mut touched = 0;
        for destination in self.records.lock().unwrap().values_mut() {
            let mut changed = false;
            for id in source_ids {
                if !destination.sources.contains_key(*id) {
                    destination.sources.insert(id.to_string(), true);
                    changed = true;
                }
            }
            touched += u64::from(changed);
        }
        Ok(touched)
    }
}
