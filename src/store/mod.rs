//! This module provides the persistence seams used by the poll cycle and
//! the control operations. MongoDB implementations live in [`crate::repos`].

use async_trait::async_trait;

use crate::{
    StdResult,
    models::{Destination, DestinationUpdate, Game},
};

#[cfg(test)]
pub mod memory;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(#[from] mongodb::error::Error),
    #[error("Cannot encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
    #[cfg(test)]
    #[error("Store unavailable (simulated)")]
    Simulated,
}

pub type StoreResult<T> = StdResult<T, StoreError>;

/// Games that are currently free, keyed by `(source_id, link)`.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Every game currently recorded as free for `source_id`.
    async fn current(&self, source_id: &str) -> StoreResult<Vec<Game>>;

    /// Records a newly free game. Inserting a game that is already current
    /// leaves a single record.
    async fn insert(&self, game: &Game) -> StoreResult<()>;

    /// Moves a game from the current set to the archive. Returns false if it
    /// wasn't current.
    async fn archive(&self, game: &Game) -> StoreResult<bool>;
}

/// Per-guild subscription config.
#[async_trait]
pub trait DestinationStore: Send + Sync {
    async fn all(&self) -> StoreResult<Vec<Destination>>;

    async fn get(&self, guild_id: i64) -> StoreResult<Option<Destination>>;

    /// Inserts `destination` unless a record for its guild already exists.
    async fn create_if_absent(&self, destination: &Destination) -> StoreResult<()>;

    /// Returns whether the stored value changed.
    async fn update(&self, guild_id: i64, update: &DestinationUpdate) -> StoreResult<bool>;

    /// Gives every destination an enabled flag for each of `source_ids`,
    /// defaulting to enabled. Returns how many records were touched.
    async fn ensure_sources(&self, source_ids: &[&str]) -> StoreResult<u64>;
}
