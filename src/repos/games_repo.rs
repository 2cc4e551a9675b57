//! This module provides a repository for the free_games and past_free_games
//! collections.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson;

use crate::{
    database,
    models::{Game, PastGame},
    store::{GameStore, StoreResult},
};

#[derive(Clone)]
pub struct GamesRepo {
    db: database::Database,
    current: mongodb::Collection<Game>,
    past: mongodb::Collection<PastGame>,
}

impl GamesRepo {
    pub fn new(db: &database::Database) -> Self {
        Self {
            db: db.clone(),
            current: db.free_games(),
            past: db.past_free_games(),
        }
    }
}

fn identity_filter(game: &Game) -> bson::Document {
    bson::doc! { "source_id": game.source_id.as_str(), "link": game.link.as_str() }
}

#[async_trait]
impl GameStore for GamesRepo {
    async fn current(&self, source_id: &str) -> StoreResult<Vec<Game>> {
        let filter = bson::doc! { "source_id": source_id };
        Ok(self.current.find(filter).await?.try_collect().await?)
    }

    async fn insert(&self, game: &Game) -> StoreResult<()> {
        let gdoc = bson::to_document(game)?;
        let update = bson::doc! { "$setOnInsert": gdoc };

        self.current
            .update_one(identity_filter(game), update)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn archive(&self, game: &Game) -> StoreResult<bool> {
        let mut session = self.db.start_session().await?;
        session.start_transaction().await?;

        let removed = self
            .current
            .find_one_and_delete(identity_filter(game))
            .session(&mut session)
            .await?;
        let Some(removed) = removed else {
            session.abort_transaction().await?;
            return Ok(false);
        };

        self.past
            .insert_one(PastGame::from(removed))
            .session(&mut session)
            .await?;
        session.commit_transaction().await?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        Result,
        database::test::{CollectionCollectAll, TestDatabase},
    };

    #[tokio::test]
    #[ignore = "needs MONGODB_URI and MONGODB_TESTDBNAME"]
    #[serial_test::serial(database)]
    async fn insert_keeps_single_record_per_identity() -> Result<()> {
        let db = TestDatabase::new().await?;
        let repo = GamesRepo::new(&db);

        let game = Game::new("Celeste", "https://store.epicgames.com/p/celeste", "epic");
        repo.insert(&game).await?;
        // Renamed listing, same identity.
        repo.insert(&Game::new("Celeste!", &game.link, "epic")).await?;

        let actual = db.free_games().collect().await?;
        assert_eq!(1, actual.len(), "{actual:?}");
        assert_eq!("Celeste", actual[0].name);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "needs MONGODB_URI and MONGODB_TESTDBNAME"]
    #[serial_test::serial(database)]
    async fn current_only_returns_given_source() -> Result<()> {
        let db = TestDatabase::new().await?;
        let repo = GamesRepo::new(&db);

        repo.insert(&Game::new("A", "a", "epic")).await?;
        repo.insert(&Game::new("B", "b", "steam")).await?;

        let actual = repo.current("epic").await?;
        assert_eq!(1, actual.len());
        assert_eq!("a", actual[0].link);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "needs MONGODB_URI and MONGODB_TESTDBNAME"]
    #[serial_test::serial(database)]
    async fn archive_moves_game_to_past() -> Result<()> {
        let db = TestDatabase::new().await?;
        let repo = GamesRepo::new(&db);
        let game = Game::new("A", "a", "epic");
        repo.insert(&game).await?;

        assert!(repo.archive(&game).await?);
        assert!(!repo.archive(&game).await?);

        assert!(db.free_games().collect().await?.is_empty());
        let past = db.past_free_games().collect().await?;
        assert_eq!(1, past.len());
        assert_eq!(game.link, past[0].game.link);

        Ok(())
    }
}
