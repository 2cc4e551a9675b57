//! This module provides a repository for the destinations collection.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson;

use crate::{
    database,
    models::{Destination, DestinationUpdate},
    store::{DestinationStore, StoreResult},
};

#[derive(Clone)]
pub struct DestinationsRepo {
    coll: mongodb::Collection<Destination>,
}

impl DestinationsRepo {
    pub fn new(db: &database::Database) -> Self {
        Self {
            coll: db.destinations(),
        }
    }
}

/// The `$set` body of an update.
fn set_fields(update: &DestinationUpdate) -> bson::Document {
    let mut set = bson::Document::new();
    match update {
        DestinationUpdate::Channel(x) => set.insert("channel_id", *x),
        DestinationUpdate::SourceEnabled { source_id, enabled } => {
            set.insert(format!("sources.{source_id}"), *enabled)
        }
        DestinationUpdate::MentionRole(x) => set.insert("mention_role_id", *x),
        DestinationUpdate::MentionEnabled(x) => set.insert("mention_enabled", *x),
        DestinationUpdate::Locale(x) => set.insert("locale", x.as_str()),
    };
    set
}

#[async_trait]
impl DestinationStore for DestinationsRepo {
    async fn all(&self) -> StoreResult<Vec<Destination>> {
        Ok(self.coll.find(bson::doc! {}).await?.try_collect().await?)
    }

    async fn get(&self, guild_id: i64) -> StoreResult<Option<Destination>> {
        Ok(self.coll.find_one(bson::doc! { "_id": guild_id }).await?)
    }

    async fn create_if_absent(&self, destination: &Destination) -> StoreResult<()> {
        let query = bson::doc! { "_id": destination.guild_id };
        let mut ddoc = bson::to_document(destination)?;
        ddoc.remove("_id");
        let update = bson::doc! { "$setOnInsert": ddoc };

        self.coll.update_one(query, update).upsert(true).await?;
        Ok(())
    }

    async fn update(&self, guild_id: i64, update: &DestinationUpdate) -> StoreResult<bool> {
        let query = bson::doc! { "_id": guild_id };
        let update = bson::doc! { "$set": set_fields(update) };

        let res = self.coll.update_one(query, update).await?;
        Ok(res.modified_count > 0)
    }

    async fn ensure_sources(&self, source_ids: &[&str]) -> StoreResult<u64> {
        if source_ids.is_empty() {
            return Ok(0);
        }

        let missing = source_ids
            .iter()
            .map(|id| {
                let mut field = bson::Document::new();
                field.insert(format!("sources.{id}"), bson::doc! { "$exists": false });
                field
            })
            .collect::<Vec<_>>();
        let defaults = source_ids
            .iter()
            .map(|id| (id.to_string(), bson::Bson::Boolean(true)))
            .collect::<bson::Document>();
        // Stored flags win over the defaults.
        let pipeline = vec![bson::doc! {
            "$set": { "sources": { "$mergeObjects": [defaults, "$sources"] } }
        }];

        let res = self
            .coll
            .update_many(bson::doc! { "$or": missing }, pipeline)
            .await?;
        Ok(res.modified_count)
    }
}
