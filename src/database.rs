use mongodb::{
    IndexModel, bson,
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
};
use tracing::info;

use crate::{Result, models};

pub const FREE_GAMES_COLL: &str = "free_games";
pub const PAST_FREE_GAMES_COLL: &str = "past_free_games";
pub const DESTINATIONS_COLL: &str = "destinations";

#[derive(Clone)]
pub struct Database {
    /// Name of the MongoDB database.
    name: String,
    /// Handle to the MongoDB client.
    client: mongodb::Client,
}

impl Database {
    /// Connects to a MongoDB database named `name`.
    pub async fn new(uri: &str, name: impl Into<String>) -> Result<Self> {
        let mut options = {
            #[cfg(windows)]
            {
                // https://github.com/mongodb/mongo-rust-driver/blob/2cf619c4f3484d1d7c42c3407bf9794c9e33d7ac/README.md#windows-dns-note
                use mongodb::options::ResolverConfig;
                ClientOptions::parse(uri)
                    .resolver_config(ResolverConfig::cloudflare())
                    .await?
            }
            #[cfg(not(windows))]
            {
                ClientOptions::parse(uri).await?
            }
        };
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        let client = mongodb::Client::with_options(options)?;

        let name = name.into();
        let db = client.database(&name);
        info!("Pinging database...");
        db.run_command(bson::doc! {"ping": 1}).await?;
        info!("Pong received from database");

        Ok(Self { name, client })
    }

    /// Creates the indexes the repositories rely on. Safe to call on every
    /// start.
    pub async fn create_indexes(&self) -> mongodb::error::Result<()> {
        let unique = IndexOptions::builder().unique(true).build();
        let game_identity = IndexModel::builder()
            .keys(bson::doc! { "source_id": 1, "link": 1 })
            .options(unique)
            .build();
        self.free_games().create_index(game_identity).await?;

        Ok(())
    }

    pub async fn start_session(&self) -> mongodb::error::Result<mongodb::ClientSession> {
        self.client.start_session().await
    }

    pub fn free_games(&self) -> mongodb::Collection<models::Game> {
        self.db().collection(FREE_GAMES_COLL)
    }

    pub fn past_free_games(&self) -> mongodb::Collection<models::PastGame> {
        self.db().collection(PAST_FREE_GAMES_COLL)
    }

    pub fn destinations(&self) -> mongodb::Collection<models::Destination> {
        self.db().collection(DESTINATIONS_COLL)
    }

    fn db(&self) -> mongodb::Database {
        self.client.database(&self.name)
    }
}
