use std::sync::Arc;

use crate::database;

mod destinations_repo;
mod games_repo;

pub use destinations_repo::DestinationsRepo;
pub use games_repo::GamesRepo;

#[derive(Clone)]
pub struct Repo {
    pub games: Arc<GamesRepo>,
    pub destinations: Arc<DestinationsRepo>,
}

impl Repo {
    pub fn new(db: &database::Database) -> Self {
        Self {
            games: Arc::new(GamesRepo::new(db)),
            destinations: Arc::new(DestinationsRepo::new(db)),
        }
    }
}
