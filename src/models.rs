use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// A free-game listing produced by a source.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Game {
    pub name: String,
    pub link: String,
    pub source_id: String,
    pub discovered_at: DateTime<Utc>,
}

/// What makes two [`Game`]s the same listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameIdentity<'a> {
    pub source_id: &'a str,
    pub link: &'a str,
}

impl Game {
    pub fn new(
        name: impl Into<String>,
        link: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
            source_id: source_id.into(),
            discovered_at: Utc::now(),
        }
    }

    /// Identity key of the listing. The name may change between polls
    /// without making it a different listing.
    pub fn identity(&self) -> GameIdentity<'_> {
        GameIdentity {
            source_id: &self.source_id,
            link: &self.link,
        }
    }
}

/// Archived copy of a game that stopped being free.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct PastGame {
    #[serde(flatten)]
    pub game: Game,
    pub archived_at: DateTime<Utc>,
}

impl From<Game> for PastGame {
    fn from(game: Game) -> Self {
        Self {
            game,
            archived_at: Utc::now(),
        }
    }
}

/// Per-guild subscription config.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Destination {
    #[serde(rename = "_id")]
    pub guild_id: i64,
    pub channel_id: Option<i64>,
    pub mention_role_id: Option<i64>,
    pub mention_enabled: bool,
    pub locale: String,
    pub sources: BTreeMap<String, bool>,
}

impl Destination {
    /// A fresh destination with every given source enabled and no channel.
    pub fn new<'a>(guild_id: i64, source_ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            guild_id,
            channel_id: None,
            mention_role_id: None,
            mention_enabled: true,
            locale: crate::locale::Locale::default().to_string(),
            sources: source_ids
                .into_iter()
                .map(|id| (id.to_string(), true))
                .collect(),
        }
    }

    /// Sources missing from the map count as enabled, which is also what
    /// startup reconciliation writes for them.
    pub fn is_enabled(&self, source_id: &str) -> bool {
        self.sources.get(source_id).copied().unwrap_or(true)
    }

    /// The role to ping, if mentions are on and a role is set.
    pub fn mention(&self) -> Option<i64> {
        self.mention_role_id.filter(|_| self.mention_enabled)
    }
}

/// A single field change on a [`Destination`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationUpdate {
    Channel(Option<i64>),
    SourceEnabled { source_id: String, enabled: bool },
    MentionRole(Option<i64>),
    MentionEnabled(bool),
    Locale(String),
}

impl DestinationUpdate {
    /// Applies the change in memory, returning whether anything differed.
    /// The MongoDB repository performs the same change server-side.
    #[cfg(test)]
    pub fn apply(&self, destination: &mut Destination) -> bool {
        fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                return false;
            }
            *slot = value;
            true
        }

        match self {
            Self::Channel(x) => replace(&mut destination.channel_id, *x),
            Self::SourceEnabled { source_id, enabled } => {
                destination.sources.insert(source_id.clone(), *enabled) != Some(*enabled)
            }
            Self::MentionRole(x) => replace(&mut destination.mention_role_id, *x),
            Self::MentionEnabled(x) => replace(&mut destination.mention_enabled, *x),
            Self::Locale(x) => replace(&mut destination.locale, x.clone()),
        }
    }
}
