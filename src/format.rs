//! This module renders free-game announcements.

use rand::{Rng, seq::IndexedRandom};

use crate::{
    locale::Locale,
    models::{Destination, Game},
};

/// Renders the announcement of `game` for `destination`, in its locale and
/// with its role mention. The phrasing is picked at random among equivalent
/// templates.
pub fn notification<R: Rng + ?Sized>(destination: &Destination, game: &Game, rng: &mut R) -> String {
    let templates = Locale::from_code(&destination.locale).catalog().free_game;
    let template = templates
        .choose(rng)
        .copied()
        .unwrap_or("**{name}** {link}");
    let message = template
        .replace("{name}", &game.name)
        .replace("{link}", &game.link);

    match destination.mention() {
        Some(role_id) => format!("{} {message}", role_mention(role_id)),
        None => message,
    }
}

pub fn role_mention(role_id: i64) -> String {
    format!("<@&{role_id}>")
}

pub fn channel_mention(channel_id: i64) -> String {
    format!("<#{channel_id}>")
}
