//! This module provides Discord command handlers.

use crate::{
    Result,
    framework,
    locale::{Catalog, Locale},
    util::ContextExt,
};

mod help;
pub use help::*;

mod polling;
pub use polling::*;

mod stats;
pub use stats::*;

mod status;
pub use status::*;

mod sources;
pub use sources::*;

mod bind;
pub use bind::*;

mod set_source;
pub use set_source::*;

mod mention;
pub use mention::*;

mod language;
pub use language::*;

/// The locale of the guild the command was used in.
async fn locale(ctx: &framework::Context<'_>) -> Result<Locale> {
    let guild_id = ctx.guild_id_i64()?;
    Ok(ctx.data().control.locale(guild_id).await)
}

async fn catalog(ctx: &framework::Context<'_>) -> Result<&'static Catalog> {
    Ok(locale(ctx).await?.catalog())
}

/// Substitutes `{key}` in `template`.
fn fill(template: &str, key: &str, value: &str) -> String {
    template.replace(&format!("{{{key}}}"), value)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn fill_replaces_every_occurrence() {
        assert_eq!("a <#1> b <#1>", fill("a {channel} b {channel}", "channel", "<#1>"));
    }

    #[test]
    fn fill_leaves_other_placeholders() {
        assert_eq!("x {role}", fill("{source} {role}", "source", "x"));
    }
}
