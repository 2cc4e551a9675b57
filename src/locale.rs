//! This module provides the user-facing strings in every supported locale.

use std::str::FromStr;

/// Supported locales, stored on destinations by their code.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
pub enum Locale {
    #[default]
    #[strum(serialize = "en")]
    English,
    #[strum(serialize = "es")]
    Spanish,
}

/// Every string the bot sends, in one locale. Placeholders in braces are
/// substituted by the callers.
pub struct Catalog {
    pub language: &'static str,
    /// Equivalent phrasings of a free-game announcement.
    pub free_game: &'static [&'static str],
    pub start_success: &'static str,
    pub start_already: &'static str,
    pub stop_success: &'static str,
    pub stop_already: &'static str,
    pub bind_success: &'static str,
    pub bind_missing_permissions: &'static str,
    pub unbind_success: &'static str,
    pub unbind_already: &'static str,
    pub source_enabled: &'static str,
    pub source_disabled: &'static str,
    pub source_unchanged: &'static str,
    pub source_unknown: &'static str,
    pub mention_set: &'static str,
    pub mention_cleared: &'static str,
    pub mentions_on: &'static str,
    pub mentions_off: &'static str,
    pub language_changed: &'static str,
    pub language_unknown: &'static str,
    pub status_title: &'static str,
    pub status_channel: &'static str,
    pub status_polling: &'static str,
    pub status_mention: &'static str,
    pub active: &'static str,
    pub inactive: &'static str,
    pub unavailable: &'static str,
    pub help_title: &'static str,
    /// Name and value of each help field, the `bool` being inline.
    pub help_fields: &'static [(&'static str, &'static str, bool)],
    pub stats_title: &'static str,
    pub stats_guilds: &'static str,
    pub stats_owners: &'static str,
    pub stats_last_cycle: &'static str,
    /// Placeholders: `{when}`, `{new}`, `{expired}`, `{delivered}`, `{failed}`, `{skipped}`.
    pub stats_cycle: &'static str,
    pub stats_no_cycle: &'static str,
    pub guild_only: &'static str,
    pub owners_only: &'static str,
    pub missing_administrator: &'static str,
    pub channel_unusable: &'static str,
    pub unexpected_error: &'static str,
}

static ENGLISH: Catalog = Catalog {
    language: "English",
    free_game: &[
        "**{name}** is FREE for a limited time! {link}",
        "Grab **{name}** for free while it lasts: {link}",
        "Free game alert: **{name}** costs nothing right now. {link}",
        "**{name}** can be claimed for free! {link}",
    ],
    start_success: "Started looking for free games.",
    start_already: "Already looking for free games.",
    stop_success: "Stopped looking for free games.",
    stop_already: "Free games aren't being looked for.",
    bind_success: "Free games will be announced in {channel}.",
    bind_missing_permissions: "Cannot announce in {channel}, I am missing `View Channel` and `Send Messages` permissions.",
    unbind_success: "Free games will no longer be announced in {channel}.",
    unbind_already: "No channel is selected.",
    source_enabled: "Announcements from **{source}** enabled.",
    source_disabled: "Announcements from **{source}** disabled.",
    source_unchanged: "Nothing changed for **{source}**.",
    source_unknown: "Unknown source `{source}`. Use `/sources` to list them.",
    mention_set: "Announcements will mention {role}.",
    mention_cleared: "Announcements won't mention any role.",
    mentions_on: "Role mentions turned on.",
    mentions_off: "Role mentions turned off.",
    language_changed: "Language set to English.",
    language_unknown: "Unknown language. Available: {languages}.",
    status_title: "Status",
    status_channel: "Announcement channel",
    status_polling: "Looking for free games",
    status_mention: "Mention",
    active: "Active",
    inactive: "Inactive",
    unavailable: "Settings are unavailable right now, please try again later.",
    help_title: "Commands and FAQ",
    help_fields: &[
        ("/bind <channel>", "Set the channel where free games are announced. Nothing is announced until a channel is set.", false),
        ("/unbind", "Stop announcing free games in this server.", false),
        ("/enable <source>, /disable <source>", "Turn announcements from one store on or off. All stores are on by default.", false),
        ("/mention [role]", "Mention a role in every announcement. Leave the role empty to mention no one.", false),
        ("/mentions <on>", "Turn role mentions on or off without forgetting the role.", false),
        ("/language <code>", "Set the language of announcements and replies.", false),
        ("/status, /sources", "Show this server's settings and the stores being checked.", false),
        ("/start, /stop, /stats", "Start or stop checking for free games, or show how the bot is doing. Bot owners only.", false),
        ("Which stores are checked?", "Epic Games, Humble Bundle, Steam and Ubisoft. DLCs are not announced.", true),
        ("Why aren't announcements showing up?", "Make sure a channel is set with /bind and that I can send messages in it.", true),
    ],
    stats_title: "Statistics",
    stats_guilds: "Servers",
    stats_owners: "Owners",
    stats_last_cycle: "Last check",
    stats_cycle: "<t:{when}:R>\n**{new}** new, **{expired}** expired\n**{delivered}** sent, **{failed}** failed\nSkipped: {skipped}",
    stats_no_cycle: "No check has finished yet.",
    guild_only: "Commands must be used in a server.",
    owners_only: "Only the bot owners can do that.",
    missing_administrator: "You need the `Administrator` permission to do that.",
    channel_unusable: "Cannot use that channel, I am missing `View Channel` and `Send Messages` permissions.",
    unexpected_error: "An unexpected error has occurred...",
};

static SPANISH: Catalog = Catalog {
    language: "Español",
    free_game: &[
        "¡**{name}** es GRATIS por tiempo limitado! {link}",
        "Consigue **{name}** gratis mientras dure: {link}",
        "Juego gratis: **{name}** no cuesta nada ahora mismo. {link}",
        "¡**{name}** se puede reclamar gratis! {link}",
    ],
    start_success: "Se ha empezado a buscar juegos gratis.",
    start_already: "Ya se están buscando juegos gratis.",
    stop_success: "Se ha dejado de buscar juegos gratis.",
    stop_already: "No se están buscando juegos gratis.",
    bind_success: "Los juegos gratis se anunciarán en {channel}.",
    bind_missing_permissions: "No puedo anunciar en {channel}, me faltan los permisos `Ver canal` y `Enviar mensajes`.",
    unbind_success: "Los juegos gratis ya no se anunciarán en {channel}.",
    unbind_already: "No hay ningún canal seleccionado.",
    source_enabled: "Anuncios de **{source}** activados.",
    source_disabled: "Anuncios de **{source}** desactivados.",
    source_unchanged: "No ha cambiado nada para **{source}**.",
    source_unknown: "Fuente desconocida `{source}`. Usa `/sources` para verlas.",
    mention_set: "Los anuncios mencionarán a {role}.",
    mention_cleared: "Los anuncios no mencionarán ningún rol.",
    mentions_on: "Menciones de rol activadas.",
    mentions_off: "Menciones de rol desactivadas.",
    language_changed: "Idioma cambiado a español.",
    language_unknown: "Idioma desconocido. Disponibles: {languages}.",
    status_title: "Estado",
    status_channel: "Canal de anuncios",
    status_polling: "Buscando juegos gratis",
    status_mention: "Mención",
    active: "Activo",
    inactive: "Inactivo",
    unavailable: "La configuración no está disponible ahora mismo, inténtalo más tarde.",
    help_title: "Comandos y preguntas frecuentes",
    help_fields: &[
        ("/bind <canal>", "Elige el canal donde se anuncian los juegos gratis. No se anuncia nada hasta elegir un canal.", false),
        ("/unbind", "Deja de anunciar juegos gratis en este servidor.", false),
        ("/enable <fuente>, /disable <fuente>", "Activa o desactiva los anuncios de una tienda. Todas están activadas por defecto.", false),
        ("/mention [rol]", "Menciona un rol en cada anuncio. Deja el rol vacío para no mencionar a nadie.", false),
        ("/mentions <on>", "Activa o desactiva las menciones sin olvidar el rol.", false),
        ("/language <código>", "Cambia el idioma de los anuncios y respuestas.", false),
        ("/status, /sources", "Muestra la configuración del servidor y las tiendas que se revisan.", false),
        ("/start, /stop, /stats", "Empieza o deja de buscar juegos gratis, o muestra el estado del bot. Solo para los dueños del bot.", false),
        ("¿Qué tiendas se revisan?", "Epic Games, Humble Bundle, Steam y Ubisoft. Los DLC no se anuncian.", true),
        ("¿Por qué no aparecen los anuncios?", "Comprueba que hay un canal elegido con /bind y que puedo enviar mensajes en él.", true),
    ],
    stats_title: "Estadísticas",
    stats_guilds: "Servidores",
    stats_owners: "Dueños",
    stats_last_cycle: "Última revisión",
    stats_cycle: "<t:{when}:R>\n**{new}** nuevos, **{expired}** caducados\n**{delivered}** enviados, **{failed}** fallidos\nOmitidas: {skipped}",
    stats_no_cycle: "Todavía no ha terminado ninguna revisión.",
    guild_only: "Los comandos deben usarse en un servidor.",
    owners_only: "Solo los dueños del bot pueden hacer eso.",
    missing_administrator: "Necesitas el permiso de `Administrador` para hacer eso.",
    channel_unusable: "No puedo usar ese canal, me faltan los permisos `Ver canal` y `Enviar mensajes`.",
    unexpected_error: "Ha ocurrido un error inesperado...",
};

impl Locale {
    /// Parses a stored locale code, falling back to English for codes that
    /// are no longer supported.
    pub fn from_code(code: &str) -> Self {
        Self::from_str(code).unwrap_or_default()
    }

    pub fn catalog(self) -> &'static Catalog {
        match self {
            Self::English => &ENGLISH,
            Self::Spanish => &SPANISH,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;

    #[rstest]
    #[case("en", Locale::English)]
    #[case("es", Locale::Spanish)]
    #[case("klingon", Locale::English)]
    #[case("", Locale::English)]
    fn from_code_falls_back_to_english(#[case] code: &str, #[case] expected: Locale) {
        assert_eq!(expected, Locale::from_code(code));
    }

    #[test]
    fn code_round_trips_through_display() {
        for locale in Locale::iter() {
            assert_eq!(locale, Locale::from_code(&locale.to_string()));
        }
    }

    #[test]
    fn every_locale_has_the_same_help_layout() {
        let english = Locale::English.catalog().help_fields;
        for locale in Locale::iter() {
            let fields = locale.catalog().help_fields;
            assert_eq!(english.len(), fields.len(), "{locale}");
            for (en, other) in english.iter().zip(fields) {
                assert_eq!(en.2, other.2, "{locale}: {}", other.0);
            }
        }
    }

    #[test]
    fn every_stats_template_has_placeholders() {
        for locale in Locale::iter() {
            let template = locale.catalog().stats_cycle;
            for key in ["{when}", "{new}", "{expired}", "{delivered}", "{failed}", "{skipped}"] {
                assert!(template.contains(key), "{locale}: {key}");
            }
        }
    }

    #[test]
    fn every_free_game_template_has_placeholders() {
        for locale in Locale::iter() {
            let templates = locale.catalog().free_game;
            assert!(!templates.is_empty(), "{locale}");
            for template in templates {
                assert!(template.contains("{name}"), "{locale}: {template}");
                assert!(template.contains("{link}"), "{locale}: {template}");
            }
        }
    }
}
