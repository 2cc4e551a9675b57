use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::{Descriptor, Source, SourceError};
use crate::{StdResult, models::Game};

const ENDPOINT: &str =
    "https://public-ubiservices.ubi.com/v1/spaces/news?spaceId=6d0af36b-8226-44b6-a03b-4660073a6349";
const APP_ID: &str = "314d4fef-e568-454a-ae06-43e3bece12a6";

pub struct Ubisoft {
    http: reqwest::Client,
    descriptor: Descriptor,
}

impl Ubisoft {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            descriptor: Descriptor {
                id: "ubisoft",
                name: "Ubisoft Connect",
                color: 0x0084FF,
            },
        }
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("ubi-appid"),
            HeaderValue::from_static(APP_ID),
        );
        headers.insert(
            HeaderName::from_static("ubi-localecode"),
            HeaderValue::from_static("en-US"),
        );
        headers
    }
}

#[derive(Debug, serde::Deserialize)]
struct Response {
    news: Vec<News>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct News {
    #[serde(rename = "type")]
    kind: String,
    title: Option<String>,
    expiration_date: Option<String>,
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, serde::Deserialize)]
struct Link {
    param: Option<String>,
}

#[async_trait]
impl Source for Ubisoft {
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    async fn fetch(&self) -> StdResult<String, SourceError> {
        super::get_text(&self.http, ENDPOINT, Self::headers()).await
    }

    async fn parse(&self, raw: String) -> StdResult<Vec<Game>, SourceError> {
        let response: Response = serde_json::from_str(&raw)?;

        let mut games = Vec::new();
        // Giveaways without an expiration date are permanent free-to-play titles.
        for news in response.news {
            if news.kind != "freegame" || news.expiration_date.is_none() {
                continue;
            }
            let title = news.title.ok_or(SourceError::MissingField("title"))?;
            let link = news
                .links
                .into_iter()
                .next()
                .and_then(|link| link.param)
                .ok_or(SourceError::MissingField("links"))?;
            games.push(Game::new(title, link, self.descriptor.id));
        }

        Ok(games)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn parse_keeps_expiring_giveaways() {
        let ubisoft = Ubisoft::new(reqwest::Client::new());
        let raw = json!({
            "news": [
                { "type": "freegame", "title": "Giveaway", "expirationDate": "2026-11-01T00:00:00Z",
                  "links": [{ "param": "https://register.ubisoft.com/giveaway" }] },
                { "type": "freegame", "title": "Free To Play", "expirationDate": null, "links": [] },
                { "type": "news", "title": "Patch Notes", "expirationDate": "2026-11-01T00:00:00Z", "links": [] },
            ]
        })
        .to_string();

        let actual = ubisoft.parse(raw).await.unwrap();

        assert_eq!(1, actual.len(), "{actual:?}");
        assert_eq!("Giveaway", actual[0].name);
        assert_eq!("https://register.ubisoft.com/giveaway", actual[0].link);
        assert_eq!("ubisoft", actual[0].source_id);
    }

    #[tokio::test]
    async fn parse_ignores_incomplete_news_that_isnt_kept() {
        let ubisoft = Ubisoft::new(reqwest::Client::new());
        let raw = json!({
            "news": [
                { "type": "freegame", "title": "Giveaway", "expirationDate": "2026-11-01T00:00:00Z",
                  "links": [{ "param": "https://register.ubisoft.com/giveaway" }] },
                { "type": "news", "title": null, "expirationDate": null, "links": [{ "param": null }] },
                { "type": "freegame", "title": null, "expirationDate": null },
            ]
        })
        .to_string();

        let actual = ubisoft.parse(raw).await.unwrap();

        assert_eq!(1, actual.len(), "{actual:?}");
        assert_eq!("Giveaway", actual[0].name);
    }

    #[tokio::test]
    async fn parse_rejects_giveaway_without_title() {
        let ubisoft = Ubisoft::new(reqwest::Client::new());
        let raw = json!({
            "news": [{ "type": "freegame", "title": null, "expirationDate": "2026-11-01",
                       "links": [{ "param": "https://register.ubisoft.com/giveaway" }] }]
        })
        .to_string();

        let actual = ubisoft.parse(raw).await;

        assert!(matches!(actual, Err(SourceError::MissingField("title"))), "{actual:?}");
    }

    #[tokio::test]
    async fn parse_rejects_giveaway_without_link() {
        let ubisoft = Ubisoft::new(reqwest::Client::new());
        let raw = json!({
            "news": [{ "type": "freegame", "title": "Broken", "expirationDate": "2026-11-01", "links": [] }]
        })
        .to_string();

        let actual = ubisoft.parse(raw).await;

        assert!(matches!(actual, Err(SourceError::MissingField("links"))), "{actual:?}");
    }
}
