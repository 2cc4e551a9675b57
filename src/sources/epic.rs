use async_trait::async_trait;
use reqwest::header::HeaderMap;

use super::{Descriptor, Source, SourceError};
use crate::{StdResult, models::Game};

const ENDPOINT: &str =
    "https://store-site-backend-static.ak.epicgames.com/freeGamesPromotions?locale=en-US&country=US";
const PRODUCT_BASE: &str = "https://store.epicgames.com/p/";

pub struct Epic {
    http: reqwest::Client,
    descriptor: Descriptor,
}

impl Epic {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            descriptor: Descriptor {
                id: "epic",
                name: "Epic Games",
                color: 0x202020,
            },
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct Response {
    data: Data,
}

#[derive(Debug, serde::Deserialize)]
struct Data {
    #[serde(rename = "Catalog")]
    catalog: Catalog,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct Catalog {
    search_store: SearchStore,
}

#[derive(Debug, serde::Deserialize)]
struct SearchStore {
    elements: Vec<Element>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct Element {
    title: String,
    product_slug: Option<String>,
    #[serde(default)]
    offer_mappings: Option<Vec<OfferMapping>>,
    price: Price,
    promotions: Option<Promotions>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfferMapping {
    page_slug: String,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct Price {
    total_price: TotalPrice,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalPrice {
    original_price: i64,
    discount: i64,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct Promotions {
    #[serde(default)]
    promotional_offers: Vec<serde_json::Value>,
}

impl Element {
    /// Free right now because of a running promotion, as opposed to a
    /// permanently free product or one whose giveaway is only upcoming.
    fn is_promoted_free(&self) -> bool {
        let price = &self.price.total_price;
        price.original_price - price.discount == 0
            && self
                .promotions
                .as_ref()
                .is_some_and(|p| !p.promotional_offers.is_empty())
    }

    fn slug(&self) -> Option<&str> {
        self.product_slug
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| {
                self.offer_mappings
                    .as_ref()?
                    .first()
                    .map(|m| m.page_slug.as_str())
            })
            .filter(|s| !s.is_empty())
    }
}

#[async_trait]
impl Source for Epic {
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    async fn fetch(&self) -> StdResult<String, SourceError> {
        super::get_text(&self.http, ENDPOINT, HeaderMap::new()).await
    }

    async fn parse(&self, raw: String) -> StdResult<Vec<Game>, SourceError> {
        let response: Response = serde_json::from_str(&raw)?;

        Ok(response
            .data
            .catalog
            .search_store
            .elements
            .iter()
            .filter(|e| e.is_promoted_free())
            .filter_map(|e| {
                let slug = e.slug()?;
                Some(Game::new(
                    &e.title,
                    format!("{PRODUCT_BASE}{slug}"),
                    self.descriptor.id,
                ))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn element(title: &str, slug: Option<&str>, original: i64, discount: i64, offers: usize) -> serde_json::Value {
        json!({
            "title": title,
            "productSlug": slug,
            "offerMappings": [{ "pageSlug": format!("{}-mapping", title.to_lowercase()) }],
            "price": { "totalPrice": { "originalPrice": original, "discount": discount } },
            "promotions": { "promotionalOffers": vec![json!({}); offers] },
        })
    }

    fn listing(elements: Vec<serde_json::Value>) -> String {
        json!({ "data": { "Catalog": { "searchStore": { "elements": elements } } } }).to_string()
    }

    #[tokio::test]
    async fn parse_keeps_only_promoted_free_games() {
        let epic = Epic::new(reqwest::Client::new());
        let raw = listing(vec![
            element("Giveaway", Some("giveaway"), 1999, 1999, 1),
            element("Discounted", Some("discounted"), 1999, 500, 1),
            element("Upcoming", Some("upcoming"), 1999, 0, 0),
            element("AlwaysFree", Some("always-free"), 0, 0, 0),
        ]);

        let actual = epic.parse(raw).await.unwrap();

        assert_eq!(1, actual.len(), "{actual:?}");
        assert_eq!("Giveaway", actual[0].name);
        assert_eq!("https://store.epicgames.com/p/giveaway", actual[0].link);
        assert_eq!("epic", actual[0].source_id);
    }

    #[tokio::test]
    async fn parse_falls_back_to_offer_mapping_slug() {
        let epic = Epic::new(reqwest::Client::new());
        let raw = listing(vec![element("Mystery", None, 0, 0, 1)]);

        let actual = epic.parse(raw).await.unwrap();

        assert_eq!("https://store.epicgames.com/p/mystery-mapping", actual[0].link);
    }

    #[tokio::test]
    async fn parse_accepts_null_promotions() {
        let epic = Epic::new(reqwest::Client::new());
        let mut e = element("NoPromo", Some("no-promo"), 0, 0, 0);
        e["promotions"] = serde_json::Value::Null;

        let actual = epic.parse(listing(vec![e])).await.unwrap();

        assert!(actual.is_empty());
    }

    #[tokio::test]
    async fn parse_rejects_unexpected_shape() {
        let epic = Epic::new(reqwest::Client::new());

        let missing = epic.parse(json!({ "data": {} }).to_string()).await;
        let garbage = epic.parse("<html>".to_string()).await;

        assert!(matches!(missing, Err(SourceError::Json(_))), "{missing:?}");
        assert!(matches!(garbage, Err(SourceError::Json(_))), "{garbage:?}");
    }
}
