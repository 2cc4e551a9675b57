use async_trait::async_trait;
use reqwest::header::HeaderMap;

use super::{Descriptor, Source, SourceError};
use crate::{StdResult, models::Game};

const ENDPOINT: &str =
    "https://www.humblebundle.com/store/api/search?sort=discount&filter=onsale&request=1";
const STORE_BASE: &str = "https://www.humblebundle.com/store/";

pub struct Humble {
    http: reqwest::Client,
    descriptor: Descriptor,
}

impl Humble {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            descriptor: Descriptor {
                id: "humble",
                name: "Humble Bundle",
                color: 0xCC2929,
            },
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct Response {
    results: Vec<Product>,
}

#[derive(Debug, serde::Deserialize)]
struct Product {
    human_name: Option<String>,
    human_url: Option<String>,
    current_price: Money,
}

#[derive(Debug, serde::Deserialize)]
struct Money {
    amount: f64,
}

#[async_trait]
impl Source for Humble {
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    async fn fetch(&self) -> StdResult<String, SourceError> {
        super::get_text(&self.http, ENDPOINT, HeaderMap::new()).await
    }

    async fn parse(&self, raw: String) -> StdResult<Vec<Game>, SourceError> {
        let response: Response = serde_json::from_str(&raw)?;
        let base = url::Url::parse(STORE_BASE).map_err(|_| SourceError::MissingField("store base"))?;

        let mut games = Vec::new();
        for product in response.results {
            if product.current_price.amount != 0.0 {
                continue;
            }
            let name = product
                .human_name
                .ok_or(SourceError::MissingField("human_name"))?;
            let link = product
                .human_url
                .and_then(|path| base.join(&path).ok())
                .ok_or(SourceError::MissingField("human_url"))?;
            games.push(Game::new(name, link, self.descriptor.id));
        }

        Ok(games)
    }
}
