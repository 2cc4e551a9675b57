use std::sync::LazyLock;

use async_trait::async_trait;
use futures::{StreamExt, stream};
use regex::Regex;
use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::debug;

use super::{Descriptor, Source, SourceError};
use crate::{StdResult, models::Game};

const STORE_BASE: &str = "https://store.steampowered.com";
const SEARCH_QUERY: &str =
    "/search/results/?query&start=0&count=25&sort_by=Price_ASC&specials=1&infinite=1";
/// Skips the age gate so store pages of mature games can be classified.
const AGE_GATE_COOKIE: &str = "birthtime=470703601; lastagecheckage=1-0-1985; wants_mature_content=1";
const DLC_CHECK_BUFFER_SIZE: usize = 4;

static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a\b[^>]*\bsearch_result_row\b[^>]*>.*?</a>"#).expect("invalid row regex")
});
static APP_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-ds-appid="(\d+)"#).expect("invalid appid regex"));
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span class="title">([^<]*)</span>"#).expect("invalid title regex")
});

pub struct Steam {
    http: reqwest::Client,
    descriptor: Descriptor,
    store_base: String,
}

#[derive(Debug, serde::Deserialize)]
struct SearchResponse {
    results_html: String,
}

/// A search result that's fully discounted but may still be a DLC.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    app_id: String,
    title: String,
}

impl Steam {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            descriptor: Descriptor {
                id: "steam",
                name: "Steam",
                color: 0x1B2838,
            },
            store_base: STORE_BASE.to_string(),
        }
    }

    fn app_url(&self, app_id: &str) -> String {
        format!("{}/app/{}", self.store_base, app_id)
    }

    /// `Some(true)` for a DLC, `Some(false)` for a standalone game and
    /// `None` if the store page couldn't tell (or couldn't be fetched).
    async fn is_dlc(&self, app_id: &str) -> Option<bool> {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(AGE_GATE_COOKIE));

        match super::get_text(&self.http, &self.app_url(app_id), headers).await {
            Ok(page) => classify_store_page(&page),
            Err(err) => {
                debug!(app_id, %err, "DLC check failed");
                None
            }
        }
    }
}

fn classify_store_page(page: &str) -> Option<bool> {
    let dlc_area = page.contains("game_area_dlc_bubble");
    let purchase_area = page.contains("game_area_purchase_game_wrapper");

    match (dlc_area, purchase_area) {
        (true, true) => Some(true),
        (false, true) => Some(false),
        _ => None,
    }
}

fn candidates(results_html: &str) -> Vec<Candidate> {
    ROW_RE
        .find_iter(results_html)
        .map(|row| row.as_str())
        .filter(|row| row.contains(">-100%<"))
        .filter_map(|row| {
            let app_id = APP_ID_RE.captures(row)?.get(1)?.as_str().to_string();
            let title = TITLE_RE.captures(row)?.get(1)?.as_str();
            Some(Candidate {
                app_id,
                title: decode_entities(title.trim()),
            })
        })
        .collect()
}

fn decode_entities(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[async_trait]
impl Source for Steam {
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    async fn fetch(&self) -> StdResult<String, SourceError> {
        let url = format!("{}{}", self.store_base, SEARCH_QUERY);
        super::get_text(&self.http, &url, HeaderMap::new()).await
    }

    async fn parse(&self, raw: String) -> StdResult<Vec<Game>, SourceError> {
        let response: SearchResponse = serde_json::from_str(&raw)?;

        // Inconclusive checks count as DLC.
        let checks = stream::iter(candidates(&response.results_html))
            .map(|candidate| async move {
                let is_dlc = self.is_dlc(&candidate.app_id).await;
                (candidate, is_dlc)
            })
            .buffered(DLC_CHECK_BUFFER_SIZE);

        Ok(checks
            .filter_map(|(candidate, is_dlc)| async move {
                (is_dlc == Some(false)).then(|| {
                    Game::new(
                        candidate.title,
                        self.app_url(&candidate.app_id),
                        self.descriptor.id,
                    )
                })
            })
            .collect::<Vec<_>>()
            .await)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn row(app_id: &str, title: &str, discount: &str) -> String {
        format!(
            r#"<a href="https://store.steampowered.com/app/{app_id}/x/" data-ds-appid="{app_id}" class="search_result_row ds_collapse_flag">
  <div class="responsive_search_name_combined">
    <div class="col search_name ellipsis"><span class="title">{title}</span></div>
    <div class="col search_discount_and_price responsive_secondrow">
      <div class="discount_block search_discount_block"><div class="discount_pct">{discount}</div></div>
    </div>
  </div>
</a>"#
        )
    }

    #[test]
    fn candidates_are_fully_discounted_rows() {
        let html = [
            row("10", "Free &amp; Easy", "-100%"),
            row("20", "Half Off", "-50%"),
            row("30", "Also Free", "-100%"),
        ]
        .join("\n");

        let actual = candidates(&html);

        assert_eq!(
            vec![
                Candidate { app_id: "10".to_string(), title: "Free & Easy".to_string() },
                Candidate { app_id: "30".to_string(), title: "Also Free".to_string() },
            ],
            actual
        );
    }

    #[test]
    fn candidates_skip_rows_without_app_id() {
        let html = row("10", "Bundle", "-100%").replace(r#"data-ds-appid="10""#, r#"data-ds-bundleid="10""#);

        assert!(candidates(&html).is_empty());
    }

    #[rstest]
    #[case::dlc(r#"<div class="game_area_dlc_bubble"></div><div class="game_area_purchase_game_wrapper">"#, Some(true))]
    #[case::game(r#"<div class="game_area_purchase_game_wrapper">"#, Some(false))]
    #[case::age_gate(r#"<div class="agegate_birthday_selector">"#, None)]
    #[case::dlc_without_purchase(r#"<div class="game_area_dlc_bubble">"#, None)]
    fn classify_store_page_cases(#[case] page: &str, #[case] expected: Option<bool>) {
        assert_eq!(expected, classify_store_page(page));
    }

    #[tokio::test]
    async fn parse_without_candidates_is_empty_not_error() {
        let steam = Steam::new(reqwest::Client::new());
        let raw = serde_json::json!({ "results_html": row("20", "Half Off", "-50%") }).to_string();

        let actual = steam.parse(raw).await.unwrap();

        assert!(actual.is_empty());
    }

    /// Serves `page` to every connection, returning the base URL.
    async fn serve(page: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0; 4096];
                socket.read(&mut request).await.ok();
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{page}",
                    page.len()
                );
                socket.write_all(response.as_bytes()).await.ok();
            }
        });
        format!("http://{addr}")
    }

    fn steam_at(store_base: String) -> Steam {
        Steam {
            store_base,
            ..Steam::new(reqwest::Client::builder().no_proxy().build().unwrap())
        }
    }

    fn search_response(rows: &[String]) -> String {
        serde_json::json!({ "results_html": rows.join("\n") }).to_string()
    }

    #[tokio::test]
    async fn unreachable_store_page_excludes_candidate() {
        let steam = steam_at("http://127.0.0.1:1".to_string());
        let raw = search_response(&[row("10", "Free", "-100%")]);

        let actual = steam.parse(raw).await.unwrap();

        assert_eq!(Vec::<Game>::new(), actual);
    }

    #[tokio::test]
    async fn standalone_game_is_kept() {
        let base = serve(r#"<div class="game_area_purchase_game_wrapper">"#).await;
        let steam = steam_at(base.clone());
        let raw = search_response(&[row("10", "Free", "-100%"), row("20", "Half Off", "-50%")]);

        let actual = steam.parse(raw).await.unwrap();

        assert_eq!(1, actual.len(), "{actual:?}");
        assert_eq!("Free", actual[0].name);
        assert_eq!(format!("{base}/app/10"), actual[0].link);
        assert_eq!("steam", actual[0].source_id);
    }

    #[tokio::test]
    async fn dlc_and_inconclusive_pages_are_excluded() {
        let dlc = steam_at(
            serve(r#"<div class="game_area_dlc_bubble"></div><div class="game_area_purchase_game_wrapper">"#)
                .await,
        );
        let age_gate = steam_at(serve(r#"<div class="agegate_birthday_selector">"#).await);
        let raw = search_response(&[row("10", "Free", "-100%")]);

        assert!(dlc.parse(raw.clone()).await.unwrap().is_empty());
        assert!(age_gate.parse(raw).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn parse_rejects_missing_results_html() {
        let steam = Steam::new(reqwest::Client::new());

        let actual = steam.parse(r#"{"success": 1}"#.to_string()).await;

        assert!(matches!(actual, Err(SourceError::Json(_))), "{actual:?}");
    }
}
