//! # fol-og-scraper
//!
//! Reads Open Graph `<meta>` tags from a remote page.

use std::time::Duration;

use async_trait::async_trait;
use fol_core::error::FetchError;
use fol_core::models::OpenGraph;
use fol_core::traits::OpenGraphFetcher;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "flames-of-love-link-preview/0.1";

pub struct ScrapingOpenGraphFetcher {
    client: Client,
}

impl ScrapingOpenGraphFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl OpenGraphFetcher for ScrapingOpenGraphFetcher {
    async fn fetch(&self, url: &str) -> Result<OpenGraph, FetchError> {
        let page_url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        if !matches!(page_url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "unsupported scheme {}",
                page_url.scheme()
            )));
        }

        let response = self
            .client
            .get(page_url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // Redirects may have moved us; relative image paths resolve against the final URL.
        let final_url = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let og = parse_open_graph(&html, &final_url)?;
        tracing::debug!(
            url = %final_url,
            has_title = og.title.is_some(),
            has_image = og.image_url.is_some(),
            "Open Graph metadata parsed"
        );
        Ok(og)
    }
}

/// Extracts `og:title`, `og:description` and the first usable image tag.
pub fn parse_open_graph(html: &str, base: &Url) -> Result<OpenGraph, FetchError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("meta[property], meta[name]")
        .map_err(|e| FetchError::Parse(format!("{e:?}")))?;

    let mut title = None;
    let mut description = None;
    let mut image = None;
    let mut image_fallback = None;

    for element in document.select(&selector) {
        let value = element.value();
        let Some(key) = value.attr("property").or_else(|| value.attr("name")) else {
            continue;
        };
        let Some(content) = value
            .attr("content")
            .map(str::trim)
            .filter(|c| !c.is_empty())
        else {
            continue;
        };

        match key.to_ascii_lowercase().as_str() {
            "og:title" if title.is_none() => title = Some(content.to_string()),
            "og:description" if description.is_none() => description = Some(content.to_string()),
            "og:image" if image.is_none() => image = Some(content.to_string()),
            "og:image:url" | "og:image:secure_url" if image_fallback.is_none() => {
                image_fallback = Some(content.to_string())
            }
            _ => {}
        }
    }

    let image_url = image
        .or(image_fallback)
        .and_then(|raw| base.join(&raw).ok())
        .map(String::from);

    Ok(OpenGraph {
        title,
        description,
        image_url,
    })
}
