//! # fol-photos-unsplash
//!
//! `PreviewImageSource` that asks Unsplash for a random landscape photo.

use std::time::Duration;

use async_trait::async_trait;
use fol_core::error::FetchError;
use fol_core::traits::PreviewImageSource;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "https://api.unsplash.com";
pub const DEFAULT_QUERY: &str = "Roman Catholic";

#[derive(Debug, Clone)]
pub struct UnsplashConfig {
    pub access_key: SecretString,
    pub api_base: String,
    pub query: String,
    pub timeout: Duration,
}

pub struct UnsplashPhotos {
    client: Client,
    endpoint: String,
    access_key: SecretString,
    query: String,
}

#[derive(Deserialize)]
struct RandomPhoto {
    urls: PhotoUrls,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
}

impl UnsplashPhotos {
    pub fn new(config: UnsplashConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/photos/random", config.api_base.trim_end_matches('/')),
            access_key: config.access_key,
            query: config.query,
        })
    }
}

#[async_trait]
impl PreviewImageSource for UnsplashPhotos {
    async fn random_image_url(&self) -> Result<String, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("query", self.query.as_str()),
                ("orientation", "landscape"),
                ("client_id", self.access_key.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let photo: RandomPhoto = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;
        tracing::debug!(url = %photo.urls.regular, "Picked preview photo");
        Ok(photo.urls.regular)
    }
}
