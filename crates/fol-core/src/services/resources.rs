use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use super::access::{authorize, Caller};
use crate::error::{AppError, FieldErrors, Result};
use crate::models::{NewResource, OpenGraph, Resource, ResourceQuery};
use crate::traits::{OpenGraphFetcher, ResourceRepo};

/// Resource lifecycle with best-effort Open Graph enrichment.
#[derive(Clone)]
pub struct ResourceService {
    repo: Arc<dyn ResourceRepo>,
    og: Arc<dyn OpenGraphFetcher>,
}

impl ResourceService {
    pub fn new(repo: Arc<dyn ResourceRepo>, og: Arc<dyn OpenGraphFetcher>) -> Self {
        Self { repo, og }
    }

    pub async fn get(&self, id: Uuid) -> Result<Resource> {
        self.repo
            .get_resource(id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource", id))
    }

    pub async fn list(&self, query: &ResourceQuery) -> Result<Vec<Resource>> {
        self.repo.list_resources(query).await
    }

    pub async fn create(&self, caller: &Caller, input: NewResource) -> Result<Resource> {
        let editor = authorize(caller, "resource.create")?;

        let mut errors = FieldErrors::new();
        if input.title.trim().is_empty() {
            errors.add("title", "Title is required");
        }
        let url = input.url.trim().to_string();
        if url.is_empty() {
            errors.add("url", "URL is required");
        } else if !is_web_url(&url) {
            errors.add("url", "URL must start with http:// or https://");
        }
        errors.into_result()?;

        let og = match self.og.fetch(&url).await {
            Ok(og) => og,
            Err(e) => {
                warn!(%url, error = %e, "open graph fetch failed; storing resource without preview");
                OpenGraph::default()
            }
        };

        let now = Utc::now();
        let resource = Resource {
            id: Uuid::now_v7(),
            title: input.title,
            url,
            description: input.description.filter(|d| !d.trim().is_empty()),
            og_title: og.title,
            og_description: og.description,
            og_image_url: og.image_url,
            created_at: now,
            updated_at: now,
        };
        self.repo.insert_resource(&resource).await?;

        info!(resource_id = %resource.id, %editor, "resource created");
        Ok(resource)
    }

    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<()> {
        let editor = authorize(caller, "resource.delete")?;
        if !self.repo.delete_resource(id).await? {
            return Err(AppError::not_found("Resource", id));
        }
        info!(resource_id = %id, %editor, "resource deleted");
        Ok(())
    }
}

/// Only absolute http(s) links are stored; they are rendered as `href`s.
fn is_web_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::models::EditorId;
    use crate::traits::{MockOpenGraphFetcher, MockResourceRepo};

    fn editor() -> Caller {
        Caller::editor(EditorId("editor@example.org".into()))
    }

    fn input(url: &str) -> NewResource {
        NewResource {
            title: "Catechism".into(),
            url: url.into(),
            description: Some(String::new()),
        }
    }

    #[tokio::test]
    async fn fetch_failure_stores_resource_without_metadata() {
        let mut og = MockOpenGraphFetcher::new();
        og.expect_fetch()
            .returning(|_| Err(FetchError::Http("connection refused".into())));
        let mut repo = MockResourceRepo::new();
        repo.expect_insert_resource().times(1).returning(|_| Ok(()));

        let service = ResourceService::new(Arc::new(repo), Arc::new(og));
        let resource = service
            .create(&editor(), input("https://example.org/catechism"))
            .await
            .unwrap();

        assert_eq!(resource.og_title, None);
        assert_eq!(resource.og_description, None);
        assert_eq!(resource.og_image_url, None);
        assert_eq!(resource.description, None);
    }

    #[tokio::test]
    async fn fetched_metadata_is_stored() {
        let mut og = MockOpenGraphFetcher::new();
        og.expect_fetch()
            .withf(|url: &str| url == "https://example.org/catechism")
            .returning(|_| {
                Ok(OpenGraph {
                    title: Some("Catechism of the Catholic Church".into()),
                    description: None,
                    image_url: Some("https://example.org/cover.jpg".into()),
                })
            });
        let mut repo = MockResourceRepo::new();
        repo.expect_insert_resource()
            .withf(|r: &Resource| r.og_title.as_deref() == Some("Catechism of the Catholic Church"))
            .times(1)
            .returning(|_| Ok(()));

        let service = ResourceService::new(Arc::new(repo), Arc::new(og));
        let resource = service
            .create(&editor(), input(" https://example.org/catechism "))
            .await
            .unwrap();
        assert_eq!(resource.og_image_url.as_deref(), Some("https://example.org/cover.jpg"));
    }

    #[tokio::test]
    async fn non_web_urls_are_rejected_before_fetching() {
        let mut og = MockOpenGraphFetcher::new();
        og.expect_fetch().never();
        let mut repo = MockResourceRepo::new();
        repo.expect_insert_resource().never();
        let service = ResourceService::new(Arc::new(repo), Arc::new(og));

        for url in ["javascript:alert(1)", "data:text/html,hi", "ftp://example.org/a", "example.org"] {
            let err = service.create(&editor(), input(url)).await.unwrap_err();
            let AppError::Validation(fields) = err else {
                panic!("expected validation error for {url}");
            };
            assert_eq!(
                fields.get("url"),
                Some("URL must start with http:// or https://"),
                "{url}"
            );
        }
    }

    #[tokio::test]
    async fn title_and_url_are_required() {
        let mut og = MockOpenGraphFetcher::new();
        og.expect_fetch().never();
        let service = ResourceService::new(Arc::new(MockResourceRepo::new()), Arc::new(og));

        let err = service
            .create(
                &editor(),
                NewResource {
                    title: String::new(),
                    url: String::new(),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields.get("url"), Some("URL is required"));
        assert_eq!(fields.get("title"), Some("Title is required"));
    }
}
