use async_trait::async_trait;
use fol_core::error::Result;
use fol_core::models::{Resource, ResourceOrder, ResourceQuery};
use fol_core::traits::ResourceRepo;
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{QueryBuilder, Row};
use uuid::Uuid;

use crate::{blob_to_uuid, db_err, uuid_to_blob, SqliteStore};

fn resource_from_row(row: &SqliteRow) -> Result<Resource> {
    Ok(Resource {
        id: blob_to_uuid(&row.try_get::<Vec<u8>, _>("id").map_err(db_err)?)?,
        title: row.try_get("title").map_err(db_err)?,
        url: row.try_get("url").map_err(db_err)?,
        description: row.try_get("description").map_err(db_err)?,
        og_title: row.try_get("og_title").map_err(db_err)?,
        og_description: row.try_get("og_description").map_err(db_err)?,
        og_image_url: row.try_get("og_image_url").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

fn order_clause(order: ResourceOrder) -> &'static str {
    match order {
        ResourceOrder::UpdatedDesc => " ORDER BY updated_at DESC, id DESC",
        ResourceOrder::UpdatedAsc => " ORDER BY updated_at ASC, id ASC",
        ResourceOrder::CreatedDesc => " ORDER BY created_at DESC, id DESC",
        ResourceOrder::TitleAsc => " ORDER BY title COLLATE NOCASE ASC, id ASC",
    }
}

/// Escapes LIKE wildcards so user input matches literally.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl ResourceRepo for SqliteStore {
    async fn get_resource(&self, id: Uuid) -> Result<Option<Resource>> {
        let row = sqlx::query("SELECT * FROM resources WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(resource_from_row).transpose()
    }

    async fn list_resources(&self, query: &ResourceQuery) -> Result<Vec<Resource>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM resources");
        if let Some(needle) = query.title_contains.as_deref().filter(|n| !n.trim().is_empty()) {
            qb.push(" WHERE title LIKE ")
                .push_bind(like_pattern(needle.trim()))
                .push(" ESCAPE '\\'");
        }
        qb.push(order_clause(query.order));
        if let Some(limit) = query.limit {
            qb.push(" LIMIT ").push_bind(i64::from(limit));
        }

        qb.build()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?
            .iter()
            .map(resource_from_row)
            .collect()
    }

    async fn insert_resource(&self, resource: &Resource) -> Result<()> {
        sqlx::query(
            "INSERT INTO resources (id, title, url, description, og_title, og_description, og_image_url, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(resource.id))
        .bind(&resource.title)
        .bind(&resource.url)
        .bind(&resource.description)
        .bind(&resource.og_title)
        .bind(&resource.og_description)
        .bind(&resource.og_image_url)
        .bind(resource.created_at)
        .bind(resource.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn delete_resource(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM resources WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn resource(title: &str, offset_secs: i64) -> Resource {
        let at = Utc::now() + Duration::seconds(offset_secs);
        Resource {
            id: Uuid::now_v7(),
            title: title.to_string(),
            url: format!("https://example.org/{}", title.to_lowercase()),
            description: None,
            og_title: None,
            og_description: None,
            og_image_url: None,
            created_at: at,
            updated_at: at,
        }
    }

    async fn seeded() -> SqliteStore {
        let store = SqliteStore::new("sqlite::memory:").await.unwrap();
        for (title, offset) in [("Rosary", 0), ("Angelus", 10), ("Novena_Guide", 20)] {
            store.insert_resource(&resource(title, offset)).await.unwrap();
        }
        store
    }

    fn titles(resources: Vec<Resource>) -> Vec<String> {
        resources.into_iter().map(|r| r.title).collect()
    }

    #[tokio::test]
    async fn default_order_is_most_recently_updated_first() {
        let store = seeded().await;
        let listed = store.list_resources(&ResourceQuery::default()).await.unwrap();
        assert_eq!(titles(listed), ["Novena_Guide", "Angelus", "Rosary"]);
    }

    #[tokio::test]
    async fn query_overrides_order_filter_and_limit() {
        let store = seeded().await;

        let by_title = ResourceQuery {
            order: ResourceOrder::TitleAsc,
            limit: Some(2),
            ..ResourceQuery::default()
        };
        assert_eq!(
            titles(store.list_resources(&by_title).await.unwrap()),
            ["Angelus", "Novena_Guide"]
        );

        let filtered = ResourceQuery {
            title_contains: Some("ROS".into()),
            ..ResourceQuery::default()
        };
        assert_eq!(titles(store.list_resources(&filtered).await.unwrap()), ["Rosary"]);

        // Underscore is matched literally, not as a wildcard.
        let literal = ResourceQuery {
            title_contains: Some("a_".into()),
            ..ResourceQuery::default()
        };
        assert_eq!(
            titles(store.list_resources(&literal).await.unwrap()),
            ["Novena_Guide"]
        );
    }

    #[tokio::test]
    async fn optional_fields_round_trip_as_none() {
        let store = SqliteStore::new("sqlite::memory:").await.unwrap();
        let r = resource("Catechism", 0);
        store.insert_resource(&r).await.unwrap();

        let fetched = store.get_resource(r.id).await.unwrap().unwrap();
        assert_eq!(fetched.og_title, None);
        assert_eq!(fetched.description, None);
        assert!(store.delete_resource(r.id).await.unwrap());
        assert!(!store.delete_resource(r.id).await.unwrap());
    }
}
