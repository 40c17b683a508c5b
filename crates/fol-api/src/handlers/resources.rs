use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use fol_core::error::{AppError, FieldErrors};
use fol_core::models::{NewResource, ResourceOrder, ResourceQuery};
use fol_ui::{FormValues, Page, ResourceTemplate, ResourceView, ResourcesTemplate};
use serde::Deserialize;
use uuid::Uuid;

use super::{render, see_other, AppState};
use crate::error::ApiResult;
use crate::session::SessionContext;

/// `GET /resources?q=rosary&order=title_asc&limit=20`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub order: Option<ResourceOrder>,
    pub limit: Option<u32>,
}

impl From<ListParams> for ResourceQuery {
    fn from(params: ListParams) -> Self {
        ResourceQuery {
            title_contains: params.q,
            order: params.order.unwrap_or_default(),
            limit: params.limit,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResourceForm {
    pub title: String,
    pub url: String,
    pub description: String,
}

async fn list_page(
    data: &AppState,
    is_editor: bool,
    status: StatusCode,
    query: ResourceQuery,
    form: FormValues,
    errors: FieldErrors,
) -> ApiResult<HttpResponse> {
    let resources = data.resources.list(&query).await?;
    render(
        status,
        &ResourcesTemplate {
            page: Page::new("Resources", is_editor),
            resources: resources.iter().map(ResourceView::from).collect(),
            form,
            errors,
        },
    )
}

pub async fn list(
    data: web::Data<AppState>,
    session: SessionContext,
    params: web::Query<ListParams>,
) -> ApiResult<HttpResponse> {
    list_page(
        &data,
        session.caller().is_editor(),
        StatusCode::OK,
        params.into_inner().into(),
        FormValues::default(),
        FieldErrors::new(),
    )
    .await
}

pub async fn create(
    data: web::Data<AppState>,
    session: SessionContext,
    form: web::Form<ResourceForm>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller();
    let form = form.into_inner();
    let echo = FormValues {
        title: form.title.clone(),
        url: form.url.clone(),
        description: form.description.clone(),
        ..FormValues::default()
    };

    let input = NewResource {
        title: form.title,
        url: form.url,
        description: Some(form.description),
    };

    match data.resources.create(&caller, input).await {
        Ok(resource) => Ok(see_other(&format!("/resources/{}", resource.id))),
        Err(AppError::Validation(errors)) => {
            list_page(
                &data,
                caller.is_editor(),
                StatusCode::BAD_REQUEST,
                ResourceQuery::default(),
                echo,
                errors,
            )
            .await
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn show(
    data: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let resource = data.resources.get(path.into_inner()).await?;
    render(
        StatusCode::OK,
        &ResourceTemplate {
            page: Page::new(&resource.title, session.caller().is_editor()),
            resource: ResourceView::from(&resource),
        },
    )
}

pub async fn delete(
    data: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    data.resources
        .delete(&session.caller(), path.into_inner())
        .await?;
    Ok(see_other("/resources"))
}
