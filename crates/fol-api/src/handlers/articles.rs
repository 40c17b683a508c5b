use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use fol_core::body::BodyInput;
use fol_core::error::{AppError, FieldErrors};
use fol_core::models::NewArticle;
use fol_ui::{ArticleTemplate, ArticleView, ArticlesTemplate, FormValues, Page};
use serde::Deserialize;
use uuid::Uuid;

use super::{render, see_other, AppState};
use crate::error::ApiResult;
use crate::session::SessionContext;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ArticleForm {
    pub title: String,
    pub body: String,
    pub category: String,
}

async fn list_page(
    data: &AppState,
    is_editor: bool,
    status: StatusCode,
    form: FormValues,
    errors: FieldErrors,
) -> ApiResult<HttpResponse> {
    let items = data.articles.list().await?;
    render(
        status,
        &ArticlesTemplate::new(Page::new("Articles", is_editor), &items, form, errors),
    )
}

pub async fn list(data: web::Data<AppState>, session: SessionContext) -> ApiResult<HttpResponse> {
    let caller = session.caller();
    list_page(
        &data,
        caller.is_editor(),
        StatusCode::OK,
        FormValues::default(),
        FieldErrors::new(),
    )
    .await
}

pub async fn create(
    data: web::Data<AppState>,
    session: SessionContext,
    form: web::Form<ArticleForm>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller();
    let form = form.into_inner();
    let echo = FormValues {
        title: form.title.clone(),
        body: form.body.clone(),
        category: form.category.clone(),
        ..FormValues::default()
    };

    let input = NewArticle {
        title: form.title,
        body: BodyInput::from(form.body),
        category: form.category,
        preview_image_url: None,
    };

    match data.articles.create(&caller, input).await {
        Ok(article) => Ok(see_other(&format!("/articles/{}", article.id))),
        Err(AppError::Validation(errors)) => {
            list_page(&data, caller.is_editor(), StatusCode::BAD_REQUEST, echo, errors).await
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn show(
    data: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller();
    let article = data.articles.get(path.into_inner()).await?;
    render(
        StatusCode::OK,
        &ArticleTemplate {
            page: Page::new(&article.title, caller.is_editor()),
            article: ArticleView::from(&article),
        },
    )
}

pub async fn delete(
    data: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    data.articles
        .delete(&session.caller(), path.into_inner())
        .await?;
    Ok(see_other("/articles"))
}
