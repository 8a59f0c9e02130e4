use super::AppState;
use crate::domain::model::{SourceChoice, UploadedFile, UserRequest};
use crate::utils::error::{DashboardError, Result};
use axum::{
    extract::{multipart::MultipartError, Multipart, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub source: Option<String>,
    pub url: Option<String>,
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Response {
    let request = match SourceChoice::from_param(query.source.as_deref()) {
        SourceChoice::UrlEntry => UserRequest::Url(query.url.unwrap_or_default()),
        SourceChoice::Upload => UserRequest::Upload(None),
    };
    render_page(&state, request).await
}

pub async fn upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let request = match read_upload(&mut multipart).await {
        Ok(file) => UserRequest::Upload(file),
        Err(e) => UserRequest::UploadRejected(e),
    };
    render_page(&state, request).await
}

/// 取出 `file` 欄位；沒有選擇檔案時回傳 None
async fn read_upload(multipart: &mut Multipart) -> Result<Option<UploadedFile>> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content = field.bytes().await.map_err(upload_error)?;

        // 瀏覽器在未選檔時仍會送出空的 file 欄位
        if filename.is_empty() && content.is_empty() {
            return Ok(None);
        }

        tracing::debug!("Received upload {} ({} bytes)", filename, content.len());
        return Ok(Some(UploadedFile {
            filename,
            content: content.to_vec(),
        }));
    }

    Ok(None)
}

fn upload_error(e: MultipartError) -> DashboardError {
    DashboardError::UploadError {
        message: e.body_text(),
    }
}

async fn render_page(state: &AppState, request: UserRequest) -> Response {
    let page = state.dashboard.render(request).await;

    match state.renderer.render(&page) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("❌ Failed to render page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}
