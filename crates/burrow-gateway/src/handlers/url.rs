use crate::error::{AppError, Result};
use crate::model::url::STATUS_OK;
use crate::model::{CreateUrlRequest, CreateUrlResponse, StatusResponse};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use burrow_core::{ShortCode, ShortenParams, ShortenerError};
use tracing::{debug, info};

pub async fn create_url_handler(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    if body.is_empty() {
        return Err(AppError::EmptyBody);
    }

    let request: CreateUrlRequest = serde_json::from_slice(&body).map_err(AppError::InvalidBody)?;
    debug!(url = %request.url, alias = %request.alias, "request body decoded");

    let params = ShortenParams::new(request.url, request.alias);
    let code = state.shortener().shorten(params).await?;

    info!(alias = %code, "url added");

    let response = CreateUrlResponse {
        status: STATUS_OK,
        short_url: code.to_url(state.base_url()),
        alias: code.into(),
    };
    Ok(Json(response).into_response())
}

pub async fn redirect_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let code = parse_alias(alias)?;
    let record = state.shortener().resolve(&code).await?;

    debug!(alias = %code, url = %record.original_url, "url for alias retrieved");

    Ok((StatusCode::FOUND, [(LOCATION, record.original_url)]).into_response())
}

pub async fn delete_url_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>> {
    let code = parse_alias(alias)?;
    state.shortener().remove(&code).await?;

    info!(alias = %code, "url deleted");
    Ok(Json(StatusResponse::ok()))
}

fn parse_alias(alias: String) -> Result<ShortCode> {
    ShortCode::new(alias)
        .map_err(ShortenerError::from)
        .map_err(AppError::from)
}
