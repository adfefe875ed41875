//! Media listing handler.
//!
//! One endpoint: `GET /api?page_size={n}&page={p}`. Pagination filters by
//! `Id` value, not by row count: the computed offset `(page - 1) * page_size`
//! is used as an exclusion threshold on `Id`. This only behaves like true
//! offset pagination when `Id` values are contiguous integers starting near
//! 1, and is preserved as-is because it is observable behavior.
//!
//! Failure policy, also preserved as-is: malformed parameters are a 400,
//! database failures are logged and masked as an empty 200 result, and
//! anything else is a generic 500.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gptdex_core::{models::MediaItem, storage::media};
use serde::Serialize;
use sqlx::postgres::PgConnectOptions;
use tracing::{debug, error, instrument};

const DEFAULT_PAGE_SIZE: i64 = 10;
const DEFAULT_PAGE: i64 = 1;

/// JSON error body for parameter and unexpected failures.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error description.
    pub error: String,
}

/// Failures the listing path distinguishes.
#[derive(Debug)]
enum ListError {
    /// Database-level failure: masked as an empty successful result.
    Database(sqlx::Error),
    /// Anything else: reported generically with a 500.
    Unexpected(String),
}

/// Lists one page of media records.
///
/// Parses `page_size` and `page` from the raw query string so that
/// non-integer values produce the contract's 400 body rather than the
/// framework default.
#[instrument(name = "list_media", skip(options, params))]
pub async fn list_media(
    State(options): State<PgConnectOptions>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let page_size = match parse_param(&params, "page_size", DEFAULT_PAGE_SIZE) {
        Some(v) => v,
        None => return invalid_params_response(),
    };
    let page = match parse_param(&params, "page", DEFAULT_PAGE) {
        Some(v) => v,
        None => return invalid_params_response(),
    };

    match fetch_listing(&options, page, page_size).await {
        Ok(items) => {
            debug!(count = items.len(), page, page_size, "Media page fetched");
            (StatusCode::OK, Json(items)).into_response()
        },
        Err(ListError::Database(e)) => {
            // Masked as "no results"; the log line is the only place the
            // failure is visible.
            error!(error = %e, "Database failure during media listing, returning empty page");
            (StatusCode::OK, Json(Vec::<MediaItem>::new())).into_response()
        },
        Err(ListError::Unexpected(detail)) => {
            error!(detail = %detail, "Unexpected failure during media listing");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody { error: "An unexpected error occurred".to_string() }),
            )
                .into_response()
        },
    }
}

/// Runs the listing query over a fresh per-request connection.
async fn fetch_listing(
    options: &PgConnectOptions,
    page: i64,
    page_size: i64,
) -> Result<Vec<MediaItem>, ListError> {
    let threshold = page_threshold(page, page_size)
        .ok_or_else(|| ListError::Unexpected("page threshold overflowed".to_string()))?;

    media::fetch_page(options, threshold, page_size).await.map_err(ListError::Database)
}

/// Computes the `Id` exclusion threshold for a page.
///
/// `(page - 1) * page_size`, with checked arithmetic. Values of `page`
/// below 1 yield a negative threshold and therefore the full table from the
/// start; ranges are never validated.
fn page_threshold(page: i64, page_size: i64) -> Option<i64> {
    page.checked_sub(1)?.checked_mul(page_size)
}

/// Parses an optional integer query parameter.
///
/// Returns the default when absent, `None` when present but unparseable.
fn parse_param(params: &HashMap<String, String>, key: &str, default: i64) -> Option<i64> {
    match params.get(key) {
        Some(raw) => raw.parse().ok(),
        None => Some(default),
    }
}

/// 400 with the exact contract body.
fn invalid_params_response() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody { error: "Invalid input parameters".to_string() }),
    )
        .into_response()
}
