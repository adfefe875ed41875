//! Profile CRUD handlers.
//!
//! Each handler maps one HTTP operation to one storage call. Error bodies
//! are part of the contract: a missing title yields exactly
//! `{"error":"Item not found"}` with 404, and a successful delete yields
//! `{"message":"Item deleted successfully"}`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gptdex_core::{storage::Storage, CoreError, GptProfile, ProfilePatch};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

/// JSON error body returned for missing records.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error description.
    pub error: String,
}

/// JSON confirmation body returned after a delete.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    /// Human-readable confirmation.
    pub message: String,
}

/// Returns the entire profile collection.
///
/// Empty array when the table is empty; row order is unspecified.
#[instrument(name = "list_profiles", skip(storage))]
pub async fn list_profiles(State(storage): State<Storage>) -> Response {
    match storage.profiles.list_all().await {
        Ok(profiles) => (StatusCode::OK, Json(profiles)).into_response(),
        Err(e) => unhandled_error(&e),
    }
}

/// Returns the profile whose title matches exactly.
#[instrument(name = "get_profile", skip(storage))]
pub async fn get_profile(State(storage): State<Storage>, Path(title): Path<String>) -> Response {
    match storage.profiles.find_by_title(&title).await {
        Ok(Some(profile)) => (StatusCode::OK, Json(profile)).into_response(),
        Ok(None) => not_found_response(),
        Err(e) => unhandled_error(&e),
    }
}

/// Inserts a new profile and returns the stored record with 201.
///
/// A duplicate title is a constraint violation and, per the contract,
/// surfaces as an unhandled 500 rather than a structured conflict response.
#[instrument(name = "create_profile", skip(storage, profile), fields(title = %profile.title))]
pub async fn create_profile(
    State(storage): State<Storage>,
    Json(profile): Json<GptProfile>,
) -> Response {
    match storage.profiles.insert(&profile).await {
        Ok(stored) => {
            info!("Profile created");
            (StatusCode::CREATED, Json(stored)).into_response()
        },
        Err(e) => unhandled_error(&e),
    }
}

/// Updates the five non-key fields of a profile and returns the result.
#[instrument(name = "update_profile", skip(storage, patch))]
pub async fn update_profile(
    State(storage): State<Storage>,
    Path(title): Path<String>,
    Json(patch): Json<ProfilePatch>,
) -> Response {
    match storage.profiles.update(&title, &patch).await {
        Ok(Some(updated)) => (StatusCode::OK, Json(updated)).into_response(),
        Ok(None) => not_found_response(),
        Err(e) => unhandled_error(&e),
    }
}

/// Removes a profile and returns a confirmation body.
#[instrument(name = "delete_profile", skip(storage))]
pub async fn delete_profile(State(storage): State<Storage>, Path(title): Path<String>) -> Response {
    match storage.profiles.delete(&title).await {
        Ok(Some(_)) => {
            info!("Profile deleted");
            deleted_response()
        },
        Ok(None) => not_found_response(),
        Err(e) => unhandled_error(&e),
    }
}

/// 404 with the exact contract body.
fn not_found_response() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorBody { error: "Item not found".to_string() }))
        .into_response()
}

/// 200 with the exact delete-confirmation body.
fn deleted_response() -> Response {
    (StatusCode::OK, Json(MessageBody { message: "Item deleted successfully".to_string() }))
        .into_response()
}

/// Opaque 500 for storage failures the contract leaves unhandled.
fn unhandled_error(e: &CoreError) -> Response {
    match e {
        CoreError::ConstraintViolation(detail) => {
            warn!(detail = %detail, "Constraint violation on write");
        },
        _ => {
            error!(error = %e, "Storage operation failed");
        },
    }
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn not_found_body_matches_contract() {
        let response = not_found_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, r#"{"error":"Item not found"}"#);
    }

    #[tokio::test]
    async fn delete_confirmation_matches_contract() {
        let response = deleted_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"message":"Item deleted successfully"}"#);
    }

    #[tokio::test]
    async fn storage_failures_yield_bare_500() {
        let response = unhandled_error(&CoreError::ConstraintViolation("duplicate".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_string(response).await.is_empty());
    }
}
