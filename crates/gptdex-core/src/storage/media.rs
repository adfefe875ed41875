//! Read-only access to the externally managed media table.
//!
//! The media table (`Id`, `Image_url`, `Variants`) is created and populated
//! outside this system, so no DDL lives here and the column identifiers are
//! quoted to preserve their capitalization.
//!
//! Pagination filters by key value, not by row count: rows with `Id` greater
//! than the caller's threshold, ascending, limited to the page size. This
//! matches offset pagination only when `Id` values are contiguous from 1.

use sqlx::{postgres::PgConnectOptions, Connection, PgConnection};
use tracing::warn;

use crate::models::MediaItem;

/// Fetches one page of media rows over a fresh connection.
///
/// Opens a new connection, runs the single listing query, and closes the
/// connection before returning. No connection is reused across requests.
///
/// # Errors
///
/// Returns the underlying `sqlx::Error` for connect or query failures; the
/// caller decides how to surface it.
pub async fn fetch_page(
    options: &PgConnectOptions,
    id_threshold: i64,
    page_size: i64,
) -> sqlx::Result<Vec<MediaItem>> {
    let mut conn = PgConnection::connect_with(options).await?;

    let result = sqlx::query_as::<_, MediaItem>(
        r#"
        SELECT "Id", "Image_url", "Variants"
        FROM media
        WHERE "Id" > $1
        ORDER BY "Id" ASC
        LIMIT $2
        "#,
    )
    .bind(id_threshold)
    .bind(page_size)
    .fetch_all(&mut conn)
    .await;

    if let Err(e) = conn.close().await {
        warn!(error = %e, "Failed to close media connection cleanly");
    }

    result
}
