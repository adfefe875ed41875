//! Repository for GPT profile database operations.
//!
//! Owns the `gpts_data` table: its idempotent creation and every CRUD
//! statement against it. Writes commit statement-by-statement; there is no
//! batching or deferred commit.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{error::Result, models::GptProfile, ProfilePatch};

/// Idempotent DDL for the profile table.
///
/// Runs at process start and again defensively before every write that may
/// hit a fresh database.
const CREATE_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS gpts_data (
        title TEXT PRIMARY KEY,
        profile_picture TEXT,
        welcome_message TEXT,
        description TEXT,
        prompt_starters TEXT[],
        system_prompt TEXT
    )
";

const ALL_COLUMNS: &str =
    "title, profile_picture, welcome_message, description, prompt_starters, system_prompt";

/// Repository for profile database operations.
pub struct Repository {
    pool: Arc<PgPool>,
}

impl Repository {
    /// Creates a new repository instance.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Returns a reference to the database pool.
    pub fn pool(&self) -> Arc<PgPool> {
        self.pool.clone()
    }

    /// Creates the `gpts_data` table if it does not already exist.
    ///
    /// Safe to call repeatedly; the statement is a no-op once the table
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns error if the DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE).execute(&*self.pool).await?;

        Ok(())
    }

    /// Returns every profile in the table.
    ///
    /// No ORDER BY: row order is whatever the storage engine yields for a
    /// plain scan.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn list_all(&self) -> Result<Vec<GptProfile>> {
        let profiles = sqlx::query_as::<_, GptProfile>(&format!(
            "SELECT {ALL_COLUMNS} FROM gpts_data"
        ))
        .fetch_all(&*self.pool)
        .await?;

        Ok(profiles)
    }

    /// Finds a profile by exact title.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn find_by_title(&self, title: &str) -> Result<Option<GptProfile>> {
        let profile = sqlx::query_as::<_, GptProfile>(&format!(
            "SELECT {ALL_COLUMNS} FROM gpts_data WHERE title = $1"
        ))
        .bind(title)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(profile)
    }

    /// Inserts a new profile and returns the stored row.
    ///
    /// Ensures the table exists before writing.
    ///
    /// # Errors
    ///
    /// Returns `ConstraintViolation` if the title already exists, or a
    /// database error for any other failure.
    pub async fn insert(&self, profile: &GptProfile) -> Result<GptProfile> {
        self.ensure_schema().await?;

        let stored = sqlx::query_as::<_, GptProfile>(&format!(
            r"
            INSERT INTO gpts_data ({ALL_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ALL_COLUMNS}
            "
        ))
        .bind(&profile.title)
        .bind(&profile.profile_picture)
        .bind(&profile.welcome_message)
        .bind(&profile.description)
        .bind(&profile.prompt_starters)
        .bind(&profile.system_prompt)
        .fetch_one(&*self.pool)
        .await?;

        Ok(stored)
    }

    /// Updates the five non-key attributes of a profile.
    ///
    /// Returns `None` when no row matches the title; the key itself is
    /// immutable.
    ///
    /// # Errors
    ///
    /// Returns error if the update fails.
    pub async fn update(&self, title: &str, patch: &ProfilePatch) -> Result<Option<GptProfile>> {
        let updated = sqlx::query_as::<_, GptProfile>(&format!(
            r"
            UPDATE gpts_data
            SET profile_picture = $2, welcome_message = $3, description = $4,
                prompt_starters = $5, system_prompt = $6
            WHERE title = $1
            RETURNING {ALL_COLUMNS}
            "
        ))
        .bind(title)
        .bind(&patch.profile_picture)
        .bind(&patch.welcome_message)
        .bind(&patch.description)
        .bind(&patch.prompt_starters)
        .bind(&patch.system_prompt)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(updated)
    }

    /// Deletes a profile by title.
    ///
    /// Returns `None` when no row matched.
    ///
    /// # Errors
    ///
    /// Returns error if the delete fails.
    pub async fn delete(&self, title: &str) -> Result<Option<String>> {
        let deleted: Option<(String,)> =
            sqlx::query_as("DELETE FROM gpts_data WHERE title = $1 RETURNING title")
                .bind(title)
                .fetch_optional(&*self.pool)
                .await?;

        Ok(deleted.map(|(t,)| t))
    }

    /// Replaces the entire collection with the supplied profiles.
    ///
    /// Clears the table, then inserts each profile individually. The
    /// delete-then-insert sequence is not wrapped in a transaction, so a
    /// crash mid-sequence can leave the table partially populated. Not
    /// exposed over HTTP; the import surface is out of scope.
    ///
    /// # Errors
    ///
    /// Returns error on the first failing statement.
    pub async fn replace_all(&self, profiles: &[GptProfile]) -> Result<()> {
        self.ensure_schema().await?;

        sqlx::query("DELETE FROM gpts_data").execute(&*self.pool).await?;

        for profile in profiles {
            sqlx::query(&format!(
                "INSERT INTO gpts_data ({ALL_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)"
            ))
            .bind(&profile.title)
            .bind(&profile.profile_picture)
            .bind(&profile.welcome_message)
            .bind(&profile.description)
            .bind(&profile.prompt_starters)
            .bind(&profile.system_prompt)
            .execute(&*self.pool)
            .await?;
        }

        Ok(())
    }
}
