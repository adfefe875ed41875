//! Domain records for the profile and media tables.
//!
//! `GptProfile` is keyed by its `title` column; the remaining attributes are
//! all nullable. `MediaItem` mirrors a pre-existing table whose column names
//! are capitalized, so its JSON field names carry serde renames and the SQL
//! that reads it quotes every identifier.

use serde::{Deserialize, Serialize};

/// A GPT profile record, uniquely keyed by `title`.
///
/// The title is immutable after creation; updates replace only the five
/// non-key attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GptProfile {
    /// Primary key. Exact, case-sensitive string match on lookup.
    pub title: String,

    /// URL or path to the profile avatar.
    #[serde(default)]
    pub profile_picture: Option<String>,

    /// Greeting shown when a conversation starts.
    #[serde(default)]
    pub welcome_message: Option<String>,

    /// Free-form description of the profile.
    #[serde(default)]
    pub description: Option<String>,

    /// Ordered suggested opening prompts.
    #[serde(default)]
    pub prompt_starters: Option<Vec<String>>,

    /// System prompt backing the profile.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// The five non-key profile attributes accepted by an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
    /// URL or path to the profile avatar.
    #[serde(default)]
    pub profile_picture: Option<String>,

    /// Greeting shown when a conversation starts.
    #[serde(default)]
    pub welcome_message: Option<String>,

    /// Free-form description of the profile.
    #[serde(default)]
    pub description: Option<String>,

    /// Ordered suggested opening prompts.
    #[serde(default)]
    pub prompt_starters: Option<Vec<String>>,

    /// System prompt backing the profile.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// A row from the externally managed media table.
///
/// The service never writes this table and passes `Variants` through
/// unmodified.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MediaItem {
    /// Ordered numeric key used for pagination cursoring.
    #[serde(rename = "Id")]
    #[sqlx(rename = "Id")]
    pub id: i64,

    /// Location of the media asset.
    #[serde(rename = "Image_url")]
    #[sqlx(rename = "Image_url")]
    pub image_url: Option<String>,

    /// Opaque structured value, passed through as-is.
    #[serde(rename = "Variants")]
    #[sqlx(rename = "Variants")]
    pub variants: serde_json::Value,
}
