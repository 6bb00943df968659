//! Article types as exported by the content backend.
//!
//! Field names follow the backend's camelCase JSON, with the system fields
//! (`_id`, `_sys`) renamed to plain Rust names.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Application (space) metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppMeta {
    /// Display name of the app.
    #[serde(default)]
    pub name: Option<String>,

    /// Unique identifier of the app.
    #[serde(default)]
    pub uid: Option<String>,
}

/// An image asset reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Absolute URL of the image.
    pub src: String,

    /// Alternative text.
    #[serde(default)]
    pub alt: Option<String>,
}

/// Article author.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,

    /// URL slug of the author page.
    pub slug: String,

    /// Biography as trusted HTML.
    #[serde(default)]
    pub biography: Option<String>,

    /// Avatar image.
    #[serde(default)]
    pub profile_image: Option<Image>,
}

/// A tag attached to an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// URL slug of the tag page.
    pub slug: String,
}

/// SEO overrides for an article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleMeta {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub og_image: Option<Image>,
}

/// Backend bookkeeping fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    /// Creation timestamp, which also orders articles.
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single blog article.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Article title.
    pub title: String,

    /// URL slug.
    pub slug: String,

    /// Body as trusted HTML.
    #[serde(default)]
    pub body: String,

    /// Cover image shown above the article.
    #[serde(default)]
    pub cover_image: Option<Image>,

    #[serde(default)]
    pub author: Option<Author>,

    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(default)]
    pub meta: Option<ArticleMeta>,

    #[serde(rename = "_sys")]
    pub sys: SystemInfo,
}

impl Article {
    /// Parse an article from its JSON export.
    ///
    /// `path` is only used to label errors.
    pub fn from_json(path: &Path, text: &str) -> Result<Self> {
        let article: Article =
            serde_json::from_str(text).map_err(|e| CoreError::parse(path, e.to_string()))?;

        if article.slug.trim().is_empty() {
            return Err(CoreError::parse(path, "article slug cannot be empty"));
        }

        if article.slug.contains(['/', '\\']) || article.slug.starts_with('.') {
            return Err(CoreError::parse(
                path,
                format!("article slug `{}` is not a single path segment", article.slug),
            ));
        }

        Ok(article)
    }

    /// Site-relative URL of the article page.
    pub fn url_path(&self) -> String {
        format!("/article/{}", self.slug)
    }
}
