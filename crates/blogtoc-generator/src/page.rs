//! Per-article page metadata.

use std::fmt::Write;

use blogtoc_core::{AppMeta, Article, Config};
use blogtoc_html::excerpt;

/// Characters of body text used when an article has no description.
pub const DESCRIPTION_CHARS: usize = 200;

/// Author name shown when the article has none.
pub const ANONYMOUS_AUTHOR: &str = "NO NAME";

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolved metadata for one article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub og_image: String,
    pub author_name: String,
    /// `createdAt` rendered with `site.date_format`.
    pub publish_date: String,
    /// `createdAt` as `YYYY-MM-DD` for `datetime` attributes.
    pub publish_date_iso: String,
    /// Absolute URL of the page.
    pub url: String,
}

impl PageMeta {
    /// Resolve metadata, preferring SEO overrides and falling back to content.
    pub fn from_article(article: &Article, app: &AppMeta, config: &Config) -> Self {
        let meta = article.meta.as_ref();
        let author = article.author.as_ref();

        let title = meta
            .and_then(|m| non_empty(m.title.as_deref()))
            .or_else(|| non_empty(Some(article.title.as_str())))
            .or_else(|| non_empty(app.name.as_deref()))
            .or_else(|| non_empty(app.uid.as_deref()))
            .or_else(|| non_empty(Some(config.site.title.as_str())))
            .unwrap_or_default()
            .to_string();

        let description = meta
            .and_then(|m| non_empty(m.description.as_deref()))
            .map(str::to_string)
            .unwrap_or_else(|| excerpt(&article.body, DESCRIPTION_CHARS));

        let og_image = meta
            .and_then(|m| m.og_image.as_ref())
            .or_else(|| author.and_then(|a| a.profile_image.as_ref()))
            .map(|image| image.src.clone())
            .unwrap_or_default();

        let author_name = author
            .and_then(|a| non_empty(a.full_name.as_deref()))
            .unwrap_or(ANONYMOUS_AUTHOR)
            .to_string();

        let created = article.sys.created_at;
        let mut publish_date = String::new();
        if write!(publish_date, "{}", created.format(&config.site.date_format)).is_err() {
            tracing::warn!(
                format = %config.site.date_format,
                "invalid site.date_format, using {FALLBACK_DATE_FORMAT}"
            );
            publish_date = created.format(FALLBACK_DATE_FORMAT).to_string();
        }

        Self {
            title,
            description,
            og_image,
            author_name,
            publish_date,
            publish_date_iso: created.format(FALLBACK_DATE_FORMAT).to_string(),
            url: config.url_for(&article.url_path()),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
