//! Content collection.
//!
//! Walks the content directory for exported article JSON files and orders the
//! articles by creation time.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use blogtoc_core::{AppMeta, Article, CoreError};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::html::Neighbors;

/// File at the content root holding the app metadata.
pub const APP_FILE: &str = "app.json";

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error.
    #[error("cannot walk content directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Article or app metadata error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Content directory does not exist.
    #[error("content directory not found: {0}")]
    MissingDir(PathBuf),
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Collected site content.
#[derive(Debug, Default)]
pub struct SiteContent {
    /// App metadata from `app.json`, if present.
    pub app: AppMeta,

    /// Articles, oldest first.
    pub articles: Vec<Article>,

    /// Files that could not be used.
    pub skipped: Vec<PathBuf>,
}

impl SiteContent {
    /// Older and newer neighbours of the article at `index`.
    pub fn neighbors(&self, index: usize) -> Neighbors<'_> {
        Neighbors {
            prev: index.checked_sub(1).and_then(|i| self.articles.get(i)),
            next: self.articles.get(index + 1),
        }
    }

    /// Look up an article by slug.
    pub fn find(&self, slug: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.slug == slug)
    }
}

/// Collects articles from a directory of JSON exports.
#[derive(Debug)]
pub struct ArticleCollector {
    content_dir: PathBuf,
}

impl ArticleCollector {
    /// Create a new collector.
    #[must_use]
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    /// Collect all articles from the content directory.
    pub fn collect(&self) -> Result<SiteContent> {
        info!(dir = %self.content_dir.display(), "collecting articles");

        if !self.content_dir.is_dir() {
            return Err(CollectorError::MissingDir(self.content_dir.clone()));
        }

        let app = self.read_app()?;
        let files = self.find_article_files()?;
        info!(count = files.len(), "found article files");

        let parsed: Vec<_> = files
            .par_iter()
            .map(|path| (path, read_article(path)))
            .collect();

        let mut content = SiteContent {
            app,
            ..SiteContent::default()
        };
        let mut seen = HashSet::new();

        for (path, result) in parsed {
            match result {
                Ok(article) if !seen.insert(article.slug.clone()) => {
                    warn!(path = %path.display(), slug = %article.slug, "duplicate slug, skipping");
                    content.skipped.push(path.clone());
                }
                Ok(article) => content.articles.push(article),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse article");
                    content.skipped.push(path.clone());
                }
            }
        }

        content
            .articles
            .sort_by(|a, b| a.sys.created_at.cmp(&b.sys.created_at).then_with(|| a.slug.cmp(&b.slug)));

        info!(
            articles = content.articles.len(),
            skipped = content.skipped.len(),
            "article collection complete"
        );

        Ok(content)
    }

    fn read_app(&self) -> Result<AppMeta> {
        let path = self.content_dir.join(APP_FILE);
        if !path.is_file() {
            debug!("no {APP_FILE}, using empty app metadata");
            return Ok(AppMeta::default());
        }

        let text = fs::read_to_string(&path)?;
        serde_json::from_str(&text)
            .map_err(|e| CollectorError::from(CoreError::parse(&path, e.to_string())))
    }

    /// Every `*.json` file below the content directory except `app.json`.
    /// Hidden entries are skipped. Sorted for a stable walk order.
    fn find_article_files(&self) -> Result<Vec<PathBuf>> {
        let app_file = self.content_dir.join(APP_FILE);
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.content_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));

        for entry in walker {
            let entry = entry?;
            let path = entry.path();

            if entry.file_type().is_file()
                && path.extension().is_some_and(|ext| ext == "json")
                && path != app_file
            {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }
}

fn read_article(path: &Path) -> Result<Article> {
    let text = fs::read_to_string(path)?;
    Ok(Article::from_json(path, &text)?)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'))
}
