//! Build orchestration.
//!
//! Collects articles, renders one page per article in parallel and writes
//! them below the output directory.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use blogtoc_core::Config;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    collector::{ArticleCollector, CollectorError, SiteContent},
    html::{HtmlError, HtmlGenerator},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// HTML generation error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// Refusing to clean an output directory that would remove the content.
    #[error("output directory {output} contains content directory {content}")]
    OutputContainsContent { output: PathBuf, content: PathBuf },
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of pages written.
    pub pages: usize,

    /// Headings annotated across all pages.
    pub headings: usize,

    /// Articles that failed to render.
    pub failed: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    content_dir: PathBuf,
    output_dir: PathBuf,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(
        config: Config,
        content_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();

        info!(
            content = %self.content_dir.display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        let content = ArticleCollector::new(&self.content_dir).collect()?;

        self.clean_output()?;

        let mut stats = self.generate_pages(&content)?;
        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            pages = stats.pages,
            headings = stats.headings,
            failed = stats.failed,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Clean the output directory.
    fn clean_output(&self) -> Result<()> {
        if self.output_dir.exists() {
            if contains(&self.output_dir, &self.content_dir) {
                return Err(BuildError::OutputContainsContent {
                    output: self.output_dir.clone(),
                    content: self.content_dir.clone(),
                });
            }
            debug!(dir = %self.output_dir.display(), "cleaning output directory");
            fs::remove_dir_all(&self.output_dir)?;
        }
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Render and write one page per article.
    fn generate_pages(&self, content: &SiteContent) -> Result<BuildStats> {
        let generator = HtmlGenerator::new(self.config.clone()).with_app(content.app.clone());

        info!(count = content.articles.len(), "generating article pages");

        let results: Vec<_> = content
            .articles
            .par_iter()
            .enumerate()
            .map(|(index, article)| {
                let page = generator.generate_article(article, content.neighbors(index))?;
                let output_path = generator.output_path(article, &self.output_dir);

                if let Some(parent) = output_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&output_path, &page.html)?;

                debug!(path = %output_path.display(), headings = page.toc.len(), "wrote page");
                Ok::<_, BuildError>(page.toc.len())
            })
            .collect();

        let mut stats = BuildStats::default();
        for (article, result) in content.articles.iter().zip(results) {
            match result {
                Ok(headings) => {
                    stats.pages += 1;
                    stats.headings += headings;
                }
                Err(e) if self.config.build.fail_fast => return Err(e),
                Err(e) => {
                    warn!(slug = %article.slug, error = %e, "failed to generate page");
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }
}

fn contains(outer: &Path, inner: &Path) -> bool {
    match (outer.canonicalize(), inner.canonicalize()) {
        (Ok(outer), Ok(inner)) => inner.starts_with(outer),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, slug: &str, body: &str) {
        let json = format!(
            r#"{{"_id":"{slug}","title":"{slug}","slug":"{slug}","body":{},"_sys":{{"createdAt":"2024-01-01T00:00:00Z"}}}}"#,
            serde_json::to_string(body).unwrap()
        );
        fs::write(dir.join(format!("{slug}.json")), json).unwrap();
    }

    fn strict_config(fail_fast: bool) -> Config {
        let mut config = Config::new("Blog", "https://example.com");
        config.toc.strict = true;
        config.build.fail_fast = fail_fast;
        config
    }

    #[test]
    fn test_failed_article_is_counted() {
        let content = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(content.path(), "good", "<h2>A</h2><h3>B</h3>");
        write(content.path(), "bad", "<h2>A</h2><p>x</div>");

        let stats = Builder::new(strict_config(false), content.path(), output.path())
            .build()
            .unwrap();

        assert_eq!(stats.pages, 1);
        assert_eq!(stats.headings, 2);
        assert_eq!(stats.failed, 1);
        assert!(output.path().join("article/good/index.html").exists());
        assert!(!output.path().join("article/bad/index.html").exists());
    }

    #[test]
    fn test_fail_fast() {
        let content = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(content.path(), "bad", "<h2>A</h2><p>x</div>");

        let result = Builder::new(strict_config(true), content.path(), output.path()).build();
        assert!(matches!(result, Err(BuildError::Html(HtmlError::Annotate { .. }))));
    }

    #[test]
    fn test_clean_removes_stale_files() {
        let content = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(output.path().join("stale.html"), "old").unwrap();
        write(content.path(), "post", "<p>no headings</p>");

        let stats = Builder::new(Config::new("Blog", "https://example.com"), content.path(), output.path())
            .build()
            .unwrap();

        assert_eq!(stats.pages, 1);
        assert_eq!(stats.headings, 0);
        assert!(!output.path().join("stale.html").exists());
    }

    #[test]
    fn test_refuses_to_clean_over_content() {
        let root = tempfile::tempdir().unwrap();
        let content = root.path().join("content");
        fs::create_dir(&content).unwrap();
        write(&content, "post", "<h2>A</h2>");

        let result = Builder::new(Config::new("Blog", "https://example.com"), &content, root.path()).build();
        assert!(matches!(result, Err(BuildError::OutputContainsContent { .. })));
        assert!(content.join("post.json").exists());
    }
}
