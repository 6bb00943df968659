//! HTML generation for article pages.
//!
//! Annotates the article body, resolves page metadata and renders the
//! `article` template inside the `base` template.

use std::path::{Path, PathBuf};

use blogtoc_core::{AppMeta, Article, Config, TocEntry};
use blogtoc_html::{AnnotateError, HeadingAnnotator};
use blogtoc_ui::{ReturnTopButton, share_links};
use thiserror::Error;
use tracing::debug;

use crate::{
    page::PageMeta,
    template::{Template, TemplateContext, TemplateError, TemplateRegistry, escape},
};

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Body annotation error.
    #[error("cannot annotate `{slug}`: {source}")]
    Annotate {
        slug: String,
        #[source]
        source: AnnotateError,
    },
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// Older and newer neighbours of an article.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neighbors<'a> {
    pub prev: Option<&'a Article>,
    pub next: Option<&'a Article>,
}

/// A rendered article page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,
    pub meta: PageMeta,
    pub toc: Vec<TocEntry>,
}

/// Article page generator.
#[derive(Debug)]
pub struct HtmlGenerator {
    templates: TemplateRegistry,
    annotator: HeadingAnnotator,
    config: Config,
    app: AppMeta,
}

impl HtmlGenerator {
    /// Create a new HTML generator with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            templates: TemplateRegistry::new(),
            annotator: HeadingAnnotator::from_config(&config.toc),
            config,
            app: AppMeta::default(),
        }
    }

    /// Use app metadata for title fallbacks.
    #[must_use]
    pub fn with_app(mut self, app: AppMeta) -> Self {
        self.app = app;
        self
    }

    /// Register a custom template.
    pub fn register_template(&mut self, template: Template) {
        self.templates.register(template);
    }

    /// Generate the full HTML document for an article.
    pub fn generate_article(&self, article: &Article, neighbors: Neighbors<'_>) -> Result<RenderedPage> {
        debug!(slug = %article.slug, "generating article page");

        let (body, toc) = if self.config.toc.enabled {
            let annotated = self
                .annotator
                .annotate_document(&article.body)
                .map_err(|source| HtmlError::Annotate {
                    slug: article.slug.clone(),
                    source,
                })?;
            (annotated.html, annotated.headings)
        } else {
            (article.body.clone(), Vec::new())
        };

        let meta = PageMeta::from_article(article, &self.app, &self.config);
        let inner_ctx = self.build_article_context(article, &meta, &body, neighbors);
        let inner_html = self.templates.render("article", &inner_ctx)?;

        let return_top = ReturnTopButton::default();
        let base_ctx = TemplateContext::new()
            .with_var("lang", escape(&self.config.site.default_language))
            .with_var("title", escape(&meta.title))
            .with_var("description", escape(&meta.description))
            .with_var("og_image", escape(&meta.og_image))
            .with_var("canonical_url", escape(&meta.url))
            .with_var("site_title", escape(&self.config.site.title))
            .with_var("return_top_style", return_top.style().css())
            .with_var("content", inner_html);
        let html = self.templates.render("base", &base_ctx)?;

        Ok(RenderedPage { html, meta, toc })
    }

    /// Where an article page is written below `output_dir`.
    pub fn output_path(&self, article: &Article, output_dir: &Path) -> PathBuf {
        output_dir
            .join("article")
            .join(&article.slug)
            .join("index.html")
    }

    fn build_article_context(
        &self,
        article: &Article,
        meta: &PageMeta,
        body: &str,
        neighbors: Neighbors<'_>,
    ) -> TemplateContext {
        let mut ctx = TemplateContext::new()
            .with_var("title", escape(&article.title))
            .with_var("date_iso", &meta.publish_date_iso)
            .with_var("date_formatted", escape(&meta.publish_date))
            .with_var("share_html", share_html(&meta.url, &meta.title))
            .with_var("body", body)
            .with_var("author_html", author_html(article, meta));

        if let Some(cover) = &article.cover_image {
            ctx.insert(
                "cover_html",
                format!(
                    r#"<img src="{}" alt="{}">"#,
                    escape(&cover.src),
                    escape(cover.alt.as_deref().unwrap_or_default())
                ),
            );
        }

        if !article.tags.is_empty() {
            let tags_html: String = article
                .tags
                .iter()
                .map(|tag| {
                    format!(
                        r##"<li><a href="/tag/{}">#{}</a></li>"##,
                        escape(&tag.slug),
                        escape(&tag.name)
                    )
                })
                .collect();
            ctx.insert("tags_html", tags_html);
        }

        if let Some(prev) = neighbors.prev {
            ctx.insert(
                "prev_html",
                format!(
                    r#"<a class="links-previous" href="{}">&lsaquo; Previous</a>"#,
                    escape(&prev.url_path())
                ),
            );
        }

        if let Some(next) = neighbors.next {
            ctx.insert(
                "next_html",
                format!(
                    r#"<a class="links-next" href="{}">Next &rsaquo;</a>"#,
                    escape(&next.url_path())
                ),
            );
        }

        ctx
    }
}

fn share_html(url: &str, title: &str) -> String {
    share_links(url, title)
        .iter()
        .map(|link| {
            format!(
                r#"<li><a href="{}" target="{}" rel="noopener noreferrer">{}</a></li>"#,
                escape(&link.href),
                if link.target.window_name().is_empty() {
                    "_blank"
                } else {
                    link.target.window_name()
                },
                link.target.label()
            )
        })
        .collect()
}

fn author_html(article: &Article, meta: &PageMeta) -> String {
    let author = article.author.as_ref();

    let avatar = match author.and_then(|a| a.profile_image.as_ref()) {
        Some(image) => format!(
            r#"<img src="{}" alt="" width="48" height="48">"#,
            escape(&image.src)
        ),
        None => r#"<span class="author-placeholder" aria-hidden="true"></span>"#.to_string(),
    };

    let name = match author {
        Some(a) => format!(
            r#"<a class="author-name" href="/author/{}">{}</a>"#,
            escape(&a.slug),
            escape(&meta.author_name)
        ),
        None => format!(r#"<span class="author-name">{}</span>"#, escape(&meta.author_name)),
    };

    let biography = author
        .and_then(|a| a.biography.as_deref())
        .unwrap_or_default();

    format!(
        r#"<div class="author-avatar">{avatar}</div><div class="author-text">{name}<div class="author-description">{biography}</div></div>"#
    )
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn article(slug: &str, body: &str, created: &str) -> Article {
        let json = format!(
            r#"{{"_id":"{slug}","title":"Title {slug}","slug":"{slug}","body":{},
                "tags":[{{"_id":"t","name":"Rust","slug":"rust"}}],
                "author":{{"fullName":"Ann","slug":"ann","biography":"<p>Writes</p>"}},
                "_sys":{{"createdAt":"{created}"}}}}"#,
            serde_json::to_string(body).unwrap()
        );
        Article::from_json(Path::new("t.json"), &json).unwrap()
    }

    fn config() -> Config {
        Config::new("My Blog", "https://example.com")
    }

    #[test]
    fn test_generate_article_annotates_body() {
        let generator = HtmlGenerator::new(config());
        let a = article("hello", "<h2>Intro</h2><p>text</p><h3>Detail</h3>", "2024-01-01T00:00:00Z");

        let page = generator.generate_article(&a, Neighbors::default()).unwrap();

        assert!(page.html.starts_with("<!DOCTYPE html>"));
        assert!(page.html.contains(r#"<div class="post"><div class="toc"><ul>"#));
        assert!(page.html.contains(r#"<h2><span id="0">Intro</span></h2>"#));
        assert_eq!(page.toc.len(), 2);
        assert_eq!(page.toc[1].text, "Detail");
        assert!(page.html.contains(r#"<a href="/tag/rust">#Rust</a>"#));
        assert!(page.html.contains(r#"<a class="author-name" href="/author/ann">Ann</a>"#));
        assert!(page.html.contains("<p>Writes</p>"));
        assert!(page.html.contains("https://twitter.com/share?url=https%3A%2F%2Fexample.com%2Farticle%2Fhello"));
        assert!(page.html.contains("opacity: 0; transition: 0.5s; pointer-events: none;"));
        assert!(page.html.contains(r#"<header class="site-header">"#));
        assert!(!page.html.contains("data-popup"));
    }

    #[test]
    fn test_disabled_toc_keeps_body() {
        let mut config = config();
        config.toc.enabled = false;
        let generator = HtmlGenerator::new(config);
        let a = article("plain", "<h2>Intro</h2>", "2024-01-01T00:00:00Z");

        let page = generator.generate_article(&a, Neighbors::default()).unwrap();
        assert!(page.html.contains(r#"<div class="post"><h2>Intro</h2></div>"#));
        assert!(page.toc.is_empty());
    }

    #[test]
    fn test_strict_annotation_failure() {
        let mut config = config();
        config.toc.strict = true;
        let generator = HtmlGenerator::new(config);
        let a = article("broken", "<h2>Intro</h2></div>", "2024-01-01T00:00:00Z");

        let err = generator.generate_article(&a, Neighbors::default()).unwrap_err();
        assert!(matches!(err, HtmlError::Annotate { ref slug, .. } if slug == "broken"));
    }

    #[test]
    fn test_neighbor_links() {
        let generator = HtmlGenerator::new(config());
        let older = article("older", "", "2024-01-01T00:00:00Z");
        let current = article("current", "", "2024-01-02T00:00:00Z");
        let newer = article("newer", "", "2024-01-03T00:00:00Z");

        let page = generator
            .generate_article(
                &current,
                Neighbors {
                    prev: Some(&older),
                    next: Some(&newer),
                },
            )
            .unwrap();

        assert!(page.html.contains(r#"href="/article/older""#));
        assert!(page.html.contains(r#"href="/article/newer""#));
    }

    #[test]
    fn test_title_is_escaped() {
        let generator = HtmlGenerator::new(config());
        let mut a = article("esc", "", "2024-01-01T00:00:00Z");
        a.title = "<script>".to_string();

        let page = generator.generate_article(&a, Neighbors::default()).unwrap();
        assert!(page.html.contains("<title>&lt;script&gt;</title>"));
        assert!(!page.html.contains("<title><script>"));
    }

    #[test]
    fn test_output_path() {
        let generator = HtmlGenerator::new(config());
        let a = article("hello", "", "2024-01-01T00:00:00Z");
        assert_eq!(
            generator.output_path(&a, Path::new("public")),
            Path::new("public/article/hello/index.html")
        );
    }
}
