//! HTML template system for page generation.
//!
//! Plain `{{ variable }}` interpolation; values are inserted verbatim, so
//! callers escape text with [`escape`] and pass trusted HTML as-is.

use std::collections::HashMap;

use thiserror::Error;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Template not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Template context with variables for interpolation.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Create context with initial variables.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A template supporting `{{ name }}` and optional `{{ name? }}` placeholders.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Get the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the template with the given context.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut result = self.content.clone();
        let mut pos = 0;

        while let Some(start) = result[pos..].find("{{") {
            let start = pos + start;
            let end = result[start..]
                .find("}}")
                .ok_or_else(|| TemplateError::InvalidSyntax("unclosed {{ delimiter".to_string()))?;
            let end = start + end + 2;

            let var_name = result[start + 2..end - 2].trim();

            let (var_name, optional) = match var_name.strip_suffix('?') {
                Some(stripped) => (stripped, true),
                None => (var_name, false),
            };

            let value = match context.get(var_name) {
                Some(v) => v.to_string(),
                None if optional => String::new(),
                None => return Err(TemplateError::MissingVariable(var_name.to_string())),
            };

            // Inserted values are never rescanned.
            result.replace_range(start..end, &value);
            pos = start + value.len();
        }

        Ok(result)
    }
}

/// Registry of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a new registry with default templates.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register(Template::new("base", DEFAULT_BASE_TEMPLATE));
        registry.register(Template::new("article", DEFAULT_ARTICLE_TEMPLATE));
        registry
    }

    /// Register a template, replacing any template with the same name.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        template.render(context)
    }
}

/// Escape text for element content and double-quoted attribute values.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Default base HTML template.
pub const DEFAULT_BASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{ lang }}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <meta name="description" content="{{ description }}">
    <meta property="og:type" content="article">
    <meta property="og:title" content="{{ title }}">
    <meta property="og:description" content="{{ description }}">
    <meta property="og:image" content="{{ og_image }}">
    <meta name="twitter:card" content="summary_large_image">
    <link rel="canonical" href="{{ canonical_url }}">
    <link rel="icon" href="/favicon.ico">
</head>
<body>
    <header class="site-header">
        <a href="/">{{ site_title }}</a>
    </header>
    {{ content }}
    <button type="button" class="return-top" style="{{ return_top_style }}" aria-label="Return to top">
        <span>&#9650;</span>
    </button>
</body>
</html>"#;

/// Default article template.
pub const DEFAULT_ARTICLE_TEMPLATE: &str = r#"<main class="container">
<article class="article">
    <div class="article-cover">{{ cover_html? }}</div>
    <div class="article-header">
        <h1 class="article-title">{{ title }}</h1>
        <ul class="article-tags">{{ tags_html? }}</ul>
        <div class="article-row">
            <time datetime="{{ date_iso }}" class="article-date">{{ date_formatted }}</time>
            <div class="article-share">
                <ul class="share-list">{{ share_html }}</ul>
            </div>
        </div>
    </div>
    <div class="post">{{ body }}</div>
    <div class="sns-share">
        <ul class="share-list">{{ share_html }}</ul>
    </div>
    <aside class="author">{{ author_html }}</aside>
    <nav class="links">{{ prev_html? }}{{ next_html? }}</nav>
</article>
</main>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_simple_render() {
        let template = Template::new("test", "Hello, {{ name }}!");
        let mut ctx = TemplateContext::new();
        ctx.insert("name", "World");

        let result = template.render(&ctx).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_template_optional_variable() {
        let template = Template::new("test", "Hello{{ suffix? }}!");
        let ctx = TemplateContext::new();

        let result = template.render(&ctx).unwrap();
        assert_eq!(result, "Hello!");

        let ctx = TemplateContext::new().with_var("suffix", ", World");
        let result = template.render(&ctx).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_template_missing_required_variable() {
        let template = Template::new("test", "Hello, {{ name }}!");
        let result = template.render(&TemplateContext::new());
        assert!(matches!(result, Err(TemplateError::MissingVariable(_))));
    }

    #[test]
    fn test_template_unclosed_delimiter() {
        let template = Template::new("test", "Hello, {{ name");
        let ctx = TemplateContext::new().with_var("name", "x");
        assert!(matches!(
            template.render(&ctx),
            Err(TemplateError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn test_inserted_values_not_expanded() {
        let template = Template::new("test", "<div>{{ body }}</div>");
        let ctx = TemplateContext::new().with_var("body", "{{ body }}");
        assert_eq!(template.render(&ctx).unwrap(), "<div>{{ body }}</div>");
    }

    #[test]
    fn test_registry_defaults() {
        let registry = TemplateRegistry::new();

        assert!(registry.get("base").is_some());
        assert!(registry.get("article").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert!(matches!(
            registry.render("nonexistent", &TemplateContext::new()),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn test_article_template_has_post_container() {
        assert!(DEFAULT_ARTICLE_TEMPLATE.contains(r#"<div class="post">{{ body }}</div>"#));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }
}
