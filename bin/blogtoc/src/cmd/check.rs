//! Check command - validate configuration and content

use std::path::Path;

use blogtoc_core::Config;
use blogtoc_generator::ArticleCollector;
use blogtoc_html::HeadingAnnotator;
use color_eyre::eyre::{Result, bail};

use super::resolve_dir;

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates the configuration and every article, including whether each body
/// parses cleanly as HTML.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            c
        }
        Err(e) => {
            println!("  ✗ Configuration invalid: {e}");
            bail!("Configuration error: {e}");
        }
    };

    let content_dir = resolve_dir(config_path, &config.build.content_dir);
    println!("\nChecking articles in {}...", content_dir.display());
    check_articles(&config, &content_dir, &mut result);

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

fn check_articles(config: &Config, content_dir: &Path, result: &mut ValidationResult) {
    let content = match ArticleCollector::new(content_dir).collect() {
        Ok(content) => content,
        Err(e) => {
            result.add_error(e.to_string());
            return;
        }
    };

    for path in &content.skipped {
        result.add_error(format!("{}: unreadable or duplicate article", path.display()));
    }

    if content.articles.is_empty() {
        result.add_warning("No articles found");
    }

    // Parse errors are only fatal for the build when `toc.strict` is set.
    let annotator = HeadingAnnotator::from_config(&config.toc).with_strict(true);
    let mut headings = 0;

    for article in &content.articles {
        match annotator.annotate_document(&article.body) {
            Ok(annotated) => headings += annotated.headings.len(),
            Err(e) if config.toc.strict => result.add_error(format!("{}: {e}", article.slug)),
            Err(e) => result.add_warning(format!("{}: {e}", article.slug)),
        }

        if article.body.trim().is_empty() {
            result.add_warning(format!("{}: empty body", article.slug));
        }
    }

    println!(
        "  ✓ {} article(s), {} heading(s)",
        content.articles.len(),
        headings
    );
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn setup(body: &str, strict: bool) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            format!(
                "[site]\ntitle = \"T\"\nbase_url = \"https://example.com\"\n\n[toc]\nstrict = {strict}\n"
            ),
        )
        .unwrap();
        fs::create_dir(dir.path().join("content")).unwrap();
        let json = format!(
            r#"{{"_id":"1","title":"T","slug":"post","body":"{body}","_sys":{{"createdAt":"2024-01-01T00:00:00Z"}}}}"#
        );
        fs::write(dir.path().join("content/post.json"), json).unwrap();
        dir
    }

    #[test]
    fn test_check_passes() {
        let dir = setup("<h2>A</h2>", false);
        run(&dir.path().join("config.toml"), true).unwrap();
    }

    #[test]
    fn test_parse_problem_is_warning() {
        let dir = setup("<h2>A</h2><p>x</div>", false);
        let config_path = dir.path().join("config.toml");

        run(&config_path, false).unwrap();
        assert!(run(&config_path, true).is_err());
    }

    #[test]
    fn test_parse_problem_is_error_when_toc_strict() {
        let dir = setup("<h2>A</h2><p>x</div>", true);
        assert!(run(&dir.path().join("config.toml"), false).is_err());
    }

    #[test]
    fn test_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&dir.path().join("config.toml"), false).is_err());
    }
}
