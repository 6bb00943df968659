//! Annotate command - adds heading anchors and a table of contents to one fragment

use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
};

use blogtoc_core::TocConfig;
use blogtoc_html::HeadingAnnotator;
use color_eyre::eyre::{Result, WrapErr};

use super::load_config;

/// Run the annotate command.
///
/// Reads `file` (or stdin) and writes the annotated fragment to stdout. The
/// `[toc]` settings apply when the configuration file exists.
pub fn run(config_path: &Path, file: Option<&Path>) -> Result<()> {
    let toc = if config_path.exists() {
        load_config(config_path)?.toc
    } else {
        tracing::debug!(?config_path, "No configuration file, using default annotator");
        TocConfig::default()
    };

    let input = match file {
        Some(path) => fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .wrap_err("Failed to read stdin")?;
            buf
        }
    };

    let output = annotate_input(&toc, &input)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn annotate_input(toc: &TocConfig, input: &str) -> Result<String> {
    let annotated = HeadingAnnotator::from_config(toc)
        .annotate_document(input)
        .wrap_err("Failed to annotate input")?;

    tracing::info!(headings = annotated.headings.len(), "Annotated input");
    Ok(annotated.html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_input_uses_toc_config() {
        let toc = TocConfig {
            anchor_prefix: "s-".to_string(),
            ..TocConfig::default()
        };

        let output = annotate_input(&toc, "<h2>One</h2>").unwrap();
        assert!(output.contains(r##"<a href="#s-0">One</a>"##));
        assert!(output.contains(r#"<span id="s-0">One</span>"#));
    }

    #[test]
    fn test_annotate_input_strict_error() {
        let toc = TocConfig {
            strict: true,
            ..TocConfig::default()
        };
        assert!(annotate_input(&toc, "<h2>A</h2><p>x</div>").is_err());
    }

    #[test]
    fn test_run_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(&dir.path().join("config.toml"), Some(&dir.path().join("nope.html")));
        assert!(result.is_err());
    }
}
