//! Build command - renders every article page

use std::{path::Path, time::Instant};

use blogtoc_generator::Builder;
use color_eyre::eyre::{Result, WrapErr};

use super::{load_config, resolve_dir};

/// Run the build command.
///
/// `output` and `content` override the directories from `[build]`.
pub fn run(config_path: &Path, output: Option<&Path>, content: Option<&Path>) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, ?content, "Starting build");

    let mut config = load_config(config_path)?;

    let output_dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => resolve_dir(config_path, &config.build.output_dir),
    };
    let content_dir = match content {
        Some(dir) => dir.to_path_buf(),
        None => resolve_dir(config_path, &config.build.content_dir),
    };
    config.build.output_dir = output_dir.to_string_lossy().to_string();

    tracing::debug!(?config, "Loaded configuration");

    let stats = Builder::new(config, &content_dir, &output_dir)
        .build()
        .wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Build completed!");
    println!();
    println!("  Pages:    {}", stats.pages);
    println!("  Headings: {}", stats.headings);
    println!("  Failed:   {}", stats.failed);
    println!();
    println!("  Duration: {:.2}s", duration.as_secs_f64());
    println!("  Output:   {}", output_dir.display());
    println!();

    if stats.failed > 0 {
        tracing::warn!(failed = stats.failed, "Some articles were not rendered");
    }
    tracing::info!(?stats, ?duration, "Build finished");

    Ok(())
}
