//! blogtoc CLI
//!
//! Builds article pages from exported blog content and annotates headings
//! with a table of contents.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for blogtoc.
#[derive(Parser)]
#[command(
    name = "blogtoc",
    version,
    about = "Article pages with an annotated table of contents"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build every article page
    Build {
        /// Output directory (defaults to build.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Content directory (defaults to build.content_dir)
        #[arg(long)]
        content: Option<PathBuf>,
    },
    /// Annotate one HTML fragment and print the result
    Annotate {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,
    },
    /// Validate configuration and content
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    blogtoc::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { output, content } => {
            blogtoc::cmd::build::run(&cli.config, output.as_deref(), content.as_deref())?;
        }
        Commands::Annotate { file } => {
            blogtoc::cmd::annotate::run(&cli.config, file.as_deref())?;
        }
        Commands::Check { strict } => {
            blogtoc::cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let args = ["blogtoc", "build", "--output", "dist"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, PathBuf::from("config.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Build { output, content } => {
                assert_eq!(output, Some(PathBuf::from("dist")));
                assert!(content.is_none());
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_with_content_dir() {
        let args = ["blogtoc", "build", "--content", "export"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Build { output, content } => {
                assert!(output.is_none());
                assert_eq!(content, Some(PathBuf::from("export")));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_annotate_file_and_stdin() {
        let cli = Cli::parse_from(["blogtoc", "annotate", "post.html"]);
        match cli.command {
            Commands::Annotate { file } => assert_eq!(file, Some(PathBuf::from("post.html"))),
            _ => panic!("Expected Annotate command"),
        }

        let cli = Cli::parse_from(["blogtoc", "annotate"]);
        match cli.command {
            Commands::Annotate { file } => assert!(file.is_none()),
            _ => panic!("Expected Annotate command"),
        }
    }

    #[test]
    fn test_cli_check_strict() {
        let cli = Cli::parse_from(["blogtoc", "check", "--strict"]);
        match cli.command {
            Commands::Check { strict } => assert!(strict),
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbose_and_config() {
        let cli = Cli::parse_from(["blogtoc", "-vv", "-c", "site.toml", "check"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["blogtoc"]).is_err());
    }
}
