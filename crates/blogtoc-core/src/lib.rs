//! blogtoc Core Library
//!
//! Core types, configuration, and error handling shared by the blogtoc crates.

pub mod article;
pub mod config;
pub mod error;
pub mod toc;

pub use article::{AppMeta, Article, ArticleMeta, Author, Image, SystemInfo, Tag};
pub use config::{BuildConfig, Config, SiteConfig, TocConfig};
pub use error::{CoreError, Result};
pub use toc::TocEntry;
