//! Blogtoc Generator Library
//!
//! Article page generation for blogtoc.
//!
//! # Modules
//!
//! - [`template`] - HTML template system with variable interpolation
//! - [`page`] - Per-article metadata with fallbacks
//! - [`html`] - Article page rendering with heading annotation
//! - [`collector`] - Article collection and ordering
//! - [`build`] - Build orchestration

pub mod build;
pub mod collector;
pub mod html;
pub mod page;
pub mod template;

pub use build::{BuildError, BuildStats, Builder};
pub use collector::{ArticleCollector, CollectorError, SiteContent};
pub use html::{HtmlError, HtmlGenerator, Neighbors, RenderedPage};
pub use page::PageMeta;
pub use template::{Template, TemplateContext, TemplateRegistry};
