//! Markdown rendering pipeline with wiki-link resolution.
//!
//! This module provides the three-stage pipeline that turns raw article
//! markdown into sanitized HTML: comrak parsing with configurable GFM
//! extensions, wiki-link resolution for the `[[...]]` dialect, and HTML
//! compilation gated behind an ammonia allow-list sanitizer.

mod parser;
mod renderer;
mod sanitize;
mod wikilink;

pub use parser::ParseOptions;
pub use renderer::WikiRenderer;
pub use sanitize::Sanitizer;
pub use wikilink::{WikiLinkResolver, WikiLinkResolverBuilder};
