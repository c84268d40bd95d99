//! Wiki-flavored markdown rendering for article display.
//!
//! Renders untrusted markdown source into HTML that is safe to inject
//! directly into a page, resolving the `[[Target]]` / `[[Target|Alias]]`
//! wiki-link dialect into hyperlinks on in-application article routes.
//! Rendering runs as a fixed three-stage pipeline: parse, wiki-link
//! resolution, then HTML compilation with mandatory sanitization.

mod article;
mod error;
mod markdown;

pub use article::{ArticleLocator, ArticleResponse, render_article};
pub use error::RenderError;
pub use markdown::{
    ParseOptions, Sanitizer, WikiLinkResolver, WikiLinkResolverBuilder, WikiRenderer,
};
