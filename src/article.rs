//! Fetch boundary between the article source and the rendering pipeline.
//!
//! The HTTP client itself lives in the surrounding application; this module
//! only models its interface: how an article is addressed, what its reply
//! looks like, and the rule that a failed fetch surfaces as a page-level
//! error without ever invoking the pipeline.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::error::RenderError;
use crate::markdown::WikiRenderer;

/// Characters escaped inside a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Characters escaped inside a query value.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'#')
    .add(b'&')
    .add(b'=')
    .add(b'%')
    .add(b'+');

/// How the fetch collaborator addresses an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleLocator {
    /// Path-segment slug, as in `/api/article/{slug}`.
    Slug(String),
    /// Query-parameter title, as in `/api/article?title={title}`.
    Title(String),
}

impl ArticleLocator {
    /// Builds the request path the fetch collaborator should use.
    pub fn request_path(&self) -> String {
        match self {
            Self::Slug(slug) => {
                format!("/api/article/{}", utf8_percent_encode(slug, PATH_SEGMENT))
            }
            Self::Title(title) => {
                format!(
                    "/api/article?title={}",
                    utf8_percent_encode(title, QUERY_VALUE)
                )
            }
        }
    }
}

/// Reply from the article fetch collaborator.
#[derive(Debug, Clone)]
pub struct ArticleResponse {
    /// HTTP status code of the fetch.
    pub status: u16,
    /// Response body: article markdown on success, error text otherwise.
    pub body: String,
}

impl ArticleResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Renders a fetched article response, or propagates its fetch failure.
///
/// A non-success status becomes [`RenderError::Fetch`] carrying the
/// original status and body text; the rendering pipeline is never invoked
/// in that case.
///
/// # Arguments
///
/// * `response`: Reply from the fetch collaborator
/// * `renderer`: Configured rendering pipeline
///
/// # Returns
///
/// Sanitized article HTML
///
/// # Errors
///
/// Returns [`RenderError::Fetch`] when the response status is not a
/// success.
pub fn render_article(
    response: &ArticleResponse,
    renderer: &WikiRenderer,
) -> Result<String, RenderError> {
    if !response.is_success() {
        return Err(RenderError::Fetch {
            status: response.status,
            message: response.body.clone(),
        });
    }

    Ok(renderer.render(&response.body))
}
