//! Error types for article rendering.

use thiserror::Error;

/// Failures surfaced to the caller of the rendering pipeline.
///
/// Malformed markdown or wiki-link syntax is never an error: it degrades
/// to literal text inside the pipeline. The only failure modes are invalid
/// renderer configuration, caught before any document is processed, and an
/// upstream fetch failure, propagated with its original status and body.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Renderer construction rejected its configuration.
    #[error("invalid renderer configuration: {0}")]
    Configuration(String),

    /// The article fetch collaborator returned a non-success status.
    ///
    /// Carries the response status code and body text verbatim so the page
    /// layer can present them. Never retried here.
    #[error("article fetch failed with status {status}: {message}")]
    Fetch { status: u16, message: String },
}
