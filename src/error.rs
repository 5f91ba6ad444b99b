//! Error types for rs-pagesift.
//!
//! Most failures inside the engine degrade to partial results; only the
//! variants below ever reach the caller or the per-node failure log.

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured CSS selector (or excluded tag) could not be parsed.
    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    /// A single node could not be processed by the pruner.
    #[error("Node processing failed: {0}")]
    NodeFailure(String),

    /// The working tree could not be serialized back to markup.
    #[error("Serialization failed: {0}")]
    Serialize(String),

    /// The markdown renderer failed, including its single retry.
    #[error("Markdown rendering failed: {0}")]
    Render(String),

    /// Metadata extraction failed.
    #[error("Metadata extraction failed: {0}")]
    Metadata(String),

    /// The offloaded extraction task did not complete.
    #[cfg(feature = "tokio")]
    #[error("Extraction task failed: {0}")]
    Join(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
