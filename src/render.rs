//! Render step for stored entries.
//!
//! The synchronizer hands every freshly extracted entry to a [`Renderer`].
//! A failure is logged and the entry is stored without rendered content.

use iobio_core::models::{BiographyRecord, RenderMetadata, RenderedContent};

/// HTML stored when a document has no narrative body.
pub const EMPTY_BODY_PLACEHOLDER: &str = "<p>No content found for this DOCX file.</p>";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to render {id}: {message}")]
    Failed { id: String, message: String },
}

/// What a renderer sees for one entry.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub id: &'a str,
    /// Source path relative to the project root.
    pub file_path: &'a str,
    pub body: &'a str,
    pub record: &'a BiographyRecord,
}

pub trait Renderer: Send + Sync {
    fn render(&self, input: &RenderInput<'_>) -> Result<RenderedContent, RenderError>;

    /// Entries rendered by a deferred renderer are marked `deferredRender`
    /// and their source paths are registered as module imports.
    fn deferred(&self) -> bool {
        false
    }
}

/// Passes the body HTML through unchanged, substituting a placeholder for
/// an empty body.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyRenderer;

impl Renderer for BodyRenderer {
    fn render(&self, input: &RenderInput<'_>) -> Result<RenderedContent, RenderError> {
        let html = if input.body.trim().is_empty() {
            EMPTY_BODY_PLACEHOLDER.to_string()
        } else {
            input.body.to_string()
        };
        Ok(RenderedContent {
            html,
            metadata: RenderMetadata::default(),
        })
    }
}
