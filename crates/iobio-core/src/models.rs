//! Records produced by extraction and persisted in the content store.
//!
//! Field names serialize in camelCase to match the content schema the site
//! reads (`firstName`, `imageSource`, `startYear`, …).

use serde::{Deserialize, Serialize};

/// Embedded portrait taken from the document's first attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(rename = "type")]
    pub kind: String,
    pub mime_type: String,
    /// Base64 payload.
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl From<crate::document::Attachment> for Image {
    fn from(a: crate::document::Attachment) -> Self {
        Self {
            kind: a.kind,
            mime_type: a.mime_type,
            data: a.data,
            name: a.name,
            extension: a.extension,
        }
    }
}

/// Structured biography for one person.
///
/// `first_name`, `last_name`, `summary` and `life` are always present and
/// degrade to empty strings; every other field is best effort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiographyRecord {
    /// File stem of the source document.
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_as: Option<String>,
    pub summary: String,
    pub life: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    pub image_source: String,
    pub archives: String,
    pub publications: String,
    pub literature: String,
    pub version: String,
    pub authors: String,
    pub organisation: String,
    pub role: String,
    pub nationality: String,
    pub country: String,
    pub start_year: String,
    pub end_year: String,
    /// Whole document rendered to HTML, claimed nodes included.
    pub html: String,
    /// Explicit identifier; overrides the path-derived slug when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl BiographyRecord {
    /// Start year as a number, when it parses.
    pub fn start_year_num(&self) -> Option<i32> {
        self.start_year.parse().ok()
    }

    pub fn end_year_num(&self) -> Option<i32> {
        self.end_year.parse().ok()
    }
}

/// Metadata attached to a render result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_paths: Vec<String>,
}

/// Output of the render step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedContent {
    pub html: String,
    #[serde(default)]
    pub metadata: RenderMetadata,
}

/// The persisted unit in the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEntry {
    pub id: String,
    /// Hex SHA-256 of the source bytes.
    pub digest: String,
    /// Source path relative to the project root, forward slashes.
    pub file_path: String,
    pub data: BiographyRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered: Option<RenderedContent>,
    #[serde(default)]
    pub deferred_render: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asset_imports: Vec<String>,
}
