//! Export renderings of a graph.
//!
//! Every format carries the same pretty-printed JSON of `{nodes, edges}`:
//! `.json` and `.txt` as-is, `.pdf` as a plain text dump.

#[cfg(feature = "pdf")]
pub mod pdf;

use serde::{Deserialize, Serialize};
use crate::types::Graph;

/// Error type for export operations.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The graph could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    /// This build cannot produce the format.
    #[error("{0} export not available")]
    FormatUnavailable(ExportFormat),
    /// The format name is not recognized.
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
}

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Pretty-printed JSON.
    Json,
    /// The same JSON with a `.txt` extension.
    Text,
    /// A PDF holding the JSON as text.
    Pdf,
}

impl ExportFormat {
    /// Every format, in menu order.
    pub const ALL: [ExportFormat; 3] = [Self::Json, Self::Text, Self::Pdf];

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
            Self::Pdf => "pdf",
        }
    }

    /// MIME type of the rendered bytes.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain",
            Self::Pdf => "application/pdf",
        }
    }

    /// Download file name.
    pub fn file_name(&self) -> String {
        format!("mindmap.{}", self.extension())
    }

    /// True if this build can render the format.
    pub fn is_available(&self) -> bool {
        match self {
            Self::Json | Self::Text => true,
            Self::Pdf => cfg!(feature = "pdf"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "txt" | "text" => Ok(Self::Text),
            "pdf" => Ok(Self::Pdf),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Text => write!(f, "TXT"),
            Self::Pdf => write!(f, "PDF"),
        }
    }
}

/// A rendered export, ready to hand to a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// Suggested file name.
    pub file_name: String,
    /// MIME type.
    pub mime_type: &'static str,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Pretty-printed JSON of a graph.
pub fn to_pretty_json(graph: &Graph) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(graph)?)
}

/// Render a graph in `format`.
pub fn render(graph: &Graph, format: ExportFormat) -> Result<ExportedFile, ExportError> {
    let content = to_pretty_json(graph)?;
    let bytes = match format {
        ExportFormat::Json | ExportFormat::Text => content.into_bytes(),
        ExportFormat::Pdf => render_pdf(&content)?,
    };

    Ok(ExportedFile {
        file_name: format.file_name(),
        mime_type: format.mime_type(),
        bytes,
    })
}

#[cfg(feature = "pdf")]
fn render_pdf(content: &str) -> Result<Vec<u8>, ExportError> {
    Ok(pdf::render_text(content, chrono::Utc::now()))
}

#[cfg(not(feature = "pdf"))]
fn render_pdf(_content: &str) -> Result<Vec<u8>, ExportError> {
    Err(ExportError::FormatUnavailable(ExportFormat::Pdf))
}
