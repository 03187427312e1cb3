//! Parsing of imported mind map documents.

use crate::types::{Graph, GraphError};

/// Error type for import operations.
///
/// Every variant means the store was left unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Only `.json` files are accepted.
    #[error("Unsupported file: {0} (expected a .json mindmap)")]
    UnsupportedFile(String),
    /// The payload is not a JSON mind map.
    #[error("Failed to read mindmap: {0}")]
    Parse(#[from] serde_json::Error),
    /// The payload parsed but breaks a structural rule.
    #[error("Invalid mindmap: {0}")]
    Invalid(#[from] GraphError),
    /// The share link holds no file token.
    #[error("Invalid share link: {0}")]
    InvalidLink(String),
    /// The remote fetch failed.
    #[error("Failed to fetch mindmap: {0}")]
    Fetch(String),
}

/// True if a picked file name looks like an exported mind map.
pub fn accepts_file_name(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Parse a JSON document into a graph.
///
/// Only syntax and shape are checked here; structural validation happens
/// when the graph is imported.
pub fn parse_graph(json: &str) -> Result<Graph, ImportError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse the contents of a picked file.
pub fn parse_file(name: &str, contents: &str) -> Result<Graph, ImportError> {
    if !accepts_file_name(name) {
        return Err(ImportError::UnsupportedFile(name.to_string()));
    }
    parse_graph(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_json_only() {
        assert!(accepts_file_name("mindmap.json"));
        assert!(accepts_file_name("Plans.JSON"));
        assert!(!accepts_file_name("mindmap.txt"));
        assert!(!accepts_file_name("json"));
    }

    #[test]
    fn test_parse_minimal_document() {
        let graph = parse_graph(
            r##"{
                "nodes": [
                    {"id": "1", "position": {"x": 0, "y": 0}, "data": {"label": "Root", "level": 0}}
                ],
                "edges": []
            }"##,
        )
        .unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].label, "Root");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_graph("not json"), Err(ImportError::Parse(_))));
        assert!(matches!(
            parse_graph(r#"{"nodes": [{"id": "1"}]}"#),
            Err(ImportError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_file_checks_extension() {
        assert!(matches!(
            parse_file("mindmap.pdf", "{}"),
            Err(ImportError::UnsupportedFile(_))
        ));
        assert!(parse_file("mindmap.json", r#"{"nodes": [], "edges": []}"#).is_ok());
    }
}
