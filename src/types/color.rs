//! Hex colors for nodes and edge strokes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Color given to children of an uncolored parent, and the suggested
/// choice when a color prompt opens.
pub const DEFAULT_COLOR: &str = "#4f46e5";

/// Stroke used by a connect gesture whose source node has no color.
pub const FALLBACK_EDGE_COLOR: &str = "#9ca3af";

/// A validated hex color (`#rgb`, `#rrggbb` or `#rrggbbaa`).
///
/// The original spelling is preserved so imported documents round-trip
/// byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

/// Error returned when a string is not a hex color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid hex color: {0:?}")]
pub struct InvalidColor(pub String);

impl Color {
    /// Parse a hex color.
    pub fn parse(s: &str) -> Result<Self, InvalidColor> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| InvalidColor(s.to_string()))?;

        let valid_len = matches!(digits.len(), 3 | 6 | 8);
        if valid_len && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidColor(s.to_string()))
        }
    }

    /// The default branch color.
    pub fn default_branch() -> Self {
        Self(DEFAULT_COLOR.to_string())
    }

    /// The stroke used when a connection has no colored source.
    pub fn fallback_edge() -> Self {
        Self(FALLBACK_EDGE_COLOR.to_string())
    }

    /// Get the color as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Color {
    type Error = InvalidColor;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl std::str::FromStr for Color {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_hex_forms() {
        assert!(Color::parse("#abc").is_ok());
        assert!(Color::parse("#4F46E5").is_ok());
        assert!(Color::parse("#4f46e580").is_ok());
    }

    #[test]
    fn test_rejects_non_hex() {
        assert!(Color::parse("4f46e5").is_err());
        assert!(Color::parse("#4f46e").is_err());
        assert!(Color::parse("#ggg").is_err());
        assert!(Color::parse("red").is_err());
        assert!(Color::parse("").is_err());
    }

    #[test]
    fn test_serde_validates() {
        let ok: Result<Color, _> = serde_json::from_str("\"#4f46e5\"");
        assert_eq!(ok.unwrap().as_str(), "#4f46e5");

        let bad: Result<Color, _> = serde_json::from_str("\"blue\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_constants_are_valid() {
        assert!(Color::parse(DEFAULT_COLOR).is_ok());
        assert!(Color::parse(FALLBACK_EDGE_COLOR).is_ok());
    }
}
