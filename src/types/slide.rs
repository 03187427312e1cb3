//! Presentation slides derived from a mind map.

use serde::{Deserialize, Serialize};

/// What a slide presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    /// The opening slide built from the root.
    Title,
    /// One slide per level-1 node.
    Topic,
}

impl std::fmt::Display for SlideKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Topic => write!(f, "topic"),
        }
    }
}

/// A presentation-only projection of a root or level-1 node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Slide kind.
    #[serde(rename = "type")]
    pub kind: SlideKind,
    /// Heading, the node label.
    pub title: String,
    /// Body text, the node description.
    pub description: String,
    /// Bullet labels of direct children. Absent on title slides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
}

impl Slide {
    /// Create a title slide.
    pub fn title(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: SlideKind::Title,
            title: title.into(),
            description: description.into(),
            children: None,
        }
    }

    /// Create a topic slide.
    pub fn topic(
        title: impl Into<String>,
        description: impl Into<String>,
        children: Vec<String>,
    ) -> Self {
        Self {
            kind: SlideKind::Topic,
            title: title.into(),
            description: description.into(),
            children: Some(children),
        }
    }

    /// Bullet labels, empty for title slides.
    pub fn bullets(&self) -> &[String] {
        self.children.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_slide_has_no_children_key() {
        let value = serde_json::to_value(Slide::title("Idea", "")).unwrap();
        assert_eq!(value["type"], "title");
        assert!(value.get("children").is_none());
    }

    #[test]
    fn test_topic_slide_keeps_empty_children() {
        let slide = Slide::topic("Risks", "", Vec::new());
        let value = serde_json::to_value(&slide).unwrap();
        assert_eq!(value["type"], "topic");
        assert_eq!(value["children"], serde_json::json!([]));
        assert!(slide.bullets().is_empty());
    }
}
