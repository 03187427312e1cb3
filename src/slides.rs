//! Slide derivation for presentation mode.
//!
//! A deck is one title slide for the presentation root followed by one topic
//! slide per level-1 node. Level-2 nodes appear only as bullets on their
//! parent's slide, and anything deeper is not shown at all.

use serde::{Deserialize, Serialize};
use crate::types::{Graph, Slide};

/// Derive the slide sequence for a graph.
///
/// The presentation root is the first level-0 node in iteration order; a
/// graph without one yields no slides. Topic slides follow node order and
/// list child labels in edge order.
pub fn derive_slides(graph: &Graph) -> Vec<Slide> {
    let Some(root) = graph.nodes.iter().find(|n| n.level == 0) else {
        return Vec::new();
    };

    let mut slides = vec![Slide::title(&root.label, &root.description)];

    for topic in graph.nodes.iter().filter(|n| n.level == 1) {
        let children = graph
            .children_of(&topic.id)
            .map(|c| c.label.clone())
            .collect();
        slides.push(Slide::topic(&topic.label, &topic.description, children));
    }

    slides
}

/// A slide sequence with a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDeck {
    slides: Vec<Slide>,
    current: usize,
}

impl SlideDeck {
    /// Build a deck from a graph, positioned on the first slide.
    pub fn from_graph(graph: &Graph) -> Self {
        Self::new(derive_slides(graph))
    }

    /// Wrap an existing slide sequence.
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides, current: 0 }
    }

    /// All slides.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// The slide under the cursor, `None` for an empty deck.
    pub fn current(&self) -> Option<&Slide> {
        self.slides.get(self.current)
    }

    /// Zero-based cursor index.
    pub fn index(&self) -> usize {
        self.current
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// True if there are no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Advance, stopping at the last slide.
    pub fn next(&mut self) -> Option<&Slide> {
        if self.current + 1 < self.slides.len() {
            self.current += 1;
        }
        self.current()
    }

    /// Go back, stopping at the first slide.
    pub fn prev(&mut self) -> Option<&Slide> {
        self.current = self.current.saturating_sub(1);
        self.current()
    }

    /// Jump to `index`, clamped into the deck.
    pub fn go_to(&mut self, index: usize) -> Option<&Slide> {
        self.current = index.min(self.slides.len().saturating_sub(1));
        self.current()
    }

    /// One-based `(position, total)` as shown in "Slide 2 of 5".
    pub fn position(&self) -> (usize, usize) {
        if self.slides.is_empty() {
            (0, 0)
        } else {
            (self.current + 1, self.slides.len())
        }
    }

    /// Fraction of the deck shown so far, in `(0, 1]`; 0 for an empty deck.
    pub fn progress(&self) -> f64 {
        let (shown, total) = self.position();
        if total == 0 {
            0.0
        } else {
            shown as f64 / total as f64
        }
    }
}
