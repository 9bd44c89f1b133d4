//! Layout engine seam.

use dg_model::{DiagramGraph, OutputFormat};

/// What a layout call needs besides the graph itself.
#[derive(Clone, Copy, Debug)]
pub struct LayoutRequest<'a> {
    pub format: OutputFormat,
    /// Section id allocated for this diagram, used for unique anchors.
    pub section_id: u64,
    /// Path from the current page to the output root.
    pub rel_path: &'a str,
    /// Caption or tooltip of the diagram.
    pub title: &'a str,
}

/// Turns a [`DiagramGraph`] into a fragment for the requested format.
///
/// Layout never fails from the caller's point of view: engines that can
/// fail degrade to a simpler rendering and log the problem.
pub trait GraphLayout: Send + Sync {
    fn render(&self, graph: &DiagramGraph, request: &LayoutRequest<'_>) -> String;
}

/// Anchor used for the collapsible section holding a diagram.
#[must_use]
pub fn dynsection_id(section_id: u64) -> String {
    format!("dynsection-{section_id}")
}
