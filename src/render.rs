//! Boundary to the render collaborator.
//!
//! This crate does no pixel or vector drawing. The renderer is an external
//! component that turns finalized positions into output and reports back the
//! measured extents the post-render validator rules (R5-R7) and the
//! post-render fixer need. The call is synchronous from this crate's point
//! of view regardless of how the collaborator schedules its own work.

use crate::geom::Rect;
use crate::Diagram;

/// One rendered text run and its measured bounding box in mm.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEntry {
    pub text: String,
    pub bbox: Rect,
}

impl TextEntry {
    pub fn new(text: impl Into<String>, bbox: Rect) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}

/// Measured extents returned by one render cycle.
#[derive(Debug, Clone, Default)]
pub struct RenderExtents {
    /// Every rendered text run (titles, subtitles, content lines, labels).
    pub text_entries: Vec<TextEntry>,
    /// Per arrow id, the rendered path flattened to a polyline in mm.
    pub arrow_polylines: Vec<(String, Vec<(f64, f64)>)>,
}

impl RenderExtents {
    /// The polyline rendered for an arrow, if the renderer produced one.
    pub fn polyline(&self, arrow_id: &str) -> Option<&[(f64, f64)]> {
        self.arrow_polylines
            .iter()
            .find(|(id, _)| id == arrow_id)
            .map(|(_, pts)| pts.as_slice())
    }
}

/// The render collaborator: draw the diagram's current positions and return
/// measured extents.
pub trait Renderer {
    fn render(&mut self, diagram: &Diagram) -> RenderExtents;
}
