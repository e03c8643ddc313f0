//! Schematic - a layout engine for box-and-arrow diagrams
//!
//! This library positions, validates and auto-repairs diagram layouts on a
//! mm-based 2D canvas. It does no drawing itself; a render collaborator
//! turns finalized positions into output and reports measured extents back
//! for the post-render validation rules.
//!
//! # Example
//!
//! ```rust
//! use schematic::{ArrowSpec, BoxSpec, Diagram, LayoutOptions};
//!
//! let mut diagram = Diagram::new(Some("Pipeline"), 170.0, Some(120.0));
//! diagram.add_box(BoxSpec::new("load", "Load"))?;
//! diagram.add_box(BoxSpec::new("train", "Train"))?;
//! diagram.add_arrow(ArrowSpec::new("load", "train"))?;
//! diagram.auto_layout(&LayoutOptions::default());
//! diagram.auto_fix(schematic::DEFAULT_FIX_PASSES);
//! diagram.validate_all(None)?;
//! # Ok::<(), schematic::DiagramError>(())
//! ```

pub mod autofix;
pub mod error;
pub mod geom;
pub mod layout;
pub mod render;
pub mod spec;
pub mod state;
pub mod style;
pub mod validate;

use std::collections::HashMap;
use std::mem;

use indexmap::IndexMap;

pub use autofix::DEFAULT_FIX_PASSES;
pub use error::{DiagramError, Rule, ValidationReport, Violation};
pub use layout::force::{GraphLayouter, SpringLayouter};
pub use layout::{AlignItems, FlowDirection, Justify, Layout, LayoutOptions};
pub use render::{RenderExtents, Renderer, TextEntry};
pub use spec::{
    Anchor, ArrowSpec, ArrowStyle, BoxSpec, Canvas, ContainerSpec, Emphasis, FlexDirection,
    PositionSpec, Shape,
};
pub use state::DiagramState;
pub use style::{EmphasisStyle, StyleError, StylePalette};
pub use validate::{compute_arrow_label_position, MIN_MARGIN_MM, MIN_VISIBLE};

/// Widest canvas that still fits a double-column page.
const MAX_COLUMN_WIDTH_MM: f64 = 185.0;

/// Default outer padding for flex stacking.
const DEFAULT_PADDING_MM: f64 = 10.0;

/// Builder for box-and-arrow diagrams with mm-based coordinates.
///
/// Specs and resolved positions live in separate tables keyed by id; layout
/// and fix passes mutate positions in place while specs stay as declared.
/// One diagram is one single-threaded build session.
#[derive(Debug, Clone)]
pub struct Diagram {
    pub(crate) title: Option<String>,
    pub(crate) canvas: Canvas,
    pub(crate) padding_mm: f64,
    pub(crate) flex_gap_mm: Option<f64>,
    pub(crate) auto_height: bool,
    pub(crate) boxes: IndexMap<String, BoxSpec>,
    pub(crate) containers: IndexMap<String, ContainerSpec>,
    pub(crate) arrows: Vec<ArrowSpec>,
    pub(crate) positions: IndexMap<String, PositionSpec>,
    pub(crate) flow_items: Vec<String>,
}

impl Diagram {
    /// New diagram on a fixed-width canvas. Passing `None` for the height
    /// derives it from element extents at [`finalize`](Self::finalize) time.
    pub fn new(title: Option<&str>, width_mm: f64, height_mm: Option<f64>) -> Self {
        if width_mm > MAX_COLUMN_WIDTH_MM {
            log::warn!("diagram width {width_mm}mm exceeds {MAX_COLUMN_WIDTH_MM}mm (double-column max)");
        }
        let auto_height = height_mm.is_none();
        let height = height_mm.unwrap_or(0.0);
        Self {
            title: title.map(str::to_string),
            canvas: Canvas::new(width_mm, height),
            padding_mm: DEFAULT_PADDING_MM,
            flex_gap_mm: None,
            auto_height,
            boxes: IndexMap::new(),
            containers: IndexMap::new(),
            arrows: Vec::new(),
            positions: IndexMap::new(),
            flow_items: Vec::new(),
        }
    }

    /// New diagram in flex mode: elements added without explicit coordinates
    /// stack vertically with `gap_mm` spacing, and the canvas height is
    /// derived at finalize time.
    pub fn flex(title: Option<&str>, width_mm: f64, gap_mm: f64) -> Self {
        let mut diagram = Self::new(title, width_mm, None);
        diagram.flex_gap_mm = Some(gap_mm);
        diagram
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn arrows(&self) -> &[ArrowSpec] {
        &self.arrows
    }

    /// Resolved position of an element, if it has one.
    pub fn position(&self, id: &str) -> Option<&PositionSpec> {
        self.positions.get(id)
    }

    /// All resolved positions, in insertion order.
    pub fn positions(&self) -> &IndexMap<String, PositionSpec> {
        &self.positions
    }

    /// Overwrite (or create) the position of an element.
    pub fn set_position(&mut self, id: impl Into<String>, position: PositionSpec) {
        self.positions.insert(id.into(), position);
    }

    fn check_new_id(&self, id: &str) -> Result<(), DiagramError> {
        if self.boxes.contains_key(id) || self.containers.contains_key(id) {
            return Err(DiagramError::DuplicateId(id.to_string()));
        }
        Ok(())
    }

    fn check_known_id(&self, id: &str, referrer: &str) -> Result<(), DiagramError> {
        if !self.boxes.contains_key(id) && !self.containers.contains_key(id) {
            return Err(DiagramError::unknown_id(id, referrer));
        }
        Ok(())
    }

    fn check_size(id: &str, width_mm: f64, height_mm: f64) -> Result<(), DiagramError> {
        if width_mm <= 0.0 || height_mm <= 0.0 {
            return Err(DiagramError::InvalidSize {
                id: id.to_string(),
                width_mm,
                height_mm,
            });
        }
        Ok(())
    }

    /// Add a box. In flex mode a box without explicit coordinates is sized
    /// from its text and queued for stacking; otherwise a complete placement
    /// (or one whose height is derivable from the content) is stored
    /// immediately and a partial one is left for `auto_layout`.
    pub fn add_box(&mut self, mut spec: BoxSpec) -> Result<&mut Self, DiagramError> {
        self.check_new_id(&spec.id)?;
        let placement = mem::take(&mut spec.placement);
        let id = spec.id.clone();

        if self.flex_gap_mm.is_some() && placement.x_mm.is_none() && placement.y_mm.is_none() {
            let height = placement
                .height_mm
                .unwrap_or_else(|| layout::flex::auto_box_height(&spec));
            let width = placement
                .width_mm
                .unwrap_or_else(|| layout::flex::auto_box_width(&spec));
            Self::check_size(&id, width, height)?;
            self.positions
                .insert(id.clone(), PositionSpec::new(0.0, 0.0, width, height));
            self.flow_items.push(id.clone());
        } else if let (Some(x), Some(y), Some(width)) =
            (placement.x_mm, placement.y_mm, placement.width_mm)
        {
            let height = placement
                .height_mm
                .unwrap_or_else(|| layout::flex::auto_box_height(&spec));
            Self::check_size(&id, width, height)?;
            self.positions
                .insert(id.clone(), PositionSpec::new(x, y, width, height));
        }

        self.boxes.insert(id, spec);
        Ok(self)
    }

    /// Add a container. Every declared child must already exist.
    pub fn add_container(&mut self, mut spec: ContainerSpec) -> Result<&mut Self, DiagramError> {
        self.check_new_id(&spec.id)?;
        for child in &spec.children {
            self.check_known_id(child, &spec.id)?;
        }
        let placement = mem::take(&mut spec.placement);
        let id = spec.id.clone();

        if self.flex_gap_mm.is_some() && placement.x_mm.is_none() && placement.y_mm.is_none() {
            // Zero-size placeholder; the flex resolver measures the children.
            self.positions.insert(
                id.clone(),
                PositionSpec::new(
                    0.0,
                    0.0,
                    placement.width_mm.unwrap_or(0.0),
                    placement.height_mm.unwrap_or(0.0),
                ),
            );
            self.flow_items.push(id.clone());
        } else if let (Some(x), Some(y), Some(width), Some(height)) = (
            placement.x_mm,
            placement.y_mm,
            placement.width_mm,
            placement.height_mm,
        ) {
            Self::check_size(&id, width, height)?;
            self.positions
                .insert(id.clone(), PositionSpec::new(x, y, width, height));
        }

        self.containers.insert(id, spec);
        Ok(self)
    }

    /// Add an arrow. Both endpoints must already exist; their positions may
    /// still be missing, in which case anchor-based operations skip the
    /// arrow until layout places them.
    pub fn add_arrow(&mut self, spec: ArrowSpec) -> Result<&mut Self, DiagramError> {
        self.check_known_id(&spec.source, &spec.id)?;
        self.check_known_id(&spec.target, &spec.id)?;
        self.arrows.push(spec);
        Ok(self)
    }

    /// Automatically position all boxes. See [`LayoutOptions`].
    pub fn auto_layout(&mut self, options: &LayoutOptions) {
        layout::auto_layout(self, options);
    }

    /// [`auto_layout`](Self::auto_layout) with a caller-supplied
    /// force-directed routine for [`Layout::Spring`].
    pub fn auto_layout_with(&mut self, options: &LayoutOptions, layouter: &dyn GraphLayouter) {
        layout::auto_layout_with(self, options, layouter);
    }

    /// Run the pre-render fixers to a fixed point. Returns the total number
    /// of fixes applied; never fails.
    pub fn auto_fix(&mut self, max_passes: usize) -> usize {
        autofix::auto_fix(self, max_passes)
    }

    /// Push apart every overlapping pair of boxes (R2).
    pub fn fix_overlaps(&mut self) -> usize {
        autofix::fix_overlaps(self)
    }

    /// Push arrow targets away from their sources until shafts are readable.
    pub fn fix_arrow_lengths(&mut self) -> usize {
        autofix::fix_arrow_lengths(self)
    }

    /// Grow violating containers around their children (R1).
    pub fn fix_container_enclosure(&mut self) -> usize {
        autofix::fix_container_enclosure(self)
    }

    /// Flip the curve sign of wrong-sided arrow labels (R8).
    pub fn fix_arrow_labels(&mut self) -> usize {
        autofix::fix_arrow_labels(self)
    }

    /// Expand the canvas past escaping elements (R9).
    pub fn fix_canvas_bounds(&mut self) -> usize {
        autofix::fix_canvas_bounds(self)
    }

    /// One post-render pass nudging colliding arrow labels, driven by
    /// measured extents from the render collaborator.
    pub fn fix_post_render(&mut self, extents: &RenderExtents) -> usize {
        autofix::fix_post_render(self, extents)
    }

    /// Fail-fast R1 check: every container must enclose its children.
    pub fn validate_containers(&self) -> Result<(), DiagramError> {
        let violations = validate::container_violations(self);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(DiagramError::Validation(ValidationReport::new(violations)))
        }
    }

    /// Fail-fast R2 check: no two boxes may overlap.
    pub fn validate_no_overlap(&self) -> Result<(), DiagramError> {
        let violations = validate::overlap_violations(self);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(DiagramError::Validation(ValidationReport::new(violations)))
        }
    }

    /// Run every applicable rule and aggregate all error-level findings
    /// into one error. R5-R7 run only when `extents` is supplied; R3/R4
    /// findings are logged as warnings.
    pub fn validate_all(&self, extents: Option<&RenderExtents>) -> Result<(), DiagramError> {
        validate::validate_all(self, extents).map_err(DiagramError::Validation)
    }

    /// Resolve flex positions and derive the canvas height when it was left
    /// open. Call before handing positions to the render collaborator.
    pub fn finalize(&mut self) {
        layout::flex::finalize_canvas(self);
    }

    /// Snapshot of all specs, positions and canvas limits for persistence.
    pub fn to_state(&self) -> DiagramState {
        DiagramState {
            title: self.title.clone(),
            width_mm: self.canvas.width_mm,
            height_mm: self.canvas.height_mm,
            xlim: self.canvas.xlim,
            ylim: self.canvas.ylim,
            boxes: self.boxes.values().cloned().collect(),
            containers: self.containers.values().cloned().collect(),
            arrows: self.arrows.clone(),
            positions: self.positions.clone(),
        }
    }

    /// Rebuild a diagram from a snapshot, including canvas limits expanded
    /// by layout or the bounds fixer.
    pub fn from_state(state: DiagramState) -> Result<Self, DiagramError> {
        let mut diagram = Self::new(state.title.as_deref(), state.width_mm, Some(state.height_mm));
        diagram.canvas = state.canvas();
        diagram.positions = state.positions;
        for spec in state.boxes {
            diagram.add_box(spec)?;
        }
        for spec in state.containers {
            diagram.add_container(spec)?;
        }
        for spec in state.arrows {
            diagram.add_arrow(spec)?;
        }
        Ok(diagram)
    }

    /// Per-box collision margins for the overlap resolver.
    pub(crate) fn box_margins(&self) -> HashMap<String, f64> {
        self.boxes
            .iter()
            .map(|(id, spec)| (id.clone(), spec.margin_mm))
            .collect()
    }

    /// Absolute position of a non-auto anchor on an element's edge.
    fn anchor_point(pos: &PositionSpec, anchor: Anchor) -> (f64, f64) {
        let (rx, ry) = anchor.fraction().unwrap_or((0.5, 0.5));
        (
            pos.x_mm - pos.width_mm / 2.0 + rx * pos.width_mm,
            pos.y_mm - pos.height_mm / 2.0 + ry * pos.height_mm,
        )
    }

    /// Pick anchors from the dominant axis of the source-to-target delta.
    fn auto_anchor(src: &PositionSpec, tgt: &PositionSpec) -> (Anchor, Anchor) {
        let dx = tgt.x_mm - src.x_mm;
        let dy = tgt.y_mm - src.y_mm;
        if dx.abs() > dy.abs() {
            if dx > 0.0 {
                (Anchor::Right, Anchor::Left)
            } else {
                (Anchor::Left, Anchor::Right)
            }
        } else if dy > 0.0 {
            (Anchor::Top, Anchor::Bottom)
        } else {
            (Anchor::Bottom, Anchor::Top)
        }
    }

    /// Resolved start/end anchor points of an arrow, or `None` when either
    /// endpoint has no position yet (partially built diagrams are legal).
    pub(crate) fn resolved_endpoints(&self, arrow: &ArrowSpec) -> Option<((f64, f64), (f64, f64))> {
        let src = self.positions.get(&arrow.source)?;
        let tgt = self.positions.get(&arrow.target)?;
        let (auto_src, auto_tgt) = Self::auto_anchor(src, tgt);
        let src_anchor = match arrow.source_anchor {
            Anchor::Auto => auto_src,
            other => other,
        };
        let tgt_anchor = match arrow.target_anchor {
            Anchor::Auto => auto_tgt,
            other => other,
        };
        Some((
            Self::anchor_point(src, src_anchor),
            Self::anchor_point(tgt, tgt_anchor),
        ))
    }
}
