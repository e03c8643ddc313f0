//! Automatic box placement.
//!
//! Placement runs in mm in canvas coordinates and writes centers into the
//! diagram's position store. The canvas itself may grow first: flow layouts
//! expand the limits to fit the boxes, and both axes are then matched to the
//! figure aspect ratio so a unit of x renders as long as a unit of y.

pub mod flex;
pub mod flow;
pub mod force;
pub mod graph;
pub mod overlap;

use serde::{Deserialize, Serialize};

use crate::spec::PositionSpec;
use crate::Diagram;
use force::{GraphLayouter, SpringLayouter};

/// Default box width when neither the caller nor a prior position set one.
pub const DEFAULT_BOX_WIDTH_MM: f64 = 40.0;
/// Default box height, same rule.
pub const DEFAULT_BOX_HEIGHT_MM: f64 = 25.0;
/// Vertical band kept free for the diagram title.
pub(crate) const TITLE_SPACE_MM: f64 = 12.0;

/// Main-axis flow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    Lr,
    Rl,
    Tb,
    Bt,
}

/// Layout algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Flow(FlowDirection),
    Spring,
    Circular,
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Flow(FlowDirection::Lr)
    }
}

/// Main-axis distribution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Justify {
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
}

/// Cross-axis fallback for single-member layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignItems {
    Start,
    Center,
    End,
}

/// Options for [`Diagram::auto_layout`].
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub layout: Layout,
    pub margin_mm: f64,
    pub box_size_mm: (f64, f64),
    pub gap_mm: f64,
    pub avoid_overlap: bool,
    pub justify: Justify,
    pub align_items: AlignItems,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            margin_mm: 15.0,
            box_size_mm: (DEFAULT_BOX_WIDTH_MM, DEFAULT_BOX_HEIGHT_MM),
            gap_mm: 10.0,
            avoid_overlap: true,
            justify: Justify::SpaceBetween,
            align_items: AlignItems::Center,
        }
    }
}

impl LayoutOptions {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn with_margin_mm(mut self, margin_mm: f64) -> Self {
        self.margin_mm = margin_mm;
        self
    }

    pub fn with_box_size_mm(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.box_size_mm = (width_mm, height_mm);
        self
    }

    pub fn with_gap_mm(mut self, gap_mm: f64) -> Self {
        self.gap_mm = gap_mm;
        self
    }

    pub fn with_avoid_overlap(mut self, avoid_overlap: bool) -> Self {
        self.avoid_overlap = avoid_overlap;
        self
    }

    pub fn with_justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    pub fn with_align_items(mut self, align_items: AlignItems) -> Self {
        self.align_items = align_items;
        self
    }
}

pub(crate) fn auto_layout(diagram: &mut Diagram, options: &LayoutOptions) {
    auto_layout_with(diagram, options, &SpringLayouter::default());
}

/// Same as [`auto_layout`] but with a caller-supplied force-directed
/// implementation for [`Layout::Spring`].
pub(crate) fn auto_layout_with(
    diagram: &mut Diagram,
    options: &LayoutOptions,
    layouter: &dyn GraphLayouter,
) {
    let (w, h) = options.box_size_mm;
    let box_ids: Vec<String> = diagram.boxes.keys().cloned().collect();
    if box_ids.is_empty() {
        return;
    }
    let edges: Vec<(String, String)> = diagram
        .arrows
        .iter()
        .map(|a| (a.source.clone(), a.target.clone()))
        .collect();

    let n_boxes = box_ids.len() as f64;
    let title_space = if diagram.title.is_some() {
        TITLE_SPACE_MM
    } else {
        0.0
    };

    // Flow layouts expand the canvas to fit; spring/circular use it as-is.
    if let Layout::Flow(direction) = options.layout {
        let gaps = (n_boxes - 1.0) * options.gap_mm;
        match direction {
            FlowDirection::Lr | FlowDirection::Rl => {
                let needed_main = n_boxes * w + gaps + 2.0 * options.margin_mm;
                let needed_cross = h + 2.0 * options.margin_mm + title_space;
                if diagram.canvas.xlim.1 - diagram.canvas.xlim.0 < needed_main {
                    diagram.canvas.xlim =
                        (diagram.canvas.xlim.0, diagram.canvas.xlim.0 + needed_main);
                }
                if diagram.canvas.ylim.1 - diagram.canvas.ylim.0 < needed_cross {
                    let cy = (diagram.canvas.ylim.0 + diagram.canvas.ylim.1) / 2.0;
                    diagram.canvas.ylim = (cy - needed_cross / 2.0, cy + needed_cross / 2.0);
                }
            }
            FlowDirection::Tb | FlowDirection::Bt => {
                let needed_main = n_boxes * h + gaps + 2.0 * options.margin_mm + title_space;
                let needed_cross = w + 2.0 * options.margin_mm;
                if diagram.canvas.ylim.1 - diagram.canvas.ylim.0 < needed_main {
                    diagram.canvas.ylim =
                        (diagram.canvas.ylim.0, diagram.canvas.ylim.0 + needed_main);
                }
                if diagram.canvas.xlim.1 - diagram.canvas.xlim.0 < needed_cross {
                    let cx = (diagram.canvas.xlim.0 + diagram.canvas.xlim.1) / 2.0;
                    diagram.canvas.xlim = (cx - needed_cross / 2.0, cx + needed_cross / 2.0);
                }
            }
        }
    }

    // Match the limits to the figure aspect ratio so rendering with equal
    // axis scaling fills the page. Skipped while the canvas height is still
    // open (auto-height diagrams get theirs at finalize time): a zero
    // height has no aspect and would blow the limits up to infinity.
    if diagram.canvas.height_mm > 0.0 {
        let fig_aspect = diagram.canvas.width_mm / diagram.canvas.height_mm;
        let x_range = diagram.canvas.xlim.1 - diagram.canvas.xlim.0;
        let y_range = diagram.canvas.ylim.1 - diagram.canvas.ylim.0;
        if y_range > 0.0 && x_range / y_range < fig_aspect {
            let half_w = y_range * fig_aspect / 2.0;
            let cx = (diagram.canvas.xlim.0 + diagram.canvas.xlim.1) / 2.0;
            diagram.canvas.xlim = (cx - half_w, cx + half_w);
        } else if y_range > 0.0 && x_range / y_range > fig_aspect {
            let half_h = x_range / fig_aspect / 2.0;
            let cy = (diagram.canvas.ylim.0 + diagram.canvas.ylim.1) / 2.0;
            diagram.canvas.ylim = (cy - half_h, cy + half_h);
        }
    }

    let x_min = diagram.canvas.xlim.0 + options.margin_mm;
    let x_max = diagram.canvas.xlim.1 - options.margin_mm;
    let y_min = diagram.canvas.ylim.0 + options.margin_mm;
    let y_max = diagram.canvas.ylim.1 - options.margin_mm;

    // Distribution bounds hold centers, inset by half a box so edges stay
    // inside the margins, with the title band subtracted at the top.
    let dx_min = x_min + w / 2.0;
    let dx_max = x_max - w / 2.0;
    let dy_min = y_min + h / 2.0;
    let dy_max = y_max - h / 2.0 - title_space;

    let positions = match options.layout {
        Layout::Flow(direction) => flow::flow_positions(
            &box_ids,
            &edges,
            direction,
            dx_min,
            dx_max,
            dy_min,
            dy_max,
            options.justify,
            options.align_items,
        ),
        Layout::Spring => {
            let raw = layouter.layout(&box_ids, &edges);
            force::scale_into(&raw, &box_ids, dx_min, dx_max, dy_min, dy_max)
        }
        Layout::Circular => force::circular_positions(&box_ids, dx_min, dx_max, dy_min, dy_max),
    };

    // Sizes from an earlier placement survive; only centers are rewritten.
    for (box_id, (x, y)) in positions {
        let spec = match diagram.positions.get(&box_id) {
            Some(existing) => PositionSpec::new(x, y, existing.width_mm, existing.height_mm),
            None => PositionSpec::new(x, y, w, h),
        };
        diagram.positions.insert(box_id, spec);
    }

    if options.avoid_overlap {
        let margins = diagram.box_margins();
        overlap::resolve_overlaps(
            &mut diagram.positions,
            &box_ids,
            &margins,
            options.gap_mm,
            x_min,
            x_max,
            y_min,
            y_max,
            overlap::DEFAULT_MAX_PASSES,
        );
    }
}
