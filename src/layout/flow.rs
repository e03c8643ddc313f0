//! Flow layout: topological layers distributed with CSS-like justify modes.
//!
//! The cross-axis mirroring per direction is a compatibility contract: lr/rl
//! reverse the within-layer order, tb/bt do not. Changing it flips the
//! visual stacking order of every multi-member layer.

use indexmap::IndexMap;

use super::{AlignItems, FlowDirection, Justify};
use crate::layout::graph;

/// Positions along one axis for `n` members under a justify mode.
///
/// Bounds are the usable interval (already inset by half a box). start/end/
/// center use compact spacing over 30% of the interval; space-between pins
/// first and last to the bounds; space-around centers each member in an
/// equal cell. A single member lands on the midpoint except for start/end,
/// which anchor it 15% in from the respective bound.
pub fn distribute(n: usize, axis_min: f64, axis_max: f64, justify: Justify) -> Vec<f64> {
    let total = axis_max - axis_min;
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![match justify {
            Justify::Start => axis_min + total * 0.15,
            Justify::End => axis_max - total * 0.15,
            _ => (axis_min + axis_max) / 2.0,
        }];
    }
    let compact = total * 0.3 / (n - 1) as f64;
    match justify {
        Justify::Start => (0..n).map(|i| axis_min + compact * i as f64).collect(),
        Justify::End => (0..n)
            .map(|i| axis_max - compact * (n - 1 - i) as f64)
            .collect(),
        Justify::Center => {
            let span = compact * (n - 1) as f64;
            let start = (axis_min + axis_max - span) / 2.0;
            (0..n).map(|i| start + compact * i as f64).collect()
        }
        Justify::SpaceAround => {
            let cell = total / n as f64;
            (0..n).map(|i| axis_min + cell * (i as f64 + 0.5)).collect()
        }
        Justify::SpaceBetween => (0..n)
            .map(|i| axis_min + total * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Cross-axis fallback for a single-member layer.
fn align(axis_min: f64, axis_max: f64, align_items: AlignItems) -> f64 {
    match align_items {
        AlignItems::Start => axis_min,
        AlignItems::End => axis_max,
        AlignItems::Center => (axis_min + axis_max) / 2.0,
    }
}

/// Compute centers for every box from the arrow graph.
///
/// Bounds are the distribution interval per axis (canvas minus margins minus
/// half a box). Output contains centers only; the caller merges sizes.
#[allow(clippy::too_many_arguments)]
pub fn flow_positions(
    box_ids: &[String],
    edges: &[(String, String)],
    direction: FlowDirection,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    justify: Justify,
    align_items: AlignItems,
) -> IndexMap<String, (f64, f64)> {
    let sorted = graph::topological_order(box_ids, edges);
    let layers = graph::assign_layers(&sorted, edges);
    let groups = graph::layer_groups(&sorted, &layers);
    let n_layers = layers.values().max().map_or(1, |m| m + 1);

    let mut positions: IndexMap<String, (f64, f64)> = IndexMap::new();

    match direction {
        FlowDirection::Lr | FlowDirection::Rl => {
            let main = distribute(n_layers, x_min, x_max, justify);
            for (layer, members) in &groups {
                let x = match direction {
                    FlowDirection::Lr => main[*layer],
                    _ => main[n_layers - 1 - layer],
                };
                let n = members.len();
                let cross = distribute(n, y_min, y_max, Justify::SpaceBetween);
                for (i, id) in members.iter().enumerate() {
                    let y = if n > 1 {
                        cross[n - 1 - i] // mirrored: first member stacks on top
                    } else {
                        align(y_min, y_max, align_items)
                    };
                    positions.insert(id.clone(), (x, y));
                }
            }
        }
        FlowDirection::Tb | FlowDirection::Bt => {
            let main = distribute(n_layers, y_min, y_max, justify);
            for (layer, members) in &groups {
                let y = match direction {
                    FlowDirection::Tb => main[n_layers - 1 - layer],
                    _ => main[*layer],
                };
                let n = members.len();
                let cross = distribute(n, x_min, x_max, Justify::SpaceBetween);
                for (i, id) in members.iter().enumerate() {
                    let x = if n > 1 {
                        cross[i]
                    } else {
                        align(x_min, x_max, align_items)
                    };
                    positions.insert(id.clone(), (x, y));
                }
            }
        }
    }
    positions
}
