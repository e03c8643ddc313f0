//! Flexbox-like stacking for elements added without explicit coordinates.
//!
//! Active only on diagrams built with a flex gap: top-level items stack
//! vertically top-to-bottom, containers arrange children in a row or column,
//! and the canvas height is derived from the result. Adjacent items joined
//! by an arrow get extra breathing room so the shaft stays visible past the
//! arrowhead.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::spec::{BoxSpec, ContainerSpec, FlexDirection, PositionSpec};
use crate::Diagram;

/// Minimum gap between arrow-connected neighbors.
pub(crate) const MIN_ARROW_GAP_MM: f64 = 15.0;

/// Title band height inside a titled container.
const CONTAINER_TITLE_MM: f64 = 8.0;

/// Vertical band for the diagram title when the canvas height is derived.
const TITLE_SPACE_MM: f64 = 12.0;

/// Outer margin applied when the canvas height is derived.
const FINALIZE_MARGIN_MM: f64 = 8.0;

/// Canvas height fallback for an empty flex diagram.
const EMPTY_HEIGHT_MM: f64 = 120.0;

type ConnectedPairs = HashSet<(String, String)>;

fn connected_pairs(diagram: &Diagram) -> ConnectedPairs {
    diagram
        .arrows
        .iter()
        .map(|a| (a.source.clone(), a.target.clone()))
        .collect()
}

fn effective_gap(base_gap: f64, prev_id: &str, next_id: &str, connected: &ConnectedPairs) -> f64 {
    let forward = (prev_id.to_string(), next_id.to_string());
    let backward = (next_id.to_string(), prev_id.to_string());
    if connected.contains(&forward) || connected.contains(&backward) {
        base_gap.max(MIN_ARROW_GAP_MM)
    } else {
        base_gap
    }
}

/// Gap after each item except the last.
fn pairwise_gaps(base_gap: f64, items: &[String], connected: &ConnectedPairs) -> Vec<f64> {
    items
        .windows(2)
        .map(|pair| effective_gap(base_gap, &pair[0], &pair[1], connected))
        .collect()
}

/// Assign positions to every flex-managed element. No-op on diagrams built
/// without a flex gap.
pub(crate) fn resolve_flex_layout(diagram: &mut Diagram) {
    let Some(gap_mm) = diagram.flex_gap_mm else {
        return;
    };
    if diagram.flow_items.is_empty() {
        return;
    }
    let connected = connected_pairs(diagram);

    let all_children: HashSet<&str> = diagram
        .containers
        .values()
        .flat_map(|c| c.children.iter().map(String::as_str))
        .collect();
    let top_items: Vec<String> = diagram
        .flow_items
        .iter()
        .filter(|id| !all_children.contains(id.as_str()))
        .cloned()
        .collect();

    // Container sizes first, bottom-up.
    let flow_items = diagram.flow_items.clone();
    for id in &flow_items {
        if diagram.containers.contains_key(id) {
            compute_container_size(&diagram.containers, &mut diagram.positions, &connected, id);
        }
    }

    // Stack top-level items vertically from the top of the content area.
    let cx = diagram.canvas.width_mm / 2.0;
    let placed: Vec<String> = top_items
        .iter()
        .filter(|id| diagram.positions.contains_key(id.as_str()))
        .cloned()
        .collect();
    let heights: Vec<f64> = placed
        .iter()
        .map(|id| diagram.positions[id.as_str()].height_mm)
        .collect();
    let gaps = pairwise_gaps(gap_mm, &placed, &connected);
    let total: f64 = heights.iter().sum::<f64>() + gaps.iter().sum::<f64>();

    let mut y = total + diagram.padding_mm;
    for (i, id) in placed.iter().enumerate() {
        let h = diagram.positions[id.as_str()].height_mm;
        y -= h / 2.0;
        let pos = &mut diagram.positions[id.as_str()];
        pos.x_mm = cx;
        pos.y_mm = y;
        y -= h / 2.0 + gaps.get(i).copied().unwrap_or(0.0);

        if diagram.containers.contains_key(id) {
            position_children(&diagram.containers, &mut diagram.positions, &connected, id);
        }
    }
}

/// Intrinsic container size from its children, recursive bottom-up. Leaves
/// the container at the origin; [`position_children`] moves it later.
fn compute_container_size(
    containers: &IndexMap<String, ContainerSpec>,
    positions: &mut IndexMap<String, PositionSpec>,
    connected: &ConnectedPairs,
    cid: &str,
) {
    let Some(container) = containers.get(cid) else {
        return;
    };
    let children = container.children.clone();
    let direction = container.direction;
    let c_gap = container.gap_mm;
    let c_pad = container.padding_mm;
    let title_h = if container.title.is_some() {
        CONTAINER_TITLE_MM
    } else {
        0.0
    };

    for child in &children {
        if containers.contains_key(child) {
            let needs_sizing = positions
                .get(child)
                .map_or(true, |p| p.height_mm == 0.0);
            if needs_sizing {
                compute_container_size(containers, positions, connected, child);
            }
        }
    }

    let child_sizes: Vec<(f64, f64)> = children
        .iter()
        .filter_map(|c| positions.get(c).map(|p| (p.width_mm, p.height_mm)))
        .collect();
    if child_sizes.is_empty() {
        return;
    }

    let total_gaps: f64 = pairwise_gaps(c_gap, &children, connected).iter().sum();
    let (mut w, mut h) = match direction {
        FlexDirection::Row => (
            child_sizes.iter().map(|s| s.0).sum::<f64>() + total_gaps + 2.0 * c_pad,
            child_sizes.iter().map(|s| s.1).fold(0.0, f64::max) + title_h + 2.0 * c_pad,
        ),
        FlexDirection::Column => (
            child_sizes.iter().map(|s| s.0).fold(0.0, f64::max) + 2.0 * c_pad,
            child_sizes.iter().map(|s| s.1).sum::<f64>() + total_gaps + title_h + 2.0 * c_pad,
        ),
    };

    // A non-zero placeholder means the caller fixed that dimension.
    if let Some(pos) = positions.get(cid) {
        if pos.width_mm > 0.0 {
            w = pos.width_mm;
        }
        if pos.height_mm > 0.0 {
            h = pos.height_mm;
        }
    }
    positions.insert(cid.to_string(), PositionSpec::new(0.0, 0.0, w, h));
}

/// Center children inside a container whose own center is already fixed,
/// recursing into nested containers.
fn position_children(
    containers: &IndexMap<String, ContainerSpec>,
    positions: &mut IndexMap<String, PositionSpec>,
    connected: &ConnectedPairs,
    cid: &str,
) {
    let Some(container) = containers.get(cid) else {
        return;
    };
    let Some(pos) = positions.get(cid).copied() else {
        return;
    };
    let children = container.children.clone();
    let direction = container.direction;
    let c_gap = container.gap_mm;
    let c_pad = container.padding_mm;
    let title_h = if container.title.is_some() {
        CONTAINER_TITLE_MM
    } else {
        0.0
    };
    let gaps = pairwise_gaps(c_gap, &children, connected);

    // Content row sits below the title band.
    let content_cy = pos.y_mm - title_h / 2.0;

    match direction {
        FlexDirection::Row => {
            let total_w: f64 = children
                .iter()
                .filter_map(|c| positions.get(c).map(|p| p.width_mm))
                .sum::<f64>()
                + gaps.iter().sum::<f64>();
            let mut x = pos.x_mm - total_w / 2.0;
            for (i, child_id) in children.iter().enumerate() {
                let Some(cp) = positions.get_mut(child_id) else {
                    continue;
                };
                x += cp.width_mm / 2.0;
                cp.x_mm = x;
                cp.y_mm = content_cy;
                x += cp.width_mm / 2.0 + gaps.get(i).copied().unwrap_or(0.0);
                if containers.contains_key(child_id) {
                    position_children(containers, positions, connected, child_id);
                }
            }
        }
        FlexDirection::Column => {
            let mut y = pos.y_mm + pos.height_mm / 2.0 - c_pad - title_h;
            for (i, child_id) in children.iter().enumerate() {
                let Some(cp) = positions.get_mut(child_id) else {
                    continue;
                };
                y -= cp.height_mm / 2.0;
                cp.x_mm = pos.x_mm;
                cp.y_mm = y;
                y -= cp.height_mm / 2.0 + gaps.get(i).copied().unwrap_or(0.0);
                if containers.contains_key(child_id) {
                    position_children(containers, positions, connected, child_id);
                }
            }
        }
    }
}

/// Box height from its text content: 6mm title line, 5mm subtitle, 5mm per
/// content line, padding top and bottom, 18mm floor.
pub(crate) fn auto_box_height(spec: &BoxSpec) -> f64 {
    let mut h = 6.0;
    if spec.subtitle.is_some() {
        h += 5.0;
    }
    h += spec.content.len() as f64 * 5.0;
    h += 2.0 * spec.padding_mm;
    h.max(18.0)
}

/// Box width from the longest text line at roughly 2.2mm per character,
/// 24mm floor.
pub(crate) fn auto_box_width(spec: &BoxSpec) -> f64 {
    let mm_per_char = 2.2;
    let max_chars = std::iter::once(spec.title.len())
        .chain(spec.subtitle.iter().map(String::len))
        .chain(spec.content.iter().map(String::len))
        .max()
        .unwrap_or(4);
    (max_chars as f64 * mm_per_char + 2.0 * spec.padding_mm).max(24.0)
}

/// Resolve flex positions, then derive canvas height and y limits when the
/// diagram was built without a fixed height.
pub(crate) fn finalize_canvas(diagram: &mut Diagram) {
    resolve_flex_layout(diagram);
    if !diagram.auto_height {
        return;
    }
    if diagram.positions.is_empty() {
        diagram.canvas.height_mm = EMPTY_HEIGHT_MM;
        diagram.canvas.ylim = (0.0, EMPTY_HEIGHT_MM);
        return;
    }

    let max_top = diagram
        .positions
        .values()
        .map(|p| p.y_mm + p.height_mm / 2.0)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_bottom = diagram
        .positions
        .values()
        .map(|p| p.y_mm - p.height_mm / 2.0)
        .fold(f64::INFINITY, f64::min);

    let title_space = if diagram.title.is_some() {
        TITLE_SPACE_MM
    } else {
        0.0
    };
    diagram.canvas.height_mm = max_top - min_bottom + title_space + 2.0 * FINALIZE_MARGIN_MM;
    diagram.canvas.ylim = (
        min_bottom - FINALIZE_MARGIN_MM,
        max_top + title_space + FINALIZE_MARGIN_MM,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ArrowSpec;
    use crate::Diagram;

    fn flex_diagram() -> Diagram {
        Diagram::flex(None, 160.0, 10.0)
    }

    #[test]
    fn top_level_items_stack_top_to_bottom() {
        let mut d = flex_diagram();
        d.add_box(BoxSpec::new("a", "A").size(40.0, 20.0)).unwrap();
        d.add_box(BoxSpec::new("b", "B").size(40.0, 20.0)).unwrap();
        resolve_flex_layout(&mut d);

        let pa = d.position("a").unwrap();
        let pb = d.position("b").unwrap();
        assert_eq!(pa.x_mm, 80.0);
        assert_eq!(pb.x_mm, 80.0);
        assert!(pa.y_mm > pb.y_mm);
        // 20mm boxes with a 10mm gap: centers 30mm apart
        assert!((pa.y_mm - pb.y_mm - 30.0).abs() < 1e-9);
    }

    #[test]
    fn arrow_connected_neighbors_get_wider_gap() {
        let mut d = flex_diagram();
        d.add_box(BoxSpec::new("a", "A").size(40.0, 20.0)).unwrap();
        d.add_box(BoxSpec::new("b", "B").size(40.0, 20.0)).unwrap();
        d.add_arrow(ArrowSpec::new("a", "b")).unwrap();
        resolve_flex_layout(&mut d);

        let pa = d.position("a").unwrap();
        let pb = d.position("b").unwrap();
        assert!((pa.y_mm - pb.y_mm - (20.0 + MIN_ARROW_GAP_MM)).abs() < 1e-9);
    }

    #[test]
    fn row_container_size_wraps_children() {
        let mut d = flex_diagram();
        d.add_box(BoxSpec::new("a", "A").size(30.0, 20.0)).unwrap();
        d.add_box(BoxSpec::new("b", "B").size(50.0, 24.0)).unwrap();
        d.add_container(ContainerSpec::new("grp").title("Group").children(["a", "b"]))
            .unwrap();
        resolve_flex_layout(&mut d);

        let pos = d.position("grp").unwrap();
        // widths 30+50, gap 8, padding 8 per side
        assert!((pos.width_mm - (30.0 + 50.0 + 8.0 + 16.0)).abs() < 1e-9);
        // tallest child 24 + title 8 + padding 16
        assert!((pos.height_mm - (24.0 + 8.0 + 16.0)).abs() < 1e-9);
    }

    #[test]
    fn nested_containers_size_bottom_up() {
        let mut d = flex_diagram();
        d.add_box(BoxSpec::new("a", "A").size(30.0, 20.0)).unwrap();
        d.add_container(ContainerSpec::new("inner").children(["a"])).unwrap();
        d.add_container(ContainerSpec::new("outer").title("Outer").children(["inner"]))
            .unwrap();
        resolve_flex_layout(&mut d);

        // inner: child 30x20 plus 8mm padding per side, no title
        let inner = d.position("inner").unwrap();
        assert!((inner.width_mm - 46.0).abs() < 1e-9);
        assert!((inner.height_mm - 36.0).abs() < 1e-9);
        // outer wraps the measured inner plus its own title band and padding
        let outer = d.position("outer").unwrap();
        assert!((outer.width_mm - 62.0).abs() < 1e-9);
        assert!((outer.height_mm - 60.0).abs() < 1e-9);
    }

    #[test]
    fn container_children_sit_below_title_band() {
        let mut d = flex_diagram();
        d.add_box(BoxSpec::new("a", "A").size(30.0, 20.0)).unwrap();
        d.add_container(ContainerSpec::new("grp").title("Group").children(["a"]))
            .unwrap();
        resolve_flex_layout(&mut d);

        let grp = d.position("grp").unwrap();
        let child = d.position("a").unwrap();
        assert_eq!(child.x_mm, grp.x_mm);
        assert!((grp.y_mm - child.y_mm - 4.0).abs() < 1e-9);
    }

    #[test]
    fn column_container_stacks_children_downward() {
        let mut d = flex_diagram();
        d.add_box(BoxSpec::new("a", "A").size(30.0, 20.0)).unwrap();
        d.add_box(BoxSpec::new("b", "B").size(30.0, 20.0)).unwrap();
        d.add_container(
            ContainerSpec::new("grp")
                .children(["a", "b"])
                .direction(FlexDirection::Column),
        )
        .unwrap();
        resolve_flex_layout(&mut d);

        let pa = d.position("a").unwrap();
        let pb = d.position("b").unwrap();
        assert!(pa.y_mm > pb.y_mm);
        assert!((pa.y_mm - pb.y_mm - 28.0).abs() < 1e-9);
    }

    #[test]
    fn finalize_derives_height_from_extents() {
        let mut d = flex_diagram();
        d.add_box(BoxSpec::new("a", "A").size(40.0, 20.0)).unwrap();
        d.add_box(BoxSpec::new("b", "B").size(40.0, 20.0)).unwrap();
        finalize_canvas(&mut d);

        // two 20mm boxes + 10mm gap + 8mm margins both sides
        assert!((d.canvas.height_mm - 66.0).abs() < 1e-9);
        assert!((d.canvas.ylim.1 - d.canvas.ylim.0 - d.canvas.height_mm).abs() < 1e-9);
    }

    #[test]
    fn finalize_on_empty_flex_diagram_falls_back() {
        let mut d = flex_diagram();
        finalize_canvas(&mut d);
        assert_eq!(d.canvas.height_mm, 120.0);
        assert_eq!(d.canvas.ylim, (0.0, 120.0));
    }

    #[test]
    fn auto_height_floors_at_18mm() {
        let b = BoxSpec::new("a", "T").padding_mm(2.0);
        assert_eq!(auto_box_height(&b), 18.0);
    }

    #[test]
    fn auto_height_counts_subtitle_and_content() {
        let b = BoxSpec::new("a", "T").subtitle("sub").content(["one", "two"]);
        // 6 + 5 + 2*5 + 2*5 padding
        assert_eq!(auto_box_height(&b), 31.0);
    }

    #[test]
    fn auto_width_tracks_longest_line() {
        let b = BoxSpec::new("a", "a very long title indeed");
        let expected = 24.0_f64.max(24.0 * 2.2 + 10.0);
        assert_eq!(auto_box_width(&b), expected);
    }
}
