//! Fixers that mutate positions until the geometric rules hold.
//!
//! Pre-render fixers run in dependency order (overlaps, arrow lengths,
//! container enclosure, label sides, canvas bounds) for up to `max_passes`
//! rounds; a round with zero fixes ends the loop early. Fixing never fails,
//! it only mutates and reports a count. The post-render pass runs once after
//! a render cycle and nudges colliding arrow labels.

use indexmap::IndexMap;

use crate::geom::{gap, seg_rect_clip_length};
use crate::layout::flex::MIN_ARROW_GAP_MM;
use crate::layout::overlap::{resolve_overlaps, DEFAULT_MAX_PASSES};
use crate::render::RenderExtents;
use crate::spec::ArrowSpec;
use crate::validate::{
    canvas_violations, label_on_wrong_side, overlap_violations, MIN_MARGIN_MM,
};
use crate::Diagram;

/// Margin added beyond the exact fix so borderline cases do not re-trip.
const FIX_MARGIN_MM: f64 = 3.0;
/// Per-side inner padding when growing a container around its children.
const CONTAINER_PAD_MM: f64 = 8.0;
/// Vertical space reserved for a container title when re-centering children.
const TITLE_RESERVE_MM: f64 = 8.0;

/// Default pre-render fix rounds.
pub const DEFAULT_FIX_PASSES: usize = 3;

/// Perpendicular offsets tried for a colliding arrow label, in mm.
const LABEL_OFFSET_CANDIDATES: [f64; 6] = [5.0, 8.0, 12.0, -5.0, -8.0, -12.0];

#[derive(Debug, Clone, Copy, Default)]
struct EdgeExcess {
    left: f64,
    right: f64,
    bottom: f64,
    top: f64,
}

/// R2: push overlapping boxes apart across the whole canvas. Returns the
/// number of overlapping pairs found before resolution.
pub(crate) fn fix_overlaps(diagram: &mut Diagram) -> usize {
    let found = overlap_violations(diagram).len();
    if found == 0 {
        return 0;
    }
    let box_ids: Vec<String> = diagram.boxes.keys().cloned().collect();
    let margins = diagram.box_margins();
    let (x_lo, x_hi) = diagram.canvas.xlim;
    let (y_lo, y_hi) = diagram.canvas.ylim;
    resolve_overlaps(
        &mut diagram.positions,
        &box_ids,
        &margins,
        FIX_MARGIN_MM,
        x_lo,
        x_hi,
        y_lo,
        y_hi,
        DEFAULT_MAX_PASSES,
    );
    found
}

/// Keep connected boxes far enough apart for a readable arrow shaft: when
/// the rectangle gap falls below 15mm, the target moves along the
/// source-to-target direction by the shortfall. The source never moves.
pub(crate) fn fix_arrow_lengths(diagram: &mut Diagram) -> usize {
    let mut fixed = 0;
    let arrows: Vec<(String, String)> = diagram
        .arrows
        .iter()
        .map(|a| (a.source.clone(), a.target.clone()))
        .collect();
    for (source, target) in arrows {
        let (Some(src), Some(tgt)) = (
            diagram.positions.get(&source).copied(),
            diagram.positions.get(&target).copied(),
        ) else {
            continue;
        };
        let dx = tgt.x_mm - src.x_mm;
        let dy = tgt.y_mm - src.y_mm;
        let dist = dx.hypot(dy);
        if dist < 1e-6 {
            continue;
        }
        let g = gap(&src.rect(), &tgt.rect());
        if g >= MIN_ARROW_GAP_MM {
            continue;
        }
        let shortfall = MIN_ARROW_GAP_MM - g;
        let pos = &mut diagram.positions[target.as_str()];
        pos.x_mm += dx / dist * shortfall;
        pos.y_mm += dy / dist * shortfall;
        fixed += 1;
    }
    fixed
}

/// R1: grow violating containers around their children and re-center the
/// child group inside the new interior. Returns the number of containers
/// adjusted.
pub(crate) fn fix_container_enclosure(diagram: &mut Diagram) -> usize {
    // Max excess per container edge, aggregated over all children.
    let mut per_container: IndexMap<String, EdgeExcess> = IndexMap::new();
    for (cid, container) in &diagram.containers {
        let Some(cpos) = diagram.positions.get(cid) else {
            continue;
        };
        let c = cpos.rect();
        for child_id in &container.children {
            let Some(chpos) = diagram.positions.get(child_id) else {
                continue;
            };
            let ch = chpos.rect();
            let excess = EdgeExcess {
                left: (c.left - ch.left).max(0.0),
                right: (ch.right - c.right).max(0.0),
                bottom: (c.bottom - ch.bottom).max(0.0),
                top: (ch.top - c.top).max(0.0),
            };
            if excess.left > 0.0 || excess.right > 0.0 || excess.bottom > 0.0 || excess.top > 0.0
            {
                let entry = per_container.entry(cid.clone()).or_default();
                entry.left = entry.left.max(excess.left);
                entry.right = entry.right.max(excess.right);
                entry.bottom = entry.bottom.max(excess.bottom);
                entry.top = entry.top.max(excess.top);
            }
        }
    }
    if per_container.is_empty() {
        return 0;
    }

    for (cid, excess) in &per_container {
        let pos = &mut diagram.positions[cid.as_str()];
        pos.width_mm += excess.left + excess.right + 2.0 * CONTAINER_PAD_MM;
        pos.height_mm += excess.bottom + excess.top + 2.0 * CONTAINER_PAD_MM;
        pos.x_mm += (excess.right - excess.left) / 2.0;
        pos.y_mm += (excess.top - excess.bottom) / 2.0;
    }

    // Re-center each child group in the grown interior, leaving room for
    // the container title.
    for cid in per_container.keys() {
        let cpos = diagram.positions[cid.as_str()];
        let children: Vec<String> = diagram.containers[cid.as_str()]
            .children
            .iter()
            .filter(|ch| diagram.positions.contains_key(ch.as_str()))
            .cloned()
            .collect();
        if children.is_empty() {
            continue;
        }
        let rects: Vec<crate::geom::Rect> = children
            .iter()
            .map(|ch| diagram.positions[ch.as_str()].rect())
            .collect();
        let min_x = rects.iter().map(|r| r.left).fold(f64::INFINITY, f64::min);
        let max_x = rects.iter().map(|r| r.right).fold(f64::NEG_INFINITY, f64::max);
        let min_y = rects.iter().map(|r| r.bottom).fold(f64::INFINITY, f64::min);
        let max_y = rects.iter().map(|r| r.top).fold(f64::NEG_INFINITY, f64::max);

        let dx = cpos.x_mm - (min_x + max_x) / 2.0;
        let dy = (cpos.y_mm - TITLE_RESERVE_MM / 2.0) - (min_y + max_y) / 2.0;
        for ch in &children {
            let pos = &mut diagram.positions[ch.as_str()];
            pos.x_mm += dx;
            pos.y_mm += dy;
        }
    }
    per_container.len()
}

/// R8: flip the curve sign of every wrong-sided label. Returns the number
/// of arrows flipped.
pub(crate) fn fix_arrow_labels(diagram: &mut Diagram) -> usize {
    let flips: Vec<usize> = diagram
        .arrows
        .iter()
        .enumerate()
        .filter(|(_, arrow)| label_on_wrong_side(diagram, arrow))
        .map(|(i, _)| i)
        .collect();
    for &i in &flips {
        diagram.arrows[i].curve = -diagram.arrows[i].curve;
    }
    flips.len()
}

/// R9: expand the canvas limits past every escaping element, with a 3mm
/// margin per violated edge, and update width/height to match. The excess
/// is accumulated per violating element rather than aggregated to the
/// maximum, so crowded edges expand generously.
pub(crate) fn fix_canvas_bounds(diagram: &mut Diagram) -> usize {
    let violations = canvas_violations(diagram);
    if violations.is_empty() {
        return 0;
    }
    let (mut x_lo, mut x_hi) = diagram.canvas.xlim;
    let (mut y_lo, mut y_hi) = diagram.canvas.ylim;
    let (orig_x, orig_y) = (diagram.canvas.xlim, diagram.canvas.ylim);

    for id in diagram.boxes.keys().chain(diagram.containers.keys()) {
        let Some(pos) = diagram.positions.get(id) else {
            continue;
        };
        let r = pos.rect();
        if r.left < orig_x.0 {
            x_lo -= (orig_x.0 - r.left) + FIX_MARGIN_MM;
        }
        if r.right > orig_x.1 {
            x_hi += (r.right - orig_x.1) + FIX_MARGIN_MM;
        }
        if r.bottom < orig_y.0 {
            y_lo -= (orig_y.0 - r.bottom) + FIX_MARGIN_MM;
        }
        if r.top > orig_y.1 {
            y_hi += (r.top - orig_y.1) + FIX_MARGIN_MM;
        }
    }

    diagram.canvas.xlim = (x_lo, x_hi);
    diagram.canvas.ylim = (y_lo, y_hi);
    diagram.canvas.width_mm = x_hi - x_lo;
    diagram.canvas.height_mm = y_hi - y_lo;
    violations.len()
}

/// Run the pre-render fixers to a fixed point, up to `max_passes` rounds.
/// Never fails; returns the total number of fixes applied and logs one
/// summary warning when that total is non-zero.
pub(crate) fn auto_fix(diagram: &mut Diagram, max_passes: usize) -> usize {
    let mut total = 0;
    let mut passes = 0;
    for _ in 0..max_passes {
        passes += 1;
        let mut n = 0;
        n += fix_overlaps(diagram);
        n += fix_arrow_lengths(diagram);
        n += fix_container_enclosure(diagram);
        n += fix_arrow_labels(diagram);
        n += fix_canvas_bounds(diagram);
        total += n;
        if n == 0 {
            break;
        }
    }
    if total > 0 {
        log::warn!("auto_fix: applied {total} fix(es) in {passes} pass(es)");
    }
    total
}

fn arrow_perp(diagram: &Diagram, arrow: &ArrowSpec) -> (f64, f64) {
    let (Some(src), Some(tgt)) = (
        diagram.positions.get(&arrow.source),
        diagram.positions.get(&arrow.target),
    ) else {
        return (0.0, 1.0);
    };
    let dx = tgt.x_mm - src.x_mm;
    let dy = tgt.y_mm - src.y_mm;
    let dist = dx.hypot(dy);
    if dist < 1e-6 {
        return (0.0, 1.0);
    }
    (-dy / dist, dx / dist)
}

/// One post-render pass over arrow labels: a label that occludes its own
/// arrow's straight path, crowds other text, or crowds an element edge gets
/// a perpendicular offset accumulated onto any existing manual offset.
/// The first candidate offset is applied without re-checking; the next
/// render cycle re-validates. Returns the number of labels adjusted.
pub(crate) fn fix_post_render(diagram: &mut Diagram, extents: &RenderExtents) -> usize {
    let mut fixed = 0;
    let arrow_labels: Vec<String> = diagram
        .arrows
        .iter()
        .filter_map(|a| a.label.clone())
        .collect();
    let element_rects: Vec<crate::geom::Rect> = diagram
        .boxes
        .keys()
        .chain(diagram.containers.keys())
        .filter_map(|id| diagram.positions.get(id).map(|p| p.rect()))
        .collect();

    for i in 0..diagram.arrows.len() {
        let arrow = diagram.arrows[i].clone();
        let Some(label) = &arrow.label else {
            continue;
        };
        let Some(label_bb) = extents
            .text_entries
            .iter()
            .find(|e| &e.text == label)
            .map(|e| e.bbox)
        else {
            continue;
        };

        let mut needs_fix = false;

        // Self-occlusion of the straight source-to-target path.
        if let (Some(src), Some(tgt)) = (
            diagram.positions.get(&arrow.source),
            diagram.positions.get(&arrow.target),
        ) {
            let clip =
                seg_rect_clip_length(src.x_mm, src.y_mm, tgt.x_mm, tgt.y_mm, &label_bb);
            if clip > 0.0 {
                needs_fix = true;
            }
        }

        // Crowding against non-label text.
        if !needs_fix {
            needs_fix = extents
                .text_entries
                .iter()
                .filter(|e| &e.text != label && !arrow_labels.contains(&e.text))
                .any(|e| gap(&label_bb, &e.bbox) < MIN_MARGIN_MM);
        }

        // Crowding against element edges the label is not inside.
        if !needs_fix {
            let (cx, cy) = label_bb.center();
            needs_fix = element_rects
                .iter()
                .filter(|r| !r.contains(cx, cy))
                .any(|r| gap(&label_bb, r) < MIN_MARGIN_MM);
        }

        if !needs_fix {
            continue;
        }

        let (nx, ny) = arrow_perp(diagram, &arrow);
        let base = arrow.label_offset_mm.unwrap_or((0.0, 0.0));
        // First candidate, applied without re-checking; the next render
        // cycle re-validates the result.
        let offset_mm = LABEL_OFFSET_CANDIDATES[0];
        diagram.arrows[i].label_offset_mm =
            Some((base.0 + nx * offset_mm, base.1 + ny * offset_mm));
        fixed += 1;
    }
    fixed
}
