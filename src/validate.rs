//! The validation rules.
//!
//! Rule functions return violation lists instead of failing on the first
//! finding; `validate_all` aggregates them so a caller sees the complete
//! defect list per run. R5, R6 and R7 need measured extents from the render
//! collaborator and are skipped without them. R9 exists for the fixer only
//! and is deliberately absent from `validate_all`.

use crate::error::{Rule, ValidationReport, Violation};
use crate::geom::{gap, overlaps, seg_rect_clip_length, Rect};
use crate::render::RenderExtents;
use crate::Diagram;

/// Minimum text-to-text and text-to-edge margin (R5, R6).
pub const MIN_MARGIN_MM: f64 = 2.0;
/// Minimum visible fraction of a rendered arrow path (R7).
pub const MIN_VISIBLE: f64 = 0.9;

/// Title band height measured from a container's top edge (R3).
const TITLE_ZONE_MM: f64 = 5.0;
/// Minimum clearance between the title band and a child's top edge (R3).
const TITLE_CLEARANCE_MM: f64 = 3.0;
/// Point size to mm, approximate (R4).
const PT_TO_MM: f64 = 0.35;

/// Vertical bias lifting labels off the arrow shaft.
const LABEL_BIAS_MM: f64 = 2.0;

/// R1: every container rectangle contains every child rectangle on all four
/// edges. Containers or children without positions are skipped.
pub(crate) fn container_violations(diagram: &Diagram) -> Vec<Violation> {
    let mut out = Vec::new();
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
            let mut edges = Vec::new();
            if ch.left < c.left {
                edges.push(format!("left edge ({:.1}) < container left ({:.1})", ch.left, c.left));
            }
            if ch.right > c.right {
                edges.push(format!(
                    "right edge ({:.1}) > container right ({:.1})",
                    ch.right, c.right
                ));
            }
            if ch.bottom < c.bottom {
                edges.push(format!(
                    "bottom edge ({:.1}) < container bottom ({:.1})",
                    ch.bottom, c.bottom
                ));
            }
            if ch.top > c.top {
                edges.push(format!("top edge ({:.1}) > container top ({:.1})", ch.top, c.top));
            }
            if !edges.is_empty() {
                out.push(Violation::new(
                    Rule::R1,
                    format!(
                        "child '{}' extends outside container '{}': {}",
                        child_id,
                        cid,
                        edges.join("; ")
                    ),
                ));
            }
        }
    }
    out
}

/// R2: no two box rectangles overlap. Containers are excluded.
pub(crate) fn overlap_violations(diagram: &Diagram) -> Vec<Violation> {
    let placed: Vec<(&str, Rect)> = diagram
        .boxes
        .keys()
        .filter_map(|id| diagram.positions.get(id).map(|p| (id.as_str(), p.rect())))
        .collect();
    let mut out = Vec::new();
    for i in 0..placed.len() {
        for j in (i + 1)..placed.len() {
            let (id_a, ra) = &placed[i];
            let (id_b, rb) = &placed[j];
            if overlaps(ra, rb) {
                out.push(Violation::new(
                    Rule::R2,
                    format!(
                        "boxes '{id_a}' and '{id_b}' overlap: \
                         '{id_a}' rect=({:.1},{:.1})-({:.1},{:.1}), \
                         '{id_b}' rect=({:.1},{:.1})-({:.1},{:.1})",
                        ra.left, ra.bottom, ra.right, ra.top, rb.left, rb.bottom, rb.right, rb.top
                    ),
                ));
            }
        }
    }
    out
}

/// R3 (warning): a child's top edge must clear the container's title band.
pub(crate) fn title_clearance_warnings(diagram: &Diagram) -> Vec<String> {
    let mut out = Vec::new();
    for (cid, container) in &diagram.containers {
        if container.title.is_none() {
            continue;
        }
        let Some(cpos) = diagram.positions.get(cid) else {
            continue;
        };
        let title_bottom = cpos.rect().top - TITLE_ZONE_MM;
        for child_id in &container.children {
            let Some(chpos) = diagram.positions.get(child_id) else {
                continue;
            };
            let clearance = title_bottom - chpos.rect().top;
            if clearance < TITLE_CLEARANCE_MM {
                out.push(format!(
                    "container '{cid}' title too close to child '{child_id}': \
                     gap={clearance:.1}mm (min={TITLE_CLEARANCE_MM}mm); \
                     increase container height or lower the child"
                ));
            }
        }
    }
    out
}

/// R4 (warning): estimated text-block height must fit the padded inner area.
/// Title 11pt, subtitle 9pt, content lines 8pt each.
pub(crate) fn text_fit_warnings(diagram: &Diagram) -> Vec<String> {
    let mut out = Vec::new();
    for (bid, spec) in &diagram.boxes {
        let Some(pos) = diagram.positions.get(bid) else {
            continue;
        };
        let inner_h = pos.height_mm - 2.0 * spec.padding_mm;
        let mut text_h = 11.0 * PT_TO_MM;
        if spec.subtitle.is_some() {
            text_h += 9.0 * PT_TO_MM;
        }
        text_h += spec.content.len() as f64 * 8.0 * PT_TO_MM;
        if text_h > inner_h {
            out.push(format!(
                "box '{bid}' text (~{text_h:.1}mm) exceeds inner height ({inner_h:.1}mm); \
                 increase box height or reduce content"
            ));
        }
    }
    out
}

/// R5/R6: minimum margins between rendered text bboxes, and between text
/// and any element edge the text is not inside. A text belongs to the box
/// whose rectangle contains its bbox center; pairs within the same box are
/// exempt, as is the edge of whichever element contains the text.
pub(crate) fn text_margin_violations(
    diagram: &Diagram,
    extents: &RenderExtents,
) -> Vec<Violation> {
    let mut out = Vec::new();
    if extents.text_entries.is_empty() {
        return out;
    }

    let element_rects: Vec<(&str, Rect)> = diagram
        .boxes
        .keys()
        .chain(diagram.containers.keys())
        .filter_map(|id| diagram.positions.get(id).map(|p| (id.as_str(), p.rect())))
        .collect();

    let owner_of = |bbox: &Rect| -> Option<&str> {
        let (cx, cy) = bbox.center();
        element_rects
            .iter()
            .find(|(id, r)| diagram.boxes.contains_key(*id) && r.contains(cx, cy))
            .map(|(id, _)| *id)
    };

    let entries: Vec<(&str, &Rect, Option<&str>)> = extents
        .text_entries
        .iter()
        .map(|e| (e.text.as_str(), &e.bbox, owner_of(&e.bbox)))
        .collect();

    // Text-to-text, skipping pairs owned by the same box.
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let (txt_a, bb_a, own_a) = &entries[i];
            let (txt_b, bb_b, own_b) = &entries[j];
            if own_a.is_some() && own_a == own_b {
                continue;
            }
            let g = gap(bb_a, bb_b);
            if g < MIN_MARGIN_MM {
                out.push(Violation::new(
                    Rule::R5,
                    format!(
                        "text margin violation: '{txt_a}' and '{txt_b}' \
                         gap={g:.1}mm (min={MIN_MARGIN_MM}mm)"
                    ),
                ));
            }
        }
    }

    // Text-to-edge, skipping elements the text sits inside.
    for (txt, bbox, _) in &entries {
        let (cx, cy) = bbox.center();
        for (eid, rect) in &element_rects {
            if rect.contains(cx, cy) {
                continue;
            }
            let g = gap(bbox, rect);
            if g < MIN_MARGIN_MM {
                out.push(Violation::new(
                    Rule::R6,
                    format!(
                        "text '{txt}' too close to '{eid}' edge: \
                         gap={g:.1}mm (min={MIN_MARGIN_MM}mm)"
                    ),
                ));
            }
        }
    }
    out
}

/// R7: per arrow, at least [`MIN_VISIBLE`] of the rendered path length must
/// stay clear of text bboxes and of boxes other than its own endpoints.
pub(crate) fn arrow_occlusion_violations(
    diagram: &Diagram,
    extents: &RenderExtents,
) -> Vec<Violation> {
    let mut out = Vec::new();

    let box_rects: Vec<(&str, Rect)> = diagram
        .boxes
        .keys()
        .filter_map(|id| diagram.positions.get(id).map(|p| (id.as_str(), p.rect())))
        .collect();

    for arrow in &diagram.arrows {
        let Some(points) = extents.polyline(&arrow.id) else {
            continue;
        };
        if points.len() < 2 {
            continue;
        }

        let mut total_len = 0.0;
        let mut occluded_len = 0.0;
        let mut occluders: Vec<String> = Vec::new();
        let mut note = |what: String| {
            if !occluders.contains(&what) {
                occluders.push(what);
            }
        };

        for seg in points.windows(2) {
            let (x0, y0) = seg[0];
            let (x1, y1) = seg[1];
            let seg_len = (x1 - x0).hypot(y1 - y0);
            total_len += seg_len;
            let (mx, my) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);

            // Text occlusion wins over box occlusion per segment.
            if let Some(entry) = extents
                .text_entries
                .iter()
                .find(|e| e.bbox.contains(mx, my))
            {
                occluded_len += seg_len;
                note(format!("text:'{}'", entry.text));
                continue;
            }
            for (bid, rect) in &box_rects {
                if *bid == arrow.source || *bid == arrow.target {
                    continue;
                }
                let clip = seg_rect_clip_length(x0, y0, x1, y1, rect);
                if clip > 0.0 {
                    occluded_len += clip;
                    note(format!("box:'{bid}'"));
                }
            }
        }

        if total_len < 1e-6 {
            continue;
        }
        let visible = 1.0 - occluded_len / total_len;
        if visible < MIN_VISIBLE {
            occluders.sort();
            out.push(Violation::new(
                Rule::R7,
                format!(
                    "'{}' visibility {:.0}% < {:.0}%; occluded by: {}",
                    arrow.id,
                    visible * 100.0,
                    MIN_VISIBLE * 100.0,
                    occluders.join(", ")
                ),
            ));
        }
    }
    out
}

/// Whether a curved, labeled arrow's computed label position falls on the
/// opposite side of the straight source-to-target line from the arc bulge.
/// Shared by R8 and the curve-sign fixer.
pub(crate) fn label_on_wrong_side(diagram: &Diagram, arrow: &crate::spec::ArrowSpec) -> bool {
    if arrow.curve == 0.0 || arrow.label.is_none() {
        return false;
    }
    let Some((start, end)) = diagram.resolved_endpoints(arrow) else {
        return false;
    };
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let dist = dx.hypot(dy);
    if dist < 1e-6 {
        return false;
    }

    let (lx, ly) = compute_arrow_label_position(start, end, arrow.curve, arrow.label_offset_mm);
    let (nx, ny) = (-dy / dist, dx / dist);
    let arc_side = (nx * arrow.curve, ny * arrow.curve);
    let mid = ((start.0 + end.0) / 2.0, (start.1 + end.1) / 2.0);
    let label_off = (lx - mid.0, ly - mid.1);

    label_off.0 * arc_side.0 + label_off.1 * arc_side.1 < 0.0
}

/// R8: a curved, labeled arrow's computed label position must lie on the
/// same side of the straight source-to-target line as the arc bulge.
pub(crate) fn label_side_violations(diagram: &Diagram) -> Vec<Violation> {
    let mut out = Vec::new();
    for arrow in &diagram.arrows {
        if label_on_wrong_side(diagram, arrow) {
            out.push(Violation::new(
                Rule::R8,
                format!(
                    "'{}' label '{}' is on the wrong side of the arc; \
                     flip the curve sign or adjust the label offset",
                    arrow.id,
                    arrow.label.as_deref().unwrap_or_default()
                ),
            ));
        }
    }
    out
}

/// R9: every placed element stays inside the canvas limits. Consumed by the
/// bounds fixer; never part of `validate_all`.
pub(crate) fn canvas_violations(diagram: &Diagram) -> Vec<Violation> {
    let (x_lo, x_hi) = diagram.canvas.xlim;
    let (y_lo, y_hi) = diagram.canvas.ylim;
    let mut out = Vec::new();
    for id in diagram.boxes.keys().chain(diagram.containers.keys()) {
        let Some(pos) = diagram.positions.get(id) else {
            continue;
        };
        let r = pos.rect();
        let mut edges = Vec::new();
        if r.left < x_lo {
            edges.push(format!("left={:.1}mm < xlim_lo={:.1}mm", r.left, x_lo));
        }
        if r.bottom < y_lo {
            edges.push(format!("bottom={:.1}mm < ylim_lo={:.1}mm", r.bottom, y_lo));
        }
        if r.right > x_hi {
            edges.push(format!("right={:.1}mm > xlim_hi={:.1}mm", r.right, x_hi));
        }
        if r.top > y_hi {
            edges.push(format!("top={:.1}mm > ylim_hi={:.1}mm", r.top, y_hi));
        }
        if !edges.is_empty() {
            out.push(Violation::new(
                Rule::R9,
                format!("'{}' extends outside canvas: {}", id, edges.join("; ")),
            ));
        }
    }
    out
}

/// Label center for an arrow between resolved anchor points.
///
/// Straight-line midpoint, plus the arc's peak deviation for curved arrows
/// (perpendicular unit normal times curve times half the distance, bulging
/// left of travel for positive curve), plus a fixed 2mm lift, plus any
/// manual offset.
pub fn compute_arrow_label_position(
    start: (f64, f64),
    end: (f64, f64),
    curve: f64,
    label_offset_mm: Option<(f64, f64)>,
) -> (f64, f64) {
    let mut x = (start.0 + end.0) / 2.0;
    let mut y = (start.1 + end.1) / 2.0;

    if curve != 0.0 {
        let dx = end.0 - start.0;
        let dy = end.1 - start.1;
        let dist = dx.hypot(dy);
        if dist > 0.0 {
            let (nx, ny) = (-dy / dist, dx / dist);
            x += nx * curve * dist * 0.5;
            y += ny * curve * dist * 0.5;
        }
    }

    y += LABEL_BIAS_MM;

    if let Some((ox, oy)) = label_offset_mm {
        x += ox;
        y += oy;
    }
    (x, y)
}

/// Run every applicable rule and aggregate error-level findings. R3/R4
/// findings are logged as warnings and never fail the run; R5-R7 run only
/// when render extents are supplied.
pub(crate) fn validate_all(
    diagram: &Diagram,
    extents: Option<&RenderExtents>,
) -> Result<(), ValidationReport> {
    let mut violations = Vec::new();
    violations.extend(container_violations(diagram));
    violations.extend(overlap_violations(diagram));
    violations.extend(label_side_violations(diagram));

    for warning in title_clearance_warnings(diagram) {
        log::warn!("R3: {warning}");
    }
    for warning in text_fit_warnings(diagram) {
        log::warn!("R4: {warning}");
    }

    if let Some(extents) = extents {
        violations.extend(text_margin_violations(diagram, extents));
        violations.extend(arrow_occlusion_violations(diagram, extents));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationReport::new(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TextEntry;
    use crate::spec::{ArrowSpec, BoxSpec, ContainerSpec, PositionSpec};
    use crate::Diagram;

    fn diagram() -> Diagram {
        Diagram::new(None, 170.0, Some(120.0))
    }

    #[test]
    fn container_rule_names_each_violated_edge() {
        let mut d = diagram();
        d.add_box(BoxSpec::new("a", "A").at(10.0, 60.0).size(40.0, 25.0))
            .unwrap();
        d.add_container(
            ContainerSpec::new("grp")
                .children(["a"])
                .at(60.0, 60.0)
                .size(30.0, 30.0),
        )
        .unwrap();

        let violations = container_violations(&d);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, Rule::R1);
        assert!(violations[0].message.contains("child 'a'"));
        assert!(violations[0].message.contains("left edge"));
    }

    #[test]
    fn overlap_rule_reports_both_ids_and_bounds() {
        let mut d = diagram();
        d.add_box(BoxSpec::new("a", "A").at(60.0, 60.0).size(40.0, 25.0))
            .unwrap();
        d.add_box(BoxSpec::new("b", "B").at(70.0, 60.0).size(40.0, 25.0))
            .unwrap();

        let violations = overlap_violations(&d);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("'a'"));
        assert!(violations[0].message.contains("'b'"));
        assert!(violations[0].message.contains("rect=("));
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let mut d = diagram();
        d.add_box(BoxSpec::new("a", "A").at(40.0, 60.0).size(40.0, 25.0))
            .unwrap();
        d.add_box(BoxSpec::new("b", "B").at(80.0, 60.0).size(40.0, 25.0))
            .unwrap();
        assert!(overlap_violations(&d).is_empty());
    }

    #[test]
    fn title_clearance_warns_when_child_reaches_band() {
        let mut d = diagram();
        d.add_box(BoxSpec::new("a", "A").at(60.0, 58.0).size(30.0, 20.0))
            .unwrap();
        // container top 75, title band bottom 70, child top 68: 2mm < 3mm
        d.add_container(
            ContainerSpec::new("grp")
                .title("Group")
                .children(["a"])
                .at(60.0, 55.0)
                .size(60.0, 40.0),
        )
        .unwrap();

        let warnings = title_clearance_warnings(&d);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("'grp'"));
    }

    #[test]
    fn text_fit_warns_on_overflowing_content() {
        let mut d = diagram();
        d.add_box(
            BoxSpec::new("a", "A")
                .content(["1", "2", "3", "4", "5", "6"])
                .at(60.0, 60.0)
                .size(40.0, 18.0),
        )
        .unwrap();
        // inner 8mm, text 11*0.35 + 6*8*0.35 = 20.65mm
        let warnings = text_fit_warnings(&d);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("box 'a'"));
    }

    #[test]
    fn same_box_text_pairs_are_exempt_from_margins() {
        let mut d = diagram();
        d.add_box(BoxSpec::new("a", "A").at(60.0, 60.0).size(40.0, 25.0))
            .unwrap();
        let extents = RenderExtents {
            text_entries: vec![
                TextEntry::new("title", Rect::new(50.0, 60.0, 70.0, 64.0)),
                TextEntry::new("subtitle", Rect::new(50.0, 55.0, 70.0, 59.0)),
            ],
            arrow_polylines: Vec::new(),
        };
        assert!(text_margin_violations(&d, &extents).is_empty());
    }

    #[test]
    fn crowded_foreign_text_violates_r5() {
        let mut d = diagram();
        d.add_box(BoxSpec::new("a", "A").at(30.0, 60.0).size(20.0, 10.0))
            .unwrap();
        let extents = RenderExtents {
            text_entries: vec![
                TextEntry::new("inside", Rect::new(25.0, 58.0, 35.0, 62.0)),
                TextEntry::new("floating", Rect::new(36.0, 58.0, 46.0, 62.0)),
            ],
            arrow_polylines: Vec::new(),
        };
        let violations = text_margin_violations(&d, &extents);
        assert!(violations.iter().any(|v| v.rule == Rule::R5));
    }

    #[test]
    fn text_near_foreign_edge_violates_r6() {
        let mut d = diagram();
        d.add_box(BoxSpec::new("a", "A").at(30.0, 60.0).size(20.0, 10.0))
            .unwrap();
        // outside the box, 1mm from its right edge
        let extents = RenderExtents {
            text_entries: vec![TextEntry::new("close", Rect::new(41.0, 58.0, 51.0, 62.0))],
            arrow_polylines: Vec::new(),
        };
        let violations = text_margin_violations(&d, &extents);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, Rule::R6);
        assert!(violations[0].message.contains("'a'"));
    }

    #[test]
    fn arrow_through_text_violates_r7() {
        let mut d = diagram();
        d.add_box(BoxSpec::new("a", "A").at(10.0, 60.0).size(10.0, 10.0))
            .unwrap();
        d.add_box(BoxSpec::new("b", "B").at(110.0, 60.0).size(10.0, 10.0))
            .unwrap();
        d.add_arrow(ArrowSpec::new("a", "b")).unwrap();
        // text covers 20 of 100mm of the path
        let extents = RenderExtents {
            text_entries: vec![TextEntry::new("blocker", Rect::new(50.0, 55.0, 70.0, 65.0))],
            arrow_polylines: vec![(
                "arrow:a->b".to_string(),
                (0..=100).map(|i| (10.0 + i as f64, 60.0)).collect(),
            )],
        };
        let violations = arrow_occlusion_violations(&d, &extents);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("text:'blocker'"));
    }

    #[test]
    fn arrow_clipped_by_intermediate_box_violates_r7() {
        let mut d = diagram();
        d.add_box(BoxSpec::new("a", "A").at(10.0, 60.0).size(10.0, 10.0))
            .unwrap();
        d.add_box(BoxSpec::new("mid", "M").at(60.0, 60.0).size(30.0, 20.0))
            .unwrap();
        d.add_box(BoxSpec::new("b", "B").at(110.0, 60.0).size(10.0, 10.0))
            .unwrap();
        d.add_arrow(ArrowSpec::new("a", "b")).unwrap();
        let extents = RenderExtents {
            text_entries: Vec::new(),
            arrow_polylines: vec![(
                "arrow:a->b".to_string(),
                vec![(15.0, 60.0), (105.0, 60.0)],
            )],
        };
        let violations = arrow_occlusion_violations(&d, &extents);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("box:'mid'"));
    }

    #[test]
    fn endpoint_boxes_never_occlude_their_own_arrow() {
        let mut d = diagram();
        d.add_box(BoxSpec::new("a", "A").at(30.0, 60.0).size(40.0, 25.0))
            .unwrap();
        d.add_box(BoxSpec::new("b", "B").at(120.0, 60.0).size(40.0, 25.0))
            .unwrap();
        d.add_arrow(ArrowSpec::new("a", "b")).unwrap();
        // path center-to-center crosses both endpoint boxes
        let extents = RenderExtents {
            text_entries: Vec::new(),
            arrow_polylines: vec![(
                "arrow:a->b".to_string(),
                vec![(30.0, 60.0), (120.0, 60.0)],
            )],
        };
        assert!(arrow_occlusion_violations(&d, &extents).is_empty());
    }

    #[test]
    fn label_position_bulges_left_of_travel() {
        let (x, y) = compute_arrow_label_position((0.0, 0.0), (10.0, 0.0), 1.0, None);
        assert!((x - 5.0).abs() < 1e-9);
        assert!((y - 7.0).abs() < 1e-9);
    }

    #[test]
    fn straight_label_sits_at_biased_midpoint() {
        let (x, y) = compute_arrow_label_position((0.0, 0.0), (10.0, 10.0), 0.0, Some((1.0, -1.0)));
        assert!((x - 6.0).abs() < 1e-9);
        assert!((y - 6.0).abs() < 1e-9);
    }

    #[test]
    fn canvas_rule_reports_each_escaping_edge() {
        let mut d = diagram();
        d.add_box(BoxSpec::new("a", "A").at(160.0, 60.0).size(40.0, 25.0))
            .unwrap();
        let violations = canvas_violations(&d);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("right=180.0mm"));
    }

    #[test]
    fn validate_all_aggregates_across_rules() {
        let mut d = diagram();
        d.add_box(BoxSpec::new("a", "A").at(60.0, 60.0).size(40.0, 25.0))
            .unwrap();
        d.add_box(BoxSpec::new("b", "B").at(65.0, 60.0).size(40.0, 25.0))
            .unwrap();
        d.add_container(
            ContainerSpec::new("grp")
                .children(["a"])
                .at(130.0, 60.0)
                .size(20.0, 20.0),
        )
        .unwrap();

        let report = validate_all(&d, None).unwrap_err();
        assert_eq!(report.len(), 2);
        assert!(report.violations.iter().any(|v| v.rule == Rule::R1));
        assert!(report.violations.iter().any(|v| v.rule == Rule::R2));
    }

    #[test]
    fn validate_all_ignores_canvas_escapes() {
        let mut d = diagram();
        d.add_box(BoxSpec::new("a", "A").at(200.0, 60.0).size(40.0, 25.0))
            .unwrap();
        assert!(validate_all(&d, None).is_ok());
        assert_eq!(canvas_violations(&d).len(), 1);
    }
}
