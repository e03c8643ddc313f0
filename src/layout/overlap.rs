//! Iterative pairwise overlap resolution.
//!
//! O(passes x n^2); fine for the tens of boxes a schematic figure holds,
//! a scaling limit beyond that.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::spec::PositionSpec;

/// Pass budget before giving up (best effort, never an error).
pub const DEFAULT_MAX_PASSES: usize = 50;

/// Extra separation beyond the exact overlap so a push is not immediately
/// re-detected on the next pass.
const PUSH_EPSILON_MM: f64 = 0.1;

/// Push overlapping boxes apart until a pass makes zero moves or the pass
/// budget runs out. Returns the number of individual pushes applied.
///
/// Half-extents are inflated by `(gap + margin_a + margin_b) / 2` per box;
/// when both axis overlaps are positive the pair separates along the axis
/// with the smaller overlap, half each way, and every moved center is then
/// clamped so the full rectangle stays inside the given bounds.
#[allow(clippy::too_many_arguments)]
pub fn resolve_overlaps(
    positions: &mut IndexMap<String, PositionSpec>,
    box_ids: &[String],
    margins: &HashMap<String, f64>,
    gap: f64,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    max_passes: usize,
) -> usize {
    let ids: Vec<&String> = box_ids
        .iter()
        .filter(|id| positions.contains_key(id.as_str()))
        .collect();
    if ids.len() < 2 {
        return 0;
    }

    let clamp = |pos: &mut PositionSpec| {
        pos.x_mm = pos
            .x_mm
            .max(x_min + pos.width_mm / 2.0)
            .min(x_max - pos.width_mm / 2.0);
        pos.y_mm = pos
            .y_mm
            .max(y_min + pos.height_mm / 2.0)
            .min(y_max - pos.height_mm / 2.0);
    };

    let mut moves = 0;
    for _ in 0..max_passes {
        let mut moved = false;

        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let (id1, id2) = (ids[i].as_str(), ids[j].as_str());
                let mut p1 = positions[id1];
                let mut p2 = positions[id2];
                let margin1 = margins.get(id1).copied().unwrap_or(0.0);
                let margin2 = margins.get(id2).copied().unwrap_or(0.0);

                let total_gap = gap + margin1 + margin2;
                let half_w = (p1.width_mm + p2.width_mm) / 2.0 + total_gap;
                let half_h = (p1.height_mm + p2.height_mm) / 2.0 + total_gap;

                let dx = p2.x_mm - p1.x_mm;
                let dy = p2.y_mm - p1.y_mm;
                let overlap_x = half_w - dx.abs();
                let overlap_y = half_h - dy.abs();
                if overlap_x <= 0.0 || overlap_y <= 0.0 {
                    continue;
                }
                moved = true;
                moves += 1;

                if overlap_x < overlap_y {
                    let push = overlap_x / 2.0 + PUSH_EPSILON_MM;
                    if dx >= 0.0 {
                        p1.x_mm -= push;
                        p2.x_mm += push;
                    } else {
                        p1.x_mm += push;
                        p2.x_mm -= push;
                    }
                } else {
                    let push = overlap_y / 2.0 + PUSH_EPSILON_MM;
                    if dy >= 0.0 {
                        p1.y_mm -= push;
                        p2.y_mm += push;
                    } else {
                        p1.y_mm += push;
                        p2.y_mm -= push;
                    }
                }

                clamp(&mut p1);
                clamp(&mut p2);
                positions[id1] = p1;
                positions[id2] = p2;
            }
        }

        if !moved {
            break;
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::overlaps;

    fn store(entries: &[(&str, f64, f64, f64, f64)]) -> IndexMap<String, PositionSpec> {
        entries
            .iter()
            .map(|(id, x, y, w, h)| (id.to_string(), PositionSpec::new(*x, *y, *w, *h)))
            .collect()
    }

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn coincident_boxes_separate() {
        let mut positions = store(&[("a", 60.0, 60.0, 40.0, 25.0), ("b", 60.0, 60.0, 40.0, 25.0)]);
        let box_ids = ids(&["a", "b"]);
        let moves = resolve_overlaps(
            &mut positions,
            &box_ids,
            &HashMap::new(),
            3.0,
            0.0,
            170.0,
            0.0,
            120.0,
            DEFAULT_MAX_PASSES,
        );
        assert!(moves > 0);
        assert!(!overlaps(&positions["a"].rect(), &positions["b"].rect()));
    }

    #[test]
    fn separated_boxes_are_untouched() {
        let mut positions = store(&[("a", 30.0, 60.0, 40.0, 25.0), ("b", 130.0, 60.0, 40.0, 25.0)]);
        let before_a = positions["a"];
        let box_ids = ids(&["a", "b"]);
        let moves = resolve_overlaps(
            &mut positions,
            &box_ids,
            &HashMap::new(),
            3.0,
            0.0,
            170.0,
            0.0,
            120.0,
            DEFAULT_MAX_PASSES,
        );
        assert_eq!(moves, 0);
        assert_eq!(positions["a"], before_a);
    }

    #[test]
    fn results_stay_within_bounds() {
        let mut positions = store(&[
            ("a", 85.0, 60.0, 60.0, 40.0),
            ("b", 85.0, 60.0, 60.0, 40.0),
            ("c", 85.0, 60.0, 60.0, 40.0),
        ]);
        let box_ids = ids(&["a", "b", "c"]);
        resolve_overlaps(
            &mut positions,
            &box_ids,
            &HashMap::new(),
            3.0,
            0.0,
            170.0,
            0.0,
            120.0,
            DEFAULT_MAX_PASSES,
        );
        for pos in positions.values() {
            let r = pos.rect();
            assert!(r.left >= -1e-9 && r.right <= 170.0 + 1e-9);
            assert!(r.bottom >= -1e-9 && r.top <= 120.0 + 1e-9);
        }
    }

    #[test]
    fn per_box_margins_widen_separation() {
        let mut positions = store(&[("a", 50.0, 60.0, 40.0, 25.0), ("b", 95.0, 60.0, 40.0, 25.0)]);
        let mut margins = HashMap::new();
        margins.insert("a".to_string(), 10.0);
        margins.insert("b".to_string(), 10.0);
        let box_ids = ids(&["a", "b"]);
        // centers 45mm apart: no raw overlap, but gap 3 + margins 20 exceeds the 5mm slack
        let moves = resolve_overlaps(
            &mut positions,
            &box_ids,
            &margins,
            3.0,
            0.0,
            300.0,
            0.0,
            120.0,
            DEFAULT_MAX_PASSES,
        );
        assert!(moves > 0);
        assert!((positions["b"].x_mm - positions["a"].x_mm) > 45.0);
    }
}
