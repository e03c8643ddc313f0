//! Rectangle and segment primitives on the millimeter canvas.
//!
//! Everything here is a pure, total function: degenerate inputs (zero-size
//! rectangles, zero-length segments) return 0 instead of erroring.

/// An axis-aligned rectangle in mm, stored as edge coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Rect {
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Build a rectangle from a center point and full width/height.
    pub fn from_center(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            left: x - width / 2.0,
            bottom: y - height / 2.0,
            right: x + width / 2.0,
            top: y + height / 2.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.left + self.right) / 2.0,
            (self.bottom + self.top) / 2.0,
        )
    }

    /// Point containment, edges included.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.left <= x && x <= self.right && self.bottom <= y && y <= self.top
    }

    /// True when `other` lies entirely inside `self` (edge contact allowed).
    pub fn encloses(&self, other: &Rect) -> bool {
        self.left <= other.left
            && other.right <= self.right
            && self.bottom <= other.bottom
            && other.top <= self.top
    }
}

/// Strict open-interval overlap test: rectangles that merely touch along an
/// edge or corner do not overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.left < b.right && b.left < a.right && a.bottom < b.top && b.bottom < a.top
}

/// Area of the intersection of two rectangles, 0 when disjoint.
pub fn overlap_area(a: &Rect, b: &Rect) -> f64 {
    let w = a.right.min(b.right) - a.left.max(b.left);
    let h = a.top.min(b.top) - a.bottom.max(b.bottom);
    if w > 0.0 && h > 0.0 {
        w * h
    } else {
        0.0
    }
}

/// Signed minimum separation between two rectangles.
///
/// Positive: the shortest distance between their boundaries. Negative: the
/// rectangles overlap, and the magnitude is the smaller of the two axis
/// penetrations (the cheapest push that would separate them).
pub fn gap(a: &Rect, b: &Rect) -> f64 {
    let gx = (b.left - a.right).max(a.left - b.right);
    let gy = (b.bottom - a.top).max(a.bottom - b.top);
    if gx > 0.0 && gy > 0.0 {
        (gx * gx + gy * gy).sqrt()
    } else if gx > 0.0 {
        gx
    } else if gy > 0.0 {
        gy
    } else {
        gx.max(gy)
    }
}

/// Length of the portion of segment (x0,y0)-(x1,y1) that lies inside `rect`,
/// computed with Liang-Barsky parametric clipping.
///
/// Used to measure how much of an arrow path is hidden behind a text box.
/// A zero-length segment yields 0.
pub fn seg_rect_clip_length(x0: f64, y0: f64, x1: f64, y1: f64, rect: &Rect) -> f64 {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-12 {
        return 0.0;
    }

    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    // (p, q) per clip edge: p < 0 entering, p > 0 leaving, p == 0 parallel.
    let checks = [
        (-dx, x0 - rect.left),
        (dx, rect.right - x0),
        (-dy, y0 - rect.bottom),
        (dy, rect.top - y0),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return 0.0; // parallel and outside
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return 0.0;
            }
            if r > t0 {
                t0 = r;
            }
        } else {
            if r < t0 {
                return 0.0;
            }
            if r < t1 {
                t1 = r;
            }
        }
    }
    (t1 - t0).max(0.0) * len
}
