//! Force-directed and circular layouts.
//!
//! The force-directed path delegates to any [`GraphLayouter`]; a basic
//! spring/repulsion implementation ships as the fallback. Whatever the
//! layouter returns is affine-rescaled into the destination rectangle with
//! independent x/y scale factors, so non-uniform distortion is accepted.

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, TAU};

use indexmap::IndexMap;

/// A node-placement routine in arbitrary coordinates. Implementations only
/// need relative geometry to be sensible; this module handles fitting the
/// result into the canvas.
pub trait GraphLayouter {
    fn layout(
        &self,
        nodes: &[String],
        edges: &[(String, String)],
    ) -> HashMap<String, (f64, f64)>;
}

/// Built-in spring/repulsion fallback.
///
/// Deterministic: nodes start on a unit circle in input order, then a fixed
/// number of attraction/repulsion rounds with linear cooling. A heuristic,
/// not a physical simulation.
#[derive(Debug, Clone)]
pub struct SpringLayouter {
    pub iterations: usize,
}

impl Default for SpringLayouter {
    fn default() -> Self {
        Self { iterations: 100 }
    }
}

impl GraphLayouter for SpringLayouter {
    fn layout(
        &self,
        nodes: &[String],
        edges: &[(String, String)],
    ) -> HashMap<String, (f64, f64)> {
        let n = nodes.len();
        if n == 0 {
            return HashMap::new();
        }
        let index: HashMap<&str, usize> =
            nodes.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();
        let edge_idx: Vec<(usize, usize)> = edges
            .iter()
            .filter_map(|(a, b)| {
                let (ia, ib) = (index.get(a.as_str())?, index.get(b.as_str())?);
                (ia != ib).then_some((*ia, *ib))
            })
            .collect();

        let mut pos: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let angle = TAU * i as f64 / n as f64;
                (angle.cos(), angle.sin())
            })
            .collect();

        // Ideal edge length for a unit-area-per-node spread.
        let k = (1.0 / n as f64).sqrt();
        let mut temperature = 0.1;
        let cooling = temperature / (self.iterations + 1) as f64;

        for _ in 0..self.iterations {
            let mut disp = vec![(0.0_f64, 0.0_f64); n];

            // Pairwise repulsion: k^2 / d.
            for i in 0..n {
                for j in (i + 1)..n {
                    let dx = pos[i].0 - pos[j].0;
                    let dy = pos[i].1 - pos[j].1;
                    let d = (dx * dx + dy * dy).sqrt().max(1e-6);
                    let force = k * k / d;
                    let (fx, fy) = (dx / d * force, dy / d * force);
                    disp[i].0 += fx;
                    disp[i].1 += fy;
                    disp[j].0 -= fx;
                    disp[j].1 -= fy;
                }
            }

            // Edge attraction: d^2 / k.
            for &(a, b) in &edge_idx {
                let dx = pos[a].0 - pos[b].0;
                let dy = pos[a].1 - pos[b].1;
                let d = (dx * dx + dy * dy).sqrt().max(1e-6);
                let force = d * d / k;
                let (fx, fy) = (dx / d * force, dy / d * force);
                disp[a].0 -= fx;
                disp[a].1 -= fy;
                disp[b].0 += fx;
                disp[b].1 += fy;
            }

            for i in 0..n {
                let (dx, dy) = disp[i];
                let d = (dx * dx + dy * dy).sqrt();
                if d > 1e-12 {
                    let step = d.min(temperature);
                    pos[i].0 += dx / d * step;
                    pos[i].1 += dy / d * step;
                }
            }
            temperature = (temperature - cooling).max(1e-4);
        }

        nodes
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), pos[i]))
            .collect()
    }
}

/// Rescale arbitrary-coordinate positions into the destination rectangle.
/// X and y scale independently; a degenerate axis collapses to its midpoint.
pub fn scale_into(
    raw: &HashMap<String, (f64, f64)>,
    order: &[String],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) -> IndexMap<String, (f64, f64)> {
    let mut out = IndexMap::new();
    if raw.is_empty() {
        return out;
    }
    let xs: Vec<f64> = raw.values().map(|p| p.0).collect();
    let ys: Vec<f64> = raw.values().map(|p| p.1).collect();
    let (cur_x_min, cur_x_max) = (
        xs.iter().cloned().fold(f64::INFINITY, f64::min),
        xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
    );
    let (cur_y_min, cur_y_max) = (
        ys.iter().cloned().fold(f64::INFINITY, f64::min),
        ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
    );

    let x_span = cur_x_max - cur_x_min;
    let y_span = cur_y_max - cur_y_min;
    for id in order {
        let Some(&(x, y)) = raw.get(id) else { continue };
        let nx = if x_span > 0.0 {
            x_min + (x - cur_x_min) * (x_max - x_min) / x_span
        } else {
            (x_min + x_max) / 2.0
        };
        let ny = if y_span > 0.0 {
            y_min + (y - cur_y_min) * (y_max - y_min) / y_span
        } else {
            (y_min + y_max) / 2.0
        };
        out.insert(id.clone(), (nx, ny));
    }
    out
}

/// Place ids evenly on a circle: radius 0.8 x min(width, height) / 2,
/// starting at -90 degrees and proceeding clockwise. Edges are ignored.
pub fn circular_positions(
    box_ids: &[String],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) -> IndexMap<String, (f64, f64)> {
    let n = box_ids.len();
    let mut out = IndexMap::new();
    if n == 0 {
        return out;
    }
    let cx = (x_min + x_max) / 2.0;
    let cy = (y_min + y_max) / 2.0;
    let radius = (x_max - x_min).min(y_max - y_min) / 2.0 * 0.8;
    for (i, id) in box_ids.iter().enumerate() {
        let angle = -FRAC_PI_2 - TAU * i as f64 / n as f64;
        out.insert(id.clone(), (cx + radius * angle.cos(), cy + radius * angle.sin()));
    }
    out
}
