//! Flat serialized form of a diagram.
//!
//! Everything a session produced round-trips: specs, resolved positions and
//! the canvas limits, including limits expanded by auto-layout or the bounds
//! fixer. The shape is plain primitives and maps so any serde format works.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::spec::{ArrowSpec, BoxSpec, Canvas, ContainerSpec, PositionSpec};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramState {
    #[serde(default)]
    pub title: Option<String>,
    pub width_mm: f64,
    pub height_mm: f64,
    pub xlim: (f64, f64),
    pub ylim: (f64, f64),
    #[serde(default)]
    pub boxes: Vec<BoxSpec>,
    #[serde(default)]
    pub containers: Vec<ContainerSpec>,
    #[serde(default)]
    pub arrows: Vec<ArrowSpec>,
    #[serde(default)]
    pub positions: IndexMap<String, PositionSpec>,
}

impl DiagramState {
    pub(crate) fn canvas(&self) -> Canvas {
        Canvas {
            width_mm: self.width_mm,
            height_mm: self.height_mm,
            xlim: self.xlim,
            ylim: self.ylim,
        }
    }
}
