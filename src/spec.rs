//! Element specifications and the closed enums behind them.
//!
//! Specs are what the builder API stores; positions live separately in the
//! diagram's position store. Shape and emphasis are cosmetic categories only
//! and never influence layout.

use serde::{Deserialize, Serialize};

use crate::geom::Rect;

/// Center position and size of one element, in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSpec {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PositionSpec {
    pub fn new(x_mm: f64, y_mm: f64, width_mm: f64, height_mm: f64) -> Self {
        Self {
            x_mm,
            y_mm,
            width_mm,
            height_mm,
        }
    }

    /// Edge rectangle of this position.
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.x_mm, self.y_mm, self.width_mm, self.height_mm)
    }
}

/// Cosmetic semantic category of a box or container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    #[default]
    Normal,
    Primary,
    Success,
    Warning,
    Muted,
}

/// Box outline shape. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Box,
    #[default]
    Rounded,
    Stadium,
}

/// Arrow line style. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Named attachment point on a rectangle's perimeter.
///
/// `Auto` resolves per arrow from the dominant axis of the source-to-target
/// delta (right/left for mostly-horizontal arrows, top/bottom otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    #[default]
    Auto,
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    /// Fractional (0-1) coordinates of the anchor on a box, or `None` for
    /// `Auto`, which has no fixed location.
    pub fn fraction(&self) -> Option<(f64, f64)> {
        match self {
            Anchor::Auto => None,
            Anchor::Center => Some((0.5, 0.5)),
            Anchor::Top => Some((0.5, 1.0)),
            Anchor::Bottom => Some((0.5, 0.0)),
            Anchor::Left => Some((0.0, 0.5)),
            Anchor::Right => Some((1.0, 0.5)),
            Anchor::TopLeft => Some((0.0, 1.0)),
            Anchor::TopRight => Some((1.0, 1.0)),
            Anchor::BottomLeft => Some((0.0, 0.0)),
            Anchor::BottomRight => Some((1.0, 0.0)),
        }
    }
}

/// Stacking direction of a container's children in flex mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

/// Specification for a rich text box.
///
/// The `at`/`size` builder methods are placement hints consumed by
/// [`Diagram::add_box`](crate::Diagram::add_box); they are not part of the
/// serialized spec (resolved positions are dumped separately).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub content: Vec<String>,
    #[serde(default)]
    pub emphasis: Emphasis,
    #[serde(default)]
    pub shape: Shape,
    #[serde(default = "default_box_padding")]
    pub padding_mm: f64,
    #[serde(default)]
    pub margin_mm: f64,
    #[serde(skip)]
    pub(crate) placement: Placement,
}

fn default_box_padding() -> f64 {
    5.0
}

impl BoxSpec {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            content: Vec::new(),
            emphasis: Emphasis::Normal,
            shape: Shape::Rounded,
            padding_mm: 5.0,
            margin_mm: 0.0,
            placement: Placement::default(),
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn content<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn padding_mm(mut self, padding_mm: f64) -> Self {
        self.padding_mm = padding_mm;
        self
    }

    pub fn margin_mm(mut self, margin_mm: f64) -> Self {
        self.margin_mm = margin_mm;
        self
    }

    /// Place the box center explicitly at (x, y) mm.
    pub fn at(mut self, x_mm: f64, y_mm: f64) -> Self {
        self.placement.x_mm = Some(x_mm);
        self.placement.y_mm = Some(y_mm);
        self
    }

    /// Give the box an explicit size. Height may be omitted to have it
    /// estimated from the text content.
    pub fn size(mut self, width_mm: f64, height_mm: impl Into<Option<f64>>) -> Self {
        self.placement.width_mm = Some(width_mm);
        self.placement.height_mm = height_mm.into();
        self
    }
}

/// Specification for a container grouping boxes (and other containers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default = "default_container_emphasis")]
    pub emphasis: Emphasis,
    #[serde(default)]
    pub direction: FlexDirection,
    #[serde(default = "default_container_gap")]
    pub gap_mm: f64,
    #[serde(default = "default_container_padding")]
    pub padding_mm: f64,
    #[serde(skip)]
    pub(crate) placement: Placement,
}

fn default_container_emphasis() -> Emphasis {
    Emphasis::Muted
}

fn default_container_gap() -> f64 {
    8.0
}

fn default_container_padding() -> f64 {
    8.0
}

impl ContainerSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            children: Vec::new(),
            emphasis: Emphasis::Muted,
            direction: FlexDirection::Row,
            gap_mm: 8.0,
            padding_mm: 8.0,
            placement: Placement::default(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn children<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    pub fn direction(mut self, direction: FlexDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn gap_mm(mut self, gap_mm: f64) -> Self {
        self.gap_mm = gap_mm;
        self
    }

    pub fn padding_mm(mut self, padding_mm: f64) -> Self {
        self.padding_mm = padding_mm;
        self
    }

    pub fn at(mut self, x_mm: f64, y_mm: f64) -> Self {
        self.placement.x_mm = Some(x_mm);
        self.placement.y_mm = Some(y_mm);
        self
    }

    pub fn size(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.placement.width_mm = Some(width_mm);
        self.placement.height_mm = Some(height_mm);
        self
    }
}

/// Specification for an arrow connecting two elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowSpec {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub source_anchor: Anchor,
    #[serde(default)]
    pub target_anchor: Anchor,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub style: ArrowStyle,
    #[serde(default)]
    pub color: Option<String>,
    /// Signed curvature. Positive bulges to the left of source-to-target
    /// travel; 0 is a straight line.
    #[serde(default)]
    pub curve: f64,
    #[serde(default = "default_linewidth")]
    pub linewidth_mm: f64,
    /// Manual (dx, dy) nudge applied to the computed label position.
    #[serde(default)]
    pub label_offset_mm: Option<(f64, f64)>,
}

fn default_linewidth() -> f64 {
    0.5
}

impl ArrowSpec {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("arrow:{source}->{target}"),
            source,
            target,
            source_anchor: Anchor::Auto,
            target_anchor: Anchor::Auto,
            label: None,
            style: ArrowStyle::Solid,
            color: None,
            curve: 0.0,
            linewidth_mm: 0.5,
            label_offset_mm: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn anchors(mut self, source: Anchor, target: Anchor) -> Self {
        self.source_anchor = source;
        self.target_anchor = target;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn style(mut self, style: ArrowStyle) -> Self {
        self.style = style;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn curve(mut self, curve: f64) -> Self {
        self.curve = curve;
        self
    }

    pub fn linewidth_mm(mut self, linewidth_mm: f64) -> Self {
        self.linewidth_mm = linewidth_mm;
        self
    }

    pub fn label_offset_mm(mut self, dx: f64, dy: f64) -> Self {
        self.label_offset_mm = Some((dx, dy));
        self
    }
}

/// Placement hints carried on a spec until `add_box`/`add_container` moves
/// them into the position store.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Placement {
    pub x_mm: Option<f64>,
    pub y_mm: Option<f64>,
    pub width_mm: Option<f64>,
    pub height_mm: Option<f64>,
}

/// Canvas limits in mm. `xlim`/`ylim` may extend beyond `(0, width/height)`
/// after auto-layout or the bounds fixer expand them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width_mm: f64,
    pub height_mm: f64,
    pub xlim: (f64, f64),
    pub ylim: (f64, f64),
}

impl Canvas {
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
            xlim: (0.0, width_mm),
            ylim: (0.0, height_mm),
        }
    }
}
