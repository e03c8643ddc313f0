//! Serialization round-trips through the flat state form.

use pretty_assertions::assert_eq;
use schematic::{
    Anchor, ArrowSpec, BoxSpec, ContainerSpec, Diagram, DiagramState, Emphasis, LayoutOptions,
    DEFAULT_FIX_PASSES,
};

fn sample() -> Diagram {
    let mut d = Diagram::new(Some("Data Flow"), 170.0, Some(120.0));
    d.add_box(
        BoxSpec::new("load", "Load")
            .subtitle("from disk")
            .content(["csv", "parquet"])
            .emphasis(Emphasis::Primary),
    )
    .unwrap();
    d.add_box(BoxSpec::new("clean", "Clean")).unwrap();
    d.add_box(BoxSpec::new("train", "Train")).unwrap();
    d.add_container(ContainerSpec::new("prep").title("Preparation").children(["load", "clean"]))
        .unwrap();
    d.add_arrow(
        ArrowSpec::new("load", "clean")
            .label("rows")
            .anchors(Anchor::Right, Anchor::Left),
    )
    .unwrap();
    d.add_arrow(ArrowSpec::new("clean", "train").curve(0.3)).unwrap();
    d
}

#[test]
fn snapshot_survives_json_round_trip() {
    let mut d = sample();
    d.auto_layout(&LayoutOptions::default());
    d.auto_fix(DEFAULT_FIX_PASSES);

    let state = d.to_state();
    let json = serde_json::to_string_pretty(&state).unwrap();
    let back: DiagramState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}

#[test]
fn rebuilt_diagram_matches_the_original() {
    let mut d = sample();
    d.auto_layout(&LayoutOptions::default());
    d.auto_fix(DEFAULT_FIX_PASSES);

    let restored = Diagram::from_state(d.to_state()).unwrap();
    assert_eq!(restored.title(), d.title());
    assert_eq!(restored.canvas(), d.canvas());
    assert_eq!(restored.positions(), d.positions());
    assert_eq!(restored.arrows(), d.arrows());
}

#[test]
fn expanded_canvas_limits_are_preserved() {
    let mut d = Diagram::new(None, 170.0, Some(120.0));
    d.add_box(BoxSpec::new("a", "A").at(180.0, 130.0).size(40.0, 25.0))
        .unwrap();
    d.fix_canvas_bounds();
    assert!(d.canvas().xlim.1 > 170.0);
    assert!(d.canvas().ylim.1 > 120.0);

    let mut restored = Diagram::from_state(d.to_state()).unwrap();
    assert_eq!(restored.canvas(), d.canvas());
    assert_eq!(restored.fix_canvas_bounds(), 0);
}

#[test]
fn state_from_foreign_json_fills_defaults() {
    let json = r#"{
        "title": "Minimal",
        "width_mm": 170.0,
        "height_mm": 120.0,
        "xlim": [0.0, 170.0],
        "ylim": [0.0, 120.0],
        "boxes": [{"id": "a", "title": "A"}],
        "arrows": [{"id": "x", "source": "a", "target": "a"}]
    }"#;
    let state: DiagramState = serde_json::from_str(json).unwrap();
    assert_eq!(state.boxes[0].padding_mm, 5.0);
    assert_eq!(state.arrows[0].linewidth_mm, 0.5);

    let d = Diagram::from_state(state).unwrap();
    assert_eq!(d.title(), Some("Minimal"));
    assert!(d.position("a").is_none());
}
