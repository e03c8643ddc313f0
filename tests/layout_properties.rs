//! End-to-end properties of the layout and fix pipeline.

use schematic::geom::overlaps;
use schematic::layout::flow::distribute;
use schematic::{
    ArrowSpec, BoxSpec, ContainerSpec, Diagram, FlowDirection, Justify, Layout, LayoutOptions,
    PositionSpec, DEFAULT_FIX_PASSES,
};

fn chain(ids: &[&str], arrows: &[(&str, &str)]) -> Diagram {
    let mut d = Diagram::new(None, 170.0, Some(120.0));
    for id in ids {
        d.add_box(BoxSpec::new(*id, id.to_uppercase())).unwrap();
    }
    for (src, tgt) in arrows {
        d.add_arrow(ArrowSpec::new(*src, *tgt)).unwrap();
    }
    d
}

#[test]
fn no_box_pair_overlaps_after_layout_and_fix() {
    let mut d = chain(
        &["a", "b", "c", "d"],
        &[("a", "b"), ("b", "c"), ("c", "d")],
    );
    d.auto_layout(&LayoutOptions::default());
    d.auto_fix(DEFAULT_FIX_PASSES);

    let ids = ["a", "b", "c", "d"];
    for i in 0..ids.len() {
        for j in (i + 1)..ids.len() {
            let ra = d.position(ids[i]).unwrap().rect();
            let rb = d.position(ids[j]).unwrap().rect();
            assert!(!overlaps(&ra, &rb), "{} and {} overlap", ids[i], ids[j]);
        }
    }
}

#[test]
fn containers_enclose_children_after_fix() {
    let mut d = Diagram::new(None, 170.0, Some(120.0));
    d.add_box(BoxSpec::new("a", "A").at(40.0, 60.0).size(40.0, 25.0))
        .unwrap();
    d.add_box(BoxSpec::new("b", "B").at(95.0, 60.0).size(40.0, 25.0))
        .unwrap();
    d.add_container(
        ContainerSpec::new("grp")
            .title("Group")
            .children(["a", "b"])
            .at(60.0, 60.0)
            .size(30.0, 30.0),
    )
    .unwrap();

    d.auto_fix(DEFAULT_FIX_PASSES);

    let c = d.position("grp").unwrap().rect();
    for id in ["a", "b"] {
        let ch = d.position(id).unwrap().rect();
        assert!(c.encloses(&ch), "'{id}' escapes the container");
    }
    assert!(d.validate_containers().is_ok());
}

#[test]
fn acyclic_chain_layers_advance_along_x() {
    let mut d = chain(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
    d.auto_layout(&LayoutOptions::new(Layout::Flow(FlowDirection::Lr)));

    let xa = d.position("a").unwrap().x_mm;
    let xb = d.position("b").unwrap().x_mm;
    let xc = d.position("c").unwrap().x_mm;
    assert!(xa < xb && xb < xc);
}

#[test]
fn space_between_hits_bounds_exactly() {
    let positions = distribute(3, 0.0, 100.0, Justify::SpaceBetween);
    assert!((positions[0] - 0.0).abs() < 1e-9);
    assert!((positions[1] - 50.0).abs() < 1e-9);
    assert!((positions[2] - 100.0).abs() < 1e-9);
}

#[test]
fn container_fix_applies_no_second_round() {
    let mut d = Diagram::new(None, 170.0, Some(120.0));
    d.add_box(BoxSpec::new("a", "A").at(90.0, 60.0).size(40.0, 25.0))
        .unwrap();
    d.add_container(
        ContainerSpec::new("grp")
            .children(["a"])
            .at(60.0, 60.0)
            .size(30.0, 30.0),
    )
    .unwrap();

    assert!(d.fix_container_enclosure() > 0);
    assert_eq!(d.fix_container_enclosure(), 0);
}

#[test]
fn curved_label_lands_on_the_bulge_side() {
    let mut d = Diagram::new(None, 170.0, Some(120.0));
    d.add_box(BoxSpec::new("a", "A")).unwrap();
    d.add_box(BoxSpec::new("b", "B")).unwrap();
    d.set_position("a", PositionSpec::new(0.0, 0.0, 0.0, 0.0));
    d.set_position("b", PositionSpec::new(10.0, 0.0, 0.0, 0.0));
    d.add_arrow(ArrowSpec::new("a", "b").label("flow").curve(1.0))
        .unwrap();

    let (x, y) = schematic::compute_arrow_label_position((0.0, 0.0), (10.0, 0.0), 1.0, None);
    assert!((x - 5.0).abs() < 1e-9);
    assert!(y > 0.0);
    assert!(d.validate_all(None).is_ok());
}

#[test]
fn wrong_sided_label_fails_until_the_curve_flips() {
    let mut d = Diagram::new(None, 170.0, Some(120.0));
    d.add_box(BoxSpec::new("a", "A")).unwrap();
    d.add_box(BoxSpec::new("b", "B")).unwrap();
    d.set_position("a", PositionSpec::new(0.0, 0.0, 0.0, 0.0));
    d.set_position("b", PositionSpec::new(10.0, 0.0, 0.0, 0.0));
    d.add_arrow(
        ArrowSpec::new("a", "b")
            .label("flow")
            .curve(-1.0)
            .label_offset_mm(0.0, 10.0),
    )
    .unwrap();

    let err = d.validate_all(None).unwrap_err();
    assert!(err.to_string().contains("wrong side"));

    assert_eq!(d.fix_arrow_labels(), 1);
    assert_eq!(d.arrows()[0].curve, 1.0);
    assert!(d.validate_all(None).is_ok());
}

#[test]
fn three_box_flow_scenario_validates_cleanly() {
    let mut d = chain(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
    d.auto_layout(
        &LayoutOptions::new(Layout::Flow(FlowDirection::Lr))
            .with_margin_mm(15.0)
            .with_box_size_mm(40.0, 25.0)
            .with_gap_mm(10.0),
    );

    // 3 x 40mm boxes + 2 x 10mm gaps + 2 x 15mm margins fill 170mm exactly
    assert_eq!(d.canvas().xlim, (0.0, 170.0));
    let xs: Vec<f64> = ["a", "b", "c"]
        .iter()
        .map(|id| d.position(id).unwrap().x_mm)
        .collect();
    assert!((xs[0] - 35.0).abs() < 1e-9);
    assert!((xs[1] - 85.0).abs() < 1e-9);
    assert!((xs[2] - 135.0).abs() < 1e-9);

    assert!(d.validate_no_overlap().is_ok());
    assert!(d.validate_all(None).is_ok());
}

#[test]
fn spring_layout_places_every_box_inside_margins() {
    let mut d = chain(&["a", "b", "c", "d"], &[("a", "b"), ("a", "c"), ("a", "d")]);
    d.auto_layout(&LayoutOptions::new(Layout::Spring));

    for id in ["a", "b", "c", "d"] {
        let pos = d.position(id).unwrap();
        let r = pos.rect();
        assert!(r.left >= 0.0 && r.right <= d.canvas().xlim.1 + 1e-9);
        assert!(r.bottom >= 0.0 && r.top <= d.canvas().ylim.1 + 1e-9);
    }
}

#[test]
fn circular_layout_spreads_boxes_around_the_center() {
    let mut d = chain(&["a", "b", "c", "d"], &[]);
    d.auto_layout(&LayoutOptions::new(Layout::Circular).with_avoid_overlap(false));

    let (cx, cy) = (85.0, 60.0);
    let radii: Vec<f64> = ["a", "b", "c", "d"]
        .iter()
        .map(|id| {
            let p = d.position(id).unwrap();
            (p.x_mm - cx).hypot(p.y_mm - cy)
        })
        .collect();
    for r in &radii {
        assert!((r - radii[0]).abs() < 1e-6);
    }
}

#[test]
fn auto_height_layout_keeps_coordinates_finite() {
    let mut d = Diagram::new(None, 170.0, None);
    d.add_box(BoxSpec::new("a", "A")).unwrap();
    d.add_box(BoxSpec::new("b", "B")).unwrap();
    d.add_arrow(ArrowSpec::new("a", "b")).unwrap();
    d.auto_layout(&LayoutOptions::default());

    let (x_lo, x_hi) = d.canvas().xlim;
    let (y_lo, y_hi) = d.canvas().ylim;
    assert!(x_lo.is_finite() && x_hi.is_finite());
    assert!(y_lo.is_finite() && y_hi.is_finite());
    for id in ["a", "b"] {
        let p = d.position(id).unwrap();
        assert!(p.x_mm.is_finite() && p.y_mm.is_finite(), "'{id}' left the plane");
    }
    assert!(d.position("a").unwrap().x_mm < d.position("b").unwrap().x_mm);
}

#[test]
fn bt_flow_reverses_the_vertical_order_of_tb() {
    let mut tb = chain(&["a", "b"], &[("a", "b")]);
    tb.auto_layout(&LayoutOptions::new(Layout::Flow(FlowDirection::Tb)));
    let mut bt = chain(&["a", "b"], &[("a", "b")]);
    bt.auto_layout(&LayoutOptions::new(Layout::Flow(FlowDirection::Bt)));

    assert!(tb.position("a").unwrap().y_mm > tb.position("b").unwrap().y_mm);
    assert!(bt.position("a").unwrap().y_mm < bt.position("b").unwrap().y_mm);
}
