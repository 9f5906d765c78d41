use std::sync::{Arc, Mutex};

use vexel_core::constants::ROOT_NODE_ID;
use vexel_core::{AppEvent, EventBus, EventFilter, SceneEvent};
use vexel_designer::geometry::{compose_affine, rotation, scaling, translation, BoundingBox, Point};
use vexel_designer::scene::{ElementRecord, NodeType, SceneTree};

fn spread_group() -> SceneTree {
    let mut tree = SceneTree::new();
    tree.build(&[ElementRecord::group(
        "outer",
        0.0,
        0.0,
        vec![ElementRecord::group(
            "g1",
            0.0,
            0.0,
            vec![
                ElementRecord::rectangle("a", 0.0, 0.0, 10.0, 10.0, None),
                ElementRecord::rectangle("b", 100.0, 100.0, 10.0, 10.0, None),
            ],
        )],
    )])
    .expect("valid scene");
    assert_eq!(
        tree.absolute_bounding_box("g1"),
        Some(BoundingBox::new(0.0, 0.0, 110.0, 110.0))
    );
    assert_eq!(
        tree.absolute_bounding_box("outer"),
        Some(BoundingBox::new(0.0, 0.0, 110.0, 110.0))
    );
    tree
}

fn collect_dirty(bus: &Arc<EventBus>) -> Arc<Mutex<Vec<String>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    bus.subscribe(EventFilter::All, move |event| {
        if let AppEvent::Scene(SceneEvent::NodeDirty { id }) = event {
            sink.lock().expect("lock").push(id.clone());
        }
    });
    seen
}

fn assert_matrix_close(a: [f64; 6], b: [f64; 6]) {
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() < 1e-9, "{:?} != {:?}", a, b);
    }
}

fn r1_c1() -> SceneTree {
    let mut tree = SceneTree::new();
    tree.build(&[
        ElementRecord::rectangle("r1", 0.0, 0.0, 100.0, 100.0, None),
        ElementRecord::circle("c1", 200.0, 0.0, 25.0, None),
    ])
    .expect("valid scene");
    tree
}

#[test]
fn test_rectangle_and_circle_hits() {
    let tree = r1_c1();
    assert!(tree.hit_test("r1", Point::new(50.0, 50.0)));
    assert!(tree.hit_test("c1", Point::new(225.0, 25.0)));
    assert!(!tree.hit_test("c1", Point::new(199.0, 25.0)));
    assert!(!tree.hit_test("c1", Point::new(202.0, 2.0)));
    assert!(!tree.hit_test("missing", Point::new(0.0, 0.0)));
}

#[test]
fn test_node_at_prefers_front_most() {
    let mut tree = SceneTree::new();
    tree.build(&[
        ElementRecord::rectangle("back", 0.0, 0.0, 100.0, 100.0, None),
        ElementRecord::rectangle("front", 50.0, 50.0, 100.0, 100.0, None),
    ])
    .expect("valid scene");
    assert_eq!(tree.node_at(Point::new(75.0, 75.0)).as_deref(), Some("front"));
    assert_eq!(tree.node_at(Point::new(25.0, 25.0)).as_deref(), Some("back"));
    assert_eq!(tree.node_at(Point::new(500.0, 500.0)), None);

    tree.set_visible("front", false);
    assert_eq!(tree.node_at(Point::new(75.0, 75.0)).as_deref(), Some("back"));
}

#[test]
fn test_absolute_matrix_is_product_of_chain() {
    let outer = translation(10.0, 20.0);
    let inner = compose_affine(&translation(30.0, 0.0), &scaling(2.0, 2.0));
    let leaf = compose_affine(&translation(5.0, 5.0), &rotation(90.0));

    let mut leaf_record = ElementRecord::rectangle("leaf", 0.0, 0.0, 10.0, 10.0, None);
    leaf_record.matrix = leaf;
    let mut inner_record = ElementRecord::group("inner", 0.0, 0.0, vec![leaf_record]);
    inner_record.matrix = inner;
    let mut outer_record = ElementRecord::group("outer", 0.0, 0.0, vec![inner_record]);
    outer_record.matrix = outer;

    let mut tree = SceneTree::new();
    tree.build(&[outer_record]).expect("valid scene");

    let expected = compose_affine(&compose_affine(&outer, &inner), &leaf);
    assert_matrix_close(tree.absolute_matrix("leaf").expect("exists"), expected);

    let moved_outer = compose_affine(&translation(-4.0, 2.0), &rotation(15.0));
    tree.set_matrix("outer", moved_outer);
    let expected = compose_affine(&compose_affine(&moved_outer, &inner), &leaf);
    assert_matrix_close(tree.absolute_matrix("leaf").expect("exists"), expected);
}

#[test]
fn test_marquee_intersection() {
    let mut tree = SceneTree::new();
    tree.build(&[
        ElementRecord::rectangle("inside", 10.0, 10.0, 20.0, 20.0, None),
        ElementRecord::rectangle("far", 1000.0, 1000.0, 20.0, 20.0, None),
    ])
    .expect("valid scene");
    let marquee = BoundingBox::new(0.0, 0.0, 50.0, 50.0);
    assert!(tree.intersects_with("inside", &marquee));
    assert!(!tree.intersects_with("far", &marquee));
    assert_eq!(tree.nodes_in_box(&marquee), vec!["inside".to_string()]);
}

#[test]
fn test_translate_round_trip_is_exact() {
    let mut tree = r1_c1();
    let original = tree.find_by_id("c1").expect("exists").matrix();
    for (dx, dy) in [(10.0, 5.0), (-3.25, 7.5), (1024.0, -2048.0)] {
        tree.translate("c1", dx, dy);
        tree.translate("c1", -dx, -dy);
        assert_eq!(tree.find_by_id("c1").expect("exists").matrix(), original);
    }
}

#[test]
fn test_element_snapshot_reflects_edits() {
    let mut tree = r1_c1();
    tree.set_position("r1", 12.0, 34.0);
    tree.set_size("r1", 40.0, 30.0);
    let record = tree.to_element("r1").expect("exists");
    assert_eq!(record.matrix[4..], [12.0, 34.0]);
    assert_eq!((record.width, record.height), (40.0, 30.0));
    assert_eq!(record.node_type, NodeType::Rectangle);
}

#[test]
fn test_mutations_publish_dirty_nodes() {
    let bus = EventBus::shared();
    let seen = collect_dirty(&bus);

    let mut tree = SceneTree::with_bus(Arc::clone(&bus));
    tree.build(&[ElementRecord::rectangle("r1", 0.0, 0.0, 10.0, 10.0, None)])
        .expect("valid scene");
    seen.lock().expect("lock").clear();

    tree.translate("r1", 1.0, 1.0);
    assert!(seen.lock().expect("lock").contains(&"r1".to_string()));
    assert!(tree.has_dirty_nodes());
}

#[test]
fn test_unknown_node_types_are_inert() {
    let json = r#"[
        {"id": "mystery", "type": "STAR", "width": 10, "height": 10},
        {"id": "r", "type": "RECTANGLE", "matrix": [1, 0, 0, 1, 20, 0], "width": 10, "height": 10}
    ]"#;
    let records: Vec<ElementRecord> = serde_json::from_str(json).expect("valid json");
    let mut tree = SceneTree::new();
    tree.build(&records).expect("valid scene");

    assert_eq!(tree.find_by_id("mystery").map(|n| n.node_type()), Some(NodeType::Unknown));
    assert!(!tree.hit_test("mystery", Point::new(5.0, 5.0)));
    assert_eq!(
        tree.nodes_in_box(&BoundingBox::new(0.0, 0.0, 100.0, 100.0)),
        vec!["r".to_string()]
    );
}

#[test]
fn test_removing_child_shrinks_group_box() {
    let mut tree = spread_group();
    tree.remove_child("g1", "b").expect("is a child");

    let expected = Some(BoundingBox::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(tree.absolute_bounding_box("g1"), expected);
    assert_eq!(tree.absolute_bounding_box("outer"), expected);
    assert_eq!(tree.content_bounds(), expected);
}

#[test]
fn test_reparenting_child_shrinks_old_group_box() {
    let mut tree = spread_group();
    tree.append_child(ROOT_NODE_ID, "b").expect("re-parented");

    let expected = Some(BoundingBox::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(tree.absolute_bounding_box("g1"), expected);
    assert_eq!(tree.absolute_bounding_box("outer"), expected);
    assert_eq!(
        tree.content_bounds(),
        Some(BoundingBox::new(0.0, 0.0, 110.0, 110.0))
    );
}

#[test]
fn test_reparenting_into_group_grows_its_box() {
    let mut tree = spread_group();
    tree.insert(
        ROOT_NODE_ID,
        &ElementRecord::rectangle("c", 200.0, 0.0, 10.0, 10.0, None),
    )
    .expect("inserted");
    tree.append_child("g1", "c").expect("re-parented");

    assert_eq!(
        tree.absolute_bounding_box("g1"),
        Some(BoundingBox::new(0.0, 0.0, 210.0, 110.0))
    );
}

#[test]
fn test_removing_all_children_resets_group_box() {
    let mut tree = spread_group();
    tree.remove_children("g1").expect("known group");

    // An empty group falls back to its own zero-sized rectangle
    let expected = Some(BoundingBox::new(0.0, 0.0, 0.0, 0.0));
    assert_eq!(tree.absolute_bounding_box("g1"), expected);
    assert_eq!(tree.absolute_bounding_box("outer"), expected);
}

#[test]
fn test_resizing_child_grows_group_box() {
    let mut tree = spread_group();
    assert!(tree.set_size("b", 20.0, 40.0));

    let expected = Some(BoundingBox::new(0.0, 0.0, 120.0, 140.0));
    assert_eq!(tree.absolute_bounding_box("g1"), expected);
    assert_eq!(tree.absolute_bounding_box("outer"), expected);
}

#[test]
fn test_hidden_group_hides_descendants() {
    let mut tree = spread_group();
    assert!(tree.hit_test("a", Point::new(5.0, 5.0)));
    assert!(tree.set_visible("g1", false));

    let marquee = BoundingBox::new(-5.0, -5.0, 20.0, 20.0);
    assert!(!tree.hit_test("a", Point::new(5.0, 5.0)));
    assert!(!tree.intersects_with("a", &marquee));
    assert_eq!(tree.node_at(Point::new(5.0, 5.0)), None);
    assert!(tree.nodes_in_box(&marquee).is_empty());

    assert!(tree.set_visible("g1", true));
    assert!(tree.hit_test("a", Point::new(5.0, 5.0)));
}

#[test]
fn test_find_by_ids_keeps_input_order() {
    let tree = r1_c1();
    let ids = |nodes: Vec<&vexel_designer::SceneNode>| -> Vec<String> {
        nodes.iter().map(|node| node.id().to_string()).collect()
    };

    assert_eq!(ids(tree.find_by_ids(["c1", "nope", "r1"])), vec!["c1", "r1"]);
    assert_eq!(ids(tree.find_by_ids(vec!["r1".to_string(), "c1".to_string()])), vec!["r1", "c1"]);
    assert!(tree.find_by_ids(["ghost"]).is_empty());
}

#[test]
fn test_mark_node_dirty() {
    let bus = EventBus::shared();
    let seen = collect_dirty(&bus);
    let mut tree = SceneTree::with_bus(Arc::clone(&bus));
    tree.build(&[ElementRecord::rectangle("r1", 0.0, 0.0, 10.0, 10.0, None)])
        .expect("valid scene");
    tree.take_dirty_nodes();
    seen.lock().expect("lock").clear();
    let revision = tree.revision();

    assert!(!tree.mark_node_dirty("missing"));
    assert!(seen.lock().expect("lock").is_empty());
    assert!(!tree.has_dirty_nodes());
    assert_eq!(tree.revision(), revision);

    assert!(tree.mark_node_dirty("r1"));
    assert_eq!(*seen.lock().expect("lock"), vec!["r1".to_string()]);
    assert_eq!(tree.take_dirty_nodes(), vec!["r1".to_string()]);
    assert!(tree.revision() > revision);
}
