use vexel_designer::geometry::{
    apply_affine, compose_affine, decompose_matrix, hit_matrix_node_test, invert_affine,
    merge_bounding_boxes, rotation, scaling, transformed_bounding_box, translation, BoundingBox,
    MatrixRect, Point, IDENTITY,
};

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
}

#[test]
fn test_transformed_box_matches_corner_envelope() {
    let matrices = [
        IDENTITY,
        translation(5.0, -3.0),
        scaling(2.0, 0.5),
        compose_affine(&translation(10.0, 20.0), &rotation(30.0)),
        [1.0, 0.5, 0.0, 1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0, 1.0, 50.0, 0.0],
    ];
    for m in matrices {
        let corners = MatrixRect::new(m, 40.0, 10.0).corners();
        let xs = corners.iter().map(|p| p.x);
        let ys = corners.iter().map(|p| p.y);
        let min_x = xs.clone().fold(f64::INFINITY, f64::min);
        let max_x = xs.fold(f64::NEG_INFINITY, f64::max);
        let min_y = ys.clone().fold(f64::INFINITY, f64::min);
        let max_y = ys.fold(f64::NEG_INFINITY, f64::max);

        let bbox = transformed_bounding_box(&m, 40.0, 10.0);
        assert_close(bbox.x, min_x);
        assert_close(bbox.y, min_y);
        assert_close(bbox.width, max_x - min_x);
        assert_close(bbox.height, max_y - min_y);
    }
}

#[test]
fn test_invert_round_trip() {
    let m = compose_affine(&translation(7.0, -2.0), &compose_affine(&rotation(45.0), &scaling(3.0, 2.0)));
    let inverse = invert_affine(&m).expect("invertible");
    let p = Point::new(12.5, -4.0);
    let back = apply_affine(&inverse, apply_affine(&m, p));
    assert_close(back.x, p.x);
    assert_close(back.y, p.y);
}

#[test]
fn test_rotation_angle_from_matrix() {
    let decomposed = decompose_matrix(&compose_affine(&translation(3.0, 4.0), &rotation(60.0)));
    assert_close(decomposed.rotation, 60.0);
    assert_close(decomposed.scale_x, 1.0);
    assert_close(decomposed.x, 3.0);
    assert_close(decomposed.y, 4.0);
}

#[test]
fn test_quad_overlap_is_symmetric() {
    let a = MatrixRect::new(compose_affine(&translation(0.0, 0.0), &rotation(20.0)), 30.0, 10.0);
    let b = MatrixRect::new(translation(20.0, 5.0), 10.0, 10.0);
    let c = MatrixRect::new(translation(100.0, 100.0), 10.0, 10.0);
    assert!(hit_matrix_node_test(&a, &b));
    assert!(hit_matrix_node_test(&b, &a));
    assert!(!hit_matrix_node_test(&a, &c));
    assert!(!hit_matrix_node_test(&c, &a));
}

#[test]
fn test_rotated_envelope_overlap_is_refined() {
    // Envelopes overlap near the corner, the rotated square itself does not reach
    let diamond = MatrixRect::new(compose_affine(&translation(10.0, 0.0), &rotation(45.0)), 10.0, 10.0);
    let square = MatrixRect::new(translation(15.5, 11.5), 4.0, 4.0);
    assert!(diamond.bounding_box().intersects(&square.bounding_box()));
    assert!(!hit_matrix_node_test(&diamond, &square));
}

#[test]
fn test_merge_boxes() {
    let merged = merge_bounding_boxes([
        BoundingBox::new(0.0, 0.0, 10.0, 10.0),
        BoundingBox::new(-5.0, 20.0, 5.0, 5.0),
    ])
    .expect("non-empty");
    assert_eq!(merged, BoundingBox::new(-5.0, 0.0, 15.0, 25.0));
}
