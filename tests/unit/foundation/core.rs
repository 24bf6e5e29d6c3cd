use super::*;

#[test]
fn identity_is_default_and_affine() {
    let t = Transform::default();
    assert!(t.is_identity());
    assert!(t.is_affine());
    assert_eq!(t.to_affine(), Some(Affine::IDENTITY));
}

#[test]
fn concat_is_left_to_right() {
    let a = Transform::translate(10.0, 0.0);
    let b = Transform::scale(2.0, 2.0);

    // a x b: scale first, then translate.
    let ab = a * b;
    assert_eq!(ab.map_point(Point::new(1.0, 1.0)), Some(Point::new(12.0, 2.0)));

    // b x a: translate first, then scale.
    let ba = b * a;
    assert_eq!(ba.map_point(Point::new(1.0, 1.0)), Some(Point::new(22.0, 2.0)));
}

#[test]
fn from_rows_matches_row_major_layout() {
    let t = Transform::from_rows([
        [1.0, 0.0, 0.0, 5.0],
        [0.0, 1.0, 0.0, 7.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    assert_eq!(t, Transform::translate(5.0, 7.0));
    assert_eq!(
        t.to_affine(),
        Some(Affine::translate(Vec2::new(5.0, 7.0)))
    );
}

#[test]
fn perspective_is_not_affine_and_rejects_points_behind_the_plane() {
    let mut m = Transform::IDENTITY.0;
    m[12] = -0.01;
    let t = Transform::new(m);
    assert!(!t.is_affine());
    assert_eq!(t.to_affine(), None);

    let p = t.map_point(Point::new(50.0, 0.0)).unwrap();
    assert_eq!(p, Point::new(100.0, 0.0));
    assert_eq!(t.map_point(Point::new(100.0, 0.0)), None);
    assert_eq!(t.map_point(Point::new(200.0, 0.0)), None);
}
