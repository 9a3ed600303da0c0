//! Tests for BoundingBox validation, containment and snapping.

use geo_common::bbox::BoundingBox;

#[test]
fn test_bbox_new() {
    let bbox = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
    assert_eq!(bbox.range_x(), (-180.0, 180.0));
    assert_eq!(bbox.range_y(), (-90.0, 90.0));
    assert_eq!(bbox.width(), 360.0);
    assert_eq!(bbox.height(), 180.0);
}

#[test]
fn test_validate_rejects_degenerate() {
    assert!(BoundingBox::new(0.0, 0.0, 0.0, 1.0).validate().is_err());
    assert!(BoundingBox::new(0.0, f64::INFINITY, 1.0, 2.0).validate().is_err());
    assert!(BoundingBox::new(-1.0, -1.0, 1.0, 1.0).validate().is_ok());
}

#[test]
fn test_contains_point_edges_inclusive() {
    let bbox = BoundingBox::new(-10.0, -5.0, 10.0, 5.0);
    assert!(bbox.contains_point(-10.0, 5.0));
    assert!(bbox.contains_point(0.0, 0.0));
    assert!(!bbox.contains_point(10.1, 0.0));
    assert!(!bbox.contains_point(0.0, -5.1));
}

#[test]
fn test_snap_keeps_validity() {
    let bbox = BoundingBox::from_xy((-179.9, 179.9), (-89.9, 89.9)).unwrap();
    let snapped = bbox.snap_to_resolution(1.0);
    assert!(snapped.validate().is_ok());
    assert_eq!(snapped.range_x(), (-180.0, 180.0));
    assert_eq!(snapped.range_y(), (-90.0, 90.0));
}
