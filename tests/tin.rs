// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use approx::assert_relative_eq;
use tinmesh::{
    BoundingBox, IndexedTin, InsertOutcome, Point3, PrecisionModel, Tin, TinConfig, TinError,
    Triangle,
};

fn square_region() -> BoundingBox {
    BoundingBox::new(0.0, 0.0, 10.0, 10.0)
}

fn corner_tin() -> Tin {
    let mut tin = Tin::with_config(square_region(), TinConfig::default().with_margin(0.0)).unwrap();
    for node in [
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(10.0, 0.0, 2.0),
        Point3::new(10.0, 10.0, 3.0),
        Point3::new(0.0, 10.0, 4.0),
    ] {
        assert_eq!(tin.insert_node(node).unwrap(), InsertOutcome::Inserted);
    }
    tin
}

fn sample_tin() -> Tin {
    let mut tin = Tin::new(square_region()).unwrap();
    tin.insert_nodes([
        Point3::new(1.0, 1.0, 10.0),
        Point3::new(9.0, 1.5, 12.0),
        Point3::new(8.5, 9.0, 15.0),
        Point3::new(1.5, 8.0, 11.0),
        Point3::new(5.0, 4.0, 20.0),
        Point3::new(3.0, 6.5, 14.0),
    ])
    .unwrap();
    tin
}

#[test]
fn test_four_corners_give_two_triangles() {
    let tin = corner_tin();
    assert_eq!(tin.len(), 2);
    let area: f64 = tin.triangles().iter().map(Triangle::area).sum();
    assert_eq!(area, 100.0);

    // the seed diagonal runs from (0, 0) to (10, 10)
    let z = tin.elevation(5.0, 5.0).unwrap();
    assert_relative_eq!(z, 2.0, epsilon = 1e-12);
    assert!((1.0..=4.0).contains(&z));
    assert_eq!(tin.nodes().len(), 4);
}

#[test]
fn test_elevation_at_nodes_is_exact() {
    let tin = corner_tin();
    assert_eq!(tin.elevation(0.0, 0.0), Some(1.0));
    assert_eq!(tin.elevation(10.0, 0.0), Some(2.0));
    assert_eq!(tin.elevation(10.0, 10.0), Some(3.0));
    assert_eq!(tin.elevation(0.0, 10.0), Some(4.0));
}

#[test]
fn test_elevation_outside_mesh_is_none() {
    let tin = corner_tin();
    assert_eq!(tin.elevation(-1.0, 5.0), None);
    assert_eq!(tin.elevation(f64::NAN, 5.0), None);
}

#[test]
fn test_duplicate_node_is_a_no_op() {
    let mut tin = sample_tin();
    let before = tin.to_indexed();
    let again = Point3::new(5.0, 4.0, -99.0);
    assert_eq!(tin.insert_node(again).unwrap(), InsertOutcome::Duplicate);
    assert_eq!(tin.to_indexed(), before);
    assert_eq!(tin.elevation(5.0, 4.0), Some(20.0));
}

#[test]
fn test_rejected_nodes() {
    let mut tin = sample_tin();
    let before = tin.len();
    assert!(matches!(
        tin.insert_node(Point3::new(11.0, 5.0, 0.0)),
        Err(TinError::OutsideRegion { .. })
    ));
    assert!(matches!(
        tin.insert_node(Point3::new(f64::INFINITY, 5.0, 0.0)),
        Err(TinError::NonFiniteCoordinate { .. })
    ));
    assert_eq!(tin.len(), before);
}

#[test]
fn test_insert_nodes_counts_new_nodes_only() {
    let mut tin = Tin::new(square_region()).unwrap();
    let n = tin
        .insert_nodes([
            Point3::new(2.0, 2.0, 1.0),
            Point3::new(2.0, 2.0, 5.0),
            Point3::new(7.0, 3.0, 1.0),
        ])
        .unwrap();
    assert_eq!(n, 2);

    let err = tin
        .insert_nodes([Point3::new(4.0, 4.0, 1.0), Point3::new(40.0, 4.0, 1.0)])
        .unwrap_err();
    assert!(matches!(err, TinError::OutsideRegion { .. }));
    assert_eq!(tin.nodes().len(), 3);
}

#[test]
fn test_seed_mesh_is_not_reported_as_nodes() {
    let tin = sample_tin();
    let nodes = tin.nodes();
    assert_eq!(nodes.len(), 6);
    for corner in tin.seed_corners() {
        assert!(!nodes.iter().any(|n| n.equals_2d(corner)));
    }
    let indexed = tin.to_indexed();
    assert_eq!(indexed.vertices.len(), 10);
}

#[test]
fn test_indexed_round_trip() {
    let tin = sample_tin();
    let indexed = tin.to_indexed();
    for w in indexed.vertices.windows(2) {
        assert!(w[0].cmp_2d(&w[1]).is_lt());
    }

    let reloaded = Tin::from_indexed(square_region(), *tin.config(), &indexed).unwrap();
    assert_eq!(reloaded.to_indexed(), indexed);
    assert_eq!(reloaded.nodes(), tin.nodes());
    assert!(reloaded.indices_consistent());
    for node in tin.nodes() {
        assert_eq!(reloaded.elevation_at(&node), Some(node.z));
    }
}

#[test]
fn test_bulk_load_rejects_bad_input() {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
    ];
    let out_of_range = IndexedTin {
        vertices: vertices.clone(),
        triangles: vec![[0, 1, 3]],
    };
    assert!(matches!(
        Tin::from_indexed(square_region(), TinConfig::default(), &out_of_range),
        Err(TinError::VertexIndexOutOfRange { index: 3, len: 3 })
    ));

    let flat = IndexedTin {
        vertices,
        triangles: vec![[0, 1, 2]],
    };
    assert!(matches!(
        Tin::from_indexed(square_region(), TinConfig::default(), &flat),
        Err(TinError::DegenerateTriangle { index: 0 })
    ));
}

#[test]
fn test_reload_from_nodes_only() {
    let tin = sample_tin();
    let reloaded = Tin::from_nodes(square_region(), *tin.config(), tin.nodes()).unwrap();
    assert_eq!(reloaded.nodes(), tin.nodes());
    assert_eq!(reloaded.len(), tin.len());
}

#[test]
fn test_precision_rounds_nodes() {
    let config = TinConfig::from_json_str(
        r#"{"margin": 5.0, "precision": {"type": "fixed", "scale_xy": 100.0, "scale_z": 10.0}}"#,
    )
    .unwrap();
    assert_eq!(config.precision, PrecisionModel::fixed(100.0, 10.0));

    let mut tin = Tin::with_config(square_region(), config).unwrap();
    tin.insert_node(Point3::new(1.23456, 2.34567, 3.14159)).unwrap();
    assert_eq!(tin.nodes(), vec![Point3::new(1.23, 2.35, 3.1)]);
    assert_eq!(
        tin.insert_node(Point3::new(1.231, 2.349, 0.0)).unwrap(),
        InsertOutcome::Duplicate
    );
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = TinConfig::default().with_breakline_tolerance(0.0);
    assert!(matches!(
        Tin::with_config(square_region(), config),
        Err(TinError::InvalidConfig(_))
    ));
}

#[test]
fn test_node_without_elevation_sits_on_the_surface() {
    let mut tin = corner_tin();
    tin.insert_node(Point3::xy(5.0, 5.0)).unwrap();
    assert_relative_eq!(tin.elevation(5.0, 5.0).unwrap(), 2.0, epsilon = 1e-12);
}

#[test]
fn test_drape() {
    let tin = corner_tin();
    let line = [
        Point3::new(0.0, 0.0, -1.0),
        Point3::new(10.0, 10.0, -1.0),
        Point3::new(20.0, 10.0, -1.0),
    ];
    let draped = tin.drape(&line);
    assert_eq!(draped[0].z, 1.0);
    assert_eq!(draped[1].z, 3.0);
    assert_eq!(draped[2], line[2]);
}

#[test]
fn test_triangle_queries() {
    let tin = sample_tin();
    let at = tin.triangles_at(&Point3::xy(5.0, 4.0));
    assert!(at.len() >= 3);
    assert!(at.iter().all(|t| t.has_vertex(&Point3::xy(5.0, 4.0))));

    let all = tin.triangles_in(&BoundingBox::new(-1000.0, -1000.0, 1000.0, 1000.0));
    assert_eq!(all.len(), tin.len());
    assert!(!tin.is_empty());
}

#[test]
fn test_tin_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Tin>();
}

#[test]
fn test_region_check_sees_the_rounded_node() {
    let config = TinConfig::default().with_precision(PrecisionModel::fixed(1.0, 1.0));
    let mut tin = Tin::with_config(BoundingBox::new(0.4, 0.4, 10.4, 10.4), config).unwrap();
    assert!(matches!(
        tin.insert_node(Point3::new(0.45, 5.0, 1.0)),
        Err(TinError::OutsideRegion { x, y }) if x == 0.0 && y == 5.0
    ));
    assert_eq!(
        tin.insert_node(Point3::new(10.45, 5.0, 1.0)).unwrap(),
        InsertOutcome::Inserted
    );
    assert_eq!(tin.nodes(), vec![Point3::new(10.0, 5.0, 1.0)]);
}

#[test]
fn test_finished_tin_keeps_answering_and_editing() {
    let mut tin = sample_tin();
    let area: f64 = tin.triangles().iter().map(Triangle::area).sum();
    tin.finish_editing();

    assert_eq!(tin.elevation(5.0, 4.0), Some(20.0));
    assert!(!tin.triangles_at(&Point3::xy(5.0, 4.0)).is_empty());

    assert_eq!(
        tin.insert_node(Point3::new(6.0, 6.0, 16.0)).unwrap(),
        InsertOutcome::Inserted
    );
    let after: f64 = tin.triangles().iter().map(Triangle::area).sum();
    assert_relative_eq!(after, area, max_relative = 1e-12);
    assert!(tin.indices_consistent());
    assert_eq!(tin.elevation(6.0, 6.0), Some(16.0));
}
