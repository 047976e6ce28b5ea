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

use tinmesh::geometry::aabb_tree::AabbTree;
use tinmesh::geometry::{BoundingBox, Point3, Segment, SpatialIndex};

#[test]
fn test_bbox_from_union_and_intersection() {
    let a = BoundingBox::from_points(&Point3::xy(0.0, 1.0), &Point3::xy(2.0, -1.0));
    assert_eq!((a.min_x, a.min_y, a.max_x, a.max_y), (0.0, -1.0, 2.0, 1.0));

    let b = BoundingBox::from_points(&Point3::xy(0.5, -0.5), &Point3::xy(2.0, 0.5));
    let u = a.union(&b);
    assert_eq!(u, a);

    let c = BoundingBox::from_points(&Point3::xy(2.5, 2.5), &Point3::xy(3.0, 3.0));
    assert!(a.intersects(&b));
    assert!(!a.intersects(&c));

    // touching boundaries intersect
    let d = BoundingBox::new(2.0, 1.0, 3.0, 2.0);
    assert!(a.intersects(&d));
}

#[test]
fn test_bbox_expand() {
    let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let grown = a.expand_by(100.0);
    assert_eq!((grown.min_x, grown.max_y), (-100.0, 110.0));
    assert!(grown.contains(&a));

    let b = a.expand_to_include(&Point3::xy(-5.0, 20.0));
    assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (-5.0, 0.0, 10.0, 20.0));
    assert!(b.contains_point(&Point3::xy(-5.0, 20.0)));
}

#[test]
fn test_clip_segment_to_bbox() {
    let region = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let seg = Segment::new(Point3::new(-5.0, 5.0, 0.0), Point3::new(15.0, 5.0, 20.0));
    let clipped = region.clip_segment(&seg).unwrap();
    assert_eq!(clipped.a, Point3::new(0.0, 5.0, 5.0));
    assert_eq!(clipped.b, Point3::new(10.0, 5.0, 15.0));

    let outside = Segment::new(Point3::xy(-5.0, -1.0), Point3::xy(15.0, -1.0));
    assert!(region.clip_segment(&outside).is_none());
}

#[test]
fn test_aabb_tree_build_and_query() {
    let items = vec![
        (BoundingBox::new(0.0, 0.0, 1.0, 1.0), 1),
        (BoundingBox::new(1.5, 1.5, 2.5, 2.5), 2),
        (BoundingBox::new(-1.0, -1.0, -0.5, -0.5), 3),
    ];
    let tree = AabbTree::build(items);

    let mut hits = Vec::new();
    let query = BoundingBox::new(0.5, 0.5, 2.0, 2.0);
    tree.query(&query, &mut |_: &BoundingBox, d: &i32| hits.push(*d));

    hits.sort();
    assert_eq!(hits, vec![1, 2]);
}

#[test]
fn test_spatial_index_remove_by_box_and_value() {
    let mut index = SpatialIndex::new();
    let shared = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
    index.insert(shared, 1);
    index.insert(shared, 2);
    index.insert(BoundingBox::new(5.0, 5.0, 6.0, 6.0), 3);

    // right value under the wrong box is not found
    assert!(!index.remove(&BoundingBox::new(5.0, 5.0, 6.0, 6.0), &1));
    assert!(index.remove(&shared, &1));
    assert!(!index.remove(&shared, &1));

    assert_eq!(index.len(), 2);
    assert_eq!(index.query(&BoundingBox::new(0.5, 0.5, 0.5, 0.5)), vec![2]);
    let filtered = index.query_with(&BoundingBox::new(-10.0, -10.0, 10.0, 10.0), |v| *v > 2);
    assert_eq!(filtered, vec![3]);
}
