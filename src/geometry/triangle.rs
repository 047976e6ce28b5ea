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

use smallvec::SmallVec;

use crate::{
    error::{Result, TinError},
    geometry::{
        aabb::BoundingBox,
        circle::{Circle, DEFAULT_TOLERANCE},
        intersection::{EPS, SegmentIntersection, segment_segment_intersection},
        point_3::Point3,
        segment::Segment,
    },
    kernel::{
        orientation::{Orientation, orient2d, orientation},
        predicates::are_equal_2d,
    },
};

/// Distance under which two clip points are the same point.
const MERGE_EPS: f64 = 1e-9;

/// An immutable triangle with its corners stored in clockwise order.
///
/// Corner `i` is `point(i)`; edge `i` runs from corner `i` to corner `i + 1`.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    p0: Point3,
    p1: Point3,
    p2: Point3,
}

impl Triangle {
    /// Create a triangle from three corners in any order; counter-clockwise
    /// input has its last two corners swapped.
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        if orientation(&a, &b, &c) == Orientation::CounterClockwise {
            Self {
                p0: a,
                p1: c,
                p2: b,
            }
        } else {
            Self {
                p0: a,
                p1: b,
                p2: c,
            }
        }
    }

    pub fn p0(&self) -> &Point3 {
        &self.p0
    }

    pub fn p1(&self) -> &Point3 {
        &self.p1
    }

    pub fn p2(&self) -> &Point3 {
        &self.p2
    }

    pub fn points(&self) -> [Point3; 3] {
        [self.p0, self.p1, self.p2]
    }

    /// Corner `i`, wrapping modulo 3.
    pub fn point(&self, i: usize) -> Point3 {
        match i % 3 {
            0 => self.p0,
            1 => self.p1,
            _ => self.p2,
        }
    }

    pub fn edge(&self, i: usize) -> Segment {
        Segment::new(self.point(i), self.point(i + 1))
    }

    /// Twice the signed area; negative for every well-formed triangle.
    fn signed_area2(&self) -> f64 {
        orient2d(&self.p0, &self.p1, &self.p2)
    }

    pub fn area(&self) -> f64 {
        self.signed_area2().abs() * 0.5
    }

    pub fn is_degenerate(&self) -> bool {
        self.signed_area2() == 0.0 || !self.signed_area2().is_finite()
    }

    pub fn perimeter(&self) -> f64 {
        self.p0.distance_2d(&self.p1) + self.p1.distance_2d(&self.p2) + self.p2.distance_2d(&self.p0)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.p0, &self.p1).expand_to_include(&self.p2)
    }

    pub fn circumcircle(&self) -> Circle {
        self.circumcircle_with_tolerance(DEFAULT_TOLERANCE)
    }

    /// Circle through the three corners. The radius comes from the law of
    /// sines in its `abc / 4K` form.
    pub fn circumcircle_with_tolerance(&self, tolerance: f64) -> Circle {
        let (ax, ay) = (self.p0.x, self.p0.y);
        let (bx, by) = (self.p1.x - ax, self.p1.y - ay);
        let (cx, cy) = (self.p2.x - ax, self.p2.y - ay);

        let d = 2.0 * (bx * cy - by * cx);
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        let centre = Point3::new(ax + ux, ay + uy, 0.0);

        let a_len = self.p1.distance_2d(&self.p2);
        let b_len = self.p2.distance_2d(&self.p0);
        let c_len = self.p0.distance_2d(&self.p1);
        let radius = (a_len * b_len * c_len) / (4.0 * self.area());

        Circle::new(centre, radius).with_tolerance(tolerance)
    }

    /// Point-in-triangle by three orientation tests against the clockwise
    /// sense of the corners; collinear counts as on the boundary, inside.
    pub fn contains_point(&self, p: &Point3) -> bool {
        let sense = orientation(&self.p0, &self.p1, &self.p2);
        let opposite = match sense {
            Orientation::CounterClockwise => Orientation::Clockwise,
            _ => Orientation::CounterClockwise,
        };
        orientation(&self.p0, &self.p1, p) != opposite
            && orientation(&self.p1, &self.p2, p) != opposite
            && orientation(&self.p2, &self.p0, p) != opposite
    }

    /// Index of the corner 2D-equal to `p`.
    pub fn vertex_index(&self, p: &Point3) -> Option<usize> {
        self.points().iter().position(|v| v.equals_2d(p))
    }

    pub fn has_vertex(&self, p: &Point3) -> bool {
        self.vertex_index(p).is_some()
    }

    /// Same triangle with corner `i` swapped for `p`.
    pub fn with_vertex(&self, i: usize, p: Point3) -> Triangle {
        let mut pts = self.points();
        pts[i % 3] = p;
        Triangle::new(pts[0], pts[1], pts[2])
    }

    /// Corner closest to `p`; ties go to the lower index.
    pub fn nearest_corner(&self, p: &Point3) -> usize {
        let pts = self.points();
        let mut best = 0;
        for i in 1..3 {
            if pts[i].distance_2d(p) < pts[best].distance_2d(p) {
                best = i;
            }
        }
        best
    }

    /// Edge closest to `p` and its distance.
    pub fn nearest_edge(&self, p: &Point3) -> (usize, f64) {
        let mut best = (0, self.edge(0).distance_to(p));
        for i in 1..3 {
            let d = self.edge(i).distance_to(p);
            if d < best.1 {
                best = (i, d);
            }
        }
        best
    }

    pub fn barycentric(&self, p: &Point3) -> Option<(f64, f64, f64)> {
        let (v0x, v0y) = (self.p1.x - self.p0.x, self.p1.y - self.p0.y);
        let (v1x, v1y) = (self.p2.x - self.p0.x, self.p2.y - self.p0.y);
        let (v2x, v2y) = (p.x - self.p0.x, p.y - self.p0.y);

        let d00 = v0x * v0x + v0y * v0y;
        let d01 = v0x * v1x + v0y * v1y;
        let d11 = v1x * v1x + v1y * v1y;
        let d20 = v2x * v0x + v2y * v0y;
        let d21 = v2x * v1x + v2y * v1y;

        let denom = d00 * d11 - d01 * d01;
        if denom == 0.0 {
            return None; // degenerate triangle
        }

        let v = (d11 * d20 - d01 * d21) / denom; // coeff of p1
        let w = (d00 * d21 - d01 * d20) / denom; // coeff of p2
        Some((1.0 - v - w, v, w))
    }

    /// Portion of `segment` inside this triangle (boundary included).
    ///
    /// Returns `None` when disjoint, a zero-length segment when they touch at a
    /// single point, and the clipped piece, ordered like `segment`, otherwise.
    /// Elevations are interpolated along `segment`.
    pub fn intersect(&self, segment: &Segment) -> Result<Option<Segment>> {
        let mut hits: SmallVec<[Point3; 4]> = SmallVec::new();

        // Exact ends first so that neighbours sharing them agree bit for bit.
        for end in [segment.a, segment.b] {
            if self.contains_point(&end) {
                push_distinct(&mut hits, end);
            }
        }
        for i in 0..3 {
            match segment_segment_intersection(segment, &self.edge(i).canonical(), EPS) {
                SegmentIntersection::None => {}
                SegmentIntersection::Point(p) => push_distinct(&mut hits, p),
                SegmentIntersection::Overlapping(s) => {
                    push_distinct(&mut hits, s.a);
                    push_distinct(&mut hits, s.b);
                }
            }
        }

        match hits.len() {
            0 => Ok(None),
            1 => Ok(Some(Segment::new(hits[0], hits[0]))),
            2 => {
                let (p, q) = (hits[0], hits[1]);
                if segment.project_factor(&p) <= segment.project_factor(&q) {
                    Ok(Some(Segment::new(p, q)))
                } else {
                    Ok(Some(Segment::new(q, p)))
                }
            }
            count => Err(TinError::MalformedIntersection { count }),
        }
    }
}

fn push_distinct(hits: &mut SmallVec<[Point3; 4]>, p: Point3) {
    if !hits.iter().any(|h| are_equal_2d(h, &p, MERGE_EPS)) {
        hits.push(p);
    }
}

/// Triangles are equal when they have the same three corners, in any rotation.
impl PartialEq for Triangle {
    fn eq(&self, other: &Self) -> bool {
        self.points().iter().all(|p| other.has_vertex(p))
            && other.points().iter().all(|p| self.has_vertex(p))
    }
}
