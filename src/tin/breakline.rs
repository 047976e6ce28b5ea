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

//! Breakline insertion.
//!
//! A breakline piece clipped to one triangle touches that triangle's
//! boundary in one of a handful of ways. Each way has a fixed replacement
//! fan that keeps the triangle's area covered and turns the piece into a
//! chain of mesh edges. Classification and fans are pure functions of the
//! triangle and the piece; [`Tin::insert_edge`] plans every triangle first
//! and mutates the mesh only once all plans succeeded.

use smallvec::{SmallVec, smallvec};

use crate::error::{Result, TinError};
use crate::geometry::{BoundingBox, Point3, Segment, Triangle};
use crate::numeric::PrecisionModel;
use crate::tin::Tin;
use crate::tin::elevation::interpolate;

pub type Fan = SmallVec<[Triangle; 5]>;

/// Fraction of the breakline tolerance under which two computed points are
/// the same point, apart from rounding.
const ROUNDING_FRACTION: f64 = 1e-4;

/// Where a point sits relative to one triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Within tolerance of corner `i`.
    Corner(usize),
    /// Within tolerance of edge `i`; the point is projected onto the edge.
    Edge(usize, Point3),
    Inside(Point3),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreaklineCase {
    /// Both ends on corners: the piece already is a mesh edge.
    CornerCorner,
    /// One end on corner `corner`; the other on edge `far_edge`, or inside
    /// when `far_edge` is `None`.
    Corner {
        corner: usize,
        far: Point3,
        far_edge: Option<usize>,
    },
    EdgeEdge {
        start: Point3,
        start_edge: usize,
        end: Point3,
        end_edge: usize,
    },
    Edge {
        on_edge: Point3,
        edge: usize,
        inside: Point3,
    },
    Interior {
        start: Point3,
        end: Point3,
    },
    /// The piece is shorter than the tolerance and acts as a single point.
    Touch(Contact),
}

/// Classify `p` against the nearest edge of `triangle`, then that edge's
/// two ends.
///
/// Only the ends of the edge `p` lies on count as corners, so the two
/// triangles sharing an edge always settle on the same point for it. New
/// points get the elevation they carry, or the surface elevation when they
/// carry none, and are rounded to the precision model.
pub fn classify_point(
    triangle: &Triangle,
    p: &Point3,
    tolerance: f64,
    precision: &PrecisionModel,
) -> Contact {
    let (edge, distance) = triangle.nearest_edge(p);
    if distance >= tolerance {
        let z = if p.has_z() { p.z } else { interpolate(triangle, p) };
        return settle(triangle, precision.round_point(&p.with_z(z)), Contact::Inside);
    }
    let (start, end) = (edge, (edge + 1) % 3);
    let corner = if triangle.point(start).distance_2d(p) <= triangle.point(end).distance_2d(p) {
        start
    } else {
        end
    };
    if triangle.point(corner).distance_2d(p) < tolerance {
        return Contact::Corner(corner);
    }
    let q = triangle.edge(edge).canonical().closest_point(p);
    let z = if p.has_z() { p.z } else { q.z };
    settle(triangle, precision.round_point(&q.with_z(z)), |q| Contact::Edge(edge, q))
}

/// A rounded point that lands on a corner is that corner.
fn settle(triangle: &Triangle, q: Point3, contact: impl FnOnce(Point3) -> Contact) -> Contact {
    triangle
        .vertex_index(&q)
        .map_or_else(|| contact(q), Contact::Corner)
}

/// Classify the piece of `breakline` that `triangle` clips out.
pub fn classify(
    triangle: &Triangle,
    piece: &Segment,
    breakline: &Segment,
    tolerance: f64,
    precision: &PrecisionModel,
) -> BreaklineCase {
    let a = anchor(piece.a, breakline, tolerance * ROUNDING_FRACTION);
    let b = anchor(piece.b, breakline, tolerance * ROUNDING_FRACTION);
    let start = classify_point(triangle, &a, tolerance, precision);
    let end = classify_point(triangle, &b, tolerance, precision);

    use Contact::*;
    if a.distance_2d(&b) < tolerance {
        // A short piece acts as one point. A point on an edge wins, the
        // neighbour across that edge splits there as well.
        match (start, end) {
            (Edge(_, p), Edge(_, q)) if !p.equals_2d(&q) => {}
            (Corner(_) | Inside(_), Edge(..)) => return BreaklineCase::Touch(end),
            _ => return BreaklineCase::Touch(start),
        }
    }
    match (start, end) {
        (Corner(_), Corner(_)) => BreaklineCase::CornerCorner,
        (Corner(corner), Edge(edge, far)) | (Edge(edge, far), Corner(corner)) => {
            BreaklineCase::Corner {
                corner,
                far,
                far_edge: Some(edge),
            }
        }
        (Corner(corner), Inside(far)) | (Inside(far), Corner(corner)) => BreaklineCase::Corner {
            corner,
            far,
            far_edge: None,
        },
        (Edge(start_edge, start), Edge(end_edge, end)) => BreaklineCase::EdgeEdge {
            start,
            start_edge,
            end,
            end_edge,
        },
        (Edge(edge, on_edge), Inside(inside)) | (Inside(inside), Edge(edge, on_edge)) => {
            BreaklineCase::Edge {
                on_edge,
                edge,
                inside,
            }
        }
        (Inside(start), Inside(end)) => BreaklineCase::Interior { start, end },
    }
}

/// Piece ends within rounding of a breakline end become that end, so every
/// triangle sharing it inserts the same point.
fn anchor(p: Point3, breakline: &Segment, epsilon: f64) -> Point3 {
    if p.distance_2d(&breakline.a) < epsilon {
        breakline.a
    } else if p.distance_2d(&breakline.b) < epsilon {
        breakline.b
    } else {
        p
    }
}

/// Replacement triangles for `triangle`, or `None` when it stays as is.
pub fn fan(triangle: &Triangle, case: &BreaklineCase) -> Option<Fan> {
    match *case {
        BreaklineCase::CornerCorner => None,
        BreaklineCase::Corner {
            corner,
            far,
            far_edge,
        } => Some(corner_fan(triangle, corner, far, far_edge)),
        BreaklineCase::EdgeEdge {
            start,
            start_edge,
            end,
            end_edge,
        } => Some(edge_edge_fan(triangle, start, start_edge, end, end_edge)),
        BreaklineCase::Edge {
            on_edge,
            edge,
            inside,
        } => Some(edge_fan(triangle, on_edge, edge, inside)),
        BreaklineCase::Interior { start, end } => interior_fan(triangle, start, end),
        BreaklineCase::Touch(contact) => touch_fan(triangle, contact),
    }
}

fn tri(a: Point3, b: Point3, c: Point3) -> Triangle {
    Triangle::new(a, b, c)
}

fn corner_fan(t: &Triangle, c: usize, far: Point3, far_edge: Option<usize>) -> Fan {
    let corner = t.point(c);
    let next = t.point(c + 1);
    let prev = t.point(c + 2);
    match far_edge.map(|e| (e + 3 - c % 3) % 3) {
        // along the edge leaving the corner
        Some(0) => smallvec![tri(corner, far, prev), tri(far, next, prev)],
        // across to the opposite edge
        Some(1) => smallvec![tri(prev, far, corner), tri(far, next, corner)],
        // along the edge arriving at the corner
        Some(_) => smallvec![tri(corner, far, next), tri(far, prev, next)],
        None => smallvec![
            tri(corner, next, far),
            tri(far, next, prev),
            tri(far, prev, corner),
        ],
    }
}

fn edge_edge_fan(t: &Triangle, start: Point3, i: usize, end: Point3, j: usize) -> Fan {
    let cprev = t.point(i);
    let cnext = t.point(i + 1);
    let copp = t.point(i + 2);
    match (j + 3 - i % 3) % 3 {
        0 => {
            let (a, b) = if cprev.distance_2d(&start) <= cprev.distance_2d(&end) {
                (start, end)
            } else {
                (end, start)
            };
            smallvec![tri(cprev, a, copp), tri(a, b, copp), tri(b, cnext, copp)]
        }
        1 => smallvec![
            tri(cprev, start, copp),
            tri(start, end, copp),
            tri(start, cnext, end),
        ],
        _ => smallvec![
            tri(cprev, start, end),
            tri(start, cnext, end),
            tri(end, cnext, copp),
        ],
    }
}

fn edge_fan(t: &Triangle, q: Point3, i: usize, r: Point3) -> Fan {
    let cprev = t.point(i);
    let cnext = t.point(i + 1);
    let copp = t.point(i + 2);
    smallvec![
        tri(cprev, q, r),
        tri(cnext, q, r),
        tri(cnext, r, copp),
        tri(cprev, r, copp),
    ]
}

/// Five triangles: the end nearer a corner fans to all three corners, and
/// the sub-triangle holding the other end is split again around it.
fn interior_fan(t: &Triangle, start: Point3, end: Point3) -> Option<Fan> {
    let corner_distance = |p: &Point3| t.point(t.nearest_corner(p)).distance_2d(p);
    let (l0, l1) = if corner_distance(&start) <= corner_distance(&end) {
        (start, end)
    } else {
        (end, start)
    };
    let k0 = t.nearest_corner(&l0);
    for k in k0..k0 + 3 {
        let (t0, t1, t2) = (t.point(k), t.point(k + 1), t.point(k + 2));
        if tri(l0, t1, t2).contains_point(&l1) {
            return Some(smallvec![
                tri(t0, t1, l0),
                tri(l0, t1, l1),
                tri(l1, t1, t2),
                tri(l0, l1, t2),
                tri(t0, l0, t2),
            ]);
        }
    }
    log::warn!("interior breakline piece {l0:?}-{l1:?} could not be placed; triangle kept");
    None
}

fn touch_fan(t: &Triangle, contact: Contact) -> Option<Fan> {
    match contact {
        Contact::Corner(_) => None,
        Contact::Edge(i, q) => Some(smallvec![
            tri(q, t.point(i + 1), t.point(i + 2)),
            tri(q, t.point(i + 2), t.point(i)),
        ]),
        Contact::Inside(q) => Some(smallvec![
            tri(q, t.point(0), t.point(1)),
            tri(q, t.point(1), t.point(2)),
            tri(q, t.point(2), t.point(0)),
        ]),
    }
}

impl Tin {
    /// Insert a polyline breakline, one segment at a time.
    pub fn insert_breakline(&mut self, line: &[Point3]) -> Result<()> {
        for pair in line.windows(2) {
            self.insert_edge(&Segment::new(pair[0], pair[1]))?;
        }
        Ok(())
    }

    /// Make `segment` a chain of mesh edges.
    ///
    /// The segment is clipped to the working region and its ends are snapped
    /// to a vertex, or else an edge, within the breakline tolerance. The
    /// result is not re-Delaunayed.
    pub fn insert_edge(&mut self, segment: &Segment) -> Result<()> {
        for p in [segment.a, segment.b] {
            if !p.is_finite_2d() {
                return Err(TinError::NonFiniteCoordinate { x: p.x, y: p.y });
            }
        }
        let precision = self.config.precision;
        let tolerance = self.config.breakline_tolerance;
        let rounded = Segment::new(precision.round_point(&segment.a), precision.round_point(&segment.b));
        let Some(clipped) = self.bounding_box.clip_segment(&rounded) else {
            log::debug!("breakline {rounded:?} lies outside the TIN region");
            return Ok(());
        };
        if !clipped.a.equals_2d(&rounded.a) || !clipped.b.equals_2d(&rounded.b) {
            log::debug!("breakline clipped to {clipped:?}");
        }
        let breakline = Segment::new(self.snap_endpoint(clipped.a), self.snap_endpoint(clipped.b));

        let mut ids = self
            .triangle_index()
            .query(&breakline.bounding_box().expand_by(tolerance));
        ids.sort_unstable();
        ids.dedup();

        let mut plans = Vec::new();
        for id in ids {
            let triangle = self
                .triangles
                .get(id)
                .ok_or(TinError::MissingTriangle(id))?
                .triangle;
            let case = match triangle.intersect(&breakline)? {
                Some(piece) => classify(&triangle, &piece, &breakline, tolerance, &precision),
                None => match touching_end(&triangle, &breakline, tolerance, &precision) {
                    Some(case) => case,
                    None => continue,
                },
            };
            log::trace!("triangle {id:?}: {case:?}");
            if let Some(fan) = fan(&triangle, &case) {
                plans.push((id, fan));
            }
        }

        for (id, fan) in plans {
            self.replace_triangle(id, &fan)?;
        }
        if breakline.length() >= tolerance {
            self.record_breakline(breakline);
        }
        Ok(())
    }

    /// `p` moved onto the nearest vertex, or else the nearest edge, within
    /// the breakline tolerance.
    fn snap_endpoint(&self, p: Point3) -> Point3 {
        let tolerance = self.config.breakline_tolerance;
        let nearby = self.triangles_in(&BoundingBox::from_point(&p).expand_by(tolerance));

        let vertex = nearby
            .iter()
            .flat_map(Triangle::points)
            .map(|v| (v.distance_2d(&p), v))
            .filter(|(d, _)| *d < tolerance)
            .min_by(|a, b| a.0.total_cmp(&b.0));
        if let Some((_, v)) = vertex {
            return v;
        }

        let edge = nearby
            .iter()
            .flat_map(|t| (0..3).map(move |i| t.edge(i).canonical()))
            .map(|e| (e.distance_to(&p), e))
            .filter(|(d, _)| *d < tolerance)
            .min_by(|a, b| a.0.total_cmp(&b.0));
        match edge {
            Some((_, e)) => e.closest_point(&p).with_z(p.z),
            None => p,
        }
    }
}

/// A breakline end lying on an edge of `triangle` without the clip seeing
/// it through rounding; the triangle still has to take the end as a vertex.
fn touching_end(
    triangle: &Triangle,
    breakline: &Segment,
    tolerance: f64,
    precision: &PrecisionModel,
) -> Option<BreaklineCase> {
    let epsilon = tolerance * ROUNDING_FRACTION;
    let window = triangle.bounding_box().expand_by(epsilon);
    [breakline.a, breakline.b]
        .into_iter()
        .filter(|end| window.contains_point(end) && triangle.nearest_edge(end).1 < epsilon)
        .find_map(|end| match classify_point(triangle, &end, tolerance, precision) {
            contact @ Contact::Edge(..) => Some(BreaklineCase::Touch(contact)),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TinConfig;
    use crate::tin::arena::TriangleEntry;

    const TOL: f64 = 1e-2;

    fn triangle() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(8.0, 0.0, 0.0),
            Point3::new(0.0, 8.0, 0.0),
        )
    }

    fn case_for(t: &Triangle, a: (f64, f64), b: (f64, f64)) -> BreaklineCase {
        let breakline = Segment::new(Point3::new(a.0, a.1, 1.0), Point3::new(b.0, b.1, 1.0));
        let piece = t.intersect(&breakline).unwrap().unwrap();
        classify(t, &piece, &breakline, TOL, &PrecisionModel::Floating)
    }

    fn assert_fan_keeps_piece(t: &Triangle, case: &BreaklineCase, a: (f64, f64), b: (f64, f64)) -> Fan {
        let fan = fan(t, case).expect("triangle should be replaced");
        let area: f64 = fan.iter().map(Triangle::area).sum();
        assert!((area - t.area()).abs() < 1e-9, "fan area {area} != {}", t.area());
        assert!(fan.iter().all(|f| !f.is_degenerate()));
        let (pa, pb) = (Point3::xy(a.0, a.1), Point3::xy(b.0, b.1));
        assert!(
            fan.iter().any(|f| f.has_vertex(&pa) && f.has_vertex(&pb)),
            "no fan triangle has the edge {a:?}-{b:?}"
        );
        fan
    }

    #[test]
    fn interior_piece_gets_five_triangles() {
        let t = triangle();
        let case = case_for(&t, (2.0, 1.0), (3.0, 3.0));
        assert!(matches!(case, BreaklineCase::Interior { .. }));
        assert_eq!(assert_fan_keeps_piece(&t, &case, (2.0, 1.0), (3.0, 3.0)).len(), 5);
    }

    #[test]
    fn edge_to_interior_gets_four_triangles() {
        let t = triangle();
        let case = case_for(&t, (0.0, 2.0), (2.0, 2.0));
        assert!(matches!(case, BreaklineCase::Edge { .. }));
        assert_eq!(assert_fan_keeps_piece(&t, &case, (0.0, 2.0), (2.0, 2.0)).len(), 4);
    }

    #[test]
    fn edge_to_edge_cuts_a_corner_off() {
        let t = triangle();
        for (a, b) in [((0.0, 2.0), (2.0, 0.0)), ((0.0, 2.0), (3.0, 5.0)), ((6.0, 0.0), (3.0, 5.0))] {
            let case = case_for(&t, a, b);
            assert!(matches!(case, BreaklineCase::EdgeEdge { .. }), "{case:?}");
            assert_eq!(assert_fan_keeps_piece(&t, &case, a, b).len(), 3);
        }
    }

    #[test]
    fn piece_along_an_edge_splits_it_twice() {
        let t = triangle();
        let case = case_for(&t, (0.0, 5.0), (0.0, 2.0));
        assert!(matches!(case, BreaklineCase::EdgeEdge { .. }));
        assert_eq!(assert_fan_keeps_piece(&t, &case, (0.0, 2.0), (0.0, 5.0)).len(), 3);
    }

    #[test]
    fn corner_cases() {
        let t = triangle();
        let cases = [
            ((0.0, 0.0), (2.0, 2.0), 3),
            ((0.0, 0.0), (4.0, 4.0), 2),
            ((0.0, 0.0), (0.0, 5.0), 2),
            ((0.0, 0.0), (5.0, 0.0), 2),
            ((3.0, 0.0), (0.0, 8.0), 2),
        ];
        for (a, b, expected) in cases {
            let case = case_for(&t, a, b);
            assert!(matches!(case, BreaklineCase::Corner { .. }), "{case:?}");
            assert_eq!(assert_fan_keeps_piece(&t, &case, a, b).len(), expected);
        }
    }

    #[test]
    fn existing_edge_is_left_alone() {
        let t = triangle();
        let case = case_for(&t, (0.0, 0.0), (8.0, 0.0));
        assert_eq!(case, BreaklineCase::CornerCorner);
        assert!(fan(&t, &case).is_none());
    }

    #[test]
    fn touching_point_on_edge_splits_in_two() {
        let t = triangle();
        let case = case_for(&t, (4.0, -3.0), (4.0, 0.0));
        let BreaklineCase::Touch(Contact::Edge(_, q)) = case else {
            panic!("unexpected {case:?}");
        };
        assert_eq!((q.x, q.y), (4.0, 0.0));
        let fan = fan(&t, &case).unwrap();
        assert_eq!(fan.len(), 2);
        assert!(fan.iter().all(|f| f.has_vertex(&q)));
    }

    #[test]
    fn missing_elevation_is_taken_from_the_triangle() {
        let t = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(8.0, 0.0, 8.0),
            Point3::new(0.0, 8.0, 0.0),
        );
        let contact = classify_point(&t, &Point3::xy(4.0, 0.0), TOL, &PrecisionModel::Floating);
        let Contact::Edge(_, q) = contact else {
            panic!("unexpected {contact:?}");
        };
        assert_eq!(q.z, 4.0);
    }

    #[test]
    fn short_piece_prefers_the_point_on_an_edge() {
        // a sliver whose third corner sits 0.005 off its long edge
        let t = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(5.0, 0.005, 0.0),
        );
        let on_edge = Point3::new(5.002, 0.0, 1.0);
        let piece = Segment::new(on_edge, Point3::new(5.0, 0.005, 1.0));
        let breakline = Segment::new(Point3::new(5.002, -3.0, 1.0), Point3::new(5.0, 0.005, 1.0));
        let case = classify(&t, &piece, &breakline, TOL, &PrecisionModel::Floating);
        let BreaklineCase::Touch(Contact::Edge(_, q)) = case else {
            panic!("unexpected {case:?}");
        };
        assert!(q.distance_2d(&on_edge) < 1e-12);
        assert_eq!(q.y, 0.0);
    }

    #[test]
    fn rounded_edge_point_on_a_corner_is_that_corner() {
        let t = triangle();
        let coarse = PrecisionModel::fixed(1.0, 1.0);
        let contact = classify_point(&t, &Point3::new(0.4, 0.0, 1.0), 0.1, &coarse);
        assert_eq!(contact, Contact::Corner(t.vertex_index(&Point3::xy(0.0, 0.0)).unwrap()));
    }

    #[test]
    fn failed_plan_leaves_the_mesh_untouched() {
        let mut tin = Tin::with_config(
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            TinConfig::default().with_margin(0.0),
        )
        .unwrap();
        // a flat triangle slipped past the arena checks; clipping it fails
        let flat = Triangle::new(
            Point3::new(2.0, 5.0, 0.0),
            Point3::new(4.0, 5.0, 0.0),
            Point3::new(6.0, 5.0, 0.0),
        );
        tin.triangles.insert(TriangleEntry::new(flat, tin.config.circle_tolerance));
        tin.invalidate_triangle_index();
        let before = tin.triangles();

        let line = Segment::new(Point3::new(0.0, 5.0, 1.0), Point3::new(10.0, 5.0, 1.0));
        let err = tin.insert_edge(&line).unwrap_err();
        assert!(matches!(err, TinError::MalformedIntersection { .. }));
        let after = tin.triangles();
        assert_eq!(after.len(), before.len());
        assert!(before.iter().all(|t| after.contains(t)));
    }
}
