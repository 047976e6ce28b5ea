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

use crate::geometry::{
    Point3, Segment, SegmentIntersection, Triangle, intersection::EPS,
    segment_segment_intersection,
};
use crate::tin::Tin;

impl Tin {
    /// Surface elevation at `(x, y)`, or `None` outside the mesh.
    pub fn elevation(&self, x: f64, y: f64) -> Option<f64> {
        self.elevation_at(&Point3::xy(x, y))
    }

    pub fn elevation_at(&self, p: &Point3) -> Option<f64> {
        if !p.is_finite_2d() {
            return None;
        }
        let p = self.config.precision.round_xy(p);
        let candidates: Vec<Triangle> = self
            .triangle_ids_at(&p)
            .into_iter()
            .filter_map(|id| self.triangles.get(id).map(|e| e.triangle))
            .collect();
        // a vertex answers with its own elevation, whichever triangle holds it
        if let Some(z) = candidates
            .iter()
            .find_map(|t| t.vertex_index(&p).map(|i| t.point(i).z))
        {
            return Some(z);
        }
        candidates.first().map(|t| interpolate(t, &p))
    }

    /// Copy of `line` with every vertex lifted onto the surface. Vertices
    /// the mesh does not cover keep their elevation.
    pub fn drape(&self, line: &[Point3]) -> Vec<Point3> {
        line.iter()
            .map(|p| match self.elevation_at(p) {
                Some(z) => p.with_z(z),
                None => *p,
            })
            .collect()
    }
}

/// Linear elevation of `p` inside `triangle`.
///
/// A ray from the corner nearest `p` through `p` meets the opposite edge;
/// `z` is read off that edge and interpolated back along the ray.
pub(crate) fn interpolate(triangle: &Triangle, p: &Point3) -> f64 {
    if let Some(i) = triangle.vertex_index(p) {
        return triangle.point(i).z;
    }
    let c = triangle.nearest_corner(p);
    let corner = triangle.point(c);
    let opposite = triangle.edge(c + 1).canonical();
    let ray = Segment::new(corner, p.with_z(corner.z)).extend(0.0, triangle.perimeter());

    if let SegmentIntersection::Point(hit) = segment_segment_intersection(&opposite, &ray, EPS) {
        let d = corner.distance_2d(&hit);
        if d > 0.0 {
            return corner.z + (hit.z - corner.z) * (corner.distance_2d(p) / d);
        }
    }
    barycentric_elevation(triangle, p)
}

fn barycentric_elevation(triangle: &Triangle, p: &Point3) -> f64 {
    match triangle.barycentric(p) {
        Some((u, v, w)) => u * triangle.p0().z + v * triangle.p1().z + w * triangle.p2().z,
        None => triangle.point(triangle.nearest_corner(p)).z,
    }
}
