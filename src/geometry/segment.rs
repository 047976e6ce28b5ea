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

use crate::geometry::{aabb::BoundingBox, point_3::Point3};

/// A straight piece between two points. Lengths and distances are planar;
/// `z` is interpolated linearly along the segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Point3,
    pub b: Point3,
}

impl Segment {
    pub fn new(a: Point3, b: Point3) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f64 {
        self.a.distance_2d(&self.b)
    }

    pub fn midpoint(&self) -> Point3 {
        self.a.lerp(&self.b, 0.5)
    }

    pub fn inverse(&self) -> Self {
        Self::new(self.b, self.a)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.a, &self.b)
    }

    /// Same segment with its ends in natural point order, so that a shared
    /// triangle edge yields bit-identical results from either side.
    pub fn canonical(&self) -> Self {
        if self.a.cmp_2d(&self.b).is_gt() {
            self.inverse()
        } else {
            *self
        }
    }

    pub fn point_at(&self, t: f64) -> Point3 {
        self.a.lerp(&self.b, t)
    }

    /// Parameter of the orthogonal projection of `p` onto the supporting line.
    pub fn project_factor(&self, p: &Point3) -> f64 {
        let dx = self.b.x - self.a.x;
        let dy = self.b.y - self.a.y;
        let len2 = dx * dx + dy * dy;
        if len2 == 0.0 {
            return 0.0;
        }
        ((p.x - self.a.x) * dx + (p.y - self.a.y) * dy) / len2
    }

    pub fn closest_point(&self, p: &Point3) -> Point3 {
        self.point_at(self.project_factor(p).clamp(0.0, 1.0))
    }

    pub fn distance_to(&self, p: &Point3) -> f64 {
        self.closest_point(p).distance_2d(p)
    }

    /// Elevation of the segment at the projection of `p`.
    pub fn elevation_at(&self, p: &Point3) -> f64 {
        if self.length() == 0.0 {
            return self.a.z;
        }
        self.point_at(self.project_factor(p).clamp(0.0, 1.0)).z
    }

    /// Lengthen the segment backwards from `a` by `start` and forwards from
    /// `b` by `end`, keeping the elevation gradient.
    pub fn extend(&self, start: f64, end: f64) -> Self {
        let len = self.length();
        if len == 0.0 {
            return *self;
        }
        Self::new(self.point_at(-start / len), self.point_at(1.0 + end / len))
    }
}
