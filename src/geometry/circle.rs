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

/// Slack added to the radius for containment tests. Grid data puts many
/// points exactly on circumcircles.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub centre: Point3,
    pub radius: f64,
    pub tolerance: f64,
}

impl Circle {
    pub fn new(centre: Point3, radius: f64) -> Self {
        Self {
            centre,
            radius,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(self, tolerance: f64) -> Self {
        Self { tolerance, ..self }
    }

    pub fn contains(&self, p: &Point3) -> bool {
        self.centre.distance_2d(p) < self.radius + self.tolerance
    }

    /// Envelope of the circle, grown by the containment tolerance so that a
    /// box query never misses a point `contains` would accept.
    pub fn bounding_box(&self) -> BoundingBox {
        let r = self.radius + self.tolerance;
        BoundingBox {
            min_x: self.centre.x - r,
            min_y: self.centre.y - r,
            max_x: self.centre.x + r,
            max_y: self.centre.y + r,
        }
    }
}
