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

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A surveyed location: planar position plus elevation.
///
/// Mesh topology only ever compares points in 2D (`equals_2d`); `z` is carried
/// along but never decides adjacency. `z` may be NaN on input to mean
/// "elevation unknown", it is resolved before the point enters a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Hashable identity of a point's planar position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(u64, u64);

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A planar point with an undefined elevation.
    pub const fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: f64::NAN }
    }

    pub fn with_z(&self, z: f64) -> Self {
        Self { z, ..*self }
    }

    pub fn is_finite_2d(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn has_z(&self) -> bool {
        self.z.is_finite()
    }

    pub fn equals_2d(&self, other: &Point3) -> bool {
        self.x == other.x && self.y == other.y
    }

    pub fn distance_2d(&self, other: &Point3) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn distance_squared_2d(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Natural point order: by x, then by y.
    pub fn cmp_2d(&self, other: &Point3) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }

    pub fn key_2d(&self) -> NodeKey {
        // -0.0 + 0.0 == +0.0, so both zeros share a key
        NodeKey((self.x + 0.0).to_bits(), (self.y + 0.0).to_bits())
    }

    /// Linear interpolation of all three ordinates, `t = 0` at `self`.
    pub fn lerp(&self, other: &Point3, t: f64) -> Point3 {
        Point3 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }
}

impl From<(f64, f64, f64)> for Point3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Point3::new(x, y, z)
    }
}
