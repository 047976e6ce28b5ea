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

use crate::geometry::{Point3, Segment};
use crate::kernel::orientation::orient2d;

pub fn are_equal_2d(p1: &Point3, p2: &Point3, eps: f64) -> bool {
    (p1.x - p2.x).abs() < eps && (p1.y - p2.y).abs() < eps
}

/// Collinearity with `eps` measured as a distance from the line `a`–`b`.
pub fn are_collinear(a: &Point3, b: &Point3, c: &Point3, eps: f64) -> bool {
    let len = a.distance_2d(b);
    if len <= eps {
        // A and B coincide; collinear iff C coincides too
        return a.distance_2d(c) <= eps;
    }
    (orient2d(a, b, c) / len).abs() <= eps
}

pub fn distance_to_segment(p: &Point3, seg: &Segment) -> f64 {
    seg.distance_to(p)
}

pub fn is_point_on_segment(p: &Point3, seg: &Segment, eps: f64) -> bool {
    distance_to_segment(p, seg) <= eps
}
