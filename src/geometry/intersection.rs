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

use crate::{
    geometry::{Point3, Segment},
    kernel::orientation::cross,
};

/// Default relative tolerance for [`segment_segment_intersection`].
pub const EPS: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub enum SegmentIntersection {
    None,
    Point(Point3),
    Overlapping(Segment),
}

/// Intersect two segments in the XY plane.
///
/// `eps` is relative to the product of the segment lengths, so the same value
/// works for survey coordinates and unit-scale tests alike. Elevations of the
/// result are interpolated along `seg1`.
pub fn segment_segment_intersection(
    seg1: &Segment,
    seg2: &Segment,
    eps: f64,
) -> SegmentIntersection {
    let a = &seg1.a;
    let b = &seg1.b;
    let c = &seg2.a;
    let d = &seg2.b;

    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let (cdx, cdy) = (d.x - c.x, d.y - c.y);
    let (acx, acy) = (c.x - a.x, c.y - a.y);

    let o1 = cross(abx, aby, acx, acy);
    let o2 = cross(abx, aby, d.x - a.x, d.y - a.y);
    let o3 = cross(cdx, cdy, a.x - c.x, a.y - c.y);
    let o4 = cross(cdx, cdy, b.x - c.x, b.y - c.y);

    let tol = eps * seg1.length().max(f64::MIN_POSITIVE) * seg2.length().max(f64::MIN_POSITIVE);

    if o1.abs() <= tol && o2.abs() <= tol && o3.abs() <= tol && o4.abs() <= tol {
        return collinear_overlap(seg1, seg2);
    }

    let intersecting = o1 * o2 <= 0.0 && o3 * o4 <= 0.0;
    if !intersecting {
        return SegmentIntersection::None;
    }

    let denom = cross(abx, aby, cdx, cdy);
    if denom.abs() <= tol {
        return SegmentIntersection::None; // Parallel but not overlapping
    }

    let t = (cross(acx, acy, cdx, cdy) / denom).clamp(0.0, 1.0);
    SegmentIntersection::Point(seg1.point_at(t))
}

/// Shared part of two collinear segments, parameterised along `seg1`.
fn collinear_overlap(seg1: &Segment, seg2: &Segment) -> SegmentIntersection {
    if seg1.length() == 0.0 {
        return if seg2.distance_to(&seg1.a) == 0.0 {
            SegmentIntersection::Point(seg1.a)
        } else {
            SegmentIntersection::None
        };
    }

    let tc = seg1.project_factor(&seg2.a);
    let td = seg1.project_factor(&seg2.b);
    let lo = tc.min(td).max(0.0);
    let hi = tc.max(td).min(1.0);

    if lo > hi {
        SegmentIntersection::None
    } else if lo == hi {
        SegmentIntersection::Point(seg1.point_at(lo))
    } else {
        SegmentIntersection::Overlapping(Segment::new(seg1.point_at(lo), seg1.point_at(hi)))
    }
}
