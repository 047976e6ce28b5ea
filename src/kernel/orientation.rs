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

use num_traits::Float;

use crate::geometry::Point3;

/// Turn direction of an ordered point triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Clockwise,
    Collinear,
    CounterClockwise,
}

impl Orientation {
    pub fn from_determinant<T: Float>(det: T) -> Self {
        if det > T::zero() {
            Orientation::CounterClockwise
        } else if det < T::zero() {
            Orientation::Clockwise
        } else {
            Orientation::Collinear
        }
    }
}

/// 2D cross product of `(ax, ay)` and `(bx, by)`.
#[inline(always)]
pub fn cross<T: Float>(ax: T, ay: T, bx: T, by: T) -> T {
    ax * by - ay * bx
}

/// Returns:
/// - >0 if counter-clockwise
/// - <0 if clockwise
/// - =0 if collinear
pub fn orient2d(a: &Point3, b: &Point3, c: &Point3) -> f64 {
    cross(b.x - a.x, b.y - a.y, c.x - a.x, c.y - a.y)
}

pub fn orientation(a: &Point3, b: &Point3, c: &Point3) -> Orientation {
    Orientation::from_determinant(orient2d(a, b, c))
}

#[cfg(test)]
mod tests {
    use crate::geometry::Point3;
    use crate::kernel::orientation::{Orientation, orient2d, orientation};

    #[test]
    fn ccw_test() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);

        assert!(orient2d(&a, &b, &c) > 0.0); // Counter-clockwise
        assert_eq!(orientation(&a, &c, &b), Orientation::Clockwise);
    }

    #[test]
    fn elevation_does_not_affect_orientation() {
        let a = Point3::new(0.0, 0.0, 100.0);
        let b = Point3::new(1.0, 1.0, -3.0);
        let c = Point3::new(2.0, 2.0, f64::NAN);

        assert_eq!(orientation(&a, &b, &c), Orientation::Collinear);
    }

    #[test]
    fn generic_determinant_sign() {
        assert_eq!(
            Orientation::from_determinant(-1.0f32),
            Orientation::Clockwise
        );
        assert_eq!(Orientation::from_determinant(0.0f64), Orientation::Collinear);
    }
}
