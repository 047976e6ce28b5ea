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

use tinmesh::geometry::Point3;
use tinmesh::kernel::{Orientation, orient2d, orientation};

#[test]
fn ccw_test() {
    let a = Point3::xy(0.0, 0.0);
    let b = Point3::xy(1.0, 0.0);
    let c = Point3::xy(0.0, 1.0);

    assert!(orient2d(&a, &b, &c) > 0.0); // Counter-clockwise
    assert_eq!(orientation(&a, &b, &c), Orientation::CounterClockwise);
}

#[test]
fn cw_test() {
    let a = Point3::xy(0.0, 0.0);
    let b = Point3::xy(0.0, 1.0);
    let c = Point3::xy(1.0, 0.0);

    assert!(orient2d(&a, &b, &c) < 0.0);
    assert_eq!(orientation(&a, &b, &c), Orientation::Clockwise);
}

#[test]
fn collinear_test() {
    let a = Point3::xy(0.0, 0.0);
    let b = Point3::xy(1.0, 1.0);
    let c = Point3::xy(3.0, 3.0);

    assert_eq!(orient2d(&a, &b, &c), 0.0);
    assert_eq!(orientation(&a, &b, &c), Orientation::Collinear);
}

#[test]
fn elevation_is_ignored() {
    let a = Point3::new(0.0, 0.0, 10.0);
    let b = Point3::new(1.0, 0.0, -3.0);
    let c = Point3::new(0.0, 1.0, f64::NAN);

    assert_eq!(orientation(&a, &b, &c), Orientation::CounterClockwise);
}
