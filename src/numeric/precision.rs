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

use serde::{Deserialize, Serialize};

use crate::geometry::Point3;

/// Coordinate rounding applied to every node before it enters the mesh.
///
/// `Fixed` rounds a value `v` to `round(v * scale) / scale`, so a scale of
/// `1000.0` keeps millimetres. A non-positive or non-finite scale disables
/// rounding on that axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrecisionModel {
    #[default]
    Floating,
    Fixed { scale_xy: f64, scale_z: f64 },
}

impl PrecisionModel {
    pub fn fixed(scale_xy: f64, scale_z: f64) -> Self {
        PrecisionModel::Fixed { scale_xy, scale_z }
    }

    pub fn make_xy_precise(&self, v: f64) -> f64 {
        match self {
            PrecisionModel::Floating => v,
            PrecisionModel::Fixed { scale_xy, .. } => make_precise(v, *scale_xy),
        }
    }

    pub fn make_z_precise(&self, v: f64) -> f64 {
        match self {
            PrecisionModel::Floating => v,
            PrecisionModel::Fixed { scale_z, .. } => make_precise(v, *scale_z),
        }
    }

    /// `p` with x and y rounded; z untouched.
    pub fn round_xy(&self, p: &Point3) -> Point3 {
        Point3::new(self.make_xy_precise(p.x), self.make_xy_precise(p.y), p.z)
    }

    pub fn round_z(&self, z: f64) -> f64 {
        self.make_z_precise(z)
    }

    pub fn round_point(&self, p: &Point3) -> Point3 {
        let xy = self.round_xy(p);
        xy.with_z(self.round_z(p.z))
    }

    pub fn is_valid(&self) -> bool {
        match self {
            PrecisionModel::Floating => true,
            PrecisionModel::Fixed { scale_xy, scale_z } => !scale_xy.is_nan() && !scale_z.is_nan(),
        }
    }
}

fn make_precise(v: f64, scale: f64) -> f64 {
    if scale > 0.0 && scale.is_finite() && v.is_finite() {
        (v * scale).round() / scale
    } else {
        v
    }
}
