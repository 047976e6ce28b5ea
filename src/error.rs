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

use thiserror::Error;

use crate::tin::TriangleId;

pub type Result<T> = std::result::Result<T, TinError>;

#[derive(Debug, Error)]
pub enum TinError {
    /// The node lies outside the region the TIN was created for.
    #[error("point ({x}, {y}) lies outside the TIN region")]
    OutsideRegion { x: f64, y: f64 },

    #[error("point ({x}, {y}) has a non-finite planar coordinate")]
    NonFiniteCoordinate { x: f64, y: f64 },

    /// Clipping a breakline piece to a triangle produced something other
    /// than a point or a segment.
    #[error("breakline clip produced {count} distinct points")]
    MalformedIntersection { count: usize },

    /// The geometry index returned a handle that is no longer in the arena.
    #[error("triangle {0:?} is indexed but not stored")]
    MissingTriangle(TriangleId),

    #[error("vertex index {index} out of range for {len} vertices")]
    VertexIndexOutOfRange { index: usize, len: usize },

    #[error("triangle {index} is degenerate")]
    DegenerateTriangle { index: usize },

    #[error("TIN region has zero area")]
    EmptyRegion,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
