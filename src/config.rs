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

//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object `{}` is a valid
//! configuration.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TinError};
use crate::geometry::circle::DEFAULT_TOLERANCE;
use crate::numeric::PrecisionModel;

/// Distance the seed rectangle extends beyond the requested region.
pub const DEFAULT_MARGIN: f64 = 100.0;
pub const DEFAULT_CIRCLE_TOLERANCE: f64 = DEFAULT_TOLERANCE;
/// Snap distance for breakline endpoints against existing corners and edges.
pub const DEFAULT_BREAKLINE_TOLERANCE: f64 = 1e-2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TinConfig {
    pub margin: f64,
    pub circle_tolerance: f64,
    pub breakline_tolerance: f64,
    pub precision: PrecisionModel,
}

impl Default for TinConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            circle_tolerance: DEFAULT_CIRCLE_TOLERANCE,
            breakline_tolerance: DEFAULT_BREAKLINE_TOLERANCE,
            precision: PrecisionModel::Floating,
        }
    }
}

impl TinConfig {
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_precision(mut self, precision: PrecisionModel) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_breakline_tolerance(mut self, tolerance: f64) -> Self {
        self.breakline_tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(TinError::InvalidConfig(format!(
                "margin must be finite and non-negative, got {}",
                self.margin
            )));
        }
        if !(self.circle_tolerance.is_finite() && self.circle_tolerance >= 0.0) {
            return Err(TinError::InvalidConfig(format!(
                "circle_tolerance must be finite and non-negative, got {}",
                self.circle_tolerance
            )));
        }
        if !(self.breakline_tolerance.is_finite() && self.breakline_tolerance > 0.0) {
            return Err(TinError::InvalidConfig(format!(
                "breakline_tolerance must be finite and positive, got {}",
                self.breakline_tolerance
            )));
        }
        if !self.precision.is_valid() {
            return Err(TinError::InvalidConfig("precision scale is NaN".into()));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: TinConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let config: TinConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
