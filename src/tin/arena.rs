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

use crate::geometry::{BoundingBox, Circle, Triangle};

/// Opaque handle to a live triangle. Both spatial indices store handles,
/// never triangles, so a stale entry is detectable instead of dangling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleId(u32);

impl TriangleId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A stored triangle together with the keys it is indexed under.
///
/// The boxes are computed once at insertion so that removal always presents
/// the exact key the entry was inserted with.
#[derive(Debug, Clone)]
pub(crate) struct TriangleEntry {
    pub triangle: Triangle,
    pub circumcircle: Circle,
    pub circumcircle_box: BoundingBox,
    pub geometry_box: BoundingBox,
}

impl TriangleEntry {
    pub fn new(triangle: Triangle, circle_tolerance: f64) -> Self {
        let circumcircle = triangle.circumcircle_with_tolerance(circle_tolerance);
        Self {
            triangle,
            circumcircle,
            circumcircle_box: circumcircle.bounding_box(),
            geometry_box: triangle.bounding_box(),
        }
    }
}

/// Slot storage with a free list; handles of removed triangles are reused.
#[derive(Debug, Clone, Default)]
pub(crate) struct TriangleArena {
    slots: Vec<Option<TriangleEntry>>,
    free: Vec<u32>,
    live: usize,
}

impl TriangleArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: TriangleEntry) -> TriangleId {
        self.live += 1;
        if let Some(slot) = self.free.pop() {
            self.slots[slot as usize] = Some(entry);
            TriangleId(slot)
        } else {
            self.slots.push(Some(entry));
            TriangleId((self.slots.len() - 1) as u32)
        }
    }

    pub fn remove(&mut self, id: TriangleId) -> Option<TriangleEntry> {
        let entry = self.slots.get_mut(id.index())?.take()?;
        self.free.push(id.0);
        self.live -= 1;
        Some(entry)
    }

    #[inline]
    pub fn get(&self, id: TriangleId) -> Option<&TriangleEntry> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn iter(&self) -> impl Iterator<Item = (TriangleId, &TriangleEntry)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|e| (TriangleId(i as u32), e)))
    }
}
