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

use crate::geometry::aabb::BoundingBox;

/// A simple AABB‐tree of copyable handles `D`.
///
/// Removal only marks the leaf invalid; the owning [`SpatialIndex`] compacts
/// the tree once dead leaves dominate or the tree has grown too deep.
#[derive(Debug, Clone)]
pub enum AabbTree<D> {
    Leaf {
        aabb: BoundingBox,
        data: D,
        valid: bool, // Track validity without structural changes
    },
    Node {
        aabb: BoundingBox,
        left: Box<AabbTree<D>>,
        right: Box<AabbTree<D>>,
        valid_count: usize, // Count of valid children
        total_count: usize, // Total children
        height: usize,
    },
}

impl<D: Copy + PartialEq> AabbTree<D> {
    /// Build an AABB‐tree over `(aabb, data)` pairs via recursive median split
    /// along the longest axis. `items` must not be empty.
    pub fn build(items: Vec<(BoundingBox, D)>) -> Self {
        debug_assert!(!items.is_empty(), "cannot build tree from empty items");
        Self::build_binary_tree(items)
    }

    fn build_binary_tree(mut items: Vec<(BoundingBox, D)>) -> Self {
        if items.len() == 1 {
            let (aabb, data) = items[0];
            return AabbTree::Leaf {
                aabb,
                data,
                valid: true,
            };
        }

        let bounds = items
            .iter()
            .skip(1)
            .fold(items[0].0, |acc, (b, _)| acc.union(b));
        let axis = bounds.longest_axis();
        items.sort_by(|(a, _), (b, _)| {
            a.center(axis)
                .partial_cmp(&b.center(axis))
                .unwrap_or(Ordering::Equal)
        });

        let mid = items.len() / 2;
        let right_items = items.split_off(mid); // items = left half

        Self::join(
            Box::new(Self::build_binary_tree(items)),
            Box::new(Self::build_binary_tree(right_items)),
        )
    }

    fn join(left: Box<AabbTree<D>>, right: Box<AabbTree<D>>) -> Self {
        AabbTree::Node {
            aabb: left.aabb().union(right.aabb()),
            valid_count: left.valid_count() + right.valid_count(),
            total_count: left.size() + right.size(),
            height: 1 + left.height().max(right.height()),
            left,
            right,
        }
    }

    /// Get AABB of this node/leaf
    pub fn aabb(&self) -> &BoundingBox {
        match self {
            AabbTree::Leaf { aabb, .. } => aabb,
            AabbTree::Node { aabb, .. } => aabb,
        }
    }

    fn valid_count(&self) -> usize {
        match self {
            AabbTree::Leaf { valid, .. } => usize::from(*valid),
            AabbTree::Node { valid_count, .. } => *valid_count,
        }
    }

    /// Get tree size for balancing decisions (O(1))
    fn size(&self) -> usize {
        match self {
            AabbTree::Leaf { .. } => 1,
            AabbTree::Node { total_count, .. } => *total_count,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            AabbTree::Leaf { .. } => 1,
            AabbTree::Node { height, .. } => *height,
        }
    }

    /// Visit every valid entry whose AABB intersects `query`.
    pub fn query<F>(&self, query: &BoundingBox, visit: &mut F)
    where
        F: FnMut(&BoundingBox, &D),
    {
        match self {
            AabbTree::Leaf { aabb, data, valid } => {
                if *valid && aabb.intersects(query) {
                    visit(aabb, data);
                }
            }
            AabbTree::Node {
                aabb,
                left,
                right,
                valid_count,
                ..
            } => {
                if *valid_count > 0 && aabb.intersects(query) {
                    left.query(query, visit);
                    right.query(query, visit);
                }
            }
        }
    }

    /// Mark the entry `(bbox, target)` invalid. Only subtrees whose AABB
    /// intersects `bbox` are searched.
    pub fn invalidate(&mut self, bbox: &BoundingBox, target: &D) -> bool {
        match self {
            AabbTree::Leaf { aabb, data, valid } => {
                if *valid && data == target && aabb == bbox {
                    *valid = false;
                    return true;
                }
                false
            }
            AabbTree::Node {
                aabb,
                left,
                right,
                valid_count,
                ..
            } => {
                if *valid_count == 0 || !aabb.intersects(bbox) {
                    return false;
                }
                if left.invalidate(bbox, target) || right.invalidate(bbox, target) {
                    *valid_count -= 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Add a new entry, descending into the child that grows least.
    pub fn insert(&mut self, new_aabb: BoundingBox, new_data: D) {
        match self {
            AabbTree::Leaf { .. } => {
                let new_leaf = AabbTree::Leaf {
                    aabb: new_aabb,
                    data: new_data,
                    valid: true,
                };
                let old_leaf = std::mem::replace(self, new_leaf.clone());
                *self = Self::join(Box::new(old_leaf), Box::new(new_leaf));
            }
            AabbTree::Node {
                aabb,
                left,
                right,
                valid_count,
                total_count,
                height,
            } => {
                *aabb = aabb.union(&new_aabb);
                *valid_count += 1;
                *total_count += 1;

                let grow_left = left.aabb().enlargement(&new_aabb);
                let grow_right = right.aabb().enlargement(&new_aabb);
                let go_left = match grow_left.partial_cmp(&grow_right) {
                    Some(Ordering::Less) => true,
                    Some(Ordering::Greater) => false,
                    _ => left.size() <= right.size(),
                };
                if go_left {
                    left.insert(new_aabb, new_data);
                } else {
                    right.insert(new_aabb, new_data);
                }
                *height = 1 + left.height().max(right.height());
            }
        }
    }

    /// Collect all valid (aabb, data) pairs
    pub fn collect_valid(&self, out: &mut Vec<(BoundingBox, D)>) {
        match self {
            AabbTree::Leaf { aabb, data, valid } => {
                if *valid {
                    out.push((*aabb, *data));
                }
            }
            AabbTree::Node {
                left,
                right,
                valid_count,
                ..
            } => {
                if *valid_count > 0 {
                    left.collect_valid(out);
                    right.collect_valid(out);
                }
            }
        }
    }
}

/// Bounding-box index: maps boxes to handles and answers range queries.
#[derive(Debug, Clone)]
pub struct SpatialIndex<D> {
    root: Option<AabbTree<D>>,
    len: usize,
}

impl<D> Default for SpatialIndex<D> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<D: Copy + PartialEq> SpatialIndex<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bulk_load(items: Vec<(BoundingBox, D)>) -> Self {
        let len = items.len();
        let root = if items.is_empty() {
            None
        } else {
            Some(AabbTree::build(items))
        };
        Self { root, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    pub fn insert(&mut self, aabb: BoundingBox, data: D) {
        match &mut self.root {
            Some(root) => root.insert(aabb, data),
            None => {
                self.root = Some(AabbTree::Leaf {
                    aabb,
                    data,
                    valid: true,
                })
            }
        }
        self.len += 1;
        if self.needs_rebuild() {
            self.compact();
        }
    }

    /// Remove the entry stored under exactly `(aabb, data)`. Returns `false`
    /// when no such entry exists.
    pub fn remove(&mut self, aabb: &BoundingBox, data: &D) -> bool {
        let removed = self
            .root
            .as_mut()
            .is_some_and(|root| root.invalidate(aabb, data));
        if removed {
            self.len -= 1;
            if self.needs_rebuild() {
                self.compact();
            }
        }
        removed
    }

    pub fn query(&self, aabb: &BoundingBox) -> Vec<D> {
        self.query_with(aabb, |_| true)
    }

    /// Box query whose hits are filtered through `predicate`.
    pub fn query_with<P>(&self, aabb: &BoundingBox, mut predicate: P) -> Vec<D>
    where
        P: FnMut(&D) -> bool,
    {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.query(aabb, &mut |_: &BoundingBox, data: &D| {
                if predicate(data) {
                    out.push(*data);
                }
            });
        }
        out
    }

    /// All live entries.
    pub fn entries(&self) -> Vec<(BoundingBox, D)> {
        let mut out = Vec::with_capacity(self.len);
        if let Some(root) = &self.root {
            root.collect_valid(&mut out);
        }
        out
    }

    pub fn values(&self) -> Vec<D> {
        self.entries().into_iter().map(|(_, d)| d).collect()
    }

    /// Check if tree needs rebuilding (O(1))
    fn needs_rebuild(&self) -> bool {
        let Some(root) = &self.root else {
            return false;
        };
        let total = root.size();
        if total < 16 {
            return false;
        }
        let max_height = 2 * (usize::BITS - total.leading_zeros()) as usize + 8;
        (self.len as f64 / total as f64) < 0.5 || root.height() > max_height
    }

    /// Compact tree by removing invalid entries (O(n log n))
    fn compact(&mut self) {
        let entries = self.entries();
        log::debug!(
            "compacting spatial index: {} live of {} entries",
            entries.len(),
            self.root.as_ref().map_or(0, AabbTree::size)
        );
        *self = Self::bulk_load(entries);
    }
}
