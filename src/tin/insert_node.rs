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

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::error::{Result, TinError};
use crate::geometry::{BoundingBox, NodeKey, Point3, Triangle};
use crate::kernel::{Orientation, orientation};
use crate::tin::{Tin, TriangleId};

/// What [`Tin::insert_node`] did with a node that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A node with the same planar position already exists; nothing changed.
    Duplicate,
    /// No triangle contains the node; nothing changed.
    Uncovered,
}

type EdgeKey = (NodeKey, NodeKey);

fn edge_key(a: &Point3, b: &Point3) -> EdgeKey {
    let (ka, kb) = (a.key_2d(), b.key_2d());
    if ka <= kb { (ka, kb) } else { (kb, ka) }
}

/// Triangles to remove around a new node and the edges to fan it to.
struct Cavity {
    triangles: Vec<TriangleId>,
    /// Outer edges in the clockwise order of the triangle they came from.
    boundary: Vec<(Point3, Point3)>,
}

impl Tin {
    /// Insert one node and retriangulate its cavity.
    ///
    /// The node is rounded with the configured precision first. A node
    /// without elevation (NaN `z`) takes the current surface elevation.
    pub fn insert_node(&mut self, node: Point3) -> Result<InsertOutcome> {
        if !node.is_finite_2d() {
            return Err(TinError::NonFiniteCoordinate { x: node.x, y: node.y });
        }
        let precision = self.config.precision;
        let mut node = precision.round_point(&node);
        if !self.bounding_box.contains_point(&node) {
            return Err(TinError::OutsideRegion { x: node.x, y: node.y });
        }
        if self.nodes.contains_key(&node.key_2d()) {
            return Ok(InsertOutcome::Duplicate);
        }
        if !node.has_z() {
            // the seed mesh covers the region, so a miss means a corrupted mesh
            node.z = self.elevation_at(&node).map_or(0.0, |z| precision.round_z(z));
        }
        if let Some(corner) = self.seed_corner_index(&node) {
            self.claim_seed_corner(corner, node);
            return Ok(InsertOutcome::Inserted);
        }

        let cavity = self.cavity(&node);
        if cavity.triangles.is_empty() {
            log::warn!("no triangle contains ({}, {}); node skipped", node.x, node.y);
            return Ok(InsertOutcome::Uncovered);
        }
        log::trace!(
            "node ({}, {}): cavity of {} triangles, {} boundary edges",
            node.x,
            node.y,
            cavity.triangles.len(),
            cavity.boundary.len()
        );

        self.invalidate_triangle_index();
        for id in &cavity.triangles {
            self.remove_triangle(*id);
        }
        for (a, b) in cavity.boundary {
            self.add_triangle(Triangle::new(node, a, b));
        }
        self.nodes.insert(node.key_2d(), node);
        Ok(InsertOutcome::Inserted)
    }

    /// Insert every node of `nodes`, stopping at the first error. Returns how
    /// many were actually added to the mesh.
    pub fn insert_nodes<I>(&mut self, nodes: I) -> Result<usize>
    where
        I: IntoIterator<Item = Point3>,
    {
        let mut inserted = 0;
        for node in nodes {
            if self.insert_node(node)? == InsertOutcome::Inserted {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// The triangles containing `p`, grown across shared edges into
    /// neighbours whose circumcircle contains `p`. Breakline edges are never
    /// crossed. A neighbour with an outer edge that faces away from `p` is
    /// dropped and the cavity regrown, so that `p` sees every outer edge.
    fn cavity(&self, p: &Point3) -> Cavity {
        let arena = &self.triangles;
        let candidates: Vec<(TriangleId, Triangle)> = self
            .circumcircle_index()
            .query_with(&BoundingBox::from_point(p), |id| {
                arena.get(*id).is_some_and(|e| e.circumcircle.contains(p))
            })
            .into_iter()
            .filter_map(|id| arena.get(id).map(|e| (id, e.triangle)))
            .collect();

        let mut by_edge: AHashMap<EdgeKey, SmallVec<[usize; 2]>> = AHashMap::new();
        for (i, (_, t)) in candidates.iter().enumerate() {
            for e in 0..3 {
                by_edge
                    .entry(edge_key(&t.point(e), &t.point(e + 1)))
                    .or_default()
                    .push(i);
            }
        }
        let seeds: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, (_, t))| t.contains_point(p))
            .map(|(i, _)| i)
            .collect();

        let mut excluded = vec![false; candidates.len()];
        loop {
            let inside = self.grow_cavity(&candidates, &by_edge, &seeds, &excluded);
            let mut boundary = Vec::new();
            let mut hidden = Vec::new();
            for (i, (_, t)) in candidates.iter().enumerate() {
                if !inside[i] {
                    continue;
                }
                for e in 0..3 {
                    let (a, b) = (t.point(e), t.point(e + 1));
                    let shared = by_edge
                        .get(&edge_key(&a, &b))
                        .is_some_and(|owners| owners.iter().any(|&j| j != i && inside[j]));
                    if shared {
                        continue;
                    }
                    match orientation(&a, &b, p) {
                        Orientation::Clockwise => boundary.push((a, b)),
                        Orientation::CounterClockwise if !seeds.contains(&i) => hidden.push(i),
                        // p on the edge's line: the fan triangle would be flat
                        _ => {}
                    }
                }
            }
            if hidden.is_empty() {
                let triangles = candidates
                    .iter()
                    .zip(&inside)
                    .filter(|(_, inside)| **inside)
                    .map(|((id, _), _)| *id)
                    .collect();
                return Cavity {
                    triangles,
                    boundary,
                };
            }
            for i in hidden {
                excluded[i] = true;
            }
        }
    }

    /// Flood from `seeds` over shared, unconstrained edges.
    fn grow_cavity(
        &self,
        candidates: &[(TriangleId, Triangle)],
        by_edge: &AHashMap<EdgeKey, SmallVec<[usize; 2]>>,
        seeds: &[usize],
        excluded: &[bool],
    ) -> Vec<bool> {
        let mut inside = vec![false; candidates.len()];
        let mut stack = seeds.to_vec();
        for &i in seeds {
            inside[i] = true;
        }
        while let Some(i) = stack.pop() {
            let t = &candidates[i].1;
            for e in 0..3 {
                let (a, b) = (t.point(e), t.point(e + 1));
                let Some(owners) = by_edge.get(&edge_key(&a, &b)) else {
                    continue;
                };
                if owners.len() < 2 || self.is_constrained(&a, &b) {
                    continue;
                }
                for &j in owners {
                    if !inside[j] && !excluded[j] {
                        inside[j] = true;
                        stack.push(j);
                    }
                }
            }
        }
        inside
    }

    /// A node on a seed corner takes the corner over: every triangle using
    /// the corner gets the node's elevation instead.
    fn claim_seed_corner(&mut self, corner: usize, node: Point3) {
        let seed = self.seed_corners[corner];
        let arena = &self.triangles;
        let incident = self
            .circumcircle_index()
            .query_with(&BoundingBox::from_point(&seed), |id| {
                arena.get(*id).is_some_and(|e| e.triangle.has_vertex(&seed))
            });
        log::trace!("node claims seed corner {corner} in {} triangles", incident.len());
        for id in incident {
            if let Some(t) = self.remove_triangle(id) {
                if let Some(i) = t.vertex_index(&seed) {
                    self.add_triangle(t.with_vertex(i, node));
                }
            }
        }
        self.nodes.insert(node.key_2d(), node);
    }
}
