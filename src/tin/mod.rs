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

//! Triangulated irregular network.
//!
//! The mesh is a set of clockwise triangles stored in an arena and indexed
//! twice by bounding box: under its circumcircle envelope (kept up to date
//! while editing, used to find insertion cavities) and under its own envelope
//! (a lazy cache, used for point location and breakline insertion).
//! [`Tin::finish_editing`] releases the circumcircle index; the next
//! insertion rebuilds it from the arena.
//!
//! Inserted breaklines are remembered. Later node insertions never
//! retriangulate across them.
//!
//! Construction seeds the mesh with two triangles splitting the working
//! region, grown by [`TinConfig::margin`], along its `min`-`max` diagonal.
//! Every public operation leaves the mesh a gap-free, overlap-free
//! partition of that seed rectangle.

mod arena;
mod breakline;
mod elevation;
mod insert_node;

use ahash::AHashMap;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::config::TinConfig;
use crate::error::{Result, TinError};
use crate::geometry::{BoundingBox, NodeKey, Point3, Segment, SpatialIndex, Triangle};

pub use arena::TriangleId;
pub use breakline::{BreaklineCase, Contact};
pub use insert_node::InsertOutcome;

use arena::{TriangleArena, TriangleEntry};

/// A mesh as a shared vertex list plus 0-based index triples.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndexedTin {
    pub vertices: Vec<Point3>,
    pub triangles: Vec<[usize; 3]>,
}

#[derive(Debug, Clone)]
pub struct Tin {
    bounding_box: BoundingBox,
    config: TinConfig,
    triangles: TriangleArena,
    circumcircle_index: OnceCell<SpatialIndex<TriangleId>>,
    triangle_index: OnceCell<SpatialIndex<TriangleId>>,
    /// Data nodes by planar key: inserted nodes, claimed seed corners and
    /// breakline vertices.
    nodes: AHashMap<NodeKey, Point3>,
    breaklines: SpatialIndex<Segment>,
    seed_corners: [Point3; 4],
}

impl Tin {
    pub fn new(bounding_box: BoundingBox) -> Result<Self> {
        Self::with_config(bounding_box, TinConfig::default())
    }

    pub fn with_config(bounding_box: BoundingBox, config: TinConfig) -> Result<Self> {
        let mut tin = Self::empty(bounding_box, config)?;
        let [c1, c2, c3, c4] = tin.seed_corners;
        tin.add_triangle(Triangle::new(c1, c2, c3));
        tin.add_triangle(Triangle::new(c1, c3, c4));
        Ok(tin)
    }

    /// A TIN with no triangles yet; callers must establish the partition.
    fn empty(bounding_box: BoundingBox, config: TinConfig) -> Result<Self> {
        config.validate()?;
        if !bounding_box.is_valid() {
            return Err(TinError::EmptyRegion);
        }
        let seed_corners = seed_corners(&bounding_box, &config);
        let [c1, _, c3, _] = seed_corners;
        if c1.x >= c3.x || c1.y >= c3.y {
            return Err(TinError::EmptyRegion);
        }
        let circumcircle_index = OnceCell::new();
        let _ = circumcircle_index.set(SpatialIndex::new());
        Ok(Self {
            bounding_box,
            config,
            triangles: TriangleArena::new(),
            circumcircle_index,
            triangle_index: OnceCell::new(),
            nodes: AHashMap::new(),
            breaklines: SpatialIndex::new(),
            seed_corners,
        })
    }

    /// Rebuild a TIN from a finished triangle list without incremental
    /// insertion. Triangle vertices other than the seed corners become nodes.
    pub fn from_triangles<I>(bounding_box: BoundingBox, config: TinConfig, triangles: I) -> Result<Self>
    where
        I: IntoIterator<Item = Triangle>,
    {
        let mut tin = Self::empty(bounding_box, config)?;
        let mut circle_entries = Vec::new();
        let mut geometry_entries = Vec::new();
        for (index, triangle) in triangles.into_iter().enumerate() {
            let entry = TriangleEntry::new(triangle, tin.config.circle_tolerance);
            if triangle.is_degenerate() || !entry.circumcircle_box.is_valid() {
                return Err(TinError::DegenerateTriangle { index });
            }
            for p in triangle.points() {
                if !tin.is_seed_corner(&p) {
                    tin.nodes.entry(p.key_2d()).or_insert(p);
                }
            }
            let (circle_box, geometry_box) = (entry.circumcircle_box, entry.geometry_box);
            let id = tin.triangles.insert(entry);
            circle_entries.push((circle_box, id));
            geometry_entries.push((geometry_box, id));
        }
        tin.circumcircle_index = OnceCell::new();
        let _ = tin.circumcircle_index.set(SpatialIndex::bulk_load(circle_entries));
        let _ = tin.triangle_index.set(SpatialIndex::bulk_load(geometry_entries));
        log::debug!("loaded TIN with {} triangles", tin.triangles.len());
        Ok(tin)
    }

    pub fn from_indexed(bounding_box: BoundingBox, config: TinConfig, indexed: &IndexedTin) -> Result<Self> {
        let len = indexed.vertices.len();
        let mut triangles = Vec::with_capacity(indexed.triangles.len());
        for triple in &indexed.triangles {
            let mut pts = [Point3::default(); 3];
            for (slot, &index) in pts.iter_mut().zip(triple) {
                *slot = *indexed
                    .vertices
                    .get(index)
                    .ok_or(TinError::VertexIndexOutOfRange { index, len })?;
            }
            triangles.push(Triangle::new(pts[0], pts[1], pts[2]));
        }
        Self::from_triangles(bounding_box, config, triangles)
    }

    /// Vertex-only reload: a fresh TIN with `nodes` inserted one by one.
    pub fn from_nodes<I>(bounding_box: BoundingBox, config: TinConfig, nodes: I) -> Result<Self>
    where
        I: IntoIterator<Item = Point3>,
    {
        let mut tin = Self::with_config(bounding_box, config)?;
        tin.insert_nodes(nodes)?;
        Ok(tin)
    }

    /// The working region; nodes outside it are rejected.
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    pub fn config(&self) -> &TinConfig {
        &self.config
    }

    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.len() == 0
    }

    pub fn triangles(&self) -> Vec<Triangle> {
        self.triangles.iter().map(|(_, e)| e.triangle).collect()
    }

    /// Distinct data nodes; unclaimed seed corners are not included.
    pub fn nodes(&self) -> Vec<Point3> {
        let mut nodes: Vec<Point3> = self.nodes.values().copied().collect();
        nodes.sort_by(Point3::cmp_2d);
        nodes
    }

    pub fn seed_corners(&self) -> &[Point3; 4] {
        &self.seed_corners
    }

    pub fn is_seed_corner(&self, p: &Point3) -> bool {
        self.seed_corner_index(p).is_some()
    }

    fn seed_corner_index(&self, p: &Point3) -> Option<usize> {
        self.seed_corners.iter().position(|c| c.equals_2d(p))
    }

    /// Triangles whose envelope intersects `bbox`.
    pub fn triangles_in(&self, bbox: &BoundingBox) -> Vec<Triangle> {
        self.triangle_index()
            .query(bbox)
            .into_iter()
            .filter_map(|id| self.triangles.get(id).map(|e| e.triangle))
            .collect()
    }

    /// Triangles containing `p`, boundary included. A point on an edge or a
    /// vertex is contained by every triangle sharing it.
    pub fn triangles_at(&self, p: &Point3) -> Vec<Triangle> {
        self.triangle_ids_at(p)
            .into_iter()
            .filter_map(|id| self.triangles.get(id).map(|e| e.triangle))
            .collect()
    }

    pub(crate) fn triangle_ids_at(&self, p: &Point3) -> Vec<TriangleId> {
        let arena = &self.triangles;
        self.triangle_index()
            .query_with(&BoundingBox::from_point(p), |id| {
                arena.get(*id).is_some_and(|e| e.triangle.contains_point(p))
            })
    }

    /// Vertices sorted by x then y, triangles as index triples into them.
    pub fn to_indexed(&self) -> IndexedTin {
        let mut vertices: Vec<Point3> = {
            let mut by_key: AHashMap<NodeKey, Point3> = AHashMap::new();
            for (_, e) in self.triangles.iter() {
                for p in e.triangle.points() {
                    by_key.entry(p.key_2d()).or_insert(p);
                }
            }
            by_key.into_values().collect()
        };
        vertices.sort_by(Point3::cmp_2d);

        let lookup: AHashMap<NodeKey, usize> = vertices
            .iter()
            .enumerate()
            .map(|(i, p)| (p.key_2d(), i))
            .collect();
        let triangles = self
            .triangles
            .iter()
            .map(|(_, e)| {
                let [a, b, c] = e.triangle.points();
                [lookup[&a.key_2d()], lookup[&b.key_2d()], lookup[&c.key_2d()]]
            })
            .collect();
        IndexedTin { vertices, triangles }
    }

    /// Stop editing: the triangle index is built and the circumcircle index
    /// released. Queries keep working; the next node insertion rebuilds the
    /// circumcircle index from the arena.
    pub fn finish_editing(&mut self) {
        self.triangle_index();
        if self.circumcircle_index.take().is_some() {
            log::debug!("circumcircle index released");
        }
    }

    pub(crate) fn circumcircle_index(&self) -> &SpatialIndex<TriangleId> {
        self.circumcircle_index.get_or_init(|| {
            log::debug!("building circumcircle index over {} triangles", self.triangles.len());
            SpatialIndex::bulk_load(
                self.triangles
                    .iter()
                    .map(|(id, e)| (e.circumcircle_box, id))
                    .collect(),
            )
        })
    }

    /// Geometry index, built from the arena on first use after invalidation.
    pub(crate) fn triangle_index(&self) -> &SpatialIndex<TriangleId> {
        self.triangle_index.get_or_init(|| {
            log::debug!("building triangle index over {} triangles", self.triangles.len());
            SpatialIndex::bulk_load(
                self.triangles
                    .iter()
                    .map(|(id, e)| (e.geometry_box, id))
                    .collect(),
            )
        })
    }

    pub(crate) fn invalidate_triangle_index(&mut self) {
        if self.triangle_index.take().is_some() {
            log::debug!("triangle index invalidated");
        }
    }

    /// Store `triangle` under both indices. Zero-area triangles never enter
    /// the mesh.
    pub(crate) fn add_triangle(&mut self, triangle: Triangle) -> Option<TriangleId> {
        let entry = TriangleEntry::new(triangle, self.config.circle_tolerance);
        if triangle.is_degenerate() || !entry.circumcircle_box.is_valid() {
            log::debug!("skipping zero-area triangle {:?}", triangle.points());
            return None;
        }
        let (circle_box, geometry_box) = (entry.circumcircle_box, entry.geometry_box);
        let id = self.triangles.insert(entry);
        if let Some(index) = self.circumcircle_index.get_mut() {
            index.insert(circle_box, id);
        }
        if let Some(index) = self.triangle_index.get_mut() {
            index.insert(geometry_box, id);
        }
        Some(id)
    }

    pub(crate) fn remove_triangle(&mut self, id: TriangleId) -> Option<Triangle> {
        let entry = self.triangles.remove(id)?;
        if let Some(index) = self.circumcircle_index.get_mut() {
            if !index.remove(&entry.circumcircle_box, &id) {
                report_missing_entry("circumcircle", id);
            }
        }
        if let Some(index) = self.triangle_index.get_mut() {
            if !index.remove(&entry.geometry_box, &id) {
                report_missing_entry("triangle", id);
            }
        }
        Some(entry.triangle)
    }

    /// Swap triangle `id` for `replacement`. Vertices new to the mesh are
    /// registered as nodes; a vertex already known keeps its stored point.
    pub(crate) fn replace_triangle(&mut self, id: TriangleId, replacement: &[Triangle]) -> Result<()> {
        let old = self.remove_triangle(id).ok_or(TinError::MissingTriangle(id))?;
        for triangle in replacement {
            let mut pts = triangle.points();
            for p in pts.iter_mut() {
                if !old.has_vertex(p) {
                    *p = *self.nodes.entry(p.key_2d()).or_insert(*p);
                }
            }
            self.add_triangle(Triangle::new(pts[0], pts[1], pts[2]));
        }
        Ok(())
    }

    pub(crate) fn record_breakline(&mut self, breakline: Segment) {
        self.breaklines.insert(breakline.bounding_box(), breakline);
    }

    /// `a`-`b` runs along an inserted breakline.
    pub(crate) fn is_constrained(&self, a: &Point3, b: &Point3) -> bool {
        let tolerance = self.config.breakline_tolerance;
        let window = BoundingBox::from_points(a, b).expand_by(tolerance);
        !self
            .breaklines
            .query_with(&window, |s| s.distance_to(a) < tolerance && s.distance_to(b) < tolerance)
            .is_empty()
    }

    /// The indices that are built hold exactly the arena's triangles.
    pub fn indices_consistent(&self) -> bool {
        let mut live: Vec<TriangleId> = self.triangles.iter().map(|(id, _)| id).collect();
        live.sort_unstable();
        let same_ids = |index: &SpatialIndex<TriangleId>| {
            let mut ids = index.values();
            ids.sort_unstable();
            ids == live
        };
        self.circumcircle_index.get().is_none_or(same_ids)
            && self.triangle_index.get().is_none_or(same_ids)
    }
}

fn seed_corners(bounding_box: &BoundingBox, config: &TinConfig) -> [Point3; 4] {
    let grown = bounding_box.expand_by(config.margin);
    let pm = &config.precision;
    let (min_x, min_y) = (pm.make_xy_precise(grown.min_x), pm.make_xy_precise(grown.min_y));
    let (max_x, max_y) = (pm.make_xy_precise(grown.max_x), pm.make_xy_precise(grown.max_y));
    [
        Point3::new(min_x, min_y, 0.0),
        Point3::new(max_x, min_y, 0.0),
        Point3::new(max_x, max_y, 0.0),
        Point3::new(min_x, max_y, 0.0),
    ]
}

fn report_missing_entry(index: &str, id: TriangleId) {
    log::error!("{index} index has no entry for triangle {id:?}; skipping");
    debug_assert!(false, "{index} index lost triangle {id:?}");
}
