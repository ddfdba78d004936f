//! Spatial Zone Index
//!
//! R-tree backed lookup from a pointer position to the best drop zone.
//! Each zone is stored with its bounds inflated by its capture margin, so a
//! point query returns every zone the pointer is inside or near.
//!
//! Resolution policy:
//! - containment beats proximity;
//! - among zones containing the pointer, the most deeply nested one wins;
//! - otherwise the smallest distance to the zone's real bounds wins;
//! - ties go to the zone registered first.

use crate::geometry::{Point, Rect};
use crate::types::ZoneId;
use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;

/// A spatial entry representing a zone's capture area.
#[derive(Debug, Clone)]
pub struct ZoneEntry {
    pub zone_id: ZoneId,
    /// Registration order, used as the final tie-break
    pub order: u64,
    /// Number of enclosing zones
    pub depth: usize,
    pub bounds: Rect,
    pub margin: f32,
}

impl ZoneEntry {
    fn capture_area(&self) -> Rect {
        self.bounds.inflate(self.margin)
    }
}

impl RTreeObject for ZoneEntry {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let area = self.capture_area();
        AABB::from_corners([area.min_x(), area.min_y()], [area.max_x(), area.max_y()])
    }
}

impl PartialEq for ZoneEntry {
    fn eq(&self, other: &Self) -> bool {
        self.zone_id == other.zone_id
    }
}

/// How a candidate zone matched the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneHit {
    pub zone_id: ZoneId,
    pub contains: bool,
    pub depth: usize,
    pub distance: f32,
    pub order: u64,
}

/// Spatial index for drop zones using an R-tree.
pub struct ZoneIndex {
    tree: RTree<ZoneEntry>,
    entries: HashMap<ZoneId, ZoneEntry>,
    next_order: u64,
}

impl ZoneIndex {
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            entries: HashMap::new(),
            next_order: 0,
        }
    }

    /// Insert a zone, or update its geometry keeping its registration order
    /// and depth.
    pub fn insert(&mut self, zone_id: ZoneId, bounds: Rect, margin: f32) {
        let (order, depth) = match self.entries.remove(&zone_id) {
            Some(old_entry) => {
                self.tree.remove(&old_entry);
                (old_entry.order, old_entry.depth)
            }
            None => {
                let order = self.next_order;
                self.next_order += 1;
                (order, 0)
            }
        };

        let entry = ZoneEntry {
            zone_id: zone_id.clone(),
            order,
            depth,
            bounds,
            margin: margin.max(0.0),
        };
        self.tree.insert(entry.clone());
        self.entries.insert(zone_id, entry);
    }

    pub fn remove(&mut self, zone_id: &ZoneId) -> bool {
        if let Some(entry) = self.entries.remove(zone_id) {
            self.tree.remove(&entry);
            true
        } else {
            false
        }
    }

    /// Refresh a zone's bounds; unknown zones are ignored.
    pub fn update_bounds(&mut self, zone_id: &ZoneId, bounds: Rect) {
        if let Some(entry) = self.entries.get(zone_id) {
            if entry.bounds == bounds {
                return;
            }
            let margin = entry.margin;
            self.insert(zone_id.clone(), bounds, margin);
        }
    }

    /// Set how many zones enclose this one; unknown zones are ignored.
    pub fn set_depth(&mut self, zone_id: &ZoneId, depth: usize) {
        let Some(entry) = self.entries.get_mut(zone_id) else {
            return;
        };
        if entry.depth == depth {
            return;
        }
        entry.depth = depth;
        let updated = entry.clone();
        self.tree.remove(&updated);
        self.tree.insert(updated);
    }

    /// All zones whose capture area contains the point, best first.
    pub fn candidates(&self, p: Point) -> Vec<ZoneHit> {
        let point_envelope = AABB::from_point([p.x, p.y]);

        let mut hits: Vec<ZoneHit> = self
            .tree
            .locate_in_envelope_intersecting(&point_envelope)
            .filter(|entry| entry.capture_area().contains(p))
            .map(|entry| ZoneHit {
                zone_id: entry.zone_id.clone(),
                contains: entry.bounds.contains(p),
                depth: entry.depth,
                distance: entry.bounds.distance_to(p),
                order: entry.order,
            })
            .collect();

        hits.sort_by(|a, b| {
            let nesting = if a.contains && b.contains {
                b.depth.cmp(&a.depth)
            } else {
                std::cmp::Ordering::Equal
            };
            b.contains
                .cmp(&a.contains)
                .then(nesting)
                .then(
                    a.distance
                        .partial_cmp(&b.distance)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
                .then(a.order.cmp(&b.order))
        });
        hits
    }

    /// The best zone at `p` for which `accepts` returns true.
    ///
    /// Rejected zones are skipped, so a closer zone that refuses the session
    /// never shadows an accepting one behind it.
    pub fn resolve<F>(&self, p: Point, mut accepts: F) -> Option<ZoneId>
    where
        F: FnMut(&ZoneId) -> bool,
    {
        self.candidates(p)
            .into_iter()
            .find(|hit| accepts(&hit.zone_id))
            .map(|hit| hit.zone_id)
    }

    pub fn bounds(&self, zone_id: &ZoneId) -> Option<Rect> {
        self.entries.get(zone_id).map(|e| e.bounds)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.entries.clear();
    }
}

impl Default for ZoneIndex {
    fn default() -> Self {
        Self::new()
    }
}
