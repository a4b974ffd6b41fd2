//! The recursive quadtree node: a bounded region, a bucket of points, an
//! optional set of four children, and a per-node reader/writer lock.

use std::sync::RwLock;

use tracing::{debug, trace};

use crate::geom::{Boundary, Point};

/// The mutable part of a node, guarded by `Node::lock`. Bucket and children
/// are behind the same lock so a reader never observes one updated without
/// the other (subdivision replaces both atomically under a single write).
struct Inner<T> {
    bucket: Vec<Point<T>>,
    children: Option<Box<[Node<T>; 4]>>,
}

/// A single quadtree node. Either a leaf (`children` is `None`, `bucket` may
/// be non-empty) or internal (`children` is `Some`, `bucket` is empty).
///
/// `boundary`, `capacity`, `depth`, and `max_depth` are fixed at construction
/// and never change, so they live outside the lock.
pub(crate) struct Node<T> {
    boundary: Boundary,
    capacity: usize,
    depth: u8,
    max_depth: u8,
    lock: RwLock<Inner<T>>,
}

impl<T> Node<T> {
    pub(crate) fn new(boundary: Boundary, capacity: usize, depth: u8, max_depth: u8) -> Self {
        Self {
            boundary,
            capacity,
            depth,
            max_depth,
            lock: RwLock::new(Inner {
                bucket: Vec::new(),
                children: None,
            }),
        }
    }

    pub(crate) fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Insert `p` into this subtree. Returns `false` only when `p` lies
    /// outside `boundary`; every other outcome is a success.
    pub(crate) fn insert(&self, p: Point<T>) -> bool
    where
        T: Clone,
    {
        if !self.boundary.contains(p.x, p.y) {
            return false;
        }

        let mut inner = self.lock.write().unwrap();

        if let Some(children) = &inner.children {
            let idx = self.boundary.quadrant_index(p.x, p.y);
            return children[idx].insert(p);
        }

        inner.bucket.push(p);
        if inner.bucket.len() > self.capacity && self.depth < self.max_depth {
            self.subdivide(&mut inner);
        }
        debug_assert!(
            inner.children.is_some()
                || inner.bucket.len() <= self.capacity
                || self.depth >= self.max_depth,
            "leaf bucket exceeded capacity without a subdivision or depth cap"
        );
        true
    }

    /// Split this leaf into four children and redistribute the bucket.
    /// Runs entirely under the write lock acquired by the caller, so the
    /// transient `capacity + 1` overflow is never externally observable.
    fn subdivide(&self, inner: &mut Inner<T>)
    where
        T: Clone,
    {
        trace!(depth = self.depth, "subdividing node");
        let bounds = self.boundary.split();
        let next_depth = self.depth + 1;
        let children = Box::new(bounds.map(|b| Node::new(b, self.capacity, next_depth, self.max_depth)));

        let drained = std::mem::take(&mut inner.bucket);
        inner.children = Some(children);
        let children = inner.children.as_ref().unwrap();
        for p in drained {
            let idx = self.boundary.quadrant_index(p.x, p.y);
            children[idx].insert(p);
        }
        debug!(depth = self.depth, "node subdivided");
    }

    /// Remove the first point matching `(x, y, payload)` by strict equality.
    /// Returns whether a matching point was found and removed.
    pub(crate) fn remove(&self, p: &Point<T>) -> bool
    where
        T: PartialEq,
    {
        if !self.boundary.contains(p.x, p.y) {
            return false;
        }

        let mut inner = self.lock.write().unwrap();

        if let Some(children) = &inner.children {
            let idx = self.boundary.quadrant_index(p.x, p.y);
            return children[idx].remove(p);
        }

        match inner
            .bucket
            .iter()
            .position(|q| q.x == p.x && q.y == p.y && q.payload == p.payload)
        {
            Some(i) => {
                inner.bucket.swap_remove(i);
                true
            }
            None => false,
        }
    }

    /// Accumulate every stored point contained in `region` into `out`.
    /// Pruned subtrees are never visited.
    pub(crate) fn query(&self, region: &Boundary, out: &mut Vec<Point<T>>)
    where
        T: Clone,
    {
        if !self.boundary.intersects(region) {
            return;
        }

        let inner = self.lock.read().unwrap();

        match &inner.children {
            Some(children) => {
                for child in children.iter() {
                    child.query(region, out);
                }
            }
            None => {
                out.extend(
                    inner
                        .bucket
                        .iter()
                        .filter(|p| region.contains(p.x, p.y))
                        .cloned(),
                );
            }
        }
    }

    /// Whether this node is currently a leaf. Takes the read lock; intended
    /// for tests and diagnostics, not the hot insert/remove/query path.
    #[cfg(test)]
    pub(crate) fn is_leaf(&self) -> bool {
        self.lock.read().unwrap().children.is_none()
    }

    #[cfg(test)]
    pub(crate) fn bucket_snapshot(&self) -> Vec<Point<T>>
    where
        T: Clone,
    {
        self.lock.read().unwrap().bucket.clone()
    }

    #[cfg(test)]
    pub(crate) fn child_exists(&self, idx: usize) -> bool {
        self.lock.read().unwrap().children.is_some() && idx < 4
    }
}
