//! A concurrent, in-memory point-region quadtree for 2D range queries.
//!
//! The tree stores points with an opaque, caller-supplied payload, and
//! supports three operations: insert, remove, and rectangular range query.
//! Each node carries its own reader/writer lock, held for the duration of a
//! node's recursive descent into the child it dispatches to. Two operations
//! only contend if their paths share a locked ancestor, so every insert,
//! remove, and query acquires the root's lock; the root serializes all
//! operations against each other, and descent fans out from there. Within a
//! single node, concurrent readers (queries) can hold its read lock at the
//! same time, and do not block one another.
//!
//! ```
//! use quadtree::{Boundary, Point, QuadTree};
//!
//! let world = Boundary::from_min_size(0.0, 0.0, 100.0, 100.0);
//! let qt: QuadTree<&str> = QuadTree::new(world, 4);
//!
//! qt.insert(Point::new(10.0, 10.0, "alice"));
//! qt.insert(Point::new(90.0, 90.0, "bob"));
//!
//! let nearby = qt.query(Boundary::from_min_size(0.0, 0.0, 50.0, 50.0));
//! assert_eq!(nearby.len(), 1);
//! assert_eq!(nearby[0].payload, "alice");
//! ```
//!
//! See [`QuadTree`] for the full contract, and [`geom`] for the underlying
//! [`Point`] and [`Boundary`] types and the half-open containment predicates
//! the tree is built on.

pub mod geom;
mod node;

pub use geom::{Boundary, Point};
use node::Node;

/// Default bucket capacity when a caller supplies a degenerate value; any
/// value `>= 1` is accepted as-is, so this only matters as a clamp target.
const MIN_CAPACITY: usize = 1;

/// Bounds how deep subdivision can recurse. Without this, a cluster of
/// coincident or near-coincident points would subdivide forever (every
/// subdivision routes every duplicate into the same child). Past this depth
/// a leaf is simply allowed to exceed `capacity`.
const DEFAULT_MAX_DEPTH: u8 = 48;

/// The root handle of a quadtree: a world boundary, a bucket capacity, and
/// the recursive node structure underneath. Callers never see node
/// recursion directly - every operation dispatches through here.
///
/// `T` is the payload type. The tree only ever compares it for equality (in
/// [`remove`](QuadTree::remove)) and returns it (from
/// [`query`](QuadTree::query)); it never interprets it further.
pub struct QuadTree<T> {
    root: Node<T>,
}

impl<T> QuadTree<T> {
    /// Create a tree covering `world` with the given leaf bucket `capacity`.
    /// A `capacity` of zero is silently clamped to 1 - any value `>= 1` is
    /// legal, and smaller values simply yield deeper, narrower trees.
    pub fn new(world: Boundary, capacity: usize) -> Self {
        Self::with_max_depth(world, capacity, DEFAULT_MAX_DEPTH)
    }

    /// As [`QuadTree::new`], but with an explicit cap on subdivision depth.
    /// Useful for tests that want to force the pathological-duplicates path
    /// (see the crate's design notes on Open Question 1) without waiting out
    /// the default depth.
    pub fn with_max_depth(world: Boundary, capacity: usize, max_depth: u8) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        tracing::debug!(?world, capacity, max_depth, "creating quadtree");
        Self {
            root: Node::new(world, capacity, 0, max_depth),
        }
    }

    /// The world boundary this tree was constructed with. Immutable for the
    /// tree's lifetime.
    pub fn world(&self) -> &Boundary {
        self.root.boundary()
    }

    /// Insert `p`. Returns `true` iff `p` was stored, `false` iff it lies
    /// outside the tree's world boundary.
    pub fn insert(&self, p: Point<T>) -> bool
    where
        T: Clone,
    {
        self.root.insert(p)
    }

    /// Remove the first stored point with equal `(x, y, payload)`. Returns
    /// `true` iff a matching point was found and removed.
    pub fn remove(&self, p: &Point<T>) -> bool
    where
        T: PartialEq,
    {
        self.root.remove(p)
    }

    /// Every currently-stored point contained in `region`, in unspecified
    /// order. The returned points are copies; mutating the tree afterward
    /// does not affect them.
    pub fn query(&self, region: Boundary) -> Vec<Point<T>>
    where
        T: Clone,
    {
        let mut out = Vec::new();
        self.root.query(&region, &mut out);
        out
    }
}
