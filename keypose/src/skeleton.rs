//! Construction and editing of a single keypoint skeleton.
//!
//! A skeleton is a fixed tree of four nodes: a root (0), its child (1) and two
//! grandchildren (2, 3) hanging off node 1. Nodes are placed one click at a time.
//! Whenever a node is confirmed with a tag that differs from its parent's, the
//! edge between them needs a transition point marking where visibility flips;
//! that point follows the cursor until the next click pins it.

use crate::error::DataError;
use crate::geometry::math::position_on_line;
use crate::geometry::limits::MAX_TRANSITIONS_PER_EDGE;
use crate::model::{Point, Tag};
use crate::render::{tag_color, Primitive};
use std::iter;
use tracing::debug;

pub const NODE_COUNT: usize = 4;

/// Parent -> child pairs, listed so every edge's start is fixed by an earlier one.
pub const EDGES: [(usize, usize); 3] = [(0, 1), (1, 2), (1, 3)];

/// Index in [`EDGES`] of the edge ending at `node`. The root has none.
pub fn incoming_edge(node: usize) -> Option<usize> {
    EDGES.iter().position(|&(_, end)| end == node)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// `nodes[current]` follows the cursor until a click confirms it.
    Placing { current: usize },
    /// `nodes[current]` is pinned with a tag differing from its parent; the last
    /// transition on its incoming edge follows the cursor.
    Interpolating { current: usize },
    /// Every node slot is confirmed; the owner must finish.
    Full,
    Finished,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Skeleton {
    pub(crate) nodes: Vec<Option<Point>>,
    pub(crate) tags: Vec<Tag>,
    pub(crate) transitions: [Vec<Point>; 3],
    pub(crate) hue: f64,
    pub(crate) node_radius: f64,
    pub(crate) state: State,
}

impl Skeleton {
    /// Starts a skeleton with its root at `position`. The child placeholder sits on
    /// the root and inherits its tag.
    pub fn new(position: Point, tag: Tag, hue: f64, node_radius: f64) -> Skeleton {
        Skeleton {
            nodes: vec![Some(position), Some(position)],
            tags: vec![tag, tag],
            transitions: Default::default(),
            hue,
            node_radius,
            state: State::Placing { current: 1 },
        }
    }

    pub fn nodes(&self) -> &[Option<Point>] { &self.nodes }
    pub fn tags(&self) -> &[Tag] { &self.tags }
    pub fn transitions(&self) -> &[Vec<Point>; 3] { &self.transitions }
    pub fn hue(&self) -> f64 { self.hue }
    pub fn node_radius(&self) -> f64 { self.node_radius }
    pub fn state(&self) -> State { self.state }

    /// Position of node `i` if it exists and is not tagged missing.
    pub fn placed(&self, i: usize) -> Option<Point> {
        match self.tags.get(i) {
            Some(tag) if !tag.is_missing() => self.nodes.get(i).copied().flatten(),
            _ => None,
        }
    }

    pub fn is_interpolating(&self) -> bool {
        matches!(self.state, State::Interpolating { .. })
    }

    pub fn must_stop(&self) -> bool {
        self.state == State::Full
    }

    /// Whether an explicit early stop is acceptable: past the root-child pair and
    /// not waiting on a transition.
    pub fn can_stop(&self) -> bool {
        match self.state {
            State::Placing { current } => current > 1,
            State::Full => true,
            State::Interpolating { .. } | State::Finished => false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    /// Handles a placing click. Returns whether the skeleton changed.
    pub fn add_point(&mut self, position: Point, tag: Tag) -> bool {
        if tag.is_missing() {
            return false;
        }
        match self.state {
            State::Placing { current } => {
                let Some(edge) = incoming_edge(current) else { return false };
                let base = EDGES[edge].0;
                self.nodes[current] = Some(position);
                self.tags[current] = tag;
                if tag == self.tags[base] {
                    self.advance(current, position);
                } else {
                    self.transitions[edge].push(position);
                    self.state = State::Interpolating { current };
                }
                true
            }
            State::Interpolating { current } => {
                // the transition already tracks the cursor; this click only releases it
                self.advance(current, position);
                true
            }
            State::Full | State::Finished => false,
        }
    }

    fn advance(&mut self, confirmed: usize, position: Point) {
        let next = confirmed + 1;
        match incoming_edge(next) {
            Some(edge) if next < NODE_COUNT => {
                let parent = EDGES[edge].0;
                self.nodes.push(Some(position));
                self.tags.push(self.tags[parent]);
                self.state = State::Placing { current: next };
            }
            _ => self.state = State::Full,
        }
    }

    /// Follows the pointer: drags the pending node, or slides the pending transition
    /// along its edge. Returns whether anything moved.
    pub fn update_cursor_position(&mut self, position: Point) -> bool {
        match self.state {
            State::Placing { current } => {
                self.nodes[current] = Some(position);
                true
            }
            State::Interpolating { current } => {
                let Some(edge) = incoming_edge(current) else { return false };
                let (Some(a), Some(b)) = (self.nodes[EDGES[edge].0], self.nodes[current]) else {
                    return false;
                };
                match self.transitions[edge].last_mut() {
                    Some(t) => {
                        *t = position_on_line(position, a, b);
                        true
                    }
                    None => false,
                }
            }
            State::Full | State::Finished => false,
        }
    }

    /// Freezes the skeleton at exactly four node slots. The unused placeholder is
    /// dropped (together with its half-made transition if one was pending) and the
    /// remaining slots are padded as missing.
    pub fn finish(&mut self) {
        match self.state {
            State::Finished => return,
            State::Placing { current } => {
                self.nodes.truncate(current);
                self.tags.truncate(current);
            }
            State::Interpolating { current } => {
                self.nodes.truncate(current);
                self.tags.truncate(current);
                if let Some(edge) = incoming_edge(current) {
                    self.transitions[edge].clear();
                }
            }
            State::Full => {}
        }
        self.nodes.resize(NODE_COUNT, None);
        self.tags.resize(NODE_COUNT, Tag::Missing);
        self.drop_orphan_transitions();
        self.state = State::Finished;
        debug!(placed = self.tags.iter().filter(|t| !t.is_missing()).count(), "skeleton finished");
    }

    /// Clears transition lists on edges touching a missing node. Returns how many points went.
    pub(crate) fn drop_orphan_transitions(&mut self) -> usize {
        let mut dropped = 0;
        for (i, &(start, end)) in EDGES.iter().enumerate() {
            if self.placed(start).is_none() || self.placed(end).is_none() {
                dropped += self.transitions[i].len();
                self.transitions[i].clear();
            }
        }
        dropped
    }

    /// Inserts a transition where `position` lands on one of the edges of a finished
    /// skeleton. Edges are probed in topological order and the first one within
    /// `2 × node_radius` of the click takes it. A click that falls on an existing
    /// node or transition counts as a hit but inserts nothing. Probing stops at the
    /// first edge with a missing end, where tag re-derivation stops too.
    pub fn try_add_transition(&mut self, position: Point) -> bool {
        if self.state != State::Finished {
            return false;
        }
        let tol = 2.0 * self.node_radius;
        for (i, &(start, end)) in EDGES.iter().enumerate() {
            let (Some(a), Some(b)) = (self.placed(start), self.placed(end)) else { return false };
            let point = position_on_line(position, a, b);
            if position.distance_to(point) >= tol {
                continue;
            }
            let transitions = &mut self.transitions[i];
            let on_vertex = iter::once(a)
                .chain(transitions.iter().copied())
                .chain(iter::once(b))
                .any(|v| v.distance_to(point) < tol);
            if on_vertex || transitions.len() >= MAX_TRANSITIONS_PER_EDGE {
                return true;
            }
            let along = point.distance_to(a);
            let slot = transitions
                .iter()
                .position(|t| t.distance_to(a) > along)
                .unwrap_or(transitions.len());
            transitions.insert(slot, point);
            self.recompute_tags();
            debug!(edge = i, slot, "transition inserted");
            return true;
        }
        false
    }

    /// Re-derives each child tag from its parent tag and the parity of the transitions
    /// between them. Stops at the first missing or unplaced node.
    pub fn recompute_tags(&mut self) {
        for (i, &(start, end)) in EDGES.iter().enumerate() {
            if end >= self.tags.len() || self.tags[start].is_missing() || self.tags[end].is_missing() {
                break;
            }
            self.tags[end] = if self.transitions[i].len() % 2 == 1 {
                self.tags[start].opposite()
            } else {
                self.tags[start]
            };
        }
    }

    /// Line segments for every drawable edge, split at transitions with alternating
    /// tags, followed by one marker per placed node.
    pub fn primitives(&self) -> impl Iterator<Item = Primitive> + '_ {
        let width = 0.5 * self.node_radius;
        let segments = EDGES
            .iter()
            .enumerate()
            .filter_map(move |(i, &(start, end))| Some((i, start, self.placed(start)?, self.placed(end)?)))
            .flat_map(move |(i, start, a, b)| {
                let polyline = iter::once(a)
                    .chain(self.transitions[i].iter().copied())
                    .chain(iter::once(b));
                let first = self.tags[start];
                polyline
                    .clone()
                    .zip(polyline.skip(1))
                    .enumerate()
                    .filter_map(move |(k, (from, to))| {
                        let tag = if k % 2 == 0 { first } else { first.opposite() };
                        let color = tag_color(self.hue, tag)?;
                        Some(Primitive::Segment { from, to, width, color })
                    })
            });
        let markers = (0..self.nodes.len()).filter_map(move |i| {
            let center = self.placed(i)?;
            let color = tag_color(self.hue, self.tags[i])?;
            Some(Primitive::Marker { center, radius: self.node_radius, color })
        });
        segments.chain(markers)
    }

    pub fn get_data(&self) -> serde_json::Value {
        crate::json::skeleton_to_json_impl(self)
    }

    /// Rebuilds a finished skeleton from its persisted form, upgrading legacy
    /// transition encodings.
    pub fn from_data(value: serde_json::Value, hue: f64, node_radius: f64) -> Result<Skeleton, DataError> {
        crate::json::skeleton_from_json_impl(value, 0, hue, node_radius)
    }
}
