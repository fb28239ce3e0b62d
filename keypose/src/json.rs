use crate::config::AnnotatorConfig;
use crate::error::DataError;
use crate::geometry::limits::{self, MAX_SKELETONS, MAX_TRANSITIONS_PER_EDGE};
use crate::model::{Point, Tag};
use crate::skeleton::{Skeleton, State, EDGES, NODE_COUNT};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

fn edge_pairs() -> [[usize; 2]; 3] {
    EDGES.map(|(a, b)| [a, b])
}

pub fn skeleton_to_json_impl(s: &Skeleton) -> Value {
    json!({
        "nodes": s.nodes,
        "tags": s.tags,
        "edges": edge_pairs(),
        "transitions": s.transitions,
    })
}

pub fn set_to_json_impl(skeletons: &[Skeleton]) -> Value {
    Value::Array(skeletons.iter().map(skeleton_to_json_impl).collect())
}

// Older files stored one transition per edge, either as a bare point or null.
#[derive(Deserialize)]
#[serde(untagged)]
enum EdgeTransitionsDe {
    Many(Vec<Point>),
    One(Point),
}

#[derive(Deserialize)]
struct SkeletonDe {
    nodes: Vec<Option<Point>>,
    tags: Vec<Tag>,
    #[serde(default)]
    edges: Option<Vec<[usize; 2]>>,
    #[serde(default)]
    transitions: Option<Vec<Option<EdgeTransitionsDe>>>,
}

pub fn skeleton_from_json_impl(v: Value, index: usize, hue: f64, node_radius: f64) -> Result<Skeleton, DataError> {
    let de: SkeletonDe = serde_json::from_value(v)?;
    if let Some(edges) = de.edges {
        if edges[..] != edge_pairs()[..] {
            return Err(DataError::Topology { skeleton: index, found: edges });
        }
    }
    if de.nodes.len() > NODE_COUNT {
        return Err(DataError::TooMany { skeleton: index, what: "nodes", count: de.nodes.len(), max: NODE_COUNT });
    }
    if de.tags.len() > NODE_COUNT {
        return Err(DataError::TooMany { skeleton: index, what: "tags", count: de.tags.len(), max: NODE_COUNT });
    }
    let mut nodes = de.nodes;
    let mut tags = de.tags;
    nodes.resize(NODE_COUNT, None);
    tags.resize(NODE_COUNT, Tag::Missing);
    for (node, (pos, tag)) in nodes.iter().zip(tags.iter()).enumerate() {
        if pos.is_some() == tag.is_missing() {
            return Err(DataError::NodeTagMismatch { skeleton: index, node });
        }
    }

    let raw = de.transitions.unwrap_or_default();
    if raw.len() > EDGES.len() {
        return Err(DataError::TooMany { skeleton: index, what: "transition lists", count: raw.len(), max: EDGES.len() });
    }
    let mut transitions: [Vec<Point>; 3] = Default::default();
    for (slot, entry) in transitions.iter_mut().zip(raw) {
        *slot = match entry {
            None => Vec::new(),
            Some(EdgeTransitionsDe::Many(points)) => points,
            Some(EdgeTransitionsDe::One(point)) => {
                warn!(skeleton = index, "upgrading single-point transition to a list");
                vec![point]
            }
        };
        if slot.len() > MAX_TRANSITIONS_PER_EDGE {
            return Err(DataError::TooMany { skeleton: index, what: "transitions", count: slot.len(), max: MAX_TRANSITIONS_PER_EDGE });
        }
    }

    let in_bounds = |p: &Point| limits::in_coord_bounds(p.x) && limits::in_coord_bounds(p.y);
    if !nodes.iter().flatten().all(in_bounds) || !transitions.iter().flatten().all(in_bounds) {
        return Err(DataError::OutOfBounds { skeleton: index });
    }

    let mut s = Skeleton { nodes, tags, transitions, hue, node_radius, state: State::Finished };
    let dropped = s.drop_orphan_transitions();
    if dropped > 0 {
        warn!(skeleton = index, dropped, "dropped transitions on edges with a missing node");
    }
    Ok(s)
}

pub fn set_from_json_impl(v: Value, config: &AnnotatorConfig) -> Result<Vec<Skeleton>, DataError> {
    let items: Vec<Value> = match v {
        Value::Null => return Ok(Vec::new()),
        other => serde_json::from_value(other)?,
    };
    if items.len() > MAX_SKELETONS {
        return Err(DataError::TooManySkeletons { count: items.len(), max: MAX_SKELETONS });
    }
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| skeleton_from_json_impl(item, i, config.hue_for(i), config.node_radius))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full() -> Value {
        json!({
            "nodes": [[10.0, 10.0], [20.0, 10.0], [20.0, 20.0], [20.0, 0.0]],
            "tags": ["visible", "occluded", "occluded", "visible"],
            "edges": [[0, 1], [1, 2], [1, 3]],
            "transitions": [[[15.0, 10.0]], [], [[20.0, 5.0]]]
        })
    }

    #[test]
    fn roundtrip_is_stable() {
        let s = skeleton_from_json_impl(full(), 0, 0.1, 3.0).unwrap();
        let out = skeleton_to_json_impl(&s);
        assert_eq!(out, full());
        let again = skeleton_to_json_impl(&skeleton_from_json_impl(out.clone(), 0, 0.1, 3.0).unwrap());
        assert_eq!(again, out);
    }

    #[test]
    fn coordinates_survive_unchanged() {
        let v = json!({
            "nodes": [[123.456789, 10.1], [200.987654321, 10.1], null, null],
            "tags": ["visible", "occluded", "missing", "missing"],
            "edges": [[0, 1], [1, 2], [1, 3]],
            "transitions": [[[150.3, 10.1]], [], []]
        });
        let s = skeleton_from_json_impl(v.clone(), 0, 0.1, 3.0).unwrap();
        assert_eq!(skeleton_to_json_impl(&s), v);
        assert_eq!(skeleton_to_json_impl(&s).to_string(), v.to_string());
    }

    #[test]
    fn legacy_transitions_are_upgraded() {
        let v = json!({
            "nodes": [[10.0, 10.0], [20.0, 10.0], [20.0, 20.0], [20.0, 0.0]],
            "tags": ["visible", "occluded", "occluded", "visible"],
            "edges": [[0, 1], [1, 2], [1, 3]],
            "transitions": [null, [5.0, 5.0], []]
        });
        let s = skeleton_from_json_impl(v, 0, 0.1, 3.0).unwrap();
        assert!(s.transitions()[0].is_empty());
        assert_eq!(s.transitions()[1], vec![Point::new(5.0, 5.0)]);
        assert!(s.transitions()[2].is_empty());
    }

    #[test]
    fn short_lists_are_padded() {
        let v = json!({
            "nodes": [[0.0, 0.0], [5.0, 0.0]],
            "tags": ["visible", "visible"]
        });
        let s = skeleton_from_json_impl(v, 0, 0.1, 3.0).unwrap();
        assert_eq!(s.nodes().len(), 4);
        assert_eq!(s.tags()[2..], [Tag::Missing, Tag::Missing]);
        assert!(s.is_finished());
    }

    #[test]
    fn orphan_transitions_are_dropped() {
        let v = json!({
            "nodes": [[0.0, 0.0], [10.0, 0.0], null, null],
            "tags": ["visible", "visible", "missing", "missing"],
            "edges": [[0, 1], [1, 2], [1, 3]],
            "transitions": [[], [[3.0, 3.0]], []]
        });
        let s = skeleton_from_json_impl(v, 0, 0.1, 3.0).unwrap();
        assert!(s.transitions()[1].is_empty());
    }

    #[test]
    fn rejects_foreign_topology() {
        let mut v = full();
        v["edges"] = json!([[0, 1], [0, 2], [0, 3]]);
        assert!(matches!(skeleton_from_json_impl(v, 2, 0.1, 3.0), Err(DataError::Topology { skeleton: 2, .. })));
    }

    #[test]
    fn rejects_placed_missing_node() {
        let mut v = full();
        v["tags"][2] = json!("missing");
        assert!(matches!(
            skeleton_from_json_impl(v, 0, 0.1, 3.0),
            Err(DataError::NodeTagMismatch { node: 2, .. })
        ));
    }

    #[test]
    fn null_set_is_empty() {
        let c = AnnotatorConfig::default();
        assert!(set_from_json_impl(Value::Null, &c).unwrap().is_empty());
        assert!(set_from_json_impl(json!([]), &c).unwrap().is_empty());
        assert!(matches!(set_from_json_impl(json!({"nodes": []}), &c), Err(DataError::Json(_))));
    }
}
