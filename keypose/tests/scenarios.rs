use keypose::{Annotator, Button, ClickOutcome, Point, Primitive, SkeletonSet, Tag};
use serde_json::json;

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

#[test]
fn four_visible_clicks_complete_a_skeleton() {
    let mut set = SkeletonSet::default();
    assert_eq!(set.on_click(p(10.0, 10.0), Button::Left), ClickOutcome::Started);
    assert_eq!(set.on_click(p(20.0, 10.0), Button::Left), ClickOutcome::Extended);
    assert_eq!(set.on_click(p(20.0, 20.0), Button::Left), ClickOutcome::Extended);
    assert_eq!(set.on_click(p(20.0, 0.0), Button::Left), ClickOutcome::Finished);
    assert!(!set.is_busy());

    let s = &set.skeletons()[0];
    assert_eq!(
        s.nodes(),
        &[Some(p(10.0, 10.0)), Some(p(20.0, 10.0)), Some(p(20.0, 20.0)), Some(p(20.0, 0.0))]
    );
    assert_eq!(s.tags(), &[Tag::Visible; 4]);
    assert!(s.transitions().iter().all(|t| t.is_empty()));
}

#[test]
fn occluded_child_gets_a_tracking_transition() {
    let mut set = SkeletonSet::default();
    set.on_click(p(10.0, 10.0), Button::Left);
    set.on_cursor_moved(p(20.0, 10.0));
    set.on_click(p(20.0, 10.0), Button::Right);
    assert!(set.current().map_or(false, |s| s.is_interpolating()));

    assert!(set.on_cursor_moved(p(15.0, 10.0)));
    assert_eq!(set.current().map(|s| s.transitions()[0].clone()), Some(vec![p(15.0, 10.0)]));

    // off-edge cursor is clamped back onto the segment
    set.on_cursor_moved(p(15.0, 42.0));
    assert_eq!(set.current().map(|s| s.transitions()[0].clone()), Some(vec![p(15.0, 10.0)]));

    assert_eq!(set.on_click(p(15.0, 42.0), Button::Left), ClickOutcome::Extended);
    let s = set.current().expect("still in progress");
    assert!(!s.is_interpolating());
    assert_eq!(s.nodes()[1], Some(p(20.0, 10.0)));
    assert_eq!(s.tags()[1], Tag::Occluded);
    assert_eq!(s.nodes().len(), 3, "no node was added for the releasing click beyond the placeholder");
}

#[test]
fn middle_click_stops_early() {
    let mut set = SkeletonSet::default();
    set.on_click(p(10.0, 10.0), Button::Left);
    set.on_click(p(20.0, 10.0), Button::Left);
    assert!(set.current().map_or(false, |s| s.can_stop()));
    assert_eq!(set.on_click(p(30.0, 30.0), Button::Middle), ClickOutcome::Finished);

    let s = &set.skeletons()[0];
    assert_eq!(s.nodes(), &[Some(p(10.0, 10.0)), Some(p(20.0, 10.0)), None, None]);
    assert_eq!(s.tags(), &[Tag::Visible, Tag::Visible, Tag::Missing, Tag::Missing]);
    let segments: Vec<_> = set
        .primitives()
        .filter_map(|prim| match prim {
            Primitive::Segment { from, to, .. } => Some((from, to)),
            _ => None,
        })
        .collect();
    assert_eq!(segments, vec![(p(10.0, 10.0), p(20.0, 10.0))]);
}

#[test]
fn middle_click_before_child_is_confirmed_is_ignored() {
    let mut set = SkeletonSet::default();
    set.on_click(p(10.0, 10.0), Button::Left);
    assert_eq!(set.on_click(p(20.0, 10.0), Button::Middle), ClickOutcome::Ignored);
    assert!(set.is_busy());
}

#[test]
fn legacy_bare_point_transition_is_normalized() {
    let mut set = SkeletonSet::default();
    let legacy = json!([{
        "nodes": [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [10.0, -10.0]],
        "tags": ["visible", "visible", "occluded", "visible"],
        "edges": [[0, 1], [1, 2], [1, 3]],
        "transitions": [[], [5.0, 5.0], null]
    }]);
    set.set_data(legacy).unwrap();
    let s = &set.skeletons()[0];
    assert_eq!(s.transitions()[1], vec![p(5.0, 5.0)]);
    assert_eq!(set.get_data()[0]["transitions"], json!([[], [[5.0, 5.0]], []]));
}

#[test]
fn in_progress_skeleton_is_not_persisted() {
    let mut set = SkeletonSet::default();
    set.on_click(p(10.0, 10.0), Button::Left);
    set.on_click(p(20.0, 10.0), Button::Left);
    assert_eq!(set.get_data(), json!([]));
}

#[test]
fn failed_load_keeps_existing_skeletons() {
    let mut set = SkeletonSet::default();
    set.on_click(p(10.0, 10.0), Button::Left);
    set.on_click(p(20.0, 10.0), Button::Left);
    set.on_click(p(0.0, 50.0), Button::Middle);
    let bad = json!([{ "nodes": [[0.0, 0.0]], "tags": ["visible"], "edges": [[0, 2]] }]);
    assert!(set.set_data(bad).is_err());
    assert_eq!(set.skeletons().len(), 1);
}
