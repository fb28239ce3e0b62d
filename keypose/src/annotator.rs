//! Click routing across a set of skeletons.

use crate::config::AnnotatorConfig;
use crate::error::DataError;
use crate::json;
use crate::model::{Button, Point};
use crate::render::Primitive;
use crate::skeleton::Skeleton;
use serde_json::Value;
use tracing::debug;

/// What a click did, so the caller knows whether to redraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Started,
    Extended,
    Finished,
    /// A completed skeleton took the click as a transition (or absorbed it on an existing point).
    TransitionHit,
}

impl ClickOutcome {
    pub fn changed(self) -> bool {
        self != ClickOutcome::Ignored
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClickOutcome::Ignored => "ignored",
            ClickOutcome::Started => "started",
            ClickOutcome::Extended => "extended",
            ClickOutcome::Finished => "finished",
            ClickOutcome::TransitionHit => "transition",
        }
    }
}

/// An annotation strategy driven by image-space pointer events.
pub trait Annotator {
    fn on_click(&mut self, position: Point, button: Button) -> ClickOutcome;
    /// Returns whether anything moved.
    fn on_cursor_moved(&mut self, position: Point) -> bool;
    fn primitives(&self) -> Box<dyn Iterator<Item = Primitive> + '_>;
    /// True while an annotation is half made; navigation must wait.
    fn is_busy(&self) -> bool;
    fn allows_editing(&self) -> bool;
    fn delete_last(&mut self) -> bool;
    fn reset(&mut self);
    fn get_data(&self) -> Value;
    fn set_data(&mut self, data: Value) -> Result<(), DataError>;
}

#[derive(Clone, Debug, Default)]
pub struct SkeletonSet {
    skeletons: Vec<Skeleton>,
    current: Option<Skeleton>,
    config: AnnotatorConfig,
}

impl SkeletonSet {
    pub fn new(config: AnnotatorConfig) -> SkeletonSet {
        SkeletonSet { skeletons: Vec::new(), current: None, config }
    }

    pub fn config(&self) -> &AnnotatorConfig { &self.config }
    pub fn skeletons(&self) -> &[Skeleton] { &self.skeletons }
    pub fn current(&self) -> Option<&Skeleton> { self.current.as_ref() }

    fn start_or_edit(&mut self, position: Point, button: Button) -> ClickOutcome {
        // at most one completed skeleton takes the click
        if self.skeletons.iter_mut().any(|s| s.try_add_transition(position)) {
            return ClickOutcome::TransitionHit;
        }
        match button.tag() {
            Some(tag) => {
                let hue = self.config.hue_for(self.skeletons.len());
                self.current = Some(Skeleton::new(position, tag, hue, self.config.node_radius));
                debug!(index = self.skeletons.len(), ?tag, "skeleton started");
                ClickOutcome::Started
            }
            None => ClickOutcome::Ignored,
        }
    }
}

impl Annotator for SkeletonSet {
    fn on_click(&mut self, position: Point, button: Button) -> ClickOutcome {
        if !self.config.allow_editing {
            return ClickOutcome::Ignored;
        }
        let current = match self.current.as_mut() {
            Some(current) => current,
            None => return self.start_or_edit(position, button),
        };
        let mut outcome = ClickOutcome::Ignored;
        if let Some(tag) = button.tag() {
            if current.add_point(position, tag) {
                outcome = ClickOutcome::Extended;
            }
        }
        if (button == Button::Middle && current.can_stop()) || current.must_stop() {
            if let Some(mut done) = self.current.take() {
                done.finish();
                self.skeletons.push(done);
                outcome = ClickOutcome::Finished;
            }
        }
        outcome
    }

    fn on_cursor_moved(&mut self, position: Point) -> bool {
        self.current.as_mut().map_or(false, |s| s.update_cursor_position(position))
    }

    fn primitives(&self) -> Box<dyn Iterator<Item = Primitive> + '_> {
        Box::new(self.skeletons.iter().chain(self.current.iter()).flat_map(|s| s.primitives()))
    }

    fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    fn allows_editing(&self) -> bool {
        self.config.allow_editing
    }

    /// Discards the skeleton in progress, or else the most recently completed one.
    fn delete_last(&mut self) -> bool {
        if !self.config.allow_editing {
            return false;
        }
        if self.current.take().is_some() {
            debug!("in-progress skeleton discarded");
            return true;
        }
        let popped = self.skeletons.pop().is_some();
        if popped {
            debug!(remaining = self.skeletons.len(), "skeleton deleted");
        }
        popped
    }

    fn reset(&mut self) {
        self.skeletons.clear();
        self.current = None;
    }

    /// Completed skeletons only; a skeleton in progress is never persisted.
    fn get_data(&self) -> Value {
        json::set_to_json_impl(&self.skeletons)
    }

    /// Replaces the completed skeletons. On error nothing changes.
    fn set_data(&mut self, data: Value) -> Result<(), DataError> {
        let loaded = json::set_from_json_impl(data, &self.config)?;
        self.skeletons = loaded;
        self.current = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;

    fn p(x: f64, y: f64) -> Point { Point::new(x, y) }

    #[test]
    fn middle_click_does_not_start() {
        let mut set = SkeletonSet::default();
        assert_eq!(set.on_click(p(1.0, 1.0), Button::Middle), ClickOutcome::Ignored);
        assert!(!set.is_busy());
    }

    #[test]
    fn right_click_starts_occluded() {
        let mut set = SkeletonSet::default();
        assert_eq!(set.on_click(p(1.0, 1.0), Button::Right), ClickOutcome::Started);
        assert_eq!(set.current().map(|s| s.tags()[0]), Some(Tag::Occluded));
    }

    #[test]
    fn viewer_mode_ignores_edits() {
        let mut set = SkeletonSet::new(AnnotatorConfig { allow_editing: false, ..Default::default() });
        assert_eq!(set.on_click(p(1.0, 1.0), Button::Left), ClickOutcome::Ignored);
        assert!(!set.delete_last());
    }

    #[test]
    fn middle_click_during_interpolation_is_ignored() {
        let mut set = SkeletonSet::default();
        set.on_click(p(10.0, 10.0), Button::Left);
        set.on_click(p(20.0, 10.0), Button::Right);
        assert_eq!(set.on_click(p(15.0, 10.0), Button::Middle), ClickOutcome::Ignored);
        assert!(set.current().map_or(false, |s| s.is_interpolating()));
    }

    #[test]
    fn delete_prefers_current() {
        let mut set = SkeletonSet::default();
        for (x, y) in [(10.0, 10.0), (20.0, 10.0), (20.0, 20.0), (20.0, 0.0)] {
            set.on_click(p(x, y), Button::Left);
        }
        assert_eq!(set.skeletons().len(), 1);
        set.on_click(p(100.0, 100.0), Button::Left);
        assert!(set.is_busy());
        assert!(set.delete_last());
        assert!(!set.is_busy());
        assert_eq!(set.skeletons().len(), 1);
        assert!(set.delete_last());
        assert!(set.skeletons().is_empty());
        assert!(!set.delete_last());
    }

    #[test]
    fn hues_follow_creation_order() {
        let mut set = SkeletonSet::default();
        set.on_click(p(10.0, 10.0), Button::Left);
        set.on_click(p(20.0, 10.0), Button::Left);
        set.on_click(p(30.0, 10.0), Button::Middle);
        set.on_click(p(100.0, 100.0), Button::Left);
        let c = *set.config();
        assert_eq!(set.skeletons()[0].hue(), c.hue_for(0));
        assert_eq!(set.current().map(|s| s.hue()), Some(c.hue_for(1)));
    }
}
