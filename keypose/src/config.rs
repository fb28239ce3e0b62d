use serde::Deserialize;
use std::path::PathBuf;

/// Editing and drawing parameters of a skeleton annotator.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Marker radius in image pixels. Transition hits use twice this.
    pub node_radius: f64,
    /// `false` turns the annotator into a viewer: clicks, deletions and saves are ignored.
    pub allow_editing: bool,
    /// Hue advance between successive skeletons, wrapped to `[0, 1)`.
    pub hue_step: f64,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        AnnotatorConfig { node_radius: 3.0, allow_editing: true, hue_step: 2.0 / 7.0 }
    }
}

impl AnnotatorConfig {
    pub fn hit_tolerance(&self) -> f64 { 2.0 * self.node_radius }
    pub fn line_width(&self) -> f64 { 0.5 * self.node_radius }

    /// Display hue of the skeleton created after `existing` others.
    pub fn hue_for(&self, existing: usize) -> f64 {
        ((1 + existing) as f64 * self.hue_step).fract()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_step: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig { zoom_min: 0.5, zoom_max: 1.0, zoom_step: 0.1 }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// JSON list of image paths marked as seen.
    pub cache_file: PathBuf,
    /// Restrict the session to images listed in `cache_file`.
    pub cached_only: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig { cache_file: PathBuf::from("cached-images.json"), cached_only: false }
    }
}
