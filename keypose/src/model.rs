use serde::{Deserialize, Serialize};

/// A position in image space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from(v: [f64; 2]) -> Self {
        Point { x: v[0], y: v[1] }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

/// Annotated state of a node, or of the stretch of edge leading into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Visible,
    Occluded,
    /// Slot was never placed; padding for skeletons stopped early.
    Missing,
}

impl Tag {
    /// Flips visible and occluded. `Missing` stays missing.
    pub fn opposite(self) -> Tag {
        match self {
            Tag::Visible => Tag::Occluded,
            Tag::Occluded => Tag::Visible,
            Tag::Missing => Tag::Missing,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Tag::Missing)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Middle,
}

impl Button {
    /// Tag a click with this button places. Middle never places a node.
    pub fn tag(self) -> Option<Tag> {
        match self {
            Button::Left => Some(Tag::Visible),
            Button::Right => Some(Tag::Occluded),
            Button::Middle => None,
        }
    }

    /// DOM `MouseEvent.button` numbering.
    pub fn from_dom(code: u8) -> Option<Button> {
        match code {
            0 => Some(Button::Left),
            1 => Some(Button::Middle),
            2 => Some(Button::Right),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
