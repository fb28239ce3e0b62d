//! Drawing primitives produced by annotators, in image space.

use crate::model::{Color, Point, Tag};

const SATURATION: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Segment { from: Point, to: Point, width: f64, color: Color },
    Marker { center: Point, radius: f64, color: Color },
}

/// Color of a skeleton element: the skeleton's hue, dimmed when occluded.
/// `Missing` has no color since it is never drawn.
pub fn tag_color(hue: f64, tag: Tag) -> Option<Color> {
    let value = match tag {
        Tag::Visible => 1.0,
        Tag::Occluded => 0.3,
        Tag::Missing => return None,
    };
    Some(hsv_to_color(hue, SATURATION, value))
}

pub fn hsv_to_color(h: f64, s: f64, v: f64) -> Color {
    let h6 = h.rem_euclid(1.0) * 6.0;
    let sector = (h6.floor() as i32).rem_euclid(6);
    let f = h6 - h6.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let to_u8 = |c: f64| (c.max(0.0).min(1.0) * 255.0).round() as u8;
    Color { r: to_u8(r), g: to_u8(g), b: to_u8(b), a: 255 }
}

/// Flat buffers for typed-array transfer. Narrowed to `f32` for drawing only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderArrays {
    pub segments: Vec<f32>,      // x0,y0,x1,y1 per segment
    pub segment_rgba: Vec<u8>,
    pub segment_widths: Vec<f32>,
    pub markers: Vec<f32>,       // x,y,radius per marker
    pub marker_rgba: Vec<u8>,
}

impl RenderArrays {
    pub fn push(&mut self, p: &Primitive) {
        match *p {
            Primitive::Segment { from, to, width, color } => {
                self.segments.extend_from_slice(&[from.x as f32, from.y as f32, to.x as f32, to.y as f32]);
                self.segment_rgba.extend_from_slice(&color.rgba());
                self.segment_widths.push(width as f32);
            }
            Primitive::Marker { center, radius, color } => {
                self.markers.extend_from_slice(&[center.x as f32, center.y as f32, radius as f32]);
                self.marker_rgba.extend_from_slice(&color.rgba());
            }
        }
    }

    pub fn segment_count(&self) -> usize { self.segment_widths.len() }
    pub fn marker_count(&self) -> usize { self.markers.len() / 3 }
}

impl FromIterator<Primitive> for RenderArrays {
    fn from_iter<I: IntoIterator<Item = Primitive>>(iter: I) -> Self {
        let mut out = RenderArrays::default();
        for p in iter { out.push(&p); }
        out
    }
}
