use crate::config::ViewConfig;
use crate::model::Point;

/// Axis-aligned rectangle in window space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
}

/// Maps between window coordinates and image pixels. The image is fitted into the
/// widget with its aspect ratio kept, scaled by the zoom and centered.
#[derive(Clone, Debug)]
pub struct Viewport {
    widget: Rect,
    image_w: f64,
    image_h: f64,
    zoom: f64,
    config: ViewConfig,
    rect: Rect,
}

impl Viewport {
    pub fn new(config: ViewConfig) -> Viewport {
        let unit = Rect { x: 0.0, y: 0.0, w: 1.0, h: 1.0 };
        let mut v = Viewport { widget: unit, image_w: 1.0, image_h: 1.0, zoom: 1.0, config, rect: unit };
        v.zoom = v.zoom.max(config.zoom_min).min(config.zoom_max);
        v.update();
        v
    }

    /// Returns false (and keeps the previous layout) for empty or non-finite sizes.
    pub fn set_widget(&mut self, widget: Rect) -> bool {
        let ok = [widget.x, widget.y].iter().all(|v| v.is_finite())
            && widget.w.is_finite() && widget.w > 0.0
            && widget.h.is_finite() && widget.h > 0.0;
        if ok {
            self.widget = widget;
            self.update();
        }
        ok
    }

    pub fn set_image_size(&mut self, w: f64, h: f64) -> bool {
        let ok = w.is_finite() && w > 0.0 && h.is_finite() && h > 0.0;
        if ok {
            self.image_w = w;
            self.image_h = h;
            self.update();
        }
        ok
    }

    pub fn zoom(&self) -> f64 { self.zoom }

    /// Steps the zoom; negative for scrolling down. Clamped to the configured range.
    pub fn zoom_by(&mut self, steps: f64) {
        if !steps.is_finite() {
            return;
        }
        let z = self.zoom + steps * self.config.zoom_step;
        self.zoom = z.max(self.config.zoom_min).min(self.config.zoom_max);
        self.update();
    }

    /// Where the image is drawn, in window space.
    pub fn image_rect(&self) -> Rect { self.rect }

    fn update(&mut self) {
        let (w, h) = (self.image_w, self.image_h);
        let scale = if w / h > self.widget.w / self.widget.h { self.widget.w / w } else { self.widget.h / h };
        let new_w = w * scale * self.zoom;
        let new_h = h * scale * self.zoom;
        self.rect = Rect {
            x: self.widget.x + (self.widget.w - new_w) / 2.0,
            y: self.widget.y + (self.widget.h - new_h) / 2.0,
            w: new_w,
            h: new_h,
        };
    }

    pub fn window_to_image(&self, p: Point) -> Point {
        let r = self.rect;
        Point::new(self.image_w * (p.x - r.x) / r.w, self.image_h * (p.y - r.y) / r.h)
    }

    pub fn image_to_window(&self, p: Point) -> Point {
        let r = self.rect;
        Point::new(r.x + p.x * r.w / self.image_w, r.y + p.y * r.h / self.image_h)
    }

    /// Window-space events outside the widget are not for us.
    pub fn hit(&self, p: Point) -> bool {
        self.widget.contains(p)
    }
}
