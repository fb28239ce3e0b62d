use crate::error;
use crate::interop::{arr_f32, arr_u8, new_obj, set_kv};
use crate::SkeletonAnnotator;
use keypose::{Annotator as _, AnnotatorConfig, Button, ClickOutcome, Point, Rect, RenderArrays};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js(v: &serde_json::Value) -> JsValue {
    // plain objects rather than Maps
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
impl SkeletonAnnotator {
    #[wasm_bindgen(constructor)]
    pub fn new(allow_editing: bool) -> SkeletonAnnotator {
        SkeletonAnnotator::rs_new(AnnotatorConfig { allow_editing, ..Default::default() })
    }

    /// Builds from a partial config object, e.g. `{ node_radius: 4 }`. Unknown
    /// fields are ignored; a malformed object yields `undefined`.
    pub fn from_config(config: JsValue) -> Option<SkeletonAnnotator> {
        match serde_wasm_bindgen::from_value::<AnnotatorConfig>(config) {
            Ok(c) => Some(SkeletonAnnotator::rs_new(c)),
            Err(e) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!("rejected annotator config: {}", e)));
                None
            }
        }
    }

    // Layout
    pub fn set_layout(&mut self, x: f64, y: f64, w: f64, h: f64) -> bool {
        self.view.set_widget(Rect { x, y, w, h })
    }
    pub fn set_image_size(&mut self, w: f64, h: f64) -> bool {
        self.view.set_image_size(w, h)
    }
    pub fn zoom(&self) -> f64 {
        self.view.zoom()
    }
    /// `[x, y, w, h]` of the drawn image in window space.
    pub fn image_rect(&self) -> js_sys::Float32Array {
        let r = self.view.image_rect();
        arr_f32(&[r.x as f32, r.y as f32, r.w as f32, r.h as f32])
    }

    // Window-space events
    pub fn pointer_moved(&mut self, wx: f64, wy: f64) -> bool {
        let w = Point::new(wx, wy);
        if !w.is_finite() || !self.view.hit(w) {
            return false;
        }
        let p = self.view.window_to_image(w);
        self.inner.on_cursor_moved(p)
    }
    pub fn pointer_down(&mut self, wx: f64, wy: f64, button: u8) -> String {
        let w = Point::new(wx, wy);
        let outcome = match Button::from_dom(button) {
            Some(b) if w.is_finite() && self.view.hit(w) => {
                let p = self.view.window_to_image(w);
                self.inner.on_click(p, b)
            }
            _ => ClickOutcome::Ignored,
        };
        outcome.as_str().to_string()
    }
    /// Scroll zooms about the widget center and re-tracks the cursor under the new scale.
    pub fn scroll(&mut self, wx: f64, wy: f64, steps: f64) -> bool {
        let w = Point::new(wx, wy);
        if !w.is_finite() || !self.view.hit(w) {
            return false;
        }
        self.view.zoom_by(steps);
        let p = self.view.window_to_image(w);
        self.inner.on_cursor_moved(p);
        true
    }

    // Image-space events
    pub fn on_click(&mut self, x: f64, y: f64, button: u8) -> String {
        let outcome = match Button::from_dom(button) {
            Some(b) if x.is_finite() && y.is_finite() => self.inner.on_click(Point::new(x, y), b),
            _ => ClickOutcome::Ignored,
        };
        outcome.as_str().to_string()
    }
    pub fn on_click_res(&mut self, x: f64, y: f64, button: u8) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        let Some(b) = Button::from_dom(button) else {
            return error::invalid_button(button);
        };
        let outcome = self.inner.on_click(Point::new(x, y), b);
        error::ok(JsValue::from_str(outcome.as_str()))
    }
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> bool {
        let p = Point::new(x, y);
        p.is_finite() && self.inner.on_cursor_moved(p)
    }

    // State
    pub fn delete_last(&mut self) -> bool {
        self.inner.delete_last()
    }
    pub fn is_busy(&self) -> bool {
        self.inner.is_busy()
    }
    pub fn can_stop(&self) -> bool {
        self.inner.current().map_or(false, |s| s.can_stop())
    }
    pub fn is_interpolating(&self) -> bool {
        self.inner.current().map_or(false, |s| s.is_interpolating())
    }
    pub fn skeleton_count(&self) -> u32 {
        self.inner.skeletons().len() as u32
    }
    pub fn reset(&mut self) {
        self.inner.reset()
    }

    /// Typed arrays in image space: `segments` (x0,y0,x1,y1), `segment_rgba`,
    /// `segment_widths`, `markers` (x,y,r), `marker_rgba`.
    pub fn render_data(&self) -> JsValue {
        let ra: RenderArrays = self.inner.primitives().collect();
        let obj = new_obj();
        set_kv(&obj, "segments", &arr_f32(&ra.segments).into());
        set_kv(&obj, "segment_rgba", &arr_u8(&ra.segment_rgba).into());
        set_kv(&obj, "segment_widths", &arr_f32(&ra.segment_widths).into());
        set_kv(&obj, "markers", &arr_f32(&ra.markers).into());
        set_kv(&obj, "marker_rgba", &arr_u8(&ra.marker_rgba).into());
        obj.into()
    }

    // Persistence
    pub fn get_data(&self) -> JsValue {
        to_js(&self.inner.get_data())
    }
    /// Refused while a skeleton is in progress, like `set_data_res`.
    pub fn set_data(&mut self, v: JsValue) -> bool {
        if self.inner.is_busy() {
            return false;
        }
        match serde_wasm_bindgen::from_value::<serde_json::Value>(v) {
            Ok(val) => match self.inner.set_data(val) {
                Ok(()) => true,
                Err(e) => {
                    web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
                    false
                }
            },
            Err(_) => false,
        }
    }
    pub fn set_data_res(&mut self, v: JsValue) -> JsValue {
        if self.inner.is_busy() {
            return error::busy();
        }
        let val = match serde_wasm_bindgen::from_value::<serde_json::Value>(v) {
            Ok(val) => val,
            Err(e) => return error::err("invalid_data", e.to_string(), None),
        };
        match self.inner.set_data(val) {
            Ok(()) => error::ok(JsValue::from_f64(self.inner.skeletons().len() as f64)),
            Err(e) => error::invalid_data(&e),
        }
    }
    pub fn to_json_string(&self) -> String {
        self.inner.get_data().to_string()
    }
    pub fn from_json_string(&mut self, s: &str) -> bool {
        if self.inner.is_busy() {
            return false;
        }
        match serde_json::from_str::<serde_json::Value>(s) {
            Ok(val) => self.inner.set_data(val).is_ok(),
            Err(_) => false,
        }
    }
}
