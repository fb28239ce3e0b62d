use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

/// Browser handle over one image's skeletons and its on-screen placement.
#[wasm_bindgen]
pub struct SkeletonAnnotator {
    pub(crate) inner: keypose::SkeletonSet,
    pub(crate) view: keypose::Viewport,
}

impl SkeletonAnnotator {
    pub fn rs_new(config: keypose::AnnotatorConfig) -> SkeletonAnnotator {
        SkeletonAnnotator {
            inner: keypose::SkeletonSet::new(config),
            view: keypose::Viewport::new(keypose::ViewConfig::default()),
        }
    }
}
