pub mod model;
pub mod geometry {
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}
pub mod annotator;
pub mod config;
pub mod error;
pub mod render;
pub mod session;
pub mod skeleton;
pub mod view;
mod json;

pub use annotator::{Annotator, ClickOutcome, SkeletonSet};
pub use config::{AnnotatorConfig, SessionConfig, ViewConfig};
pub use error::{DataError, SessionError};
pub use geometry::math::position_on_line;
pub use model::{Button, Color, Point, Tag};
pub use render::{Primitive, RenderArrays};
pub use session::Session;
pub use skeleton::{Skeleton, State, EDGES, NODE_COUNT};
pub use view::{Rect, Viewport};
