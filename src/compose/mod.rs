//! Page compositing: canvas sizing, content redraw and stamp overlay.
//!
//! - [`canvas`]: page rectangles for document pages and images
//! - [`stamp`]: Bates text formatting, measurement and drawing
//! - [`extract`]: lifting one page out of a source document
//! - [`compositor`]: the per-page pipeline tying the above together

pub mod canvas;
pub mod compositor;
pub mod extract;
pub mod stamp;

pub use canvas::{Canvas, Rotation};
pub use compositor::{Page, PageCompositor, PageSource};
pub use stamp::format_stamp;
