//! Frame recording and GPU rendering.
//!
//! Drawing calls are recorded into a [`FrameRecorder`] (plain data, testable
//! without a GPU) and turned into wgpu passes when the frame is shown.
//!
//! Convention:
//! - geometry is in physical window pixels (top-left origin, +Y down);
//! - vertex shaders convert to NDC using a viewport uniform.

mod batch;
mod ctx;
mod frame;
mod overlay;
pub mod shapes;
pub mod tessellate;

pub use batch::{PolyVertex, PolygonBatch};
pub use ctx::{RenderCtx, RenderTarget};
pub use frame::FrameRecorder;
pub use overlay::{FrameOverlays, OverlayEntry, OverlayQueue};
