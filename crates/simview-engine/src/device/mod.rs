//! GPU device + window surface.
//!
//! Creates the wgpu device bound to the viewer window, keeps the swapchain
//! configured across resizes, and hands out one frame at a time.

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
