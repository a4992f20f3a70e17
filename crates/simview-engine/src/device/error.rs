/// What the caller should do after failing to acquire a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Swapchain was rebuilt; the next frame should succeed.
    Reconfigured,
    /// Transient; drop this frame.
    SkipFrame,
    /// Unrecoverable (out of memory).
    Fatal,
}

impl SurfaceErrorAction {
    #[inline]
    pub fn is_fatal(self) -> bool {
        matches!(self, SurfaceErrorAction::Fatal)
    }
}
