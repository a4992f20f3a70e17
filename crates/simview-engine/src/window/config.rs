use crate::device::GpuInit;

/// Window and GPU options for [`Display`](crate::display::Display).
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub title: String,
    /// Initial inner size in logical pixels.
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub gpu: GpuInit,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "simview".to_string(),
            width: 1000,
            height: 500,
            resizable: true,
            gpu: GpuInit::default(),
        }
    }
}

impl DisplayConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}
