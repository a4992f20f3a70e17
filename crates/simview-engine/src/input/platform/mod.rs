//! Platform event translation.

mod winit;

pub use self::winit::WinitTranslator;
