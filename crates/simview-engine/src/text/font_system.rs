use std::fmt;
use std::path::Path;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use crate::paint::{RgbColor, Surface};

/// Error returned when a font cannot be loaded.
#[derive(Debug)]
pub enum FontLoadError {
    Io(std::io::Error),
    Parse(String),
}

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontLoadError::Io(e) => write!(f, "font load error: {e}"),
            FontLoadError::Parse(msg) => write!(f, "font load error: {msg}"),
        }
    }
}

impl std::error::Error for FontLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FontLoadError::Io(e) => Some(e),
            FontLoadError::Parse(_) => None,
        }
    }
}

impl From<std::io::Error> for FontLoadError {
    fn from(e: std::io::Error) -> Self {
        FontLoadError::Io(e)
    }
}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Loaded fonts plus a reusable layout, used to pre-render text into
/// [`Surface`]s for [`Display::draw_text`](crate::display::Display::draw_text).
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
    layout: Layout<()>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self {
            fonts: Vec::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError::Parse(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> Result<FontId, FontLoadError> {
        let bytes = std::fs::read(path.as_ref())?;
        let id = self.load_font(&bytes)?;
        log::debug!("loaded font {:?} from {}", id, path.as_ref().display());
        Ok(id)
    }

    /// Pixel size `(width, height)` of `text` laid out on one line.
    ///
    /// Unknown fonts measure as zero.
    pub fn measure_text(&mut self, text: &str, id: FontId, size: f32) -> (u32, u32) {
        let Some(font) = self.fonts.get(id.0) else {
            return (0, 0);
        };
        lay_out(&mut self.layout, font, text, size)
    }

    /// Rasterizes `text` on one line into a tightly sized RGBA surface.
    ///
    /// Glyph coverage becomes alpha over a uniform `color`. An unknown font or
    /// empty text yields an empty surface.
    pub fn render_text(&mut self, text: &str, id: FontId, size: f32, color: RgbColor) -> Surface {
        let Some(font) = self.fonts.get(id.0) else {
            log::warn!("render_text: unknown {id:?}, nothing rendered");
            return Surface::new(0, 0);
        };

        let (width, height) = lay_out(&mut self.layout, font, text, size);
        let mut surface = Surface::new(width, height);
        if surface.is_empty() {
            return surface;
        }

        let [r, g, b, _] = color.to_rgba8();
        for glyph in self.layout.glyphs() {
            if !glyph.char_data.rasterize() || glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            let (metrics, coverage) = font.rasterize_config(glyph.key);
            let ox = glyph.x.round() as i64;
            let oy = glyph.y.round() as i64;

            for (i, &a) in coverage.iter().enumerate() {
                if a == 0 {
                    continue;
                }
                let x = ox + (i % metrics.width) as i64;
                let y = oy + (i / metrics.width) as i64;
                if x < 0 || y < 0 {
                    continue;
                }
                let (x, y) = (x as u32, y as u32);
                // Overlapping glyphs (kerning) keep the stronger coverage.
                if let Some([_, _, _, prev]) = surface.pixel(x, y) {
                    surface.put_pixel(x, y, [r, g, b, prev.max(a)]);
                }
            }
        }

        surface
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Lays `text` out at the origin and returns its pixel extent.
fn lay_out(layout: &mut Layout<()>, font: &fontdue::Font, text: &str, size: f32) -> (u32, u32) {
    layout.reset(&LayoutSettings::default());
    layout.append(&[font], &TextStyle::new(text, size, 0));

    let glyphs = layout.glyphs();
    if glyphs.is_empty() {
        return (0, 0);
    }

    let width = glyphs
        .iter()
        .map(|g| {
            let m = font.metrics_indexed(g.key.glyph_index, size);
            (g.x - m.xmin as f32 + m.advance_width).max(g.x + g.width as f32)
        })
        .fold(0.0f32, f32::max);
    let height = glyphs
        .iter()
        .map(|g| g.y + g.height as f32)
        .fold(layout.height(), f32::max);

    (width.ceil().max(0.0) as u32, height.ceil().max(0.0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_parse() {
        let mut fonts = FontSystem::new();
        let err = fonts.load_font(b"definitely not a font").unwrap_err();
        assert!(matches!(err, FontLoadError::Parse(_)));
        assert!(err.to_string().starts_with("font load error"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut fonts = FontSystem::new();
        let err = fonts.load_font_file("/nonexistent/simview-font.ttf").unwrap_err();
        assert!(matches!(err, FontLoadError::Io(_)));
    }

    #[test]
    fn unknown_font_renders_nothing() {
        let mut fonts = FontSystem::new();
        let s = fonts.render_text("hello", FontId(3), 16.0, RgbColor::default());
        assert!(s.is_empty());
        assert_eq!(fonts.measure_text("hello", FontId(3), 16.0), (0, 0));
    }
}
