//! RGBA pixel buffer the debug renderers draw into.

/// Row-major RGBA8 image, row 0 at minimum world Z.
#[derive(Clone, Debug)]
pub struct DebugImage {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl DebugImage {
    /// Fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * 4)
    }

    /// Write an opaque pixel. Coordinates outside the image are ignored.
    pub fn set_rgb(&mut self, x: u32, y: u32, (r, g, b): (u8, u8, u8)) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&[r, g, b, 255]);
        }
    }

    /// RGBA at `(x, y)`, or `None` outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8, u8)> {
        let i = self.offset(x, y)?;
        let p = &self.pixels[i..i + 4];
        Some((p[0], p[1], p[2], p[3]))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// One-pixel outline of the inclusive rectangle `(x0, y0)..=(x1, y1)`,
    /// clipped to the image.
    pub fn outline_rect(&mut self, (x0, y0): (u32, u32), (x1, y1): (u32, u32), rgb: (u8, u8, u8)) {
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        for x in x0..=x1.min(self.width.saturating_sub(1)) {
            self.set_rgb(x, y0, rgb);
            self.set_rgb(x, y1, rgb);
        }
        for y in y0..=y1.min(self.height.saturating_sub(1)) {
            self.set_rgb(x0, y, rgb);
            self.set_rgb(x1, y, rgb);
        }
    }

    /// Distinct RGB values, alpha ignored. Used to check that a map shows
    /// more than one band.
    pub fn unique_color_count(&self) -> usize {
        self.pixels
            .chunks_exact(4)
            .map(|p| (p[0], p[1], p[2]))
            .collect::<hashbrown::HashSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_size() {
        let image = DebugImage::new(256, 128);
        assert_eq!(image.dimensions(), (256, 128));
        assert_eq!(image.pixels.len(), 256 * 128 * 4);
    }

    #[test]
    fn test_pixels_are_opaque_and_bounded() {
        let mut image = DebugImage::new(8, 8);
        image.set_rgb(2, 3, (10, 20, 30));
        image.set_rgb(8, 0, (1, 1, 1));
        assert_eq!(image.get_pixel(2, 3), Some((10, 20, 30, 255)));
        assert_eq!(image.get_pixel(3, 2), Some((0, 0, 0, 0)));
        assert_eq!(image.get_pixel(8, 0), None);
    }

    #[test]
    fn test_outline_is_clipped() {
        let mut image = DebugImage::new(10, 10);
        image.outline_rect((2, 2), (20, 5), (255, 0, 255));
        assert_eq!(image.get_pixel(9, 2), Some((255, 0, 255, 255)));
        assert_eq!(image.get_pixel(2, 4), Some((255, 0, 255, 255)));
        assert_eq!(image.get_pixel(5, 4), Some((0, 0, 0, 0)));
        // Black interior plus the outline colour.
        assert_eq!(image.unique_color_count(), 2);
    }
}
