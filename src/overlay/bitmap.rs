//! Overlay Bitmap
//!
//! The raster layer drawing strokes land on. One bitmap per view, in the
//! same pixel frame as the view's markers -- stroke coordinates must be
//! computed with the identical `CanvasBounds`, or strokes and markers drift
//! apart visually.
//!
//! Pixels are RGBA8 packed into `u32` (byte order r, g, b, a), zero
//! initialized, i.e. fully transparent. Export collaborators read the raw
//! bytes or a PNG encoding; they never write.

use glam::Vec2;

// Raw byte export casts the pixel buffer in place.
static_assertions::assert_eq_size!(u32, [u8; 4]);

// ============================================================================
// BRUSH
// ============================================================================

/// Drawing brush: a filled disc stamped along the pointer path.
#[derive(Debug, Clone, Copy)]
pub struct Brush {
    /// Disc radius in pixels.
    pub radius: f32,
    /// RGBA color (0-255); the alpha channel controls blend strength.
    pub color: [u8; 4],
}

impl Brush {
    /// Create a brush with the given radius and color.
    pub fn new(radius: f32, color: [u8; 4]) -> Self {
        Self { radius, color }
    }
}

// ============================================================================
// BITMAP
// ============================================================================

/// A per-view RGBA8 raster overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl OverlayBitmap {
    /// Create a fully transparent bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize)],
        }
    }

    /// Bitmap width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Bitmap height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Whether no pixel has been touched.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&p| p == 0)
    }

    /// Packed RGBA value at (x, y), or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    // ========================================================================
    // PAINTING
    // ========================================================================

    /// Stamp a filled brush disc centered at `center` (pixel coordinates).
    /// Pixels outside the bitmap are ignored.
    pub fn stamp(&mut self, center: Vec2, brush: &Brush) {
        let r = brush.radius.max(0.5);
        let min_x = (center.x - r).floor().max(0.0) as u32;
        let min_y = (center.y - r).floor().max(0.0) as u32;
        let max_x = ((center.x + r).ceil() as i64).clamp(0, self.width as i64) as u32;
        let max_y = ((center.y + r).ceil() as i64).clamp(0, self.height as i64) as u32;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                if d <= r {
                    let idx = (y * self.width + x) as usize;
                    self.pixels[idx] = blend_over(self.pixels[idx], brush.color);
                }
            }
        }
    }

    /// Stamp brush discs along the segment `from` -> `to`, spaced closely
    /// enough that fast pointer moves leave no gaps.
    pub fn stroke_segment(&mut self, from: Vec2, to: Vec2, brush: &Brush) {
        let length = from.distance(to);
        let spacing = (brush.radius * 0.5).max(0.5);
        let steps = (length / spacing).ceil() as u32;
        for i in 0..=steps {
            let t = if steps == 0 { 0.0 } else { i as f32 / steps as f32 };
            self.stamp(from.lerp(to, t), brush);
        }
    }

    // ========================================================================
    // EXPORT
    // ========================================================================

    /// Raw RGBA8 bytes, row-major, for export collaborators.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Encode the bitmap as PNG for report embedding.
    pub fn encode_png(&self) -> Result<Vec<u8>, String> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.as_bytes().to_vec())
            .ok_or_else(|| "bitmap buffer size mismatch".to_string())?;
        let mut out = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .map_err(|e| format!("{e}"))?;
        Ok(out)
    }
}

/// Source-over blend of a straight-alpha RGBA color onto a packed pixel.
fn blend_over(dst: u32, src: [u8; 4]) -> u32 {
    let d = dst.to_le_bytes();
    let sa = src[3] as u32;
    let inv = 255 - sa;
    let ch = |s: u8, d: u8| ((s as u32 * sa + d as u32 * inv) / 255) as u8;
    let a = (sa + d[3] as u32 * inv / 255).min(255) as u8;
    u32::from_le_bytes([ch(src[0], d[0]), ch(src[1], d[1]), ch(src[2], d[2]), a])
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Brush {
        Brush::new(3.0, [255, 0, 0, 255])
    }

    #[test]
    fn test_new_bitmap_is_blank() {
        let b = OverlayBitmap::new(32, 16);
        assert!(b.is_blank());
        assert_eq!(b.as_bytes().len(), 32 * 16 * 4);
    }

    #[test]
    fn test_stamp_paints_inside_radius_only() {
        let mut b = OverlayBitmap::new(32, 32);
        b.stamp(Vec2::new(16.0, 16.0), &red());

        assert_ne!(b.pixel(16, 16), Some(0), "center painted");
        assert_eq!(b.pixel(16, 25), Some(0), "outside radius untouched");
        assert_eq!(b.pixel(0, 0), Some(0));
    }

    #[test]
    fn test_stamp_off_canvas_is_safe() {
        let mut b = OverlayBitmap::new(16, 16);
        b.stamp(Vec2::new(-10.0, -10.0), &red());
        b.stamp(Vec2::new(100.0, 8.0), &red());
        assert!(b.is_blank());
    }

    #[test]
    fn test_stroke_segment_leaves_no_gaps() {
        let mut b = OverlayBitmap::new(64, 64);
        b.stroke_segment(Vec2::new(5.0, 5.0), Vec2::new(58.0, 58.0), &red());

        // Every point along the diagonal is covered.
        for i in 5..=58 {
            assert_ne!(b.pixel(i, i), Some(0), "gap at ({i}, {i})");
        }
    }

    #[test]
    fn test_opaque_brush_writes_full_color() {
        let mut b = OverlayBitmap::new(8, 8);
        b.stamp(Vec2::new(4.0, 4.0), &Brush::new(2.0, [10, 20, 30, 255]));
        let px = b.pixel(4, 4).unwrap().to_le_bytes();
        assert_eq!(px, [10, 20, 30, 255]);
    }

    #[test]
    fn test_translucent_brush_blends() {
        let mut b = OverlayBitmap::new(8, 8);
        let brush = Brush::new(2.0, [255, 0, 0, 128]);
        b.stamp(Vec2::new(4.0, 4.0), &brush);
        let first = b.pixel(4, 4).unwrap().to_le_bytes();
        assert!(first[0] > 0 && first[0] < 255, "partial coverage: {first:?}");

        b.stamp(Vec2::new(4.0, 4.0), &brush);
        let second = b.pixel(4, 4).unwrap().to_le_bytes();
        assert!(second[0] > first[0], "repeated stamps accumulate");
    }

    #[test]
    fn test_clear_resets_to_blank() {
        let mut b = OverlayBitmap::new(8, 8);
        b.stamp(Vec2::new(4.0, 4.0), &red());
        assert!(!b.is_blank());
        b.clear();
        assert!(b.is_blank());
    }

    #[test]
    fn test_png_encoding_produces_png_magic() {
        let mut b = OverlayBitmap::new(16, 16);
        b.stamp(Vec2::new(8.0, 8.0), &red());
        let png = b.encode_png().unwrap();
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
    }
}
