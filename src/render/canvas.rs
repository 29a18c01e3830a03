/// An RGB color with components in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    fn to_bytes(self) -> [u8; 3] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0) as u8,
            (self.g.clamp(0.0, 1.0) * 255.0) as u8,
            (self.b.clamp(0.0, 1.0) * 255.0) as u8,
        ]
    }
}

/// A software raster surface. Drawing coordinates are in pixels with the
/// origin at the bottom-left and y growing upward; the backing buffer is
/// stored top-down, row-major RGB, as image consumers expect.
#[derive(Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        };
        canvas.clear(Color::WHITE);
        canvas
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The backing buffer: top-down, row-major RGB.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for pixel in self.data.chunks_exact_mut(3) {
            pixel.copy_from_slice(&bytes);
        }
    }

    /// Reads a pixel at bottom-left-origin coordinates.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let row = (self.height - 1 - y) as usize;
        let idx = (row * self.width as usize + x as usize) * 3;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    fn set_pixel(&mut self, x: i64, y: i64, bytes: [u8; 3]) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let row = (i64::from(self.height) - 1 - y) as usize;
        let idx = (row * self.width as usize + x as usize) * 3;
        self.data[idx..idx + 3].copy_from_slice(&bytes);
    }

    /// Fills a simple polygon by scanline. Vertices are in drawing order;
    /// the closing edge back to the first vertex is implicit.
    pub fn fill_polygon(&mut self, vertices: &[(f32, f32)], color: Color) {
        if vertices.len() < 3 {
            return;
        }
        let bytes = color.to_bytes();
        let min_y = vertices.iter().map(|v| v.1).fold(f32::INFINITY, f32::min);
        let max_y = vertices
            .iter()
            .map(|v| v.1)
            .fold(f32::NEG_INFINITY, f32::max);
        let y_lo = min_y.floor() as i64;
        let y_hi = max_y.ceil() as i64;

        let mut crossings: Vec<f32> = Vec::with_capacity(vertices.len());
        for y in y_lo..y_hi {
            let scan = y as f32 + 0.5;
            crossings.clear();
            for i in 0..vertices.len() {
                let (x0, y0) = vertices[i];
                let (x1, y1) = vertices[(i + 1) % vertices.len()];
                if (y0 <= scan) != (y1 <= scan) {
                    crossings.push(x0 + (scan - y0) * (x1 - x0) / (y1 - y0));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for pair in crossings.chunks_exact(2) {
                let x_start = pair[0].round() as i64;
                let x_end = pair[1].round() as i64;
                for x in x_start..x_end {
                    self.set_pixel(x, y, bytes);
                }
            }
        }
    }

    /// Draws a one-pixel-wide line segment.
    pub fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color) {
        let bytes = color.to_bytes();
        let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
        let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_pixel(x0, y0, bytes);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}
