use crate::Vec3;

/// Row-major RGB image, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Film {
    width: usize,
    height: usize,
    pixels: Vec<Vec3>,
}

impl Film {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::zeros(); width * height],
        }
    }

    /// Assembles a film from complete rows.
    ///
    /// # Panics
    /// If any row is not `width` long.
    pub fn from_rows(width: usize, rows: Vec<Vec<Vec3>>) -> Self {
        let height = rows.len();
        let mut pixels = Vec::with_capacity(width * height);
        for row in rows {
            assert_eq!(row.len(), width, "film row has the wrong length");
            pixels.extend(row);
        }
        Self { width, height, pixels }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get(&self, x: usize, y: usize) -> Vec3 {
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, v: Vec3) {
        self.pixels[y * self.width + x] = v;
    }

    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, Vec3> {
        self.pixels.chunks_exact(self.width.max(1))
    }

    pub fn mean(&self) -> Vec3 {
        let total: Vec3 = self.pixels.iter().copied().sum();
        total / self.pixels.len().max(1) as f64
    }
}
