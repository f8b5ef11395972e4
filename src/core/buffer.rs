/// A decoded grayscale raster: one byte per sample, row-major.
///
/// `samples.len() == width * height` always holds; both constructors enforce
/// it, so a `PixelBuffer` in hand is never partially populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    max_value: u16,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap an existing sample vector.
    ///
    /// Panics if `samples.len() != width * height`; callers construct the
    /// vector from the same dimensions they pass here.
    pub fn new(width: u32, height: u32, max_value: u16, samples: Vec<u8>) -> Self {
        assert_eq!(
            samples.len(),
            width as usize * height as usize,
            "sample vector does not match {}x{} dimensions",
            width,
            height
        );
        Self { width, height, max_value, samples }
    }

    /// Allocate an all-zero buffer of the given shape.
    pub fn zeroed(width: u32, height: u32, max_value: u16) -> Self {
        let samples = vec![0u8; width as usize * height as usize];
        Self { width, height, max_value, samples }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    /// One image row as a slice. Panics if `r >= height`.
    pub fn row(&self, r: u32) -> &[u8] {
        let w = self.width as usize;
        let base = r as usize * w;
        &self.samples[base..base + w]
    }
}
