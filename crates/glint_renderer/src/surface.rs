//! Pixel targets the renderer writes into.

use std::io::Write;

/// A fixed-size buffer of packed `0x00RRGGBB` pixels with a present step.
///
/// The renderer fills the buffer row-major and calls [`Surface::present`]
/// once the frame is complete. It never reads pixels back except to
/// replace edge pixels with their supersampled colour.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Row-major pixels, `width * height` long.
    fn pixels_mut(&mut self) -> &mut [u32];
    /// Publish the finished frame.
    fn present(&mut self) -> std::io::Result<()>;
}

/// Split a packed pixel into its 8-bit channels.
#[inline]
pub fn unpack_rgb(pixel: u32) -> [u8; 3] {
    [(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8]
}

/// In-memory surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    presented: u32,
}

impl FrameBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
            presented: 0,
        }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Get the packed pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Get the 8-bit channels at (x, y).
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        unpack_rgb(self.get(x, y))
    }

    /// Number of completed frames.
    pub fn presented(&self) -> u32 {
        self.presented
    }

    /// Convert to tightly packed RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&p| unpack_rgb(p)).collect()
    }

    /// Write the buffer as a plain-text PPM.
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;
        for &pixel in &self.pixels {
            let [r, g, b] = unpack_rgb(pixel);
            writeln!(writer, "{} {} {}", r, g, b)?;
        }
        writer.flush()
    }
}

impl Surface for FrameBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    fn present(&mut self) -> std::io::Result<()> {
        self.presented += 1;
        Ok(())
    }
}
