//! File-backed surface: the frame is written to disk when presented.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use glint_renderer::{FrameBuffer, Surface};
use image::RgbImage;

/// Output encodings, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Png,
    Ppm,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ppm") => Format::Ppm,
            _ => Format::Png,
        }
    }
}

/// A [`FrameBuffer`] that saves itself on [`Surface::present`].
pub struct ImageSurface {
    frame: FrameBuffer,
    path: PathBuf,
    format: Format,
}

impl ImageSurface {
    pub fn new(width: u32, height: u32, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            frame: FrameBuffer::new(width, height),
            format: Format::from_path(&path),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_png(&self) -> io::Result<()> {
        let image = RgbImage::from_raw(self.frame.width(), self.frame.height(), self.frame.to_rgb8())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "frame size mismatch"))?;
        image
            .save(&self.path)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

impl Surface for ImageSurface {
    fn width(&self) -> u32 {
        self.frame.width()
    }

    fn height(&self) -> u32 {
        self.frame.height()
    }

    fn pixels_mut(&mut self) -> &mut [u32] {
        self.frame.pixels_mut()
    }

    fn present(&mut self) -> io::Result<()> {
        match self.format {
            Format::Png => self.save_png()?,
            Format::Ppm => self.frame.write_ppm(BufWriter::new(File::create(&self.path)?))?,
        }
        self.frame.present()?;
        log::info!("Image saved as {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("out.ppm")), Format::Ppm);
        assert_eq!(Format::from_path(Path::new("out.PPM")), Format::Ppm);
        assert_eq!(Format::from_path(Path::new("out.png")), Format::Png);
        assert_eq!(Format::from_path(Path::new("out")), Format::Png);
    }

    #[test]
    fn test_present_writes_file() {
        let dir = std::env::temp_dir().join(format!("glint_output_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        for name in ["frame.png", "frame.ppm"] {
            let path = dir.join(name);
            let mut surface = ImageSurface::new(4, 3, &path);
            surface.pixels_mut()[0] = 0x00FF0000;
            surface.present().unwrap();
            assert!(path.exists());
        }

        let png = image::open(dir.join("frame.png")).unwrap().to_rgb8();
        assert_eq!(png.dimensions(), (4, 3));
        assert_eq!(png.get_pixel(0, 0).0, [255, 0, 0]);

        std::fs::remove_dir_all(&dir).ok();
    }
}
