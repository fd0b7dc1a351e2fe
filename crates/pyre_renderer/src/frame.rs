//! Output image buffer and file writers.

use crate::{RenderError, RenderResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// An 8-bit RGB pixel.
pub type Rgb = [u8; 3];

/// Final image: row-major RGB bytes, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Get the pixel at (x, y), y counted from the top.
    pub fn get(&self, x: u32, y: u32) -> Rgb {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y), y counted from the top.
    pub fn set(&mut self, x: u32, y: u32, color: Rgb) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Copy whole rows starting at row `y`.
    ///
    /// # Panics
    /// If `rows` is not a whole number of rows or runs past the image.
    pub fn write_rows(&mut self, y: u32, rows: &[Rgb]) {
        assert_eq!(rows.len() % self.width as usize, 0, "partial row");
        let start = self.index(0, y);
        self.pixels[start..start + rows.len()].copy_from_slice(rows);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Write the image as plain-text PPM (P3).
    pub fn write_ppm<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for [r, g, b] in &self.pixels {
            writeln!(writer, "{} {} {}", r, g, b)?;
        }

        Ok(())
    }

    /// Save the image, choosing the format from the file extension.
    ///
    /// `.ppm` writes plain-text PPM, `.png` goes through the `image` crate.
    pub fn save(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "ppm" => {
                let mut writer = BufWriter::new(File::create(path)?);
                self.write_ppm(&mut writer)?;
                writer.flush()?;
            }
            "png" => {
                let bytes: Vec<u8> = self.pixels.iter().flatten().copied().collect();
                image::save_buffer(path, &bytes, self.width, self.height, image::ColorType::Rgb8)?;
            }
            _ => return Err(RenderError::UnsupportedFormat(path.display().to_string())),
        }

        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}
