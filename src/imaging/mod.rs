//! Image access for the probe
//!
//! `ProbeImage` is what the probe needs from the viewer's image object.
//! `ViewerImage` implements it on top of `image` crate buffers for hosts that
//! decode pixel data themselves, and for tests.

pub mod suv;

use image::{DynamicImage, ImageBuffer, Luma, RgbImage};

use crate::domain::Rect;
use crate::error::{ProbeError, Result};

pub use suv::{DicomTime, PetCalibration, calculate_suv};

/// Linear modality rescale: `modality = stored * slope + intercept`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rescale {
    pub slope: f64,
    pub intercept: f64,
}

impl Default for Rescale {
    fn default() -> Self {
        Self {
            slope: 1.0,
            intercept: 0.0,
        }
    }
}

impl Rescale {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    pub fn apply(&self, stored: f64) -> f64 {
        stored * self.slope + self.intercept
    }
}

/// Image object as seen by the probe
pub trait ProbeImage {
    fn columns(&self) -> u32;
    fn rows(&self) -> u32;
    fn is_color(&self) -> bool;
    fn rescale(&self) -> Rescale;

    /// DICOM modality code, e.g. `CT` or `PT`
    fn modality(&self) -> Option<&str> {
        None
    }

    fn pet_calibration(&self) -> Option<&PetCalibration> {
        None
    }

    /// Stored values of a block, row-major, clipped to the image
    fn stored_pixels(&self, x: u32, y: u32, width: u32, height: u32) -> Vec<f64>;

    /// RGB values of a block, row-major, clipped to the image
    fn rgb_pixels(&self, x: u32, y: u32, width: u32, height: u32) -> Vec<[u8; 3]>;

    fn bounds(&self) -> Rect {
        Rect::from_size(self.columns(), self.rows())
    }
}

/// Decoded pixel buffer
#[derive(Clone, Debug)]
pub enum PixelData {
    Unsigned(ImageBuffer<Luma<u16>, Vec<u16>>),
    Signed(ImageBuffer<Luma<i16>, Vec<i16>>),
    Rgb(RgbImage),
}

/// In-memory image with calibration metadata
#[derive(Clone, Debug)]
pub struct ViewerImage {
    pixels: PixelData,
    rescale: Rescale,
    modality: Option<String>,
    pet: Option<PetCalibration>,
}

fn check_len(columns: u32, rows: u32, got: usize, channels: usize) -> Result<()> {
    let need = columns as usize * rows as usize * channels;
    if got != need {
        return Err(ProbeError::BufferSizeMismatch {
            columns,
            rows,
            got,
            need,
        });
    }
    Ok(())
}

impl ViewerImage {
    pub fn new(pixels: PixelData) -> Self {
        Self {
            pixels,
            rescale: Rescale::default(),
            modality: None,
            pet: None,
        }
    }

    /// Unsigned 16-bit grayscale from row-major samples
    pub fn grayscale_u16(columns: u32, rows: u32, data: Vec<u16>) -> Result<Self> {
        check_len(columns, rows, data.len(), 1)?;
        let buffer = ImageBuffer::from_raw(columns, rows, data)
            .ok_or_else(|| ProbeError::UnsupportedPixelFormat("grayscale u16".into()))?;
        Ok(Self::new(PixelData::Unsigned(buffer)))
    }

    /// Signed 16-bit grayscale from row-major samples
    pub fn grayscale_i16(columns: u32, rows: u32, data: Vec<i16>) -> Result<Self> {
        check_len(columns, rows, data.len(), 1)?;
        let buffer = ImageBuffer::from_raw(columns, rows, data)
            .ok_or_else(|| ProbeError::UnsupportedPixelFormat("grayscale i16".into()))?;
        Ok(Self::new(PixelData::Signed(buffer)))
    }

    /// 8-bit RGB from interleaved row-major samples
    pub fn rgb(columns: u32, rows: u32, data: Vec<u8>) -> Result<Self> {
        check_len(columns, rows, data.len(), 3)?;
        let buffer = RgbImage::from_raw(columns, rows, data)
            .ok_or_else(|| ProbeError::UnsupportedPixelFormat("rgb8".into()))?;
        Ok(Self::new(PixelData::Rgb(buffer)))
    }

    /// Wrap a decoded image. Gray values are kept as stored, alpha is dropped.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        let pixels = match image {
            DynamicImage::ImageLuma16(buffer) => PixelData::Unsigned(buffer),
            DynamicImage::ImageLuma8(buffer) => PixelData::Unsigned(ImageBuffer::from_fn(
                buffer.width(),
                buffer.height(),
                |x, y| Luma([buffer.get_pixel(x, y).0[0] as u16]),
            )),
            DynamicImage::ImageLumaA16(buffer) => PixelData::Unsigned(ImageBuffer::from_fn(
                buffer.width(),
                buffer.height(),
                |x, y| Luma([buffer.get_pixel(x, y).0[0]]),
            )),
            DynamicImage::ImageLumaA8(buffer) => PixelData::Unsigned(ImageBuffer::from_fn(
                buffer.width(),
                buffer.height(),
                |x, y| Luma([buffer.get_pixel(x, y).0[0] as u16]),
            )),
            DynamicImage::ImageRgb8(buffer) => PixelData::Rgb(buffer),
            image @ DynamicImage::ImageRgba8(_) => PixelData::Rgb(image.to_rgb8()),
            other => {
                return Err(ProbeError::UnsupportedPixelFormat(format!(
                    "{:?}",
                    other.color()
                )));
            }
        };
        Ok(Self::new(pixels))
    }

    pub fn with_rescale(mut self, slope: f64, intercept: f64) -> Self {
        self.rescale = Rescale::new(slope, intercept);
        self
    }

    pub fn with_modality(mut self, modality: impl Into<String>) -> Self {
        self.modality = Some(modality.into());
        self
    }

    pub fn with_pet_calibration(mut self, calibration: PetCalibration) -> Self {
        self.pet = Some(calibration);
        self
    }

    pub fn pixels(&self) -> &PixelData {
        &self.pixels
    }

    fn dimensions(&self) -> (u32, u32) {
        match &self.pixels {
            PixelData::Unsigned(buffer) => buffer.dimensions(),
            PixelData::Signed(buffer) => buffer.dimensions(),
            PixelData::Rgb(buffer) => buffer.dimensions(),
        }
    }

    /// Pixel coordinates of a block after clipping to the image
    fn block(&self, x: u32, y: u32, width: u32, height: u32) -> Vec<(u32, u32)> {
        let requested = Rect::new(
            x as i64,
            y as i64,
            x as i64 + width as i64,
            y as i64 + height as i64,
        );
        let Some(clipped) = self.bounds().intersect(requested) else {
            return Vec::new();
        };
        (clipped.top..clipped.bottom)
            .flat_map(|row| (clipped.left..clipped.right).map(move |col| (col as u32, row as u32)))
            .collect()
    }
}

impl ProbeImage for ViewerImage {
    fn columns(&self) -> u32 {
        self.dimensions().0
    }

    fn rows(&self) -> u32 {
        self.dimensions().1
    }

    fn is_color(&self) -> bool {
        matches!(self.pixels, PixelData::Rgb(_))
    }

    fn rescale(&self) -> Rescale {
        self.rescale
    }

    fn modality(&self) -> Option<&str> {
        self.modality.as_deref()
    }

    fn pet_calibration(&self) -> Option<&PetCalibration> {
        self.pet.as_ref()
    }

    fn stored_pixels(&self, x: u32, y: u32, width: u32, height: u32) -> Vec<f64> {
        let block = self.block(x, y, width, height);
        match &self.pixels {
            PixelData::Unsigned(buffer) => block
                .into_iter()
                .map(|(col, row)| buffer.get_pixel(col, row).0[0] as f64)
                .collect(),
            PixelData::Signed(buffer) => block
                .into_iter()
                .map(|(col, row)| buffer.get_pixel(col, row).0[0] as f64)
                .collect(),
            // Luma-weighted like the viewer's own grayscale conversion
            PixelData::Rgb(buffer) => block
                .into_iter()
                .map(|(col, row)| {
                    let [r, g, b] = buffer.get_pixel(col, row).0;
                    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
                })
                .collect(),
        }
    }

    fn rgb_pixels(&self, x: u32, y: u32, width: u32, height: u32) -> Vec<[u8; 3]> {
        let PixelData::Rgb(buffer) = &self.pixels else {
            log::warn!("RGB pixels requested from a grayscale image");
            return Vec::new();
        };
        self.block(x, y, width, height)
            .into_iter()
            .map(|(col, row)| buffer.get_pixel(col, row).0)
            .collect()
    }
}
