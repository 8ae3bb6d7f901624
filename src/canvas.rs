//! The source raster: loaded once, normalized to 3 or 4 channels, and read-only
//! for the rest of the session. Crops for export always come from this canvas,
//! never from a rendered preview frame.

use crate::tiling::CellBounds;
use crate::SplitError;
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, trace};

/// An immutable raster with validated, non-zero dimensions.
///
/// Construction normalizes the pixel format: sources with an alpha channel
/// become `Rgba8`, everything else becomes `Rgb8`, so the canvas always
/// carries exactly 3 or 4 channels.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: DynamicImage,
}

impl Canvas {
    /// Wraps a decoded image, validating its dimensions.
    ///
    /// # Example
    /// ```
    /// use gridsplit::Canvas;
    /// use image::DynamicImage;
    ///
    /// let canvas = Canvas::new(DynamicImage::new_luma8(10, 10)).unwrap();
    /// assert_eq!(canvas.channels(), 3);
    ///
    /// let canvas = Canvas::new(DynamicImage::new_luma_a8(10, 10)).unwrap();
    /// assert_eq!(canvas.channels(), 4);
    /// ```
    pub fn new(image: DynamicImage) -> Result<Self, SplitError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(SplitError::InvalidDimensions { width, height });
        }
        let image = match image {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image,
            other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };
        Ok(Self { image })
    }

    /// Decodes the image at `path`.
    pub fn open(path: &Path) -> Result<Self, SplitError> {
        debug!(path = %path.display(), "loading image");
        let image = image::open(path).map_err(|source| SplitError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(image)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn channels(&self) -> u8 {
        self.image.color().channel_count()
    }

    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// An RGBA working copy for the preview pipeline.
    pub fn to_rgba(&self) -> RgbaImage {
        self.image.to_rgba8()
    }

    /// Returns a copy of the canvas surrounded by a white border of `border`
    /// pixels on every side, preserving the channel count.
    pub fn pad(&self, border: u32) -> Canvas {
        if border == 0 {
            return self.clone();
        }
        let (width, height) = self.dimensions();
        let image = match &self.image {
            DynamicImage::ImageRgba8(src) => {
                let mut out = RgbaImage::from_pixel(
                    width + 2 * border,
                    height + 2 * border,
                    Rgba([255, 255, 255, 255]),
                );
                imageops::replace(&mut out, src, i64::from(border), i64::from(border));
                DynamicImage::ImageRgba8(out)
            }
            other => {
                let src = other.to_rgb8();
                let mut out = RgbImage::from_pixel(
                    width + 2 * border,
                    height + 2 * border,
                    Rgb([255, 255, 255]),
                );
                imageops::replace(&mut out, &src, i64::from(border), i64::from(border));
                DynamicImage::ImageRgb8(out)
            }
        };
        Canvas { image }
    }

    /// The raw sub-image for one cell, cut from the untouched pixels.
    pub fn crop(&self, cell: &CellBounds) -> DynamicImage {
        trace!(
            x1 = cell.x1,
            y1 = cell.y1,
            x2 = cell.x2,
            y2 = cell.y2,
            "cropping region"
        );
        self.image
            .crop_imm(cell.x1, cell.y1, cell.width(), cell.height())
    }
}

/// On-disk encoding for exported regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SaveFormat {
    #[default]
    Png,
    Jpg,
}

impl SaveFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SaveFormat::Png => "png",
            SaveFormat::Jpg => "jpg",
        }
    }

    /// Encodes `image` to `path`. JPEG flattens to RGB (the format has no
    /// alpha) and honors `quality` when given; PNG keeps all channels.
    pub fn save(
        self,
        image: &DynamicImage,
        path: &Path,
        quality: Option<u8>,
    ) -> Result<(), SplitError> {
        let save_err = |source| SplitError::Save {
            path: path.to_path_buf(),
            source,
        };
        match self {
            SaveFormat::Png => image
                .save_with_format(path, ImageFormat::Png)
                .map_err(save_err),
            SaveFormat::Jpg => {
                let rgb = image.to_rgb8();
                match quality {
                    Some(quality) => {
                        let file = File::create(path)
                            .map_err(|e| save_err(image::ImageError::IoError(e)))?;
                        let mut encoder =
                            JpegEncoder::new_with_quality(BufWriter::new(file), quality);
                        encoder.encode_image(&rgb).map_err(save_err)
                    }
                    None => rgb
                        .save_with_format(path, ImageFormat::Jpeg)
                        .map_err(save_err),
                }
            }
        }
    }
}
