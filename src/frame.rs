//! Frame handles the selector can hand back.
//!
//! The engine never looks at pixels. It only needs to clone frames and, when
//! it passes an untouched original through next to processed candidates,
//! bring it to the same pixel format. [`VideoFrame`] captures exactly that.

use std::fmt::Debug;

use image::{ColorType, DynamicImage};

/// A frame the candidate selector can return.
pub trait VideoFrame: Clone {
    /// Pixel format descriptor.
    type Format: Clone + PartialEq + Debug;

    /// The frame's current pixel format.
    fn format(&self) -> Self::Format;

    /// A copy of the frame in `format`.
    fn convert_to(&self, format: &Self::Format) -> Self;

    /// `self` in the format of `reference`, cloned as-is when they already
    /// match.
    fn normalized_to(&self, reference: &Self) -> Self {
        let target = reference.format();
        if self.format() == target {
            self.clone()
        } else {
            self.convert_to(&target)
        }
    }
}

impl VideoFrame for DynamicImage {
    type Format = ColorType;

    fn format(&self) -> ColorType {
        self.color()
    }

    fn convert_to(&self, format: &ColorType) -> Self {
        match format {
            ColorType::L8 => DynamicImage::ImageLuma8(self.to_luma8()),
            ColorType::La8 => DynamicImage::ImageLumaA8(self.to_luma_alpha8()),
            ColorType::Rgb8 => DynamicImage::ImageRgb8(self.to_rgb8()),
            ColorType::Rgba8 => DynamicImage::ImageRgba8(self.to_rgba8()),
            ColorType::L16 => DynamicImage::ImageLuma16(self.to_luma16()),
            ColorType::La16 => DynamicImage::ImageLumaA16(self.to_luma_alpha16()),
            ColorType::Rgb16 => DynamicImage::ImageRgb16(self.to_rgb16()),
            ColorType::Rgba16 => DynamicImage::ImageRgba16(self.to_rgba16()),
            ColorType::Rgb32F => DynamicImage::ImageRgb32F(self.to_rgb32f()),
            ColorType::Rgba32F => DynamicImage::ImageRgba32F(self.to_rgba32f()),
            _ => self.clone(),
        }
    }
}

/// Plain source-frame indices, used for frame maps. They have no pixel
/// format, so normalization is a copy.
impl VideoFrame for usize {
    type Format = ();

    fn format(&self) -> Self::Format {}

    fn convert_to(&self, _format: &()) -> Self {
        *self
    }
}
