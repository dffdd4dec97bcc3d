use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use crate::utils::logging::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

/// Rendered pixel buffer with an explicit channel order. The annotator emits
/// BGR frames; the web layer only accepts RGB, so the normalizer swaps the
/// channels once before returning.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub order: ChannelOrder,
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn from_image(image: RgbImage, order: ChannelOrder) -> Self {
        let width = image.width();
        let height = image.height();
        let mut pixels = image.into_raw();
        if order == ChannelOrder::Bgr {
            Self::swap_channels(&mut pixels);
        }
        Self {
            width,
            height,
            order,
            pixels,
        }
    }

    pub fn into_rgb(mut self) -> Frame {
        if self.order == ChannelOrder::Bgr {
            Self::swap_channels(&mut self.pixels);
            self.order = ChannelOrder::Rgb;
        }
        self
    }

    pub fn to_png(&self) -> Result<Vec<u8>, LogEntry> {
        let frame = match self.order {
            ChannelOrder::Rgb => self.clone(),
            ChannelOrder::Bgr => self.clone().into_rgb(),
        };
        let image = RgbImage::from_raw(frame.width, frame.height, frame.pixels)
            .ok_or(error_entry!("Frame buffer does not match its dimensions"))?;
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png)
            .map_err(|err| error_entry!(IOEntry::EncodeImageError(err)))?;
        Ok(bytes.into_inner())
    }

    fn swap_channels(pixels: &mut [u8]) {
        for pixel in pixels.chunks_exact_mut(3) {
            pixel.swap(0, 2);
        }
    }
}
