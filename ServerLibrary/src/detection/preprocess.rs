use image::RgbImage;
use image::imageops::FilterType;
use ndarray::{Array3, Array4, Axis};

/// Inverse-mapping parameters of the letterbox transform, needed to project
/// model-space coordinates back onto the original picture.
#[derive(Debug, Clone, Copy)]
pub struct LetterboxParams {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub original_width: u32,
    pub original_height: u32,
}

/// Letterbox the picture onto a square gray canvas of the inference size and
/// emit the NCHW float tensor the model expects.
pub fn letterbox(image: &RgbImage, inference_size: u32) -> (Array4<f32>, LetterboxParams) {
    let original_width = image.width();
    let original_height = image.height();
    let scale = (inference_size as f32 / original_width.max(1) as f32)
        .min(inference_size as f32 / original_height.max(1) as f32);
    let new_width = ((original_width as f32 * scale).round() as u32).clamp(1, inference_size);
    let new_height = ((original_height as f32 * scale).round() as u32).clamp(1, inference_size);
    let resized = image::imageops::resize(image, new_width, new_height, FilterType::Triangle);
    let pad_x = (inference_size - new_width) as f32 / 2.0;
    let pad_y = (inference_size - new_height) as f32 / 2.0;

    let mut canvas = Array3::<f32>::from_elem(
        (3, inference_size as usize, inference_size as usize),
        114.0 / 255.0,
    );
    let offset_x = pad_x.floor() as usize;
    let offset_y = pad_y.floor() as usize;
    for (x, y, pixel) in resized.enumerate_pixels() {
        let column = offset_x + x as usize;
        let row = offset_y + y as usize;
        canvas[[0, row, column]] = pixel[0] as f32 / 255.0;
        canvas[[1, row, column]] = pixel[1] as f32 / 255.0;
        canvas[[2, row, column]] = pixel[2] as f32 / 255.0;
    }

    let tensor = canvas.insert_axis(Axis(0));
    let params = LetterboxParams {
        scale,
        pad_x,
        pad_y,
        original_width,
        original_height,
    };
    (tensor, params)
}
