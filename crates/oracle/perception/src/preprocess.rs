//! Letterboxing of input images onto the model canvas.

use image::{
    imageops::{self, FilterType},
    Rgb, RgbImage,
};

use crate::{
    errors::{PerceptionError, PerceptionResult},
    tensor::Tensor,
};

pub const DEFAULT_CANVAS_SIZE: u32 = 640;
pub const DEFAULT_PADDING_COLOR: [u8; 3] = [114, 114, 114];

pub fn decode_image(bytes: &[u8]) -> PerceptionResult<RgbImage> {
    let img =
        image::load_from_memory(bytes).map_err(|e| PerceptionError::InvalidImage(e.to_string()))?;
    Ok(img.to_rgb8())
}

/// Offset that centers `inner` pixels on a `canvas`-pixel axis. Odd slack
/// goes to the far side.
pub fn padding_offset(canvas: u32, inner: u32) -> u32 {
    canvas.saturating_sub(inner) / 2
}

/// Scales `img` to fit a `canvas`×`canvas` square keeping its aspect ratio
/// and centers it on a `fill`-colored background.
pub fn resize_and_pad(img: &RgbImage, canvas: u32, fill: [u8; 3]) -> PerceptionResult<RgbImage> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(PerceptionError::InvalidImage(format!(
            "image has no pixels ({width}x{height})"
        )));
    }

    let ratio = f64::min(
        canvas as f64 / width as f64,
        canvas as f64 / height as f64,
    );
    let new_width = ((width as f64 * ratio).round() as u32).clamp(1, canvas);
    let new_height = ((height as f64 * ratio).round() as u32).clamp(1, canvas);

    let resized = imageops::resize(img, new_width, new_height, FilterType::Triangle);
    let mut padded = RgbImage::from_pixel(canvas, canvas, Rgb(fill));
    imageops::replace(
        &mut padded,
        &resized,
        padding_offset(canvas, new_width) as i64,
        padding_offset(canvas, new_height) as i64,
    );
    Ok(padded)
}

/// Scales pixels to `[0, 1]` in an NHWC `[1, H, W, 3]` tensor.
pub fn to_input_tensor(img: &RgbImage) -> PerceptionResult<Tensor> {
    let (width, height) = img.dimensions();
    let data = img.as_raw().iter().map(|&v| v as f32 / 255.0).collect();
    Tensor::new(vec![1, height as usize, width as usize, 3], data)
}
