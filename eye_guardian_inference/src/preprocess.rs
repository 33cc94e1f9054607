use crate::InferenceError;
use image::{imageops::FilterType, DynamicImage, ImageError, ImageFormat, RgbImage};
use ndarray::Array4;
use std::io::Cursor;

/// Side length the classifier was trained on.
pub const INPUT_SIZE: u32 = 100;
pub const CHANNELS: usize = 3;

pub fn decode_image(image_data: &[u8]) -> Result<DynamicImage, InferenceError> {
    let image_reader = image::ImageReader::new(Cursor::new(image_data))
        .with_guessed_format()
        .map_err(ImageError::IoError)?;

    Ok(image_reader.decode()?)
}

/// Scales to cover `INPUT_SIZE` x `INPUT_SIZE` keeping the aspect ratio, then
/// crops the centre and drops any alpha channel.
pub fn fit_image(img: &DynamicImage) -> RgbImage {
    img.resize_to_fill(INPUT_SIZE, INPUT_SIZE, FilterType::Lanczos3)
        .to_rgb8()
}

/// NHWC tensor of shape `(1, height, width, 3)` with values in `[0, 1]`.
pub fn to_input_tensor(img: &RgbImage) -> Array4<f32> {
    let (width, height) = img.dimensions();
    Array4::from_shape_fn(
        (1, height as usize, width as usize, CHANNELS),
        |(_, y, x, c)| f32::from(img.get_pixel(x as u32, y as u32)[c]) / 255.,
    )
}

pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>, InferenceError> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| InferenceError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}
