use image::DynamicImage;
use std::path::Path;

/// Convert a decoded image into a Slint image
pub fn to_slint_image(img: &DynamicImage) -> slint::Image {
    // Convert to RGBA8 format
    let rgba_img = img.to_rgba8();

    let width = rgba_img.width();
    let height = rgba_img.height();

    // Create Slint image from the pixel buffer (RGBA format)
    let pixel_buffer = slint::SharedPixelBuffer::<slint::Rgba8Pixel>::clone_from_slice(rgba_img.as_raw(), width, height);
    slint::Image::from_rgba8(pixel_buffer)
}

/// Load an image file from disk, auto-detecting its format
pub fn load_slint_image(path: &Path) -> Result<slint::Image, anyhow::Error> {
    let img = image::open(path)?;
    Ok(to_slint_image(&img))
}
