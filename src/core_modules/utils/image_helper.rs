use crate::core_modules::frame::PixelBuffer;
use image::ImageEncoder;
use std::path::Path;

/// Decodes any supported image file into an RGBA frame.
pub fn load_rgba(path: impl AsRef<Path>) -> Result<PixelBuffer, image::error::ImageError> {
    let decoded = image::open(path)?.to_rgba8();
    let (width, height) = decoded.dimensions();
    // An RgbaImage is 4 bytes per pixel by construction, so this cannot
    // fail validation.
    Ok(PixelBuffer::new(decoded.into_raw(), width, height)
        .expect("decoded RGBA image has a consistent buffer length"))
}

/// Encodes an RGBA frame as a PNG file.
pub fn save(
    path: impl AsRef<Path>,
    frame: &PixelBuffer,
) -> Result<(), image::error::ImageError> {
    let output = std::fs::File::create(path)?;
    let encoder = image::codecs::png::PngEncoder::new(output);

    encoder.write_image(
        frame.as_bytes(),
        frame.width(),
        frame.height(),
        image::ExtendedColorType::Rgba8,
    )?;

    Ok(())
}
