use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Green-cyan backdrop inside the default background range (hsv 82/255/200)
pub const BACKDROP: Rgb<u8> = Rgb([0, 200, 150]);
/// Rust tone inside the red range (hsv 9/217/200)
pub const RUST: Rgb<u8> = Rgb([200, 80, 30]);
/// Dark deposit inside the black range (v = 20)
pub const DARK: Rgb<u8> = Rgb([20, 20, 20]);
/// Pale oxide inside the white range (s = 0, v = 230)
pub const PALE: Rgb<u8> = Rgb([230, 230, 230]);
/// Clean metal: matches no corrosion class and is not backdrop
pub const STEEL: Rgb<u8> = Rgb([120, 120, 120]);

/// Image filled entirely with the backdrop colour
pub fn backdrop(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, BACKDROP)
}

pub fn fill_rect(img: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    for py in y..y + height {
        for px in x..x + width {
            img.put_pixel(px, py, color);
        }
    }
}

pub fn fill_disk(img: &mut RgbImage, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = x as i64 - cx;
        let dy = y as i64 - cy;
        if dx * dx + dy * dy <= radius * radius {
            *pixel = color;
        }
    }
}

/// Steel plate with one patch of each corrosion class.
///
/// 40x40 object: 100 rust, 100 dark and 200 pale pixels.
pub fn corroded_plate() -> RgbImage {
    let mut img = backdrop(80, 80);
    fill_rect(&mut img, 20, 20, 40, 40, STEEL);
    fill_rect(&mut img, 25, 25, 10, 10, RUST);
    fill_rect(&mut img, 45, 25, 10, 10, DARK);
    fill_rect(&mut img, 25, 45, 20, 10, PALE);
    img
}

pub fn encode_png(img: &RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode test image");
    bytes
}

/// Writes `img` as a PNG temp file that is removed when dropped
pub fn write_temp_png(img: &RgbImage) -> tempfile::NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), ImageFormat::Png)
        .expect("Failed to save test image");
    file
}
