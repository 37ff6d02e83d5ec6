//! Screenshot preview.

use image::{Rgb, RgbImage};
use visage_save::{Flavor, SaveFile, Screenshot};

/// Height of the Fallout 4 screenshot that is shown at half size.
pub const FALLOUT4_FULL_HEIGHT: u32 = 384;

/// RGB preview of a save's screenshot.
///
/// The fourth byte of 4-byte pixels is dropped. Fallout 4 screenshots 384
/// pixels high are box-filtered down to half size.
pub fn preview_image(save: &SaveFile) -> RgbImage {
    let rgb = to_rgb(save.screenshot());
    if save.flavor() == Flavor::Fallout4 && rgb.height() == FALLOUT4_FULL_HEIGHT {
        downsample_half(&rgb)
    } else {
        rgb
    }
}

fn to_rgb(shot: &Screenshot) -> RgbImage {
    let bpp = shot.bytes_per_pixel();
    let pixels = shot.pixels();
    let width = shot.width();

    RgbImage::from_fn(width, shot.height(), |x, y| {
        let at = (y as usize * width as usize + x as usize) * bpp;
        match pixels.get(at..at + 3) {
            Some(&[r, g, b]) => Rgb([r, g, b]),
            _ => Rgb([0, 0, 0]),
        }
    })
}

/// Average each 2×2 block into one pixel, truncating.
fn downsample_half(image: &RgbImage) -> RgbImage {
    RgbImage::from_fn(image.width() / 2, image.height() / 2, |x, y| {
        let mut sum = [0u32; 3];
        for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let Rgb(px) = *image.get_pixel(x * 2 + dx, y * 2 + dy);
            for (total, channel) in sum.iter_mut().zip(px) {
                *total += u32::from(channel);
            }
        }
        Rgb(sum.map(|total| (total / 4) as u8))
    })
}
