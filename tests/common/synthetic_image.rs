use cascade_trainer::image::GrayImageU8;
use cascade_trainer::WindowSize;

/// Bright, slightly textured window-sized positives (values 200..=215).
pub fn bright_positives(count: usize, window: WindowSize) -> Vec<GrayImageU8> {
    (0..count)
        .map(|i| {
            GrayImageU8::from_fn(window.width, window.height, |x, y| {
                200 + ((x + 2 * y + i) % 16) as u8
            })
        })
        .collect()
}

/// Dark diagonal ramp whose values never exceed 149.
pub fn dark_background(width: usize, height: usize, seed: usize) -> GrayImageU8 {
    GrayImageU8::from_fn(width, height, |x, y| ((x + y + seed * 17) % 150) as u8)
}

/// Flat background at intensity `value`.
pub fn flat_background(width: usize, height: usize, value: u8) -> GrayImageU8 {
    GrayImageU8::new(width, height, vec![value; width * height])
}
