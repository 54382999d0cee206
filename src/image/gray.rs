//! Owned 8-bit grayscale buffer used for pool images, working buffers and
//! training windows.
//!
//! Rescaling goes through `image::imageops::resize` with a bilinear
//! (`Triangle`) kernel; the buffer itself stays a plain row-major `Vec<u8>`.
use super::{ImageU8, ImageView, ImageViewMut};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};

/// Owned 8-bit grayscale buffer in row-major layout (stride == width).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    /// Construct an owned grayscale buffer given raw bytes.
    ///
    /// Panics when `data.len() != width * height`.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            width * height,
            "buffer length does not match {width}x{height}"
        );
        Self {
            width,
            height,
            data,
        }
    }

    /// Zero-filled buffer of size `width × height`.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self::new(width, height, vec![0; width * height])
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::new(width, height, data)
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Borrow as a read-only `ImageU8` view
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.width,
            h: self.height,
            stride: self.width,
            data: &self.data,
        }
    }

    /// Bilinear resize to `width × height`.
    pub fn resized(&self, width: usize, height: usize) -> GrayImageU8 {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let src: ImageBuffer<Luma<u8>, &[u8]> =
            ImageBuffer::from_raw(self.width as u32, self.height as u32, &self.data[..])
                .expect("buffer length checked on construction");
        let out = imageops::resize(&src, width as u32, height as u32, FilterType::Triangle);
        GrayImageU8::new(width, height, out.into_raw())
    }

    /// Copy the `dst`-sized rectangle whose top-left corner is `(x, y)` into
    /// `dst`.
    pub fn copy_region_into(&self, x: usize, y: usize, dst: &mut GrayImageU8) {
        let region = self.as_view().sub_view(x, y, dst.width, dst.height);
        dst.copy_from(&region);
    }
}

impl ImageView for GrayImageU8 {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.width
    }
    #[inline]
    fn height(&self) -> usize {
        self.height
    }
    #[inline]
    fn stride(&self) -> usize {
        self.width
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        Some(&self.data)
    }
}

impl ImageViewMut for GrayImageU8 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.width;
        let end = start + self.width;
        &mut self.data[start..end]
    }
}

impl From<image::GrayImage> for GrayImageU8 {
    fn from(img: image::GrayImage) -> Self {
        let width = img.width() as usize;
        let height = img.height() as usize;
        GrayImageU8::new(width, height, img.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_region_extracts_window() {
        let img = GrayImageU8::from_fn(6, 5, |x, y| (y * 10 + x) as u8);
        let mut dst = GrayImageU8::zeros(2, 3);
        img.copy_region_into(3, 1, &mut dst);
        assert_eq!(dst.data(), &[13, 14, 23, 24, 33, 34]);
    }

    #[test]
    fn resize_produces_requested_dimensions() {
        let img = GrayImageU8::from_fn(100, 60, |x, _| (x * 2) as u8);
        let small = img.resized(33, 20);
        assert_eq!((small.width(), small.height()), (33, 20));
        assert_eq!(small.data().len(), 33 * 20);
    }

    #[test]
    fn resize_keeps_flat_images_flat() {
        let img = GrayImageU8::new(40, 40, vec![77; 1600]);
        let out = img.resized(17, 23);
        assert!(out.data().iter().all(|&v| v == 77));
    }
}
