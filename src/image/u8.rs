/// Borrowed 8-bit grayscale view with an explicit row stride.
///
/// Used to address a window inside a larger working buffer without copying.
#[derive(Clone, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// Sub-view of size `w × h` whose top-left corner sits at `(x, y)`.
    ///
    /// Panics when the rectangle leaves the parent view.
    pub fn sub_view(&self, x: usize, y: usize, w: usize, h: usize) -> ImageU8<'a> {
        assert!(
            x + w <= self.w && y + h <= self.h,
            "sub-view {w}x{h}@({x},{y}) exceeds {}x{} image",
            self.w,
            self.h
        );
        let start = y * self.stride + x;
        let end = if h == 0 {
            start
        } else {
            (y + h - 1) * self.stride + x + w
        };
        ImageU8 {
            w,
            h,
            stride: self.stride,
            data: &self.data[start..end],
        }
    }
}

impl<'a> crate::image::traits::ImageView for ImageU8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        (self.stride == self.w).then_some(&self.data[..self.w * self.h])
    }
}
