/// Read-only access to a row-major single-channel image.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn stride(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }

    fn is_contiguous(&self) -> bool {
        self.stride() == self.width()
    }

    fn as_slice(&self) -> Option<&[Self::Pixel]> {
        None
    }

    /// `(width, height)` of the image.
    fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];

    /// Copy `src` row by row into `self`. Both images must have identical
    /// dimensions.
    fn copy_from<V>(&mut self, src: &V)
    where
        V: ImageView<Pixel = Self::Pixel>,
        Self: Sized,
    {
        assert_eq!(
            src.dimensions(),
            self.dimensions(),
            "copy_from requires matching dimensions"
        );
        for (y, src_row) in src.rows().enumerate() {
            self.row_mut(y).copy_from_slice(src_row);
        }
    }
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }
}
