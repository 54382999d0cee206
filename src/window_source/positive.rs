use super::{check_window_buffer, WindowSourceError};
use crate::image::{GrayImageU8, ImageViewMut};
use crate::registry::WindowSize;

/// Sequential feeder over pre-cropped positive windows.
///
/// Every image is handed out at most once between two [`restart`] calls;
/// running past the end of the pool is an error rather than a wrap.
///
/// [`restart`]: PositiveFeed::restart
#[derive(Clone, Debug)]
pub struct PositiveFeed {
    pool: Vec<GrayImageU8>,
    window: WindowSize,
    next: usize,
}

impl PositiveFeed {
    /// Validates that every positive matches `window` exactly.
    pub fn new(pool: Vec<GrayImageU8>, window: WindowSize) -> Result<Self, WindowSourceError> {
        if let Some((index, img)) = pool
            .iter()
            .enumerate()
            .find(|(_, img)| img.width() != window.width || img.height() != window.height)
        {
            return Err(WindowSourceError::PositiveSizeMismatch {
                index,
                width: img.width(),
                height: img.height(),
                expected: window,
            });
        }
        Ok(Self {
            pool,
            window,
            next: 0,
        })
    }

    /// Copy the next unused positive into `dst`.
    pub fn next_window(&mut self, dst: &mut GrayImageU8) -> Result<(), WindowSourceError> {
        check_window_buffer(dst, self.window);
        let img = self
            .pool
            .get(self.next)
            .ok_or(WindowSourceError::PositivePoolExhausted {
                available: self.pool.len(),
            })?;
        dst.copy_from(img);
        self.next += 1;
        Ok(())
    }

    pub fn restart(&mut self) {
        self.next = 0;
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Positives handed out since the last restart.
    pub fn consumed(&self) -> usize {
        self.next
    }

    pub fn remaining(&self) -> usize {
        self.pool.len() - self.next
    }
}
