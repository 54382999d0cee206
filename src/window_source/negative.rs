//! Exhaustive multiscale sliding-window scan over the background pool.
//!
//! For every background image the scanner picks a starting offset derived
//! from the phase counter, scales the image down just enough for a window to
//! fit at that offset, and then walks the image with half-window steps. Once
//! a scale level is exhausted the scale grows by `scale_factor` until the
//! image would have to be upscaled past its original size, at which point the
//! next background is loaded. The pool wraps forever; each wrap advances the
//! phase so successive passes start from a different offset.
use super::{check_window_buffer, ScanOptions, WindowSourceError};
use crate::image::GrayImageU8;
use crate::registry::WindowSize;

/// Cursor of the negative scan.
///
/// The scaled working buffer is not part of the cursor: it is always
/// `pool[current_image]` resized by `scale`, and the scanner caches it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanState {
    /// Pool index of the background the working buffer was resized from.
    pub current_image: usize,
    /// Pool index of the background that `next_image` will load.
    pub next_image: usize,
    /// Completed pool passes, modulo the window area.
    pub phase: usize,
    /// Starting corner of the scan on the current image.
    pub offset: [usize; 2],
    /// Top-left corner of the next window to copy.
    pub position: [usize; 2],
    /// Current scale of the working buffer relative to the source.
    pub scale: f32,
}

impl Default for ScanState {
    fn default() -> Self {
        Self {
            current_image: 0,
            next_image: 0,
            phase: 0,
            offset: [0, 0],
            position: [0, 0],
            scale: 1.0,
        }
    }
}

/// Stateful generator of negative windows.
#[derive(Clone, Debug)]
pub struct NegativeScanner {
    pool: Vec<GrayImageU8>,
    window: WindowSize,
    options: ScanOptions,
    state: ScanState,
    working: Option<GrayImageU8>,
}

impl NegativeScanner {
    pub fn new(
        pool: Vec<GrayImageU8>,
        window: WindowSize,
        options: ScanOptions,
    ) -> Result<Self, WindowSourceError> {
        assert!(
            window.width > 0 && window.height > 0,
            "window size must be positive"
        );
        assert!(
            options.step_factor > 0.0,
            "step factor must be positive, got {}",
            options.step_factor
        );
        assert!(
            options.scale_factor > 1.0,
            "scale factor must exceed 1, got {}",
            options.scale_factor
        );
        if let Some(index) = pool.iter().position(|img| img.is_empty()) {
            return Err(WindowSourceError::EmptyBackgroundImage { index });
        }
        Ok(Self {
            pool,
            window,
            options,
            state: ScanState::default(),
            working: None,
        })
    }

    /// Reset the cursor so the next pull starts a fresh pass from the first
    /// background with phase 0.
    pub fn restart(&mut self) {
        self.state = ScanState::default();
        self.working = None;
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Dimensions of the scaled working buffer, once an image is loaded.
    pub fn working_dimensions(&self) -> Option<(usize, usize)> {
        self.working.as_ref().map(|w| (w.width(), w.height()))
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Copy the window at the current scan position into `dst` and advance.
    ///
    /// Panics if `dst` is not window-sized.
    pub fn next_window(&mut self, dst: &mut GrayImageU8) -> Result<(), WindowSourceError> {
        check_window_buffer(dst, self.window);
        if self.working.is_none() {
            self.next_image()?;
        }
        {
            let working = self
                .working
                .as_ref()
                .ok_or(WindowSourceError::EmptyNegativePool)?;
            let [x, y] = self.state.position;
            working.copy_region_into(x, y, dst);
        }
        self.advance()
    }

    /// Load the next background, wrapping around the pool.
    fn next_image(&mut self) -> Result<(), WindowSourceError> {
        if self.pool.is_empty() {
            return Err(WindowSourceError::EmptyNegativePool);
        }
        let (ww, wh) = (self.window.width, self.window.height);
        let index = self.state.next_image;
        let advanced = index + 1;
        self.state.phase = (self.state.phase + advanced / self.pool.len()) % self.window.area();
        self.state.next_image = advanced % self.pool.len();

        let src = &self.pool[index];
        let phase = self.state.phase;
        let offset = [
            (phase % ww).min(src.width().saturating_sub(ww)),
            (phase / ww).min(src.height().saturating_sub(wh)),
        ];
        let scale = f32::max(
            (ww + offset[0]) as f32 / src.width() as f32,
            (wh + offset[1]) as f32 / src.height() as f32,
        );
        let width = round_half_up(scale * src.width() as f32);
        let height = round_half_up(scale * src.height() as f32);

        log::trace!(
            "negative scan: image {index} ({}x{}) phase={phase} offset={offset:?} scale={scale:.4}",
            src.width(),
            src.height()
        );
        self.working = Some(src.resized(width, height));
        self.state.current_image = index;
        self.state.offset = offset;
        self.state.position = offset;
        self.state.scale = scale;
        Ok(())
    }

    fn advance(&mut self) -> Result<(), WindowSourceError> {
        let Some((work_w, work_h)) = self.working_dimensions() else {
            return self.next_image();
        };
        let step = self.options.step_factor;
        let (ww, wh) = (self.window.width as f32, self.window.height as f32);
        let [x, y] = self.state.position;

        if ((x as f32 + (1.0 + step) * ww) as usize) < work_w {
            self.state.position[0] = x + step_pixels(step, ww);
            return Ok(());
        }
        self.state.position[0] = self.state.offset[0];

        if ((y as f32 + (1.0 + step) * wh) as usize) < work_h {
            self.state.position[1] = y + step_pixels(step, wh);
            return Ok(());
        }
        self.state.position[1] = self.state.offset[1];

        self.state.scale *= self.options.scale_factor;
        if self.state.scale <= 1.0 {
            let src = &self.pool[self.state.current_image];
            let width = (self.state.scale * src.width() as f32) as usize;
            let height = (self.state.scale * src.height() as f32) as usize;
            self.working = Some(src.resized(width, height));
            Ok(())
        } else {
            self.next_image()
        }
    }
}

#[inline]
fn round_half_up(v: f32) -> usize {
    (v + 0.5) as usize
}

#[inline]
fn step_pixels(step_factor: f32, extent: f32) -> usize {
    ((step_factor * extent) as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn background(w: usize, h: usize, seed: usize) -> GrayImageU8 {
        GrayImageU8::from_fn(w, h, |x, y| ((x * 7 + y * 13 + seed * 31) % 251) as u8)
    }

    fn scanner(pool: Vec<GrayImageU8>, window: WindowSize) -> NegativeScanner {
        NegativeScanner::new(pool, window, ScanOptions::default()).unwrap()
    }

    #[test]
    fn first_window_covers_whole_downscaled_image() {
        let window = WindowSize::new(24, 24);
        let pool = vec![background(100, 100, 0), background(100, 100, 1)];
        let mut scan = scanner(pool, window);
        let mut dst = window.blank_window();
        scan.next_window(&mut dst).unwrap();
        let expected = background(100, 100, 0).resized(24, 24);
        assert_eq!(dst, expected);
        assert_eq!(scan.state().offset, [0, 0]);
    }

    #[test]
    fn windows_stay_inside_working_buffer() {
        let window = WindowSize::new(24, 24);
        let pool = vec![
            background(100, 100, 0),
            background(64, 130, 1),
            background(160, 48, 2),
            background(10, 12, 3),
        ];
        let mut scan = scanner(pool, window);
        let mut dst = window.blank_window();
        for _ in 0..2_000 {
            scan.next_window(&mut dst).unwrap();
            assert_eq!((dst.width(), dst.height()), (24, 24));
            let (w, h) = scan.working_dimensions().unwrap();
            let state = scan.state();
            assert!(state.offset[0] + 24 <= w && state.offset[1] + 24 <= h);
            assert!(state.position[0] + 24 <= w, "{state:?} in {w}x{h}");
            assert!(state.position[1] + 24 <= h, "{state:?} in {w}x{h}");
        }
    }

    #[test]
    fn restart_reproduces_identical_sequence() {
        let window = WindowSize::new(16, 16);
        let pool = vec![background(50, 40, 0), background(33, 70, 1)];
        let mut scan = scanner(pool, window);
        let mut dst = window.blank_window();

        let mut first = Vec::new();
        for _ in 0..300 {
            scan.next_window(&mut dst).unwrap();
            first.push(dst.clone());
        }
        scan.restart();
        assert_eq!(scan.state(), &ScanState::default());
        for expected in &first {
            scan.next_window(&mut dst).unwrap();
            assert_eq!(&dst, expected);
        }
    }

    #[test]
    fn single_image_pool_wraps_on_first_load() {
        let window = WindowSize::new(24, 24);
        let src = background(100, 100, 0);
        let mut scan = scanner(vec![src.clone()], window);
        let mut dst = window.blank_window();
        scan.next_window(&mut dst).unwrap();
        assert_eq!(scan.state().phase, 1);
        assert_eq!(scan.state().offset, [1, 0]);

        let mut expected = window.blank_window();
        src.resized(25, 25).copy_region_into(1, 0, &mut expected);
        assert_eq!(dst, expected);
    }

    #[test]
    fn second_pass_starts_from_shifted_offset() {
        let window = WindowSize::new(24, 24);
        let pool = vec![background(100, 100, 0), background(100, 100, 1)];
        let mut scan = scanner(pool, window);
        let mut dst = window.blank_window();
        scan.next_window(&mut dst).unwrap();
        assert_eq!(scan.state().phase, 0);
        while scan.state().next_image != 0 {
            scan.next_window(&mut dst).unwrap();
        }
        while scan.state().next_image == 0 {
            scan.next_window(&mut dst).unwrap();
        }
        assert_eq!(scan.state().phase, 1);
        assert_eq!(scan.state().current_image, 0);
        assert_eq!(scan.state().offset, [1, 0]);
    }

    #[test]
    fn small_background_is_upscaled_to_one_window() {
        let window = WindowSize::new(24, 24);
        let mut scan = scanner(vec![background(10, 12, 0), background(100, 100, 1)], window);
        let mut dst = window.blank_window();
        scan.next_window(&mut dst).unwrap();

        let mut expected = window.blank_window();
        background(10, 12, 0)
            .resized(24, 29)
            .copy_region_into(0, 0, &mut expected);
        assert_eq!(dst, expected);
        // One window exhausts the upscaled image; the scan moved on.
        assert_eq!(scan.state().current_image, 1);
        assert_eq!(scan.state().next_image, 0);
        assert_eq!(scan.working_dimensions(), Some((25, 25)));
    }

    #[test]
    fn empty_pool_fails() {
        let window = WindowSize::new(8, 8);
        let mut scan = scanner(Vec::new(), window);
        let mut dst = window.blank_window();
        assert_eq!(
            scan.next_window(&mut dst),
            Err(WindowSourceError::EmptyNegativePool)
        );
    }

    #[test]
    fn zero_sized_background_is_rejected() {
        let window = WindowSize::new(8, 8);
        let err = NegativeScanner::new(
            vec![background(20, 20, 0), GrayImageU8::zeros(0, 0)],
            window,
            ScanOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, WindowSourceError::EmptyBackgroundImage { index: 1 });
    }

    #[test]
    #[should_panic(expected = "window buffer")]
    fn wrong_destination_size_panics() {
        let window = WindowSize::new(8, 8);
        let mut scan = scanner(vec![background(20, 20, 0)], window);
        let mut dst = GrayImageU8::zeros(8, 9);
        let _ = scan.next_window(&mut dst);
    }
}
