// THEORY:
// The `frame` module is the engine's workhorse: it walks a full RGBA pixel
// buffer, rewrites every pixel's R, G, B channels in place through the
// per-pixel transform, and reports coarse progress as it goes.
//
// Key architectural principles:
// 1.  **Validated Ownership**: A `PixelBuffer` can only be built through a
//     constructor that checks the byte length against the declared
//     width x height. Once constructed it is valid by definition, so the
//     frame pass itself is infallible and runs to completion — a caller can
//     never observe a partially-checked, partially-applied frame.
// 2.  **Alpha Pass-Through**: The fourth sample of every pixel is never read
//     and never written. Only the three color channels are rewritten.
// 3.  **Batched Progress**: Reporting progress per pixel would dominate the
//     runtime of large frames, so the processor only stores a new percentage
//     after each batch of pixels. The batch size is configurable; the
//     automatic default is 0.1% of the frame's pixel count, keeping the
//     reporting overhead negligible. Progress is non-decreasing and lands on
//     exactly 100 when the pass completes.
// 4.  **External Progress Sink**: The engine does not own the counter it
//     reports into. `ProgressCounter` is a clone-shareable atomic cell; the
//     embedding application holds its own clone and renders it however it
//     likes.

use crate::core_modules::color_table::ColorTable;
use crate::core_modules::pixel::pixel::{Rgb, CHANNELS};
use crate::core_modules::transform::transform_pixel;
use crate::error::EngineError;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// A shared 0-100 progress cell. The engine only ever stores into it; the
/// holder of a clone reads it out to drive a progress indicator.
#[derive(Debug, Clone, Default)]
pub struct ProgressCounter(Arc<AtomicU8>);

impl ProgressCounter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn set(&self, percent: u8) {
        self.0.store(percent, Ordering::Relaxed);
    }

    pub fn get(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }
}

/// An owned RGBA frame: a flat byte buffer of interleaved R, G, B, A samples
/// with explicit dimensions. Length is validated at construction and the
/// buffer is never resized afterwards.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Wraps raw interleaved RGBA bytes, failing fast when the length is not
    /// a whole number of 4-byte pixels matching `width * height`.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, EngineError> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected || data.len() % CHANNELS != 0 {
            return Err(EngineError::MalformedBuffer {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// A zeroed frame of the given dimensions, for pipelines that capture
    /// into a reused buffer.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; width as usize * height as usize * CHANNELS],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the interleaved samples. The slice cannot be
    /// resized, so the buffer's validity is preserved.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Progress batch divisor for the automatic setting: one report per 0.1% of
/// the frame.
const AUTO_BATCH_DIVISOR: usize = 1000;

/// Rewrites whole frames in place through the color table.
pub struct FrameProcessor {
    table: Arc<ColorTable>,
    /// Pixels per progress report. `0` selects the automatic default.
    progress_batch_size: usize,
}

impl FrameProcessor {
    pub fn new(table: Arc<ColorTable>, progress_batch_size: usize) -> Self {
        Self {
            table,
            progress_batch_size,
        }
    }

    fn effective_batch(&self, pixel_count: usize) -> usize {
        if self.progress_batch_size == 0 {
            (pixel_count / AUTO_BATCH_DIVISOR).max(1)
        } else {
            self.progress_batch_size
        }
    }

    /// One frame pass: rewrites every pixel's R, G, B channels in place,
    /// leaves the fourth sample untouched, and reports batched progress.
    /// Synchronous; always runs to completion.
    pub fn process(&self, frame: &mut PixelBuffer, progress: &ProgressCounter) {
        let total = frame.pixel_count();
        let batch = self.effective_batch(total);
        let table = self.table.as_ref();

        progress.set(0);
        for (index, sample) in frame
            .as_bytes_mut()
            .chunks_exact_mut(CHANNELS)
            .enumerate()
        {
            let mapped = transform_pixel(Rgb::new(sample[0], sample[1], sample[2]), table);
            sample[0] = mapped.red;
            sample[1] = mapped.green;
            sample[2] = mapped.blue;

            let done = index + 1;
            if done % batch == 0 {
                progress.set((done * 100 / total) as u8);
            }
        }
        progress.set(100);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(r: u8, g: u8, b: u8) -> Rgb {
        Rgb::new(r, g, b)
    }

    fn example_table() -> Arc<ColorTable> {
        Arc::new(ColorTable::from_pairs(vec![
            (rgb(10, 10, 10), rgb(0, 0, 0)),
            (rgb(250, 250, 250), rgb(255, 255, 255)),
        ]))
    }

    #[test]
    fn rejects_length_not_matching_dimensions() {
        let err = PixelBuffer::new(vec![0; 12], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            EngineError::MalformedBuffer {
                len: 12,
                width: 2,
                height: 2
            }
        ));
    }

    #[test]
    fn rejects_length_not_a_multiple_of_four() {
        assert!(PixelBuffer::new(vec![0; 7], 1, 2).is_err());
    }

    #[test]
    fn rewrites_color_channels_and_passes_alpha_through() {
        let mut frame = PixelBuffer::new(
            vec![
                10, 10, 10, 255, // exact key
                200, 200, 200, 128, // nearest miss
            ],
            2,
            1,
        )
        .unwrap();

        let processor = FrameProcessor::new(example_table(), 0);
        processor.process(&mut frame, &ProgressCounter::new());

        assert_eq!(
            frame.as_bytes(),
            &[0, 0, 0, 255, 255, 255, 255, 128]
        );
    }

    #[test]
    fn progress_reaches_exactly_100_for_any_batch_size() {
        for batch in [0usize, 1, 3, 1000] {
            let mut frame = PixelBuffer::blank(5, 2);
            let progress = ProgressCounter::new();
            let processor = FrameProcessor::new(example_table(), batch);
            processor.process(&mut frame, &progress);
            assert_eq!(progress.get(), 100, "batch size {batch}");
        }
    }

    #[test]
    fn progress_is_monotonic_across_batches() {
        // A counter wrapper cannot observe intermediate stores, so replay
        // the reporting schedule: percentages at batch boundaries must be
        // non-decreasing.
        let total = 997usize;
        let batch = 10usize;
        let mut last = 0usize;
        for done in (batch..=total).step_by(batch) {
            let percent = done * 100 / total;
            assert!(percent >= last);
            last = percent;
        }
        assert!(last <= 100);
    }

    #[test]
    fn empty_frame_still_completes_with_full_progress() {
        let mut frame = PixelBuffer::blank(0, 0);
        let progress = ProgressCounter::new();
        FrameProcessor::new(example_table(), 0).process(&mut frame, &progress);
        assert_eq!(progress.get(), 100);
    }
}
