// THEORY:
// The `pipeline` module is the final, top-level API for the substitution
// engine. It drives the frame processor once per displayed video frame and
// encapsulates the stream lifecycle into an explicit state machine, so the
// suspension and cancellation points are visible in the types instead of
// being implicit in a self-rescheduling callback.
//
// Key architectural principles:
// 1.  **Explicit State Machine**: The pipeline is always in exactly one of
//     {Idle, ScheduledNextFrame, Stopped}. `start()` arms it; each `tick()`
//     is one display refresh. There is no hidden queue of pending work.
// 2.  **Cooperative Cancellation**: The only cancellation signal is the
//     source's own play/pause/end state, polled once at each tick boundary
//     before any pixel is touched. A frame pass, once begun, runs to
//     completion; pausing takes effect at the next tick.
// 3.  **One Frame Per Tick, No Backlog**: Each tick captures the current
//     visual frame into the pipeline's buffer and processes it
//     synchronously. Ticks are never queued: the async driver consumes tick
//     events from a bounded channel, so a clock producing ticks faster than
//     frames are processed simply drops them (`try_send` on a full channel),
//     and a slow consumer skips frames instead of falling behind.
// 4.  **Table Before Transforms**: The color table is a constructor
//     parameter. The async loader must have resolved before a pipeline can
//     exist, so no frame pass can ever observe a partially-merged table.

use crate::core_modules::color_table::ColorTable;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;

// Re-export key data structures for the public API.
pub use crate::core_modules::frame::{FrameProcessor, PixelBuffer, ProgressCounter};

/// Liveness of the video source, polled before each frame pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Playing,
    Paused,
    Ended,
}

/// Where the pipeline currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    /// Constructed but not yet armed.
    Idle,
    /// Armed; the next tick will attempt a frame pass.
    ScheduledNextFrame,
    /// Playback stopped; terminal until `start()` is called again.
    Stopped,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickReport {
    /// One full frame pass completed.
    FrameProcessed,
    /// The source was paused or ended; the pipeline stopped without
    /// touching the buffer.
    Stopped,
    /// The pipeline was not armed; nothing happened.
    Inactive,
}

/// A continuous source of visual frames, supplied by the embedding
/// application (camera, decoder, capture session).
pub trait VideoSource {
    /// Current play/pause/end state. Polled once per tick.
    fn state(&self) -> StreamState;

    /// Copies the currently displayed frame into `frame`. The buffer's
    /// dimensions are fixed at pipeline construction.
    fn capture_into(&mut self, frame: &mut PixelBuffer);
}

/// Configuration for the stream pipeline, allowing for tunable behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub frame_width: u32,
    pub frame_height: u32,
    /// Pixels per progress report during a frame pass. `0` selects the
    /// automatic default of one report per 0.1% of the frame.
    pub progress_batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frame_width: 640,
            frame_height: 480,
            progress_batch_size: 0,
        }
    }
}

/// The per-tick driver that repeats frame passes while a video source plays.
pub struct StreamPipeline {
    processor: FrameProcessor,
    frame: PixelBuffer,
    phase: PipelinePhase,
    frames_processed: u64,
}

impl StreamPipeline {
    pub fn new(config: &PipelineConfig, table: Arc<ColorTable>) -> Self {
        Self {
            processor: FrameProcessor::new(table, config.progress_batch_size),
            frame: PixelBuffer::blank(config.frame_width, config.frame_height),
            phase: PipelinePhase::Idle,
            frames_processed: 0,
        }
    }

    /// Arms the pipeline. Called when playback starts, and again after a
    /// stop when playback resumes.
    pub fn start(&mut self) {
        self.phase = PipelinePhase::ScheduledNextFrame;
        log::info!("stream pipeline armed");
    }

    /// One display refresh: poll liveness, then either process exactly one
    /// frame or stop.
    pub fn tick<S: VideoSource>(&mut self, source: &mut S, progress: &ProgressCounter) -> TickReport {
        if self.phase != PipelinePhase::ScheduledNextFrame {
            return TickReport::Inactive;
        }

        // Cancellation point: liveness is checked before any capture or
        // pixel work for this tick.
        if source.state() != StreamState::Playing {
            self.phase = PipelinePhase::Stopped;
            log::info!(
                "stream pipeline stopped after {} frames",
                self.frames_processed
            );
            return TickReport::Stopped;
        }

        source.capture_into(&mut self.frame);
        self.processor.process(&mut self.frame, progress);
        self.frames_processed += 1;

        // Remain armed for the next display tick.
        TickReport::FrameProcessed
    }

    /// Consumes tick events until the source stops playing or the clock
    /// closes. Returns the number of frames processed during the run.
    ///
    /// The clock side should use a bounded channel and `try_send`, so ticks
    /// arriving while a frame pass is still running are dropped rather than
    /// queued.
    pub async fn run<S: VideoSource>(
        &mut self,
        ticks: &mut mpsc::Receiver<()>,
        source: &mut S,
        progress: &ProgressCounter,
    ) -> u64 {
        let before = self.frames_processed;
        self.start();
        while ticks.recv().await.is_some() {
            if self.tick(source, progress) == TickReport::Stopped {
                break;
            }
        }
        self.frames_processed - before
    }

    /// The live output buffer: the most recently processed frame.
    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    pub fn phase(&self) -> PipelinePhase {
        self.phase
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }
}
