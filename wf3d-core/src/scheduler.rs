//! Frame pacing for the cooperative main loop

use std::time::{Duration, Instant};

use crate::config::SchedulerSettings;
use crate::registry::Registry;
use crate::render::{Canvas, FrameStats, Pipeline};

/// Decides when the next frame is due and advances the rotation.
///
/// The scheduler never waits: [`FrameScheduler::tick`] either renders one
/// frame or returns immediately, so the caller can keep servicing input
/// between frames. Late frames are rendered late rather than dropped.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Duration,
    yaw_step: f32,
    last_frame: Option<Instant>,
    frames: u64,
}

impl FrameScheduler {
    pub fn new(settings: &SchedulerSettings) -> Self {
        Self {
            interval: settings.frame_interval(),
            yaw_step: settings.yaw_step,
            last_frame: None,
            frames: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether a frame is due at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        self.last_frame
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval)
    }

    /// Render one frame if the interval has elapsed since the last one.
    pub fn tick(
        &mut self,
        now: Instant,
        registry: &mut Registry,
        pipeline: &mut Pipeline,
        canvas: &mut dyn Canvas,
        yield_now: &mut dyn FnMut(),
    ) -> Option<FrameStats> {
        if !self.is_due(now) {
            return None;
        }
        self.last_frame = Some(now);
        self.frames += 1;
        registry.advance_yaw(self.yaw_step);
        Some(pipeline.render_frame(registry.snapshot(), canvas, yield_now))
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(&SchedulerSettings::default())
    }
}
