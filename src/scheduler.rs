//! Frame pacing on top of a variable-rate tick source.

use tracing::{debug, trace};

/// External one-shot timing primitive, such as the browser's
/// `requestAnimationFrame`.
///
/// Each request yields at most one tick carrying a monotonically increasing
/// timestamp in milliseconds. The host delivers that tick by calling
/// [`FrameScheduler::on_tick`].
pub trait TickSource {
    /// Token identifying a pending request.
    type Handle;

    /// Ask to be notified on or before the next display refresh.
    fn request_tick(&mut self) -> Self::Handle;

    /// Cancel a pending request.
    fn cancel_tick(&mut self, handle: Self::Handle);
}

/// Drives a logical frame rate that is independent of the tick rate.
///
/// Each tick fires zero, one or several logical frames depending on how much
/// time has accumulated since the phase anchor. The anchor advances by whole
/// intervals only, so long-run phase stays exact even with irregular ticks.
///
/// ## Example
///
/// ```rust
/// use ascii_reel::{FrameScheduler, ManualTickSource};
///
/// let mut scheduler = FrameScheduler::new(ManualTickSource::default(), 10.0);
/// scheduler.start();
///
/// let mut frames = 0;
/// scheduler.on_tick(0.0, || frames += 1); // anchors the phase
/// scheduler.on_tick(250.0, || frames += 1); // 2.5 intervals elapsed
/// assert_eq!(frames, 2);
/// assert_eq!(scheduler.phase_anchor(), Some(200.0));
/// ```
#[derive(Debug)]
pub struct FrameScheduler<S: TickSource> {
    source: S,
    fps: f64,
    /// Milliseconds per logical frame
    frame_interval_ms: f64,
    /// Handle of the outstanding tick request; `Some` while running
    pending: Option<S::Handle>,
    /// Unset until the first tick after `start`
    phase_anchor: Option<f64>,
}

impl<S: TickSource> FrameScheduler<S> {
    /// Create a paused scheduler at the given frame rate.
    ///
    /// `fps` must be positive and finite.
    pub fn new(source: S, fps: f64) -> Self {
        Self {
            source,
            fps,
            frame_interval_ms: 1000.0 / fps,
            pending: None,
            phase_anchor: None,
        }
    }

    /// Change the logical frame rate.
    ///
    /// Takes effect on the next accumulation; the phase anchor is kept.
    pub fn configure(&mut self, fps: f64) {
        self.fps = fps;
        self.frame_interval_ms = 1000.0 / fps;
        debug!(fps, interval_ms = self.frame_interval_ms, "scheduler configured");
    }

    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    #[inline]
    pub fn interval_ms(&self) -> f64 {
        self.frame_interval_ms
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    pub fn phase_anchor(&self) -> Option<f64> {
        self.phase_anchor
    }

    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[inline]
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Begin requesting ticks. No-op while already running.
    pub fn start(&mut self) {
        if self.pending.is_some() {
            return;
        }
        self.pending = Some(self.source.request_tick());
        debug!(fps = self.fps, "scheduler started");
    }

    /// Cancel the pending tick and forget the phase. No-op while paused.
    ///
    /// The next `start` anchors afresh instead of catching up on the pause.
    pub fn pause(&mut self) {
        let Some(handle) = self.pending.take() else {
            return;
        };
        self.phase_anchor = None;
        self.source.cancel_tick(handle);
        debug!("scheduler paused");
    }

    /// Handle a tick delivered by the source at `time` milliseconds.
    ///
    /// Calls `on_frame` once per elapsed logical frame and re-requests the
    /// next tick. Returns the number of logical frames fired. A tick that
    /// arrives while paused is stale and ignored.
    pub fn on_tick<F: FnMut()>(&mut self, time: f64, mut on_frame: F) -> u32 {
        if self.pending.take().is_none() {
            return 0;
        }

        let mut fired = 0;
        match self.phase_anchor {
            None => self.phase_anchor = Some(time),
            Some(mut anchor) => {
                let mut elapsed = time - anchor;
                while elapsed >= self.frame_interval_ms {
                    on_frame();
                    fired += 1;
                    elapsed -= self.frame_interval_ms;
                    anchor += self.frame_interval_ms;
                }
                self.phase_anchor = Some(anchor);
            }
        }
        if fired > 1 {
            trace!(fired, time, "scheduler caught up");
        }

        self.pending = Some(self.source.request_tick());
        fired
    }
}

/// In-memory tick source for hosts that deliver ticks by hand.
///
/// Counts requests and cancellations, which is all a test or a simple
/// polling loop needs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManualTickSource {
    next_handle: u64,
    /// Handle of the most recent uncancelled request
    pub pending: Option<u64>,
    /// Total number of requests made
    pub requests: u64,
    /// Handles that were cancelled, in order
    pub cancelled: Vec<u64>,
}

impl TickSource for ManualTickSource {
    type Handle = u64;

    fn request_tick(&mut self) -> u64 {
        self.next_handle += 1;
        self.requests += 1;
        self.pending = Some(self.next_handle);
        self.next_handle
    }

    fn cancel_tick(&mut self, handle: u64) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_fires(scheduler: &mut FrameScheduler<ManualTickSource>, ticks: &[f64]) -> u32 {
        ticks.iter().map(|&t| scheduler.on_tick(t, || {})).sum()
    }

    #[test]
    fn test_debug_includes_pending_handle() {
        let mut sched = FrameScheduler::new(ManualTickSource::default(), 10.0);
        sched.start();
        let shown = format!("{sched:?}");
        assert!(shown.contains("pending: Some(1)"), "{shown}");
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut sched = FrameScheduler::new(ManualTickSource::default(), 10.0);
        assert!(!sched.is_running());

        sched.start();
        sched.start();
        assert!(sched.is_running());
        assert_eq!(sched.source().requests, 1);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut sched = FrameScheduler::new(ManualTickSource::default(), 10.0);
        sched.pause();
        assert!(sched.source().cancelled.is_empty());

        sched.start();
        sched.pause();
        sched.pause();
        assert!(!sched.is_running());
        assert_eq!(sched.source().cancelled, vec![1]);
        assert_eq!(sched.source().pending, None);
    }

    #[test]
    fn test_first_tick_anchors_without_firing() {
        let mut sched = FrameScheduler::new(ManualTickSource::default(), 10.0);
        sched.start();

        let mut fired = 0;
        assert_eq!(sched.on_tick(5000.0, || fired += 1), 0);
        assert_eq!(fired, 0);
        assert_eq!(sched.phase_anchor(), Some(5000.0));
        // Re-registered for the next tick
        assert_eq!(sched.source().requests, 2);
        assert!(sched.is_running());
    }

    #[test]
    fn test_catch_up_fires_multiple() {
        let mut sched = FrameScheduler::new(ManualTickSource::default(), 10.0);
        sched.start();
        sched.on_tick(0.0, || {});

        assert_eq!(sched.on_tick(350.0, || {}), 3);
        assert_eq!(sched.phase_anchor(), Some(300.0));
        // Remaining 50ms carries over
        assert_eq!(sched.on_tick(399.0, || {}), 0);
        assert_eq!(sched.on_tick(400.0, || {}), 1);
    }

    #[test]
    fn test_fast_ticks_never_double_count() {
        let mut sched = FrameScheduler::new(ManualTickSource::default(), 10.0);
        sched.start();

        // ~60Hz ticks for one second
        let ticks: Vec<f64> = (0..=60).map(|i| i as f64 * 1000.0 / 60.0).collect();
        assert_eq!(count_fires(&mut sched, &ticks), 10);
    }

    #[test]
    fn test_phase_accuracy_with_irregular_ticks() {
        let mut sched = FrameScheduler::new(ManualTickSource::default(), 24.0);
        sched.start();

        let ticks = [
            10.0, 11.0, 47.5, 130.0, 131.0, 400.25, 401.0, 733.0, 990.0, 1020.0,
        ];
        let fired = count_fires(&mut sched, &ticks);
        let expected = ((1020.0_f64 - 10.0) / (1000.0 / 24.0)).floor() as u32;
        assert_eq!(fired, expected);
    }

    #[test]
    fn test_pause_resets_phase() {
        let mut sched = FrameScheduler::new(ManualTickSource::default(), 10.0);
        sched.start();
        sched.on_tick(0.0, || {});
        sched.on_tick(100.0, || {});

        sched.pause();
        assert_eq!(sched.phase_anchor(), None);

        sched.start();
        // Ten seconds passed while paused: no burst
        assert_eq!(sched.on_tick(10_100.0, || {}), 0);
        assert_eq!(sched.on_tick(10_200.0, || {}), 1);
    }

    #[test]
    fn test_stale_tick_after_pause_is_ignored() {
        let mut sched = FrameScheduler::new(ManualTickSource::default(), 10.0);
        sched.start();
        sched.on_tick(0.0, || {});
        sched.pause();

        assert_eq!(sched.on_tick(1000.0, || {}), 0);
        assert!(!sched.is_running());
        assert_eq!(sched.source().requests, 2);
    }

    #[test]
    fn test_configure_keeps_phase() {
        let mut sched = FrameScheduler::new(ManualTickSource::default(), 10.0);
        sched.start();
        sched.on_tick(0.0, || {});
        sched.on_tick(150.0, || {});
        assert_eq!(sched.phase_anchor(), Some(100.0));

        sched.configure(20.0);
        assert_eq!(sched.interval_ms(), 50.0);
        assert_eq!(sched.phase_anchor(), Some(100.0));
        // 100ms since anchor at the new 50ms interval
        assert_eq!(sched.on_tick(200.0, || {}), 2);
    }

    #[test]
    fn test_interval_from_fps() {
        let sched = FrameScheduler::new(ManualTickSource::default(), 24.0);
        assert!((sched.interval_ms() - 41.666_666).abs() < 1e-3);
        assert_eq!(sched.fps(), 24.0);
    }
}
