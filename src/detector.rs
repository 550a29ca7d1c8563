// Per-frame gold sample position detection.
//
// One detector instance owns the sticky position estimate and the scratch
// buffers for the frame path. `process_frame` runs the full pipeline:
// HSV thresholding, blob extraction, area/shape filtering, spatial
// correlation, classification, overlay drawing. The vote query runs on a
// separate thread and samples the sticky estimate once per frame tick.

use crate::contours::extract_regions;
use crate::correlation::correlate;
use crate::overlay;
use crate::region_filter::filter_regions;
use crate::segmentation::{blur_mask, threshold_in_range, ColorMask};
use crate::types::{DetectorConfig, Frame, GoldPosition, Region};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Buffers reused across frames. Cleared and rewritten on every call;
/// nothing in here survives a frame.
#[derive(Default)]
struct Scratch {
    gold_mask: ColorMask,
    silver_mask: ColorMask,
    blur: Vec<u8>,
    visited: Vec<bool>,
}

struct SharedState {
    /// Sticky estimate: overwritten only by a disambiguated frame,
    /// otherwise keeps its last value. Starts at Unknown.
    position: GoldPosition,
    /// Bumped once per processed frame; the vote query waits on this.
    frame_seq: u64,
}

pub struct SamplingDetector {
    config: DetectorConfig,
    scratch: Mutex<Scratch>,
    state: Mutex<SharedState>,
    tick: Condvar,
    show_contours: AtomicBool,
    show_rectangles: AtomicBool,
}

impl SamplingDetector {
    pub fn new(config: DetectorConfig) -> Self {
        let show_contours = config.overlay.show_contours;
        let show_rectangles = config.overlay.show_rectangles;
        Self {
            config,
            scratch: Mutex::new(Scratch::default()),
            state: Mutex::new(SharedState {
                position: GoldPosition::Unknown,
                frame_seq: 0,
            }),
            tick: Condvar::new(),
            show_contours: AtomicBool::new(show_contours),
            show_rectangles: AtomicBool::new(show_rectangles),
        }
    }

    pub fn set_show_contours(&self, enabled: bool) {
        self.show_contours.store(enabled, Ordering::Relaxed);
    }

    pub fn set_show_rectangles(&self, enabled: bool) {
        self.show_rectangles.store(enabled, Ordering::Relaxed);
    }

    /// Non-blocking read of the sticky estimate.
    pub fn current_position(&self) -> GoldPosition {
        self.lock_state().position
    }

    /// Process one frame: classify, update the sticky estimate, draw
    /// overlays into the frame, and publish a frame tick.
    ///
    /// Invalid frames (zero-sized, or a buffer that does not match the
    /// dimensions) are rejected without touching any state.
    pub fn process_frame(&self, frame: &mut Frame) {
        if !frame.is_valid() {
            warn!(
                width = frame.width,
                height = frame.height,
                len = frame.data.len(),
                "rejecting malformed frame"
            );
            return;
        }

        let mut scratch = self
            .scratch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let s = &mut *scratch;

        // Segmentation: one mask per color, optional despeckle blur
        threshold_in_range(
            &frame.data,
            frame.width,
            frame.height,
            &self.config.gold.hsv,
            &mut s.gold_mask,
        );
        threshold_in_range(
            &frame.data,
            frame.width,
            frame.height,
            &self.config.silver.hsv,
            &mut s.silver_mask,
        );
        if self.config.blur_masks {
            blur_mask(&mut s.gold_mask, &mut s.blur);
            blur_mask(&mut s.silver_mask, &mut s.blur);
        }

        // Blob extraction and per-color filtering
        let gold_raw = extract_regions(&s.gold_mask, &mut s.visited);
        let silver_raw = extract_regions(&s.silver_mask, &mut s.visited);
        let gold = filter_regions(&gold_raw, &self.config.gold);
        let silver = filter_regions(&silver_raw, &self.config.silver);

        debug!(
            gold_raw = gold_raw.len(),
            gold = gold.len(),
            silver_raw = silver_raw.len(),
            silver = silver.len(),
            "candidate regions after filtering"
        );

        // Spatial correlation, then the positional decision
        let classified = correlate(&gold, &silver, self.config.correlation.vertical_tolerance)
            .map(|(marker, refs)| classify(&marker, &refs));

        // Publish: overwrite the sticky estimate only on a definite
        // result, bump the tick either way
        let position = {
            let mut state = self.lock_state();
            if let Some(position) = classified {
                if position != state.position {
                    info!(
                        from = state.position.as_str(),
                        to = position.as_str(),
                        "gold position changed"
                    );
                }
                state.position = position;
            }
            state.frame_seq += 1;
            self.tick.notify_all();
            state.position
        };

        // Overlays go on last so they never feed back into segmentation
        self.draw_overlays(frame, s, &gold, &silver, position);
    }

    /// Majority vote over `window` frame ticks.
    ///
    /// Samples the sticky estimate once per frame update, waiting on the
    /// tick barrier rather than a fixed sleep so it stays synchronized
    /// with whatever cadence the host drives. Unknown samples count
    /// toward no bucket. If frame updates stall for longer than the
    /// configured tick timeout, returns the majority of the samples
    /// taken so far.
    pub fn vote_position(&self, window: usize) -> GoldPosition {
        let timeout = Duration::from_millis(self.config.vote.tick_timeout_ms);
        let (mut left, mut middle, mut right) = (0usize, 0usize, 0usize);

        let mut state = self.lock_state();
        let mut last_seq = state.frame_seq;

        for sampled in 0..window {
            let (guard, wait) = self
                .tick
                .wait_timeout_while(state, timeout, |s| s.frame_seq == last_seq)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            state = guard;

            if wait.timed_out() && state.frame_seq == last_seq {
                warn!(
                    sampled,
                    window, "frame updates stalled; returning partial vote"
                );
                break;
            }
            last_seq = state.frame_seq;

            match state.position {
                GoldPosition::Left => left += 1,
                GoldPosition::Middle => middle += 1,
                GoldPosition::Right => right += 1,
                GoldPosition::Unknown => {}
            }
        }
        drop(state);

        let verdict = tally_votes(left, middle, right);
        debug!(
            left,
            middle,
            right,
            verdict = verdict.as_str(),
            "vote window complete"
        );
        verdict
    }

    /// Vote over the configured default window.
    pub fn vote_position_default(&self) -> GoldPosition {
        self.vote_position(self.config.vote.window)
    }

    fn draw_overlays(
        &self,
        frame: &mut Frame,
        scratch: &Scratch,
        gold: &[Region],
        silver: &[Region],
        position: GoldPosition,
    ) {
        let (w, h) = (frame.width, frame.height);

        if self.show_contours.load(Ordering::Relaxed) {
            overlay::draw_mask_outlines(&mut frame.data, w, h, &scratch.gold_mask, overlay::GOLD_BOX);
            overlay::draw_mask_outlines(
                &mut frame.data,
                w,
                h,
                &scratch.silver_mask,
                overlay::SILVER_BOX,
            );
        }

        if self.show_rectangles.load(Ordering::Relaxed) {
            for region in gold {
                overlay::draw_rect_outline(&mut frame.data, w, h, region, overlay::GOLD_BOX, 2);
            }
            for region in silver {
                overlay::draw_rect_outline(&mut frame.data, w, h, region, overlay::SILVER_BOX, 2);
            }
        }

        if position != GoldPosition::Unknown {
            overlay::draw_label(&mut frame.data, w, h, position.as_str(), 12, 12, 2);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SharedState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// The positional decision. References arrive sorted by center x;
/// without the sort the outcome would depend on blob extraction order.
fn classify(marker: &Region, refs: &[Region; 2]) -> GoldPosition {
    let mx = marker.center_x();
    let r0x = refs[0].center_x();
    let r1x = refs[1].center_x();

    if mx < r0x {
        if mx < r1x {
            GoldPosition::Left
        } else {
            GoldPosition::Middle
        }
    } else if mx > r1x {
        GoldPosition::Right
    } else {
        GoldPosition::Middle
    }
}

/// Sequential-comparison majority: exact ties prefer Right over Middle
/// over Left. All-empty buckets mean every sample was Unknown.
fn tally_votes(left: usize, middle: usize, right: usize) -> GoldPosition {
    if left == 0 && middle == 0 && right == 0 {
        return GoldPosition::Unknown;
    }
    if left > middle {
        if left > right {
            GoldPosition::Left
        } else {
            GoldPosition::Right
        }
    } else if middle > right {
        GoldPosition::Middle
    } else {
        GoldPosition::Right
    }
}
