//! Virtual timeline engine
//!
//! Maps between real time (positions in the raw recording) and virtual time
//! (positions once every hidden interval has been excised), and keeps playback
//! and navigation out of hidden intervals.

use crate::annotation::{Segment, Tag, TagVisibility};
use crate::interval::{clamp_time, normalize, Interval};
use tracing::debug;

/// Real/virtual time translator over a fixed hidden partition.
///
/// The partition is built once from a segment/tag snapshot. Only the real
/// duration may change afterwards; rebuild the timeline when segments change.
#[derive(Debug, Clone)]
pub struct VirtualTimeline {
    /// Merged hidden intervals, not yet clamped to the real duration
    hidden: Vec<Interval>,
    real_duration: f64,
    virtual_duration: f64,
}

impl VirtualTimeline {
    /// Creates a timeline from an annotation snapshot and an initial real
    /// duration, which may be zero while media metadata is still loading.
    pub fn new(segments: &[Segment], tags: &[Tag], real_duration: f64) -> Self {
        let visibility = TagVisibility::new(tags);
        Self::from_hidden_intervals(
            visibility.hidden(segments).map(Segment::interval),
            real_duration,
        )
    }

    /// Creates a timeline directly from raw hidden intervals
    pub fn from_hidden_intervals<I>(intervals: I, real_duration: f64) -> Self
    where
        I: IntoIterator<Item = Interval>,
    {
        // The duration may arrive later, so only the lower bound is applied
        // here; the upper clamp happens per query.
        let hidden = normalize(intervals, f64::INFINITY);
        let mut timeline = Self {
            hidden,
            real_duration: 0.0,
            virtual_duration: 0.0,
        };
        timeline.set_real_duration(real_duration);
        debug!(
            hidden = timeline.hidden.len(),
            real_duration = timeline.real_duration,
            virtual_duration = timeline.virtual_duration,
            "built virtual timeline"
        );
        timeline
    }

    /// Returns the duration of the raw recording in seconds
    pub fn real_duration(&self) -> f64 {
        self.real_duration
    }

    /// Returns the duration with every hidden interval removed
    pub fn virtual_duration(&self) -> f64 {
        self.virtual_duration
    }

    /// Updates the real duration and recomputes the virtual duration.
    ///
    /// Negative and non-finite values are treated as 0.
    pub fn set_real_duration(&mut self, duration: f64) {
        self.real_duration = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
        let hidden_total: f64 = self.clamped_hidden().map(|iv| iv.len()).sum();
        self.virtual_duration = (self.real_duration - hidden_total).max(0.0);
        debug!(
            real_duration = self.real_duration,
            virtual_duration = self.virtual_duration,
            "updated real duration"
        );
    }

    /// Hidden intervals intersected with `[0, real_duration]`
    fn clamped_hidden(&self) -> impl Iterator<Item = Interval> + '_ {
        let upper = self.real_duration;
        self.hidden.iter().filter_map(move |iv| iv.clamp_to(upper))
    }

    /// Returns a copy of the hidden partition within the current duration
    pub fn hidden_segments(&self) -> Vec<Interval> {
        self.clamped_hidden().collect()
    }

    /// Translates a real position into virtual time.
    ///
    /// Every point inside a hidden interval maps to the virtual position of
    /// that interval's start: time spent in a hidden gap never advances
    /// virtual time.
    pub fn real_to_virtual(&self, real: f64) -> f64 {
        let real = clamp_time(real, self.real_duration);
        let mut virtual_time = real;
        for iv in self.clamped_hidden() {
            if iv.end <= real {
                virtual_time -= iv.len();
            } else if iv.start < real {
                virtual_time -= real - iv.start;
                break;
            } else {
                break;
            }
        }
        clamp_time(virtual_time, self.virtual_duration)
    }

    /// Translates a virtual position back into real time.
    ///
    /// A virtual position that lands exactly on a hidden boundary resolves to
    /// the visible instant before the gap.
    pub fn virtual_to_real(&self, virtual_time: f64) -> f64 {
        let target = clamp_time(virtual_time, self.virtual_duration);
        let mut consumed = 0.0;
        let mut cursor = 0.0;
        for iv in self.clamped_hidden() {
            let visible = iv.start - cursor;
            if target <= consumed + visible {
                return cursor + (target - consumed);
            }
            consumed += visible;
            cursor = iv.end;
        }
        clamp_time(cursor + (target - consumed), self.real_duration)
    }

    /// Snaps a real position out of any hidden interval.
    ///
    /// Hidden intervals are half-open here: a position equal to a hidden
    /// start snaps to that interval's end, a position equal to its end is
    /// already visible.
    pub fn valid_real_time(&self, real: f64) -> f64 {
        let real = clamp_time(real, self.real_duration);
        self.clamped_hidden()
            .take_while(|iv| iv.start <= real)
            .find(|iv| iv.contains_half_open(real))
            .map_or(real, |iv| iv.end)
    }

    /// Returns the sorted, deduplicated navigation points: both ends of the
    /// recording plus the snapped boundaries of every visible segment.
    pub fn valid_cut_points(&self, segments: &[Segment], tags: &[Tag]) -> Vec<f64> {
        let visibility = TagVisibility::new(tags);
        let mut points = vec![0.0, self.real_duration];
        for segment in visibility.visible(segments) {
            points.push(self.valid_real_time(segment.start_real));
            points.push(self.valid_real_time(segment.end_real));
        }
        points.retain(|&p| (0.0..=self.real_duration).contains(&p));
        points.sort_by(f64::total_cmp);
        points.dedup();
        points
    }

    /// Returns the first visible segment, in collection order, that contains
    /// the snapped position.
    pub fn active_visible_segment<'a>(
        &self,
        segments: &'a [Segment],
        tags: &[Tag],
        real: f64,
    ) -> Option<&'a Segment> {
        let visibility = TagVisibility::new(tags);
        let snapped = self.valid_real_time(real);
        let active = visibility
            .visible(segments)
            .find(|s| s.interval().contains(snapped));
        active
    }

    /// Converts a fraction of the virtual timeline (e.g. a scrubber click)
    /// into a playable real position.
    pub fn seek_target(&self, fraction: f64) -> f64 {
        let fraction = clamp_time(fraction, 1.0);
        let real = self.virtual_to_real(self.virtual_duration * fraction);
        self.valid_real_time(real)
    }

    /// Returns playback progress over the virtual timeline as a percentage
    pub fn virtual_progress(&self, real: f64) -> f64 {
        if self.virtual_duration <= 0.0 {
            return 0.0;
        }
        let virtual_time = self.real_to_virtual(self.valid_real_time(real));
        virtual_time / self.virtual_duration * 100.0
    }
}
