//! Cooperative playback synchronization
//!
//! A host calls [`PlaybackSync::tick`] from its frame or timer callback. Each
//! tick reads the playback position, pushes it out of hidden intervals, and
//! reports virtual progress. Stopping the tick source needs no cleanup here.

use crate::engine::VirtualTimeline;
use crate::navigation::Navigator;
use tracing::trace;

/// External media clock driven by the engine
pub trait PlaybackSource {
    /// Current playback position in real time (seconds)
    fn current_time(&self) -> f64;

    /// Moves playback to a real time position (seconds)
    fn seek(&mut self, real: f64);
}

/// Outcome of one polling tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Real position after snapping
    pub real: f64,
    /// Matching virtual position
    pub virtual_time: f64,
    /// Virtual progress as a percentage
    pub progress: f64,
    /// Whether the source was seeked out of a hidden interval
    pub corrected: bool,
}

/// Glue between a playback source and a virtual timeline
#[derive(Debug, Clone, Copy)]
pub struct PlaybackSync<'a> {
    timeline: &'a VirtualTimeline,
    navigator: &'a Navigator,
}

impl<'a> PlaybackSync<'a> {
    /// Creates a sync helper over a timeline and its navigator
    pub fn new(timeline: &'a VirtualTimeline, navigator: &'a Navigator) -> Self {
        Self {
            timeline,
            navigator,
        }
    }

    /// Polls the source once, seeking only when the position needs snapping.
    ///
    /// While the real duration is still 0 (media metadata not loaded) the
    /// source is left alone and progress reads 0.
    pub fn tick<S: PlaybackSource + ?Sized>(&self, source: &mut S) -> Tick {
        let current = source.current_time();
        if self.timeline.real_duration() <= 0.0 {
            return Tick {
                real: current,
                virtual_time: 0.0,
                progress: 0.0,
                corrected: false,
            };
        }
        let real = self.timeline.valid_real_time(current);
        let corrected = real != current;
        if corrected {
            trace!(from = current, to = real, "skipping hidden interval");
            source.seek(real);
        }
        Tick {
            real,
            virtual_time: self.timeline.real_to_virtual(real),
            progress: self.timeline.virtual_progress(real),
            corrected,
        }
    }

    /// Seeks to a fraction of the virtual timeline, returning the real target
    pub fn seek_to_fraction<S: PlaybackSource + ?Sized>(
        &self,
        source: &mut S,
        fraction: f64,
    ) -> f64 {
        let target = self.timeline.seek_target(fraction);
        source.seek(target);
        target
    }

    /// Skips to the next cut point. Returns the target, or `None` when there
    /// is nothing ahead and the source was left untouched.
    pub fn skip_forward<S: PlaybackSource + ?Sized>(&self, source: &mut S) -> Option<f64> {
        let target = self
            .navigator
            .next(source.current_time())
            .map(|p| self.timeline.valid_real_time(p))?;
        source.seek(target);
        Some(target)
    }

    /// Skips to the previous cut point, or to the start of the recording
    pub fn skip_backward<S: PlaybackSource + ?Sized>(&self, source: &mut S) -> f64 {
        let target = self
            .timeline
            .valid_real_time(self.navigator.previous(source.current_time()));
        source.seek(target);
        target
    }
}
