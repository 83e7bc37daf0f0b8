//! vtime Core Library
//!
//! This library provides the virtual timeline engine: a recording with
//! discardable intervals excised, exposed as a shorter "virtual" timeline for
//! playback, seeking, navigation and display.

pub mod annotation;
pub mod engine;
pub mod interval;
pub mod lanes;
pub mod markers;
pub mod navigation;
pub mod playback;
pub mod session;
pub mod summary;

pub use annotation::{Segment, Tag, TagVisibility};
pub use engine::VirtualTimeline;
pub use interval::{normalize, Interval};
pub use lanes::{assign_lanes, LaneLayout, LanedSegment};
pub use markers::{hidden_markers, HiddenMarker};
pub use navigation::{NavigationConfig, Navigator};
pub use playback::{PlaybackSource, PlaybackSync, Tick};
pub use session::SessionPayload;
pub use summary::{format_clock, summarize, TagSummary};

/// Result type for vtime-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for vtime-core operations.
///
/// The engine itself never fails; these cover loading session payloads.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate tag id: {0}")]
    DuplicateTagId(String),

    #[error("Duplicate segment id: {0}")]
    DuplicateSegmentId(String),

    #[error("Segment {segment_id} has a non-finite time")]
    NonFiniteTime { segment_id: String },
}
