//! Markers for hidden segments on a virtual scrubber

use crate::annotation::{Segment, Tag, TagVisibility};
use crate::engine::VirtualTimeline;

/// Where a hidden segment collapses to on the virtual timeline
#[derive(Debug, Clone, PartialEq)]
pub struct HiddenMarker {
    /// The hidden segment
    pub segment: Segment,
    /// Virtual position the segment collapses to
    pub point_v: f64,
    /// Real time skipped by this segment alone, in seconds
    pub duration_real: f64,
    /// Horizontal offset as a fraction of the virtual duration
    pub left_fraction: f64,
}

/// Builds one marker per hidden-tag segment, in collection order.
///
/// Overlapping hidden segments each get their own marker; the merged
/// partition is available from [`VirtualTimeline::hidden_segments`].
pub fn hidden_markers(
    timeline: &VirtualTimeline,
    segments: &[Segment],
    tags: &[Tag],
) -> Vec<HiddenMarker> {
    let virtual_duration = timeline.virtual_duration();
    if virtual_duration <= 0.0 {
        return Vec::new();
    }

    TagVisibility::new(tags)
        .hidden(segments)
        .map(|segment| {
            let point_v = timeline.real_to_virtual(segment.interval().start);
            HiddenMarker {
                segment: segment.clone(),
                point_v,
                duration_real: segment.duration_real(),
                left_fraction: point_v / virtual_duration,
            }
        })
        .collect()
}
