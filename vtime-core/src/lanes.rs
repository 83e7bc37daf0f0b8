//! Lane assignment for overlapping visible segments
//!
//! Visible segments are laid out in virtual time so that no two segments
//! sharing a lane overlap. Lanes are filled greedily, earliest start first,
//! which uses the minimum number of lanes for interval graphs.

use crate::annotation::{Segment, Tag, TagVisibility};
use crate::engine::VirtualTimeline;

/// Assigns a lane index to every `(start, end)` span, returned in input order.
///
/// Spans are visited by ascending start, ties keeping input order. A span
/// takes the first lane whose last end is `<= start`, otherwise it opens a new
/// lane. Touching spans may share a lane.
pub fn assign_lanes(spans: &[(f64, f64)]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..spans.len()).collect();
    // sort_by is stable, so equal starts stay in input order
    order.sort_by(|&a, &b| spans[a].0.total_cmp(&spans[b].0));

    let mut lane_ends: Vec<f64> = Vec::new();
    let mut lanes = vec![0; spans.len()];
    for idx in order {
        let (start, end) = spans[idx];
        let lane = match lane_ends.iter().position(|&lane_end| lane_end <= start) {
            Some(free) => {
                lane_ends[free] = end;
                free
            }
            None => {
                lane_ends.push(end);
                lane_ends.len() - 1
            }
        };
        lanes[idx] = lane;
    }
    lanes
}

/// A visible segment placed on the virtual timeline
#[derive(Debug, Clone, PartialEq)]
pub struct LanedSegment {
    /// The annotated segment
    pub segment: Segment,
    /// Virtual start in seconds
    pub start_v: f64,
    /// Virtual end in seconds
    pub end_v: f64,
    /// Display track, 0 is the top lane
    pub lane: usize,
    /// Horizontal offset as a fraction of the virtual duration
    pub left_fraction: f64,
    /// Width as a fraction of the virtual duration
    pub width_fraction: f64,
}

/// Lane layout of every visible segment
#[derive(Debug, Clone, PartialEq)]
pub struct LaneLayout {
    /// Segments ordered by virtual start
    pub segments: Vec<LanedSegment>,
    /// Number of lanes to render, never less than 1
    pub lane_count: usize,
}

impl LaneLayout {
    /// Lays out the visible segments of a snapshot.
    ///
    /// Returns an empty single-lane layout while the virtual duration is 0.
    pub fn build(timeline: &VirtualTimeline, segments: &[Segment], tags: &[Tag]) -> Self {
        let virtual_duration = timeline.virtual_duration();
        if virtual_duration <= 0.0 {
            return Self {
                segments: Vec::new(),
                lane_count: 1,
            };
        }

        let visibility = TagVisibility::new(tags);
        let visible: Vec<&Segment> = visibility.visible(segments).collect();
        let spans: Vec<(f64, f64)> = visible
            .iter()
            .map(|s| {
                let iv = s.interval();
                (
                    timeline.real_to_virtual(iv.start),
                    timeline.real_to_virtual(iv.end),
                )
            })
            .collect();
        let lanes = assign_lanes(&spans);

        let mut laid: Vec<LanedSegment> = visible
            .into_iter()
            .zip(spans)
            .zip(lanes)
            .map(|((segment, (start_v, end_v)), lane)| LanedSegment {
                segment: segment.clone(),
                start_v,
                end_v,
                lane,
                left_fraction: start_v / virtual_duration,
                width_fraction: (end_v - start_v) / virtual_duration,
            })
            .collect();
        laid.sort_by(|a, b| a.start_v.total_cmp(&b.start_v));

        let lane_count = laid.iter().map(|s| s.lane + 1).max().unwrap_or(1);
        Self {
            segments: laid,
            lane_count,
        }
    }

    /// Finds the placement of a segment by id
    pub fn get(&self, segment_id: &str) -> Option<&LanedSegment> {
        self.segments.iter().find(|s| s.segment.id == segment_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;

    /// Maximum number of spans covering a single instant, half-open semantics
    fn max_overlap(spans: &[(f64, f64)]) -> usize {
        let mut events: Vec<(f64, i32)> = Vec::new();
        for &(s, e) in spans {
            events.push((s, 1));
            events.push((e, -1));
        }
        // Ends sort before starts at the same instant
        events.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let mut current = 0i32;
        let mut best = 0i32;
        for (_, delta) in events {
            current += delta;
            best = best.max(current);
        }
        best as usize
    }

    fn overlaps(a: (f64, f64), b: (f64, f64)) -> bool {
        a.0 < b.1 && b.0 < a.1
    }

    #[test]
    fn test_overlapping_pair_uses_two_lanes() {
        let lanes = assign_lanes(&[(10.0, 30.0), (20.0, 60.0)]);
        assert_eq!(lanes, vec![0, 1]);
    }

    #[test]
    fn test_touching_spans_share_lane() {
        let lanes = assign_lanes(&[(0.0, 10.0), (10.0, 20.0), (20.0, 30.0)]);
        assert_eq!(lanes, vec![0, 0, 0]);
    }

    #[test]
    fn test_results_in_input_order() {
        let lanes = assign_lanes(&[(20.0, 60.0), (10.0, 30.0), (40.0, 50.0)]);
        // Sorted visit: (10,30)->0, (20,60)->1, (40,50)->0
        assert_eq!(lanes, vec![1, 0, 0]);
    }

    #[test]
    fn test_equal_starts_keep_input_order() {
        let lanes = assign_lanes(&[(5.0, 9.0), (5.0, 7.0), (5.0, 6.0)]);
        assert_eq!(lanes, vec![0, 1, 2]);
    }

    #[test]
    fn test_lane_non_overlap_and_minimality() {
        let cases: Vec<Vec<(f64, f64)>> = vec![
            vec![(0.0, 5.0), (1.0, 3.0), (2.0, 8.0), (4.0, 6.0), (7.0, 9.0), (8.5, 12.0)],
            vec![(0.0, 100.0), (10.0, 20.0), (20.0, 30.0), (25.0, 35.0), (90.0, 110.0)],
            vec![(3.0, 4.0), (1.0, 2.0), (0.0, 10.0), (2.0, 3.0), (1.5, 2.5)],
            (0..20)
                .map(|i| {
                    let start = (i * 7 % 13) as f64;
                    (start, start + 1.0 + (i % 4) as f64)
                })
                .collect(),
        ];

        for spans in cases {
            let lanes = assign_lanes(&spans);
            for i in 0..spans.len() {
                for j in (i + 1)..spans.len() {
                    if lanes[i] == lanes[j] {
                        assert!(
                            !overlaps(spans[i], spans[j]),
                            "{:?} and {:?} share lane {}",
                            spans[i],
                            spans[j],
                            lanes[i]
                        );
                    }
                }
            }
            let used = lanes.iter().max().map_or(0, |m| m + 1);
            assert_eq!(used, max_overlap(&spans));
        }
    }

    #[test]
    fn test_layout_from_timeline() {
        let tags = vec![
            Tag::new("a", "A", "#ff4444", false),
            Tag::new("b", "B", "#cddc39", false),
            Tag::new("h", "Discardable", "#424242", true),
        ];
        let segments = vec![
            Segment::new("s2", "b", 20.0, 60.0),
            Segment::new("s1", "a", 10.0, 30.0),
            Segment::new("gap", "h", 70.0, 80.0),
        ];
        let timeline = VirtualTimeline::new(&segments, &tags, 100.0);
        let layout = LaneLayout::build(&timeline, &segments, &tags);

        assert_eq!(layout.lane_count, 2);
        assert_eq!(layout.segments.len(), 2);
        assert_eq!(layout.segments[0].segment.id, "s1");
        assert_eq!(layout.get("s1").map(|s| s.lane), Some(0));
        assert_eq!(layout.get("s2").map(|s| s.lane), Some(1));
        assert!(layout.get("gap").is_none());

        let s2 = layout.get("s2").unwrap();
        assert_eq!(s2.start_v, 20.0);
        assert_eq!(s2.end_v, 60.0);
        assert!((s2.left_fraction - 20.0 / 90.0).abs() < 1e-12);
        assert!((s2.width_fraction - 40.0 / 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_layout_uses_virtual_time() {
        // The hidden gap pulls the second segment back against the first
        let tags = vec![
            Tag::new("a", "A", "#fff", false),
            Tag::new("h", "Hidden", "#000", true),
        ];
        let segments = vec![
            Segment::new("s1", "a", 0.0, 10.0),
            Segment::new("cut", "h", 10.0, 20.0),
            Segment::new("s2", "a", 15.0, 30.0),
        ];
        let timeline = VirtualTimeline::new(&segments, &tags, 40.0);
        let layout = LaneLayout::build(&timeline, &segments, &tags);

        let s2 = layout.get("s2").unwrap();
        assert_eq!(s2.start_v, 10.0);
        assert_eq!(s2.end_v, 20.0);
        assert_eq!(s2.lane, 0);
        assert_eq!(layout.lane_count, 1);
    }

    #[test]
    fn test_layout_empty_when_no_virtual_time() {
        let timeline = VirtualTimeline::from_hidden_intervals(vec![Interval::new(0.0, 50.0)], 50.0);
        let segments = vec![Segment::new("s1", "a", 0.0, 10.0)];
        let layout = LaneLayout::build(&timeline, &segments, &[]);
        assert!(layout.segments.is_empty());
        assert_eq!(layout.lane_count, 1);
    }
}
