//! Per-tag summary of annotated segments

use crate::annotation::{Segment, Tag};

/// Segments recorded under one tag
#[derive(Debug, Clone, PartialEq)]
pub struct TagSummary<'a> {
    /// The tag
    pub tag: &'a Tag,
    /// Segments carrying this tag, ordered by real start
    pub segments: Vec<&'a Segment>,
}

impl TagSummary<'_> {
    /// Total real time covered by the segments, overlaps counted twice
    pub fn total_real(&self) -> f64 {
        self.segments.iter().map(|s| s.duration_real()).sum()
    }
}

/// Groups segments by tag, in tag order, skipping tags with no segments
pub fn summarize<'a>(tags: &'a [Tag], segments: &'a [Segment]) -> Vec<TagSummary<'a>> {
    tags.iter()
        .map(|tag| {
            let mut grouped: Vec<&Segment> =
                segments.iter().filter(|s| s.tag_id == tag.id).collect();
            grouped.sort_by(|a, b| a.start_real.total_cmp(&b.start_real));
            TagSummary {
                tag,
                segments: grouped,
            }
        })
        .filter(|group| !group.segments.is_empty())
        .collect()
}

/// Formats seconds as `m:ss`, truncating fractions
pub fn format_clock(secs: f64) -> String {
    let total = if secs.is_finite() { secs.max(0.0) as u64 } else { 0 };
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_groups_in_tag_order() {
        let tags = vec![
            Tag::new("t1", "Leadership", "#ff4444", false),
            Tag::new("t2", "Teamwork", "#cddc39", false),
            Tag::new("t4", "Discardable", "#424242", true),
        ];
        let segments = vec![
            Segment::new("s5", "t4", 90.0, 105.0),
            Segment::new("s1", "t1", 50.0, 60.0),
            Segment::new("s4", "t4", 35.0, 45.0),
            Segment::new("s0", "t1", 10.0, 30.0),
        ];
        let summary = summarize(&tags, &segments);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].tag.id, "t1");
        let ids: Vec<_> = summary[0].segments.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s0", "s1"]);
        assert_eq!(summary[0].total_real(), 30.0);
        assert_eq!(summary[1].tag.id, "t4");
        assert_eq!(summary[1].segments[0].id, "s4");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(59.9), "0:59");
        assert_eq!(format_clock(125.0), "2:05");
        assert_eq!(format_clock(-3.0), "0:00");
        assert_eq!(format_clock(f64::NAN), "0:00");
    }
}
