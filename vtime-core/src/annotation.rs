//! Tags and annotated segments supplied by the annotation store

use crate::interval::Interval;
use std::collections::HashSet;

/// An annotation category
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Tag {
    /// Unique identifier for this tag
    pub id: String,
    /// Display name
    pub name: String,
    /// Display color, e.g. `#ff4444`
    pub color: String,
    /// Segments carrying a hidden tag are excised from virtual time
    pub is_hidden: bool,
}

impl Tag {
    /// Creates a new tag
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        is_hidden: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            is_hidden,
        }
    }
}

/// A tagged range of the raw recording.
///
/// Endpoints may arrive inverted; consumers go through [`Segment::interval`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Segment {
    /// Unique identifier for this segment
    pub id: String,
    /// Tag this segment belongs to
    pub tag_id: String,
    /// Start position in real time (seconds)
    pub start_real: f64,
    /// End position in real time (seconds)
    pub end_real: f64,
}

impl Segment {
    /// Creates a new segment
    pub fn new(
        id: impl Into<String>,
        tag_id: impl Into<String>,
        start_real: f64,
        end_real: f64,
    ) -> Self {
        Self {
            id: id.into(),
            tag_id: tag_id.into(),
            start_real,
            end_real,
        }
    }

    /// Returns the order-normalized real-time range of this segment
    pub fn interval(&self) -> Interval {
        Interval::new(self.start_real, self.end_real)
    }

    /// Returns the real-time length of this segment in seconds
    pub fn duration_real(&self) -> f64 {
        (self.end_real - self.start_real).abs()
    }
}

/// Lookup of which tag ids are hidden.
///
/// A segment whose `tag_id` has no matching tag is visible: mis-tagged data
/// must not vanish from the virtual timeline.
#[derive(Debug, Clone, Default)]
pub struct TagVisibility {
    hidden: HashSet<String>,
}

impl TagVisibility {
    /// Builds the lookup from a tag collection
    pub fn new(tags: &[Tag]) -> Self {
        Self {
            hidden: tags
                .iter()
                .filter(|t| t.is_hidden)
                .map(|t| t.id.clone())
                .collect(),
        }
    }

    /// Checks if a segment belongs to a hidden tag
    pub fn is_hidden(&self, segment: &Segment) -> bool {
        self.hidden.contains(&segment.tag_id)
    }

    /// Iterates over the segments whose tag is not hidden, in collection order
    pub fn visible<'v, 's: 'v>(
        &'v self,
        segments: &'s [Segment],
    ) -> impl Iterator<Item = &'s Segment> + 'v {
        segments.iter().filter(move |s| !self.is_hidden(s))
    }

    /// Iterates over the segments whose tag is hidden, in collection order
    pub fn hidden<'v, 's: 'v>(
        &'v self,
        segments: &'s [Segment],
    ) -> impl Iterator<Item = &'s Segment> + 'v {
        segments.iter().filter(move |s| self.is_hidden(s))
    }
}
