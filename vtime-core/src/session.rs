//! Session payload: a recording together with its tags and segments

use crate::annotation::{Segment, Tag};
use crate::engine::VirtualTimeline;
use crate::{Error, Result};
use std::collections::HashSet;

/// Snapshot handed over by the annotation store
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SessionPayload {
    /// Location of the media
    #[cfg_attr(feature = "serde", serde(default))]
    pub video_url: String,
    /// Real duration in seconds, when already known
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub duration: Option<f64>,
    /// Tag definitions
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<Tag>,
    /// Annotated segments
    #[cfg_attr(feature = "serde", serde(default))]
    pub segments: Vec<Segment>,
}

impl SessionPayload {
    /// Creates a new payload
    pub fn new(video_url: impl Into<String>, tags: Vec<Tag>, segments: Vec<Segment>) -> Self {
        Self {
            video_url: video_url.into(),
            duration: None,
            tags,
            segments,
        }
    }

    /// Checks id uniqueness and that every segment time is finite
    pub fn validate(&self) -> Result<()> {
        let mut tag_ids = HashSet::new();
        for tag in &self.tags {
            if !tag_ids.insert(tag.id.as_str()) {
                return Err(Error::DuplicateTagId(tag.id.clone()));
            }
        }

        let mut segment_ids = HashSet::new();
        for segment in &self.segments {
            if !segment_ids.insert(segment.id.as_str()) {
                return Err(Error::DuplicateSegmentId(segment.id.clone()));
            }
            if !segment.start_real.is_finite() || !segment.end_real.is_finite() {
                return Err(Error::NonFiniteTime {
                    segment_id: segment.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Real duration to start from: the recorded duration if present,
    /// otherwise the furthest segment endpoint.
    pub fn effective_duration(&self) -> f64 {
        self.duration.unwrap_or_else(|| {
            self.segments
                .iter()
                .map(|s| s.start_real.max(s.end_real))
                .fold(0.0, f64::max)
        })
    }

    /// Builds a timeline over this snapshot
    pub fn timeline(&self, real_duration: f64) -> VirtualTimeline {
        VirtualTimeline::new(&self.segments, &self.tags, real_duration)
    }

    /// Reads and validates a JSON payload
    #[cfg(feature = "serde")]
    pub fn read_json<R: std::io::Read>(reader: R) -> Result<Self> {
        let payload: Self = serde_json::from_reader(reader)?;
        payload.validate()?;
        Ok(payload)
    }

    /// Writes the payload as pretty-printed JSON
    #[cfg(feature = "serde")]
    pub fn write_json<W: std::io::Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Loads and validates a JSON payload from a file
    #[cfg(feature = "serde")]
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::read_json(std::io::BufReader::new(file))
    }

    /// Saves the payload to a file as JSON
    #[cfg(feature = "serde")]
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        use std::io::Write;

        let mut writer = std::io::BufWriter::new(std::fs::File::create(path)?);
        self.write_json(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
