//! Section slicing over linearized documents.
//!
//! A section is the run of lines from the first line matching a start marker
//! up to, but not including, the first line at or after it matching an end
//! marker. Markers match case-insensitively on word boundaries, so
//! `"Item 1"` never matches a line reading `"Item 10"`.

use crate::error::{DataError, Result};
use crate::scan::find_from;
use regex::{Regex, RegexBuilder};

/// How a marker bound was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerOutcome {
    /// No marker was supplied; the default bound applies.
    Unused,
    /// The marker matched the line at this index.
    Matched(usize),
    /// The marker matched nothing; the default bound applies.
    Missed,
}

impl MarkerOutcome {
    /// Whether a supplied marker fell back to the default bound.
    pub const fn is_missed(&self) -> bool {
        matches!(self, Self::Missed)
    }
}

/// Half-open line range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRange {
    /// First line of the section
    pub start: usize,
    /// One past the last line of the section
    pub end: usize,
}

impl SectionRange {
    /// Number of lines covered.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the range covers no lines.
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// A sliced section and how its bounds were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// The section's lines, in document order
    pub lines: Vec<String>,
    /// Where the section sits in the input
    pub range: SectionRange,
    /// How the start bound was settled
    pub start: MarkerOutcome,
    /// How the end bound was settled
    pub end: MarkerOutcome,
}

impl Section {
    /// Whether the section has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether either supplied marker fell back to a default bound.
    pub const fn used_fallback(&self) -> bool {
        self.start.is_missed() || self.end.is_missed()
    }
}

#[derive(Debug, Clone)]
struct Marker {
    text: String,
    pattern: Regex,
}

impl Marker {
    fn compile(text: Option<&str>) -> Result<Option<Self>> {
        let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(text)))
            .case_insensitive(true)
            .build()
            .map_err(|e| DataError::InvalidMarker {
                marker: text.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Some(Self {
            text: text.to_string(),
            pattern,
        }))
    }

    fn bound<S: AsRef<str>>(
        marker: Option<&Self>,
        lines: &[S],
        from: usize,
        default: usize,
    ) -> (usize, MarkerOutcome) {
        let Some(marker) = marker else {
            return (default, MarkerOutcome::Unused);
        };
        match find_from(lines, from, |line| marker.pattern.is_match(line.as_ref())) {
            Some(index) => (index, MarkerOutcome::Matched(index)),
            None => (default, MarkerOutcome::Missed),
        }
    }
}

/// Slices linearized documents between a start and an end marker.
///
/// # Example
/// ```
/// use tenq_data::SectionSlicer;
///
/// let lines = ["Intro", "Section A", "body1", "body2", "Section B", "tail"];
/// let slicer = SectionSlicer::new(Some("Section A"), Some("Section B"))?;
/// let section = slicer.slice(&lines);
/// assert_eq!(section.lines, vec!["Section A", "body1", "body2"]);
/// # Ok::<(), tenq_data::DataError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SectionSlicer {
    start: Option<Marker>,
    end: Option<Marker>,
}

impl SectionSlicer {
    /// Build a slicer. Blank markers count as not supplied.
    ///
    /// # Errors
    /// Returns `DataError::InvalidMarker` if a marker is too large to compile.
    pub fn new(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        Ok(Self {
            start: Marker::compile(start)?,
            end: Marker::compile(end)?,
        })
    }

    /// Start marker as it is matched.
    pub fn start_marker(&self) -> Option<&str> {
        self.start.as_ref().map(|m| m.text.as_str())
    }

    /// End marker as it is matched.
    pub fn end_marker(&self) -> Option<&str> {
        self.end.as_ref().map(|m| m.text.as_str())
    }

    /// Locate the section bounds in `lines`.
    ///
    /// The start bound is the first matching line, or 0. The end bound is the
    /// first matching line at or after the start, or the input length. An end
    /// match on the start line itself gives an empty range.
    pub fn locate<S: AsRef<str>>(
        &self,
        lines: &[S],
    ) -> (SectionRange, MarkerOutcome, MarkerOutcome) {
        let (start, start_outcome) = Marker::bound(self.start.as_ref(), lines, 0, 0);
        let (end, end_outcome) = Marker::bound(self.end.as_ref(), lines, start, lines.len());
        (SectionRange { start, end }, start_outcome, end_outcome)
    }

    /// Copy out the section of `lines` between the markers.
    pub fn slice<S: AsRef<str>>(&self, lines: &[S]) -> Section {
        let (range, start, end) = self.locate(lines);
        let lines = lines[range.start..range.end]
            .iter()
            .map(|line| line.as_ref().to_string())
            .collect();
        Section {
            lines,
            range,
            start,
            end,
        }
    }

    /// Like [`slice`](Self::slice), but an empty section is an error.
    ///
    /// # Errors
    /// Returns `DataError::NoMatch` naming both markers when nothing lies
    /// between them.
    pub fn slice_non_empty<S: AsRef<str>>(&self, lines: &[S]) -> Result<Section> {
        let section = self.slice(lines);
        if section.is_empty() {
            return Err(DataError::NoMatch {
                start: self.start_marker().map(str::to_string),
                end: self.end_marker().map(str::to_string),
            });
        }
        Ok(section)
    }
}

/// One-shot slice of `lines` between `start` and `end`.
///
/// # Errors
/// Returns `DataError::InvalidMarker` if a marker cannot be compiled.
pub fn slice_section<S: AsRef<str>>(
    lines: &[S],
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Section> {
    Ok(SectionSlicer::new(start, end)?.slice(lines))
}
