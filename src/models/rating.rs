//! Rating values and merged per-teacher records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shown in place of a rating a source has no value for.
pub const PLACEHOLDER: &str = "---";

/// The external sources ratings are collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingSource {
    /// Discussion board with one opinion poll per teacher topic
    PollBoard,
    /// Paginated site listing numeric ratings
    RatingSite,
}

impl RatingSource {
    pub const ALL: [RatingSource; 2] = [RatingSource::PollBoard, RatingSource::RatingSite];

    /// Column title used in the teachers table.
    pub fn column_title(&self) -> &'static str {
        match self {
            RatingSource::PollBoard => "VK rating",
            RatingSource::RatingSite => "professorrating.org",
        }
    }
}

impl fmt::Display for RatingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingSource::PollBoard => f.write_str("VK poll board"),
            RatingSource::RatingSite => f.write_str("professorrating.org"),
        }
    }
}

/// Decimal rating kept as source text to preserve its precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericRating(String);

impl NumericRating {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parsed value, if the text is a number.
    pub fn value(&self) -> Option<f64> {
        self.0.parse().ok()
    }

    /// Whether the site actually rated the teacher (`0.0` means unrated).
    pub fn is_rated(&self) -> bool {
        self.value().is_some_and(|v| v != 0.0)
    }
}

impl fmt::Display for NumericRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Formatted ratings of one teacher, one slot per source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRating {
    pub poll_board: String,
    pub rating_site: String,
}

impl MergedRating {
    /// Both slots empty.
    pub fn unrated() -> Self {
        Self {
            poll_board: PLACEHOLDER.to_string(),
            rating_site: PLACEHOLDER.to_string(),
        }
    }

    pub fn slot(&self, source: RatingSource) -> &str {
        match source {
            RatingSource::PollBoard => &self.poll_board,
            RatingSource::RatingSite => &self.rating_site,
        }
    }
}

/// Where a page count came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrigin {
    /// Read from the site's summary page
    Reported,
    /// Summary unavailable; configured default used instead
    Fallback,
}

/// Total number of listing pages on the rating site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCount {
    pub pages: u32,
    pub origin: PageOrigin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rating_is_unrated() {
        assert!(!NumericRating::new("0.0").is_rated());
        assert!(!NumericRating::new("0.00").is_rated());
        assert!(!NumericRating::new("n/a").is_rated());
        assert!(NumericRating::new("4.3").is_rated());
    }

    #[test]
    fn test_rating_keeps_source_text() {
        assert_eq!(NumericRating::new(" 4.30 ").to_string(), "4.30");
    }

    #[test]
    fn test_unrated_uses_placeholders() {
        let merged = MergedRating::unrated();
        for source in RatingSource::ALL {
            assert_eq!(merged.slot(source), PLACEHOLDER);
        }
    }
}
