//! Grading scheme models.
//!
//! A [`GradingScheme`] is owned by an academic department and holds two
//! ordered band tables: [`GradeBand`]s keyed on raw score and
//! [`CommentBand`]s keyed on GPA.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A score range mapped to a letter grade and point value.
///
/// Both bounds are inclusive.
///
/// # Example
///
/// ```
/// use result_engine::models::GradeBand;
/// use rust_decimal::Decimal;
///
/// let band = GradeBand {
///     min_score: Decimal::from(65),
///     max_score: Decimal::from(69),
///     grade: "B2".to_string(),
///     point: Decimal::from(6),
/// };
/// assert!(band.contains(Decimal::from(65)));
/// assert!(band.contains(Decimal::from(69)));
/// assert!(!band.contains(Decimal::from(70)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeBand {
    /// Lowest score in the band (inclusive).
    pub min_score: Decimal,
    /// Highest score in the band (inclusive).
    pub max_score: Decimal,
    /// The letter grade (e.g., "A", "B2").
    pub grade: String,
    /// The grade point earned per credit unit.
    pub point: Decimal,
}

impl GradeBand {
    /// Returns true if `score` falls within this band.
    pub fn contains(&self, score: Decimal) -> bool {
        self.min_score <= score && score <= self.max_score
    }
}

/// A GPA range mapped to a class-of-result comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentBand {
    /// Lowest GPA in the band (inclusive).
    pub min_score: Decimal,
    /// Highest GPA in the band (inclusive).
    pub max_score: Decimal,
    /// The comment (e.g., "Second Class Upper").
    pub comment: String,
}

impl CommentBand {
    /// Returns true if `value` falls within this band.
    pub fn contains(&self, value: Decimal) -> bool {
        self.min_score <= value && value <= self.max_score
    }
}

/// A department's grading scheme.
///
/// Band order is significant: resolution is first-match in table order.
/// Bands within a table are expected not to overlap; that is checked by the
/// tooling that edits schemes, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingScheme {
    /// The department that owns this scheme.
    pub department: String,
    /// Score bands in resolution order.
    pub grade_bands: Vec<GradeBand>,
    /// GPA comment bands in resolution order.
    #[serde(default)]
    pub comment_bands: Vec<CommentBand>,
}

impl GradingScheme {
    /// Returns every grade label in band order, without duplicates.
    pub fn grade_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::with_capacity(self.grade_bands.len());
        for band in &self.grade_bands {
            if !labels.contains(&band.grade.as_str()) {
                labels.push(band.grade.as_str());
            }
        }
        labels
    }

    /// Returns true if `grade` is a failing grade (a band worth zero points).
    pub fn is_failing_grade(&self, grade: &str) -> bool {
        self.grade_bands
            .iter()
            .any(|band| band.grade == grade && band.point.is_zero())
    }
}
