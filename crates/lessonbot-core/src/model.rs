use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Grade levels
// ---------------------------------------------------------------------------

/// Target audience of a lesson plan.
///
/// "Any grade level" is not a variant: it is the absence of a grade
/// (`Option<GradeLevel>::None`) and is never sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradeLevel {
    Kindergarten,
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
    Ninth,
    Tenth,
    Eleventh,
    Twelfth,
}

impl GradeLevel {
    /// Every grade in display order.
    pub const ALL: [GradeLevel; 13] = [
        Self::Kindergarten,
        Self::First,
        Self::Second,
        Self::Third,
        Self::Fourth,
        Self::Fifth,
        Self::Sixth,
        Self::Seventh,
        Self::Eighth,
        Self::Ninth,
        Self::Tenth,
        Self::Eleventh,
        Self::Twelfth,
    ];

    /// The wire label, e.g. `"5th Grade"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Kindergarten => "Kindergarten",
            Self::First => "1st Grade",
            Self::Second => "2nd Grade",
            Self::Third => "3rd Grade",
            Self::Fourth => "4th Grade",
            Self::Fifth => "5th Grade",
            Self::Sixth => "6th Grade",
            Self::Seventh => "7th Grade",
            Self::Eighth => "8th Grade",
            Self::Ninth => "9th Grade",
            Self::Tenth => "10th Grade",
            Self::Eleventh => "11th Grade",
            Self::Twelfth => "12th Grade",
        }
    }

    /// Parse an optional grade: `"any"` and blank input mean no grade.
    pub fn parse_optional(s: &str) -> Result<Option<Self>, GradeLevelParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("any") {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GradeLevel {
    type Err = GradeLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|g| g.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| GradeLevelParseError(s.to_owned()))
    }
}

/// Error returned when parsing an unknown grade label.
#[derive(Debug, Clone, Error)]
#[error("invalid grade level: {0:?} (expected e.g. \"Kindergarten\" or \"5th Grade\")")]
pub struct GradeLevelParseError(pub String);

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Body of `POST /create-lesson-plan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonPlanRequest {
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<String>,
}

impl LessonPlanRequest {
    pub fn new(topic: impl Into<String>, grade: Option<GradeLevel>) -> Self {
        Self {
            topic: topic.into(),
            grade_level: grade.map(|g| g.label().to_string()),
        }
    }
}

/// One timed segment of the lesson overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonTopic {
    pub title: String,
    pub duration_minutes: u32,
    pub description: String,
}

/// A generated lesson plan. Produced by the backend, never mutated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonPlan {
    pub topic: String,
    pub grade_level: String,
    pub duration_minutes: u32,
    pub learning_objectives: Vec<String>,
    pub materials_needed: Vec<String>,
    pub lesson_overview: Vec<LessonTopic>,
    pub exercises: Vec<String>,
    pub assessment: Vec<String>,
    pub urls: Vec<String>,
}

/// Response envelope of `POST /create-lesson-plan`.
///
/// `lesson_plan` is meaningful when `success` is true, `error` when it is
/// false. The client does not enforce this; the orchestrator does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonPlanResponse {
    pub success: bool,
    #[serde(default)]
    pub lesson_plan: Option<LessonPlan>,
    #[serde(default)]
    pub error: Option<String>,
    pub message: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
