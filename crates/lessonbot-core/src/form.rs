//! Input collector: topic text, optional grade and the single validation rule.
//!
//! The form knows nothing about the transport. Its caller passes the
//! `loading` flag into every operation; while it is set, edits and
//! submission are ignored.

use thiserror::Error;

use crate::model::{GradeLevel, LessonPlanRequest};

/// Local, synchronous validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a topic")]
    EmptyTopic,
}

/// Build a request from raw input.
///
/// The topic is trimmed; a topic with no visible characters is rejected.
pub fn build_request(
    topic: &str,
    grade: Option<GradeLevel>,
) -> Result<LessonPlanRequest, ValidationError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(ValidationError::EmptyTopic);
    }
    Ok(LessonPlanRequest::new(topic, grade))
}

/// Which control currently has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Topic,
    Grade,
    Submit,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            Self::Topic => Self::Grade,
            Self::Grade => Self::Submit,
            Self::Submit => Self::Topic,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Topic => Self::Submit,
            Self::Grade => Self::Topic,
            Self::Submit => Self::Grade,
        }
    }
}

/// Editable state of the lesson plan form.
#[derive(Debug, Clone, Default)]
pub struct LessonPlanForm {
    topic: String,
    grade: Option<GradeLevel>,
    focus: FormField,
    error: Option<ValidationError>,
}

impl LessonPlanForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn grade(&self) -> Option<GradeLevel> {
        self.grade
    }

    /// Label shown in the grade selector.
    pub fn grade_label(&self) -> &'static str {
        self.grade.map(GradeLevel::label).unwrap_or("Any grade level")
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    /// Inline validation error from the last submit attempt.
    pub fn error(&self) -> Option<ValidationError> {
        self.error
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self, loading: bool) -> bool {
        !loading && !self.topic.trim().is_empty()
    }

    // -- Focus --

    pub fn focus_next(&mut self, loading: bool) {
        if !loading {
            self.focus = self.focus.next();
        }
    }

    pub fn focus_prev(&mut self, loading: bool) {
        if !loading {
            self.focus = self.focus.prev();
        }
    }

    // -- Topic editing --

    pub fn insert_char(&mut self, c: char, loading: bool) {
        if loading || c.is_control() {
            return;
        }
        self.topic.push(c);
    }

    pub fn backspace(&mut self, loading: bool) {
        if !loading {
            self.topic.pop();
        }
    }

    pub fn set_topic(&mut self, topic: impl Into<String>, loading: bool) {
        if !loading {
            self.topic = topic.into();
        }
    }

    // -- Grade selection --

    /// Cycle forward through `Any, Kindergarten, ..., 12th Grade`.
    pub fn next_grade(&mut self, loading: bool) {
        if loading {
            return;
        }
        self.grade = match self.grade_position() {
            None => GradeLevel::ALL.first().copied(),
            Some(i) => GradeLevel::ALL.get(i + 1).copied(),
        };
    }

    /// Cycle backward through the same list.
    pub fn prev_grade(&mut self, loading: bool) {
        if loading {
            return;
        }
        self.grade = match self.grade_position() {
            None => GradeLevel::ALL.last().copied(),
            Some(0) => None,
            Some(i) => GradeLevel::ALL.get(i - 1).copied(),
        };
    }

    pub fn set_grade(&mut self, grade: Option<GradeLevel>, loading: bool) {
        if !loading {
            self.grade = grade;
        }
    }

    fn grade_position(&self) -> Option<usize> {
        let grade = self.grade?;
        GradeLevel::ALL.iter().position(|g| *g == grade)
    }

    // -- Submission --

    /// Validate and produce a request.
    ///
    /// Returns `None` while loading or when validation fails; in the latter
    /// case the inline error is set. Field contents are never cleared.
    pub fn submit(&mut self, loading: bool) -> Option<LessonPlanRequest> {
        if loading {
            return None;
        }
        self.error = None;
        match build_request(&self.topic, self.grade) {
            Ok(request) => Some(request),
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(topic: &str) -> LessonPlanForm {
        let mut form = LessonPlanForm::new();
        form.set_topic(topic, false);
        form
    }

    #[test]
    fn submit_trims_topic() {
        for raw in ["Photosynthesis", "  Photosynthesis", "Photosynthesis \t\n", " \u{a0}Photosynthesis "] {
            let mut form = form_with(raw);
            let request = form.submit(false).expect("non-blank topic should submit");
            assert_eq!(request.topic, "Photosynthesis", "input {raw:?}");
            assert!(form.error().is_none());
        }
    }

    #[test]
    fn blank_topic_is_blocked_with_inline_error() {
        for raw in ["", " ", "\t\n  "] {
            let mut form = form_with(raw);
            assert!(form.submit(false).is_none(), "input {raw:?}");
            assert_eq!(form.error(), Some(ValidationError::EmptyTopic));
            assert_eq!(
                form.error().map(|e| e.to_string()).as_deref(),
                Some("Please enter a topic")
            );
        }
    }

    #[test]
    fn successful_submit_clears_previous_error() {
        let mut form = form_with("   ");
        assert!(form.submit(false).is_none());
        assert!(form.error().is_some());

        form.set_topic("Volcanoes", false);
        assert!(form.submit(false).is_some());
        assert!(form.error().is_none());
    }

    #[test]
    fn failed_submit_keeps_field_contents() {
        let mut form = form_with("  ");
        form.set_grade(Some(GradeLevel::Third), false);
        form.submit(false);
        assert_eq!(form.topic(), "  ");
        assert_eq!(form.grade(), Some(GradeLevel::Third));
    }

    #[test]
    fn any_grade_is_omitted_from_request() {
        let mut form = form_with("Fractions");
        let request = form.submit(false).unwrap();
        assert_eq!(request.grade_level, None);

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("grade_level").is_none());
    }

    #[test]
    fn selected_grade_is_sent_as_label() {
        let mut form = form_with("Fractions");
        form.set_grade(Some(GradeLevel::Fifth), false);
        let request = form.submit(false).unwrap();
        assert_eq!(request.grade_level.as_deref(), Some("5th Grade"));
    }

    #[test]
    fn loading_locks_every_edit_and_submit() {
        let mut form = form_with("Fractions");
        form.insert_char('!', true);
        form.backspace(true);
        form.set_topic("Other", true);
        form.next_grade(true);
        form.focus_next(true);

        assert_eq!(form.topic(), "Fractions");
        assert_eq!(form.grade(), None);
        assert_eq!(form.focus(), FormField::Topic);
        assert!(form.submit(true).is_none());
        assert!(!form.can_submit(true));
        assert!(form.error().is_none());
    }

    #[test]
    fn can_submit_requires_visible_topic() {
        assert!(!form_with("").can_submit(false));
        assert!(!form_with("   ").can_submit(false));
        assert!(form_with("x").can_submit(false));
    }

    #[test]
    fn typing_builds_topic_and_ignores_control_chars() {
        let mut form = LessonPlanForm::new();
        for c in "Rocks\n".chars() {
            form.insert_char(c, false);
        }
        assert_eq!(form.topic(), "Rocks");
        form.backspace(false);
        assert_eq!(form.topic(), "Rock");
    }

    #[test]
    fn grade_cycles_through_any_and_all_labels() {
        let mut form = LessonPlanForm::new();
        assert_eq!(form.grade_label(), "Any grade level");

        form.next_grade(false);
        assert_eq!(form.grade(), Some(GradeLevel::Kindergarten));

        for _ in 0..12 {
            form.next_grade(false);
        }
        assert_eq!(form.grade(), Some(GradeLevel::Twelfth));

        form.next_grade(false);
        assert_eq!(form.grade(), None);

        form.prev_grade(false);
        assert_eq!(form.grade(), Some(GradeLevel::Twelfth));

        form.set_grade(Some(GradeLevel::Kindergarten), false);
        form.prev_grade(false);
        assert_eq!(form.grade(), None);
    }

    #[test]
    fn focus_wraps_in_both_directions() {
        let mut form = LessonPlanForm::new();
        form.focus_next(false);
        assert_eq!(form.focus(), FormField::Grade);
        form.focus_next(false);
        assert_eq!(form.focus(), FormField::Submit);
        form.focus_next(false);
        assert_eq!(form.focus(), FormField::Topic);
        form.focus_prev(false);
        assert_eq!(form.focus(), FormField::Submit);
    }

    #[test]
    fn build_request_rejects_blank_topic() {
        assert_eq!(build_request(" \n", None), Err(ValidationError::EmptyTopic));
        let request = build_request(" Tides ", Some(GradeLevel::Ninth)).unwrap();
        assert_eq!(request.topic, "Tides");
        assert_eq!(request.grade_level.as_deref(), Some("9th Grade"));
    }
}
