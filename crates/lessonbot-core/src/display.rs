//! Read-only presentation of a lesson plan.
//!
//! [`LessonPlanView`] is a render-neutral description of what the result
//! screen shows. The terminal UI draws it with ratatui; [`render_text`] and
//! [`render_markdown`] serialize it for the one-shot CLI.

use std::fmt::{self, Write};

use crate::model::LessonPlan;

pub const OBJECTIVES_HEADING: &str = "Learning Objectives";
pub const MATERIALS_HEADING: &str = "Materials Needed";
pub const OVERVIEW_HEADING: &str = "Lesson Overview";
pub const EXERCISES_HEADING: &str = "Classroom Exercises";
pub const ASSESSMENT_HEADING: &str = "Assessment Questions";
pub const SOURCES_HEADING: &str = "Source Materials";

/// Label of the affordance that discards the plan and returns to the form.
pub const BACK_LABEL: &str = "Create New Lesson Plan";

/// Format a duration: `"1h 15m"` from one hour up, `"45 minutes"` below.
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins} minutes")
    }
}

/// One overview segment, with its duration already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentView<'a> {
    pub title: &'a str,
    pub duration: String,
    pub description: &'a str,
}

/// A link chip in the sources section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceChip<'a> {
    pub label: String,
    pub url: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody<'a> {
    Bullets(&'a [String]),
    Segments(Vec<SegmentView<'a>>),
    Sources(Vec<SourceChip<'a>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub heading: &'static str,
    pub body: SectionBody<'a>,
}

/// Everything the result screen shows, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonPlanView<'a> {
    pub title: &'a str,
    pub grade: &'a str,
    pub duration: String,
    pub sections: Vec<Section<'a>>,
}

impl<'a> From<&'a LessonPlan> for LessonPlanView<'a> {
    fn from(plan: &'a LessonPlan) -> Self {
        let mut sections = vec![
            Section {
                heading: OBJECTIVES_HEADING,
                body: SectionBody::Bullets(&plan.learning_objectives),
            },
            Section {
                heading: MATERIALS_HEADING,
                body: SectionBody::Bullets(&plan.materials_needed),
            },
            Section {
                heading: OVERVIEW_HEADING,
                body: SectionBody::Segments(
                    plan.lesson_overview
                        .iter()
                        .map(|t| SegmentView {
                            title: &t.title,
                            duration: format_duration(t.duration_minutes),
                            description: &t.description,
                        })
                        .collect(),
                ),
            },
            Section {
                heading: EXERCISES_HEADING,
                body: SectionBody::Bullets(&plan.exercises),
            },
            Section {
                heading: ASSESSMENT_HEADING,
                body: SectionBody::Bullets(&plan.assessment),
            },
        ];

        if !plan.urls.is_empty() {
            sections.push(Section {
                heading: SOURCES_HEADING,
                body: SectionBody::Sources(
                    plan.urls
                        .iter()
                        .enumerate()
                        .map(|(i, url)| SourceChip {
                            label: format!("Source {}", i + 1),
                            url,
                        })
                        .collect(),
                ),
            });
        }

        Self {
            title: &plan.topic,
            grade: &plan.grade_level,
            duration: format_duration(plan.duration_minutes),
            sections,
        }
    }
}

impl LessonPlanView<'_> {
    /// Source chips, empty when the plan has no URLs.
    pub fn source_chips(&self) -> &[SourceChip<'_>] {
        self.sections
            .iter()
            .find_map(|s| match &s.body {
                SectionBody::Sources(chips) => Some(chips.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }
}

/// Plain-text rendering for terminals without the interactive UI.
pub fn render_text(view: &LessonPlanView<'_>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_text(&mut out, view);
    out
}

fn write_text(out: &mut String, view: &LessonPlanView<'_>) -> fmt::Result {
    writeln!(out, "{}", view.title)?;
    writeln!(out, "Grade: {} | Duration: {}", view.grade, view.duration)?;

    for section in &view.sections {
        writeln!(out)?;
        writeln!(out, "{}", section.heading)?;
        match &section.body {
            SectionBody::Bullets(items) => {
                for item in items.iter() {
                    writeln!(out, "  - {item}")?;
                }
            }
            SectionBody::Segments(segments) => {
                for (i, seg) in segments.iter().enumerate() {
                    writeln!(out, "  {}. {} ({})", i + 1, seg.title, seg.duration)?;
                    if !seg.description.is_empty() {
                        writeln!(out, "     {}", seg.description)?;
                    }
                }
            }
            SectionBody::Sources(chips) => {
                for chip in chips {
                    writeln!(out, "  [{}] {}", chip.label, chip.url)?;
                }
            }
        }
    }
    Ok(())
}

/// Markdown rendering, suitable for saving next to other course material.
pub fn render_markdown(view: &LessonPlanView<'_>) -> String {
    let mut out = String::new();
    let _ = write_markdown(&mut out, view);
    out
}

fn write_markdown(out: &mut String, view: &LessonPlanView<'_>) -> fmt::Result {
    writeln!(out, "# {}", view.title)?;
    writeln!(out)?;
    writeln!(
        out,
        "**Grade:** {} | **Duration:** {}",
        view.grade, view.duration
    )?;

    for section in &view.sections {
        writeln!(out)?;
        writeln!(out, "## {}", section.heading)?;
        writeln!(out)?;
        match &section.body {
            SectionBody::Bullets(items) => {
                for item in items.iter() {
                    writeln!(out, "- {item}")?;
                }
            }
            SectionBody::Segments(segments) => {
                for (i, seg) in segments.iter().enumerate() {
                    if i > 0 {
                        writeln!(out)?;
                    }
                    writeln!(out, "### {}. {} ({})", i + 1, seg.title, seg.duration)?;
                    if !seg.description.is_empty() {
                        writeln!(out)?;
                        writeln!(out, "{}", seg.description)?;
                    }
                }
            }
            SectionBody::Sources(chips) => {
                for chip in chips {
                    writeln!(out, "- [{}]({})", chip.label, chip.url)?;
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
