use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;

use lessonbot_core::display::{LessonPlanView, render_markdown, render_text};
use lessonbot_core::form::build_request;
use lessonbot_core::{GradeLevel, LessonPlan, LessonPlanApi, Orchestrator, Phase};

/// How `lessonbot create` prints the generated plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

/// Render a plan in the requested format.
pub fn render_plan(plan: &LessonPlan, format: OutputFormat) -> Result<String> {
    let view = LessonPlanView::from(plan);
    Ok(match format {
        OutputFormat::Text => render_text(&view),
        OutputFormat::Markdown => render_markdown(&view),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(plan).context("failed to serialize lesson plan")?;
            json.push('\n');
            json
        }
    })
}

/// Run one submission cycle and return the plan, or the user-facing error.
pub async fn create_plan(
    api: &dyn LessonPlanApi,
    topic: &str,
    grade: Option<&str>,
) -> Result<LessonPlan> {
    let grade = match grade {
        Some(raw) => GradeLevel::parse_optional(raw)?,
        None => None,
    };
    let request = build_request(topic, grade)?;

    tracing::info!(
        topic = %request.topic,
        grade = request.grade_level.as_deref().unwrap_or("any"),
        "creating lesson plan"
    );

    let mut orchestrator = Orchestrator::new();
    orchestrator.submit(api, request).await?;

    match orchestrator.phase() {
        Phase::Success(plan) => Ok(plan.clone()),
        Phase::Failure { message, .. } => bail!("{message}"),
        Phase::Idle | Phase::Submitting => bail!("lesson plan submission did not complete"),
    }
}

/// Execute `lessonbot create`.
pub async fn run_create(
    api: &dyn LessonPlanApi,
    topic: &str,
    grade: Option<&str>,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let plan = create_plan(api, topic, grade).await?;
    let rendered = render_plan(&plan, format)?;

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write lesson plan to {}", path.display()))?;
            println!("Lesson plan written to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
