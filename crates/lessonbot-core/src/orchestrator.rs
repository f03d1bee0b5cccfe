//! Submission state machine.
//!
//! ```text
//! Idle       -> Submitting            (begin_submission)
//! Failure    -> Submitting            (begin_submission, replaces the error)
//! Submitting -> Success(plan)         (complete_submission, success with plan)
//! Submitting -> Failure(message)      (complete_submission, anything else)
//! Success    -> Idle                  (back)
//! Failure    -> Idle                  (dismiss_error, or tick after 6s)
//! ```
//!
//! The orchestrator is the only owner of this state. The form and the
//! result display read snapshots through [`Orchestrator::phase`].

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::client::{ClientError, LessonPlanApi};
use crate::model::{LessonPlan, LessonPlanRequest, LessonPlanResponse};

/// How long a failure notification stays up before it is dismissed.
pub const ERROR_AUTO_DISMISS: Duration = Duration::from_secs(6);

/// Message shown when neither the server nor the transport said anything.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Current state of the submission cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Success(LessonPlan),
    Failure { message: String, raised_at: Instant },
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Success(_) => "success",
            Self::Failure { .. } => "failure",
        }
    }
}

/// Illegal transitions requested by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a lesson plan request is already in flight")]
    AlreadySubmitting,
    #[error("a lesson plan is being displayed; go back before submitting again")]
    PlanDisplayed,
    #[error("no lesson plan request is in flight")]
    NotSubmitting,
}

/// Turn a client outcome into either a plan or a user-visible message.
pub fn resolve_outcome(
    outcome: Result<LessonPlanResponse, ClientError>,
) -> Result<LessonPlan, String> {
    match outcome {
        Ok(LessonPlanResponse {
            success: true,
            lesson_plan: Some(plan),
            ..
        }) => Ok(plan),
        Ok(response) => Err(first_non_blank([
            response.error.as_deref(),
            Some(response.message.as_str()),
        ])),
        Err(e) => Err(first_non_blank([Some(e.to_string().as_str())])),
    }
}

fn first_non_blank<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> String {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(UNEXPECTED_ERROR_MESSAGE)
        .to_string()
}

/// Owner of the submission state.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    phase: Phase,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    pub fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// True exactly while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Submitting)
    }

    pub fn plan(&self) -> Option<&LessonPlan> {
        match &self.phase {
            Phase::Success(plan) => Some(plan),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failure { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Enter `Submitting`. Hands the request back so the caller can send it.
    pub fn begin_submission(
        &mut self,
        request: LessonPlanRequest,
    ) -> Result<LessonPlanRequest, SubmitError> {
        match self.phase {
            Phase::Submitting => return Err(SubmitError::AlreadySubmitting),
            Phase::Success(_) => return Err(SubmitError::PlanDisplayed),
            Phase::Idle | Phase::Failure { .. } => {}
        }
        debug!(topic = %request.topic, "submission started");
        self.phase = Phase::Submitting;
        Ok(request)
    }

    /// Resolve the in-flight submission with the client's outcome.
    pub fn complete_submission(
        &mut self,
        outcome: Result<LessonPlanResponse, ClientError>,
    ) -> Result<(), SubmitError> {
        self.complete_submission_at(outcome, Instant::now())
    }

    /// Like [`Self::complete_submission`] with an explicit clock reading.
    pub fn complete_submission_at(
        &mut self,
        outcome: Result<LessonPlanResponse, ClientError>,
        now: Instant,
    ) -> Result<(), SubmitError> {
        if !self.is_loading() {
            return Err(SubmitError::NotSubmitting);
        }
        self.phase = match resolve_outcome(outcome) {
            Ok(plan) => {
                info!(topic = %plan.topic, "lesson plan received");
                Phase::Success(plan)
            }
            Err(message) => {
                warn!(%message, "lesson plan submission failed");
                Phase::Failure {
                    message,
                    raised_at: now,
                }
            }
        };
        Ok(())
    }

    /// Run one full submission cycle against `api`.
    pub async fn submit<A>(&mut self, api: &A, request: LessonPlanRequest) -> Result<(), SubmitError>
    where
        A: LessonPlanApi + ?Sized,
    {
        let request = self.begin_submission(request)?;
        let outcome = api.create_lesson_plan(&request).await;
        self.complete_submission(outcome)
    }

    /// Leave the result display: discards the plan and any error.
    pub fn back(&mut self) {
        if matches!(self.phase, Phase::Success(_)) {
            self.phase = Phase::Idle;
        }
    }

    /// Clear a failure notification. Never touches a displayed plan.
    pub fn dismiss_error(&mut self) {
        if matches!(self.phase, Phase::Failure { .. }) {
            self.phase = Phase::Idle;
        }
    }

    /// Auto-dismiss a failure that has been visible for too long.
    pub fn tick(&mut self, now: Instant) {
        if let Phase::Failure { raised_at, .. } = &self.phase {
            if now.saturating_duration_since(*raised_at) >= ERROR_AUTO_DISMISS {
                self.phase = Phase::Idle;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
