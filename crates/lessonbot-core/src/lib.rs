//! Core of the lessonbot client: wire model, transport, form validation,
//! plan presentation and the submission state machine.

pub mod client;
pub mod display;
pub mod form;
pub mod loading;
pub mod model;
pub mod orchestrator;

pub use client::{ClientConfig, ClientError, HttpLessonPlanClient, LessonPlanApi};
pub use model::{GradeLevel, HealthStatus, LessonPlan, LessonPlanRequest, LessonPlanResponse, LessonTopic};
pub use orchestrator::{Orchestrator, Phase};
