//! End-to-end submission cycles: form -> orchestrator -> client -> view.
//!
//! Uses both the HTTP mock backend and a scripted in-memory client that
//! counts calls, to prove blocked submissions never reach the network.

use std::sync::Arc;

use serde_json::json;

use lessonbot_core::display::{LessonPlanView, SectionBody, render_text};
use lessonbot_core::form::LessonPlanForm;
use lessonbot_core::orchestrator::UNEXPECTED_ERROR_MESSAGE;
use lessonbot_core::{
    ClientConfig, ClientError, GradeLevel, HttpLessonPlanClient, LessonPlanApi, LessonPlanRequest,
    LessonPlanResponse, Orchestrator, Phase,
};
use lessonbot_test_utils::{
    MockBackend, MockReply, ScriptedApi, failure_body, plan_json, sample_plan, success_body,
    unreachable_base_url,
};

/// Drive one cycle the way the interactive UI does.
async fn submit_form<A: LessonPlanApi + ?Sized>(
    form: &mut LessonPlanForm,
    orch: &mut Orchestrator,
    api: &A,
) -> bool {
    match form.submit(orch.is_loading()) {
        Some(request) => {
            orch.submit(api, request).await.expect("transition should be legal");
            true
        }
        None => false,
    }
}

#[tokio::test]
async fn photosynthesis_end_to_end() {
    let plan = plan_json(
        "Photosynthesis",
        "5th Grade",
        90,
        &["https://example.org/photosynthesis"],
    );
    let backend = MockBackend::start(MockReply::json(200, success_body(plan))).await;
    let client = HttpLessonPlanClient::new(ClientConfig::new(&backend.base_url)).unwrap();

    let mut form = LessonPlanForm::new();
    form.set_topic("Photosynthesis", false);
    form.set_grade(Some(GradeLevel::Fifth), false);

    let mut orch = Orchestrator::new();
    assert!(submit_form(&mut form, &mut orch, &client).await);

    assert_eq!(
        backend.requests()[0].body,
        json!({ "topic": "Photosynthesis", "grade_level": "5th Grade" })
    );

    let plan = orch.plan().expect("should reach success");
    let view = LessonPlanView::from(plan);
    assert_eq!(view.duration, "1h 30m");
    assert_eq!(view.source_chips().len(), 1);
    assert_eq!(view.source_chips()[0].label, "Source 1");
    assert!(render_text(&view).contains("Duration: 1h 30m"));
}

#[tokio::test]
async fn view_mirrors_plan_fields_in_order() {
    let plan = plan_json("Volcanoes", "8th Grade", 60, &[]);
    let backend = MockBackend::start(MockReply::json(200, success_body(plan))).await;
    let client = HttpLessonPlanClient::new(ClientConfig::new(&backend.base_url)).unwrap();

    let mut orch = Orchestrator::new();
    orch.submit(&client, LessonPlanRequest::new("Volcanoes", None))
        .await
        .unwrap();

    let plan = orch.plan().unwrap();
    let view = LessonPlanView::from(plan);
    assert_eq!(view.sections[0].body, SectionBody::Bullets(&plan.learning_objectives));
    assert_eq!(view.sections[3].body, SectionBody::Bullets(&plan.exercises));
    assert_eq!(view.sections[4].body, SectionBody::Bullets(&plan.assessment));
    assert!(view.source_chips().is_empty());
}

#[tokio::test]
async fn application_failure_surfaces_error_and_no_plan() {
    let backend = MockBackend::start(MockReply::json(200, failure_body("X", "Generation failed"))).await;
    let client = HttpLessonPlanClient::new(ClientConfig::new(&backend.base_url)).unwrap();

    let mut form = LessonPlanForm::new();
    form.set_topic("Tides", false);
    let mut orch = Orchestrator::new();
    submit_form(&mut form, &mut orch, &client).await;

    assert_eq!(orch.error(), Some("X"));
    assert!(orch.plan().is_none());
    assert_eq!(form.topic(), "Tides", "failure must not clear the form");
}

#[tokio::test]
async fn transport_failure_surfaces_default_message() {
    let client = HttpLessonPlanClient::new(ClientConfig::new(unreachable_base_url())).unwrap();
    let mut orch = Orchestrator::new();
    orch.submit(&client, LessonPlanRequest::new("Tides", None))
        .await
        .unwrap();

    let message = orch.error().expect("should be in failure");
    assert_eq!(message, "Failed to create lesson plan");
    assert!(!message.is_empty());
}

#[tokio::test]
async fn blank_topic_never_reaches_the_network() {
    let api = ScriptedApi::failing(ClientError::RequestFailed("unused".into()));
    let mut orch = Orchestrator::new();

    for raw in ["", "   ", "\n\t"] {
        let mut form = LessonPlanForm::new();
        form.set_topic(raw, false);
        assert!(!submit_form(&mut form, &mut orch, api.as_ref()).await);
        assert!(form.error().is_some());
    }

    assert_eq!(api.calls(), 0);
    assert_eq!(orch.phase(), &Phase::Idle);
}

#[tokio::test]
async fn topic_is_trimmed_before_sending() {
    let plan = plan_json("Magnets", "2nd Grade", 30, &[]);
    let backend = MockBackend::start(MockReply::json(200, success_body(plan))).await;
    let client = HttpLessonPlanClient::new(ClientConfig::new(&backend.base_url)).unwrap();

    let mut form = LessonPlanForm::new();
    form.set_topic("   Magnets \n", false);
    let mut orch = Orchestrator::new();
    submit_form(&mut form, &mut orch, &client).await;

    assert_eq!(backend.requests()[0].body, json!({ "topic": "Magnets" }));
}

#[tokio::test]
async fn back_then_resubmit() {
    let api = ScriptedApi::succeeding(sample_plan("Rocks", "4th Grade", 50, &[]));

    let mut form = LessonPlanForm::new();
    form.set_topic("Rocks", false);
    let mut orch = Orchestrator::new();

    submit_form(&mut form, &mut orch, api.as_ref()).await;
    assert!(orch.plan().is_some());

    orch.back();
    assert_eq!(orch.phase(), &Phase::Idle);
    assert!(orch.error().is_none());

    assert!(submit_form(&mut form, &mut orch, api.as_ref()).await);
    assert!(orch.plan().is_some());
    assert_eq!(api.calls(), 2);
    assert_eq!(api.last_request(), Some(LessonPlanRequest::new("Rocks", None)));
}

#[tokio::test]
async fn success_without_plan_uses_message_then_fallback() {
    let api = ScriptedApi::new(Ok(LessonPlanResponse {
        success: true,
        lesson_plan: None,
        error: None,
        message: String::new(),
    }));
    let mut orch = Orchestrator::new();
    orch.submit(api.as_ref(), LessonPlanRequest::new("Rocks", None))
        .await
        .unwrap();
    assert_eq!(orch.error(), Some(UNEXPECTED_ERROR_MESSAGE));
}

#[tokio::test]
async fn dyn_client_can_drive_the_orchestrator() {
    let api: Arc<dyn LessonPlanApi> = ScriptedApi::failing(ClientError::RequestFailed("down".into()));
    let mut orch = Orchestrator::new();
    orch.submit(&api, LessonPlanRequest::new("Rocks", None))
        .await
        .unwrap();
    assert_eq!(orch.error(), Some("down"));
}
