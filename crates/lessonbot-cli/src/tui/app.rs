//! TUI application state: form, orchestrator and the in-flight request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::task::JoinHandle;

use lessonbot_core::form::{FormField, LessonPlanForm};
use lessonbot_core::loading::LoadingTicker;
use lessonbot_core::{ClientError, LessonPlanApi, LessonPlanResponse, Orchestrator, Phase};

type PendingRequest = JoinHandle<Result<LessonPlanResponse, ClientError>>;

/// Application state for the TUI.
pub struct App {
    api: Arc<dyn LessonPlanApi>,
    pub orchestrator: Orchestrator,
    pub form: LessonPlanForm,
    pub loading: Option<LoadingTicker>,
    pending: Option<PendingRequest>,
    pub scroll: u16,
    pub tick_rate: Duration,
    pub should_quit: bool,
}

impl App {
    pub fn new(api: Arc<dyn LessonPlanApi>) -> Self {
        Self {
            api,
            orchestrator: Orchestrator::new(),
            form: LessonPlanForm::new(),
            loading: None,
            pending: None,
            scroll: 0,
            tick_rate: Duration::from_millis(100),
            should_quit: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.orchestrator.is_loading()
    }

    // -- Input --

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.orchestrator.phase() {
            Phase::Submitting => {}
            Phase::Success(_) => self.handle_plan_key(key),
            Phase::Idle | Phase::Failure { .. } => self.handle_form_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let loading = self.is_loading();
        match key.code {
            KeyCode::Esc => {
                if self.orchestrator.error().is_some() {
                    self.orchestrator.dismiss_error();
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Tab => self.form.focus_next(loading),
            KeyCode::BackTab => self.form.focus_prev(loading),
            KeyCode::Enter => self.submit(),
            // The topic input has no cursor, so arrows always drive the grade.
            KeyCode::Left => self.form.prev_grade(loading),
            KeyCode::Right => self.form.next_grade(loading),
            _ => match self.form.focus() {
                FormField::Topic => match key.code {
                    KeyCode::Char(c) if is_plain_text(key.modifiers) => {
                        self.form.insert_char(c, loading)
                    }
                    KeyCode::Backspace => self.form.backspace(loading),
                    _ => {}
                },
                FormField::Grade => match key.code {
                    KeyCode::Char('h') => self.form.prev_grade(loading),
                    KeyCode::Char('l') | KeyCode::Char(' ') => self.form.next_grade(loading),
                    _ => {}
                },
                FormField::Submit => {
                    if key.code == KeyCode::Char(' ') {
                        self.submit();
                    }
                }
            },
        }
    }

    fn handle_plan_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => self.back(),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::Home => self.scroll = 0,
            _ => {}
        }
    }

    // -- Actions --

    /// Validate the form and, if it passes, send the request in the background.
    pub fn submit(&mut self) {
        let Some(request) = self.form.submit(self.is_loading()) else {
            return;
        };
        let request = match self.orchestrator.begin_submission(request) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = %e, "submission refused");
                return;
            }
        };

        self.loading = Some(LoadingTicker::start(Instant::now()));
        let api = Arc::clone(&self.api);
        self.pending = Some(tokio::spawn(async move {
            api.create_lesson_plan(&request).await
        }));
    }

    /// Return from the plan display to the form.
    pub fn back(&mut self) {
        self.orchestrator.back();
        self.scroll = 0;
    }

    /// Feed a finished request into the orchestrator. Does not block.
    pub async fn poll_pending(&mut self) {
        if self.pending.as_ref().is_some_and(JoinHandle::is_finished) {
            self.finish_pending().await;
        }
    }

    async fn finish_pending(&mut self) {
        let Some(handle) = self.pending.take() else {
            return;
        };
        let outcome = handle.await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "lesson plan request task failed");
            Err(ClientError::RequestFailed(String::new()))
        });
        self.loading = None;
        self.scroll = 0;
        if let Err(e) = self.orchestrator.complete_submission(outcome) {
            tracing::warn!(error = %e, "dropping stale lesson plan response");
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.orchestrator.tick(now);
    }
}

/// Characters typed with no modifier other than Shift.
fn is_plain_text(modifiers: KeyModifiers) -> bool {
    modifiers.difference(KeyModifiers::SHIFT).is_empty()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
