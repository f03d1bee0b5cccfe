//! TUI rendering using ratatui.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap};

use lessonbot_core::display::{BACK_LABEL, LessonPlanView, SectionBody};
use lessonbot_core::form::FormField;
use lessonbot_core::loading::LoadingTicker;
use lessonbot_core::{LessonPlan, Phase};

use super::app::App;

const FORM_WIDTH: u16 = 64;

/// Render the current phase.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // main content
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    match app.orchestrator.phase() {
        Phase::Idle | Phase::Submitting => render_form(f, app, chunks[0]),
        Phase::Failure { message, .. } => {
            render_form(f, app, chunks[0]);
            render_error(f, message, chunks[0]);
        }
        Phase::Success(plan) => render_plan(f, app, plan, chunks[0]),
    }

    render_status_bar(f, app, chunks[1]);
}

// -- Form --

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let area = centered(area, FORM_WIDTH);
    let loading = app.is_loading();
    let form = &app.form;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // title
            Constraint::Length(3), // topic
            Constraint::Length(1), // inline error
            Constraint::Length(3), // grade
            Constraint::Length(3), // submit
            Constraint::Min(0),    // progress / hint
        ])
        .split(area);

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "Lesson Planner Bot",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Create comprehensive lesson plans with AI-powered content scraping",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(title, chunks[0]);

    // Topic input.
    let topic_line = if form.topic().is_empty() {
        Line::from(Span::styled(
            "e.g., Photosynthesis, Simple Machines, World War II",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(form.topic().to_string())
    };
    let topic = Paragraph::new(topic_line).block(field_block(
        " Lesson Topic * ",
        form.focus() == FormField::Topic,
        loading,
    ));
    f.render_widget(topic, chunks[1]);

    if let Some(err) = form.error() {
        let inline = Paragraph::new(Span::styled(
            format!(" {err}"),
            Style::default().fg(Color::Red),
        ));
        f.render_widget(inline, chunks[2]);
    }

    // Grade selector.
    let grade = Paragraph::new(Line::from(vec![
        Span::styled("< ", Style::default().fg(Color::DarkGray)),
        Span::raw(form.grade_label()),
        Span::styled(" >", Style::default().fg(Color::DarkGray)),
    ]))
    .block(field_block(
        " Grade Level (Optional) ",
        form.focus() == FormField::Grade,
        loading,
    ));
    f.render_widget(grade, chunks[3]);

    // Submit control.
    let (label, style) = if loading {
        ("Creating Lesson Plan...", Style::default().fg(Color::Yellow))
    } else if form.can_submit(loading) {
        (
            "Create Lesson Plan",
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("Create Lesson Plan", Style::default().fg(Color::DarkGray))
    };
    let submit = Paragraph::new(Span::styled(format!(" {label} "), style))
        .alignment(Alignment::Center)
        .block(field_block("", form.focus() == FormField::Submit, loading));
    f.render_widget(submit, chunks[4]);

    match &app.loading {
        Some(ticker) if loading => render_progress(f, ticker, chunks[5]),
        _ => {
            let hint = Paragraph::new(
                "The AI will search for educational content and generate a complete lesson \
                 plan with objectives, materials, exercises, and assessments.",
            )
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            f.render_widget(hint, chunks[5]);
        }
    }
}

fn render_progress(f: &mut Frame, ticker: &LoadingTicker, area: Rect) {
    let now = Instant::now();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let progress = ticker.progress(now);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            " {} ({}s) ",
            ticker.stage(now),
            ticker.elapsed(now).as_secs()
        )))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(progress)
        .label(format!("{:.0}%", progress * 100.0));
    f.render_widget(gauge, chunks[0]);

    let fact = Paragraph::new(vec![
        Line::from(Span::styled(
            "Did you know?",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(ticker.fact(now)),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(fact, chunks[1]);
}

fn field_block(title: &str, focused: bool, loading: bool) -> Block<'_> {
    let border = if loading {
        Style::default().fg(Color::DarkGray)
    } else if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

// -- Error notification --

fn render_error(f: &mut Frame, message: &str, area: Rect) {
    let width = area.width.min(FORM_WIDTH + 8);
    let height = 3;
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + area.height.saturating_sub(height),
        width,
        height: height.min(area.height),
    };
    let notification = Paragraph::new(Span::styled(
        message.to_string(),
        Style::default().fg(Color::White),
    ))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Error (Esc to dismiss) "),
    );
    f.render_widget(Clear, popup);
    f.render_widget(notification, popup);
}

// -- Plan display --

fn render_plan(f: &mut Frame, app: &App, plan: &LessonPlan, area: Rect) {
    let view = LessonPlanView::from(plan);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            view.title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            chip(view.grade, Color::Blue),
            Span::raw("  "),
            chip(&view.duration, Color::Magenta),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" [b] {BACK_LABEL} ")),
    );
    f.render_widget(header, chunks[0]);

    let body = Paragraph::new(plan_lines(&view))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(" Lesson Plan "));
    f.render_widget(body, chunks[1]);
}

/// Body lines of the plan, section by section.
fn plan_lines(view: &LessonPlanView<'_>) -> Vec<Line<'static>> {
    let heading = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();

    for (i, section) in view.sections.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(section.heading, heading)));

        match &section.body {
            SectionBody::Bullets(items) => {
                lines.extend(items.iter().map(|item| Line::from(format!("  • {item}"))));
            }
            SectionBody::Segments(segments) => {
                for (n, seg) in segments.iter().enumerate() {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("  {}. {}", n + 1, seg.title),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw("  "),
                        chip(&seg.duration, Color::Magenta),
                    ]));
                    if !seg.description.is_empty() {
                        lines.push(Line::from(Span::styled(
                            format!("     {}", seg.description),
                            Style::default().fg(Color::Gray),
                        )));
                    }
                }
            }
            SectionBody::Sources(chips) => {
                lines.extend(chips.iter().map(|c| {
                    Line::from(vec![
                        Span::raw("  "),
                        chip(&c.label, Color::Cyan),
                        Span::raw(" "),
                        Span::styled(
                            c.url.to_string(),
                            Style::default().add_modifier(Modifier::UNDERLINED),
                        ),
                    ])
                }));
            }
        }
    }
    lines
}

fn chip(text: &str, color: Color) -> Span<'static> {
    Span::styled(format!("[{text}]"), Style::default().fg(color))
}

// -- Status bar --

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let phase = app.orchestrator.phase();
    let keys = match phase {
        Phase::Idle | Phase::Failure { .. } => {
            "Tab:next field  ←/→:grade  Enter:create  Esc:dismiss/quit"
        }
        Phase::Submitting => "Generating... Ctrl-C:quit",
        Phase::Success(_) => "j/k:scroll  b/Esc:new lesson plan  q:quit",
    };

    let bar = Line::from(vec![
        Span::styled(
            format!(" {} ", phase.name()),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(keys, Style::default().fg(Color::DarkGray)),
    ]);

    f.render_widget(Paragraph::new(bar), area);
}

// -- Helpers --

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
