//! Rendering for the three panels.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs, Wrap,
};
use ratatui::Frame;

use taxchat_core::models::message::{ChatMessage, ChatRole};
use taxchat_core::models::status::{HealthState, ServiceStatus, SystemStatus};
use taxchat_core::store::AppStore;

use super::app::{App, Tab, SAMPLE_QUESTIONS};

const TITLE: &str = "IRS Assistant";
const SUBTITLE: &str = "AI-powered tax document analysis";

pub(super) fn draw(frame: &mut Frame, app: &App, store: &AppStore) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app);
    draw_tabs(frame, chunks[1], app);
    match app.tab {
        Tab::Chat => draw_chat(frame, chunks[2], app, store),
        Tab::Status => draw_status(frame, chunks[2], app),
        Tab::Documents => draw_documents(frame, chunks[2], app, store),
    }
    draw_footer(frame, chunks[3], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let taxpayer = if app.selector.is_loading() {
        Span::styled("Loading taxpayers...", dim())
    } else if let Some(taxpayer) = app.selector.selected() {
        Span::styled(
            format!("Taxpayer: {}", taxpayer.full_name()),
            Style::new().fg(Color::Cyan),
        )
    } else {
        Span::styled("No taxpayer selected (Ctrl+T)", Style::new().fg(Color::Yellow))
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(TITLE, Style::new().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(SUBTITLE, dim()),
        ]),
        Line::from(taxpayer),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let tabs = Tabs::new(vec!["Chat", "Status", "Documents"])
        .select(app.tab.index())
        .highlight_style(Style::new().fg(Color::Green).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

// ── Chat panel ───────────────────────────────────────────────────────────────

fn draw_chat(frame: &mut Frame, area: Rect, app: &App, store: &AppStore) {
    let columns = if app.prompts_open {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(area)
    };

    let chat_area = if app.prompts_open {
        draw_prompts(frame, columns[0], app);
        columns[1]
    } else {
        columns[0]
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(chat_area);

    if app.selector.dropdown_open {
        draw_taxpayer_dropdown(frame, rows[0], app);
    } else {
        draw_messages(frame, rows[0], app, store);
    }
    draw_input(frame, rows[1], app);
}

fn draw_prompts(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = SAMPLE_QUESTIONS
        .iter()
        .map(|q| ListItem::new(Line::from(*q)))
        .collect();
    let list = List::new(items)
        .block(Block::bordered().title("Sample Questions"))
        .highlight_style(Style::new().fg(Color::Green).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.prompt_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_taxpayer_dropdown(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .selector
        .taxpayers()
        .iter()
        .map(|t| ListItem::new(Line::from(t.full_name())))
        .collect();
    let list = List::new(items)
        .block(Block::bordered().title("Select Taxpayer"))
        .highlight_style(Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.selector.highlighted_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_messages(frame: &mut Frame, area: Rect, app: &App, store: &AppStore) {
    let title = store
        .current_session()
        .map(|s| s.title.clone())
        .unwrap_or_else(|| "No conversation".to_string());

    let mut lines: Vec<Line> = Vec::new();
    match store.current_session() {
        Some(session) if !session.messages.is_empty() => {
            for message in &session.messages {
                lines.extend(message_lines(message));
            }
        }
        _ => {
            let name = app
                .selector
                .selected()
                .map(|t| format!("{}'s", t.first_name))
                .unwrap_or_else(|| "your".to_string());
            lines.push(Line::from(format!("Ask me anything about {name} tax data!")));
            lines.push(Line::from(Span::styled(
                "Try: \"What was my total income last year?\"",
                dim(),
            )));
        }
    }

    if store.is_loading() {
        lines.push(Line::from(Span::styled(
            "Analyzing your tax data...",
            Style::new().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        )));
    }

    // Keep the tail visible.
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;

    let paragraph = Paragraph::new(lines)
        .block(Block::bordered().title(title))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn message_lines(message: &ChatMessage) -> Vec<Line<'static>> {
    let (label, color) = match message.role {
        ChatRole::User => ("You", Color::Cyan),
        ChatRole::Assistant => ("Assistant", Color::Green),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{label}: "),
            Style::new().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(message.content.clone()),
    ])];

    if let Some(sql) = &message.sql_query {
        lines.push(Line::from(Span::styled(format!("  SQL: {sql}"), dim())));
    }
    let mut meta = Vec::new();
    if let Some(confidence) = message.confidence {
        meta.push(format!("Confidence: {:.1}%", confidence * 100.0));
    }
    if let Some(ms) = message.execution_time_ms {
        meta.push(format!("Execution: {ms}ms"));
    }
    if !meta.is_empty() {
        lines.push(Line::from(Span::styled(format!("  {}", meta.join(" · ")), dim())));
    }
    lines.push(Line::from(""));
    lines
}

fn draw_input(frame: &mut Frame, area: Rect, app: &App) {
    let placeholder = if app.selector.selected().is_some() {
        "Ask about the selected taxpayer's tax data"
    } else {
        "Select a taxpayer first (Ctrl+T)"
    };
    let content = if app.input.is_empty() {
        Line::from(Span::styled(placeholder, dim()))
    } else {
        Line::from(format!("> {}", app.input))
    };
    frame.render_widget(
        Paragraph::new(content).block(Block::bordered().title("Message")),
        area,
    );
}

// ── Status panel ─────────────────────────────────────────────────────────────

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    if let Some(error) = &app.status_error {
        let lines = vec![
            Line::from(Span::styled(
                "Failed to load system status",
                Style::new().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(error.clone(), Style::new().fg(Color::Red))),
            Line::from(""),
            Line::from(Span::styled("Press r to try again", dim())),
        ];
        frame.render_widget(
            Paragraph::new(lines).block(Block::bordered().title("System Status")),
            area,
        );
        return;
    }

    let Some(status) = &app.system_status else {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled("Loading system status...", dim())))
                .block(Block::bordered().title("System Status")),
            area,
        );
        return;
    };

    if app.detail_open {
        draw_status_detail(frame, area, status);
    } else {
        draw_status_overview(frame, area, status);
    }
}

fn draw_status_overview(frame: &mut Frame, area: Rect, status: &SystemStatus) {
    let mut lines = vec![
        Line::from(vec![
            Span::raw("Overall: "),
            health_span(status.overall_status),
        ]),
        Line::from(""),
    ];

    for service in &status.services {
        lines.extend(service_lines(service));
    }

    if !status.issues.is_empty() {
        lines.push(Line::from(Span::styled(
            "Issues detected:",
            Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        for issue in &status.issues {
            lines.push(Line::from(Span::styled(
                format!("  • {issue}"),
                Style::new().fg(Color::Yellow),
            )));
        }
    }

    if status.degraded_services().count() > 0 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Press d for details", dim())));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::bordered().title("System Status"))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_status_detail(frame: &mut Frame, area: Rect, status: &SystemStatus) {
    let mut lines = Vec::new();
    for service in status.degraded_services() {
        lines.push(Line::from(vec![
            Span::styled(
                service.name.clone(),
                Style::new().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            health_span(service.status),
        ]));
        if let Some(issue) = &service.issue {
            lines.push(Line::from(Span::styled(
                format!("  {issue}"),
                Style::new().fg(Color::Red),
            )));
        }
        lines.push(Line::from(Span::styled(
            format!("  Last checked: {}", service.last_checked),
            dim(),
        )));
        lines.push(Line::from(""));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::bordered().title("Status Detail (Esc to close)"))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn service_lines(service: &ServiceStatus) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        health_dot(service.status),
        Span::raw(" "),
        Span::styled(
            service.name.clone(),
            Style::new().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        health_span(service.status),
        Span::raw("  "),
        Span::styled(service.description.clone(), dim()),
    ])];
    if let Some(issue) = &service.issue {
        lines.push(Line::from(Span::styled(
            format!("    {issue}"),
            Style::new().fg(Color::Red),
        )));
    }
    lines
}

fn health_color(state: HealthState) -> Color {
    match state {
        HealthState::Healthy => Color::Green,
        HealthState::Degraded => Color::Yellow,
        HealthState::Critical => Color::Red,
    }
}

fn health_span(state: HealthState) -> Span<'static> {
    let label = match state {
        HealthState::Healthy => "Healthy",
        HealthState::Degraded => "Degraded",
        HealthState::Critical => "Critical",
    };
    Span::styled(label, Style::new().fg(health_color(state)))
}

fn health_dot(state: HealthState) -> Span<'static> {
    Span::styled("●", Style::new().fg(health_color(state)))
}

// ── Documents panel ──────────────────────────────────────────────────────────

fn draw_documents(frame: &mut Frame, area: Rect, app: &App, store: &AppStore) {
    let rows: Vec<Row> = store
        .documents()
        .iter()
        .map(|doc| {
            let status_style = match doc.status {
                taxchat_core::models::document::DocumentStatus::Ready => {
                    Style::new().fg(Color::Green)
                }
                taxchat_core::models::document::DocumentStatus::Processing => {
                    Style::new().fg(Color::Yellow)
                }
                taxchat_core::models::document::DocumentStatus::Uploaded => {
                    Style::new().fg(Color::Blue)
                }
            };
            Row::new(vec![
                Span::raw(doc.name.clone()),
                Span::raw(doc.year.to_string()),
                Span::raw(doc.kind.label()),
                Span::styled(doc.status.label(), status_style),
                Span::raw(doc.file_size.map(human_size).unwrap_or_default()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Length(6),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(vec!["Name", "Year", "Type", "Status", "Size"])
            .style(Style::new().add_modifier(Modifier::BOLD)),
    )
    .block(Block::bordered().title("Tax Documents"))
    .row_highlight_style(Style::new().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default().with_selected(Some(app.doc_index));
    frame.render_stateful_widget(table, area, &mut state);
}

fn human_size(bytes: u64) -> String {
    if bytes >= 1_048_576 {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.0} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

// ── Footer ───────────────────────────────────────────────────────────────────

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let hints = match app.tab {
        Tab::Chat => {
            "Enter send · Ctrl+T taxpayer · Ctrl+P prompts · Ctrl+N new chat · Ctrl+X cancel · Tab switch · Ctrl+C quit"
        }
        Tab::Status => "r refresh · d details · Tab switch · q quit",
        Tab::Documents => "u upload · x delete · Up/Down select · Tab switch · q quit",
    };
    frame.render_widget(Paragraph::new(Line::from(Span::styled(hints, dim()))), area);
}

fn dim() -> Style {
    Style::new().fg(Color::DarkGray)
}
