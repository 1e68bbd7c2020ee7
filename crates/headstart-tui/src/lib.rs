// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use headstart_app::{
    AppCommand, AppEvent, AppState, InputRow, ProjectionItem, RowField, RowId, TabId,
    export_projection,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs};
use std::collections::BTreeMap;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const CARET: &str = "▏";
const NO_INPUT_PLACEHOLDER: &str = "no input";

/// Side effects the view needs from its host.
pub trait AppRuntime {
    fn write_clipboard(&mut self, text: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub status_timeout: Duration,
    pub highlight_timeout: Duration,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            status_timeout: Duration::from_secs(2),
            highlight_timeout: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    ClearHighlight { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FieldCursor {
    row: RowId,
    index: usize,
    field: RowField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowHighlight {
    tab: TabId,
    row: RowId,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    options: UiOptions,
    cursors: BTreeMap<TabId, FieldCursor>,
    highlight: Option<RowHighlight>,
    highlight_token: u64,
    status_token: u64,
    help_visible: bool,
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        options,
        ..ViewData::default()
    };
    let (internal_tx, internal_rx) = mpsc::channel();

    let active = state.active_tab;
    dispatch_and_sync(
        state,
        &mut view_data,
        &internal_tx,
        AppCommand::ActivateTab(active),
    );

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)) {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error).context("poll event");
                break;
            }
        };
        if has_event {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error).context("read event");
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearHighlight { token } if token == view_data.highlight_token => {
                view_data.highlight = None;
            }
            InternalEvent::ClearStatus { .. } | InternalEvent::ClearHighlight { .. } => {}
        }
    }
}

fn schedule(internal_tx: &Sender<InternalEvent>, delay: Duration, event: InternalEvent) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(delay);
        let _ = sender.send(event);
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    dispatch_and_sync(
        state,
        view_data,
        internal_tx,
        AppCommand::SetStatus(message.into()),
    );
}

fn dispatch_and_sync(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    for event in events {
        match event {
            AppEvent::RowsChanged { tab, rows } => sync_cursor(view_data, tab, &rows),
            AppEvent::RowAppended { tab, row } => {
                view_data.highlight = Some(RowHighlight { tab, row });
                view_data.highlight_token = view_data.highlight_token.saturating_add(1);
                schedule(
                    internal_tx,
                    view_data.options.highlight_timeout,
                    InternalEvent::ClearHighlight {
                        token: view_data.highlight_token,
                    },
                );
            }
            AppEvent::StatusUpdated(_) => {
                view_data.status_token = view_data.status_token.saturating_add(1);
                schedule(
                    internal_tx,
                    view_data.options.status_timeout,
                    InternalEvent::ClearStatus {
                        token: view_data.status_token,
                    },
                );
            }
            AppEvent::TabChanged(tab) => {
                tracing::debug!(tab = %tab, "switched tab");
            }
            AppEvent::ProjectionChanged { .. } | AppEvent::StatusCleared => {}
        }
    }
}

/// Keep the focus on the same row id when it survives, otherwise on the row
/// that now occupies its old position.
fn sync_cursor(view_data: &mut ViewData, tab: TabId, rows: &[InputRow]) {
    let Some(last_index) = rows.len().checked_sub(1) else {
        view_data.cursors.remove(&tab);
        return;
    };
    let cursor = match view_data.cursors.get(&tab).copied() {
        Some(cursor) => match rows.iter().position(|row| row.id == cursor.row) {
            Some(index) => FieldCursor { index, ..cursor },
            None => {
                let index = cursor.index.min(last_index);
                FieldCursor {
                    row: rows[index].id,
                    index,
                    field: cursor.field,
                }
            }
        },
        None => FieldCursor {
            row: rows[0].id,
            index: 0,
            field: RowField::Name,
        },
    };
    view_data.cursors.insert(tab, cursor);
}

fn active_cursor(state: &AppState, view_data: &ViewData) -> Option<FieldCursor> {
    view_data
        .cursors
        .get(&state.active_tab)
        .copied()
        .or_else(|| {
            state.rows(state.active_tab).first().map(|row| FieldCursor {
                row: row.id,
                index: 0,
                field: RowField::Name,
            })
        })
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
            view_data.help_visible = false;
        }
        return false;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('f') => {
                dispatch_and_sync(state, view_data, internal_tx, AppCommand::NextTab);
            }
            KeyCode::Char('b') => {
                dispatch_and_sync(state, view_data, internal_tx, AppCommand::PrevTab);
            }
            KeyCode::Char('y') => export_active_tab(state, runtime, view_data, internal_tx),
            KeyCode::Char('u') => {
                edit_focused_field(state, view_data, internal_tx, |_| Some(String::new()));
            }
            _ => {}
        }
        return false;
    }

    if key.modifiers.contains(KeyModifiers::ALT) {
        if let KeyCode::Char(digit) = key.code
            && let Some(index) = digit.to_digit(10)
        {
            let tab = TabId::new(index);
            if state.tab(tab).is_some() {
                dispatch_and_sync(state, view_data, internal_tx, AppCommand::ActivateTab(tab));
            }
        }
        return false;
    }

    match key.code {
        KeyCode::F(1) => {
            view_data.help_visible = true;
        }
        KeyCode::Tab => move_field(state, view_data, 1),
        KeyCode::BackTab => move_field(state, view_data, -1),
        KeyCode::Down => move_row(state, view_data, 1, None),
        KeyCode::Up => move_row(state, view_data, -1, None),
        KeyCode::Enter => move_row(state, view_data, 1, Some(RowField::Name)),
        KeyCode::Backspace => {
            edit_focused_field(state, view_data, internal_tx, |current| {
                let mut next = current.to_owned();
                next.pop().map(|_| next)
            });
        }
        KeyCode::Char(ch) => type_char(state, view_data, internal_tx, ch),
        _ => {}
    }
    false
}

fn type_char(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    ch: char,
) {
    let Some(cursor) = active_cursor(state, view_data) else {
        return;
    };
    if cursor.field == RowField::Seconds && !(ch.is_ascii_digit() || ch == '-') {
        emit_status(
            state,
            view_data,
            internal_tx,
            "seconds take whole numbers",
        );
        return;
    }
    edit_focused_field(state, view_data, internal_tx, |current| {
        Some(format!("{current}{ch}"))
    });
}

fn edit_focused_field<F>(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    edit: F,
) where
    F: FnOnce(&str) -> Option<String>,
{
    let tab = state.active_tab;
    let Some(cursor) = active_cursor(state, view_data) else {
        return;
    };
    let Some(current) = state
        .tab(tab)
        .and_then(|target| target.store().get(cursor.row))
        .map(|row| row.raw(cursor.field).to_owned())
    else {
        return;
    };
    let Some(raw) = edit(&current) else {
        return;
    };

    view_data.cursors.insert(tab, cursor);
    dispatch_and_sync(
        state,
        view_data,
        internal_tx,
        AppCommand::EditField {
            tab,
            row: cursor.row,
            field: cursor.field,
            raw,
        },
    );
}

fn move_field(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let Some(cursor) = active_cursor(state, view_data) else {
        return;
    };
    match (cursor.field, delta.signum()) {
        (RowField::Name, 1) | (RowField::Seconds, -1) => {
            view_data.cursors.insert(
                state.active_tab,
                FieldCursor {
                    field: cursor.field.next(),
                    ..cursor
                },
            );
        }
        (RowField::Seconds, 1) => move_row(state, view_data, 1, Some(RowField::Name)),
        (RowField::Name, -1) => move_row(state, view_data, -1, Some(RowField::Seconds)),
        _ => {}
    }
}

/// Move to a neighbouring row; stays put at either end.
fn move_row(state: &AppState, view_data: &mut ViewData, delta: isize, field: Option<RowField>) {
    let Some(cursor) = active_cursor(state, view_data) else {
        return;
    };
    let rows = state.rows(state.active_tab);
    let Some(last_index) = rows.len().checked_sub(1) else {
        return;
    };
    let target = cursor.index as isize + delta;
    if target < 0 || target as usize > last_index {
        return;
    }
    let index = target as usize;
    view_data.cursors.insert(
        state.active_tab,
        FieldCursor {
            row: rows[index].id,
            index,
            field: field.unwrap_or(cursor.field),
        },
    );
}

fn export_active_tab<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let tab = state.active_tab;
    let outcome = export_projection(state.projection(tab), |text| runtime.write_clipboard(text));
    tracing::debug!(tab = %tab, outcome = ?outcome, "export requested");
    dispatch_and_sync(
        state,
        view_data,
        internal_tx,
        AppCommand::RecordExport(outcome),
    );
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let tab_ids = state.tab_ids();
    let selected = tab_ids
        .iter()
        .position(|tab| *tab == state.active_tab)
        .unwrap_or(0);
    let tab_titles = state.tabs().map(tab_title).collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title("headstart").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout[1]);
    render_rows(frame, body[0], state, view_data);

    let visible = body[1].height.saturating_sub(2);
    let projection = Paragraph::new(projection_text(state.projection(state.active_tab)))
        .block(Block::default().title("offsets").borders(Borders::ALL))
        .scroll((projection_scroll(state, view_data, visible), 0));
    frame.render_widget(projection, body[1]);

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if view_data.help_visible {
        let area = centered_rect(60, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_rows(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState, view_data: &ViewData) {
    let cursor = active_cursor(state, view_data);
    let rows = state
        .rows(state.active_tab)
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let focus = cursor
                .filter(|cursor| cursor.index == index)
                .map(|cursor| cursor.field);
            let cells = RowField::ALL.map(|field| {
                let focused = focus == Some(field);
                let cell = Cell::from(cell_text(row.raw(field), focused));
                if focused {
                    cell.style(Style::default().add_modifier(Modifier::REVERSED))
                } else {
                    cell
                }
            });
            let [name, seconds] = cells;
            let line = Row::new(vec![Cell::from(row.id.to_string()), name, seconds]);
            if is_highlighted(state.active_tab, row.id, view_data) {
                line.style(Style::default().fg(Color::Black).bg(Color::LightGreen))
            } else {
                line
            }
        })
        .collect::<Vec<Row<'_>>>();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(vec![
            "#",
            RowField::Name.as_str(),
            RowField::Seconds.as_str(),
        ])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title("entries").borders(Borders::ALL));
    let mut table_state = TableState::default().with_selected(cursor.map(|cursor| cursor.index));
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// First line of the offsets panel so the focused row's entry stays visible.
fn projection_scroll(state: &AppState, view_data: &ViewData, visible: u16) -> u16 {
    let Some(entry) = active_cursor(state, view_data)
        .and_then(|cursor| state.rows(state.active_tab).get(cursor.index))
        .and_then(InputRow::entry)
    else {
        return 0;
    };
    let Some(line) = state
        .projection(state.active_tab)
        .iter()
        .position(|item| item.name == entry.name)
    else {
        return 0;
    };
    let line = u16::try_from(line).unwrap_or(u16::MAX);
    line.saturating_sub(visible.saturating_sub(1))
}

fn is_highlighted(tab: TabId, row: RowId, view_data: &ViewData) -> bool {
    view_data.highlight == Some(RowHighlight { tab, row })
}

fn cell_text(raw: &str, focused: bool) -> String {
    if focused {
        format!("{raw}{CARET}")
    } else {
        raw.to_owned()
    }
}

fn tab_title(tab: &headstart_app::Tab) -> String {
    match tab.projection().len() {
        0 => tab.label.clone(),
        count => format!("{} ({count})", tab.label),
    }
}

fn projection_text(items: &[ProjectionItem]) -> String {
    if items.is_empty() {
        return NO_INPUT_PLACEHOLDER.to_owned();
    }
    items
        .iter()
        .map(ProjectionItem::line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }

    let label = state
        .active()
        .map(|tab| tab.label.as_str())
        .unwrap_or_default();
    let default = "tab/S-tab field | ↑/↓ row | ctrl+u clear | ctrl+y copy | ctrl+f/b alt+N tab | F1 help | ctrl+q";
    match &state.status_line {
        Some(status) => format!("{label} | {status} | {default}"),
        None => format!("{label} | {default}"),
    }
}

fn help_overlay_text() -> &'static str {
    "type             edit the focused field\n\
     tab / shift+tab  next / previous field\n\
     up / down        previous / next row\n\
     enter            next row, name field\n\
     backspace        delete a character\n\
     ctrl+u           clear the field\n\
     ctrl+y           copy offsets to the clipboard\n\
     ctrl+f / ctrl+b  next / previous tab\n\
     alt+1..9         jump to tab\n\
     F1 / esc         close help\n\
     ctrl+q           quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
