//! Ratatui-based terminal UI.
//!
//! The TUI shows the parameter panel (values, bounds, fit checkboxes, sliders),
//! the current time mask and a command line, and drives fit sessions from its
//! event loop: the poll timeout is shortened to the session's next tick so
//! progress is applied on the 200 ms cadence without a second thread.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tracing::{info, warn};

use crate::app::Workspace;
use crate::config::AppConfig;
use crate::error::{AppError, EXIT_TERMINAL};
use crate::fit::{FitSession, FitWorker, SessionState};
use crate::params::{
    EditOutcome, Field, PAGE_STEP, ParamPanel, SINGLE_STEP, edit_text, nudge_slider,
};

/// Event poll timeout while no fit is running.
const IDLE_POLL: Duration = Duration::from_millis(250);
const SLIDER_WIDTH: usize = 20;
const MAX_HISTORY: usize = 50;

type WorkerFactory = Box<dyn Fn() -> Box<dyn FitWorker>>;

/// Start the TUI.
pub fn run(workspace: Workspace, config: AppConfig) -> Result<(), AppError> {
    let factory: Option<WorkerFactory> = config.worker.map(|command| {
        Box::new(move || Box::new(command.to_worker()) as Box<dyn FitWorker>) as WorkerFactory
    });
    let mut app = App::new(workspace, factory);

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_TERMINAL, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_TERMINAL, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                EXIT_TERMINAL,
                format!("Failed to enter alternate screen: {e}"),
            ));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum InputMode {
    Normal,
    /// Typing into a field of the selected row.
    Edit(String),
    /// Typing a command line after `:`.
    Command(String),
}

struct App {
    ws: Workspace,
    panel: Rc<RefCell<ParamPanel>>,
    worker_factory: Option<WorkerFactory>,
    session: Option<FitSession>,
    selected: usize,
    field: Field,
    mode: InputMode,
    status: String,
    history: Vec<String>,
}

impl App {
    fn new(mut ws: Workspace, worker_factory: Option<WorkerFactory>) -> Self {
        let (panel, _) = ParamPanel::attach(&mut ws.store);
        let status = if worker_factory.is_some() {
            "Ready. Press f to fit.".to_string()
        } else {
            "Ready. No fit worker configured (--worker or FITDECK_WORKER).".to_string()
        };
        Self {
            ws,
            panel,
            worker_factory,
            session: None,
            selected: 0,
            field: Field::Val,
            mode: InputMode::Normal,
            status,
            history: Vec::new(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_TERMINAL, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            let timeout = self
                .session
                .as_ref()
                .and_then(|s| s.time_until_tick(Instant::now()))
                .map_or(IDLE_POLL, |wait| wait.min(IDLE_POLL));

            if event::poll(timeout)
                .map_err(|e| AppError::new(EXIT_TERMINAL, format!("Event poll error: {e}")))?
            {
                match event::read()
                    .map_err(|e| AppError::new(EXIT_TERMINAL, format!("Event read error: {e}")))?
                {
                    Event::Key(key) => {
                        if key.kind == KeyEventKind::Press {
                            if self.handle_key(key.code) {
                                break;
                            }
                            needs_redraw = true;
                        }
                    }
                    Event::Resize(_, _) => needs_redraw = true,
                    _ => {}
                }
            }

            if self.poll_fit(Instant::now()) {
                needs_redraw = true;
            }
        }
        Ok(())
    }

    /// Tick the fit session if its timer is due. Returns whether anything changed.
    fn poll_fit(&mut self, now: Instant) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(report) = session.poll(&mut self.ws.store, now) else {
            return false;
        };
        match report.state {
            SessionState::Finished => self.status = "Fit finished.".to_string(),
            SessionState::Terminated => {
                self.status = "Fit terminated; parameters hold the last reported values.".to_string()
            }
            _ if report.malformed > 0 => {
                self.status = format!("Fit running; skipped {} malformed message(s).", report.malformed)
            }
            _ => {}
        }
        report.applied.is_some() || report.state.is_terminal() || report.malformed > 0
    }

    fn fit_state(&self) -> SessionState {
        self.session.as_ref().map_or(SessionState::Idle, FitSession::state)
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match std::mem::replace(&mut self.mode, InputMode::Normal) {
            InputMode::Normal => return self.handle_normal_key(code),
            InputMode::Edit(buffer) => self.handle_edit_key(code, buffer),
            InputMode::Command(buffer) => self.handle_command_key(code, buffer),
        }
        false
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return self.quit(),
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.ws.store.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Tab => self.field = self.field.next(),
            KeyCode::Enter => {
                let text = self
                    .panel
                    .borrow()
                    .row(self.selected)
                    .map(|row| row.text(self.field).to_string())
                    .unwrap_or_default();
                self.mode = InputMode::Edit(text);
                self.status = format!("Editing {}. Enter to apply, Esc to cancel.", self.field.label());
            }
            KeyCode::Left => self.nudge(-SINGLE_STEP),
            KeyCode::Right => self.nudge(SINGLE_STEP),
            KeyCode::PageDown => self.nudge(-PAGE_STEP),
            KeyCode::PageUp => self.nudge(PAGE_STEP),
            KeyCode::Char(' ') => self.toggle_fit_checkbox(),
            KeyCode::Char(':') => {
                self.mode = InputMode::Command(String::new());
                self.status = "freeze/thaw <glob>..., ignore <start>-<stop>, notice".to_string();
            }
            KeyCode::Char('f') => self.start_fit(),
            KeyCode::Char('x') => self.stop_fit(),
            KeyCode::Char('w') => self.save(),
            _ => {}
        }
        false
    }

    fn handle_edit_key(&mut self, code: KeyCode, mut buffer: String) {
        match code {
            KeyCode::Esc => {
                if let Some(param) = self.ws.store.get_index(self.selected) {
                    self.panel.borrow_mut().resync(self.selected, param);
                }
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => self.commit_edit(&buffer),
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = InputMode::Edit(buffer);
            }
            KeyCode::Char(c) => {
                buffer.push(c);
                self.mode = InputMode::Edit(buffer);
            }
            _ => self.mode = InputMode::Edit(buffer),
        }
    }

    fn handle_command_key(&mut self, code: KeyCode, mut buffer: String) {
        match code {
            KeyCode::Esc => self.status = "Command canceled.".to_string(),
            KeyCode::Enter => self.run_command(&buffer),
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = InputMode::Command(buffer);
            }
            KeyCode::Char(c) => {
                buffer.push(c);
                self.mode = InputMode::Command(buffer);
            }
            _ => self.mode = InputMode::Command(buffer),
        }
    }

    fn commit_edit(&mut self, text: &str) {
        let result = edit_text(&self.panel, &mut self.ws.store, self.selected, self.field, text);
        self.status = match result {
            Ok(EditOutcome::Applied(_)) => self.clamp_status().unwrap_or_else(|| {
                format!("Set {} of {}.", self.field.label(), self.selected_name())
            }),
            Ok(EditOutcome::Ignored) => format!("'{}' is not a number; edit ignored.", text.trim()),
            Err(err) => err.to_string(),
        };
    }

    fn nudge(&mut self, steps: i32) {
        match nudge_slider(&self.panel, &mut self.ws.store, self.selected, steps) {
            Ok(_) => {
                if let Some(notice) = self.clamp_status() {
                    self.status = notice;
                }
            }
            Err(err) => self.status = format!("{}: {err}", self.selected_name()),
        }
    }

    fn toggle_fit_checkbox(&mut self) {
        let Some(frozen) = self.ws.store.get_index(self.selected).map(|p| p.frozen) else {
            return;
        };
        self.ws.store.set_frozen_at(self.selected, !frozen);
        self.status = format!(
            "{} {}.",
            if frozen { "Thawed" } else { "Froze" },
            self.selected_name()
        );
    }

    fn run_command(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        let entry = match self.ws.execute(line) {
            Ok(outcome) => {
                self.status = outcome.summary();
                format!("> {}  ({})", line.trim(), outcome.summary())
            }
            Err(err) => {
                self.status = err.to_string();
                format!("> {}  (error)", line.trim())
            }
        };
        self.history.push(entry);
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
    }

    fn start_fit(&mut self) {
        if self.fit_state() == SessionState::Running {
            self.status = "Fit already running.".to_string();
            return;
        }
        let Some(factory) = &self.worker_factory else {
            self.status = "No fit worker configured (--worker or FITDECK_WORKER).".to_string();
            return;
        };
        // Each fit gets a fresh session; an ended one cannot be restarted.
        match self.ws.start_fit(factory()) {
            Ok(session) => {
                self.session = Some(session);
                self.status = format!("Fitting {} thawed parameter(s)...", self.ws.store.thawed_count());
            }
            Err(err) => {
                warn!("failed to start fit: {err}");
                self.status = err.to_string();
            }
        }
    }

    fn stop_fit(&mut self) {
        let Some(session) = self.session.as_mut() else {
            self.status = "No fit running.".to_string();
            return;
        };
        if session.state() != SessionState::Running {
            self.status = "No fit running.".to_string();
        } else if !session.is_stoppable() {
            self.status = "This fit worker cannot be stopped.".to_string();
        } else if session.stop() {
            self.status = "Stopping fit...".to_string();
        }
    }

    fn save(&mut self) {
        self.status = match self.ws.save(None) {
            Ok(path) => format!("Saved {}", path.display()),
            Err(err) => err.to_string(),
        };
    }

    /// Returns `true` if the app may exit now.
    fn quit(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return true;
        };
        if session.state() != SessionState::Running {
            return true;
        }
        if !session.stop() {
            self.status = "Fit is running and cannot be stopped; wait for it to finish.".to_string();
            return false;
        }
        info!("stopping fit before exit");
        session.run_to_completion(&mut self.ws.store, |_, _| {});
        true
    }

    fn clamp_status(&self) -> Option<String> {
        let (index, notice) = self.panel.borrow_mut().take_clamp()?;
        let name = self
            .ws
            .store
            .get_index(index)
            .map_or("?", |p| p.full_name.as_str());
        Some(format!("{name}: {notice}"))
    }

    fn selected_name(&self) -> String {
        self.ws
            .store
            .get_index(self.selected)
            .map(|p| p.full_name.clone())
            .unwrap_or_default()
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let state = self.fit_state();
        let state_color = match state {
            SessionState::Running => Color::Yellow,
            SessionState::Finished => Color::Green,
            SessionState::Terminated => Color::Red,
            SessionState::Idle => Color::Gray,
        };
        let name = if self.ws.model.name.is_empty() {
            "model"
        } else {
            self.ws.model.name.as_str()
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("fitdeck", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" | {name} | {}", self.ws.path.display())),
            ]),
            Line::from(vec![
                Span::styled(
                    format!(
                        "params: {} | thawed: {} | masks: {} | fit: ",
                        self.ws.store.len(),
                        self.ws.store.thawed_count(),
                        self.ws.masks.len()
                    ),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(state.label(), Style::default().fg(state_color)),
            ]),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(44)])
            .split(area);

        self.draw_params(frame, chunks[0]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);
        self.draw_masks(frame, side[0]);
        self.draw_history(frame, side[1]);
    }

    fn draw_params(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let panel = self.panel.borrow();
        let name_w = panel.rows().iter().map(|r| r.name.len()).max().unwrap_or(0).min(40);

        let items: Vec<ListItem> = panel
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let cell = |field: Field| {
                    let text = match (&self.mode, i == self.selected && field == self.field) {
                        (InputMode::Edit(buffer), true) => format!("{buffer}_"),
                        _ => row.text(field).to_string(),
                    };
                    let style = if i == self.selected && field == self.field {
                        Style::default().add_modifier(Modifier::UNDERLINED)
                    } else {
                        Style::default()
                    };
                    Span::styled(format!("{text:>11}"), style)
                };
                let slider = match row.slider {
                    Some(_) => slider_bar(row.position, SLIDER_WIDTH),
                    None => format!("{:^width$}", "(fixed)", width = SLIDER_WIDTH + 2),
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{} ", fit_checkbox(row.thawed))),
                    Span::raw(format!("{:<name_w$} ", row.name)),
                    cell(Field::Val),
                    Span::raw(" "),
                    cell(Field::Min),
                    Span::raw(" "),
                    cell(Field::Max),
                    Span::raw(" "),
                    Span::styled(slider, Style::default().fg(Color::Cyan)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Parameters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_masks(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = if self.ws.masks.is_empty() {
            vec![ListItem::new(Span::styled("(none)", Style::default().fg(Color::Gray)))]
        } else {
            self.ws
                .masks
                .intervals()
                .iter()
                .map(|i| ListItem::new(format!("{} .. {}", i.start_date, i.stop_date)))
                .collect()
        };
        let list = List::new(items).block(Block::default().title("Ignored").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_history(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let visible = area.height.saturating_sub(2) as usize;
        let start = self.history.len().saturating_sub(visible);
        let items: Vec<ListItem> = self.history[start..]
            .iter()
            .map(|line| ListItem::new(line.as_str()))
            .collect();
        let list = List::new(items).block(Block::default().title("Commands").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = match &self.mode {
            InputMode::Command(buffer) => Line::from(vec![
                Span::styled(":", Style::default().fg(Color::Yellow)),
                Span::raw(format!("{buffer}_")),
                Span::raw("  | "),
                Span::styled(&self.status, Style::default().fg(Color::Gray)),
            ]),
            _ => {
                let stop = if self.session.as_ref().is_some_and(|s| {
                    s.state() == SessionState::Running && s.is_stoppable()
                }) {
                    "  x stop"
                } else {
                    ""
                };
                let help = format!(
                    "↑/↓ select  tab field  enter edit  ←/→ pgup/pgdn slider  space fit  : cmd  f fit{stop}  w save  q quit"
                );
                Line::from(vec![
                    Span::styled(help, Style::default().fg(Color::Gray)),
                    Span::raw(" | "),
                    Span::styled(&self.status, Style::default().fg(Color::Yellow)),
                ])
            }
        };
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn fit_checkbox(thawed: bool) -> &'static str {
    if thawed { "[x]" } else { "[ ]" }
}

/// `[----|-----]` style bar with the knob at `position` (0..=100).
fn slider_bar(position: u8, width: usize) -> String {
    let width = width.max(2);
    let knob = (usize::from(position.min(100)) * (width - 1) + 50) / 100;
    let track: String = (0..width).map(|i| if i == knob { '|' } else { '-' }).collect();
    format!("[{track}]")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::thread;

    use super::*;
    use crate::domain::FitProblem;
    use crate::fit::worker::{Fitter, Progress, ThreadWorker};
    use crate::io::ModelFile;

    const MODEL: &str = r#"{
  "name": "demo",
  "datestart": "2020:001",
  "datestop": "2020:031",
  "pars": [
    {"full_name": "foo.bar", "val": 5.0, "min": 0.0, "max": 10.0, "fmt": "{:.2f}"},
    {"full_name": "foo.baz", "val": 1.0, "min": 0.0, "max": 2.0}
  ]
}"#;

    struct Spin;

    impl Fitter for Spin {
        fn fit(&mut self, problem: &FitProblem, progress: &mut Progress<'_>) -> Vec<f64> {
            progress.report(&[7.0, 1.5]);
            while !progress.is_cancelled() {
                thread::sleep(Duration::from_millis(5));
            }
            problem.parvals.clone()
        }
    }

    fn app(factory: Option<WorkerFactory>) -> App {
        let model: ModelFile = serde_json::from_str(MODEL).unwrap();
        let ws = Workspace::from_model(PathBuf::from("demo.json"), model).unwrap();
        App::new(ws, factory)
    }

    fn keys(app: &mut App, codes: &[KeyCode]) {
        for &code in codes {
            assert!(!app.handle_key(code));
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn slider_keys_move_through_the_quantizer() {
        let mut app = app(None);
        keys(&mut app, &[KeyCode::Right]);
        assert!((app.ws.store.values()[0] - 5.1).abs() < 1e-9);
        keys(&mut app, &[KeyCode::PageDown, KeyCode::PageDown]);
        assert!((app.ws.store.values()[0] - 3.1).abs() < 1e-9);
        assert_eq!(app.panel.borrow().row(0).unwrap().position, 31);
    }

    #[test]
    fn field_edit_commits_and_reports_clamp() {
        let mut app = app(None);
        keys(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.mode, InputMode::Edit("5.00".to_string()));
        for _ in 0..4 {
            app.handle_key(KeyCode::Backspace);
        }
        type_text(&mut app, "42");
        keys(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.ws.store.values()[0], 10.0);
        assert_eq!(app.panel.borrow().row(0).unwrap().val_text, "10.00");
        assert!(app.status.starts_with("foo.bar:"), "{}", app.status);
    }

    #[test]
    fn tab_selects_bound_fields() {
        let mut app = app(None);
        keys(&mut app, &[KeyCode::Down, KeyCode::Tab, KeyCode::Tab, KeyCode::Enter]);
        app.handle_key(KeyCode::Backspace);
        type_text(&mut app, "4");
        keys(&mut app, &[KeyCode::Enter]);
        let p = app.ws.store.get("foo.baz").unwrap();
        assert_eq!(p.max, 4.0);
        assert_eq!(p.val, 1.0);
    }

    #[test]
    fn space_and_command_line_change_frozen_flags() {
        let mut app = app(None);
        keys(&mut app, &[KeyCode::Char(' ')]);
        assert!(app.ws.store.params()[0].frozen);

        keys(&mut app, &[KeyCode::Char(':')]);
        type_text(&mut app, "thaw foo*");
        keys(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.ws.store.thawed_count(), 2);
        assert_eq!(app.history.len(), 1);

        keys(&mut app, &[KeyCode::Char(':')]);
        type_text(&mut app, "bogus");
        keys(&mut app, &[KeyCode::Enter]);
        assert!(app.status.starts_with("bad command"));
        assert_eq!(app.ws.store.thawed_count(), 2);
    }

    #[test]
    fn fit_without_worker_reports_status() {
        let mut app = app(None);
        keys(&mut app, &[KeyCode::Char('f')]);
        assert!(app.session.is_none());
        assert!(app.status.contains("No fit worker"));
    }

    #[test]
    fn fit_progress_then_stop() {
        let factory: WorkerFactory = Box::new(|| Box::new(ThreadWorker::new(Box::new(Spin))));
        let mut app = app(Some(factory));
        keys(&mut app, &[KeyCode::Char('f')]);
        assert_eq!(app.fit_state(), SessionState::Running);

        let deadline = Instant::now() + Duration::from_secs(10);
        while app.ws.store.values() != vec![7.0, 1.5] && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(50));
            app.poll_fit(Instant::now() + Duration::from_secs(1));
        }
        assert_eq!(app.panel.borrow().row(0).unwrap().val_text, "7.00");

        keys(&mut app, &[KeyCode::Char('x')]);
        assert_eq!(app.status, "Stopping fit...");
        assert!(app.handle_key(KeyCode::Char('q')));
        assert_eq!(app.fit_state(), SessionState::Terminated);
    }

    #[test]
    fn slider_bar_places_knob() {
        assert_eq!(slider_bar(0, 5), "[|----]");
        assert_eq!(slider_bar(100, 5), "[----|]");
        assert_eq!(slider_bar(50, 5), "[--|--]");
    }
}
