use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use teamsync::{
    duplicate_summary, source_for, ImportOutcome, IndexSource, Mode, Session, SPIN_INTERVAL,
};

/// Redraw cadence when nothing is animating
const IDLE_TICK: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFocus {
    Names,
    FilePath,
}

pub struct App {
    pub session: Session,
    rng: Box<dyn IndexSource>,
    pub focus: InputFocus,
    pub path_input: String,
    pub size_input: String,
    /// UI-level messages (export results, failures outside the session)
    pub notice: Option<String>,
}

impl App {
    pub fn new(seed: Option<u64>) -> Self {
        let session = Session::new();
        let size_input = session.group_size().get().to_string();

        Self {
            session,
            rng: source_for(seed),
            focus: InputFocus::Names,
            path_input: String::new(),
            size_input,
            notice: None,
        }
    }

    pub fn import(&mut self, path: &Path) {
        match self.session.import_file(path) {
            ImportOutcome::Applied(count) => {
                tracing::info!(count, file = %path.display(), "imported from UI");
            }
            ImportOutcome::Superseded | ImportOutcome::Failed(_) => {}
        }
    }

    fn edit_names(&mut self, edit: impl FnOnce(&mut String)) {
        let mut text = self.session.input_text().to_string();
        edit(&mut text);
        self.session.set_input_text(text);
    }

    fn sync_size_input(&mut self) {
        self.size_input = self.session.group_size().get().to_string();
    }

    pub fn start_draw(&mut self) {
        if let Err(e) = self.session.start_draw() {
            tracing::debug!(error = %e, "draw key ignored");
        }
    }

    /// Called every frame tick; drives the spin animation
    pub fn on_tick(&mut self) {
        if self.session.is_spinning() {
            self.session.advance_spin(self.rng.as_mut());
        }
    }

    pub fn make_groups(&mut self) {
        if let Err(e) = self.session.generate_groups(self.rng.as_mut()) {
            self.notice = Some(e.to_string());
        }
    }

    pub fn export(&mut self) {
        let dir = PathBuf::from(".");
        self.notice = match self.session.export_groups(&dir, Local::now().date_naive()) {
            Ok(_) => None,
            Err(e) => Some(e.to_string()),
        };
    }

    /// Returns true when the app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            return true;
        }

        match key.code {
            KeyCode::Esc if self.focus == InputFocus::FilePath => {
                self.focus = InputFocus::Names;
                return false;
            }
            KeyCode::Esc => return true,
            KeyCode::BackTab => {
                self.session.previous_mode();
                self.focus = InputFocus::Names;
                return false;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.session.previous_mode();
                } else {
                    self.session.next_mode();
                }
                self.focus = InputFocus::Names;
                return false;
            }
            _ => {}
        }

        match self.session.mode() {
            Mode::Input => self.handle_input_key(key, ctrl),
            Mode::Draw => return self.handle_draw_key(key),
            Mode::Group => return self.handle_group_key(key),
        }
        false
    }

    fn handle_input_key(&mut self, key: KeyEvent, ctrl: bool) {
        if self.focus == InputFocus::FilePath {
            match key.code {
                KeyCode::Enter => {
                    let path = PathBuf::from(self.path_input.trim());
                    self.import(&path);
                    self.focus = InputFocus::Names;
                }
                KeyCode::Backspace => {
                    self.path_input.pop();
                }
                KeyCode::Char(c) => self.path_input.push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('l') if ctrl => self.session.load_sample(),
            KeyCode::Char('d') if ctrl => self.session.remove_duplicates(),
            KeyCode::Char('x') if ctrl => self.session.clear(),
            KeyCode::Char('o') if ctrl => {
                self.path_input.clear();
                self.focus = InputFocus::FilePath;
            }
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => self.edit_names(|text| text.push(c)),
            KeyCode::Enter => self.edit_names(|text| text.push('\n')),
            KeyCode::Backspace => self.edit_names(|text| {
                text.pop();
            }),
            _ => {}
        }
    }

    fn handle_draw_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char(' ') | KeyCode::Enter => self.start_draw(),
            KeyCode::Char('a') if !self.session.is_spinning() => self.session.toggle_repeats(),
            KeyCode::Char('r') => self.session.reset_draw(),
            _ => {}
        }
        false
    }

    fn handle_group_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let size = self.session.group_size().increment();
                self.session.set_group_size(size);
                self.sync_size_input();
            }
            KeyCode::Char('-') => {
                let size = self.session.group_size().decrement();
                self.session.set_group_size(size);
                self.sync_size_input();
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.size_input.push(c);
                self.session.set_group_size_input(&self.size_input);
            }
            KeyCode::Backspace => {
                self.size_input.pop();
                self.session.set_group_size_input(&self.size_input);
            }
            KeyCode::Enter | KeyCode::Char('g') => {
                self.sync_size_input();
                self.make_groups();
            }
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
        false
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let interval = if app.session.is_spinning() { SPIN_INTERVAL } else { IDLE_TICK };
        let timeout = interval.saturating_sub(last_tick.elapsed());

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key) {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= interval {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.session.mode() {
        Mode::Input => render_input(f, chunks[1], app),
        Mode::Draw => render_draw(f, chunks[1], app),
        Mode::Group => render_groups(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let has_data = app.session.has_participants();

    let mut tab_spans = vec![Span::styled(
        "TeamSync ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    for mode in [Mode::Input, Mode::Draw, Mode::Group] {
        tab_spans.push(Span::raw(" │ "));

        let style = if mode == app.session.mode() {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else if mode.requires_participants() && !has_data {
            Style::default().fg(Color::Black)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(mode.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Participants: {}", app.session.participants().len()),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(Line::from(tab_spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

// ============================================================================
// INPUT PAGE
// ============================================================================

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let editing = app.focus == InputFocus::Names;
    let mut lines: Vec<Line> = app
        .session
        .input_text()
        .split('\n')
        .map(|l| Line::from(l.to_string()))
        .collect();
    if editing {
        if let Some(last) = lines.last_mut() {
            last.spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
        }
    }

    let text_box = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if editing { Color::Yellow } else { Color::White }))
            .title(" Names (newline or comma separated) "),
    );
    f.render_widget(text_box, columns[0]);

    render_input_side_panel(f, columns[1], app);
}

fn render_input_side_panel(f: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let count = session.participants().len();

    let mut content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Current list: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            if count > 0 {
                Span::styled(format!("{} people", count), Style::default().fg(Color::Green))
            } else {
                Span::styled("empty", Style::default().fg(Color::DarkGray))
            },
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Load file: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            if app.focus == InputFocus::FilePath {
                Span::styled(format!("{}▏", app.path_input), Style::default().fg(Color::Yellow))
            } else {
                Span::styled("Ctrl-O (.csv or .txt)", Style::default().fg(Color::DarkGray))
            },
        ]),
    ];

    if let Some(error) = session.error() {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            format!("  ✗ {}", error),
            Style::default().fg(Color::Red),
        )));
    }

    let duplicates = session.duplicates();
    if !duplicates.is_empty() {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            format!("  ⚠ Found {} duplicate names", duplicates.len()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        content.push(Line::from(Span::styled(
            format!("  {}", duplicate_summary(&duplicates)),
            Style::default().fg(Color::Yellow),
        )));
        content.push(Line::from(vec![
            Span::raw("  "),
            Span::styled("Ctrl-D", Style::default().fg(Color::Yellow)),
            Span::raw(" remove duplicates"),
        ]));
    }

    if let Some(status) = session.status() {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            format!("  {}", status),
            Style::default().fg(Color::Green),
        )));
    }

    let panel = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Import "),
    );
    f.render_widget(panel, area);
}

// ============================================================================
// DRAW PAGE
// ============================================================================

fn render_draw(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let session = &app.session;
    let controller = session.draw_controller();
    let spinning = session.is_spinning();

    let display_style = if spinning {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled("LUCKY DRAW", Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(session.draw_display().to_string(), display_style)),
        Line::from(""),
        Line::from(""),
        Line::from(if spinning {
            Span::styled("Drawing...", Style::default().fg(Color::Yellow))
        } else if controller.can_draw() {
            Span::styled("Press Space to draw", Style::default().fg(Color::Green))
        } else {
            Span::styled("Press Space to draw", Style::default().fg(Color::DarkGray))
        }),
        Line::from(""),
        Line::from(format!(
            "Pool: {} of {}   Repeats: {}",
            controller.pool_size(),
            controller.participants().len(),
            if controller.allow_repeats() { "allowed" } else { "off" }
        )),
    ];

    if let Some(status) = session.status() {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(Color::LightRed),
        )));
    }

    let stage = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Draw "),
    );
    f.render_widget(stage, columns[0]);

    let winners = controller.winners();
    let items: Vec<ListItem> = if winners.is_empty() {
        vec![ListItem::new(Span::styled(
            "No winners yet",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        winners
            .iter()
            .enumerate()
            .map(|(index, winner)| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:>3}. ", winners.len() - index),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw(truncate(&winner.name, 30)),
                ]))
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Winners ({}) ", winners.len())),
    );
    f.render_widget(list, columns[1]);
}

// ============================================================================
// GROUP PAGE
// ============================================================================

fn render_groups(f: &mut Frame, area: Rect, app: &App) {
    let rows_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let session = &app.session;
    let controls = Paragraph::new(Line::from(vec![
        Span::styled(" Group size: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(
            if app.size_input.is_empty() { "_".to_string() } else { app.size_input.clone() },
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  (effective {})", session.group_size().get())),
        Span::raw("   |   "),
        Span::raw(format!("{} participants", session.participants().len())),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::White)));
    f.render_widget(controls, rows_area[0]);

    let Some(grouping) = session.grouping() else {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Adjust the size and press Enter to generate groups",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Groups "));
        f.render_widget(hint, rows_area[1]);
        return;
    };

    let header_cells = ["Group", "Size", "Members"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = grouping.groups.iter().enumerate().map(|(index, group)| {
        let members = group
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Row::new(vec![
            Cell::from(format!("Group {}", index + 1)),
            Cell::from(format!("{}", group.len())),
            Cell::from(members),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [Constraint::Length(10), Constraint::Length(6), Constraint::Min(20)],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} groups ", grouping.groups.len())),
    );

    f.render_widget(table, rows_area[1]);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let mut status_spans = match app.session.mode() {
        Mode::Input if app.focus == InputFocus::FilePath => vec![
            key(" Enter"), Span::raw(" Load | "),
            key("Esc"), Span::raw(" Cancel"),
        ],
        Mode::Input => vec![
            key(" Ctrl-L"), Span::raw(" Sample | "),
            key("Ctrl-O"), Span::raw(" File | "),
            key("Ctrl-D"), Span::raw(" Dedupe | "),
            key("Ctrl-X"), Span::raw(" Clear"),
        ],
        Mode::Draw => vec![
            key(" Space"), Span::raw(" Draw | "),
            key("a"), Span::raw(" Repeats | "),
            key("r"), Span::raw(" Reset"),
        ],
        Mode::Group => vec![
            key(" +/-"), Span::raw(" Size | "),
            key("Enter"), Span::raw(" Group | "),
            key("e"), Span::raw(" Export CSV"),
        ],
    };

    status_spans.push(Span::raw(" | "));
    status_spans.push(key("Tab"));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let notice = app
        .notice
        .as_deref()
        .or(if app.session.mode() == Mode::Group { app.session.status() } else { None });
    if let Some(notice) = notice {
        status_spans.push(Span::raw("  "));
        status_spans.push(Span::styled(notice.to_string(), Style::default().fg(Color::Green)));
    }

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
