//! Interactive dashboard (`dashctl -i`).

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use appwrite_dashboard_api::models::{ActiveSessionsResponse, DashboardStats, NamedCount, TimeBucket};
use appwrite_dashboard_api::upstream::User;
use chrono::{DateTime, Utc};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs},
    Frame, Terminal,
};

use crate::api::ApiClient;
use crate::view::{self, ExpandState, SummaryCards};

const RECENT_USERS: u32 = 5;
const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Overview,
    Sessions,
    Analytics,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Overview, Tab::Sessions, Tab::Analytics];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Overview => "Overview",
            Tab::Sessions => "Active Sessions",
            Tab::Analytics => "Analytics",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    /// Tab for a `1`..`4` key press.
    pub fn from_digit(c: char) -> Option<Tab> {
        let n = c.to_digit(10)? as usize;
        Tab::ALL.get(n.checked_sub(1)?).copied()
    }
}

pub async fn run_tui(client: ApiClient) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(client);
    let res = run_app(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

struct App {
    client: ApiClient,
    tab: Tab,
    stats: DashboardStats,
    recent: Vec<User>,
    sessions: ActiveSessionsResponse,
    devices: Vec<NamedCount>,
    locations: Vec<NamedCount>,
    times: Vec<TimeBucket>,
    table: TableState,
    expand: ExpandState,
    refreshed_at: Option<DateTime<Utc>>,
}

impl App {
    fn new(client: ApiClient) -> App {
        App {
            client,
            tab: Tab::Dashboard,
            stats: DashboardStats::default(),
            recent: Vec::new(),
            sessions: ActiveSessionsResponse::default(),
            devices: Vec::new(),
            locations: Vec::new(),
            times: Vec::new(),
            table: TableState::default(),
            expand: ExpandState::default(),
            refreshed_at: None,
        }
    }

    /// Re-fetch everything the current tab shows.
    async fn load(&mut self) {
        match self.tab {
            Tab::Dashboard => {
                let (stats, recent) =
                    tokio::join!(self.client.dashboard_stats(), self.client.recent_users(RECENT_USERS));
                self.stats = stats;
                self.recent = recent;
            }
            Tab::Overview | Tab::Sessions | Tab::Analytics => {
                let (sessions, devices, locations, times) = tokio::join!(
                    self.client.active_sessions(),
                    self.client.sessions_by_device(),
                    self.client.sessions_by_location(),
                    self.client.sessions_by_time(),
                );
                self.sessions = sessions;
                self.devices = devices;
                self.locations = locations;
                self.times = times;
                self.expand.clear();
                let selected = (!self.sessions.sessions.is_empty()).then_some(0);
                self.table.select(selected);
            }
        }
        self.refreshed_at = Some(Utc::now());
    }

    async fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.load().await;
    }

    fn next(&mut self) {
        let len = self.sessions.sessions.len();
        if len == 0 {
            return;
        }
        let i = match self.table.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table.select(Some(i));
    }

    fn previous(&mut self) {
        let len = self.sessions.sessions.len();
        if len == 0 {
            return;
        }
        let i = match self.table.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table.select(Some(i));
    }

    async fn toggle_selected(&mut self) {
        let Some(session) = self.table.selected().and_then(|i| self.sessions.sessions.get(i)) else {
            return;
        };
        if let Some(id) = self.expand.toggle(&session.id) {
            let details = self.client.session_details(&id).await;
            self.expand.set_detail(details);
        }
    }
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    app.load().await;
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, &mut app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('r') => app.load().await,
                    KeyCode::Tab => app.select_tab(app.tab.next()).await,
                    KeyCode::BackTab => app.select_tab(app.tab.previous()).await,
                    KeyCode::Char(c @ '1'..='4') => {
                        if let Some(tab) = Tab::from_digit(c) {
                            app.select_tab(tab).await;
                        }
                    }
                    KeyCode::Down | KeyCode::Char('j') if app.tab == Tab::Sessions => app.next(),
                    KeyCode::Up | KeyCode::Char('k') if app.tab == Tab::Sessions => app.previous(),
                    KeyCode::Enter if app.tab == Tab::Sessions => app.toggle_selected().await,
                    _ => {}
                }
            }
        }
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.size());

    let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Appwrite Dashboard - {}", app.client.base_url())),
        )
        .select(app.tab.index())
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    match app.tab {
        Tab::Dashboard => draw_dashboard(f, app, chunks[1]),
        Tab::Overview => draw_overview(f, app, chunks[1]),
        Tab::Sessions => draw_sessions(f, app, chunks[1]),
        Tab::Analytics => draw_analytics(f, app, chunks[1]),
    }

    let refreshed = app
        .refreshed_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let footer = Paragraph::new(format!(
        "q: Quit | r: Refresh | Tab/1-4: Switch | ↑/↓: Navigate | Enter: Expand  (updated {})",
        refreshed
    ))
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(footer, chunks[2]);
}

fn card(f: &mut Frame, area: Rect, title: &str, value: String) {
    let body = Paragraph::new(Line::from(Span::styled(
        value,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(body, area);
}

fn card_row(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4].as_ref())
        .split(area)
        .to_vec()
}

fn split_cards(area: Rect) -> (Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);
    (rows[0], rows[1])
}

fn draw_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let cards = SummaryCards::from_stats(&app.stats);
    let (top, bottom) = split_cards(area);
    let slots = card_row(top);

    card(f, slots[0], "Total Users", cards.total_users.to_string());
    card(f, slots[1], "Active Sessions", cards.active_sessions.to_string());
    card(f, slots[2], "New Users (24h)", cards.new_users.to_string());
    card(f, slots[3], "Sessions / User", format!("{:.2}", cards.sessions_per_user));

    let now = Utc::now();
    let rows: Vec<Row> = app
        .recent
        .iter()
        .map(|u| {
            Row::new(vec![
                u.name.clone(),
                u.email.clone(),
                view::relative_age(u.created_at, now),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [Constraint::Percentage(30), Constraint::Percentage(45), Constraint::Percentage(25)],
    )
    .header(Row::new(vec!["Name", "Email", "Joined"]).style(Style::default().add_modifier(Modifier::BOLD)))
    .block(Block::default().borders(Borders::ALL).title("Recent Users"));
    f.render_widget(table, bottom);
}

fn draw_overview(f: &mut Frame, app: &App, area: Rect) {
    let (top, bottom) = split_cards(area);
    let slots = card_row(top);

    let name_or_dash = |c: Option<&NamedCount>| c.map(|c| c.name.clone()).unwrap_or_else(|| "-".to_string());
    card(f, slots[0], "Active Sessions", app.sessions.total.to_string());
    card(f, slots[1], "Most Used Device", name_or_dash(view::most_used(&app.devices)));
    card(f, slots[2], "Top Location", name_or_dash(view::most_used(&app.locations)));
    card(
        f,
        slots[3],
        "Peak Time",
        view::peak_time(&app.times)
            .map(|b| b.time.clone())
            .unwrap_or_else(|| "-".to_string()),
    );

    let body = Paragraph::new(named_lines(&app.devices))
        .block(Block::default().borders(Borders::ALL).title("Device Distribution"));
    f.render_widget(body, bottom);
}

fn draw_sessions(f: &mut Frame, app: &mut App, area: Rect) {
    let (table_area, detail_area) = if app.expand.expanded().is_some() {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
            .split(area);
        (parts[0], Some(parts[1]))
    } else {
        (area, None)
    };

    let rows: Vec<Row> = app
        .sessions
        .sessions
        .iter()
        .map(|s| {
            let marker = if app.expand.is_expanded(&s.id) { "▼" } else { "▶" };
            let status_color = if s.active { Color::Green } else { Color::Red };
            Row::new(vec![
                Cell::from(marker),
                Cell::from(s.user_email.clone()),
                Cell::from(s.device.to_string()),
                Cell::from(s.browser.clone()),
                Cell::from(s.os.clone()),
                Cell::from(s.location.clone()),
                Cell::from(view::status_label(s)).style(Style::default().fg(status_color)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Percentage(28),
            Constraint::Length(8),
            Constraint::Percentage(16),
            Constraint::Percentage(16),
            Constraint::Percentage(18),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec!["", "User", "Device", "Browser", "OS", "Location", "Status"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Active Sessions ({})", app.sessions.total)),
    )
    .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol(">> ");
    f.render_stateful_widget(table, table_area, &mut app.table);

    if let Some(area) = detail_area {
        let lines = match app.expand.detail() {
            Some(details) => {
                let s = &details.session;
                let mut lines = vec![
                    Line::from(format!("Session:  {}", s.id)),
                    Line::from(format!("User:     {} ({})", s.user_email, s.user_id)),
                    Line::from(format!("IP:       {}   Provider: {}", s.ip, s.provider)),
                    Line::from(format!(
                        "Started:  {}   Expires: {}",
                        s.start_time.format("%Y-%m-%d %H:%M"),
                        s.expires_at.format("%Y-%m-%d %H:%M")
                    )),
                    Line::from(format!("Duration: {} minutes", s.duration)),
                    Line::from(""),
                    Line::from(Span::styled("Timeline", Style::default().add_modifier(Modifier::BOLD))),
                ];
                lines.extend(details.actions.iter().map(|a| {
                    Line::from(format!(
                        "  {}  {}  {}",
                        a.timestamp.format("%Y-%m-%d %H:%M"),
                        a.kind,
                        a.details
                    ))
                }));
                lines
            }
            None => vec![Line::from("Loading details...")],
        };
        let detail = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Session Details"));
        f.render_widget(detail, area);
    }
}

fn named_lines(data: &[NamedCount]) -> Vec<Line<'static>> {
    let max = data.iter().map(|c| c.value).max().unwrap_or(0);
    data.iter()
        .map(|c| {
            Line::from(format!(
                "{:<18} {:>5} {}",
                c.name,
                c.value,
                view::bar(c.value, max, BAR_WIDTH)
            ))
        })
        .collect()
}

fn draw_analytics(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(33), Constraint::Percentage(33), Constraint::Percentage(34)].as_ref())
        .split(area);

    let devices = Paragraph::new(named_lines(&app.devices))
        .block(Block::default().borders(Borders::ALL).title("By Device"));
    f.render_widget(devices, columns[0]);

    let locations = Paragraph::new(named_lines(&app.locations))
        .block(Block::default().borders(Borders::ALL).title("By Location"));
    f.render_widget(locations, columns[1]);

    let max = app.times.iter().map(|b| b.sessions).max().unwrap_or(0);
    let times: Vec<Line> = app
        .times
        .iter()
        .map(|b| {
            Line::from(format!(
                "{:<6} {:>5} {}",
                b.time,
                b.sessions,
                view::bar(b.sessions, max, BAR_WIDTH / 2)
            ))
        })
        .collect();
    let times = Paragraph::new(times).block(Block::default().borders(Borders::ALL).title("By Time of Day"));
    f.render_widget(times, columns[2]);
}
