use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use insu_dashboard::{
    narrative, round2, ChartSpec, NamedQuery, NarrativeSection, OverviewReport, QueryTable,
    Session, SourceTable, TOP_CLAIMANTS_SQL,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    InsuranceDatabase,
    Overview,
    Queries,
    Summaries,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::InsuranceDatabase,
        Page::Overview,
        Page::Queries,
        Page::Summaries,
    ];

    pub fn next(&self) -> Self {
        match self {
            Page::InsuranceDatabase => Page::Overview,
            Page::Overview => Page::Queries,
            Page::Queries => Page::Summaries,
            Page::Summaries => Page::InsuranceDatabase,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::InsuranceDatabase => Page::Summaries,
            Page::Overview => Page::InsuranceDatabase,
            Page::Queries => Page::Overview,
            Page::Summaries => Page::Queries,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::InsuranceDatabase => "Insurance Database",
            Page::Overview => "Overview",
            Page::Queries => "Queries & Visualizations",
            Page::Summaries => "Summaries & Action Plans",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTab {
    Analysis,
    Custom,
}

/// Outcome of the last ad-hoc execution
#[derive(Debug, Clone, PartialEq)]
pub enum CustomResult {
    Table(QueryTable),
    Error(String),
}

pub struct App {
    pub session: Session,
    pub current_page: Page,

    // Insurance Database
    pub selected_table: SourceTable,
    pub table_data: Option<QueryTable>,
    pub table_state: TableState,

    // Overview
    pub overview: Option<OverviewReport>,

    // Queries
    pub query_tab: QueryTab,
    pub selected_query: usize,
    pub query_result: Option<(QueryTable, Option<ChartSpec>)>,
    pub result_state: TableState,
    pub sql_input: String,
    pub editing_sql: bool,
    pub custom_result: Option<CustomResult>,

    // Summaries
    pub narrative: NarrativeSection,
    pub narrative_scroll: u16,

    pub status: Option<String>,
}

impl App {
    pub fn new(session: Session) -> Self {
        let mut app = Self {
            session,
            current_page: Page::InsuranceDatabase,
            selected_table: SourceTable::Customers,
            table_data: None,
            table_state: TableState::default(),
            overview: None,
            query_tab: QueryTab::Analysis,
            selected_query: 0,
            query_result: None,
            result_state: TableState::default(),
            sql_input: String::new(),
            editing_sql: false,
            custom_result: None,
            narrative: NarrativeSection::SummaryReport,
            narrative_scroll: 0,
            status: None,
        };
        app.select_table(SourceTable::Customers);
        app.refresh_overview();
        app.run_selected_query();
        app
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn select_table(&mut self, table: SourceTable) {
        self.selected_table = table;
        match self.session.browse_table(table) {
            Ok(data) => {
                self.table_state.select(if data.is_empty() { None } else { Some(0) });
                self.table_data = Some(data);
                self.status = None;
            }
            Err(e) => {
                self.table_data = None;
                self.table_state.select(None);
                self.status = Some(e.to_string());
            }
        }
    }

    pub fn refresh_overview(&mut self) {
        match self.session.overview() {
            Ok(report) => self.overview = Some(report),
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    pub fn current_query(&self) -> NamedQuery {
        NamedQuery::MENU[self.selected_query]
    }

    pub fn select_query(&mut self, index: usize) {
        if index < NamedQuery::MENU.len() {
            self.selected_query = index;
            self.run_selected_query();
        }
    }

    pub fn run_selected_query(&mut self) {
        match self.session.run_with_chart(self.current_query()) {
            Ok((table, chart)) => {
                self.result_state.select(if table.is_empty() { None } else { Some(0) });
                self.query_result = Some((table, chart));
                self.status = None;
            }
            Err(e) => {
                self.query_result = None;
                self.status = Some(e.to_string());
            }
        }
    }

    /// Execute whatever is in the SQL box; failures become an inline message
    pub fn execute_custom_query(&mut self) {
        self.custom_result = Some(match self.session.run_adhoc_query(&self.sql_input) {
            Ok(table) => {
                self.result_state.select(if table.is_empty() { None } else { Some(0) });
                CustomResult::Table(table)
            }
            Err(e) => CustomResult::Error(format!("Error: {}", e)),
        });
    }

    pub fn load_example_query(&mut self) {
        self.sql_input = TOP_CLAIMANTS_SQL.replace('\n', " ");
    }

    fn active_row_count(&self) -> usize {
        match self.current_page {
            Page::InsuranceDatabase => self.table_data.as_ref().map(|t| t.row_count()).unwrap_or(0),
            Page::Queries => match self.query_tab {
                QueryTab::Analysis => self.query_result.as_ref().map(|(t, _)| t.row_count()).unwrap_or(0),
                QueryTab::Custom => match &self.custom_result {
                    Some(CustomResult::Table(t)) => t.row_count(),
                    _ => 0,
                },
            },
            _ => 0,
        }
    }

    fn active_state(&mut self) -> &mut TableState {
        match self.current_page {
            Page::InsuranceDatabase => &mut self.table_state,
            _ => &mut self.result_state,
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.active_row_count();
        if len == 0 {
            return;
        }
        let state = self.active_state();
        let current = state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        state.select(Some(next as usize));
    }

    /// Returns false when the app should exit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.editing_sql {
            match key.code {
                KeyCode::Esc => self.editing_sql = false,
                KeyCode::Enter => {
                    self.editing_sql = false;
                    self.execute_custom_query();
                }
                KeyCode::Backspace => {
                    self.sql_input.pop();
                }
                KeyCode::Char(c) => self.sql_input.push(c),
                _ => {}
            }
            return true;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Tab => self.next_page(),
            KeyCode::BackTab => self.previous_page(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(20),
            KeyCode::PageUp => self.move_selection(-20),
            _ => match self.current_page {
                Page::InsuranceDatabase => self.handle_database_key(key),
                Page::Queries => self.handle_queries_key(key),
                Page::Summaries => self.handle_summaries_key(key),
                Page::Overview => {}
            },
        }
        true
    }

    fn handle_database_key(&mut self, key: KeyEvent) {
        let index = SourceTable::ALL
            .iter()
            .position(|t| *t == self.selected_table)
            .unwrap_or(0);
        match key.code {
            KeyCode::Char('1') => self.select_table(SourceTable::Customers),
            KeyCode::Char('2') => self.select_table(SourceTable::Contracts),
            KeyCode::Char('3') => self.select_table(SourceTable::Claims),
            KeyCode::Right => self.select_table(SourceTable::ALL[(index + 1) % SourceTable::ALL.len()]),
            KeyCode::Left => self.select_table(
                SourceTable::ALL[(index + SourceTable::ALL.len() - 1) % SourceTable::ALL.len()],
            ),
            _ => {}
        }
    }

    fn handle_queries_key(&mut self, key: KeyEvent) {
        match (self.query_tab, key.code) {
            (_, KeyCode::Left) => self.query_tab = QueryTab::Analysis,
            (_, KeyCode::Right) => self.query_tab = QueryTab::Custom,
            (QueryTab::Analysis, KeyCode::Char(c @ '1'..='3')) => {
                self.select_query(c as usize - '1' as usize)
            }
            (QueryTab::Analysis, KeyCode::Char('n')) => {
                self.select_query((self.selected_query + 1) % NamedQuery::MENU.len())
            }
            (QueryTab::Custom, KeyCode::Enter) | (QueryTab::Custom, KeyCode::Char('i')) => {
                self.editing_sql = true
            }
            (QueryTab::Custom, KeyCode::Char('e')) => self.load_example_query(),
            (QueryTab::Custom, KeyCode::Char('x')) => self.execute_custom_query(),
            (QueryTab::Custom, KeyCode::Char('u')) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.sql_input.clear()
            }
            _ => {}
        }
    }

    fn handle_summaries_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Right => {
                self.narrative = self.narrative.toggle();
                self.narrative_scroll = 0;
            }
            KeyCode::Char('J') => self.narrative_scroll = self.narrative_scroll.saturating_add(1),
            KeyCode::Char('K') => self.narrative_scroll = self.narrative_scroll.saturating_sub(1),
            _ => {}
        }
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

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if !app.handle_key(key) {
                return Ok(());
            }
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

    match app.current_page {
        Page::InsuranceDatabase => render_database(f, chunks[1], app),
        Page::Overview => render_overview(f, chunks[1], app),
        Page::Queries => render_queries(f, chunks[1], app),
        Page::Summaries => render_summaries(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![Span::styled(
        "Insurance Fraud Analysis  ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];

    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn header_style() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

/// Generic renderer for any query result
fn render_query_table(f: &mut Frame, area: Rect, title: &str, data: &QueryTable, state: &mut TableState) {
    let header = Row::new(
        data.columns
            .iter()
            .map(|h| Cell::from(h.clone()).style(header_style())),
    )
    .style(Style::default().bg(Color::DarkGray))
    .height(1);

    let widths: Vec<Constraint> = data
        .columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let widest = data
                .rows
                .iter()
                .take(200)
                .map(|row| row[idx].to_string().chars().count())
                .max()
                .unwrap_or(0)
                .max(name.chars().count());
            Constraint::Length(widest.min(30) as u16 + 1)
        })
        .collect();

    let rows = data.rows.iter().map(|row| {
        Row::new(row.iter().map(|cell| Cell::from(truncate(&cell.to_string(), 30)))).height(1)
    });

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ({} rows) ", title, data.row_count())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, state);
}

fn render_database(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let mut spans = vec![Span::raw(" Select a table to view: ")];
    for (i, table) in SourceTable::ALL.iter().enumerate() {
        let style = if *table == app.selected_table {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("{}", i + 1), Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(format!(". {}   ", table.table_name()), style));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    if let Some(data) = &app.table_data {
        render_query_table(f, chunks[1], app.selected_table.table_name(), data, &mut app.table_state);
    }
}

fn fraud_rows_table<'a>(title: &'a str, rows: &'a [insu_dashboard::FraudRateRow]) -> Table<'a> {
    let header = Row::new(
        ["GROUP", "FRAUD_COUNT", "TOTAL_COUNT", "FRAUD_RATE"]
            .iter()
            .map(|h| Cell::from(*h).style(header_style())),
    )
    .style(Style::default().bg(Color::DarkGray));

    let body = rows.iter().map(|r| {
        Row::new(vec![
            Cell::from(r.group.clone()),
            Cell::from(r.fraud_count.to_string()),
            Cell::from(r.total_count.to_string()),
            Cell::from(format!("{:.2}", r.display_rate())).style(Style::default().fg(Color::Red)),
        ])
    });

    Table::new(
        body,
        [
            Constraint::Length(12),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)))
}

fn render_overview(f: &mut Frame, area: Rect, app: &App) {
    let Some(report) = &app.overview else {
        f.render_widget(
            Paragraph::new("Overview unavailable").block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Key objectives
            Constraint::Length(3), // Metrics
            Constraint::Min(0),    // Breakdown tables
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(narrative::KEY_OBJECTIVES)
            .block(Block::default().borders(Borders::ALL).title(" Overview of Insurance Database "))
            .wrap(Wrap { trim: false }),
        chunks[0],
    );

    let metric_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(chunks[1]);

    for (idx, (label, value)) in [
        ("Total Customers", report.total_customers),
        ("Total Policies", report.total_policies),
        ("Total Claims", report.total_claims),
    ]
    .iter()
    .enumerate()
    {
        let metric = Paragraph::new(Line::from(vec![
            Span::styled(format!(" {}: ", label), Style::default().fg(Color::Cyan)),
            Span::styled(value.to_string(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        ]))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(metric, metric_chunks[idx]);
    }

    let table_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    f.render_widget(fraud_rows_table("Fraud Rate by Gender", &report.by_gender), table_chunks[0]);
    f.render_widget(fraud_rows_table("Fraud Rate by Age Group", &report.by_age_group), table_chunks[1]);
}

fn render_chart(f: &mut Frame, area: Rect, chart: &ChartSpec) {
    // BarChart takes integers; bars carry hundredths of a percent
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .map(|b| {
            Bar::default()
                .value((round2(b.value) * 100.0).round().max(0.0) as u64)
                .label(Line::from(b.label.clone()))
                .text_value(format!("{:.2}", b.value))
        })
        .collect();

    let bar_chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} - {} ", chart.title, chart.y_label)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(2)
        .max(10_000)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    f.render_widget(bar_chart, area);
}

fn render_queries(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let tab_style = |active: bool| {
        if active {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(" "),
            Span::styled("Analysis Queries", tab_style(app.query_tab == QueryTab::Analysis)),
            Span::raw(" │ "),
            Span::styled("Custom Query", tab_style(app.query_tab == QueryTab::Custom)),
        ])),
        chunks[0],
    );

    match app.query_tab {
        QueryTab::Analysis => render_analysis(f, chunks[1], app),
        QueryTab::Custom => render_custom(f, chunks[1], app),
    }
}

fn render_analysis(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(0)])
        .split(area);

    let mut menu = vec![Line::from("")];
    for (i, query) in NamedQuery::MENU.iter().enumerate() {
        menu.push(Line::from(vec![
            if i == app.selected_query {
                Span::styled(" → ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            } else {
                Span::raw("   ")
            },
            Span::styled(format!("{}", i + 1), Style::default().fg(Color::Yellow)),
            Span::raw(format!(". {}", query.display_name())),
        ]));
    }
    f.render_widget(
        Paragraph::new(menu).block(Block::default().borders(Borders::ALL).title(" Choose a Query ")),
        chunks[0],
    );

    let Some((table, chart)) = &app.query_result else {
        return;
    };

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    let title = app.current_query().display_name();
    render_query_table(f, right[0], title, table, &mut app.result_state);
    if let Some(chart) = chart {
        render_chart(f, right[1], chart);
    }
}

fn render_custom(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Input
            Constraint::Length(4), // Example
            Constraint::Min(0),    // Result
        ])
        .split(area);

    let input_style = if app.editing_sql {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if app.editing_sql { "▏" } else { "" };
    f.render_widget(
        Paragraph::new(format!("{}{}", app.sql_input, cursor))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(input_style)
                    .title(" Enter your SQL Query "),
            ),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                format!(" {}:", narrative::TOP_CLAIMANTS_CAPTION),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(" {}", TOP_CLAIMANTS_SQL.replace('\n', " ")),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(Block::default().borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM).title(" Example Queries ")),
        chunks[1],
    );

    match &app.custom_result {
        Some(CustomResult::Table(table)) => {
            render_query_table(f, chunks[2], "Result", table, &mut app.result_state)
        }
        Some(CustomResult::Error(message)) => f.render_widget(
            Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red))),
            chunks[2],
        ),
        None => {}
    }
}

fn render_summaries(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        " {} │ {}  (←/→ switch) ",
        app.narrative.title(),
        app.narrative.toggle().title()
    );
    let paragraph = Paragraph::new(app.narrative.text())
        .wrap(Wrap { trim: false })
        .scroll((app.narrative_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title),
        );

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = Vec::new();

    if let Some(message) = &app.status {
        status_spans.push(Span::styled(format!(" {} ", message), Style::default().fg(Color::Red)));
        status_spans.push(Span::raw(" | "));
    }

    let hints: &[(&str, &str)] = match (app.current_page, app.query_tab, app.editing_sql) {
        (_, _, true) => &[("Enter", " Execute | "), ("Esc", " Stop editing")],
        (Page::InsuranceDatabase, _, _) => &[("1-3/←→", " Table | "), ("↑/↓", " Nav | ")],
        (Page::Queries, QueryTab::Analysis, _) => &[("1-3", " Query | "), ("←→", " Tab | ")],
        (Page::Queries, QueryTab::Custom, _) => {
            &[("i", " Edit | "), ("e", " Example | "), ("x", " Execute | "), ("←→", " Tab | ")]
        }
        (Page::Summaries, _, _) => &[("←→", " Section | "), ("J/K", " Scroll | ")],
        (Page::Overview, _, _) => &[],
    };
    for (key, label) in hints {
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(*label));
    }

    if !app.editing_sql {
        status_spans.push(Span::styled(" Tab", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Page | "));
        status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
        status_spans.push(Span::raw(" Quit"));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insu_dashboard::SourcePaths;
    use std::path::Path;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app(dir: &Path) -> App {
        let write = |name: &str, body: &str| {
            let path = dir.join(name);
            std::fs::write(&path, body).unwrap();
            path
        };
        let paths = SourcePaths {
            customers: write("cust.csv", "CUST_ID,SEX,AGE,SIU_CUST_YN\n2,M,50,N\n1,M,30,Y\n3,F,20,N\n"),
            contracts: write("cntt.csv", "POLY_NO,CUST_ID,GOOD_CLSF_CDNM\n100,1,Term\n101,3,Annuity\n"),
            claims: write("claim.csv", "POLY_NO,CUST_ID\n100,1\n"),
        };
        App::new(Session::new(paths))
    }

    #[test]
    fn test_page_cycle() {
        let mut page = Page::InsuranceDatabase;
        for _ in 0..Page::ALL.len() {
            page = page.next();
        }
        assert_eq!(page, Page::InsuranceDatabase);
        assert_eq!(Page::InsuranceDatabase.previous(), Page::Summaries);
    }

    #[test]
    fn test_app_loads_customers_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let data = app.table_data.as_ref().unwrap();
        assert_eq!(data.rows[0][0].as_i64(), Some(1));
        assert_eq!(app.overview.as_ref().unwrap().total_customers, 3);
        assert!(app.query_result.is_some());
    }

    #[test]
    fn test_custom_query_error_is_inline() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());
        app.current_page = Page::Queries;
        app.query_tab = QueryTab::Custom;

        app.handle_key(key(KeyCode::Char('i')));
        for c in "SELECT nope FROM claims".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert!(app.handle_key(key(KeyCode::Enter)));

        match &app.custom_result {
            Some(CustomResult::Error(message)) => assert!(message.starts_with("Error:")),
            other => panic!("expected inline error, got {:?}", other),
        }

        // Still running; the example query works afterwards
        app.load_example_query();
        app.execute_custom_query();
        assert!(matches!(app.custom_result, Some(CustomResult::Table(_))));
    }

    #[test]
    fn test_query_menu_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());
        app.current_page = Page::Queries;

        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.current_query(), NamedQuery::FraudByProduct);
        let (_, chart) = app.query_result.as_ref().unwrap();
        let labels: Vec<&str> = chart.as_ref().unwrap().bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "2"]);

        assert!(!app.handle_key(key(KeyCode::Char('q'))));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("보험상품이름이아주길다", 6), "보험상...");
        assert_eq!(truncate("Term", 6), "Term");
    }
}
