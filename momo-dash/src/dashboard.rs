//! The interactive dashboard: filter form, three chart panels, transaction
//! table, status bar.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType,
        Paragraph, Row, Table, TableState,
    },
};
use std::io::{self, Stdout};
use std::sync::mpsc::Receiver;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

use momo_core::{FilterCriteria, PaymentCategory, Transaction};

use crate::config::Config;
use crate::format::{format_amount, format_compact, format_date, format_opt_amount};
use crate::view::ViewState;
use crate::worker::{FetchEvent, FetchRequest};

/// The five filter fields, in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterField {
    Type,
    DateStart,
    DateEnd,
    AmountMin,
    AmountMax,
}

impl FilterField {
    const ALL: [FilterField; 5] = [
        FilterField::Type,
        FilterField::DateStart,
        FilterField::DateEnd,
        FilterField::AmountMin,
        FilterField::AmountMax,
    ];

    fn title(&self) -> &'static str {
        match self {
            FilterField::Type => " type ",
            FilterField::DateStart => " from (YYYY-MM-DD) ",
            FilterField::DateEnd => " to (YYYY-MM-DD) ",
            FilterField::AmountMin => " min amount ",
            FilterField::AmountMax => " max amount ",
        }
    }
}

/// Editable filter form
#[derive(Debug, Default)]
struct FilterForm {
    values: [String; 5],
    focused: usize,
}

impl FilterForm {
    fn focused_value_mut(&mut self) -> &mut String {
        &mut self.values[self.focused]
    }

    fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % FilterField::ALL.len();
    }

    fn focus_previous(&mut self) {
        self.focused = (self.focused + FilterField::ALL.len() - 1) % FilterField::ALL.len();
    }

    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_input(
            &self.values[0],
            &self.values[1],
            &self.values[2],
            &self.values[3],
            &self.values[4],
        )
    }
}

pub struct App {
    pub view: ViewState,
    filters: FilterForm,
    table_state: TableState,
    currency: String,
    next_request_id: u64,
    requests: UnboundedSender<FetchRequest>,
    events: Receiver<FetchEvent>,
}

impl App {
    pub fn new(
        config: &Config,
        requests: UnboundedSender<FetchRequest>,
        events: Receiver<FetchEvent>,
    ) -> Self {
        Self {
            view: ViewState::new(),
            filters: FilterForm::default(),
            table_state: TableState::default(),
            currency: config.dashboard.currency.clone(),
            next_request_id: 0,
            requests,
            events,
        }
    }

    /// Submit the current filter form to the worker. The worker owns the
    /// debounce window, so mashing Enter stays cheap.
    pub fn apply_filters(&mut self) {
        self.next_request_id += 1;
        self.view.loading = true;
        let _ = self.requests.send(FetchRequest {
            request_id: self.next_request_id,
            criteria: self.filters.criteria(),
        });
    }

    fn drain_events(&mut self) {
        while let Ok(ev) = self.events.try_recv() {
            match ev {
                FetchEvent::Started { .. } => self.view.loading = true,
                FetchEvent::Loaded { records, .. } => {
                    self.view.on_data_loaded(records);
                    self.fix_selection();
                }
                FetchEvent::Failed { message, .. } => self.view.on_fetch_failed(message),
            }
        }
    }

    fn fix_selection(&mut self) {
        let len = self.view.records.len();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            None => self.table_state.select(Some(0)),
            Some(i) if i >= len => self.table_state.select(Some(len - 1)),
            Some(_) => {}
        }
    }

    fn next_row(&mut self) {
        let len = self.view.records.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn previous_row(&mut self) {
        let len = self.view.records.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }
}

/// Set up the terminal, run the event loop, and always restore the screen
pub fn run_dashboard(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.drain_events();
        terminal.draw(|f| draw(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.view.reset_charts();
                        app.apply_filters();
                    }
                    KeyCode::Tab => app.filters.focus_next(),
                    KeyCode::BackTab => app.filters.focus_previous(),
                    KeyCode::Enter => app.apply_filters(),
                    KeyCode::Up => app.previous_row(),
                    KeyCode::Down => app.next_row(),
                    KeyCode::Backspace => {
                        app.filters.focused_value_mut().pop();
                    }
                    KeyCode::Char(c) => {
                        app.filters.focused_value_mut().push(c);
                    }
                    _ => {}
                }
            }
        }
    }
}

fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // filter form
            Constraint::Length(14), // charts
            Constraint::Min(5),     // table
            Constraint::Length(3),  // status bar
        ])
        .split(f.area());

    render_filter_form(f, chunks[0], app);
    render_charts(f, chunks[1], app);
    render_table(f, chunks[2], app);
    render_status_bar(f, chunks[3], app);
}

fn render_filter_form(f: &mut Frame, area: Rect, app: &App) {
    let fields = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(24),
            Constraint::Percentage(19),
            Constraint::Percentage(19),
            Constraint::Percentage(19),
            Constraint::Percentage(19),
        ])
        .split(area);

    for (i, field) in FilterField::ALL.iter().enumerate() {
        let focused = i == app.filters.focused;
        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(field.title());

        let mut value = app.filters.values[i].clone();
        if focused {
            value.push('_');
        }
        let widget = Paragraph::new(value).block(block);
        f.render_widget(widget, fields[i]);
    }
}

fn render_charts(f: &mut Frame, area: Rect, app: &App) {
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    render_volume_chart(f, panels[0], app);
    render_monthly_chart(f, panels[1], app);
    render_distribution_panel(f, panels[2], app);
}

fn empty_chart_state(f: &mut Frame, area: Rect, block: Block, hint: &str) {
    let content = vec![Line::from(""), Line::from(hint.to_string())];
    f.render_widget(Paragraph::new(content).block(block), area);
}

fn render_volume_chart(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Volume by Type ");

    let data = match app.view.volume_by_type.data() {
        Some(data) => data,
        None => return empty_chart_state(f, area, block, "No data loaded yet."),
    };
    if data.labels.is_empty() {
        return empty_chart_state(f, area, block, "No transactions in this view.");
    }

    let bars: Vec<Bar> = data
        .labels
        .iter()
        .zip(&data.values)
        .map(|(label, value)| {
            Bar::default()
                .value(*value as u64)
                .label(Line::from(label.clone()))
                .style(Style::default().fg(Color::Blue))
                .value_style(Style::default().fg(Color::Black).bg(Color::Blue))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(1);
    f.render_widget(chart, area);
}

fn render_monthly_chart(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(" Monthly Totals ({}) ", app.currency);
    let block = Block::default().borders(Borders::ALL).title(title);

    let data = match app.view.monthly_summary.data() {
        Some(data) => data,
        None => return empty_chart_state(f, area, block, "No data loaded yet."),
    };
    if data.labels.is_empty() {
        return empty_chart_state(f, area, block, "No dated transactions in this view.");
    }

    let points: Vec<(f64, f64)> = data
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect();
    let x_max = (points.len() - 1).max(1) as f64;
    let y_max = data.values.iter().cloned().fold(0.0_f64, f64::max).max(1.0);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Blue))
        .data(&points);

    let x_labels = vec![
        Span::styled(data.labels[0].clone(), Style::default().fg(Color::DarkGray)),
        Span::styled(
            data.labels[data.labels.len() - 1].clone(),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    let y_labels = vec![
        Span::raw("0"),
        Span::raw(format_compact(y_max / 2.0)),
        Span::raw(format_compact(y_max)),
    ];

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(x_labels)
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max * 1.1])
                .labels(y_labels)
                .style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(chart, area);
}

fn category_color(category: PaymentCategory) -> Color {
    match category {
        PaymentCategory::Payment => Color::Blue,
        PaymentCategory::Incoming => Color::Green,
        PaymentCategory::BankDeposit => Color::Yellow,
    }
}

fn render_distribution_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Payment Distribution ");

    let data = match app.view.payment_distribution.data() {
        Some(data) => data,
        None => return empty_chart_state(f, area, block, "No data loaded yet."),
    };

    let total: f64 = data.values.iter().sum();
    let bar_width = 16usize;

    let mut lines = vec![Line::from("")];
    for (category, value) in PaymentCategory::ALL.iter().zip(&data.values) {
        let share = if total > 0.0 { value / total } else { 0.0 };
        let filled = (share * bar_width as f64).round() as usize;
        let bar: String = "█".repeat(filled) + &"░".repeat(bar_width - filled);

        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:<13}", category.label()),
                Style::default().fg(category_color(*category)),
            ),
            Span::styled(bar, Style::default().fg(category_color(*category))),
            Span::raw(format!(
                " {} {} ({:.0}%)",
                format_amount(*value),
                app.currency,
                share * 100.0
            )),
        ]));
        lines.push(Line::from(""));
    }
    if total <= 0.0 {
        lines.push(Line::from(Span::styled(
            " No payment-category amounts in this view.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn type_color(transaction_type: &str) -> Color {
    match transaction_type {
        "payment" => Color::Blue,
        "incoming" => Color::Green,
        "bank_deposit" => Color::Yellow,
        "transfer" | "bank_transfer" => Color::Cyan,
        _ => Color::White,
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = [
        "ID", "Date", "Type", "Amount", "Sender", "Recipient", "Reference", "Balance", "Status",
    ]
    .iter()
    .map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = if app.view.records.is_empty() {
        vec![Row::new(vec![
            Cell::from(""),
            Cell::from("No transactions to display").style(Style::default().fg(Color::DarkGray)),
        ])]
    } else {
        app.view.records.iter().map(transaction_row).collect()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(13),
            Constraint::Length(15),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(16),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Transactions "),
    )
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn transaction_row(tx: &Transaction) -> Row<'_> {
    let color = type_color(&tx.transaction_type);
    let status_color = if tx.is_failed() {
        Color::Red
    } else {
        Color::Green
    };

    Row::new(vec![
        Cell::from(tx.message_id.to_string()),
        Cell::from(format_date(&tx.timestamp)),
        Cell::from(tx.transaction_type.clone()).style(Style::default().fg(color)),
        Cell::from(format_opt_amount(tx.amount)).style(Style::default().fg(color)),
        Cell::from(tx.sender.clone().unwrap_or_else(|| "-".to_string())),
        Cell::from(tx.recipient.clone().unwrap_or_else(|| "-".to_string())),
        Cell::from(tx.reference.clone().unwrap_or_else(|| "-".to_string())),
        Cell::from(format_opt_amount(tx.balance)),
        Cell::from(tx.status.clone()).style(Style::default().fg(status_color)),
    ])
    .height(1)
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.table_state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.view.records.len();

    let mut spans = vec![Span::styled(
        format!(" Row: {selected}/{total} "),
        Style::default().fg(Color::Cyan),
    )];

    if app.view.loading {
        spans.push(Span::raw("| "));
        spans.push(Span::styled(
            "Loading... ",
            Style::default().fg(Color::Yellow),
        ));
    }

    if let Some(notice) = &app.view.notice {
        spans.push(Span::raw("| "));
        spans.push(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Red),
        ));
        spans.push(Span::raw(" "));
    }

    spans.push(Span::raw("| "));
    spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Field | "));
    spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Apply | "));
    spans.push(Span::styled("Up/Down", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Rows | "));
    spans.push(Span::styled("Ctrl+R", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Rebuild charts | "));
    spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    spans.push(Span::raw(" Quit"));

    let status = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}
