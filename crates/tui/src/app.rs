use std::{cmp, io, thread, time::Duration};

use anyhow::{Context, Result};
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
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table,
        TableState, Wrap,
    },
    Frame, Terminal,
};
use shopledger_core::{
    command::{self, Action, BusinessChoice},
    Business, LedgerError, LedgerResult, Outcome, Request, Session,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::form::{Form, FormSignal, InputField};

const TICK_RATE: Duration = Duration::from_millis(250);
const NEW_BUSINESS_LABEL: &str = "+ New business";
const INVALID_INPUT: &str = "Invalid input, please try again.";

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Filter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Businesses,
    Business,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Success,
    Error,
}

/// What a modal form collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormKind {
    OpenBusiness,
    NewBusiness,
    Command,
    Action(Action),
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal front end driving a [`Session`].
pub struct ShopApp {
    session: Session,
    state: UiState,
    screen: Screen,
    current: Option<String>,
    form: Option<Form<FormKind>>,
    theme: Theme,
}

impl ShopApp {
    pub fn new(session: Session) -> Self {
        let mut app = Self {
            session,
            state: UiState::default(),
            screen: Screen::Businesses,
            current: None,
            form: None,
            theme: Theme::default(),
        };
        app.reload_businesses();
        app
    }

    pub async fn run(&mut self) -> Result<()> {
        let count = self.state.all_businesses.len();
        self.set_status(
            StatusKind::Info,
            format!("Loaded {count} businesses from {}", self.session.store().path().display()),
        );

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal).await;
        restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }
            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) {
                break;
            }
            if self.state.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(Event::Key(key))) => {
                if key.kind != KeyEventKind::Press {
                    return true;
                }
                if let Err(err) = self.handle_key(key) {
                    error!(?err, "key handling failed");
                    self.set_status(StatusKind::Error, format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Input(_)) => true,
            Some(AppEvent::Tick) => {
                self.handle_tick();
                true
            }
            None => false,
        }
    }

    fn handle_tick(&mut self) {
        if self.state.mode == Mode::Filter {
            self.state.status = vec![format!("Filter: {}", self.state.filter)];
            self.state.status_kind = StatusKind::Info;
        }
    }

    fn reload_businesses(&mut self) {
        self.state.all_businesses = self.session.business_names();
        self.state.apply_filter();
    }

    fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.state.set_status(kind, message.into());
    }

    fn report(&mut self, result: LedgerResult<Outcome>) {
        match result {
            Ok(outcome) => self.set_status(StatusKind::Success, outcome.to_string()),
            Err(err) => {
                match &err {
                    LedgerError::Storage(source) => error!(?source, "catalog save failed"),
                    other => debug!(error = %other, "request rejected"),
                }
                self.set_status(StatusKind::Error, err.to_string());
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.quit();
            return Ok(());
        }
        if self.form.is_some() {
            self.handle_form_key(key);
            return Ok(());
        }
        match self.screen {
            Screen::Businesses => match self.state.mode {
                Mode::Filter => self.handle_filter_key(key),
                Mode::Browse => self.handle_businesses_key(key),
            },
            Screen::Business => self.handle_business_key(key),
        }
        Ok(())
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.mode = Mode::Browse;
                self.state.filter.clear();
                self.state.apply_filter();
                self.set_status(StatusKind::Info, "Filter cleared");
            }
            KeyCode::Enter => {
                self.state.mode = Mode::Browse;
                let shown = self.state.filtered.len();
                self.set_status(StatusKind::Info, format!("{shown} businesses match"));
            }
            KeyCode::Backspace => {
                self.state.filter.pop();
                self.state.apply_filter();
            }
            KeyCode::Char(ch) => {
                self.state.filter.push(ch);
                self.state.apply_filter();
            }
            _ => {}
        }
    }

    fn handle_businesses_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.quit(),
            KeyCode::Char('j') | KeyCode::Down => self.state.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_cursor(-1),
            KeyCode::Home | KeyCode::Char('g') => self.state.cursor = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.state.cursor = self.state.entry_count().saturating_sub(1);
            }
            KeyCode::Char('/') => {
                self.state.mode = Mode::Filter;
                self.set_status(StatusKind::Info, format!("Filter: {}", self.state.filter));
            }
            KeyCode::Char('n') => self.open_new_business_form(),
            KeyCode::Char(':') => {
                self.form = Some(Form::new(
                    FormKind::OpenBusiness,
                    "Open business",
                    vec![InputField::new("Business name (or 'new')")],
                ));
            }
            KeyCode::Enter => match self.state.current_business().map(str::to_string) {
                Some(name) => self.open_business(&name),
                None => self.open_new_business_form(),
            },
            KeyCode::Char(_) => self.set_status(StatusKind::Error, INVALID_INPUT),
            _ => {}
        }
    }

    fn handle_business_key(&mut self, key: KeyEvent) {
        let action = match key.code {
            KeyCode::Esc => {
                self.close_business();
                return;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_ware_cursor(1);
                return;
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_ware_cursor(-1);
                return;
            }
            KeyCode::Char(':') => {
                self.form = Some(Form::new(
                    FormKind::Command,
                    "Command",
                    vec![InputField::new("Action")],
                ));
                return;
            }
            KeyCode::Char('r') => Action::Restock,
            KeyCode::Char('p') => Action::Price,
            KeyCode::Char('a') => Action::Availability,
            KeyCode::Char('s') => Action::Sell,
            KeyCode::Char('d') => Action::AddDeal,
            KeyCode::Char('x') => Action::RemoveDeal,
            KeyCode::Char('w') => Action::AvailableWares,
            KeyCode::Char('D') => Action::Delete,
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char(_) => {
                self.set_status(StatusKind::Error, INVALID_INPUT);
                return;
            }
            _ => return,
        };
        self.begin_action(action);
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match form.handle_key(key) {
            FormSignal::Editing => {}
            FormSignal::Cancel => {
                self.form = None;
                self.set_status(StatusKind::Info, "Cancelled");
            }
            FormSignal::Submit => {
                if let Some(form) = self.form.take() {
                    self.submit_form(form);
                }
            }
        }
    }

    fn submit_form(&mut self, form: Form<FormKind>) {
        match form.kind {
            FormKind::OpenBusiness => match BusinessChoice::parse(form.value(0)) {
                Ok(BusinessChoice::New) => self.open_new_business_form(),
                Ok(BusinessChoice::Existing(name)) => {
                    if self.session.catalog().contains(&name) {
                        self.open_business(&name);
                    } else {
                        self.set_status(
                            StatusKind::Error,
                            "Business not available, please try again.",
                        );
                    }
                }
                Err(err) => self.set_status(StatusKind::Error, err.to_string()),
            },
            FormKind::NewBusiness => {
                let result = command::parse_amount(form.value(1))
                    .and_then(|money| self.session.create_business(form.value(0), money));
                let created = result.is_ok();
                self.report(result);
                if created {
                    self.reload_businesses();
                    let name = form.value(0).to_string();
                    self.state.select_business(&name);
                }
            }
            FormKind::Command => match Action::parse(form.value(0)) {
                Ok(action) => self.begin_action(action),
                Err(err) => self.set_status(StatusKind::Error, err.to_string()),
            },
            FormKind::Action(action) => match build_request(action, &form) {
                Ok(request) => self.perform(request),
                Err(err) => self.set_status(StatusKind::Error, err.to_string()),
            },
        }
    }

    fn open_new_business_form(&mut self) {
        self.form = Some(Form::new(
            FormKind::NewBusiness,
            "New business",
            vec![
                InputField::new("Name"),
                InputField::new("Initial money available"),
            ],
        ));
    }

    fn open_business(&mut self, name: &str) {
        match self.session.business(name) {
            Ok(business) => {
                let money = business.money_available;
                info!(business = name, "business opened");
                self.current = Some(name.to_string());
                self.screen = Screen::Business;
                self.state.ware_cursor = 0;
                self.set_status(
                    StatusKind::Info,
                    format!("Current money available for {name}: {money:.2}"),
                );
            }
            Err(err) => self.set_status(StatusKind::Error, err.to_string()),
        }
    }

    fn close_business(&mut self) {
        self.current = None;
        self.screen = Screen::Businesses;
        self.reload_businesses();
        self.set_status(StatusKind::Info, "Select a business");
    }

    fn current_business(&self) -> Option<&Business> {
        let name = self.current.as_deref()?;
        self.session.catalog().get(name)
    }

    fn selected_ware(&self) -> Option<String> {
        let business = self.current_business()?;
        business
            .wares
            .keys()
            .nth(self.state.ware_cursor)
            .cloned()
    }

    fn move_ware_cursor(&mut self, delta: isize) {
        let total = self.current_business().map(Business::ware_count).unwrap_or(0);
        self.state.ware_cursor = step_cursor(self.state.ware_cursor, delta, total);
    }

    fn begin_action(&mut self, action: Action) {
        let ware = self.selected_ware().unwrap_or_default();
        let ware_field = || InputField::with_value("Ware", &ware);
        let fields = match action {
            Action::Restock => vec![
                ware_field(),
                InputField::new("Quantity"),
                InputField::new("Buy price per unit"),
            ],
            Action::Price | Action::Availability | Action::RemoveDeal => vec![ware_field()],
            Action::Sell => vec![ware_field(), InputField::new("Quantity to sell")],
            Action::AddDeal => vec![ware_field(), InputField::new("Discount percentage")],
            Action::AvailableWares => {
                self.perform(Request::AvailableWares);
                return;
            }
            Action::Delete => {
                self.perform(Request::Delete);
                return;
            }
            Action::Quit => {
                self.perform(Request::Quit);
                return;
            }
        };
        let title = title_case(action.keyword());
        self.form = Some(Form::new(FormKind::Action(action), title, fields));
    }

    fn perform(&mut self, request: Request) {
        let Some(business) = self.current.clone() else {
            self.set_status(StatusKind::Error, "No business selected");
            return;
        };
        let deleting = request == Request::Delete;
        let result = self.session.perform(&business, request);
        let succeeded = result.is_ok();
        self.report(result);

        if self.session.is_finished() {
            self.state.should_quit = true;
        } else if deleting && succeeded {
            self.current = None;
            self.screen = Screen::Businesses;
            self.reload_businesses();
        } else {
            let total = self.current_business().map(Business::ware_count).unwrap_or(0);
            self.state.ware_cursor = self.state.ware_cursor.min(total.saturating_sub(1));
        }
    }

    fn quit(&mut self) {
        match self.session.quit() {
            Ok(_) => self.state.should_quit = true,
            Err(err) => {
                warn!(error = %err, "quit aborted");
                self.set_status(StatusKind::Error, err.to_string());
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        match self.screen {
            Screen::Businesses => self.draw_businesses(frame),
            Screen::Business => self.draw_business(frame),
        }
        if let Some(form) = &self.form {
            self.render_form(frame, form);
        }
    }

    fn draw_businesses(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(self.status_height()),
            ])
            .split(size);

        let title = Paragraph::new(Line::from(Span::styled(
            "shopledger",
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);
        self.render_business_list(frame, body[0]);
        self.render_business_details(frame, body[1]);
        self.render_status(frame, chunks[2]);
    }

    fn render_business_list(&mut self, frame: &mut Frame, area: Rect) {
        self.state.clamp_cursor();
        let mut items: Vec<ListItem> = self
            .state
            .filtered
            .iter()
            .map(|name| {
                ListItem::new(Line::from(Span::styled(
                    name.clone(),
                    Style::default()
                        .fg(self.theme.primary_fg)
                        .add_modifier(Modifier::BOLD),
                )))
            })
            .collect();
        items.push(ListItem::new(Line::from(Span::styled(
            NEW_BUSINESS_LABEL,
            Style::default().fg(self.theme.accent),
        ))));

        let mut list_state = ListState::default();
        list_state.select(Some(self.state.cursor));
        let title = if self.state.filter.is_empty() {
            "Businesses".to_string()
        } else {
            format!("Businesses (filter: {})", self.state.filter)
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_symbol("▶ ")
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_business_details(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Details");
        let mut lines = match self
            .state
            .current_business()
            .and_then(|name| self.session.catalog().get(name))
        {
            Some(business) => {
                let units: u64 = business.wares.values().map(|w| u64::from(w.quantity)).sum();
                let deals = business.wares.values().filter(|w| w.has_deal()).count();
                vec![
                    Line::from(Span::styled(
                        business.name.clone(),
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(vec![
                        Span::styled("Money available: ", Style::default().fg(self.theme.muted)),
                        money_span(business.money_available, &self.theme),
                    ]),
                    Line::from(format!("Wares: {}", business.ware_count())),
                    Line::from(format!("Units in stock: {units}")),
                    Line::from(format!("Active deals: {deals}")),
                ]
            }
            None => vec![
                Line::from("Create a new business."),
                Line::from(""),
                Line::from(Span::styled(
                    "Press Enter or n to start.",
                    Style::default().fg(self.theme.muted),
                )),
            ],
        };
        lines.push(Line::from(""));
        lines.push(help_line(&[
            ("Enter", "open"),
            ("n", "new"),
            ("/", "filter"),
            (":", "type name"),
            ("q", "save & quit"),
        ]));
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_business(&self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(self.status_height()),
            ])
            .split(size);

        let Some(business) = self.current_business() else {
            self.render_status(frame, chunks[2]);
            return;
        };

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                business.name.clone(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  ·  Money available: ", Style::default().fg(self.theme.muted)),
            money_span(business.money_available, &self.theme),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
            .split(chunks[1]);
        self.render_ware_table(frame, body[0], business);
        self.render_action_help(frame, body[1]);
        self.render_status(frame, chunks[2]);
    }

    fn render_ware_table(&self, frame: &mut Frame, area: Rect, business: &Business) {
        let header = Row::new(["Ware", "Qty", "Price", "Buy price", "Deal"]).style(
            Style::default()
                .fg(self.theme.muted)
                .add_modifier(Modifier::BOLD),
        );
        let rows: Vec<Row> = business
            .get_available_wares()
            .zip(business.wares.values())
            .map(|(summary, ware)| {
                let quantity_style = if summary.quantity == 0 {
                    Style::default().fg(self.theme.danger)
                } else {
                    Style::default().fg(self.theme.primary_fg)
                };
                let deal = if ware.has_deal() {
                    Cell::from(format!("-{}%", summary.discount_percentage))
                        .style(Style::default().fg(self.theme.success))
                } else {
                    Cell::from("")
                };
                Row::new(vec![
                    Cell::from(summary.name),
                    Cell::from(summary.quantity.to_string()).style(quantity_style),
                    Cell::from(format!("{:.2}", summary.price)),
                    Cell::from(format!("{:.2}", ware.buy_price)),
                    deal,
                ])
            })
            .collect();

        let mut table_state = TableState::default();
        if !rows.is_empty() {
            table_state.select(Some(self.state.ware_cursor.min(rows.len() - 1)));
        }
        let title = format!("Wares ({})", business.ware_count());
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(34),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(8),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_symbol("▶ ")
        .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(table, area, &mut table_state);
    }

    fn render_action_help(&self, frame: &mut Frame, area: Rect) {
        let bindings = [
            ("r", Action::Restock),
            ("p", Action::Price),
            ("a", Action::Availability),
            ("s", Action::Sell),
            ("d", Action::AddDeal),
            ("x", Action::RemoveDeal),
            ("w", Action::AvailableWares),
            ("D", Action::Delete),
            ("q", Action::Quit),
        ];
        let mut lines: Vec<Line> = bindings
            .iter()
            .map(|(key, action)| {
                Line::from(vec![
                    Span::styled(
                        format!("{key:>3} "),
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(action.keyword()),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(help_line(&[(":", "type action"), ("j/k", "select"), ("Esc", "back")]));
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Actions"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_form(&self, frame: &mut Frame, form: &Form<FormKind>) {
        let frame_area = frame.size();
        let width = cmp::max(cmp::min(60_u16, frame_area.width.saturating_sub(4)), 24);
        let wanted = form.fields.len() as u16 * 2 + 4;
        let height = wanted.min(frame_area.height.saturating_sub(2)).max(5);
        let area = centered_rect(width, height, frame_area);

        frame.render_widget(Clear, area);

        let mut lines = Vec::new();
        for (idx, field) in form.fields.iter().enumerate() {
            let focused = idx == form.focus();
            let label_style = if focused {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted)
            };
            lines.push(Line::from(Span::styled(field.label, label_style)));
            lines.push(Line::from(vec![
                Span::styled("> ", Style::default().fg(self.theme.accent)),
                Span::raw(field.text().to_string()),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(help_line(&[("Enter", "next/submit"), ("Tab", "switch"), ("Esc", "cancel")]));

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(form.title.clone()))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);

        if let Some(field) = form.fields.get(form.focus()) {
            let row = area.y + 2 + form.focus() as u16 * 2;
            let column =
                (area.x + 3 + field.cursor() as u16).min(area.x + area.width.saturating_sub(2));
            frame.set_cursor(column, row);
        }
    }

    fn status_height(&self) -> u16 {
        (self.state.status.len() as u16 + 2).clamp(3, 12)
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let color = match self.state.status_kind {
            StatusKind::Info => self.theme.primary_fg,
            StatusKind::Success => self.theme.success,
            StatusKind::Error => self.theme.warning,
        };
        let lines: Vec<Line> = self
            .state
            .status
            .iter()
            .map(|line| Line::from(Span::styled(line.clone(), Style::default().fg(color))))
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Status"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn build_request(action: Action, form: &Form<FormKind>) -> LedgerResult<Request> {
    let ware = || -> LedgerResult<String> {
        let value = form.value(0);
        if value.is_empty() {
            Err(LedgerError::invalid_input("ware name is required"))
        } else {
            Ok(value.to_string())
        }
    };
    let request = match action {
        Action::Restock => Request::Restock {
            ware: ware()?,
            quantity: command::parse_quantity(form.value(1))?,
            buy_price: command::parse_amount(form.value(2))?,
        },
        Action::Price => Request::Price { ware: ware()? },
        Action::Availability => Request::Availability { ware: ware()? },
        Action::Sell => Request::Sell {
            ware: ware()?,
            quantity: command::parse_quantity(form.value(1))?,
        },
        Action::AddDeal => Request::AddDeal {
            ware: ware()?,
            percentage: command::parse_percentage(form.value(1))?,
        },
        Action::RemoveDeal => Request::RemoveDeal { ware: ware()? },
        Action::AvailableWares => Request::AvailableWares,
        Action::Delete => Request::Delete,
        Action::Quit => Request::Quit,
    };
    Ok(request)
}

fn title_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn step_cursor(cursor: usize, delta: isize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    let next = (cursor as isize + delta).clamp(0, total as isize - 1);
    next as usize
}

fn money_span(amount: f64, theme: &Theme) -> Span<'static> {
    let color = if amount < 0.0 { theme.danger } else { theme.success };
    Span::styled(
        format!("{amount:.2}"),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn help_line(entries: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, label) in entries {
        spans.push(Span::styled(*key, Style::default().add_modifier(Modifier::BOLD)));
        spans.push(Span::raw(format!(" {label}  ")));
    }
    Line::from(spans)
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

struct UiState {
    all_businesses: Vec<String>,
    filtered: Vec<String>,
    cursor: usize,
    ware_cursor: usize,
    filter: String,
    status: Vec<String>,
    status_kind: StatusKind,
    mode: Mode,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            all_businesses: Vec::new(),
            filtered: Vec::new(),
            cursor: 0,
            ware_cursor: 0,
            filter: String::new(),
            status: vec!["Ready".to_string()],
            status_kind: StatusKind::Info,
            mode: Mode::Browse,
            should_quit: false,
        }
    }
}

impl UiState {
    fn apply_filter(&mut self) {
        let needle = self.filter.trim().to_lowercase();
        self.filtered = self
            .all_businesses
            .iter()
            .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        self.clamp_cursor();
    }

    /// Listed businesses plus the trailing "new business" entry.
    fn entry_count(&self) -> usize {
        self.filtered.len() + 1
    }

    fn move_cursor(&mut self, delta: isize) {
        self.cursor = step_cursor(self.cursor, delta, self.entry_count());
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.entry_count() - 1);
    }

    fn current_business(&self) -> Option<&str> {
        self.filtered.get(self.cursor).map(String::as_str)
    }

    fn select_business(&mut self, name: &str) -> bool {
        match self.filtered.iter().position(|entry| entry == name) {
            Some(index) => {
                self.cursor = index;
                true
            }
            None => false,
        }
    }

    fn set_status(&mut self, kind: StatusKind, message: String) {
        self.status = message.lines().map(str::to_string).collect();
        if self.status.is_empty() {
            self.status.push(String::new());
        }
        self.status_kind = kind;
    }
}
