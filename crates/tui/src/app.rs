use std::{io, sync::Arc, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mulforce_core::{
    cards::CardResolver,
    catalog::{Catalog, CatalogLoader},
    config::AppConfig,
    models::{Experience, UnitDefinition, UnitType},
    print::{PrintDocument, PrintJob, PrintOutcome},
    roster::{parse_point_limit, EntryId, ForceRoster},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use tokio::{spawn, sync::mpsc};
use tracing::{error, info, warn};

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_LIMIT_DIGITS: usize = 5;

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
enum Focus {
    Catalog,
    Force,
}

#[derive(Debug, Clone, Default)]
struct LimitPromptModal {
    input: String,
}

impl LimitPromptModal {
    fn new(current: u32) -> Self {
        Self {
            input: current.to_string(),
        }
    }

    fn insert(&mut self, ch: char) {
        if ch.is_ascii_digit() && self.input.len() < MAX_LIMIT_DIGITS {
            self.input.push(ch);
        }
    }

    fn backspace(&mut self) {
        self.input.pop();
    }

    fn value(&self) -> u32 {
        parse_point_limit(&self.input)
    }
}

enum AppEvent {
    Input(Event),
    Tick,
    CatalogLoaded(Result<Catalog>),
    PrintFinished(Result<PrintOutcome>),
}

/// Terminal front end for building a force.
pub struct ForceApp {
    config: AppConfig,
    loader: CatalogLoader,
    resolver: CardResolver,
    catalog: Catalog,
    roster: ForceRoster,
    state: UiState,
    event_tx: Option<mpsc::Sender<AppEvent>>,
    limit_prompt: Option<LimitPromptModal>,
    confirm_clear: bool,
    pending_print: bool,
    pending_catalog: bool,
    theme: Theme,
}

impl ForceApp {
    pub fn new(config: AppConfig, loader: CatalogLoader, resolver: CardResolver) -> Self {
        let roster = ForceRoster::with_limit(config.default_point_limit);
        Self {
            config,
            loader,
            resolver,
            catalog: Catalog::default(),
            roster,
            state: UiState::default(),
            event_tx: None,
            limit_prompt: None,
            confirm_clear: false,
            pending_print: false,
            pending_catalog: false,
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        match self.loader.load().await {
            Ok(catalog) => self.apply_catalog(catalog),
            Err(err) => {
                error!(?err, "Catalog load failed");
                self.state
                    .set_status(format!("Failed to load catalog: {err:#}"));
            }
        }

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        self.event_tx = Some(event_tx);

        let outcome = loop {
            if let Err(err) = terminal.draw(|frame| self.draw(frame)) {
                break Err(err.into());
            }
            if self.state.should_quit {
                break Ok(());
            }
            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) {
                break Ok(());
            }
        };

        restore_terminal(&mut terminal)?;
        self.event_tx = None;
        outcome
    }

    fn apply_catalog(&mut self, catalog: Catalog) {
        let counts = catalog.counts_by_type();
        self.catalog = catalog;
        self.resolver.refresh();
        self.refresh_unit_list();
        info!(total = self.catalog.len(), "Catalog applied");
        self.state.set_status(format!(
            "Loaded {} units ({} vehicles, {} protomechs, {} battle armor, {} infantry) from {}",
            self.catalog.len(),
            counts[0],
            counts[1],
            counts[2],
            counts[3],
            self.loader.source()
        ));
    }

    fn refresh_unit_list(&mut self) {
        let units = self.catalog.units_of_type(self.state.unit_type);
        self.state.set_units(units);
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event) {
                    self.state.set_status(format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Tick) => true,
            Some(AppEvent::CatalogLoaded(result)) => {
                self.pending_catalog = false;
                match result {
                    Ok(catalog) => self.apply_catalog(catalog),
                    Err(err) => {
                        error!(?err, "Catalog reload failed");
                        self.state.set_status(format!("Reload failed: {err:#}"));
                    }
                }
                true
            }
            Some(AppEvent::PrintFinished(result)) => {
                self.pending_print = false;
                match result {
                    Ok(outcome) => {
                        let mut message = format!(
                            "Printout written to {} ({} page{})",
                            outcome.path.display(),
                            outcome.pages,
                            if outcome.pages == 1 { "" } else { "s" }
                        );
                        if !outcome.readiness.missing.is_empty() {
                            message.push_str(&format!(
                                " • {} card(s) missing",
                                outcome.readiness.missing.len()
                            ));
                        }
                        if outcome.readiness.timed_out {
                            message.push_str(" • timed out waiting for cards");
                        }
                        self.state.set_status(message);
                    }
                    Err(err) => {
                        error!(?err, "Print failed");
                        self.state.set_status(format!("Print failed: {err:#}"));
                    }
                }
                true
            }
            None => false,
        }
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if self.limit_prompt.is_some() {
            self.handle_limit_prompt_key(key);
            return Ok(());
        }
        if self.confirm_clear {
            self.handle_confirm_key(key);
            return Ok(());
        }
        self.handle_key(key)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.state.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.should_quit = true
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.state.focus = match self.state.focus {
                    Focus::Catalog => Focus::Force,
                    Focus::Force => Focus::Catalog,
                };
            }
            KeyCode::Left | KeyCode::Char('h') => self.cycle_unit_type(-1),
            KeyCode::Right | KeyCode::Char('l') => self.cycle_unit_type(1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::PageDown => self.move_cursor(self.state.list_height.max(1) as isize),
            KeyCode::PageUp => self.move_cursor(-(self.state.list_height.max(1) as isize)),
            KeyCode::Char('v') => {
                self.state.experience = self.state.experience.toggled();
                self.state.set_status(format!(
                    "New units will be added as {}",
                    self.state.experience.label()
                ));
            }
            KeyCode::Enter | KeyCode::Char('a') => self.add_selected_unit(),
            KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Delete => {
                self.remove_selected_entry()?;
            }
            KeyCode::Char('D') => {
                if self.roster.is_empty() {
                    self.state.set_status("Force is already empty".to_string());
                } else {
                    self.confirm_clear = true;
                }
            }
            KeyCode::Char(ch @ '1'..='9') => {
                let index = (ch as usize) - ('1' as usize);
                self.apply_preset(index);
            }
            KeyCode::Char('m') => {
                self.limit_prompt = Some(LimitPromptModal::new(self.roster.point_limit()));
            }
            KeyCode::Char('p') => self.start_print(),
            KeyCode::Char('r') => self.start_catalog_reload(),
            _ => {}
        }
        Ok(())
    }

    fn handle_limit_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.limit_prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.limit_prompt = None;
                self.state.set_status("Point limit unchanged".to_string());
            }
            KeyCode::Enter => {
                let limit = prompt.value();
                self.limit_prompt = None;
                self.set_point_limit(limit);
            }
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Char(ch) => prompt.insert(ch),
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        self.confirm_clear = false;
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let removed = self.roster.len();
                self.roster.clear();
                self.state.force_cursor = 0;
                info!(removed, "Force deleted");
                self.state.set_status(format!("Deleted force ({removed} units)"));
            }
            _ => self.state.set_status("Delete cancelled".to_string()),
        }
    }

    fn cycle_unit_type(&mut self, delta: isize) {
        let len = UnitType::ALL.len() as isize;
        let next = (self.state.unit_type.index() as isize + delta).rem_euclid(len);
        self.state.unit_type = UnitType::ALL[next as usize];
        self.refresh_unit_list();
        self.state.focus = Focus::Catalog;
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.state.focus {
            Focus::Catalog => self.state.move_unit_cursor(delta),
            Focus::Force => {
                let len = self.roster.len();
                self.state.force_cursor = step(self.state.force_cursor, delta, len);
            }
        }
    }

    fn add_selected_unit(&mut self) {
        let Some(selected) = self.state.current_unit() else {
            self.state.set_status("Nothing selected".to_string());
            return;
        };
        // Resolve against the live catalog; a stale selection is a no-op.
        let Some(unit) = self
            .catalog
            .find_by_full_name(&selected.full_name)
            .or_else(|| self.catalog.find_unit(&selected.name))
        else {
            warn!(unit = %selected.name, "Selected unit no longer in catalog");
            self.state.set_status("Nothing selected".to_string());
            return;
        };

        let experience = self.state.experience;
        let points = unit.charged_points(experience);
        let name = unit.name.clone();
        self.roster.add(unit, experience);
        let budget = self.roster.budget();
        let mut message = format!(
            "Added {name} ({}) for {points} PV • {}/{}",
            experience.label(),
            budget.total,
            budget.limit
        );
        if budget.over_budget {
            message.push_str(&format!(" • over by {}", budget.overage));
        }
        self.state.set_status(message);
    }

    fn selected_entry(&self) -> Option<EntryId> {
        self.roster
            .entries()
            .get(self.state.force_cursor)
            .map(|entry| entry.id())
    }

    fn remove_selected_entry(&mut self) -> Result<()> {
        if self.state.focus != Focus::Force {
            self.state
                .set_status("Switch to the force list (Tab) to remove units".to_string());
            return Ok(());
        }
        let Some(id) = self.selected_entry() else {
            self.state.set_status("Force is empty".to_string());
            return Ok(());
        };
        let removed = self.roster.remove(id)?;
        self.state.force_cursor = self
            .state
            .force_cursor
            .min(self.roster.len().saturating_sub(1));
        self.state.set_status(format!(
            "Removed {} • {}/{}",
            removed.summary(),
            self.roster.total_points(),
            self.roster.point_limit()
        ));
        Ok(())
    }

    fn apply_preset(&mut self, index: usize) {
        match self.config.point_presets.get(index).copied() {
            Some(limit) => self.set_point_limit(limit),
            None => self
                .state
                .set_status(format!("No point preset {}", index + 1)),
        }
    }

    fn set_point_limit(&mut self, limit: u32) {
        self.roster.set_point_limit(limit);
        let budget = self.roster.budget();
        info!(limit, total = budget.total, "Point limit changed");
        self.state.set_status(format!("Point limit set to {limit}"));
    }

    fn start_print(&mut self) {
        if self.pending_print {
            self.state.set_status("Print already in progress".to_string());
            return;
        }
        let Some(sender) = self.event_tx.clone() else {
            return;
        };
        let document = PrintDocument::build(&self.roster, &self.resolver, Local::now());
        let job = PrintJob::from_config(&self.config);
        let cards = document.cards.len();
        self.pending_print = true;
        self.state
            .set_status(format!("Preparing print layout ({cards} cards)…"));
        spawn(async move {
            let result = job.run(document).await;
            if sender.send(AppEvent::PrintFinished(result)).await.is_err() {
                warn!("Print finished after the UI closed");
            }
        });
    }

    fn start_catalog_reload(&mut self) {
        if self.pending_catalog {
            return;
        }
        let Some(sender) = self.event_tx.clone() else {
            return;
        };
        let loader = self.loader.clone();
        loader.invalidate();
        self.pending_catalog = true;
        self.state.set_status("Reloading catalog…".to_string());
        spawn(async move {
            let result = loader.load().await;
            if sender.send(AppEvent::CatalogLoaded(result)).await.is_err() {
                warn!("Catalog reload finished after the UI closed");
            }
        });
    }

    fn draw(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(size);

        self.render_header(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Percentage(30),
                Constraint::Percentage(35),
            ])
            .split(chunks[1]);
        self.render_unit_list(frame, body[0]);
        self.render_preview(frame, body[1]);
        self.render_force(frame, body[2]);
        self.render_status(frame, chunks[2]);

        if let Some(prompt) = &self.limit_prompt {
            self.render_limit_prompt(frame, prompt);
        } else if self.confirm_clear {
            self.render_confirm(frame);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(28)])
            .split(area);

        let counts = self.catalog.counts_by_type();
        let titles: Vec<Line> = UnitType::ALL
            .iter()
            .map(|unit_type| Line::from(format!("{} ({})", unit_type.label(), counts[unit_type.index()])))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.state.unit_type.index())
            .block(Block::default().borders(Borders::ALL).title("Unit Type"))
            .style(Style::default().fg(self.theme.muted))
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, layout[0]);

        let budget = self.roster.budget();
        let color = if budget.over_budget {
            self.theme.danger
        } else {
            self.theme.success
        };
        let mut spans = vec![Span::styled(
            format!("{} / {} PV", budget.total, budget.limit),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )];
        if budget.over_budget {
            spans.push(Span::styled(
                format!("  +{}", budget.overage),
                Style::default().fg(self.theme.danger),
            ));
        }
        let badge = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Points"));
        frame.render_widget(badge, layout[1]);
    }

    fn render_unit_list(&mut self, frame: &mut Frame, area: Rect) {
        self.state.list_height = area.height.saturating_sub(2) as usize;
        let items: Vec<ListItem> = self
            .state
            .units
            .iter()
            .map(|unit| {
                ListItem::new(Line::from(Span::styled(
                    unit.display_name(),
                    Style::default().fg(self.theme.primary_fg),
                )))
            })
            .collect();

        let mut list_state = ListState::default();
        if !self.state.units.is_empty() {
            list_state.select(Some(self.state.unit_cursor));
        }
        let title = format!("{} units", self.state.unit_type.label());
        let list = List::new(items)
            .block(self.focus_block(title, Focus::Catalog))
            .highlight_symbol("▶ ")
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Preview");
        let Some(unit) = self.state.current_unit() else {
            let paragraph = Paragraph::new("No unit selected")
                .style(Style::default().fg(self.theme.muted))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        };

        let card = self.resolver.resolve(&unit);
        let experience = self.state.experience;
        let mut lines = vec![
            Line::from(Span::styled(
                unit.full_name.clone(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Type: {}", unit.unit_type)),
            Line::from(format!("Regular: {} PV", unit.regular_point_value)),
            Line::from(format!(
                "Veteran: {} PV (charged {})",
                unit.veteran_point_value,
                unit.charged_points(Experience::Veteran)
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "Adding as {} for {} PV",
                    experience.label(),
                    unit.charged_points(experience)
                ),
                Style::default().fg(self.theme.warning),
            )),
            Line::from(""),
        ];
        if card.placeholder {
            lines.push(Line::from(Span::styled(
                card.label,
                Style::default().fg(self.theme.danger),
            )));
        } else {
            lines.push(Line::from(format!("Card: {}", card.path.display())));
        }
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_force(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .roster
            .entries()
            .iter()
            .map(|entry| {
                let style = if entry.is_veteran() {
                    Style::default().fg(self.theme.warning)
                } else {
                    Style::default().fg(self.theme.primary_fg)
                };
                ListItem::new(Line::from(Span::styled(entry.summary(), style)))
            })
            .collect();

        let mut list_state = ListState::default();
        if !self.roster.is_empty() && self.state.focus == Focus::Force {
            list_state.select(Some(self.state.force_cursor.min(self.roster.len() - 1)));
        }
        let title = format!("Force ({} units)", self.roster.len());
        let list = List::new(items)
            .block(self.focus_block(title, Focus::Force))
            .highlight_symbol("▶ ")
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let help = "Tab focus • ←/→ type • v veteran • Enter add • d remove • D delete force • 1-3 presets • m limit • p print • r reload • q quit";
        let paragraph = Paragraph::new(vec![
            Line::from(self.state.status.clone()),
            Line::from(Span::styled(help, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_limit_prompt(&self, frame: &mut Frame, prompt: &LimitPromptModal) {
        let area = centered_rect(40, 7, frame.size());
        frame.render_widget(Clear, area);
        let presets = self
            .config
            .point_presets
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("/");
        let lines = vec![
            Line::from(Span::styled(
                format!("{}▏", prompt.input),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("Enter apply • Esc cancel • presets {presets}"),
                Style::default().fg(self.theme.muted),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Point Limit"));
        frame.render_widget(paragraph, area);
    }

    fn render_confirm(&self, frame: &mut Frame) {
        let area = centered_rect(48, 6, frame.size());
        frame.render_widget(Clear, area);
        let lines = vec![
            Line::from(Span::styled(
                format!("Delete the entire force ({} units)?", self.roster.len()),
                Style::default()
                    .fg(self.theme.danger)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("y confirm • any other key cancels"),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Delete Force"));
        frame.render_widget(paragraph, area);
    }

    fn focus_block(&self, title: String, focus: Focus) -> Block<'static> {
        let style = if self.state.focus == focus {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default().fg(self.theme.muted)
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(title)
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn step(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (cursor as isize + delta).clamp(0, len as isize - 1) as usize
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
    unit_type: UnitType,
    units: Vec<Arc<UnitDefinition>>,
    unit_cursor: usize,
    force_cursor: usize,
    list_height: usize,
    experience: Experience,
    focus: Focus,
    status: String,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            unit_type: UnitType::Vehicle,
            units: Vec::new(),
            unit_cursor: 0,
            force_cursor: 0,
            list_height: 1,
            experience: Experience::Regular,
            focus: Focus::Catalog,
            status: "Ready".to_string(),
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_units(&mut self, units: Vec<Arc<UnitDefinition>>) {
        self.units = units;
        self.unit_cursor = 0;
    }

    fn move_unit_cursor(&mut self, delta: isize) {
        self.unit_cursor = step(self.unit_cursor, delta, self.units.len());
    }

    fn current_unit(&self) -> Option<Arc<UnitDefinition>> {
        self.units.get(self.unit_cursor).cloned()
    }

    fn set_status(&mut self, message: String) {
        self.status = message;
    }
}
