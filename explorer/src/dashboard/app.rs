use std::io::{self, Stdout, Write};
use std::panic;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use db_explorer_database::client::ExplorerDbClient;
use db_explorer_database::error::DbError;
use log::{info, warn};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::Terminal;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::dashboard::components;
use crate::dashboard::format::DisplayZone;
use crate::dashboard::preferences::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
use crate::dashboard::state::{CatalogPanel, Focus, LoadState, PageRequest, SummaryPanel, TableView};
use crate::service::catalog::{TableCatalogService, TableDescriptor};
use crate::service::matching_summary::{MatchingSummary, MatchingSummaryService};
use crate::service::table_page::{TablePage, TablePageService};
use crate::settings::Settings;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

enum Loaded {
    Catalog(Result<Vec<TableDescriptor>, DbError>),
    Summary(Result<MatchingSummary, DbError>),
    Page(PageRequest, Result<TablePage, DbError>),
}

struct App {
    catalog_service: TableCatalogService,
    table_page_service: TablePageService,
    matching_summary_service: MatchingSummaryService,
    store: Box<dyn PreferenceStore>,
    zone: DisplayZone,
    sender: UnboundedSender<Loaded>,
    catalog: CatalogPanel,
    summary: SummaryPanel,
    view: TableView,
    focus: Focus,
    popup: Option<Rect>,
    should_quit: bool,
}

/// Runs the dashboard until the user quits. The terminal is restored even when drawing fails.
pub async fn run(settings: &Settings, database: ExplorerDbClient) -> io::Result<()> {
    let store: Box<dyn PreferenceStore> = match FilePreferenceStore::in_config_dir() {
        Some(store) => Box::new(store),
        None => {
            warn!("No config directory available, column selections will not be saved");
            Box::new(MemoryPreferenceStore::default())
        }
    };
    let (sender, mut receiver) = unbounded_channel();
    let mut app = App {
        catalog_service: TableCatalogService::new(database.clone()),
        table_page_service: TablePageService::new(database.clone()),
        matching_summary_service: MatchingSummaryService::new(database),
        store,
        zone: settings.display_zone(),
        sender,
        catalog: CatalogPanel::default(),
        summary: SummaryPanel::default(),
        view: TableView::default(),
        focus: Focus::Tables,
        popup: None,
        should_quit: false,
    };

    install_panic_hook();
    let mut terminal = setup_terminal()?;
    info!("Dashboard started");
    app.load_catalog();
    app.load_summary();
    let result = app.event_loop(&mut terminal, &mut receiver).await;
    restore_terminal(&mut terminal)?;
    drop(panic::take_hook());
    info!("Dashboard closed");
    result
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    terminal::disable_raw_mode()?;
    leave_screen(terminal.backend_mut())?;
    terminal.show_cursor()
}

fn leave_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, LeaveAlternateScreen, DisableMouseCapture)
}

/// Panics abort, so the terminal has to be restored before the default hook runs
fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = terminal::disable_raw_mode();
        let _ = leave_screen(&mut io::stdout());
        default_hook(info);
    }));
}

impl App {
    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        receiver: &mut UnboundedReceiver<Loaded>,
    ) -> io::Result<()> {
        while !self.should_quit {
            self.draw(terminal)?;
            while let Ok(loaded) = receiver.try_recv() {
                self.apply(loaded);
            }
            if tokio::task::block_in_place(|| event::poll(POLL_INTERVAL))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key),
                    Event::Mouse(mouse) => self.on_mouse(mouse),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
        let mut popup = None;
        terminal.draw(|frame| {
            let area = frame.area();
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(48), Constraint::Min(20)])
                .split(area);
            components::render_sidebar(frame, chunks[0], &self.catalog, &self.summary, self.focus);
            components::render_grid(frame, chunks[1], &self.view, &self.zone, self.focus == Focus::Grid);
            if self.view.selector_open {
                popup = Some(components::render_selector(frame, area, &self.view));
            }
        })?;
        self.popup = popup;
        Ok(())
    }

    fn load_catalog(&mut self) {
        self.catalog.load = None;
        let service = self.catalog_service.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let _ = sender.send(Loaded::Catalog(service.list_tables().await));
        });
    }

    fn load_summary(&mut self) {
        self.summary.refresh();
        let service = self.matching_summary_service.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let _ = sender.send(Loaded::Summary(service.get_summary().await));
        });
    }

    fn load_page(&self, request: PageRequest) {
        let service = self.table_page_service.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = service.get_page(&request.table, request.page as i64, request.limit).await;
            let _ = sender.send(Loaded::Page(request, result));
        });
    }

    fn apply(&mut self, loaded: Loaded) {
        match loaded {
            Loaded::Catalog(result) => {
                if let Err(e) = &result {
                    warn!("Failed to list tables: {}", e);
                }
                let reopen = self.view.table_name.is_empty();
                if let Some(table) = self.catalog.apply(result) {
                    if reopen {
                        let request = self.view.select_table(&table);
                        self.load_page(request);
                    } else {
                        let current = self.catalog.tables().iter().position(|t| t.name == self.view.table_name);
                        if let Some(cursor) = current {
                            self.catalog.cursor = cursor;
                        }
                    }
                }
            }
            Loaded::Summary(result) => {
                if let Err(e) = &result {
                    warn!("Failed to load matching summary: {}", e);
                }
                self.summary.apply(result);
            }
            Loaded::Page(request, result) => {
                if let Err(e) = &result {
                    warn!("Failed to load page {} of {}: {}", request.page, request.table, e);
                }
                self.view.apply(&request, result, &*self.store);
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.view.selector_open {
            self.on_selector_key(key);
            return;
        }

        let request = match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                None
            }
            KeyCode::Up => {
                match self.focus {
                    Focus::Tables => self.catalog.up(),
                    Focus::Summary => self.summary.up(),
                    Focus::Grid => {}
                }
                None
            }
            KeyCode::Down => {
                match self.focus {
                    Focus::Tables => self.catalog.down(),
                    Focus::Summary => self.summary.down(),
                    Focus::Grid => {}
                }
                None
            }
            KeyCode::Enter => match self.focus {
                Focus::Tables => {
                    let table = self.catalog.selected().map(|t| t.name.clone());
                    table.map(|table| {
                        self.focus = Focus::Grid;
                        self.view.select_table(&table)
                    })
                }
                Focus::Summary => {
                    self.summary.toggle_expanded();
                    None
                }
                Focus::Grid => None,
            },
            KeyCode::Char('n') | KeyCode::PageDown => self.view.next_page(),
            KeyCode::Char('p') | KeyCode::PageUp => self.view.previous_page(),
            KeyCode::Left => {
                self.view.scroll_left();
                None
            }
            KeyCode::Right => {
                self.view.scroll_right();
                None
            }
            KeyCode::Char('c') => {
                self.view.open_selector();
                None
            }
            KeyCode::Char('r') => self.reload(),
            _ => None,
        };
        if let Some(request) = request {
            self.load_page(request);
        }
    }

    fn reload(&mut self) -> Option<PageRequest> {
        if self.catalog.load.as_ref().is_some_and(|load| load.ready().is_none() && !load.is_loading()) {
            self.load_catalog();
        }
        if self.focus == Focus::Summary || matches!(self.summary.load, LoadState::Error(_)) {
            self.load_summary();
        }
        match self.focus {
            Focus::Summary => None,
            Focus::Tables | Focus::Grid => {
                if self.view.table_name.is_empty() {
                    None
                } else {
                    self.view.retry().or_else(|| Some(self.view.request()))
                }
            }
        }
    }

    fn on_selector_key(&mut self, key: KeyEvent) {
        let store = &mut *self.store;
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('a') => self.view.select_all(store),
                KeyCode::Char('n') => self.view.select_none(store),
                KeyCode::Char('d') => self.view.reset_defaults(store),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Esc => self.view.close_selector(),
            KeyCode::Up => self.view.selector_up(),
            KeyCode::Down => self.view.selector_down(),
            KeyCode::Enter | KeyCode::Char(' ') => self.view.toggle_at_cursor(store),
            KeyCode::Backspace => self.view.pop_search(),
            KeyCode::Char(c) => self.view.push_search(c),
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        if let (MouseEventKind::Down(_), Some(popup)) = (mouse.kind, self.popup) {
            if !popup.contains(Position::new(mouse.column, mouse.row)) {
                self.view.close_selector();
            }
        }
    }
}
