use db_explorer_database::error::DbError;
use db_explorer_database::models::column_descriptor::ColumnDescriptor;
use log::{debug, warn};

use crate::dashboard::columns::{filter_columns, ColumnSelection};
use crate::dashboard::preferences::PreferenceStore;
use crate::service::catalog::TableDescriptor;
use crate::service::matching_summary::MatchingSummary;
use crate::service::table_page::{TablePage, DEFAULT_LIMIT};

const PREFERRED_TABLE: &str = "donations";

#[derive(Clone, Debug, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Error(String),
}

impl<T> LoadState<T> {
    pub fn from_result(result: Result<T, DbError>) -> Self {
        match result {
            Ok(value) => LoadState::Ready(value),
            Err(e) => LoadState::Error(e.to_string()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Tables,
    Summary,
    Grid,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Tables => Focus::Grid,
            Focus::Grid => Focus::Summary,
            Focus::Summary => Focus::Tables,
        }
    }
}

/// A page fetch the view is waiting for. Results for any other request are discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub table: String,
    pub page: u64,
    pub limit: u64,
    generation: u64,
}

pub struct TableView {
    pub table_name: String,
    pub page: u64,
    pub limit: u64,
    pub column_search: String,
    pub selector_open: bool,
    pub selector_cursor: usize,
    pub column_offset: usize,
    pub selection: ColumnSelection,
    pub load: LoadState<TablePage>,
    resolved_for: Option<String>,
    generation: u64,
}

impl Default for TableView {
    fn default() -> Self {
        TableView {
            table_name: String::new(),
            page: 1,
            limit: DEFAULT_LIMIT,
            column_search: String::new(),
            selector_open: false,
            selector_cursor: 0,
            column_offset: 0,
            selection: ColumnSelection::none(),
            load: LoadState::Loading,
            resolved_for: None,
            generation: 0,
        }
    }
}

impl TableView {
    pub fn select_table(&mut self, table: &str) -> PageRequest {
        self.table_name = table.to_string();
        self.page = 1;
        self.column_search.clear();
        self.selector_open = false;
        self.selector_cursor = 0;
        self.column_offset = 0;
        self.selection = ColumnSelection::none();
        self.resolved_for = None;
        self.request()
    }

    /// Starts a reload of the current page, dropping whatever was shown
    pub fn request(&mut self) -> PageRequest {
        self.generation += 1;
        self.load = LoadState::Loading;
        PageRequest { table: self.table_name.clone(), page: self.page, limit: self.limit, generation: self.generation }
    }

    pub fn retry(&mut self) -> Option<PageRequest> {
        match self.load {
            LoadState::Error(_) => Some(self.request()),
            _ => None,
        }
    }

    pub fn apply(&mut self, request: &PageRequest, result: Result<TablePage, DbError>, store: &dyn PreferenceStore) {
        if request.generation != self.generation {
            debug!("Discarding stale page {} of {}", request.page, request.table);
            return;
        }
        if let Ok(page) = &result {
            if self.resolved_for.as_deref() != Some(self.table_name.as_str()) {
                self.selection = ColumnSelection::resolve(&self.table_name, &page.columns, store.load(&self.table_name));
                self.resolved_for = Some(self.table_name.clone());
            }
        }
        self.load = LoadState::from_result(result);
        self.column_offset = self.column_offset.min(self.visible_columns().len().saturating_sub(1));
    }

    pub fn total_pages(&self) -> Option<u64> {
        self.load.ready().map(|page| page.pagination.total_pages)
    }

    pub fn next_page(&mut self) -> Option<PageRequest> {
        let total_pages = self.total_pages()?;
        if self.page >= total_pages {
            return None;
        }
        self.page += 1;
        Some(self.request())
    }

    pub fn previous_page(&mut self) -> Option<PageRequest> {
        self.total_pages()?;
        if self.page <= 1 {
            return None;
        }
        self.page -= 1;
        Some(self.request())
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        self.load.ready().map(|page| page.columns.as_slice()).unwrap_or_default()
    }

    pub fn visible_columns(&self) -> Vec<&ColumnDescriptor> {
        self.selection.visible(self.columns())
    }

    pub fn scroll_left(&mut self) {
        self.column_offset = self.column_offset.saturating_sub(1);
    }

    pub fn scroll_right(&mut self) {
        if self.column_offset + 1 < self.visible_columns().len() {
            self.column_offset += 1;
        }
    }

    pub fn open_selector(&mut self) {
        if self.load.ready().is_some() {
            self.selector_open = true;
            self.selector_cursor = 0;
        }
    }

    pub fn close_selector(&mut self) {
        self.selector_open = false;
    }

    pub fn selector_columns(&self) -> Vec<&ColumnDescriptor> {
        filter_columns(self.columns(), &self.column_search)
    }

    pub fn push_search(&mut self, c: char) {
        self.column_search.push(c);
        self.selector_cursor = 0;
    }

    pub fn pop_search(&mut self) {
        self.column_search.pop();
        self.selector_cursor = 0;
    }

    pub fn selector_up(&mut self) {
        self.selector_cursor = self.selector_cursor.saturating_sub(1);
    }

    pub fn selector_down(&mut self) {
        if self.selector_cursor + 1 < self.selector_columns().len() {
            self.selector_cursor += 1;
        }
    }

    pub fn toggle_at_cursor(&mut self, store: &mut dyn PreferenceStore) {
        let Some(column) = self.selector_columns().get(self.selector_cursor).map(|c| c.column_name.clone()) else {
            return;
        };
        self.selection.toggle(&column);
        self.persist(store);
    }

    pub fn select_all(&mut self, store: &mut dyn PreferenceStore) {
        self.selection = ColumnSelection::all(self.columns());
        self.persist(store);
    }

    pub fn select_none(&mut self, store: &mut dyn PreferenceStore) {
        self.selection = ColumnSelection::none();
        self.persist(store);
    }

    pub fn reset_defaults(&mut self, store: &mut dyn PreferenceStore) {
        self.selection = ColumnSelection::defaults(&self.table_name, self.columns());
        self.column_offset = 0;
        if let Err(e) = store.remove(&self.table_name) {
            warn!("Failed to remove column preference for {}: {}", self.table_name, e);
        }
    }

    fn persist(&mut self, store: &mut dyn PreferenceStore) {
        self.column_offset = self.column_offset.min(self.visible_columns().len().saturating_sub(1));
        let columns = self.selection.to_vec(self.columns());
        if let Err(e) = store.save(&self.table_name, &columns) {
            warn!("Failed to save column preference for {}: {}", self.table_name, e);
        }
    }
}

#[derive(Default)]
pub struct CatalogPanel {
    pub load: Option<LoadState<Vec<TableDescriptor>>>,
    pub cursor: usize,
}

impl CatalogPanel {
    /// Moves the cursor to the table the dashboard opens on and returns its name
    pub fn apply(&mut self, result: Result<Vec<TableDescriptor>, DbError>) -> Option<String> {
        let load = LoadState::from_result(result);
        let initial = load.ready().and_then(|tables| initial_table(tables));
        self.cursor = match (&initial, load.ready()) {
            (Some(name), Some(tables)) => tables.iter().position(|t| &t.name == name).unwrap_or(0),
            _ => 0,
        };
        self.load = Some(load);
        initial
    }

    pub fn tables(&self) -> &[TableDescriptor] {
        self.load.as_ref().and_then(LoadState::ready).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn selected(&self) -> Option<&TableDescriptor> {
        self.tables().get(self.cursor)
    }

    pub fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.cursor + 1 < self.tables().len() {
            self.cursor += 1;
        }
    }
}

pub fn initial_table(tables: &[TableDescriptor]) -> Option<String> {
    tables.iter().find(|t| t.name == PREFERRED_TABLE).or_else(|| tables.first()).map(|t| t.name.clone())
}

pub struct SummaryPanel {
    pub load: LoadState<MatchingSummary>,
    pub cursor: usize,
    pub expanded: Option<usize>,
}

impl Default for SummaryPanel {
    fn default() -> Self {
        SummaryPanel { load: LoadState::Loading, cursor: 0, expanded: None }
    }
}

impl SummaryPanel {
    pub fn refresh(&mut self) {
        self.load = LoadState::Loading;
    }

    pub fn apply(&mut self, result: Result<MatchingSummary, DbError>) {
        self.load = LoadState::from_result(result);
        let donors = self.donor_count();
        self.cursor = self.cursor.min(donors.saturating_sub(1));
        self.expanded = self.expanded.filter(|&i| i < donors);
    }

    fn donor_count(&self) -> usize {
        self.load.ready().map(|summary| summary.donors.len()).unwrap_or_default()
    }

    pub fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.cursor + 1 < self.donor_count() {
            self.cursor += 1;
        }
    }

    pub fn toggle_expanded(&mut self) {
        if self.cursor >= self.donor_count() {
            return;
        }
        self.expanded = if self.expanded == Some(self.cursor) { None } else { Some(self.cursor) };
    }
}
