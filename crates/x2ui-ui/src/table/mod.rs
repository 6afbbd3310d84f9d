//! Table/paging subcomponent.
//!
//! Paging state lives in a [`TableState`] record keyed by [`TableId`], never on the rendered
//! elements. Sort and page changes are independent requests that share the table's row region,
//! so only the rows of the most recent request are applied.

mod render;

pub(crate) use render::render_table;

use ahash::AHashMap;
use log::{debug, warn};
use serde_json::Value;

use x2ui_core::UiResult;
use x2ui_transport::{Endpoints, RequestBody};
use x2ui_view::{TableConfig, TableRow};

use crate::client::Client;
use crate::dispatch::{Completion, Region, RequestFailure};
use crate::dom::ElementId;

/// Stable handle of one rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(u32);

impl TableId {
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Pager control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    First,
    Prev,
    Page(u32),
    Next,
    Last,
}

impl PageControl {
    /// `data-page` attribute value.
    pub fn label(self) -> String {
        match self {
            PageControl::First => "first".to_owned(),
            PageControl::Prev => "prev".to_owned(),
            PageControl::Page(n) => n.to_string(),
            PageControl::Next => "next".to_owned(),
            PageControl::Last => "last".to_owned(),
        }
    }
}

/// Paging and sort state of one table.
#[derive(Debug, Clone)]
pub struct TableState {
    config: TableConfig,
    element: ElementId,
    body: ElementId,
    footer: Option<ElementId>,
    page: u32,
    order_by: String,
    direction: SortDirection,
    total_rows: Option<u64>,
    num_pages: Option<u32>,
}

impl TableState {
    pub fn new(config: TableConfig, element: ElementId, body: ElementId) -> Self {
        let order_by = config.initial_order_by();
        Self {
            config,
            element,
            body,
            footer: None,
            page: 1,
            order_by,
            direction: SortDirection::Asc,
            total_rows: None,
            num_pages: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    #[inline]
    pub fn element(&self) -> ElementId {
        self.element
    }

    #[inline]
    pub fn body(&self) -> ElementId {
        self.body
    }

    #[inline]
    pub fn footer(&self) -> Option<ElementId> {
        self.footer
    }

    #[inline]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[inline]
    pub fn order_by(&self) -> &str {
        &self.order_by
    }

    #[inline]
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    #[inline]
    pub fn total_rows(&self) -> Option<u64> {
        self.total_rows
    }

    #[inline]
    pub fn num_pages(&self) -> Option<u32> {
        self.num_pages
    }

    /// Header click: same column flips the direction, another column sorts ascending.
    /// The current page is kept.
    pub fn sort_by(&mut self, column: &str) {
        if self.order_by == column {
            self.direction = self.direction.toggled();
        } else {
            self.order_by = column.to_owned();
            self.direction = SortDirection::Asc;
        }
    }

    /// Whether `control` is inert in the current state.
    pub fn is_disabled(&self, control: PageControl) -> bool {
        let at_last = self.num_pages.is_some_and(|n| self.page >= n);
        match control {
            PageControl::First | PageControl::Prev => self.page <= 1,
            PageControl::Next => at_last,
            PageControl::Last => self.num_pages.is_none() || at_last,
            PageControl::Page(_) => false,
        }
    }

    /// Moves to the page `control` selects; `false` when the control is disabled.
    pub fn apply(&mut self, control: PageControl) -> bool {
        if self.is_disabled(control) {
            return false;
        }
        let last = self.num_pages.unwrap_or(u32::MAX);
        self.page = match control {
            PageControl::First => 1,
            PageControl::Prev => self.page - 1,
            PageControl::Page(n) => n.clamp(1, last.max(1)),
            PageControl::Next => self.page.saturating_add(1),
            PageControl::Last => last,
        };
        true
    }

    /// Records the row count; the page count is at least one.
    /// Returns `true` when the current page no longer exists and was moved to the last one.
    pub fn set_total(&mut self, total: u64) -> bool {
        let size = u64::from(self.config.page_size());
        let pages = u32::try_from(total.div_ceil(size).max(1)).unwrap_or(u32::MAX);
        self.total_rows = Some(total);
        self.num_pages = Some(pages);
        let clamped = self.page > pages;
        self.page = self.page.min(pages);
        clamped
    }

    /// Event path of the rows of the current page in the current order.
    pub fn page_path(&self) -> String {
        Endpoints::data_page(
            self.config.controller(),
            self.page,
            &self.order_by,
            self.direction.as_str(),
        )
    }
}

/// Table records of one client.
#[derive(Debug, Default)]
pub(crate) struct TableRegistry {
    tables: AHashMap<TableId, TableState>,
    next: u32,
}

impl TableRegistry {
    pub fn insert(&mut self, state: TableState) -> TableId {
        self.next += 1;
        let id = TableId(self.next);
        self.tables.insert(id, state);
        id
    }

    #[inline]
    pub fn get(&self, id: TableId) -> Option<&TableState> {
        self.tables.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: TableId) -> Option<&mut TableState> {
        self.tables.get_mut(&id)
    }

    pub fn by_element(&self, el: ElementId) -> Option<TableId> {
        self.tables
            .iter()
            .find(|(_, t)| t.element == el)
            .map(|(id, _)| *id)
    }

    /// Drops tables whose element was removed.
    pub fn purge(&mut self, freed: &[ElementId]) {
        if freed.is_empty() {
            return;
        }
        self.tables.retain(|_, t| !freed.contains(&t.element));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tables.len()
    }
}

impl Client {
    pub fn table_state(&self, id: TableId) -> Option<&TableState> {
        self.tables.get(id)
    }

    /// Table rendered as `el`.
    pub fn table_for(&self, el: ElementId) -> Option<TableId> {
        self.tables.by_element(el)
    }

    pub(crate) fn table_sort(&mut self, id: TableId, column: &str) {
        let Some(state) = self.tables.get_mut(id) else {
            return;
        };
        state.sort_by(column);
        debug!(
            "table {}: order by {} {}",
            id.0,
            state.order_by,
            state.direction.as_str()
        );
        self.fetch_page(id);
    }

    pub(crate) fn table_page(&mut self, id: TableId, control: PageControl) {
        let Some(state) = self.tables.get_mut(id) else {
            return;
        };
        if !state.apply(control) {
            debug!("table {}: {} is disabled", id.0, control.label());
            return;
        }
        self.refresh_footer(id);
        self.fetch_page(id);
    }

    /// Shows the loading row and requests the current page.
    pub(crate) fn fetch_page(&mut self, id: TableId) {
        let Some(state) = self.tables.get(id) else {
            return;
        };
        let path = state.page_path();
        let body = RequestBody::Json(state.config.request_body());
        self.show_loading(id);
        self.send(
            path,
            body,
            Completion::TablePage { table: id },
            Some(Region::TableRows(id)),
        );
    }

    pub(crate) fn table_rows_loaded(&mut self, id: TableId, rows: &Value) -> UiResult<()> {
        let Some(state) = self.tables.get(id) else {
            debug!("table {}: rows for a removed table dropped", id.0);
            return Ok(());
        };
        if !self.doc.is_live(state.element) {
            return Ok(());
        }
        let needs_footer = state.footer.is_none();
        let wants_size = state.config.show_page_numbers;
        let request_body = state.config.request_body();
        let controller = state.config.controller().to_owned();

        let rows: Vec<TableRow> = match rows {
            Value::Array(items) => items.iter().map(TableRow::from_value).collect(),
            Value::Null => Vec::new(),
            other => {
                warn!("table {}: expected a row array", id.0);
                self.handle_backend_error(&RequestFailure::Parse(format!(
                    "expected a row array, got {other}"
                )));
                return Ok(());
            }
        };
        self.render_rows(id, &rows);

        if needs_footer {
            if wants_size {
                self.send(
                    Endpoints::data_size(&controller),
                    RequestBody::Json(request_body),
                    Completion::TableSize { table: id },
                    Some(Region::TableSize(id)),
                );
            } else {
                self.build_footer(id);
            }
        }
        Ok(())
    }

    pub(crate) fn table_size_loaded(&mut self, id: TableId, total: &Value) {
        let count = match total {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        let Some(state) = self.tables.get_mut(id) else {
            return;
        };
        let moved = match count {
            Some(n) => state.set_total(n),
            None => {
                warn!("table {}: unreadable row count {total}", id.0);
                false
            }
        };
        if state.footer.is_some() {
            self.refresh_footer(id);
        } else {
            self.build_footer(id);
        }
        if moved {
            debug!("table {}: page gone after the count shrank, refetching", id.0);
            self.fetch_page(id);
        }
    }

    pub(crate) fn set_table_footer(&mut self, id: TableId, footer: ElementId) {
        if let Some(state) = self.tables.get_mut(id) {
            state.footer = Some(footer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(pagesize: u32) -> TableState {
        let config: TableConfig = serde_json::from_value(json!({
            "controller": "users",
            "pagesize": pagesize,
            "columns": [
                { "key": "name", "section": { "key": "TABLE" } },
                { "key": "email", "section": { "key": "TABLE" } }
            ]
        }))
        .unwrap();
        let mut doc = crate::dom::Document::new();
        let el = doc.create("table");
        let body = doc.append_new(el, "tbody", "");
        TableState::new(config, el, body)
    }

    #[test]
    fn starts_on_page_one_sorted_ascending() {
        let s = state(10);
        assert_eq!(s.page(), 1);
        assert_eq!(s.order_by(), "name");
        assert_eq!(s.direction(), SortDirection::Asc);
        assert!(s.is_disabled(PageControl::First));
        assert!(s.is_disabled(PageControl::Prev));
    }

    #[test]
    fn sorting_toggles_and_keeps_the_page() {
        let mut s = state(10);
        s.set_total(45);
        assert!(s.apply(PageControl::Page(3)));

        s.sort_by("name");
        assert_eq!(s.direction(), SortDirection::Desc);
        s.sort_by("name");
        assert_eq!(s.direction(), SortDirection::Asc);
        s.sort_by("name");
        s.sort_by("email");
        assert_eq!((s.order_by(), s.direction()), ("email", SortDirection::Asc));
        assert_eq!(s.page(), 3);
    }

    #[test]
    fn page_count_rounds_up() {
        let mut s = state(10);
        s.set_total(0);
        assert_eq!(s.num_pages(), Some(1));
        s.set_total(20);
        assert_eq!(s.num_pages(), Some(2));
        s.set_total(21);
        assert_eq!(s.num_pages(), Some(3));
    }

    #[test]
    fn next_is_inert_on_the_last_page() {
        let mut s = state(10);
        s.set_total(25);
        assert!(s.apply(PageControl::Last));
        assert_eq!(s.page(), 3);
        assert!(s.is_disabled(PageControl::Next));
        assert!(!s.apply(PageControl::Next));
        assert_eq!(s.page(), 3);

        assert!(s.apply(PageControl::First));
        assert_eq!(s.page(), 1);
    }

    #[test]
    fn explicit_pages_are_clamped() {
        let mut s = state(10);
        s.set_total(25);
        assert!(s.apply(PageControl::Page(9)));
        assert_eq!(s.page(), 3);
        assert!(s.apply(PageControl::Page(0)));
        assert_eq!(s.page(), 1);
    }

    #[test]
    fn shrinking_total_reports_the_moved_page() {
        let mut s = state(10);
        assert!(!s.set_total(25));
        assert!(s.apply(PageControl::Last));
        assert_eq!(s.page(), 3);

        assert!(s.set_total(12));
        assert_eq!(s.page(), 2);
        assert!(!s.set_total(12));
        assert!(!s.set_total(40));
        assert_eq!(s.page(), 2);
    }

    #[test]
    fn unknown_total_never_blocks_next() {
        let mut s = state(10);
        assert!(!s.is_disabled(PageControl::Next));
        assert!(s.is_disabled(PageControl::Last));
        assert!(s.apply(PageControl::Next));
        assert_eq!(s.page(), 2);
        assert_eq!(
            s.page_path(),
            "action/onDataPage/users?page=2&orderby=name&order_direction=ASC"
        );
    }
}
