use log::debug;

use x2ui_view::{ActionRequest, Cell, Column, Legend, Section, TableConfig, TableRow, ViewKind, ViewNode, UNTITLED_SECTION};

use super::{PageControl, TableId, TableState};
use crate::binder::{Binding, UiEvent};
use crate::client::Client;
use crate::dom::ElementId;
use crate::render::button::build_button;
use crate::render::{apply_id, one, Rendered};

const TABLE_CLASS: &str = "footable table table-stripped toggle-arrow-tiny";
const DETAIL_ROW_STYLE: &str =
    "position: relative; top: -1em; background-color: white; border-bottom: 0px solid #f5f5f5;";
const DETAIL_SECTION_STYLE: &str = "padding-left: 0.5em; padding-right: 0;";
const VALUE_STYLE: &str = "white-space: pre-wrap; word-wrap: break-word; display: inline;";
const DEFAULT_LEGEND_COLOR: &str = "#1bb394";
const SECTIONS_PER_ROW: usize = 3;
const NBSP: &str = "\u{a0}";

/// Builds the table header, registers the table and requests its first page.
pub(crate) fn render_table(c: &mut Client, node: &ViewNode) -> Rendered {
    let ViewKind::Table(config) = &node.kind else {
        return Rendered::new();
    };
    let table = c.doc.create_with("table", TABLE_CLASS);
    c.doc
        .set_attr(table, "data-page-size", &config.page_size().to_string());
    apply_id(c, table, node);

    let thead = c.doc.append_new(table, "thead", "");
    let tr = c.doc.append_new(thead, "tr", "");
    let mut indicators = Vec::new();
    for (i, col) in config.primary_columns().enumerate() {
        let th = c.doc.append_new(tr, "th", "no-sort");
        size_cell(c, th, col);
        if i == 0 {
            c.doc.set_attr(th, "data-toggle", "true");
        }
        c.doc.append_text(th, col.name());
        if config.allow_sort {
            let ind = c.doc.append_new(th, "div", "x2-table-sort-indicator");
            indicators.push((ind, col.key().to_owned()));
        }
    }
    if config.has_detail_columns() {
        let th = c.doc.append_new(tr, "th", "");
        c.doc.set_attr(th, "data-hide", "all");
        c.doc.set_style(th, "display", "none");
    }
    if config.legends {
        let th = c.doc.append_new(tr, "th", "no-sort");
        c.doc.set_attr(th, "width", "1");
    }
    if config.has_actions() {
        let th = c.doc.append_new(tr, "th", "no-sort");
        c.doc.set_attr(th, "width", "1");
    }
    let body = c.doc.append_new(table, "tbody", "");

    let id = c.tables.insert(TableState::new(config.clone(), table, body));
    for (ind, column) in indicators {
        c.bindings
            .add(ind, UiEvent::Click, Binding::TableSort { table: id, column });
    }
    c.fetch_page(id);
    one(table)
}

fn size_cell(c: &mut Client, cell: ElementId, col: &Column) {
    if col.size != 0 {
        let width = format!("{}em", col.size);
        c.doc.set_style(cell, "width", &width);
        c.doc.set_style(cell, "min-width", &width);
        c.doc.set_style(cell, "max-width", &width);
    }
    if !col.visible {
        c.doc.set_style(cell, "display", "none");
    }
}

/// Detail sections in declaration order, followed by any section only named by a column.
fn detail_sections(config: &TableConfig) -> Vec<Section> {
    let mut out: Vec<Section> = config
        .sections
        .iter()
        .filter(|s| !s.is_primary())
        .cloned()
        .collect();
    for col in config.columns.iter().filter(|c| !c.section.is_primary()) {
        if !out.iter().any(|s| s.key() == col.section.key()) {
            out.push(col.section.clone());
        }
    }
    out
}

#[inline]
fn looks_like_link(value: &str) -> bool {
    value.contains("http://") || value.contains("https://")
}

impl Client {
    /// Replaces the table body with `rows`.
    pub(crate) fn render_rows(&mut self, id: TableId, rows: &[TableRow]) {
        let Some(state) = self.tables.get(id) else {
            return;
        };
        let body = state.body();
        let config = state.config().clone();
        let freed = self.doc.clear_children(body);
        self.forget(&freed);

        let sections = detail_sections(&config);
        for row in rows {
            let tr = self.doc.append_new(body, "tr", "");
            for col in config.primary_columns() {
                let td = self.doc.append_new(tr, "td", "");
                size_cell(self, td, col);
                self.cell_content(td, row.cell(col.key()));
            }
            if !sections.is_empty() {
                let td = self.doc.append_new(tr, "td", "");
                self.doc.set_style(td, "display", "none");
                self.detail_cell(td, &config, &sections, row);
            }
            if config.legends {
                let td = self.doc.append_new(tr, "td", "");
                self.doc.set_style(td, "text-align", "right");
                self.legend_cell(td, row);
            }
            if config.has_actions() {
                let td = self.doc.append_new(tr, "td", "");
                self.doc.set_style(td, "white-space", "nowrap");
                self.action_cell(td, &config, row);
            }
        }
        debug!("table {}: {} rows shown", id.index(), rows.len());
    }

    fn cell_content(&mut self, parent: ElementId, cell: Option<&Cell>) {
        let Some(cell) = cell else {
            return;
        };
        if let Some(view) = &cell.view {
            self.render_into(parent, view);
            return;
        }
        let value = cell.value.as_deref().unwrap_or_default();
        if looks_like_link(value) {
            let a = self.doc.append_new(parent, "a", "");
            self.doc.set_attr(a, "target", "_blank");
            self.doc.set_attr(a, "href", value);
            let span = self.doc.append_new(a, "span", "");
            self.doc.append_text(span, value);
        } else {
            let span = self.doc.append_new(parent, "span", "");
            self.doc.set_style_text(span, VALUE_STYLE);
            self.doc.append_text(span, value);
        }
    }

    fn detail_cell(
        &mut self,
        td: ElementId,
        config: &TableConfig,
        sections: &[Section],
        row: &TableRow,
    ) {
        for chunk in sections.chunks(SECTIONS_PER_ROW) {
            let sub_row = self.doc.append_new(td, "div", "row");
            self.doc.set_style_text(sub_row, DETAIL_ROW_STYLE);
            for section in chunk {
                let col = self.doc.append_new(sub_row, "div", "col-lg-4");
                self.doc.set_style_text(col, DETAIL_SECTION_STYLE);
                let items = if section.key() == UNTITLED_SECTION {
                    col
                } else {
                    let wrap = self.doc.append_new(col, "div", "col-lg-12");
                    let panel = self.doc.append_new(wrap, "div", "panel panel-primary");
                    let heading = self.doc.append_new(panel, "div", "panel-heading");
                    let h5 = self.doc.append_new(heading, "h5", "");
                    self.doc
                        .append_text(h5, section.title.as_deref().unwrap_or_default());
                    self.doc.append_new(panel, "div", "panel-body")
                };
                for column in config.columns_in(section.key()) {
                    let item = self.doc.append_new(items, "div", "col-lg-12");
                    let label = self.doc.append_new(item, "span", "");
                    let b = self.doc.append_new(label, "b", "");
                    self.doc.append_text(b, column.name());
                    self.doc.append_text(label, NBSP);
                    let data = self.doc.append_new(item, "span", "");
                    self.cell_content(data, row.cell(column.key()));
                }
            }
        }
    }

    fn legend_cell(&mut self, td: ElementId, row: &TableRow) {
        let div = self.doc.append_new(td, "div", "");
        for legend in &row.legends {
            let class = legend
                .class
                .as_deref()
                .filter(|c| !c.is_empty())
                .unwrap_or("label");
            let span = self.doc.append_new(div, "span", class);
            self.doc.set_style_text(
                span,
                &format!(
                    "background-color: {}; color: #ffffff; margin-right: 0.2em;",
                    legend
                        .color
                        .as_deref()
                        .filter(|c| !c.is_empty())
                        .unwrap_or(DEFAULT_LEGEND_COLOR)
                ),
            );
            let icon = legend.icon.as_deref().filter(|i| !i.is_empty());
            let title = legend.title.as_deref().filter(|t| !t.is_empty());
            if let Some(icon) = icon {
                self.doc.append_new(span, "i", &format!("fa {icon}"));
            }
            match title {
                Some(title) => {
                    let t = self.doc.append_new(span, "span", "");
                    if icon.is_some() {
                        self.doc.set_style(t, "padding-left", "0.3em");
                    }
                    self.doc.append_text(t, title);
                }
                None if icon.is_none() => {
                    self.doc.append_text(span, NBSP);
                }
                None => {}
            }
            if legend.action.is_some() || legend.target.is_some() {
                self.bindings.add(
                    span,
                    UiEvent::Click,
                    Binding::Invoke(legend_request(legend, row)),
                );
            }
        }
    }

    fn action_cell(&mut self, td: ElementId, config: &TableConfig, row: &TableRow) {
        for action in &config.actions {
            if row.excludes(action.title.as_deref()) {
                continue;
            }
            let mut def = action.clone();
            def.attributes.insert("row".to_owned(), row.source.clone());
            let span = self.doc.append_new(td, "span", "");
            self.doc.set_style(span, "padding-right", "0.5em");
            let btn = build_button(self, &def);
            self.doc.append(span, btn);
        }
    }

    /// Replaces the table body with the loading row.
    pub(crate) fn show_loading(&mut self, id: TableId) {
        let Some(state) = self.tables.get(id) else {
            return;
        };
        let body = state.body();
        let span = state.config().visible_column_count();
        let freed = self.doc.clear_children(body);
        self.forget(&freed);

        let tr = self.doc.append_new(body, "tr", "");
        let td = self.doc.append_new(tr, "td", "");
        self.doc.set_attr(td, "align", "center");
        self.doc.set_attr(td, "colspan", &span.to_string());
        let alert = self.doc.append_new(td, "div", "alert alert-info");
        self.doc.append_text(alert, "Loading Results ... Please Wait");
    }

    /// Appends the pager for the current paging state.
    pub(crate) fn build_footer(&mut self, id: TableId) {
        let Some(state) = self.tables.get(id) else {
            return;
        };
        let table = state.element();
        let span = state.config().visible_column_count();
        let numbered = state.config().show_page_numbers;
        let page = state.page();
        let num_pages = state.num_pages();
        let total = state.total_rows();

        let mut controls = vec![PageControl::First, PageControl::Prev];
        if numbered {
            if let Some(n) = num_pages {
                controls.extend((1..=n).map(PageControl::Page));
            }
        }
        controls.push(PageControl::Next);
        if numbered {
            controls.push(PageControl::Last);
        }
        let disabled: Vec<bool> = controls.iter().map(|c| state.is_disabled(*c)).collect();

        let tfoot = self.doc.append_new(table, "tfoot", "");
        let tr = self.doc.append_new(tfoot, "tr", "");
        let td = self.doc.append_new(tr, "td", "footable-visible");
        self.doc.set_attr(td, "colspan", &span.to_string());
        let ul = self.doc.append_new(td, "ul", "x2-table-paging pull-right");

        for (control, disabled) in controls.into_iter().zip(disabled) {
            let class = match control {
                PageControl::Page(n) if n == page => "footable-page active",
                PageControl::Page(_) => "footable-page",
                _ if disabled => "footable-page-arrow disabled",
                _ => "footable-page-arrow",
            };
            let li = self.doc.append_new(ul, "li", class);
            let a = self.doc.append_new(li, "a", "");
            self.doc.set_attr(a, "data-page", &control.label());
            self.doc.append_text(a, &control_text(control));
            self.bindings.add(
                a,
                UiEvent::Click,
                Binding::TablePage { table: id, control },
            );
        }

        if numbered {
            let li = self.doc.append_new(ul, "li", "");
            let gap = self.doc.append_new(li, "span", "");
            self.doc.append_text(gap, NBSP);
            let count = self.doc.append_new(li, "span", "label label-success");
            self.doc
                .append_text(count, &total.map(|t| t.to_string()).unwrap_or_default());
        }
        self.set_table_footer(id, tfoot);
    }

    /// Rebuilds the pager after the paging state changed.
    pub(crate) fn refresh_footer(&mut self, id: TableId) {
        let Some(footer) = self.tables.get(id).and_then(TableState::footer) else {
            return;
        };
        let freed = self.doc.remove(footer);
        self.forget(&freed);
        self.build_footer(id);
    }
}

fn control_text(control: PageControl) -> String {
    match control {
        PageControl::First => "\u{ab}".to_owned(),
        PageControl::Prev => "\u{2039}".to_owned(),
        PageControl::Page(n) => n.to_string(),
        PageControl::Next => "\u{203a}".to_owned(),
        PageControl::Last => "\u{bb}".to_owned(),
    }
}

fn legend_request(legend: &Legend, row: &TableRow) -> ActionRequest {
    let mut attributes = legend.attributes.clone();
    if !row.source.is_null() {
        attributes.insert("row".to_owned(), row.source.clone());
    }
    ActionRequest {
        target: legend.target.clone(),
        form_id: legend.form_id.clone(),
        description: legend.description.clone(),
        action: legend.action.clone(),
        attributes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn detail_sections_keep_declaration_order() {
        let config: TableConfig = serde_json::from_value(json!({
            "sections": [ { "key": "ADDR", "title": "Address" } ],
            "columns": [
                { "key": "name", "section": { "key": "TABLE" } },
                { "key": "notes", "section": { "key": "SECTION" } },
                { "key": "city", "section": { "key": "ADDR" } }
            ]
        }))
        .unwrap();
        let keys: Vec<String> = detail_sections(&config)
            .iter()
            .map(|s| s.key().to_owned())
            .collect();
        assert_eq!(keys, ["ADDR", "SECTION"]);
    }

    #[test]
    fn legend_actions_carry_the_row() {
        let legend = Legend {
            action: Some("approve".to_owned()),
            ..Default::default()
        };
        let row = TableRow::from_value(&json!({ "cells": [], "id": 7 }));
        let req = legend_request(&legend, &row);
        assert_eq!(req.action.as_deref(), Some("approve"));
        assert_eq!(req.attributes.get("row").and_then(|r| r.get("id")), Some(&Value::from(7)));
    }

    #[test]
    fn links_are_detected_by_scheme() {
        assert!(looks_like_link("see https://example.org/x"));
        assert!(!looks_like_link("ftp.example.org"));
    }
}
