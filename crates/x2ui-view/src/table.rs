use serde::Deserialize;
use serde_json::{Map, Value};

use crate::lenient;
use crate::node::ViewNode;
use crate::props::ButtonDef;

/// Section whose columns render as ordinary table cells.
pub const PRIMARY_SECTION: &str = "TABLE";
/// Detail section rendered without a heading.
pub const UNTITLED_SECTION: &str = "SECTION";

const DEFAULT_PAGE_SIZE: u32 = 25;

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Section {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub key: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
}

impl Section {
    #[inline]
    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or(PRIMARY_SECTION)
    }

    #[inline]
    pub fn is_primary(&self) -> bool {
        self.key() == PRIMARY_SECTION
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Column {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default = "yes", deserialize_with = "lenient::truthy")]
    pub visible: bool,
    #[serde(default)]
    pub section: Section,
    /// Width in `em`; `0` leaves the width to the layout.
    #[serde(default, deserialize_with = "lenient::uint")]
    pub size: u32,
}

impl Column {
    #[inline]
    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or("")
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableConfig {
    #[serde(default, deserialize_with = "lenient::vec_or_null")]
    pub columns: Vec<Column>,
    #[serde(default, deserialize_with = "lenient::vec_or_null")]
    pub sections: Vec<Section>,
    #[serde(default, deserialize_with = "lenient::vec_or_null")]
    pub actions: Vec<ButtonDef>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub controller: Option<String>,
    #[serde(default = "default_page_size", deserialize_with = "lenient::uint")]
    pub pagesize: u32,
    #[serde(default, deserialize_with = "lenient::truthy")]
    pub legends: bool,
    #[serde(default = "yes", deserialize_with = "lenient::truthy")]
    pub show_page_numbers: bool,
    #[serde(default = "yes", deserialize_with = "lenient::truthy")]
    pub allow_sort: bool,

    /// The table description exactly as received; posted back with every page request.
    #[serde(skip)]
    pub source: Value,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl TableConfig {
    #[inline]
    pub fn controller(&self) -> &str {
        self.controller.as_deref().unwrap_or("")
    }

    /// Page size, never zero.
    #[inline]
    pub fn page_size(&self) -> u32 {
        self.pagesize.max(1)
    }

    pub fn primary_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.section.is_primary())
    }

    pub fn columns_in<'a>(&'a self, section_key: &'a str) -> impl Iterator<Item = &'a Column> + 'a {
        self.columns
            .iter()
            .filter(move |c| c.section.key() == section_key)
    }

    /// Whether any column lives outside the primary section.
    #[inline]
    pub fn has_detail_columns(&self) -> bool {
        self.columns.iter().any(|c| !c.section.is_primary())
    }

    #[inline]
    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Initial sort key: first visible primary column, else first primary column, else first column.
    pub fn initial_order_by(&self) -> String {
        self.primary_columns()
            .find(|c| c.visible)
            .or_else(|| self.primary_columns().next())
            .or_else(|| self.columns.first())
            .map(|c| c.key().to_owned())
            .unwrap_or_default()
    }

    /// Columns a placeholder row must span.
    pub fn visible_column_count(&self) -> u32 {
        let mut n = self.columns.iter().filter(|c| c.visible).count() as u32;
        if self.has_actions() {
            n += 1;
        }
        if self.legends {
            n += 1;
        }
        n.max(1)
    }

    pub fn request_body(&self) -> String {
        if self.source.is_null() {
            "{}".to_owned()
        } else {
            self.source.to_string()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Cell {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub value: Option<String>,
    pub view: Option<ViewNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Legend {
    pub icon: Option<String>,
    pub color: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    pub class: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub target: Option<String>,
    #[serde(rename = "formId", deserialize_with = "lenient::opt_string")]
    pub form_id: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TableRow {
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub cells: Vec<Cell>,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub legends: Vec<Legend>,
    #[serde(rename = "exclude-actions", deserialize_with = "lenient::vec_or_null")]
    pub exclude_actions: Vec<String>,

    #[serde(skip)]
    pub source: Value,
}

impl TableRow {
    /// Lenient row read: a malformed row degrades to an empty one.
    pub fn from_value(v: &Value) -> Self {
        let mut row = match serde_json::from_value::<TableRow>(v.clone()) {
            Ok(row) => row,
            Err(e) => {
                log::warn!("table: malformed row ignored: {e}");
                TableRow::default()
            }
        };
        row.source = v.clone();
        row
    }

    pub fn cell(&self, column_key: &str) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|c| c.name.as_deref() == Some(column_key))
    }

    #[inline]
    pub fn excludes(&self, action_title: Option<&str>) -> bool {
        action_title.is_some_and(|t| self.exclude_actions.iter().any(|e| e == t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(v: Value) -> TableConfig {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn defaults_follow_the_server_model() {
        let cfg = config(json!({ "controller": "users" }));
        assert_eq!(cfg.pagesize, 25);
        assert!(cfg.show_page_numbers);
        assert!(cfg.allow_sort);
        assert!(!cfg.legends);
    }

    #[test]
    fn initial_order_prefers_visible_primary_column() {
        let cfg = config(json!({
            "columns": [
                { "key": "notes", "section": { "key": "SECTION" } },
                { "key": "id", "visible": false, "section": { "key": "TABLE" } },
                { "key": "name", "section": { "key": "TABLE" } }
            ]
        }));
        assert_eq!(cfg.initial_order_by(), "name");
        assert!(cfg.has_detail_columns());
        assert_eq!(cfg.columns_in("SECTION").count(), 1);
    }

    #[test]
    fn visible_count_includes_trailing_cells() {
        let cfg = config(json!({
            "columns": [
                { "key": "a", "section": { "key": "TABLE" } },
                { "key": "b", "visible": false, "section": { "key": "TABLE" } }
            ],
            "actions": [ { "title": "Edit" } ],
            "legends": true
        }));
        assert_eq!(cfg.visible_column_count(), 3);
    }

    #[test]
    fn row_exclusions_match_by_title() {
        let row = TableRow::from_value(&json!({
            "cells": [ { "name": "a", "value": 1 } ],
            "exclude-actions": [ "Delete" ]
        }));
        assert!(row.excludes(Some("Delete")));
        assert!(!row.excludes(Some("Edit")));
        assert!(!row.excludes(None));
        assert_eq!(row.cell("a").and_then(|c| c.value.as_deref()), Some("1"));
    }
}
