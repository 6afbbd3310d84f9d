mod common;

use serde_json::{json, Value};

use common::{by_id, client, page_text, show, text, with_class};
use x2ui_transport::ScriptedTransport;
use x2ui_ui::{Client, ElementId, PageControl, SortDirection, TableId};
use x2ui_view::ResponseView;

fn users_table(show_page_numbers: bool) -> Value {
    json!({
        "class": "TableView",
        "id": "users",
        "controller": "users",
        "pagesize": 10,
        "legends": true,
        "show_page_numbers": show_page_numbers,
        "columns": [
            { "key": "name", "name": "Name", "section": { "key": "TABLE" } },
            { "key": "email", "name": "Email", "section": { "key": "TABLE" }, "size": 12 },
            { "key": "notes", "name": "Notes", "section": { "key": "SECTION" } }
        ],
        "actions": [
            { "title": "Edit", "action": "editUser", "target": "feature-body" },
            { "title": "Delete", "action": "deleteUser" }
        ]
    })
}

fn rows(names: &[&str]) -> String {
    let rows: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, n)| {
            json!({
                "id": i,
                "cells": [
                    { "name": "name", "value": n },
                    { "name": "email", "value": format!("https://{}.example.org", n.to_lowercase()) },
                    { "name": "notes", "value": "vip" }
                ],
                "legends": [ { "title": "Admin", "color": "#ff0000" } ],
                "exclude-actions": if i == 0 { vec!["Delete"] } else { vec![] }
            })
        })
        .collect();
    Value::Array(rows).to_string()
}

fn loaded(show_page_numbers: bool) -> (Client, std::sync::Arc<ScriptedTransport>, TableId) {
    let (mut c, t) = client();
    t.respond_always("onDataPage/users", 200, rows(&["Ada", "Bob"]));
    t.respond_always("onDataSize/users", 200, "25");
    show(&mut c, users_table(show_page_numbers));
    c.run_until_idle().unwrap();
    let id = c.table_for(by_id(&c, "users")).expect("table state");
    (c, t, id)
}

fn pager(c: &Client, id: TableId, label: &str) -> ElementId {
    let footer = c.table_state(id).and_then(|s| s.footer()).expect("pager");
    let doc = c.document();
    doc.find_all(footer, |e| e.tag() == "a" && e.attr("data-page") == Some(label))
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no pager control '{label}'"))
}

fn pager_item_class(c: &Client, id: TableId, label: &str) -> String {
    let a = pager(c, id, label);
    let li = c.document().parent(a).unwrap();
    c.document().get(li).unwrap().classes().join(" ")
}

fn sort_indicator(c: &Client, index: usize) -> ElementId {
    with_class(c, by_id(c, "users"), "x2-table-sort-indicator")[index]
}

#[test]
fn first_page_loads_with_the_row_count() {
    let (mut c, t) = client();
    t.respond_always("onDataPage/users", 200, rows(&["Ada", "Bob"]));
    t.respond_always("onDataSize/users", 200, "25");
    show(&mut c, users_table(true));
    assert!(page_text(&c).contains("Loading Results ... Please Wait"));
    let loading = c.document().find_first(by_id(&c, "users"), |e| e.attr("colspan").is_some()).unwrap();
    assert_eq!(c.document().attr(loading, "colspan"), Some("5"));

    c.run_until_idle().unwrap();
    assert_eq!(
        t.paths(),
        [
            "action/onDataPage/users?page=1&orderby=name&order_direction=ASC",
            "action/onDataSize/users"
        ]
    );
    let sent: Value = serde_json::from_str(t.requests()[0].json_body().unwrap()).unwrap();
    assert_eq!(sent["controller"], "users");

    let id = c.table_for(by_id(&c, "users")).unwrap();
    let state = c.table_state(id).unwrap();
    assert_eq!(state.page(), 1);
    assert_eq!(state.num_pages(), Some(3));
    assert_eq!(state.total_rows(), Some(25));
    assert_eq!(c.document().children(state.body()).len(), 2);
    assert!(!page_text(&c).contains("Loading Results"));

    let labels: Vec<String> = ["first", "prev", "1", "2", "3", "next", "last"]
        .iter()
        .map(|l| c.document().text_content(pager(&c, id, l)))
        .collect();
    assert_eq!(labels, ["\u{ab}", "\u{2039}", "1", "2", "3", "\u{203a}", "\u{bb}"]);
    assert!(pager_item_class(&c, id, "first").contains("disabled"));
    assert!(pager_item_class(&c, id, "1").contains("active"));
    let footer = c.table_state(id).unwrap().footer().unwrap();
    let total = with_class(&c, footer, "label-success");
    assert_eq!(text(&c, total[0]), "25");
}

#[test]
fn rows_render_links_legends_details_and_actions() {
    let (c, _t, id) = loaded(true);
    let body = c.table_state(id).unwrap().body();
    let doc = c.document();

    let links = doc.find_all(body, |e| e.tag() == "a" && e.attr("target") == Some("_blank"));
    assert_eq!(links.len(), 2);
    assert_eq!(doc.attr(links[0], "href"), Some("https://ada.example.org"));

    let buttons = |title: &str| {
        doc.find_all(body, |e| e.tag() == "button")
            .into_iter()
            .filter(|b| doc.text_content(*b).trim() == title)
            .count()
    };
    assert_eq!(buttons("Edit"), 2);
    assert_eq!(buttons("Delete"), 1);

    let legends = with_class(&c, body, "label");
    assert_eq!(legends.len(), 2);
    assert_eq!(doc.style(legends[0], "background-color"), Some("#ff0000"));

    let details = doc.find_all(body, |e| e.tag() == "td" && e.style("display") == Some("none"));
    assert_eq!(details.len(), 2);
    assert!(doc.text_content(details[0]).contains("Notes"));
    assert!(doc.text_content(details[0]).contains("vip"));
}

#[test]
fn prev_requests_the_previous_page() {
    let (mut c, t, id) = loaded(true);
    c.click(pager(&c, id, "2")).unwrap();
    c.run_until_idle().unwrap();
    assert_eq!(c.table_state(id).unwrap().page(), 2);

    c.click(pager(&c, id, "prev")).unwrap();
    c.run_until_idle().unwrap();
    assert_eq!(c.table_state(id).unwrap().page(), 1);
    assert_eq!(
        t.paths().last().map(String::as_str),
        Some("action/onDataPage/users?page=1&orderby=name&order_direction=ASC")
    );
}

#[test]
fn next_is_inert_on_the_last_page() {
    let (mut c, t, id) = loaded(true);
    c.click(pager(&c, id, "last")).unwrap();
    c.run_until_idle().unwrap();
    assert_eq!(c.table_state(id).unwrap().page(), 3);
    assert!(pager_item_class(&c, id, "next").contains("disabled"));

    let before = t.request_count();
    c.click(pager(&c, id, "next")).unwrap();
    assert_eq!(c.pending_requests(), 0);
    assert_eq!(t.request_count(), before);
    assert_eq!(c.table_state(id).unwrap().page(), 3);

    c.click(pager(&c, id, "first")).unwrap();
    c.run_until_idle().unwrap();
    assert_eq!(c.table_state(id).unwrap().page(), 1);
}

#[test]
fn sorting_keeps_the_current_page() {
    let (mut c, t, id) = loaded(true);
    c.click(pager(&c, id, "2")).unwrap();
    c.run_until_idle().unwrap();

    c.click(sort_indicator(&c, 0)).unwrap();
    c.run_until_idle().unwrap();
    let state = c.table_state(id).unwrap();
    assert_eq!((state.page(), state.order_by(), state.direction()), (2, "name", SortDirection::Desc));
    assert_eq!(
        t.paths().last().map(String::as_str),
        Some("action/onDataPage/users?page=2&orderby=name&order_direction=DESC")
    );

    c.click(sort_indicator(&c, 1)).unwrap();
    let state = c.table_state(id).unwrap();
    assert_eq!((state.order_by(), state.direction()), ("email", SortDirection::Asc));
}

#[test]
fn only_the_latest_page_request_is_applied() {
    let (mut c, t, id) = loaded(true);
    t.respond("onDataPage/users", 200, rows(&["Yan"]));
    t.respond("onDataPage/users", 200, rows(&["Zed"]));

    c.click(sort_indicator(&c, 0)).unwrap();
    c.click(sort_indicator(&c, 0)).unwrap();
    assert_eq!(c.pending_requests(), 2);
    c.run_until_idle().unwrap();

    let body = text(&c, c.table_state(id).unwrap().body());
    assert!(body.contains("Zed"));
    assert!(!body.contains("Yan"));
    assert_eq!(c.table_state(id).unwrap().direction(), SortDirection::Asc);
}

#[test]
fn without_page_numbers_no_count_is_requested() {
    let (c, t, id) = loaded(false);
    assert_eq!(t.paths().len(), 1);
    let state = c.table_state(id).unwrap();
    assert_eq!(state.num_pages(), None);
    assert!(!state.is_disabled(PageControl::Next));
    assert!(state.is_disabled(PageControl::Last));

    let footer = state.footer().unwrap();
    assert_eq!(with_class(&c, footer, "footable-page-arrow").len(), 3);
}

#[test]
fn removing_the_table_drops_its_state() {
    let (mut c, _t, id) = loaded(true);
    let panel = ResponseView::from_value(json!({ "class": "PanelView", "title": "Empty", "rows": [] }));
    c.run_feature(&panel).unwrap();
    assert!(c.table_state(id).is_none());
}
