mod common;

use serde_json::{json, Value};

use common::{button, client, show, with_class};
use x2ui_ui::{Client, ElementId, NEW_ITEM_KEY, VIEW_FIELD};

fn members() -> Value {
    json!({
        "class": "DataListView",
        "name": "members",
        "controller": "members",
        "allowNew": true,
        "allowEdit": true,
        "itemLabel": "Member",
        "items": [ { "key": "a1", "title": "Alice" } ],
        "view": {
            "class": "FormView",
            "id": "memberForm",
            "components": [ { "class": "TextView", "name": "name", "title": "Name" } ]
        }
    })
}

/// Picker, selected list and list container of the only data list on the page.
fn parts(c: &Client) -> (ElementId, ElementId, ElementId) {
    let doc = c.document();
    let body = c.shell().feature_body;
    let picker = doc.by_tag(body, "select")[0];
    let selected = doc.by_tag(body, "ul")[0];
    let list = doc.parent(picker).unwrap();
    (picker, selected, list)
}

fn value(c: &Client, list: ElementId) -> Value {
    serde_json::from_str(&c.datalist_value(list).unwrap()).unwrap()
}

#[test]
fn initial_items_are_selected_and_mirrored() {
    let (mut c, _t) = client();
    show(&mut c, members());
    let (picker, selected, list) = parts(&c);

    assert_eq!(with_class(&c, selected, "well").len(), 1);
    assert_eq!(value(&c, list), json!([ { "key": "a1", "title": "Alice" } ]));

    let options: Vec<String> = c
        .document()
        .by_tag(picker, "option")
        .into_iter()
        .map(|o| c.document().text_content(o))
        .collect();
    assert_eq!(options, ["-- Unselected --", "-- New Member --"]);

    let hidden = c.document().by_tag(list, "input")[0];
    assert_eq!(c.document().attr(hidden, "name"), Some("members"));
    assert_eq!(c.document().attr(hidden, "type"), Some("hidden"));
}

#[test]
fn new_items_are_saved_through_the_dialog() {
    let (mut c, t) = client();
    t.respond("addnew/members", 200, r#"{ "key": "b2", "title": "Bob" }"#);
    show(&mut c, members());
    let (picker, selected, list) = parts(&c);

    c.document_mut().set_value(picker, NEW_ITEM_KEY);
    c.change(picker).unwrap();
    let modal_root = c.shell().modal_root;
    assert_eq!(c.document().children(modal_root).len(), 1);

    c.click(button(&c, "Save")).unwrap();
    c.run_until_idle().unwrap();

    let reqs = t.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].event_path(), "action/addnew/members");
    let form = reqs[0].multipart().unwrap();
    assert!(form.get_text("name").is_some());
    let posted: Value = serde_json::from_str(form.get_text(VIEW_FIELD).unwrap()).unwrap();
    assert_eq!(posted["controller"], "members");

    assert_eq!(with_class(&c, selected, "well").len(), 2);
    assert!(c.document().children(modal_root).is_empty());
    assert_eq!(
        value(&c, list),
        json!([ { "key": "a1", "title": "Alice" }, { "key": "b2", "title": "Bob" } ])
    );
    assert_eq!(c.document().value(picker).unwrap_or_default(), "");
}

#[test]
fn cancel_closes_without_posting() {
    let (mut c, t) = client();
    show(&mut c, members());
    let (picker, _, _) = parts(&c);

    c.document_mut().set_value(picker, NEW_ITEM_KEY);
    c.change(picker).unwrap();
    c.click(button(&c, "Cancel")).unwrap();

    let modal_root = c.shell().modal_root;
    assert!(c.document().children(modal_root).is_empty());
    assert_eq!(t.request_count(), 0);
}

#[test]
fn removed_items_return_to_the_picker() {
    let (mut c, _t) = client();
    show(&mut c, members());
    let (picker, selected, list) = parts(&c);

    let alice = with_class(&c, selected, "well")[0];
    c.click(alice).unwrap();
    c.click(button(&c, "Remove from List")).unwrap();

    assert!(with_class(&c, selected, "well").is_empty());
    assert_eq!(value(&c, list), json!([]));
    assert_eq!(c.document().by_tag(picker, "option").len(), 3);

    c.document_mut().set_value(picker, "a1");
    c.change(picker).unwrap();
    assert_eq!(value(&c, list), json!([ { "key": "a1", "title": "Alice" } ]));
    assert_eq!(c.document().by_tag(picker, "option").len(), 2);
}
