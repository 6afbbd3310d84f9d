mod common;

use serde_json::json;

use common::{by_id, client, page_text, show};
use x2ui_ui::{Rendered, UiEvent};
use x2ui_view::{parse_node, ViewTag};

#[test]
fn every_known_tag_has_a_renderer() {
    let (mut c, _t) = client();
    for tag in ViewTag::ALL {
        let node = parse_node(&json!({ "class": tag.class_name() }));
        let produced = c.render(&node);
        for el in &produced {
            let html = c.document().to_html(*el);
            assert!(!html.contains("Warning: The view"), "{}: {html}", tag.class_name());
        }
    }
}

#[test]
fn unknown_classes_render_a_placeholder() {
    let (mut c, _t) = client();
    show(
        &mut c,
        json!({
            "class": "RowView",
            "components": [
                { "class": "LabelView", "text": "Before" },
                { "class": "FancySlider" },
                { "class": "LabelView", "text": "After" }
            ]
        }),
    );
    let text = page_text(&c);
    assert!(text.contains("Warning: The view [FancySlider] has not yet been implemented"));
    let (before, after) = (text.find("Before").unwrap(), text.find("After").unwrap());
    assert!(before < after);
}

#[test]
fn malformed_known_views_degrade_to_a_placeholder() {
    let (mut c, _t) = client();
    show(&mut c, json!({ "class": "PicklistView", "values": "not-a-list" }));
    assert!(page_text(&c).contains("Warning: The view [PicklistView] could not be read"));
}

#[test]
fn registered_renderers_replace_the_placeholder() {
    let (mut c, _t) = client();
    c.register_renderer("FancySlider", |c, node| {
        let el = c.document_mut().create_with("input", "slider");
        c.document_mut().set_attr(el, "name", node.name());
        let mut out = Rendered::new();
        out.push(el);
        out
    });
    show(&mut c, json!({ "class": "FancySlider", "name": "mood" }));
    assert!(!page_text(&c).contains("Warning"));
    let body = c.shell().feature_body;
    let slider = c.document().by_class(body, "slider");
    assert_eq!(c.document().attr(slider[0], "name"), Some("mood"));
}

#[test]
fn declared_handlers_are_bound_to_the_element() {
    let (mut c, t) = client();
    show(
        &mut c,
        json!({
            "class": "PicklistView",
            "name": "country",
            "values": [ { "key": "uk", "value": "United Kingdom" }, { "key": "fr", "value": "France" } ],
            "handlers": { "change": { "handler": "onCountry", "formId": "", "target": "feature-body" } }
        }),
    );
    let body = c.shell().feature_body;
    let select = c.document().by_tag(body, "select")[0];
    assert!(c.is_bound(select, &UiEvent::Change));

    c.document_mut().set_value(select, "fr");
    c.change(select).unwrap();
    t.respond("action/onCountry", 200, r#"{ "class": "LabelView", "text": "Bonjour" }"#);
    c.run_until_idle().unwrap();

    let reqs = t.requests();
    assert_eq!(reqs[0].event_path(), "action/onCountry");
    assert!(reqs[0].json_body().is_some());
    assert!(page_text(&c).contains("Bonjour"));
}

#[test]
fn forms_label_each_field_and_group_it_by_name() {
    let (mut c, _t) = client();
    show(
        &mut c,
        json!({
            "class": "FormView",
            "id": "f1",
            "components": [
                { "class": "TextView", "name": "name", "title": "Name" },
                { "class": "BooleanView", "name": "admin", "title": "Admin", "value": true },
                { "class": "PicklistView", "name": "role", "title": "Role",
                  "values": [ { "key": "a", "value": "A" }, { "key": "b", "value": "B" } ], "selected": "b" }
            ]
        }),
    );
    for field in ["name", "admin", "role"] {
        let group = by_id(&c, &format!("x2_form_group_{field}"));
        assert!(c.document().has_class(group, "form-group"));
    }
    let form = c.document().form_data(by_id(&c, "f1"));
    assert_eq!(form.get_text("admin"), Some("true"));
    assert_eq!(form.get_text("role"), Some("b"));
}

#[test]
fn collapsing_a_window_hides_its_content() {
    let (mut c, _t) = client();
    show(
        &mut c,
        json!({ "class": "WindowView", "id": "w1", "title": "W", "collapsable": true, "closeable": true, "rows": [] }),
    );
    let content = by_id(&c, "w1");
    let body = c.shell().feature_body;
    let link = c.document().by_class(body, "collapse-link")[0];
    c.click(link).unwrap();
    assert_eq!(c.document().style(content, "display"), Some("none"));
    c.click(link).unwrap();
    assert_eq!(c.document().style(content, "display"), Some("block"));

    let close = c.document().by_class(body, "close-link")[0];
    c.click(close).unwrap();
    assert!(c.document().find("w1").is_none());
}
