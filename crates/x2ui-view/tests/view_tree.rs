use serde_json::json;
use x2ui_view::{ResponseRoute, ResponseView, ViewKind, ViewTag};

#[test]
fn feature_panel_parses_end_to_end() {
    let body = json!({
        "class": "PanelView",
        "title": "Users",
        "info_message": "3 users loaded",
        "rows": [{
            "class": "RowView",
            "components": [{
                "class": "WindowView",
                "id": "w1",
                "title": "Directory",
                "width": 8,
                "collapsable": true,
                "buttons": [ { "title": "Refresh", "action": "refresh", "target": "w1" } ],
                "rows": [{
                    "class": "RowView",
                    "components": [{
                        "class": "FormView",
                        "id": "userForm",
                        "components": [
                            { "class": "TextView", "name": "name", "title": "Name", "value": "Ada" },
                            { "class": "BooleanView", "name": "admin", "title": "Admin", "value": true },
                            { "class": "FancySlider", "name": "mood" }
                        ],
                        "buttons": [ { "title": "Save", "action": "saveUser", "formId": "userForm", "target": "w1" } ]
                    }]
                }]
            }]
        }]
    });

    let resp = ResponseView::from_value(body);
    assert_eq!(resp.route(), ResponseRoute::Panel);
    assert_eq!(resp.node.title(), "Users");
    assert_eq!(resp.notification().map(|n| n.text).as_deref(), Some("3 users loaded"));

    let row = &resp.node.children()[0];
    let window = &row.children()[0];
    let ViewKind::Window(win) = &window.kind else {
        panic!("expected a window, got {:?}", window.kind);
    };
    assert_eq!(win.width, 8);
    assert!(win.collapsable);
    assert_eq!(win.buttons[0].action.as_deref(), Some("refresh"));

    let form = &window.children()[0].children()[0];
    assert!(form.is(ViewTag::Form));
    let fields = form.children();
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].name(), "name");
    assert!(matches!(&fields[1].kind, ViewKind::Boolean(b) if b.value == Some(true)));
    assert_eq!(fields[2].tag(), None);
    assert_eq!(fields[2].class(), "FancySlider");
}

#[test]
fn every_known_class_parses_from_a_bare_object() {
    for tag in ViewTag::ALL {
        let resp = ResponseView::from_value(json!({ "class": tag.class_name() }));
        assert_eq!(resp.node.tag(), Some(tag), "class {}", tag.class_name());
    }
}
