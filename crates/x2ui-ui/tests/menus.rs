mod common;

use serde_json::json;

use common::{client, text};
use x2ui_ui::{Client, ClientEffect, ElementId, UserIdentity};

fn link(c: &Client, root: ElementId, label: &str) -> ElementId {
    let doc = c.document();
    doc.find_all(root, |e| e.tag() == "a")
        .into_iter()
        .find(|a| doc.text_content(*a).contains(label))
        .unwrap_or_else(|| panic!("no link '{label}'"))
}

fn top_menu() -> String {
    json!({
        "class": "TopMenu",
        "title": "Admin",
        "showLogout": true,
        "items": [{
            "title": "Jobs",
            "action": "listJobs",
            "target": "feature-body",
            "subfeatures": [ { "title": "Running", "action": "running", "target": "feature-body" } ]
        }]
    })
    .to_string()
}

#[test]
fn logout_hands_navigation_to_the_host() {
    let (mut c, t) = client();
    t.respond("onListFeatures", 200, "[]");
    t.respond("onTopMenu", 200, top_menu());
    c.start().unwrap();
    c.run_until_idle().unwrap();

    let menu = c.shell().application_menu;
    assert!(text(&c, menu).contains("Admin"));
    c.click(link(&c, menu, "Log out")).unwrap();

    assert_eq!(
        c.take_effects(),
        [
            ClientEffect::SignedOut,
            ClientEffect::Navigate("http://localhost:8080/jemo/admin".to_owned()),
        ]
    );
    assert!(c.take_effects().is_empty());
}

#[test]
fn task_sidebar_toggles_and_runs_the_first_task() {
    let (mut c, t) = client();
    t.respond("onListFeatures", 200, "[]");
    t.respond("onTopMenu", 200, top_menu());
    t.respond("action/listJobs", 200, r#"{ "class": "LabelView", "text": "3 jobs" }"#);
    c.start().unwrap();
    c.run_until_idle().unwrap();

    let doc = c.document();
    let toggle = doc.by_class(c.shell().application_menu, "right-sidebar-toggle")[0];
    c.click(toggle).unwrap();
    let sidebar = c.document().find("right-sidebar").expect("sidebar open");
    assert!(text(&c, sidebar).contains("Running"));

    c.run_until_idle().unwrap();
    assert_eq!(t.paths().last().map(String::as_str), Some("action/listJobs"));
    assert!(text(&c, c.shell().feature_body).contains("3 jobs"));

    c.click(toggle).unwrap();
    assert!(c.document().find("right-sidebar").is_none());
}

#[test]
fn signing_in_loads_the_user_menu() {
    let (mut c, t) = client();
    t.respond("onUserLogin", 200, r#"{ "message": "Hello Ada" }"#);
    t.respond(
        "onListFeatures",
        200,
        r#"[ { "title": "People", "subfeatures": [ { "title": "Users", "backend": "users" } ] } ]"#,
    );
    t.respond("onTopMenu", 200, r#"{ "class": "TopMenu", "title": "Admin" }"#);
    t.respond(
        "onUserMenu",
        200,
        json!({
            "class": "UserMenu",
            "items": [
                { "title": "Profile", "action": "profile", "target": "feature-body" },
                { "divider": true }
            ]
        })
        .to_string(),
    );

    c.sign_in(
        UserIdentity {
            id: "42".to_owned(),
            given_name: "Ada".to_owned(),
            surname: "Lovelace".to_owned(),
            user_principal_name: "ada@example.org".to_owned(),
        },
        "token",
    );
    assert_eq!(text(&c, c.shell().feature_title), "Welcome to X2");
    c.run_until_idle().unwrap();

    assert_eq!(t.paths(), ["onUserLogin", "onListFeatures", "onTopMenu", "onUserMenu"]);
    let side = c.shell().side_menu;
    assert!(text(&c, side).contains("Ada Lovelace"));
    assert!(text(&c, side).contains("(ada@example.org)"));

    let user_menu = c.document().find("user-app-menu").expect("user menu");
    assert!(text(&c, user_menu).contains("Profile"));
    assert_eq!(c.document().by_class(user_menu, "divider").len(), 1);

    let nested = c.document().by_class(side, "nav-second-level");
    assert_eq!(nested.len(), 1);
    assert!(text(&c, nested[0]).contains("Users"));
}
