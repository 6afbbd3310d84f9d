mod common;

use serde_json::json;
use std::time::Duration;

use common::{client, show};
use x2ui_view::ResponseView;

fn poller(mode: &str) -> serde_json::Value {
    json!({
        "class": "RowView",
        "components": [{
            "class": "ButtonView",
            "title": "Poll",
            "action": "poll",
            "target": "status",
            "execution_mode": mode,
            "execution_interval": 1000
        }, {
            "class": "AreaView",
            "id": "status",
            "components": []
        }]
    })
}

#[test]
fn interval_buttons_fire_until_removed() {
    let (mut c, t) = client();
    t.respond_always("action/poll", 200, r#"{ "class": "LabelView", "text": "tick" }"#);
    show(&mut c, poller("INTERVAL"));
    assert_eq!(c.pending_timers(), 1);

    assert_eq!(c.advance(Duration::from_millis(999)).unwrap(), 0);
    assert_eq!(c.advance(Duration::from_millis(1)).unwrap(), 1);
    c.run_until_idle().unwrap();
    assert_eq!(c.advance(Duration::from_secs(1)).unwrap(), 1);
    c.run_until_idle().unwrap();
    assert_eq!(t.paths(), ["action/poll", "action/poll"]);

    let empty = ResponseView::from_value(json!({ "class": "PanelView", "title": "Other", "rows": [] }));
    c.run_feature(&empty).unwrap();
    assert_eq!(c.advance(Duration::from_secs(1)).unwrap(), 0);
    assert_eq!(c.pending_timers(), 0);
    assert_eq!(c.pending_requests(), 0);
}

#[test]
fn busy_interval_buttons_skip_a_beat() {
    let (mut c, t) = client();
    t.respond_always("action/poll", 200, r#"{ "class": "LabelView", "text": "ok" }"#);
    show(&mut c, poller("INTERVAL"));

    c.advance(Duration::from_secs(1)).unwrap();
    c.advance(Duration::from_secs(1)).unwrap();
    assert_eq!(c.pending_requests(), 1);
    c.run_until_idle().unwrap();
    assert_eq!(t.request_count(), 1);
}

#[test]
fn timeout_buttons_fire_once() {
    let (mut c, t) = client();
    t.respond_always("action/poll", 200, r#"{ "class": "LabelView", "text": "ok" }"#);
    show(&mut c, poller("TIMEOUT"));

    c.advance(Duration::from_secs(1)).unwrap();
    c.run_until_idle().unwrap();
    c.advance(Duration::from_secs(5)).unwrap();
    c.run_until_idle().unwrap();
    assert_eq!(t.request_count(), 1);
    assert_eq!(c.pending_timers(), 0);
}
