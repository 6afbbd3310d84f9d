#![allow(dead_code)]

use serde_json::Value;
use std::sync::Arc;

use x2ui_core::ClientConfig;
use x2ui_transport::ScriptedTransport;
use x2ui_ui::{Client, ElementId};
use x2ui_view::ResponseView;

pub fn client() -> (Client, Arc<ScriptedTransport>) {
    let transport = Arc::new(ScriptedTransport::new());
    let client = Client::new(&ClientConfig::default(), transport.clone());
    (client, transport)
}

/// Renders `view` into the feature body as an in-place response would.
pub fn show(client: &mut Client, view: Value) {
    let body = client.shell().feature_body;
    client
        .run_action(&ResponseView::from_value(view), Some(body))
        .unwrap();
}

pub fn by_id(client: &Client, dom_id: &str) -> ElementId {
    client
        .document()
        .find(dom_id)
        .unwrap_or_else(|| panic!("no element '{dom_id}'"))
}

/// First live button whose text is `title`.
pub fn button(client: &Client, title: &str) -> ElementId {
    let doc = client.document();
    doc.find_all(doc.root(), |e| e.tag() == "button")
        .into_iter()
        .find(|b| doc.text_content(*b).trim() == title)
        .unwrap_or_else(|| panic!("no button '{title}'"))
}

pub fn with_class(client: &Client, root: ElementId, class: &str) -> Vec<ElementId> {
    client.document().by_class(root, class)
}

pub fn text(client: &Client, el: ElementId) -> String {
    client.document().text_content(el)
}

pub fn page_text(client: &Client) -> String {
    let doc = client.document();
    doc.text_content(doc.root())
}
