#![forbid(unsafe_op_in_unsafe_fn)]

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use smallvec::SmallVec;

use crate::handler::{HandlerDescriptor, ServerEvent};
use crate::lenient::scalar_text;
use crate::node::{NodeMeta, ViewKind, ViewNode, ViewTag};
use crate::props::DataListProps;
use crate::table::TableConfig;

/// Reads one node. Never fails: unknown classes and malformed attributes are preserved as
/// diagnostic variants so the rest of the tree still renders.
pub fn parse_node(v: &Value) -> ViewNode {
    if !v.is_object() {
        log::warn!("view: expected an object node, got {}", kind_of(v));
        return ViewNode::default();
    }

    let meta = parse_meta(v);
    let kind = match ViewTag::from_class(&meta.class) {
        Some(tag) => match parse_kind(tag, v) {
            Ok(kind) => kind,
            Err(e) => {
                log::warn!("view: {} has invalid attributes: {e}", meta.class);
                ViewKind::Invalid {
                    tag,
                    reason: e.to_string(),
                }
            }
        },
        None => ViewKind::Unknown,
    };

    ViewNode { meta, kind }
}

/// Reads a JSON array of nodes; a single object is treated as a one-element list.
pub fn parse_nodes(v: &Value) -> Vec<ViewNode> {
    match v {
        Value::Array(items) => items.iter().map(parse_node).collect(),
        Value::Null => Vec::new(),
        other => vec![parse_node(other)],
    }
}

impl<'de> Deserialize<'de> for ViewNode {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Value::deserialize(d)?;
        Ok(parse_node(&v))
    }
}

fn parse_meta(v: &Value) -> NodeMeta {
    let text = |k: &str| v.get(k).and_then(scalar_text);

    let mut handlers = SmallVec::<[(String, HandlerDescriptor); 2]>::new();
    if let Some(map) = v.get("handlers").and_then(Value::as_object) {
        for (event, raw) in map {
            match HandlerDescriptor::deserialize(raw) {
                Ok(h) => handlers.push((event.trim().to_ascii_lowercase(), h)),
                Err(e) => log::warn!("view: handler '{event}' ignored: {e}"),
            }
        }
    }

    let mut events = Vec::new();
    if let Some(list) = v.get("events").and_then(Value::as_array) {
        for raw in list {
            match ServerEvent::deserialize(raw) {
                Ok(ev) => events.push(ev),
                Err(e) => log::warn!("view: queued event ignored: {e}"),
            }
        }
    }

    NodeMeta {
        class: text("class").unwrap_or_default(),
        id: text("id"),
        name: text("name"),
        title: text("title"),
        description: text("description"),
        attributes: v
            .get("attributes")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        handlers,
        info_message: text("info_message").filter(|s| !s.is_empty()),
        warn_message: text("warn_message").filter(|s| !s.is_empty()),
        events,
    }
}

fn parse_kind(tag: ViewTag, v: &Value) -> Result<ViewKind, serde_json::Error> {
    Ok(match tag {
        ViewTag::Window => ViewKind::Window(read(v)?),
        ViewTag::Table => {
            let mut cfg: TableConfig = read(v)?;
            cfg.source = v.clone();
            ViewKind::Table(cfg)
        }
        ViewTag::Button => ViewKind::Button(read(v)?),
        ViewTag::Form => ViewKind::Form(read(v)?),
        ViewTag::Picklist => ViewKind::Picklist(read(v)?),
        ViewTag::Text => ViewKind::Text(read(v)?),
        ViewTag::Code => ViewKind::Code(read(v)?),
        ViewTag::Row => ViewKind::Row(read(v)?),
        ViewTag::FormSection => ViewKind::FormSection(read(v)?),
        ViewTag::Area => ViewKind::Area(read(v)?),
        ViewTag::Label => ViewKind::Label(read(v)?),
        ViewTag::MultiselectPicklist => ViewKind::MultiselectPicklist(read(v)?),
        ViewTag::InputButton => ViewKind::InputButton(read(v)?),
        ViewTag::Data => ViewKind::Data(read(v)?),
        ViewTag::Number => ViewKind::Number(read(v)?),
        ViewTag::Boolean => ViewKind::Boolean(read(v)?),
        ViewTag::DataList => {
            let mut props: DataListProps = read(v)?;
            props.source = v.clone();
            ViewKind::DataList(props)
        }
        ViewTag::Tab => ViewKind::Tab(read(v)?),
        ViewTag::Binary => ViewKind::Binary,
        ViewTag::ReadOnly => ViewKind::ReadOnly(read(v)?),
        ViewTag::ColorPicker => ViewKind::ColorPicker(read(v)?),
        ViewTag::Html => ViewKind::Html(read(v)?),
        ViewTag::CheckboxGroup => ViewKind::CheckboxGroup(read(v)?),
        ViewTag::Date => ViewKind::Date(read(v)?),
        ViewTag::Time => ViewKind::Time(read(v)?),
        ViewTag::DateTime => ViewKind::DateTime(read(v)?),
        ViewTag::TopMenu => ViewKind::TopMenu(read(v)?),
        ViewTag::EmbeddedWeb => ViewKind::EmbeddedWeb(read(v)?),
        ViewTag::UserMenu => ViewKind::UserMenu(read(v)?),
        ViewTag::Image => ViewKind::Image(read(v)?),
        ViewTag::AreaForm => ViewKind::AreaForm(read(v)?),
        ViewTag::Panel => ViewKind::Panel(read(v)?),
        ViewTag::Dialog => ViewKind::Dialog(read(v)?),
    })
}

#[inline]
fn read<T: DeserializeOwned>(v: &Value) -> Result<T, serde_json::Error> {
    T::deserialize(v)
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_class_is_kept_not_rejected() {
        let n = parse_node(&json!({ "class": "GaugeView", "id": "g1" }));
        assert_eq!(n.kind, ViewKind::Unknown);
        assert_eq!(n.class(), "GaugeView");
        assert_eq!(n.meta.id.as_deref(), Some("g1"));
    }

    #[test]
    fn malformed_known_class_becomes_invalid() {
        let n = parse_node(&json!({ "class": "PicklistView", "values": "not-a-list" }));
        assert!(matches!(
            n.kind,
            ViewKind::Invalid {
                tag: ViewTag::Picklist,
                ..
            }
        ));
    }

    #[test]
    fn children_parse_recursively_and_leniently() {
        let n = parse_node(&json!({
            "class": "RowView",
            "components": [
                { "class": "LabelView", "text": "Hello", "size": "6" },
                { "class": "Nope" },
                42
            ]
        }));

        let children = n.children();
        assert_eq!(children.len(), 3);
        assert!(children[0].is(ViewTag::Label));
        assert_eq!(children[1].kind, ViewKind::Unknown);
        assert!(!children[2].has_class());
    }

    #[test]
    fn handlers_and_events_are_collected() {
        let n = parse_node(&json!({
            "class": "PicklistView",
            "name": "country",
            "values": [],
            "description": "Pick a country",
            "handlers": { "Change": { "handler": "onCountry", "target": "area1" } },
            "events": [ { "event": "action/refresh", "target": "x", "payload": { "a": 1 } } ],
            "info_message": ""
        }));

        assert_eq!(n.meta.handlers.len(), 1);
        assert_eq!(n.meta.handlers[0].0, "change");
        assert_eq!(n.meta.handlers[0].1.handler.as_deref(), Some("onCountry"));
        assert_eq!(n.meta.events.len(), 1);
        assert_eq!(n.meta.events[0].payload, json!({ "a": 1 }));
        assert_eq!(n.meta.info_message, None);
    }

    #[test]
    fn table_keeps_its_source_for_page_requests() {
        let v = json!({ "class": "TableView", "controller": "users", "columns": [] });
        let n = parse_node(&v);
        let ViewKind::Table(cfg) = &n.kind else {
            panic!("expected a table");
        };
        assert_eq!(cfg.source, v);
        assert_eq!(cfg.controller(), "users");
    }
}
