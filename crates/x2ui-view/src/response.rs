use serde::Deserialize;
use serde_json::Value;

use crate::error::ViewError;
use crate::handler::ServerEvent;
use crate::lenient;
use crate::node::{ViewNode, ViewTag};
use crate::parser::parse_node;

/// Where a successful action response goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseRoute {
    /// Replaces the feature title and body.
    Panel,
    /// Opens as the active modal.
    Dialog,
    /// Rendered inside the element the request targeted.
    InPlace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

/// Server response to an action: a view node plus routing and notification data.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseView {
    pub node: ViewNode,
    /// The body as received, for fields outside the node model.
    pub raw: Value,
}

impl ResponseView {
    pub fn parse(body: &str) -> Result<Self, ViewError> {
        let raw: Value = serde_json::from_str(body)?;
        Ok(Self::from_value(raw))
    }

    pub fn from_value(raw: Value) -> Self {
        Self {
            node: parse_node(&raw),
            raw,
        }
    }

    /// Routing follows the `class` alone, so a dialog or panel with an unreadable attribute
    /// still lands in the modal or the feature body.
    pub fn route(&self) -> ResponseRoute {
        match ViewTag::from_class(self.node.class()) {
            Some(ViewTag::Panel) => ResponseRoute::Panel,
            Some(ViewTag::Dialog) => ResponseRoute::Dialog,
            _ => ResponseRoute::InPlace,
        }
    }

    #[inline]
    pub fn events(&self) -> &[ServerEvent] {
        &self.node.meta.events
    }

    /// Warning wins over info when both are present.
    pub fn notification(&self) -> Option<Notification> {
        let meta = &self.node.meta;
        if let Some(text) = meta.warn_message.clone() {
            return Some(Notification {
                kind: NotificationKind::Warn,
                text,
            });
        }
        meta.info_message.clone().map(|text| Notification {
            kind: NotificationKind::Info,
            text,
        })
    }

    /// Free-form `message` field some events answer with.
    pub fn message(&self) -> Option<String> {
        self.raw
            .get("message")
            .and_then(lenient::scalar_text)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FieldError {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub message: Option<String>,
}

/// Structured body of a rejected ("bad request") action.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ValidationErrors {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub message: Option<String>,
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// `None` unless the body is an object with an `errors` list.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str::<ValidationErrors>(body).ok()
    }

    pub fn error_for(&self, key: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.key.as_deref() == Some(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_discriminator() {
        let panel = ResponseView::parse(r#"{ "class": "PanelView", "title": "T", "rows": [] }"#).unwrap();
        assert_eq!(panel.route(), ResponseRoute::Panel);

        let dialog = ResponseView::parse(r#"{ "class": "DialogView", "components": [] }"#).unwrap();
        assert_eq!(dialog.route(), ResponseRoute::Dialog);

        let other = ResponseView::parse(r#"{ "class": "LabelView", "text": "ok" }"#).unwrap();
        assert_eq!(other.route(), ResponseRoute::InPlace);

        let none = ResponseView::parse("{}").unwrap();
        assert_eq!(none.route(), ResponseRoute::InPlace);
        assert!(!none.node.has_class());
    }

    #[test]
    fn unreadable_dialogs_keep_their_route() {
        let dialog = ResponseView::parse(r#"{ "class": "DialogView", "style": 5, "components": [] }"#).unwrap();
        assert!(!dialog.node.is(ViewTag::Dialog));
        assert_eq!(dialog.route(), ResponseRoute::Dialog);

        let panel = ResponseView::parse(r#"{ "class": "PanelView", "formid": 5, "rows": [] }"#).unwrap();
        assert_eq!(panel.route(), ResponseRoute::Panel);
    }

    #[test]
    fn warning_takes_precedence() {
        let r = ResponseView::parse(
            r#"{ "class": "LabelView", "info_message": "saved", "warn_message": "careful" }"#,
        )
        .unwrap();
        let n = r.notification().unwrap();
        assert_eq!(n.kind, NotificationKind::Warn);
        assert_eq!(n.text, "careful");
    }

    #[test]
    fn non_json_body_is_an_error() {
        assert!(matches!(ResponseView::parse("<html>"), Err(ViewError::Json(_))));
    }

    #[test]
    fn validation_body_requires_errors_list() {
        let v = ValidationErrors::parse(
            r#"{ "message": "Invalid input", "errors": [ { "key": "email", "message": "invalid" } ] }"#,
        )
        .unwrap();
        assert_eq!(v.error_for("email").and_then(|e| e.message.as_deref()), Some("invalid"));
        assert!(v.error_for("name").is_none());

        assert!(ValidationErrors::parse(r#"{ "message": "nope" }"#).is_none());
        assert!(ValidationErrors::parse("plain text").is_none());
    }
}
