use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;
use crate::node::NodeMeta;
use crate::props::ButtonDef;

/// Targets with this prefix name a client-side capability and never reach the server.
pub const LOCAL_SCRIPT_PREFIX: &str = "javascript:";

/// Interaction handler declared on a node, keyed by interaction name in [`NodeMeta::handlers`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HandlerDescriptor {
    /// Backend action name.
    #[serde(deserialize_with = "lenient::opt_string")]
    pub handler: Option<String>,
    #[serde(rename = "formId", deserialize_with = "lenient::opt_string")]
    pub form_id: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub target: Option<String>,
}

/// Outbound action descriptor. Serialized as the JSON body, or as the `cx2.sys.view`
/// multipart field when a form is bound.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ActionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(rename = "formId", skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

impl ActionRequest {
    pub fn from_handler(handler: &HandlerDescriptor, meta: &NodeMeta) -> Self {
        Self {
            target: handler.target.clone(),
            form_id: handler.form_id.clone(),
            description: meta.description.clone(),
            action: handler.handler.clone(),
            attributes: meta.attributes.clone(),
        }
    }

    pub fn from_button(button: &ButtonDef) -> Self {
        Self {
            target: button.target.clone(),
            form_id: button.form_id.clone(),
            description: button.description.clone(),
            action: button.action.clone(),
            attributes: button.attributes.clone(),
        }
    }

    /// Builds a request from an arbitrary JSON object carrying `target`/`action`/`formId`.
    pub fn from_value(v: &Value) -> Self {
        let text = |k: &str| v.get(k).and_then(lenient::scalar_text).filter(|s| !s.is_empty());
        Self {
            target: text("target"),
            form_id: text("formId"),
            description: text("description"),
            action: text("action"),
            attributes: v
                .get("attributes")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        }
    }

    #[inline]
    pub fn local_script(&self) -> Option<&str> {
        self.target
            .as_deref()
            .and_then(|t| t.strip_prefix(LOCAL_SCRIPT_PREFIX))
    }

    #[inline]
    pub fn is_local(&self) -> bool {
        self.local_script().is_some()
    }

    #[inline]
    pub fn has_target(&self) -> bool {
        self.target.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_owned())
    }
}

/// Server-pushed event queued on a response, dispatched before the response renders.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerEvent {
    pub event: String,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub target: Option<String>,
    pub payload: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn local_prefix_is_detected() {
        let req = ActionRequest {
            target: Some("javascript:modal.dismiss".to_owned()),
            ..Default::default()
        };
        assert_eq!(req.local_script(), Some("modal.dismiss"));
        assert!(!ActionRequest::default().is_local());
    }

    #[test]
    fn serialization_skips_absent_fields() {
        let req = ActionRequest {
            action: Some("saveUser".to_owned()),
            form_id: Some("f1".to_owned()),
            ..Default::default()
        };
        let v: Value = serde_json::from_str(&req.to_json()).unwrap();
        assert_eq!(v, json!({ "action": "saveUser", "formId": "f1" }));
    }

    #[test]
    fn from_value_reads_menu_items() {
        let req = ActionRequest::from_value(&json!({
            "title": "Users", "action": "listUsers", "target": "feature-body", "formId": ""
        }));
        assert_eq!(req.action.as_deref(), Some("listUsers"));
        assert_eq!(req.target.as_deref(), Some("feature-body"));
        assert_eq!(req.form_id, None);
    }
}
