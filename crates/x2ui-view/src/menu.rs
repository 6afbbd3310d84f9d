use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;

/// Entry of the application menu or of a top-menu task list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApplicationFeature {
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Feature endpoint name; features without one are group headers.
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Local capability run instead of the feature endpoint.
    #[serde(deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub subfeatures: Vec<ApplicationFeature>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

impl ApplicationFeature {
    #[inline]
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    #[inline]
    pub fn has_backend(&self) -> bool {
        self.backend.as_deref().is_some_and(|b| !b.is_empty())
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_owned())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UserMenuItem {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub target: Option<String>,
    #[serde(deserialize_with = "lenient::truthy")]
    pub divider: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_features_parse() {
        let f: ApplicationFeature = serde_json::from_value(json!({
            "title": "Admin",
            "subfeatures": [
                { "title": "Users", "backend": "users", "icon": "fa-user", "subfeatures": null }
            ]
        }))
        .unwrap();

        assert!(!f.has_backend());
        assert_eq!(f.subfeatures.len(), 1);
        assert!(f.subfeatures[0].has_backend());
        assert!(f.subfeatures[0].to_json().contains("\"backend\":\"users\""));
    }
}
