use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;
use crate::menu::{ApplicationFeature, UserMenuItem};
use crate::node::ViewNode;

const FULL_WIDTH: u32 = 12;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct KeyValue {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub value: Option<String>,
}

impl KeyValue {
    #[inline]
    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or("")
    }

    #[inline]
    pub fn label(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// How a button fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionMode {
    #[default]
    Click,
    /// Once, `execution_interval` ms after rendering.
    Timeout,
    /// Every `execution_interval` ms while the button exists.
    Interval,
}

impl From<String> for ExecutionMode {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "TIMEOUT" => Self::Timeout,
            "INTERVAL" => Self::Interval,
            _ => Self::Click,
        }
    }
}

impl From<ExecutionMode> for String {
    fn from(value: ExecutionMode) -> Self {
        match value {
            ExecutionMode::Click => "CLICK",
            ExecutionMode::Timeout => "TIMEOUT",
            ExecutionMode::Interval => "INTERVAL",
        }
        .to_owned()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ButtonDef {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    pub icon: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub target: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub action: Option<String>,
    #[serde(rename = "formId", deserialize_with = "lenient::opt_string")]
    pub form_id: Option<String>,
    pub extendedclass: Option<String>,
    pub style: Option<String>,
    #[serde(deserialize_with = "lenient::truthy")]
    pub hidden: bool,
    pub execution_mode: ExecutionMode,
    #[serde(deserialize_with = "lenient::uint")]
    pub execution_interval: u32,
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowProps {
    #[serde(deserialize_with = "lenient::uint")]
    pub width: u32,
    pub style: Option<String>,
    pub formid: Option<String>,
    #[serde(deserialize_with = "lenient::truthy")]
    pub collapsable: bool,
    #[serde(deserialize_with = "lenient::truthy")]
    pub closeable: bool,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub buttons: Vec<ButtonDef>,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub rows: Vec<ViewNode>,
}

impl Default for WindowProps {
    fn default() -> Self {
        Self {
            width: FULL_WIDTH,
            style: None,
            formid: None,
            collapsable: false,
            closeable: false,
            buttons: Vec::new(),
            rows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormProps {
    #[serde(deserialize_with = "lenient::truthy")]
    pub inline: bool,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub components: Vec<ViewNode>,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub buttons: Vec<ButtonDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PicklistProps {
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub values: Vec<KeyValue>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub selected: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextProps {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub value: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub target: Option<String>,
    #[serde(rename = "formId", deserialize_with = "lenient::opt_string")]
    pub form_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CodeProps {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub value: Option<String>,
    pub mode: Option<String>,
}

/// Plain child list (row).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContainerProps {
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub components: Vec<ViewNode>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormSectionProps {
    #[serde(deserialize_with = "lenient::uint")]
    pub size: u32,
    pub importance: Option<String>,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub components: Vec<ViewNode>,
}

impl Default for FormSectionProps {
    fn default() -> Self {
        Self {
            size: FULL_WIDTH,
            importance: None,
            components: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AreaProps {
    #[serde(deserialize_with = "lenient::uint")]
    pub size: u32,
    pub style: Option<String>,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub components: Vec<ViewNode>,
}

impl Default for AreaProps {
    fn default() -> Self {
        Self {
            size: FULL_WIDTH,
            style: None,
            components: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AreaFormProps {
    #[serde(deserialize_with = "lenient::uint")]
    pub size: u32,
    pub style: Option<String>,
    pub form_id: Option<String>,
    pub form_style: Option<String>,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub components: Vec<ViewNode>,
}

impl Default for AreaFormProps {
    fn default() -> Self {
        Self {
            size: FULL_WIDTH,
            style: None,
            form_id: None,
            form_style: None,
            components: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelProps {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient::uint")]
    pub size: u32,
    pub style: Option<String>,
    pub extraclassdata: Option<String>,
}

impl Default for LabelProps {
    fn default() -> Self {
        Self {
            text: None,
            size: FULL_WIDTH,
            style: None,
            extraclassdata: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MultiselectProps {
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub values: Vec<KeyValue>,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub selected: Vec<String>,
    #[serde(deserialize_with = "lenient::uint")]
    pub height: u32,
}

/// A button fused with a text input; the button half carries the action.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InputButtonProps {
    #[serde(flatten)]
    pub button: ButtonDef,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub value: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

impl InputButtonProps {
    #[inline]
    pub fn button_first(&self) -> bool {
        self.position
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case("LEFT"))
    }
}

/// Single scalar value (hidden data, number, read-only, color, date, time, date-time).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ValueProps {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BooleanProps {
    pub value: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DataListItem {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataListProps {
    pub controller: Option<String>,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub items: Vec<DataListItem>,
    /// Form used to create or edit one item.
    pub view: Option<Box<ViewNode>>,
    #[serde(rename = "allowNew", deserialize_with = "lenient::truthy")]
    pub allow_new: bool,
    #[serde(rename = "allowEdit", deserialize_with = "lenient::truthy")]
    pub allow_edit: bool,
    #[serde(rename = "allowSort", deserialize_with = "lenient::truthy")]
    pub allow_sort: bool,
    #[serde(rename = "itemLabel", deserialize_with = "lenient::opt_string")]
    pub item_label: Option<String>,

    /// The data list description as received; posted back when an item is saved.
    #[serde(skip)]
    pub source: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TabEntry {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub key: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    pub view: Option<ViewNode>,
    #[serde(deserialize_with = "lenient::truthy")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TabProps {
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub tabs: Vec<TabEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HtmlProps {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub value: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub height: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CheckboxGroupProps {
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub values: Vec<KeyValue>,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub checked: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TopMenuProps {
    #[serde(rename = "showLogout", deserialize_with = "lenient::truthy")]
    pub show_logout: bool,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub items: Vec<ApplicationFeature>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EmbeddedWebProps {
    pub url: Option<String>,
    pub style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserMenuProps {
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub items: Vec<UserMenuItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImageProps {
    pub src: Option<String>,
    #[serde(deserialize_with = "lenient::truthy")]
    pub edit: bool,
}

/// Full-page feature content.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PanelProps {
    pub formid: Option<String>,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub buttons: Vec<ButtonDef>,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub rows: Vec<ViewNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DialogProps {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub width: Option<String>,
    pub style: Option<String>,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub components: Vec<ViewNode>,
}
