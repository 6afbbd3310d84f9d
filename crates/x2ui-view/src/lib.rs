//! View description model.
//!
//! A server describes the UI as a JSON tree of nodes, each tagged by a `class` discriminator.
//! This crate turns that JSON into a closed set of typed variants without ever rejecting a tree:
//! unknown classes become [`ViewKind::Unknown`] and malformed known classes become
//! [`ViewKind::Invalid`], so a renderer can always degrade to a placeholder.

mod error;
mod handler;
mod lenient;
mod menu;
mod node;
mod parser;
mod props;
mod response;
mod table;

pub use error::ViewError;
pub use handler::{ActionRequest, HandlerDescriptor, ServerEvent, LOCAL_SCRIPT_PREFIX};
pub use menu::{ApplicationFeature, UserMenuItem};
pub use node::{NodeMeta, ViewKind, ViewNode, ViewTag};
pub use parser::{parse_node, parse_nodes};
pub use props::{
    AreaFormProps, AreaProps, BooleanProps, ButtonDef, CheckboxGroupProps, CodeProps,
    ContainerProps, DataListItem, DataListProps, DialogProps, EmbeddedWebProps, ExecutionMode,
    FormProps, FormSectionProps, HtmlProps, ImageProps, InputButtonProps, KeyValue, LabelProps,
    MultiselectProps, PanelProps, PicklistProps, TabEntry, TabProps, TextProps, TopMenuProps,
    UserMenuProps, ValueProps, WindowProps,
};
pub use response::{FieldError, Notification, NotificationKind, ResponseRoute, ResponseView, ValidationErrors};
pub use table::{Cell, Column, Legend, Section, TableConfig, TableRow, PRIMARY_SECTION, UNTITLED_SECTION};
